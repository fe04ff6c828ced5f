use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatmergeError>;

/// Errors from the boundary layers: dictionary loading, tree walking,
/// materialization and run gating. The consolidation engine itself is total.
#[derive(Error, Debug)]
pub enum CatmergeError {
    #[error("IO error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid synonym dictionary: {0}")]
    InvalidDictionary(String),

    #[error("Classifier error for '{}': {message}", .path.display())]
    Classify { path: PathBuf, message: String },

    #[error("Output folder is the source folder '{}'", .0.display())]
    OutputIsSource(PathBuf),

    #[error("A consolidation run is already in progress, try again later")]
    Busy,
}

impl CatmergeError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

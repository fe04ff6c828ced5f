use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::{DirEntry, WalkDir};

use crate::algo::RawCategories;
use crate::error::{CatmergeError, Result};
use crate::pipeline::classify::{Classify, ERROR_PROCESSING};

/// Archive metadata that never counts as user content.
fn is_metadata(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.depth() > 0 && (name.starts_with('.') || name == "__MACOSX")
}

/// List regular files under `root` in sorted walk order, relative to `root`.
///
/// Unreadable entries below the root are logged and skipped.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    list_files_excluding(root, None)
}

/// Like [`list_files`], but never descends into `exclude` when it lies inside
/// `root`. An `exclude` that is `root` itself is rejected.
pub fn list_files_excluding(root: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CatmergeError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }
    let skipped = match exclude {
        Some(exclude) => nested_relative(root, exclude)?,
        None => None,
    };

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !is_metadata(e)
                && !skipped
                    .as_deref()
                    .is_some_and(|rel| e.path().strip_prefix(root).is_ok_and(|r| r == rel))
        });
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            files.push(rel.to_path_buf());
        }
    }
    Ok(files)
}

/// Where `inner` sits below `root`, relative to `root`, comparing canonical
/// paths. `None` if `inner` does not exist yet or lies elsewhere.
fn nested_relative(root: &Path, inner: &Path) -> Result<Option<PathBuf>> {
    let Ok(inner_abs) = inner.canonicalize() else {
        return Ok(None);
    };
    let root_abs = root.canonicalize().map_err(|e| CatmergeError::io(root, e))?;
    match inner_abs.strip_prefix(&root_abs) {
        Ok(rel) if rel.as_os_str().is_empty() => {
            Err(CatmergeError::OutputIsSource(root.to_path_buf()))
        }
        Ok(rel) => {
            tracing::debug!(skip = %rel.display(), "excluding output folder from walk");
            Ok(Some(rel.to_path_buf()))
        }
        Err(_) => Ok(None),
    }
}

/// Classify every file under `root` and build the raw `{label → paths}` mapping.
///
/// Files are classified in parallel; the mapping is assembled afterwards in
/// walk order so the result does not depend on scheduling. A classifier error
/// becomes the `Error_Processing` label for that file.
pub fn classify_tree(root: &Path, classifier: &dyn Classify) -> Result<RawCategories> {
    classify_tree_excluding(root, None, classifier)
}

/// [`classify_tree`] that leaves out the `exclude` folder, typically the
/// output folder of an organize run placed inside its own source.
pub fn classify_tree_excluding(
    root: &Path,
    exclude: Option<&Path>,
    classifier: &dyn Classify,
) -> Result<RawCategories> {
    let files = list_files_excluding(root, exclude)?;
    tracing::info!(root = %root.display(), files = files.len(), "classifying files");

    let labels: Vec<String> = files
        .par_iter()
        .map(|rel| match classifier.classify(&root.join(rel)) {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!(path = %rel.display(), error = %e, "classification failed");
                ERROR_PROCESSING.to_string()
            }
        })
        .collect();

    Ok(files
        .iter()
        .zip(labels)
        .map(|(rel, label)| (label, path_string(rel)))
        .collect())
}

/// Forward-slash relative path, the form used in category mappings.
fn path_string(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

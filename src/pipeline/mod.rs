//! Boundary plumbing around the engine: classify a directory tree, consolidate,
//! and copy files into per-category folders, one run at a time.

pub mod classify;
pub mod gate;
pub mod materialize;
pub mod walk;

use serde::Serialize;
use std::path::Path;

use crate::algo::synonyms::SynonymDictionary;
use crate::algo::{consolidate, ConsolidatedCategory};
use crate::error::Result;

pub use classify::{Classify, ExtensionClassifier};
pub use gate::{RunGate, RUN_GATE};
pub use materialize::{materialize, MaterializeReport};
pub use walk::{classify_tree, classify_tree_excluding};

/// Everything a caller needs to know about one organize run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub files: usize,
    pub raw_labels: usize,
    pub categories: Vec<ConsolidatedCategory>,
    pub materialized: MaterializeReport,
}

/// Run the whole pipeline under the process-wide [`RUN_GATE`].
pub fn organize(
    source: &Path,
    dest: &Path,
    classifier: &dyn Classify,
    dictionary: &SynonymDictionary,
) -> Result<RunReport> {
    organize_with_gate(&RUN_GATE, source, dest, classifier, dictionary)
}

/// Run the whole pipeline under `gate`: classify every file below `source`,
/// consolidate the labels, and copy into `dest`. A `dest` nested in `source`
/// is left out of the walk so earlier output is never re-classified. Fails fast with
/// [`crate::error::CatmergeError::Busy`] if another run holds the gate.
pub fn organize_with_gate(
    gate: &RunGate,
    source: &Path,
    dest: &Path,
    classifier: &dyn Classify,
    dictionary: &SynonymDictionary,
) -> Result<RunReport> {
    let _permit = gate.try_acquire()?;

    let raw = classify_tree_excluding(source, Some(dest), classifier)?;
    let categories = consolidate(raw.entries(), dictionary);
    tracing::info!(
        raw_labels = raw.len(),
        categories = categories.len(),
        "consolidated categories"
    );
    let materialized = materialize(&categories, source, dest)?;

    Ok(RunReport {
        files: raw.path_count(),
        raw_labels: raw.len(),
        categories,
        materialized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatmergeError;

    #[test]
    fn busy_gate_rejects_run() {
        let gate = RunGate::new();
        let _held = gate.try_acquire().unwrap();
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let result = organize_with_gate(
            &gate,
            src.path(),
            dest.path(),
            &ExtensionClassifier,
            SynonymDictionary::builtin(),
        );
        assert!(matches!(result, Err(CatmergeError::Busy)));
    }

    #[test]
    fn failed_run_releases_gate() {
        let gate = RunGate::new();
        let dest = tempfile::tempdir().unwrap();
        let result = organize_with_gate(
            &gate,
            Path::new("/nonexistent/catmerge-source"),
            dest.path(),
            &ExtensionClassifier,
            SynonymDictionary::builtin(),
        );
        assert!(result.is_err());
        assert!(!gate.is_busy());
    }

    #[test]
    fn output_equal_to_source_is_rejected() {
        let src = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("a.pdf"), b"a").unwrap();
        let result = organize_with_gate(
            &RunGate::new(),
            src.path(),
            src.path(),
            &ExtensionClassifier,
            SynonymDictionary::builtin(),
        );
        assert!(matches!(result, Err(CatmergeError::OutputIsSource(_))));
    }
}

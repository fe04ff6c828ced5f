use std::fs;
use std::path::Path;

use nu_plugin_catmerge::algo::synonyms::SynonymDictionary;
use nu_plugin_catmerge::error::{CatmergeError, Result};
use nu_plugin_catmerge::pipeline::{
    classify_tree, organize_with_gate, Classify, ExtensionClassifier, RunGate,
};

/// Stand-in for a content classifier: labels by a keyword in the file name,
/// the way a model would return free-form, inconsistently worded labels.
struct KeywordClassifier;

impl Classify for KeywordClassifier {
    fn classify(&self, path: &Path) -> Result<String> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let label = if name.starts_with("inv") {
            "Invoices"
        } else if name.starts_with("bill") {
            "invoices"
        } else if name.starts_with("report") {
            "Sales Report"
        } else if name.starts_with("q3") {
            "Quarterly Sales Report"
        } else if name.starts_with("beach") {
            "Vacation Photo"
        } else if name.starts_with("corrupt") {
            return Err(CatmergeError::Classify {
                path: path.to_path_buf(),
                message: "unreadable".into(),
            });
        } else {
            "Marketing Plan"
        };
        Ok(label.to_string())
    }
}

fn write(root: &Path, rel: &str, body: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

fn archive() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "inv-001.pdf", b"inv1");
    write(dir.path(), "mail/bill-002.pdf", b"bill2");
    write(dir.path(), "report-q2.docx", b"r2");
    write(dir.path(), "q3.xlsx", b"q3");
    write(dir.path(), "photos/beach.jpg", b"jpg");
    write(dir.path(), "plan.pptx", b"plan");
    write(dir.path(), "corrupt.bin", b"??");
    dir
}

#[test]
fn organize_end_to_end_with_content_labels() {
    let src = archive();
    let dest = tempfile::tempdir().unwrap();
    let gate = RunGate::new();

    let report = organize_with_gate(
        &gate,
        src.path(),
        dest.path(),
        &KeywordClassifier,
        SynonymDictionary::builtin(),
    )
    .unwrap();

    assert_eq!(report.files, 7);
    assert_eq!(report.raw_labels, 7);
    assert!(report.materialized.failures.is_empty());
    assert_eq!(report.materialized.copied, 7);

    let names: Vec<&str> = report.categories.iter().map(|c| c.name.as_str()).collect();
    assert!(names.contains(&"Invoices"));
    assert!(names.contains(&"Quarterly Sales Report"));
    assert!(names.contains(&"Images"));
    assert!(names.contains(&"Error_Processing"));
    assert!(!names.contains(&"invoices"));
    assert!(!names.contains(&"Sales Report"));

    let out = dest.path();
    assert_eq!(fs::read(out.join("Invoices/inv-001.pdf")).unwrap(), b"inv1");
    assert_eq!(fs::read(out.join("Invoices/bill-002.pdf")).unwrap(), b"bill2");
    assert!(out.join("Quarterly Sales Report/report-q2.docx").exists());
    assert!(out.join("Quarterly Sales Report/q3.xlsx").exists());
    assert!(out.join("Images/beach.jpg").exists());
    assert!(out.join("Error_Processing/corrupt.bin").exists());
    assert!(!gate.is_busy());
}

#[test]
fn organize_with_fallback_labels() {
    let src = tempfile::tempdir().unwrap();
    write(src.path(), "a.png", b"a");
    write(src.path(), "receipt_scan.jpg", b"r");
    write(src.path(), "Screenshot 1.png", b"s");
    write(src.path(), "budget.xlsx", b"b");
    write(src.path(), "deck.pptx", b"d");
    let dest = tempfile::tempdir().unwrap();

    let report = organize_with_gate(
        &RunGate::new(),
        src.path(),
        dest.path(),
        &ExtensionClassifier,
        SynonymDictionary::builtin(),
    )
    .unwrap();

    let images = report
        .categories
        .iter()
        .find(|c| c.name == "Images")
        .unwrap();
    assert_eq!(images.paths, vec!["a.png", "receipt_scan.jpg"]);
    assert!(dest.path().join("Screenshot/Screenshot 1.png").exists());
    assert!(dest.path().join("Spreadsheet/budget.xlsx").exists());
    assert!(dest.path().join("Presentation/deck.pptx").exists());
}

#[test]
fn classify_tree_is_deterministic() {
    let src = archive();
    let first = classify_tree(src.path(), &KeywordClassifier).unwrap();
    let second = classify_tree(src.path(), &KeywordClassifier).unwrap();
    assert_eq!(first.entries(), second.entries());
    assert_eq!(first.path_count(), 7);
}

#[test]
fn missing_source_file_does_not_abort_batch() {
    use nu_plugin_catmerge::algo::ConsolidatedCategory;
    use nu_plugin_catmerge::pipeline::materialize;

    let src = archive();
    let dest = tempfile::tempdir().unwrap();
    let categories = vec![ConsolidatedCategory {
        name: "Invoices".into(),
        paths: vec!["gone.pdf".into(), "inv-001.pdf".into()],
    }];
    let report = materialize(&categories, src.path(), dest.path()).unwrap();
    assert_eq!(report.copied, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, "gone.pdf");
}

#[test]
fn repeated_runs_into_nested_output_do_not_reclassify_it() {
    let src = tempfile::tempdir().unwrap();
    write(src.path(), "a.pdf", b"a");
    let dest = src.path().join("organized");

    for _ in 0..3 {
        let report = organize_with_gate(
            &RunGate::new(),
            src.path(),
            &dest,
            &ExtensionClassifier,
            SynonymDictionary::builtin(),
        )
        .unwrap();
        assert_eq!(report.files, 1);
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].paths, vec!["a.pdf"]);
    }
    assert!(dest.join("PDF Document/a.pdf").exists());
}

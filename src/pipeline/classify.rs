use std::path::Path;

use crate::error::Result;

/// Label for files no rule recognizes.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Label given to a file whose classification failed.
pub const ERROR_PROCESSING: &str = "Error_Processing";

/// Assigns a free-form category label to one file.
///
/// Implemented by the extension fallback below; a content classifier (an
/// external model call, say) plugs in here too. Errors are turned into the
/// `Error_Processing` label by the walker, never into a failed run.
pub trait Classify: Send + Sync {
    fn classify(&self, path: &Path) -> Result<String>;
}

/// File-type fallback: labels from the extension and a few file-name hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionClassifier;

impl Classify for ExtensionClassifier {
    fn classify(&self, path: &Path) -> Result<String> {
        Ok(fallback_label(path).to_string())
    }
}

/// Extension-based label for `path`.
pub fn fallback_label(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tif" | "tiff" | "webp" | "heic" | "svg" => {
            image_label(&stem)
        }
        "xls" | "xlsx" | "xlsm" | "csv" | "ods" | "numbers" => "Spreadsheet",
        "ppt" | "pptx" | "key" | "odp" => "Presentation",
        "doc" | "docx" | "odt" | "rtf" => "Word Document",
        "pdf" => "PDF Document",
        "txt" | "md" => "Text Document",
        "mp3" | "wav" | "flac" | "m4a" | "ogg" => "Audio",
        "mp4" | "mov" | "avi" | "mkv" | "webm" => "Video",
        _ => UNCATEGORIZED,
    }
}

fn image_label(stem: &str) -> &'static str {
    if stem.contains("screenshot") || stem.contains("screen shot") {
        "Screenshot"
    } else if stem.contains("receipt") || stem.contains("invoice") {
        "Receipt/Invoice Image"
    } else {
        "Image"
    }
}

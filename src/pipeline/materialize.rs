use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use unicode_segmentation::UnicodeSegmentation;

use crate::algo::ConsolidatedCategory;
use crate::error::{CatmergeError, Result};
use crate::pipeline::classify::UNCATEGORIZED;

/// Longest folder name we create, in grapheme clusters.
const MAX_FOLDER_GRAPHEMES: usize = 100;

/// A file that could not be placed into its bucket.
#[derive(Debug, Clone, Serialize)]
pub struct CopyFailure {
    pub bucket: String,
    pub path: String,
    pub error: String,
}

/// Per-bucket outcome.
#[derive(Debug, Clone, Serialize)]
pub struct BucketReport {
    pub name: String,
    pub folder: String,
    pub copied: usize,
}

/// Outcome of copying a consolidated mapping into folders.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterializeReport {
    pub buckets: Vec<BucketReport>,
    pub copied: usize,
    pub failures: Vec<CopyFailure>,
}

/// Turn a bucket name into a safe single path component.
///
/// Path separators and characters Windows rejects become `-`, control
/// characters are dropped, surrounding dots and spaces are trimmed, and the
/// result is cut to a bounded number of graphemes. Nothing left means
/// `Uncategorized`.
pub fn folder_name(bucket: &str) -> String {
    let cleaned: String = bucket
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            other => other,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let truncated: String = trimmed.graphemes(true).take(MAX_FOLDER_GRAPHEMES).collect();
    let truncated = truncated.trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    if truncated.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        truncated.to_string()
    }
}

/// Claim a folder for a bucket, suffixing ` (n)` when another bucket of this
/// run already sanitized to the same name. Compared case-insensitively so
/// case-folding filesystems keep buckets apart too.
fn unique_folder(bucket: &str, used: &mut HashSet<String>) -> String {
    let base = folder_name(bucket);
    if used.insert(base.to_lowercase()) {
        return base;
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{base} ({n})");
        if used.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

/// Pick a destination inside `dir` for `file_name` that neither exists on disk
/// nor was handed out earlier in this run: `name.ext`, `name (1).ext`, ...
fn unique_destination(dir: &Path, file_name: &str, taken: &mut HashSet<PathBuf>) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() && taken.insert(candidate.clone()) {
        return candidate;
    }

    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());

    let mut n = 1usize;
    loop {
        let name = match &ext {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        };
        let candidate = dir.join(name);
        if !candidate.exists() && taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Copy every file of every bucket from `source_root` into `dest_root/<bucket>/`.
///
/// Only failing to create `dest_root` itself is an error. A bucket folder that
/// cannot be created, or a single copy that fails, is logged and recorded in
/// the report; the rest of the batch still runs.
pub fn materialize(
    categories: &[ConsolidatedCategory],
    source_root: &Path,
    dest_root: &Path,
) -> Result<MaterializeReport> {
    fs::create_dir_all(dest_root).map_err(|e| CatmergeError::io(dest_root, e))?;

    let mut report = MaterializeReport::default();
    let mut taken: HashSet<PathBuf> = HashSet::new();
    let mut folders: HashSet<String> = HashSet::new();

    for category in categories {
        let folder = unique_folder(&category.name, &mut folders);
        let dir = dest_root.join(&folder);
        let mut bucket = BucketReport {
            name: category.name.clone(),
            folder,
            copied: 0,
        };

        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!(bucket = %category.name, error = %e, "cannot create bucket folder");
            for path in &category.paths {
                report.failures.push(CopyFailure {
                    bucket: category.name.clone(),
                    path: path.clone(),
                    error: e.to_string(),
                });
            }
            report.buckets.push(bucket);
            continue;
        }

        for path in &category.paths {
            match copy_one(source_root, path, &dir, &mut taken) {
                Ok(dest) => {
                    tracing::debug!(%path, dest = %dest.display(), "copied");
                    bucket.copied += 1;
                }
                Err(error) => {
                    tracing::warn!(bucket = %category.name, %path, %error, "copy failed");
                    report.failures.push(CopyFailure {
                        bucket: category.name.clone(),
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        report.copied += bucket.copied;
        report.buckets.push(bucket);
    }

    tracing::info!(
        buckets = report.buckets.len(),
        copied = report.copied,
        failed = report.failures.len(),
        "materialized categories"
    );
    Ok(report)
}

fn copy_one(
    source_root: &Path,
    path: &str,
    dir: &Path,
    taken: &mut HashSet<PathBuf>,
) -> std::result::Result<PathBuf, String> {
    let src = source_root.join(path);
    let file_name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| format!("'{path}' has no file name"))?;
    let dest = unique_destination(dir, &file_name, taken);
    fs::copy(&src, &dest).map_err(|e| e.to_string())?;
    Ok(dest)
}

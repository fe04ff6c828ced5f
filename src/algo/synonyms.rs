use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::algo::normalize::normalize_label;
use crate::error::{CatmergeError, Result};

/// Embedded default dictionary, compiled from `dictionaries/synonyms.json`.
/// Users override by placing a file at `$XDG_DATA_HOME/catmerge/synonyms.json`,
/// setting `$CATMERGE_SYNONYMS`, or passing `--synonyms <path>`.
const EMBEDDED_DEFAULT: &str = include_str!("../../dictionaries/synonyms.json");

/// Environment variable naming a synonym dictionary file.
pub const SYNONYMS_ENV: &str = "CATMERGE_SYNONYMS";

static BUILTIN: LazyLock<SynonymDictionary> = LazyLock::new(|| {
    SynonymDictionary::parse(EMBEDDED_DEFAULT).expect("embedded synonym dictionary is invalid")
});

/// A set of interchangeable domain terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub name: String,
    pub words: BTreeSet<String>,
}

impl SynonymGroup {
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// True if any of `words` belongs to this group.
    pub fn touches(&self, words: &BTreeSet<String>) -> bool {
        words.iter().any(|w| self.words.contains(w))
    }
}

/// Ordered, read-only collection of synonym groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymDictionary {
    pub name: String,
    pub version: String,
    pub groups: Vec<SynonymGroup>,
}

impl SynonymDictionary {
    /// The compiled-in dictionary, parsed once per process.
    pub fn builtin() -> &'static SynonymDictionary {
        &BUILTIN
    }

    /// Parse a dictionary from JSON. Words are normalized the same way labels
    /// are, so `"Invoice"` in a user file still matches `"invoice"`.
    pub fn parse(json: &str) -> Result<Self> {
        let mut dict: SynonymDictionary = serde_json::from_str(json)?;
        for group in &mut dict.groups {
            group.words = group
                .words
                .iter()
                .map(|w| normalize_label(w))
                .filter(|w| !w.is_empty())
                .collect();
            if group.words.is_empty() {
                return Err(CatmergeError::InvalidDictionary(format!(
                    "group '{}' has no words",
                    group.name
                )));
            }
        }
        Ok(dict)
    }

    /// Load a dictionary from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| CatmergeError::io(path, e))?;
        Self::parse(&json)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SynonymGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Resolve the dictionary for a run.
///
/// 1. `explicit` path (errors are returned, not swallowed)
/// 2. `$CATMERGE_SYNONYMS`
/// 3. `$XDG_DATA_HOME/catmerge/synonyms.json` (or `~/.local/share/...`)
/// 4. Embedded default
///
/// Steps 2 and 3 fall through to the next step on any failure.
pub fn resolve_dictionary(explicit: Option<&Path>) -> Result<SynonymDictionary> {
    let env_path = std::env::var_os(SYNONYMS_ENV).map(PathBuf::from);
    resolve_from(explicit, env_path.as_deref(), xdg_dictionary_path().as_deref())
}

/// [`resolve_dictionary`] over already-located candidate files.
pub fn resolve_from(
    explicit: Option<&Path>,
    env_path: Option<&Path>,
    user_path: Option<&Path>,
) -> Result<SynonymDictionary> {
    if let Some(path) = explicit {
        return SynonymDictionary::load(path);
    }

    if let Some(path) = env_path {
        match SynonymDictionary::load(path) {
            Ok(dict) => {
                tracing::debug!(path = %path.display(), "using synonym dictionary from {SYNONYMS_ENV}");
                return Ok(dict);
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring {SYNONYMS_ENV}"),
        }
    }

    if let Some(path) = user_path.filter(|p| p.exists()) {
        match SynonymDictionary::load(path) {
            Ok(dict) => {
                tracing::debug!(path = %path.display(), "using user synonym dictionary");
                return Ok(dict);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring user synonym dictionary")
            }
        }
    }

    Ok(SynonymDictionary::builtin().clone())
}

/// Return the XDG data path for the catmerge synonym dictionary.
fn xdg_dictionary_path() -> Option<PathBuf> {
    let data_home = std::env::var("XDG_DATA_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".local/share"))
        })?;
    Some(data_home.join("catmerge/synonyms.json"))
}

/// Return the embedded default dictionary as a JSON string.
/// Useful for exporting a user-editable copy.
pub fn embedded_default_json() -> &'static str {
    EMBEDDED_DEFAULT
}

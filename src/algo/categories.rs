use serde::Serialize;
use std::collections::HashMap;

/// One distinct raw label produced upstream, with the files it was given to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawCategoryEntry {
    pub label: String,
    pub paths: Vec<String>,
}

/// Ordered raw `{label → paths}` mapping. One entry per distinct label,
/// kept in first-seen order; later paths for a known label are appended.
#[derive(Debug, Clone, Default)]
pub struct RawCategories {
    entries: Vec<RawCategoryEntry>,
    index: HashMap<String, usize>,
}

impl RawCategories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` under `label`.
    pub fn push(&mut self, label: impl Into<String>, path: impl Into<String>) {
        let label = label.into();
        let path = path.into();
        match self.index.get(&label) {
            Some(&i) => self.entries[i].paths.push(path),
            None => {
                self.index.insert(label.clone(), self.entries.len());
                self.entries.push(RawCategoryEntry {
                    label,
                    paths: vec![path],
                });
            }
        }
    }

    /// Record several paths under `label`. An empty `paths` list records nothing,
    /// so every stored entry keeps at least one path.
    pub fn extend<I, S>(&mut self, label: &str, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            self.push(label, path);
        }
    }

    pub fn entries(&self) -> &[RawCategoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of paths across all labels.
    pub fn path_count(&self) -> usize {
        self.entries.iter().map(|e| e.paths.len()).sum()
    }

    pub fn into_entries(self) -> Vec<RawCategoryEntry> {
        self.entries
    }
}

impl<L, P> FromIterator<(L, P)> for RawCategories
where
    L: Into<String>,
    P: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (L, P)>>(iter: T) -> Self {
        let mut raw = RawCategories::new();
        for (label, path) in iter {
            raw.push(label, path);
        }
        raw
    }
}

/// Final output unit: one bucket name and the files routed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidatedCategory {
    pub name: String,
    pub paths: Vec<String>,
}

use std::collections::BTreeSet;

/// Minimum character count (exclusive) for a token to count as a significant word.
const MIN_WORD_CHARS: usize = 2;

/// Normalize a raw category label for comparison.
///
/// Lowercases, spells `&` as "and", turns every character that is not a
/// letter, digit, or whitespace into a space, then collapses whitespace runs
/// and trims. Never fails; pure punctuation normalizes to "".
pub fn normalize_label(label: &str) -> String {
    let lower = label.to_lowercase().replace('&', " and ");
    let spaced: String = lower
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    spaced.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Significant words of an already-normalized label: tokens longer than two characters.
pub fn significant_words(normalized: &str) -> BTreeSet<String> {
    normalized
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_WORD_CHARS)
        .map(str::to_string)
        .collect()
}

/// Derived comparison form of a label. Computed once per entry per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedForm {
    pub normalized: String,
    pub words: BTreeSet<String>,
}

impl NormalizedForm {
    pub fn of(label: &str) -> Self {
        let normalized = normalize_label(label);
        let words = significant_words(&normalized);
        Self { normalized, words }
    }
}

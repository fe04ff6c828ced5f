use serde::Serialize;
use std::collections::BTreeSet;

use crate::algo::categories::RawCategoryEntry;
use crate::algo::normalize::NormalizedForm;
use crate::algo::synonyms::SynonymDictionary;

/// Which rule placed an entry into its cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// The entry opened the cluster.
    Seed,
    /// Same normalized label as the seed.
    Exact,
    /// Two or more shared significant words, or one side's words are a subset of the other's.
    WordOverlap,
    /// Both sides use a word from the same synonym group and share a non-synonym word.
    SynonymBridge,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Exact => "exact",
            Self::WordOverlap => "word_overlap",
            Self::SynonymBridge => "synonym_bridge",
        }
    }
}

/// One member of a cluster: an index into the input entries and the rule that admitted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub entry: usize,
    pub rule: MatchRule,
}

/// A partition cell. Members reference entries by index; the first member is the seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster<'a> {
    pub members: Vec<Member>,
    pub primary_name: &'a str,
}

impl<'a> Cluster<'a> {
    pub fn seed(&self) -> usize {
        self.members[0].entry
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Test a candidate `other` against a cluster `seed`, returning the first rule that holds.
///
/// Rules are evaluated in order: exact, word overlap, synonym bridge.
pub fn match_rule(
    seed: &NormalizedForm,
    other: &NormalizedForm,
    dictionary: &SynonymDictionary,
) -> Option<MatchRule> {
    if seed.normalized == other.normalized {
        return Some(MatchRule::Exact);
    }
    if words_overlap(&seed.words, &other.words) {
        return Some(MatchRule::WordOverlap);
    }
    if synonym_bridge(&seed.words, &other.words, dictionary) {
        return Some(MatchRule::SynonymBridge);
    }
    None
}

fn words_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    let shared = a.intersection(b).count();
    shared >= 2 || (shared > 0 && (shared == a.len() || shared == b.len()))
}

fn synonym_bridge(a: &BTreeSet<String>, b: &BTreeSet<String>, dictionary: &SynonymDictionary) -> bool {
    dictionary.iter().any(|group| {
        group.touches(a)
            && group.touches(b)
            && a
                .iter()
                .filter(|w| !group.contains(w))
                .any(|w| b.contains(w))
    })
}

/// Partition raw entries with a single seed-then-absorb pass.
///
/// Each ungrouped entry, in input order, seeds a cluster and absorbs every later
/// ungrouped entry that matches the seed. Candidates are compared against the seed
/// only, never against other members or already-closed clusters, so chains
/// A~B, B~C with A!~C can end up split. The primary name is the longest absorbed
/// label by character count; ties keep the earlier one.
pub fn cluster_entries<'a>(
    entries: &'a [RawCategoryEntry],
    dictionary: &SynonymDictionary,
) -> Vec<Cluster<'a>> {
    let forms: Vec<NormalizedForm> = entries.iter().map(|e| NormalizedForm::of(&e.label)).collect();
    let mut grouped = vec![false; entries.len()];
    let mut clusters = Vec::new();

    for i in 0..entries.len() {
        if grouped[i] {
            continue;
        }
        grouped[i] = true;

        let mut cluster = Cluster {
            members: vec![Member {
                entry: i,
                rule: MatchRule::Seed,
            }],
            primary_name: entries[i].label.as_str(),
        };
        let mut primary_len = cluster.primary_name.chars().count();

        for j in (i + 1)..entries.len() {
            if grouped[j] {
                continue;
            }
            let Some(rule) = match_rule(&forms[i], &forms[j], dictionary) else {
                continue;
            };
            grouped[j] = true;
            cluster.members.push(Member { entry: j, rule });

            let label = entries[j].label.as_str();
            let len = label.chars().count();
            if len > primary_len {
                cluster.primary_name = label;
                primary_len = len;
            }
        }

        clusters.push(cluster);
    }

    clusters
}

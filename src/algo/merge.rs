use std::collections::HashMap;

use crate::algo::categories::{ConsolidatedCategory, RawCategoryEntry};
use crate::algo::clustering::{cluster_entries, Cluster};
use crate::algo::naming::route_cluster;
use crate::algo::synonyms::SynonymDictionary;

/// Merge each cluster's member path lists into output buckets.
///
/// Buckets appear in order of first use. Paths are appended in member order,
/// never replaced or deduplicated, since several clusters (or the image
/// override) can land on the same bucket name.
pub fn merge_clusters(
    clusters: &[Cluster<'_>],
    entries: &[RawCategoryEntry],
) -> Vec<ConsolidatedCategory> {
    let mut output: Vec<ConsolidatedCategory> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for cluster in clusters {
        for route in route_cluster(cluster, entries) {
            let slot = match index.get(route.bucket) {
                Some(&i) => i,
                None => {
                    index.insert(route.bucket.to_string(), output.len());
                    output.push(ConsolidatedCategory {
                        name: route.bucket.to_string(),
                        paths: Vec::new(),
                    });
                    output.len() - 1
                }
            };
            output[slot]
                .paths
                .extend(entries[route.entry].paths.iter().cloned());
        }
    }

    output
}

/// Consolidate raw labels: cluster, name, and merge in one call.
pub fn consolidate(
    entries: &[RawCategoryEntry],
    dictionary: &SynonymDictionary,
) -> Vec<ConsolidatedCategory> {
    let clusters = cluster_entries(entries, dictionary);
    tracing::debug!(
        labels = entries.len(),
        clusters = clusters.len(),
        "clustered category labels"
    );
    merge_clusters(&clusters, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::categories::RawCategories;

    fn consolidate_pairs(pairs: &[(&str, &str)]) -> Vec<ConsolidatedCategory> {
        let raw: RawCategories = pairs.iter().copied().collect();
        consolidate(raw.entries(), SynonymDictionary::builtin())
    }

    fn bucket<'a>(out: &'a [ConsolidatedCategory], name: &str) -> Option<&'a ConsolidatedCategory> {
        out.iter().find(|c| c.name == name)
    }

    #[test]
    fn merges_near_duplicate_labels() {
        let out = consolidate_pairs(&[
            ("Invoice", "a.pdf"),
            ("invoice", "b.pdf"),
            ("Sales Report", "c.xlsx"),
            ("Quarterly Sales Report", "d.xlsx"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Invoice");
        assert_eq!(out[0].paths, vec!["a.pdf", "b.pdf"]);
        assert_eq!(out[1].name, "Quarterly Sales Report");
        assert_eq!(out[1].paths, vec!["c.xlsx", "d.xlsx"]);
    }

    #[test]
    fn every_path_survives_exactly_once() {
        let pairs = [
            ("Invoice_2024", "1"),
            ("Receipt_2024", "2"),
            ("Receipt_2025", "3"),
            ("Vacation Photo", "4"),
            ("Report", "5"),
            ("Annual Report", "6"),
            ("Report", "7"),
            ("", "8"),
            ("Error_Processing", "9"),
        ];
        let out = consolidate_pairs(&pairs);
        let mut paths: Vec<&str> = out
            .iter()
            .flat_map(|c| c.paths.iter().map(String::as_str))
            .collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
    }

    #[test]
    fn duplicate_paths_are_not_deduplicated() {
        let out = consolidate_pairs(&[("Invoice", "x.pdf"), ("invoice", "x.pdf")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].paths, vec!["x.pdf", "x.pdf"]);
    }

    #[test]
    fn image_clusters_share_the_images_bucket() {
        let out = consolidate_pairs(&[
            ("Vacation Photo", "beach.jpg"),
            ("Tax Forms", "w2.pdf"),
            ("Image", "logo.png"),
        ]);
        let images = bucket(&out, "Images").unwrap();
        assert_eq!(images.paths, vec!["beach.jpg", "logo.png"]);
        assert_eq!(bucket(&out, "Tax Forms").unwrap().paths, vec!["w2.pdf"]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn image_member_split_from_its_cluster() {
        let out = consolidate_pairs(&[
            ("Scanned Receipts Collection", "r1.pdf"),
            ("Receipts png Scanned", "r2.png"),
            ("scanned receipts collection", "r3.pdf"),
        ]);
        assert_eq!(
            bucket(&out, "Scanned Receipts Collection").unwrap().paths,
            vec!["r1.pdf", "r3.pdf"]
        );
        assert_eq!(bucket(&out, "Images").unwrap().paths, vec!["r2.png"]);
    }

    #[test]
    fn repeated_raw_labels_concatenate_in_order() {
        let entries = vec![
            RawCategoryEntry {
                label: "Reports".into(),
                paths: vec!["a".into()],
            },
            RawCategoryEntry {
                label: "Reports".into(),
                paths: vec!["b".into()],
            },
        ];
        let out = consolidate(&entries, SynonymDictionary::builtin());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].paths, vec!["a", "b"]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(consolidate(&[], SynonymDictionary::builtin()).is_empty());
    }
}

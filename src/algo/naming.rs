use regex::Regex;
use std::sync::LazyLock;

use crate::algo::categories::RawCategoryEntry;
use crate::algo::clustering::Cluster;
use crate::algo::normalize::normalize_label;

/// Bucket that image-like labels are forced into.
pub const IMAGES_BUCKET: &str = "Images";

/// Terms that mark a label as image content.
pub const IMAGE_TERMS: &[&str] = &[
    "image",
    "photo",
    "picture",
    "graphic",
    "svg",
    "scalable vector graphic",
    "png",
    "jpg",
    "jpeg",
    "gif",
    "bmp",
    "tiff",
    "webp",
];

static IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = IMAGE_TERMS
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<String>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("image term pattern is valid")
});

/// True if `label` names image content.
///
/// Matching runs on the normalized label so `_` and `.` separate words:
/// `Document_Screenshot.png_batch` matches on `png`, `Photos` does not match `photo`.
pub fn is_image_label(label: &str) -> bool {
    IMAGE_PATTERN.is_match(&normalize_label(label))
}

/// Where one member's files go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route<'a> {
    pub entry: usize,
    pub bucket: &'a str,
}

/// The cluster's default bucket: its primary name, or `Images` when that name is image-like.
pub fn default_bucket<'a>(cluster: &Cluster<'a>) -> &'a str {
    if is_image_label(cluster.primary_name) {
        IMAGES_BUCKET
    } else {
        cluster.primary_name
    }
}

/// Route every member of a finished cluster to its output bucket.
///
/// Image-labeled members always go to `Images`, whatever the cluster is called.
pub fn route_cluster<'a>(cluster: &Cluster<'a>, entries: &'a [RawCategoryEntry]) -> Vec<Route<'a>> {
    let fallback = default_bucket(cluster);
    cluster
        .members
        .iter()
        .map(|m| {
            let bucket = if is_image_label(&entries[m.entry].label) {
                IMAGES_BUCKET
            } else {
                fallback
            };
            Route {
                entry: m.entry,
                bucket,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::clustering::{MatchRule, Member};

    fn entry(label: &str) -> RawCategoryEntry {
        RawCategoryEntry {
            label: label.into(),
            paths: vec![format!("{label}.bin")],
        }
    }

    fn cluster_of<'a>(entries: &'a [RawCategoryEntry], primary: usize) -> Cluster<'a> {
        Cluster {
            members: (0..entries.len())
                .map(|entry| Member {
                    entry,
                    rule: if entry == 0 {
                        MatchRule::Seed
                    } else {
                        MatchRule::WordOverlap
                    },
                })
                .collect(),
            primary_name: entries[primary].label.as_str(),
        }
    }

    #[test]
    fn image_terms_match_case_insensitively() {
        assert!(is_image_label("Vacation Photo"));
        assert!(is_image_label("IMAGE"));
        assert!(is_image_label("Receipt/Invoice Image"));
        assert!(is_image_label("Scalable Vector Graphic files"));
        assert!(is_image_label("logo.SVG"));
        assert!(is_image_label("Document_Screenshot.png_batch"));
    }

    #[test]
    fn image_terms_need_word_boundaries() {
        assert!(!is_image_label("Photos"));
        assert!(!is_image_label("Photography Contracts"));
        assert!(!is_image_label("Graphics"));
        assert!(!is_image_label("Screenshot"));
        assert!(!is_image_label("Scanned Documents"));
        assert!(!is_image_label(""));
    }

    #[test]
    fn image_primary_name_sends_cluster_to_images() {
        let entries = vec![entry("Vacation Photo")];
        let cluster = cluster_of(&entries, 0);
        assert_eq!(default_bucket(&cluster), IMAGES_BUCKET);
        let routes = route_cluster(&cluster, &entries);
        assert_eq!(routes, vec![Route { entry: 0, bucket: IMAGES_BUCKET }]);
    }

    #[test]
    fn image_member_is_diverted_from_non_image_cluster() {
        let entries = vec![
            entry("Scanned Documents"),
            entry("Document_Screenshot.png_batch"),
            entry("Scanned Document Pages"),
        ];
        let cluster = cluster_of(&entries, 0);
        let routes = route_cluster(&cluster, &entries);
        assert_eq!(routes[0].bucket, "Scanned Documents");
        assert_eq!(routes[1].bucket, IMAGES_BUCKET);
        assert_eq!(routes[2].bucket, "Scanned Documents");
    }

    #[test]
    fn non_image_members_of_image_cluster_follow_images() {
        let entries = vec![entry("Product Photo Catalog"), entry("Catalog")];
        let cluster = cluster_of(&entries, 0);
        let routes = route_cluster(&cluster, &entries);
        assert!(routes.iter().all(|r| r.bucket == IMAGES_BUCKET));
    }
}

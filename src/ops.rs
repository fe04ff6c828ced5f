//! Shared operation wrappers for all interfaces (CLI, plugin).
//!
//! Each `op_*` function wraps one or more `algo`/`pipeline` calls. Input and
//! output are `serde_json::Value`, so nothing here depends on clap or
//! nu-plugin. Category mappings are JSON objects `{label: [path, ...]}` whose
//! key order is the input order.

use serde_json::{json, Map, Value};
use std::path::Path;

use crate::algo::clustering::cluster_entries;
use crate::algo::naming::{default_bucket, route_cluster};
use crate::algo::normalize::NormalizedForm;
use crate::algo::synonyms::{self, SynonymDictionary};
use crate::algo::{consolidate, ConsolidatedCategory, RawCategories};
use crate::pipeline::{self, ExtensionClassifier};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Parse a `{label: [paths]}` object into raw categories.
///
/// A bare string value counts as a single path. Labels with an empty path
/// list carry no files and are dropped.
pub fn parse_mapping(value: &Value) -> Result<RawCategories, String> {
    let obj = value
        .as_object()
        .ok_or("Expected a JSON object mapping category labels to file paths")?;

    let mut raw = RawCategories::new();
    for (label, paths) in obj {
        match paths {
            Value::String(path) => raw.push(label.as_str(), path.as_str()),
            Value::Array(items) => {
                for item in items {
                    let path = item.as_str().ok_or_else(|| {
                        format!("Category '{label}' contains a non-string path: {item}")
                    })?;
                    raw.push(label.as_str(), path);
                }
            }
            other => {
                return Err(format!(
                    "Category '{label}' must map to a list of paths, got {other}"
                ))
            }
        }
    }
    Ok(raw)
}

/// Render consolidated categories as an ordered `{bucket: [paths]}` object.
pub fn mapping_to_json(categories: &[ConsolidatedCategory]) -> Value {
    let mut obj = Map::new();
    for category in categories {
        obj.insert(category.name.clone(), json!(category.paths));
    }
    Value::Object(obj)
}

fn raw_to_json(raw: &RawCategories) -> Value {
    let mut obj = Map::new();
    for entry in raw.entries() {
        obj.insert(entry.label.clone(), json!(entry.paths));
    }
    Value::Object(obj)
}

// ── Operations ───────────────────────────────────────────────────────────────

pub fn op_normalize(label: &str) -> Value {
    let form = NormalizedForm::of(label);
    json!({
        "label": label,
        "normalized": form.normalized,
        "words": form.words.into_iter().collect::<Vec<String>>(),
    })
}

pub fn op_consolidate(mapping: &Value, dictionary: &SynonymDictionary) -> Result<Value, String> {
    let raw = parse_mapping(mapping)?;
    let categories = consolidate(raw.entries(), dictionary);
    Ok(mapping_to_json(&categories))
}

/// Cluster-by-cluster view: primary name, default bucket, and for every member
/// the rule that admitted it and where its files went.
pub fn op_explain(mapping: &Value, dictionary: &SynonymDictionary) -> Result<Value, String> {
    let raw = parse_mapping(mapping)?;
    let entries = raw.entries();
    let clusters = cluster_entries(entries, dictionary);

    let output: Vec<Value> = clusters
        .iter()
        .map(|cluster| {
            let members: Vec<Value> = cluster
                .members
                .iter()
                .zip(route_cluster(cluster, entries))
                .map(|(member, route)| {
                    let entry = &entries[member.entry];
                    json!({
                        "label": entry.label,
                        "rule": member.rule.as_str(),
                        "bucket": route.bucket,
                        "paths": entry.paths,
                    })
                })
                .collect();
            json!({
                "primary_name": cluster.primary_name,
                "bucket": default_bucket(cluster),
                "members": members,
            })
        })
        .collect();

    Ok(Value::Array(output))
}

pub fn op_classify(dir: &str) -> Result<Value, String> {
    let raw = pipeline::classify_tree(Path::new(dir), &ExtensionClassifier)
        .map_err(|e| e.to_string())?;
    Ok(raw_to_json(&raw))
}

/// Materialize an already-consolidated mapping `{bucket: [paths]}` from
/// `source` into `dest` without re-clustering.
pub fn op_materialize(mapping: &Value, source: &str, dest: &str) -> Result<Value, String> {
    let raw = parse_mapping(mapping)?;
    let categories: Vec<ConsolidatedCategory> = raw
        .into_entries()
        .into_iter()
        .map(|e| ConsolidatedCategory {
            name: e.label,
            paths: e.paths,
        })
        .collect();
    let report = pipeline::materialize(&categories, Path::new(source), Path::new(dest))
        .map_err(|e| e.to_string())?;
    serde_json::to_value(report).map_err(|e| e.to_string())
}

pub fn op_organize(source: &str, dest: &str, dictionary: &SynonymDictionary) -> Result<Value, String> {
    let report = pipeline::organize(
        Path::new(source),
        Path::new(dest),
        &ExtensionClassifier,
        dictionary,
    )
    .map_err(|e| e.to_string())?;
    serde_json::to_value(report).map_err(|e| e.to_string())
}

pub fn op_dictionary(dictionary: &SynonymDictionary) -> Value {
    serde_json::to_value(dictionary).unwrap_or(Value::Null)
}

/// The embedded default dictionary as shipped, before word normalization.
pub fn op_default_dictionary() -> Result<Value, String> {
    serde_json::from_str(synonyms::embedded_default_json()).map_err(|e| e.to_string())
}

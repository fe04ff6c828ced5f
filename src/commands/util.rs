use nu_protocol::{LabeledError, PipelineData, Record, Span, Value};
use serde_json::{Map, Value as Json};
use std::path::PathBuf;

use crate::algo::synonyms::{resolve_dictionary, SynonymDictionary};

/// Normalize any PipelineData into a Vec<Value> of records.
///
/// Handles:
///   - Table (list of records) → pass through
///   - Single record → [record]
///   - List of strings → [{content: s1}, {content: s2}, ...]
///   - Single string → [{content: s}]
///   - Empty/Nothing → []
pub fn normalize_input(input: PipelineData, span: Span) -> Vec<Value> {
    match input {
        PipelineData::Value(value, _) => normalize_value(value, span),
        other => other
            .into_iter()
            .map(|v| match v {
                Value::Record { .. } => v,
                other => wrap_value(other, span),
            })
            .collect(),
    }
}

fn normalize_value(value: Value, span: Span) -> Vec<Value> {
    match value {
        Value::List { vals, .. } => vals
            .into_iter()
            .map(|v| match v {
                Value::Record { .. } => v,
                other => wrap_value(other, span),
            })
            .collect(),
        Value::Record { .. } => vec![value],
        Value::Nothing { .. } => vec![],
        other => vec![wrap_value(other, span)],
    }
}

/// Strings get `{content: s}`, everything else gets `{value: v}`.
fn wrap_value(v: Value, span: Span) -> Value {
    let mut record = Record::new();
    match &v {
        Value::String { .. } => record.push("content", v),
        _ => record.push("value", v),
    }
    Value::record(record, span)
}

/// Build the `{label: [paths]}` JSON mapping the ops layer expects.
///
/// A single record is read as the mapping itself. A table is read row by row,
/// taking the label from `label_field` and the path from `path_field`.
pub fn input_to_mapping(
    input: PipelineData,
    label_field: &str,
    path_field: &str,
    span: Span,
) -> Result<Json, LabeledError> {
    let value = input.into_value(span)?;
    match value {
        Value::Record { .. } => value_to_json(&value),
        Value::List { vals, .. } => {
            let mut mapping: Map<String, Json> = Map::new();
            for row in &vals {
                let label = row
                    .get_data_by_key(label_field)
                    .and_then(|v| v.coerce_string().ok())
                    .ok_or_else(|| missing_column(label_field, row.span()))?;
                let path = row
                    .get_data_by_key(path_field)
                    .and_then(|v| v.coerce_string().ok())
                    .ok_or_else(|| missing_column(path_field, row.span()))?;
                if let Json::Array(paths) = mapping
                    .entry(label)
                    .or_insert_with(|| Json::Array(Vec::new()))
                {
                    paths.push(Json::String(path));
                }
            }
            Ok(Json::Object(mapping))
        }
        Value::Nothing { .. } => Ok(Json::Object(Map::new())),
        other => Err(LabeledError::new("Expected a record or a table of files")
            .with_label("unsupported input", other.span())),
    }
}

fn missing_column(name: &str, span: Span) -> LabeledError {
    LabeledError::new(format!("Row has no string column '{name}'"))
        .with_label("in this row", span)
}

/// Convert a Nushell value into JSON, keeping record column order.
pub fn value_to_json(value: &Value) -> Result<Json, LabeledError> {
    Ok(match value {
        Value::Nothing { .. } => Json::Null,
        Value::Bool { val, .. } => Json::Bool(*val),
        Value::Int { val, .. } => Json::from(*val),
        Value::Float { val, .. } => serde_json::Number::from_f64(*val)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::String { val, .. } => Json::String(val.clone()),
        Value::List { vals, .. } => Json::Array(
            vals.iter()
                .map(value_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Record { val, .. } => {
            let mut obj = Map::new();
            for (k, v) in val.iter() {
                obj.insert(k.clone(), value_to_json(v)?);
            }
            Json::Object(obj)
        }
        other => Json::String(other.coerce_string().map_err(|e| {
            LabeledError::new(e.to_string()).with_label("cannot convert to JSON", other.span())
        })?),
    })
}

/// Convert JSON back into a Nushell value.
pub fn json_to_value(json: Json, span: Span) -> Value {
    match json {
        Json::Null => Value::nothing(span),
        Json::Bool(b) => Value::bool(b, span),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::int(i, span),
            None => Value::float(n.as_f64().unwrap_or_default(), span),
        },
        Json::String(s) => Value::string(s, span),
        Json::Array(items) => Value::list(
            items.into_iter().map(|j| json_to_value(j, span)).collect(),
            span,
        ),
        Json::Object(obj) => {
            let mut record = Record::new();
            for (k, v) in obj {
                record.push(k, json_to_value(v, span));
            }
            Value::record(record, span)
        }
    }
}

/// Resolve the synonym dictionary from an optional `--synonyms` flag.
pub fn dictionary_flag(path: Option<String>, span: Span) -> Result<SynonymDictionary, LabeledError> {
    resolve_dictionary(path.map(PathBuf::from).as_deref()).map_err(|e| {
        LabeledError::new(e.to_string()).with_label("while loading synonym dictionary", span)
    })
}

/// Lift an ops-layer error message into a labeled error at `span`.
pub fn op_error(message: String, span: Span) -> LabeledError {
    LabeledError::new(message).with_label("catmerge", span)
}

//! Reduction of resources and paginated list envelopes
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license
//!
//! A resource keeps its structural metadata verbatim, has its `properties`
//! map flattened through [`extract_property`], and has every other field
//! reduced recursively. A list envelope keeps its pagination fields and
//! reduces each entry of `results` as a resource.

use super::property::extract_property;
use serde_json::{Map, Value};

/// Metadata fields copied through verbatim on a resource
pub const METADATA_FIELDS: &[&str] = &[
    "object",
    "id",
    "type",
    "created_time",
    "last_edited_time",
    "created_by",
    "last_edited_by",
    "archived",
    "in_trash",
    "is_archived",
    "url",
    "public_url",
    "parent",
    "has_children",
    "next_cursor",
    "has_more",
];

/// Fields kept on a paginated list envelope besides `results`
pub const PAGINATION_FIELDS: &[&str] = &["next_cursor", "prev_cursor", "has_more", "type", "object"];

/// Resource-level field selection
pub type FieldSelection<'f> = Option<&'f [String]>;

/// Reduce any JSON value
///
/// `fields` applies to the resources found at this level: the value itself
/// when it is a resource object, the elements when it is an array, and the
/// `results` entries when it is a list envelope. Values nested inside a
/// resource are reduced without selection.
pub fn reduce_value(value: &Value, fields: FieldSelection<'_>) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| reduce_value(v, fields)).collect()),
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(results)) => reduce_envelope(map, results, fields),
            _ => reduce_resource(map, fields),
        },
        _ => value.clone(),
    }
}

fn reduce_envelope(map: &Map<String, Value>, results: &[Value], fields: FieldSelection<'_>) -> Value {
    let mut out = Map::new();
    for key in PAGINATION_FIELDS {
        if let Some(v) = map.get(*key) {
            out.insert((*key).to_string(), v.clone());
        }
    }
    let reduced: Vec<Value> = results
        .iter()
        .map(|item| match item {
            Value::Object(resource) => reduce_resource(resource, fields),
            other => reduce_value(other, None),
        })
        .collect();
    tracing::trace!(results = reduced.len(), "Reduced list envelope");
    out.insert("results".to_string(), Value::Array(reduced));
    Value::Object(out)
}

fn reduce_resource(map: &Map<String, Value>, fields: FieldSelection<'_>) -> Value {
    let mut out = Map::new();
    match fields {
        Some(selected) if !selected.is_empty() => {
            for name in selected {
                if let Some(v) = map.get(name.as_str()) {
                    out.insert(name.clone(), reduce_field(name, v));
                }
            }
        }
        _ => {
            for (name, v) in map {
                out.insert(name.clone(), reduce_field(name, v));
            }
        }
    }
    Value::Object(out)
}

fn reduce_field(name: &str, value: &Value) -> Value {
    if METADATA_FIELDS.contains(&name) {
        return value.clone();
    }
    if name == "properties" {
        if let Value::Object(properties) = value {
            return reduce_properties(properties);
        }
    }
    reduce_value(value, None)
}

fn reduce_properties(properties: &Map<String, Value>) -> Value {
    let reduced: Map<String, Value> = properties
        .iter()
        .map(|(name, prop)| (name.clone(), extract_property(prop)))
        .collect();
    tracing::trace!(properties = reduced.len(), "Extracted property values");
    Value::Object(reduced)
}

//! Minimal confirmation records for `success_only` mode
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use serde_json::{Map, Value};

const CARRIED_TIMESTAMPS: &[&str] = &["created_time", "last_edited_time"];

/// Collapse a payload into a confirmation record
pub fn summarize(value: &Value) -> Value {
    let mut out = Map::new();
    out.insert("success".to_string(), Value::Bool(true));

    match value {
        Value::Array(items) => {
            insert_count(&mut out, items.len());
        }
        Value::Object(map) => {
            if let Some(id) = map.get("id") {
                out.insert("id".to_string(), id.clone());
                for key in CARRIED_TIMESTAMPS {
                    if let Some(v) = map.get(*key) {
                        out.insert((*key).to_string(), v.clone());
                    }
                }
            }
            match map.get("results") {
                Some(Value::Array(results)) => insert_count(&mut out, results.len()),
                _ => {
                    out.insert(
                        "message".to_string(),
                        Value::String("Operation successful".to_string()),
                    );
                }
            }
        }
        _ => {}
    }

    Value::Object(out)
}

fn insert_count(out: &mut Map<String, Value>, count: usize) {
    out.insert("count".to_string(), Value::from(count));
    out.insert(
        "message".to_string(),
        Value::String(format!("Successfully processed {} item(s)", count)),
    );
}

//! Typed property values
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license
//!
//! The remote API encodes each property as an object with a `type`
//! discriminator and a payload stored under the key of the same name:
//!
//! ```json
//! { "id": "a1", "type": "select", "select": { "name": "Done", "color": "green" } }
//! ```
//!
//! [`PropertyValue::parse`] lifts that shape into a sum type with one variant
//! per known tag. Anything it does not recognize, including a known tag whose
//! payload is missing or has the wrong JSON type, becomes
//! [`PropertyValue::Unrecognized`] and is handed back untouched by
//! [`PropertyValue::extract`].

use serde_json::{json, Map, Value};

type Object = Map<String, Value>;

/// A single property value borrowed from a resource payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue<'a> {
    /// Title rich text fragments
    Title(&'a [Value]),
    /// Rich text fragments
    RichText(&'a [Value]),
    /// Selected option, `None` when unset
    Select(Option<&'a Object>),
    /// Selected options
    MultiSelect(&'a [Value]),
    /// Date range, `None` when unset
    Date(Option<&'a Object>),
    Number(&'a Value),
    Checkbox(&'a Value),
    Url(&'a Value),
    Email(&'a Value),
    PhoneNumber(&'a Value),
    /// Attached files, internally or externally hosted
    Files(&'a [Value]),
    /// Referenced people
    People(&'a [Value]),
    /// Cross-references to other resources
    Relation(&'a [Value]),
    /// Computed value
    Formula(&'a Object),
    /// Aggregated value
    Rollup(&'a Object),
    /// Status option, `None` when unset
    Status(Option<&'a Object>),
    CreatedTime(&'a Value),
    LastEditedTime(&'a Value),
    CreatedBy(&'a Object),
    LastEditedBy(&'a Object),
    /// Business identifier with optional prefix
    UniqueId(&'a Object),
    /// Geographic location
    Place(&'a Value),
    /// Unknown tag or unexpected payload shape; the whole property object
    Unrecognized(&'a Value),
}

impl<'a> PropertyValue<'a> {
    /// Classify a raw property object by its `type` discriminator
    pub fn parse(value: &'a Value) -> Self {
        let Some(tag) = value.get("type").and_then(Value::as_str) else {
            return PropertyValue::Unrecognized(value);
        };
        let Some(payload) = value.get(tag) else {
            return PropertyValue::Unrecognized(value);
        };

        let parsed = match tag {
            "title" => payload.as_array().map(|a| PropertyValue::Title(a.as_slice())),
            "rich_text" => payload
                .as_array()
                .map(|a| PropertyValue::RichText(a.as_slice())),
            "select" => nullable_object(payload).map(PropertyValue::Select),
            "multi_select" => payload
                .as_array()
                .map(|a| PropertyValue::MultiSelect(a.as_slice())),
            "date" => nullable_object(payload).map(PropertyValue::Date),
            "number" => Some(PropertyValue::Number(payload)),
            "checkbox" => Some(PropertyValue::Checkbox(payload)),
            "url" => Some(PropertyValue::Url(payload)),
            "email" => Some(PropertyValue::Email(payload)),
            "phone_number" => Some(PropertyValue::PhoneNumber(payload)),
            "files" => payload.as_array().map(|a| PropertyValue::Files(a.as_slice())),
            "people" => payload.as_array().map(|a| PropertyValue::People(a.as_slice())),
            "relation" => payload
                .as_array()
                .map(|a| PropertyValue::Relation(a.as_slice())),
            "formula" => payload.as_object().map(PropertyValue::Formula),
            "rollup" => payload.as_object().map(PropertyValue::Rollup),
            "status" => nullable_object(payload).map(PropertyValue::Status),
            "created_time" => Some(PropertyValue::CreatedTime(payload)),
            "last_edited_time" => Some(PropertyValue::LastEditedTime(payload)),
            "created_by" => payload.as_object().map(PropertyValue::CreatedBy),
            "last_edited_by" => payload.as_object().map(PropertyValue::LastEditedBy),
            "unique_id" => payload.as_object().map(PropertyValue::UniqueId),
            "place" => Some(PropertyValue::Place(payload)),
            _ => None,
        };

        parsed.unwrap_or_else(|| {
            tracing::trace!(tag, "Passing through unrecognized property value");
            PropertyValue::Unrecognized(value)
        })
    }

    /// The discriminator this value was parsed from, `None` when unrecognized
    pub fn tag(&self) -> Option<&'static str> {
        Some(match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::RichText(_) => "rich_text",
            PropertyValue::Select(_) => "select",
            PropertyValue::MultiSelect(_) => "multi_select",
            PropertyValue::Date(_) => "date",
            PropertyValue::Number(_) => "number",
            PropertyValue::Checkbox(_) => "checkbox",
            PropertyValue::Url(_) => "url",
            PropertyValue::Email(_) => "email",
            PropertyValue::PhoneNumber(_) => "phone_number",
            PropertyValue::Files(_) => "files",
            PropertyValue::People(_) => "people",
            PropertyValue::Relation(_) => "relation",
            PropertyValue::Formula(_) => "formula",
            PropertyValue::Rollup(_) => "rollup",
            PropertyValue::Status(_) => "status",
            PropertyValue::CreatedTime(_) => "created_time",
            PropertyValue::LastEditedTime(_) => "last_edited_time",
            PropertyValue::CreatedBy(_) => "created_by",
            PropertyValue::LastEditedBy(_) => "last_edited_by",
            PropertyValue::UniqueId(_) => "unique_id",
            PropertyValue::Place(_) => "place",
            PropertyValue::Unrecognized(_) => return None,
        })
    }

    /// Reduce the value to its semantic content
    pub fn extract(&self) -> Value {
        match *self {
            PropertyValue::Title(fragments) | PropertyValue::RichText(fragments) => {
                extract_rich_text(fragments)
            }
            PropertyValue::Select(option) | PropertyValue::Status(option) => option_name(option),
            PropertyValue::MultiSelect(options) => Value::Array(
                options
                    .iter()
                    .map(|o| o.get("name").cloned().unwrap_or(Value::Null))
                    .collect(),
            ),
            PropertyValue::Date(date) => extract_date(date),
            PropertyValue::Number(v)
            | PropertyValue::Checkbox(v)
            | PropertyValue::Url(v)
            | PropertyValue::Email(v)
            | PropertyValue::PhoneNumber(v)
            | PropertyValue::CreatedTime(v)
            | PropertyValue::LastEditedTime(v)
            | PropertyValue::Place(v) => v.clone(),
            PropertyValue::Files(files) => {
                Value::Array(files.iter().filter_map(extract_file).collect())
            }
            PropertyValue::People(people) => {
                Value::Array(people.iter().map(user_reference).collect())
            }
            PropertyValue::Relation(relations) => Value::Array(relations.to_vec()),
            PropertyValue::Formula(formula) => {
                first_present(formula, &["string", "number", "boolean", "date"])
            }
            PropertyValue::Rollup(rollup) => {
                if rollup.contains_key("incomplete") {
                    Value::Null
                } else {
                    first_present(rollup, &["number", "date", "array"])
                }
            }
            PropertyValue::CreatedBy(user) | PropertyValue::LastEditedBy(user) => {
                json!({
                    "id": user.get("id").cloned().unwrap_or(Value::Null),
                    "name": user.get("name").cloned().unwrap_or(Value::Null),
                })
            }
            PropertyValue::UniqueId(unique_id) => extract_unique_id(unique_id),
            PropertyValue::Unrecognized(raw) => raw.clone(),
        }
    }
}

/// Reduce a raw property object in one step
pub fn extract_property(value: &Value) -> Value {
    PropertyValue::parse(value).extract()
}

fn nullable_object(payload: &Value) -> Option<Option<&Object>> {
    match payload {
        Value::Null => Some(None),
        Value::Object(map) => Some(Some(map)),
        _ => None,
    }
}

fn option_name(option: Option<&Object>) -> Value {
    option
        .and_then(|o| o.get("name"))
        .cloned()
        .unwrap_or(Value::Null)
}

fn extract_rich_text(fragments: &[Value]) -> Value {
    let content: String = fragments.iter().filter_map(fragment_content).collect();

    let link = fragments
        .first()
        .and_then(|f| f.pointer("/text/link/url"))
        .and_then(Value::as_str);

    match link {
        Some(url) => json!({ "content": content, "url": url }),
        None => Value::String(content),
    }
}

fn fragment_content(fragment: &Value) -> Option<&str> {
    fragment
        .pointer("/text/content")
        .and_then(Value::as_str)
        .or_else(|| fragment.get("plain_text").and_then(Value::as_str))
}

fn extract_date(date: Option<&Object>) -> Value {
    let Some(date) = date else {
        return Value::Null;
    };
    let start = date.get("start").cloned().unwrap_or(Value::Null);
    match date.get("end") {
        Some(end) if !end.is_null() => json!({ "start": start, "end": end }),
        _ => start,
    }
}

fn extract_file(file: &Value) -> Option<Value> {
    if let Some(url) = file.pointer("/external/url") {
        return Some(json!({ "url": url }));
    }
    let hosted = file.get("file")?;
    let url = hosted.get("url")?;
    Some(json!({
        "url": url,
        "expiry_time": hosted.get("expiry_time").cloned().unwrap_or(Value::Null),
    }))
}

fn user_reference(user: &Value) -> Value {
    json!({
        "id": user.get("id").cloned().unwrap_or(Value::Null),
        "name": user.get("name").cloned().unwrap_or(Value::Null),
    })
}

fn first_present(payload: &Object, keys: &[&str]) -> Value {
    keys.iter()
        .find_map(|key| payload.get(*key))
        .cloned()
        .unwrap_or(Value::Null)
}

fn extract_unique_id(unique_id: &Object) -> Value {
    let number = unique_id.get("number").cloned().unwrap_or(Value::Null);
    match unique_id.get("prefix").and_then(Value::as_str) {
        Some(prefix) if !prefix.is_empty() => {
            let number = match &number {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                _ => String::new(),
            };
            Value::String(format!("{}-{}", prefix, number))
        }
        _ => number,
    }
}

//! Property-based testing strategies for generating test data
//!
//! Strategies produce arbitrary JSON documents, failure statuses and property
//! objects so the totality guarantees of the normalizer and the classifier can
//! be checked against inputs nobody wrote by hand.

#![cfg(test)]

use crate::http::{classify, ErrorKind, Headers, MessageFormatter, RemoteFailure};
use crate::mode::TransformMode;
use crate::normalizer::{extract_property, transform};
use proptest::collection::{btree_map, vec};
use proptest::option;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Strategy for generating scalar JSON values
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        "[a-zA-Z0-9 _-]{0,16}".prop_map(Value::String),
    ]
}

/// Strategy for generating arbitrary JSON documents of bounded depth
pub fn json_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..6).prop_map(Value::Array),
            btree_map("[a-z_]{1,12}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Strategy for generating transform modes
pub fn mode_strategy() -> impl Strategy<Value = TransformMode> {
    prop_oneof![
        Just(TransformMode::Full),
        Just(TransformMode::Reduced),
        Just(TransformMode::SuccessOnly),
    ]
}

/// Strategy for generating HTTP status codes, weighted toward mapped codes
pub fn status_strategy() -> impl Strategy<Value = u16> {
    prop_oneof![
        3 => prop::sample::select(vec![400u16, 401, 403, 404, 409, 429, 500, 502, 503]),
        1 => 100u16..=599,
    ]
}

/// Strategy for generating failure bodies, including non-object bodies
pub fn failure_body_strategy() -> impl Strategy<Value = Option<Value>> {
    let object = (
        option::of("[a-zA-Z .]{0,40}"),
        option::of(prop::sample::select(vec![
            "permission_required",
            "restricted_resource",
            "validation_error",
        ])),
        option::of("[a-z_.]{1,20}"),
        option::of(prop_oneof![
            (0u64..3600).prop_map(|n| json!(n)),
            (0u64..3600).prop_map(|n| json!(n.to_string())),
            Just(json!("")),
            Just(json!(-5)),
            Just(json!("soon")),
        ]),
    )
        .prop_map(|(message, code, field, retry_after)| {
            let mut body = Map::new();
            if let Some(m) = message {
                body.insert("message".into(), json!(m));
            }
            if let Some(c) = code {
                body.insert("code".into(), json!(c));
            }
            if let Some(f) = field {
                body.insert("field".into(), json!(f));
            }
            if let Some(r) = retry_after {
                body.insert("retry_after".into(), r);
            }
            Value::Object(body)
        });

    option::of(prop_oneof![
        3 => object,
        1 => json_strategy(),
        1 => "[ -~]{0,40}".prop_map(Value::String),
    ])
}

/// Strategy for generating remote failures
pub fn remote_failure_strategy() -> impl Strategy<Value = RemoteFailure> {
    (
        status_strategy(),
        failure_body_strategy(),
        option::of("[0-9]{1,4}"),
        option::of("[a-zA-Z ]{0,30}"),
    )
        .prop_map(|(status, body, retry_header, message)| RemoteFailure {
            status,
            body,
            headers: retry_header
                .map(|v| Headers::new().with("Retry-After", v))
                .unwrap_or_default(),
            message,
        })
}

/// Strategy for generating property objects of known and unknown tags
pub fn property_strategy() -> impl Strategy<Value = Value> {
    let tag = prop::sample::select(vec![
        "title",
        "rich_text",
        "select",
        "multi_select",
        "date",
        "number",
        "checkbox",
        "url",
        "email",
        "phone_number",
        "files",
        "people",
        "relation",
        "formula",
        "rollup",
        "status",
        "created_time",
        "last_edited_time",
        "created_by",
        "last_edited_by",
        "unique_id",
        "place",
        "button",
        "verification",
    ]);
    (tag, json_strategy()).prop_map(|(tag, payload)| json!({ "id": "x", "type": tag, tag: payload }))
}

proptest! {
    #[test]
    fn prop_classification_is_total(failure in remote_failure_strategy()) {
        let error = classify(&failure, Some("retrieve-a-page"), None);
        prop_assert_eq!(error.http_status(), failure.status);
        prop_assert!(!error.message().is_empty());
        prop_assert!(!MessageFormatter::default().format(&error).is_empty());
    }

    #[test]
    fn prop_retryable_follows_kind(failure in remote_failure_strategy()) {
        let error = classify(&failure, None, None);
        let expected = matches!(
            error.kind(),
            ErrorKind::Conflict | ErrorKind::RateLimit | ErrorKind::Server
        );
        prop_assert_eq!(error.retryable(), expected);
        prop_assert_eq!(error.to_body().retryable, expected);
    }

    #[test]
    fn prop_retry_after_only_on_rate_limit(failure in remote_failure_strategy()) {
        let error = classify(&failure, None, None);
        if error.kind() != ErrorKind::RateLimit {
            prop_assert!(error.retry_after().is_none());
        }
    }

    #[test]
    fn prop_full_mode_is_identity(data in json_strategy()) {
        let out = transform(&data, TransformMode::Full, None);
        prop_assert_eq!(&*out, &data);
    }

    #[test]
    fn prop_transform_never_mutates_input(data in json_strategy(), mode in mode_strategy()) {
        let before = data.clone();
        let _ = transform(&data, mode, None);
        prop_assert_eq!(data, before);
    }

    #[test]
    fn prop_success_only_always_confirms(data in json_strategy()) {
        let out = transform(&data, TransformMode::SuccessOnly, None);
        prop_assert_eq!(&out["success"], &json!(true));
        if data.is_object() || data.is_array() {
            prop_assert!(out["message"].is_string());
        }
    }

    #[test]
    fn prop_unknown_tag_passes_through(payload in json_strategy()) {
        let property = json!({ "id": "x", "type": "button", "button": payload });
        prop_assert_eq!(extract_property(&property), property);
    }

    #[test]
    fn prop_property_extraction_is_total(property in property_strategy()) {
        let _ = extract_property(&property);
    }

    #[test]
    fn prop_scalar_properties_unwrap(payload in scalar_strategy()) {
        for tag in ["number", "checkbox", "url", "email", "phone_number"] {
            let property = json!({ "type": tag, tag: payload.clone() });
            prop_assert_eq!(extract_property(&property), payload.clone());
        }
    }
}

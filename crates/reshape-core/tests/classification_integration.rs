//! Integration tests for failure classification and rendering

mod test_support;

use pretty_assertions::assert_eq;
use reshape_core::{
    classify, parse_failure, transform, AdapterConfig, ErrorEnvelope, ErrorKind, Locale,
    MessageFormatter, RemoteFailure, ResourceType, ResponseAdapter, TransformMode,
};
use serde_json::{json, Value};
use test_support::load_fixture;

#[test]
fn test_captured_failures_classify() {
    let cases = load_fixture("failures.json");
    for case in cases.as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let failure = parse_failure(case["failure"].clone())
            .unwrap_or_else(|e| panic!("{}: {}", name, e));
        let error = classify(&failure, None, None);

        assert_eq!(error.kind().as_str(), case["kind"].as_str().unwrap(), "{}", name);
        assert_eq!(error.code(), case["code"].as_str().unwrap(), "{}", name);
        assert_eq!(error.http_status(), failure.status, "{}", name);
        assert!(error.suggestion().is_some(), "{}: no suggestion", name);
    }
}

#[test]
fn test_rate_limit_with_string_retry_after() {
    let failure = RemoteFailure::new(429).with_body(json!({ "message": "Rate limited", "retry_after": "15" }));
    let error = classify(&failure, None, None);

    assert_eq!(error.kind(), ErrorKind::RateLimit);
    assert_eq!(error.retry_after(), Some(15));
    assert_eq!(serde_json::to_value(error.to_body()).unwrap()["retryAfter"], json!(15));
}

#[test]
fn test_permission_required() {
    let failure = RemoteFailure::new(403).with_body(json!({ "code": "permission_required" }));
    let error = classify(&failure, None, None);

    assert_eq!(error.kind(), ErrorKind::Permission);
    assert_eq!(error.code(), "forbidden");
    assert_eq!(error.http_status(), 403);
}

#[test]
fn test_not_found_names_block() {
    let error = classify(&RemoteFailure::new(404), Some("retrieve-a-block"), None);

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.resource_type(), Some(ResourceType::Block));
    assert!(error.suggestion().unwrap().contains("block"));
}

#[test]
fn test_reduced_select_property() {
    let data = json!({
        "object": "page",
        "id": "p1",
        "properties": { "Status": { "type": "select", "select": { "name": "Done" } } },
    });
    let reduced = transform(&data, TransformMode::Reduced, None);
    assert_eq!(reduced["properties"]["Status"], json!("Done"));
}

#[test]
fn test_success_only_counts_results() {
    let data = json!({ "id": "p1", "results": [1, 2, 3] });
    assert_eq!(
        *transform(&data, TransformMode::SuccessOnly, None),
        json!({
            "success": true,
            "id": "p1",
            "count": 3,
            "message": "Successfully processed 3 item(s)",
        })
    );
}

#[test]
fn test_body_retry_after_wins_over_header() {
    let failure = RemoteFailure::new(429)
        .with_header("Retry-After", "60")
        .with_body(json!({ "retry_after": 5 }));
    assert_eq!(classify(&failure, None, None).retry_after(), Some(5));

    let blank = RemoteFailure::new(429)
        .with_header("Retry-After", "60")
        .with_body(json!({ "retry_after": "  " }));
    assert_eq!(classify(&blank, None, None).retry_after(), Some(60));

    let zero = RemoteFailure::new(429).with_body(json!({ "retry_after": 0 }));
    assert_eq!(classify(&zero, None, None).retry_after(), Some(0));

    let unparseable = RemoteFailure::new(429)
        .with_header("Retry-After", "30")
        .with_body(json!({ "retry_after": "soon" }));
    assert_eq!(classify(&unparseable, None, None).retry_after(), None);
}

#[test]
fn test_header_only_retry_after_from_fixture() {
    let cases = load_fixture("failures.json");
    let case = cases
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "rate_limited_header_only")
        .unwrap();
    let failure = parse_failure(case["failure"].clone()).unwrap();
    assert_eq!(classify(&failure, None, None).retry_after(), Some(30));
}

#[test]
fn test_envelope_round_trips_through_json() {
    let adapter = ResponseAdapter::new(AdapterConfig::default());
    let failure = RemoteFailure::new(429).with_body(json!({ "message": "Rate limited", "retry_after": 15 }));
    let params = json!({ "page_id": "p1" });
    let (error, envelope) = adapter.classify_failure(&failure, Some("update-page"), Some(&params));

    let wire = serde_json::to_value(&envelope).unwrap();
    assert_eq!(
        wire["error"],
        json!({
            "type": "rate_limit",
            "code": "rate_limited",
            "httpStatus": 429,
            "message": "Rate limited",
            "retryable": true,
            "suggestion": error.suggestion().unwrap(),
            "operation": "update-page",
            "params": { "page_id": "p1" },
            "retryAfter": 15,
        })
    );

    let parsed: ErrorEnvelope = serde_json::from_value(wire).unwrap();
    assert_eq!(parsed, envelope);
    assert_eq!(
        MessageFormatter::new(Locale::Fr).format_body(&parsed.error),
        envelope.message
    );
}

#[test]
fn test_every_status_renders_in_both_locales() {
    for status in (100u16..=599).step_by(7) {
        let error = classify(&RemoteFailure::new(status), None, None);
        for locale in [Locale::Fr, Locale::En] {
            let rendered = MessageFormatter::new(locale).format(&error);
            assert!(rendered.contains(&format!("Request failed with status {}", status)));
        }
    }
}

#[test]
fn test_non_object_bodies_fall_back_to_generic_message() {
    for body in [json!(null), json!([1, 2]), json!("plain text"), json!(42)] {
        let failure = RemoteFailure::new(500).with_body(body.clone());
        let error = classify(&failure, None, None);
        assert_eq!(error.message(), "Request failed with status 500", "body {}", body);
        assert_eq!(error.kind(), ErrorKind::Server);
    }
}

#[test]
fn test_params_echoed_unchanged() {
    let params: Value = json!({ "filter": { "property": "Done", "checkbox": { "equals": true } } });
    let error = classify(&RemoteFailure::new(400), Some("query-a-data-source"), Some(&params));
    assert_eq!(error.params(), Some(&params));
    assert_eq!(error.operation(), Some("query-a-data-source"));
}

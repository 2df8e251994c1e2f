//! Integration tests for success normalization over captured API payloads

mod test_support;

use pretty_assertions::assert_eq;
use reshape_core::{
    transform, AdapterConfig, RemoteSuccess, ResponseAdapter, ResponseNormalizer, TransformMode,
};
use serde_json::json;
use std::borrow::Cow;
use test_support::{load_fixture, serialized_len};

#[test]
fn test_page_reduced_flattens_every_property() {
    let page = load_fixture("page.json");
    let reduced = transform(&page, TransformMode::Reduced, None);

    assert_eq!(
        reduced["properties"],
        json!({
            "Name": "Launch plan",
            "Notes": "Kickoff 2024-03-11",
            "Status": "In progress",
            "Priority": null,
            "Tags": ["marketing", "q2"],
            "Due": { "start": "2024-04-01", "end": "2024-04-05" },
            "Budget": 12500,
            "Approved": true,
            "Owner": [{ "id": "3b1f7a5e-0c5d-4d6e-9a55-2f1f0c8c9b11", "name": "Ada" }],
            "Brief": [
                { "url": "https://files.example.com/brief.pdf", "expiry_time": "2024-03-04T18:42:00.000Z" },
                { "url": "https://slides.example.com/deck" }
            ],
            "Ticket": "LCH-42",
            "Score": 7.5,
            "Review": { "id": "rV%3Ew", "type": "button", "button": {} },
        })
    );
}

#[test]
fn test_page_reduced_keeps_metadata_verbatim() {
    let page = load_fixture("page.json");
    let reduced = transform(&page, TransformMode::Reduced, None);

    for key in ["object", "id", "created_time", "created_by", "parent", "url", "archived", "in_trash"] {
        assert_eq!(reduced[key], page[key], "metadata field {} changed", key);
    }
}

#[test]
fn test_page_reduced_with_field_selection() {
    let page = load_fixture("page.json");
    let fields = vec!["id".to_string(), "properties".to_string(), "missing".to_string()];
    let reduced = transform(&page, TransformMode::Reduced, Some(&fields));

    let keys: Vec<&String> = reduced.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["id", "properties"]);
    assert_eq!(reduced["properties"]["Ticket"], json!("LCH-42"));
}

#[test]
fn test_database_query_reduced() {
    let query = load_fixture("database_query.json");
    let reduced = transform(&query, TransformMode::Reduced, None);

    assert_eq!(reduced["next_cursor"], json!("a3"));
    assert_eq!(reduced["has_more"], json!(true));
    assert_eq!(reduced["object"], json!("list"));
    assert!(reduced.get("request_id").is_none());
    assert!(reduced.get("page_or_data_source").is_none());

    let results = reduced["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[1]["properties"],
        json!({
            "Name": { "content": "Ship release", "url": "https://example.com/release" },
            "Done": true,
            "Estimate": 3,
        })
    );
    assert_eq!(results[0]["properties"]["Estimate"], json!(null));
}

#[test]
fn test_block_children_keep_block_payloads() {
    let children = load_fixture("block_children.json");
    let reduced = transform(&children, TransformMode::Reduced, None);

    assert_eq!(reduced["results"][0]["paragraph"], children["results"][0]["paragraph"]);
    assert_eq!(reduced["results"][1]["has_children"], json!(true));
    assert!(reduced.get("block").is_none());
}

#[test]
fn test_success_only_on_fixtures() {
    let page = load_fixture("page.json");
    assert_eq!(
        *transform(&page, TransformMode::SuccessOnly, None),
        json!({
            "success": true,
            "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "created_time": "2024-03-01T09:15:00.000Z",
            "last_edited_time": "2024-03-04T17:42:00.000Z",
            "message": "Operation successful",
        })
    );

    let query = load_fixture("database_query.json");
    assert_eq!(
        *transform(&query, TransformMode::SuccessOnly, None),
        json!({
            "success": true,
            "count": 2,
            "message": "Successfully processed 2 item(s)",
        })
    );
}

#[test]
fn test_full_mode_borrows_fixture() {
    let query = load_fixture("database_query.json");
    let out = ResponseNormalizer::new(TransformMode::Full).normalize(&query);
    assert!(matches!(out, Cow::Borrowed(_)));
}

#[test]
fn test_output_size_follows_lossiness() {
    for name in ["page.json", "database_query.json", "block_children.json"] {
        let data = load_fixture(name);
        let sizes: Vec<usize> = TransformMode::ALL
            .iter()
            .map(|mode| serialized_len(&transform(&data, *mode, None)))
            .collect();
        assert!(sizes[0] >= sizes[1], "{}: reduced larger than full", name);
        assert!(sizes[1] >= sizes[2], "{}: success_only larger than reduced", name);
    }
}

#[test]
fn test_adapter_applies_configured_default() {
    let adapter = ResponseAdapter::new(AdapterConfig::default().with_default_mode(TransformMode::Reduced));
    let success = RemoteSuccess::new(load_fixture("page.json"));

    let response = adapter.on_success(&success, None, None);
    assert!(!response.is_error);
    assert_eq!(response.content["properties"]["Status"], json!("In progress"));

    let overridden = adapter.on_success(&success, Some(TransformMode::Full), None);
    assert_eq!(overridden.content, success.data);
}

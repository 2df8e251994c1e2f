// Tests for output formatting
//
// These tests verify that envelopes and data render correctly in every
// output format, and that status messages respect quiet mode.

use super::*;
use reshape_core::{AdapterConfig, Locale, RemoteFailure, ResponseAdapter};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// Writer that keeps everything written to it
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone()));
    (writer, buffer)
}

fn rate_limit_envelope() -> ErrorEnvelope {
    let adapter = ResponseAdapter::new(AdapterConfig::default().with_locale(Locale::En));
    let failure = RemoteFailure::new(429).with_body(json!({ "message": "Rate limited", "retry_after": "15" }));
    let (_, envelope) = adapter.classify_failure(&failure, Some("update-page"), None);
    envelope
}

#[test]
fn test_envelope_human_formatting() {
    let formatted = format_envelope_human(&rate_limit_envelope());

    assert!(formatted.starts_with("⏳ **Rate limit reached**\n\nRate limited"));
    assert!(formatted.contains("type: rate_limit | code: rate_limited | status: 429"));
    assert!(formatted.contains("retryable: yes | retry after: 15 s"));
    assert!(formatted.ends_with("operation: update-page"));
}

#[test]
fn test_envelope_json_formatting() {
    let envelope = rate_limit_envelope();
    let formatted = OutputFormat::Json.format_envelope(&envelope).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();

    assert_eq!(parsed["error"]["type"], "rate_limit");
    assert_eq!(parsed["error"]["retryAfter"], 15);
    assert_eq!(parsed["message"], envelope.message);
}

#[test]
fn test_yaml_formatting() {
    let formatted = OutputFormat::Yaml.format(&json!({ "success": true, "count": 3 })).unwrap();
    assert!(formatted.contains("success: true"));
    assert!(formatted.contains("count: 3"));
}

#[test]
fn test_data_writes_single_trailing_newline() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.data(&json!({ "id": "p1" })).unwrap();
    assert_eq!(buffer.contents(), "{\"id\":\"p1\"}\n");
}

#[test]
fn test_prettify_upgrades_json() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.prettify(true);
    assert_eq!(output.format(), OutputFormat::JsonPretty);
    output.data(&json!({ "id": "p1" })).unwrap();
    assert_eq!(buffer.contents(), "{\n  \"id\": \"p1\"\n}\n");
}

#[test]
fn test_status_messages_only_in_human_format() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.info("loading").unwrap();
    output.success("done").unwrap();
    output.warning("careful").unwrap();
    assert_eq!(buffer.contents(), "");

    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output.info("loading").unwrap();
    output.warning("careful").unwrap();
    assert_eq!(buffer.contents(), "INFO: loading\nWARNING: careful\n");
}

#[test]
fn test_quiet_suppresses_info_but_not_warnings() {
    let (mut output, buffer) = writer(OutputFormat::Human, true);
    output.info("loading").unwrap();
    output.success("done").unwrap();
    output.section("Details").unwrap();
    output.warning("careful").unwrap();
    assert_eq!(buffer.contents(), "WARNING: careful\n");
}

#[test]
fn test_message_wraps_in_machine_formats() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.message("❌ Quota exceeded").unwrap();
    assert_eq!(buffer.contents(), "{\"message\":\"❌ Quota exceeded\"}\n");

    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output.message("❌ Quota exceeded").unwrap();
    assert_eq!(buffer.contents(), "❌ Quota exceeded\n");
}

//! Transport-facing input shapes
//!
//! The transport layer hands over a [`RemoteFailure`] when a call fails and a
//! [`RemoteSuccess`] when it succeeds. Neither type performs I/O.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Case-insensitive response header lookup
pub trait HeaderLookup {
    /// Value of the named header, if present and valid text
    fn header(&self, name: &str) -> Option<&str>;
}

/// Response headers keyed by lowercase name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, String>")]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any value under the same name
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.0.insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl HeaderLookup for Headers {
    fn header(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

impl HeaderLookup for reqwest::header::HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }
}

impl From<BTreeMap<String, Value>> for Headers {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let mut headers = Headers::new();
        for (name, value) in raw {
            match value {
                Value::String(s) => headers.insert(name, s),
                Value::Number(n) => headers.insert(name, n.to_string()),
                Value::Bool(b) => headers.insert(name, b.to_string()),
                _ => tracing::trace!(header = %name, "Ignoring non-scalar header value"),
            }
        }
        headers
    }
}

impl From<Headers> for BTreeMap<String, String> {
    fn from(headers: Headers) -> Self {
        headers.0
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// A failed remote call as seen by the transport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteFailure {
    /// HTTP status code
    pub status: u16,
    /// Decoded response body, absent when the response had none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Response headers
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
    /// Generic failure text from the transport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RemoteFailure {
    /// Create a failure with only a status code
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Transport text, or a generic description of the status
    pub fn generic_message(&self) -> String {
        match self.message.as_deref() {
            Some(m) if !m.trim().is_empty() => m.to_string(),
            _ => format!("Request failed with status {}", self.status),
        }
    }
}

/// A successful remote call as seen by the transport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteSuccess {
    /// Decoded response payload
    pub data: Value,
}

impl RemoteSuccess {
    pub fn new(data: Value) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let headers = Headers::new().with("Retry-After", "30");
        assert_eq!(headers.header("retry-after"), Some("30"));
        assert_eq!(headers.header("RETRY-AFTER"), Some("30"));
        assert_eq!(headers.header("x-request-id"), None);
    }

    #[test]
    fn test_reqwest_header_map_lookup() {
        let mut map = reqwest::header::HeaderMap::new();
        map.insert(
            reqwest::header::RETRY_AFTER,
            reqwest::header::HeaderValue::from_static("12"),
        );
        assert_eq!(map.header("Retry-After"), Some("12"));
    }

    #[test]
    fn test_failure_document_deserializes() {
        let failure: RemoteFailure = serde_json::from_value(json!({
            "status": 429,
            "body": { "message": "slow down" },
            "headers": { "Retry-After": 5, "X-Trace": "abc", "X-Nested": { "a": 1 } },
        }))
        .unwrap();
        assert_eq!(failure.status, 429);
        assert_eq!(failure.headers.header("retry-after"), Some("5"));
        assert_eq!(failure.headers.len(), 2);
        assert_eq!(failure.body, Some(json!({ "message": "slow down" })));
    }

    #[test]
    fn test_generic_message_default() {
        assert_eq!(
            RemoteFailure::new(502).generic_message(),
            "Request failed with status 502"
        );
        assert_eq!(
            RemoteFailure::new(502).with_message("  ").generic_message(),
            "Request failed with status 502"
        );
        assert_eq!(
            RemoteFailure::new(502).with_message("Bad gateway").generic_message(),
            "Bad gateway"
        );
    }
}

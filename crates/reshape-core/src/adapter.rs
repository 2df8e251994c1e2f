//! Entry points for a protocol adapter
//!
//! [`ResponseAdapter`] holds the configuration read once at start-up and
//! exposes the two calls an adapter makes: normalize a success, or classify
//! and render a failure into an error envelope.

use crate::error::{Error, Result};
use crate::http::{classify_in, ErrorBody, Locale, MessageFormatter, RemoteFailure, RemoteSuccess, TypedError};
use crate::mode::TransformMode;
use crate::normalizer::transform;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Environment variable holding the default transform mode
pub const MODE_ENV_VAR: &str = "RESHAPE_RESPONSE_MODE";

/// Environment variable holding the formatter locale
pub const LOCALE_ENV_VAR: &str = "RESHAPE_LOCALE";

/// Adapter configuration, fixed for the adapter's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Mode used when a call does not request one
    pub default_mode: TransformMode,
    /// Language of rendered error messages
    pub locale: Locale,
}

impl AdapterConfig {
    pub fn with_default_mode(mut self, mode: TransformMode) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through a lookup function
    ///
    /// Absent or unrecognized values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_mode = lookup(MODE_ENV_VAR)
            .map(|v| TransformMode::parse_lenient(&v))
            .unwrap_or_default();
        let locale = lookup(LOCALE_ENV_VAR)
            .and_then(|v| match v.parse::<Locale>() {
                Ok(locale) => Some(locale),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring locale from environment");
                    None
                }
            })
            .unwrap_or_default();
        Self { default_mode, locale }
    }
}

/// Error response returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Rendered, human-readable message
    pub message: String,
    /// Machine-readable error
    pub error: ErrorBody,
}

/// Response handed back to the protocol layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterResponse {
    pub content: Value,
    #[serde(default)]
    pub is_error: bool,
}

/// Stateless adapter over the normalizer and the failure classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseAdapter {
    config: AdapterConfig,
    formatter: MessageFormatter,
}

impl ResponseAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self {
            config,
            formatter: MessageFormatter::new(config.locale),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Normalize a successful call
    ///
    /// `mode` overrides the configured default for this call only.
    pub fn on_success(
        &self,
        success: &RemoteSuccess,
        mode: Option<TransformMode>,
        fields: Option<&[String]>,
    ) -> AdapterResponse {
        let mode = mode.unwrap_or(self.config.default_mode);
        AdapterResponse {
            content: transform(&success.data, mode, fields).into_owned(),
            is_error: false,
        }
    }

    /// Classify a failed call and wrap it in an error envelope
    ///
    /// The typed error is returned alongside the envelope for callers that
    /// act on it, e.g. to schedule a retry.
    pub fn classify_failure(
        &self,
        failure: &RemoteFailure,
        operation_id: Option<&str>,
        params: Option<&Value>,
    ) -> (TypedError, ErrorEnvelope) {
        let error = classify_in(failure, operation_id, params, self.config.locale);
        let envelope = self.envelope(&error);
        (error, envelope)
    }

    /// Build the envelope for an already classified error
    pub fn envelope(&self, error: &TypedError) -> ErrorEnvelope {
        ErrorEnvelope {
            message: self.formatter.format(error),
            error: error.to_body(),
        }
    }

    /// Classify a failed call into a flagged protocol response
    pub fn on_failure(
        &self,
        failure: &RemoteFailure,
        operation_id: Option<&str>,
        params: Option<&Value>,
    ) -> AdapterResponse {
        let (_, envelope) = self.classify_failure(failure, operation_id, params);
        let content = match serde_json::to_value(&envelope) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize error envelope, sending message only");
                Value::Object(
                    [("message".to_string(), Value::String(envelope.message))]
                        .into_iter()
                        .collect(),
                )
            }
        };
        AdapterResponse {
            content,
            is_error: true,
        }
    }
}

/// Parse a success document `{ "data": ... }`
pub fn parse_success(document: Value) -> Result<RemoteSuccess> {
    if document.get("data").is_none() {
        return Err(Error::invalid_input("data", "missing required field"));
    }
    Ok(serde_json::from_value(document)?)
}

/// Parse a failure document `{ "status": ..., "body"?, "headers"?, "message"? }`
pub fn parse_failure(document: Value) -> Result<RemoteFailure> {
    match document.get("status") {
        None => return Err(Error::invalid_input("status", "missing required field")),
        Some(status) if status.as_u64().map_or(true, |s| s > u64::from(u16::MAX)) => {
            return Err(Error::invalid_input(
                "status",
                format!("expected an HTTP status code, got {}", status),
            ));
        }
        Some(_) => {}
    }
    Ok(serde_json::from_value(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = AdapterConfig::from_lookup(lookup(&[(MODE_ENV_VAR, "reduced"), (LOCALE_ENV_VAR, "en")]));
        assert_eq!(config.default_mode, TransformMode::Reduced);
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn test_config_defaults_on_absent_or_unknown() {
        assert_eq!(AdapterConfig::from_lookup(lookup(&[])), AdapterConfig::default());

        let config = AdapterConfig::from_lookup(lookup(&[(MODE_ENV_VAR, "tiny"), (LOCALE_ENV_VAR, "xx")]));
        assert_eq!(config.default_mode, TransformMode::Full);
        assert_eq!(config.locale, Locale::Fr);
    }

    #[test]
    fn test_on_success_uses_default_mode() {
        let adapter = ResponseAdapter::new(AdapterConfig::default().with_default_mode(TransformMode::SuccessOnly));
        let success = RemoteSuccess::new(json!({ "id": "p1" }));

        let response = adapter.on_success(&success, None, None);
        assert!(!response.is_error);
        assert_eq!(response.content["success"], json!(true));

        let full = adapter.on_success(&success, Some(TransformMode::Full), None);
        assert_eq!(full.content, json!({ "id": "p1" }));
    }

    #[test]
    fn test_failure_response_envelope() {
        let adapter = ResponseAdapter::new(AdapterConfig::default().with_locale(Locale::En));
        let failure = RemoteFailure::new(404).with_body(json!({ "message": "Could not find block" }));
        let params = json!({ "block_id": "b1" });
        let response = adapter.on_failure(&failure, Some("retrieve-a-block"), Some(&params));

        assert!(response.is_error);
        let envelope: ErrorEnvelope = serde_json::from_value(response.content).unwrap();
        assert!(envelope.message.starts_with("🔍 **Resource not found**"));
        assert_eq!(envelope.error.kind, "not_found");
        assert_eq!(envelope.error.operation.as_deref(), Some("retrieve-a-block"));
        assert_eq!(envelope.error.params, Some(params));
        assert!(!envelope.error.retryable);
    }

    #[test]
    fn test_default_adapter_writes_french_suggestions() {
        let adapter = ResponseAdapter::new(AdapterConfig::default());
        let failure = RemoteFailure::new(409);
        let (error, envelope) = adapter.classify_failure(&failure, None, None);

        let suggestion = error.suggestion().unwrap();
        assert!(suggestion.contains("dernière version"));
        assert!(envelope.message.contains(&format!("**Action** : {}", suggestion)));
        assert_eq!(envelope.error.suggestion.as_deref(), Some(suggestion));
    }

    #[test]
    fn test_parse_documents() {
        assert!(parse_success(json!({ "data": null })).is_ok());
        assert!(matches!(
            parse_success(json!({ "result": 1 })),
            Err(Error::InvalidInput { .. })
        ));

        let failure = parse_failure(json!({ "status": 409 })).unwrap();
        assert_eq!(failure.status, 409);
        assert!(matches!(
            parse_failure(json!({ "body": {} })),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            parse_failure(json!({ "status": "teapot" })),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            parse_failure(json!({ "status": 70000 })),
            Err(Error::InvalidInput { .. })
        ));
    }
}

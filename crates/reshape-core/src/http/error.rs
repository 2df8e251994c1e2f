//! Remote failure classification
//!
//! Maps a [`RemoteFailure`] onto a closed taxonomy of typed errors with a
//! machine-readable code, a retry flag derived from the kind, and a
//! remediation hint. Classification is total: every status code yields
//! exactly one error, whatever the body looks like.
//!
//! Remediation hints are written in the requested [`Locale`]; [`classify`]
//! uses English.

use super::diagnostics::Locale;
use super::failure::{HeaderLookup, RemoteFailure};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Remote error code that marks a 403 as a missing capability
const PERMISSION_REQUIRED: &str = "permission_required";

/// Closed set of failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing, invalid, or insufficient credentials
    Authentication,
    /// Request rejected as malformed
    Validation,
    /// Credentials valid but lacking a required capability
    Permission,
    /// Target resource does not exist or is not shared
    NotFound,
    /// Concurrent modification
    Conflict,
    /// Too many requests
    RateLimit,
    /// Remote side failed
    Server,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::Authentication,
        ErrorKind::Validation,
        ErrorKind::Permission,
        ErrorKind::NotFound,
        ErrorKind::Conflict,
        ErrorKind::RateLimit,
        ErrorKind::Server,
    ];

    /// Whether a failure of this kind may succeed on retry
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Conflict | ErrorKind::RateLimit | ErrorKind::Server
        )
    }

    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::Validation => "validation",
            ErrorKind::Permission => "permission",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Server => "server",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::invalid_input("type", format!("unknown error kind '{}'", s)))
    }
}

/// Resource family inferred from an operation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Block,
    Page,
    DataSource,
    Database,
    User,
}

impl ResourceType {
    /// Markers scanned in priority order; first hit wins
    const MARKERS: &'static [(&'static str, ResourceType)] = &[
        ("block", ResourceType::Block),
        ("page", ResourceType::Page),
        ("data-source", ResourceType::DataSource),
        ("data_source", ResourceType::DataSource),
        ("database", ResourceType::Database),
        ("user", ResourceType::User),
    ];

    /// Infer the resource family from an operation id such as `retrieve-a-block`
    pub fn infer(operation_id: &str) -> Option<Self> {
        let operation_id = operation_id.to_ascii_lowercase();
        Self::MARKERS
            .iter()
            .find(|(marker, _)| operation_id.contains(marker))
            .map(|(_, resource)| *resource)
    }

    /// Human-readable name used in suggestions
    pub fn label(&self) -> &'static str {
        self.label_in(Locale::En)
    }

    /// Localized name used in suggestions
    pub fn label_in(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (ResourceType::Block, Locale::En) => "block",
            (ResourceType::Block, Locale::Fr) => "bloc",
            (ResourceType::Page, _) => "page",
            (ResourceType::DataSource, Locale::En) => "data source",
            (ResourceType::DataSource, Locale::Fr) => "source de données",
            (ResourceType::Database, Locale::En) => "database",
            (ResourceType::Database, Locale::Fr) => "base de données",
            (ResourceType::User, Locale::En) => "user",
            (ResourceType::User, Locale::Fr) => "utilisateur",
        }
    }
}

/// A classified remote failure
///
/// Fields are read-only; `retryable` is derived from the kind and cannot be
/// set independently.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedError {
    kind: ErrorKind,
    code: String,
    http_status: u16,
    message: String,
    suggestion: Option<String>,
    operation: Option<String>,
    params: Option<Value>,
    retry_after: Option<u64>,
    resource_type: Option<ResourceType>,
    field: Option<String>,
}

impl TypedError {
    pub fn new(
        kind: ErrorKind,
        code: impl Into<String>,
        http_status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            http_status,
            message: message.into(),
            suggestion: None,
            operation: None,
            params: None,
            retry_after: None,
            resource_type: None,
            field: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Attach a retry delay; ignored unless the kind is `RateLimit`
    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        if self.kind == ErrorKind::RateLimit {
            self.retry_after = Some(seconds);
        } else {
            tracing::debug!(kind = %self.kind, "Ignoring retry delay on non rate-limit error");
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    pub fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }

    pub fn retry_after(&self) -> Option<u64> {
        self.retry_after
    }

    /// Resource family inferred for not-found errors
    pub fn resource_type(&self) -> Option<ResourceType> {
        self.resource_type
    }

    /// Offending input field reported by the remote API
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Serializable wire shape
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::from(self)
    }
}

impl fmt::Display for TypedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error [{}] ({}): {}",
            self.kind, self.http_status, self.code, self.message
        )
    }
}

impl std::error::Error for TypedError {}

/// Wire shape of a typed error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Kind name; kept as text so foreign envelopes still deserialize
    #[serde(rename = "type")]
    pub kind: String,
    pub code: String,
    pub http_status: u16,
    pub message: String,
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl From<&TypedError> for ErrorBody {
    fn from(error: &TypedError) -> Self {
        Self {
            kind: error.kind.as_str().to_string(),
            code: error.code.clone(),
            http_status: error.http_status,
            message: error.message.clone(),
            retryable: error.retryable(),
            suggestion: error.suggestion.clone(),
            operation: error.operation.clone(),
            params: error.params.clone(),
            retry_after: error.retry_after,
        }
    }
}

/// Optional details pulled from a failure body
#[derive(Debug, Clone, Default, PartialEq)]
struct FailureDetails {
    message: Option<String>,
    code: Option<String>,
    field: Option<String>,
    retry_after: Option<u64>,
    /// Body carries a non-blank `retry_after`, parseable or not
    has_retry_after: bool,
}

impl FailureDetails {
    fn extract(body: Option<&Value>) -> Self {
        match body {
            Some(Value::Object(map)) => Self::from_object(map),
            Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => Self::from_object(&map),
                _ => Self::default(),
            },
            _ => Self::default(),
        }
    }

    fn from_object(map: &Map<String, Value>) -> Self {
        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            message: text("message").filter(|m| !m.trim().is_empty()),
            code: text("code"),
            field: text("field"),
            retry_after: map.get("retry_after").and_then(coerce_seconds),
            has_retry_after: match map.get("retry_after") {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.trim().is_empty(),
                Some(_) => true,
            },
        }
    }
}

/// Coerce a number or numeric string into whole seconds
///
/// Blank strings, negative and non-finite values are treated as absent.
/// Fractions are truncated.
pub fn coerce_seconds(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_seconds)),
        Value::String(s) => parse_seconds(s),
        _ => None,
    }
}

fn parse_seconds(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<u64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(whole_seconds))
}

fn whole_seconds(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.trunc() as u64)
}

/// Remediation hint selected by the status table
#[derive(Debug, Clone, Copy)]
enum Hint<'a> {
    Validation(Option<&'a str>),
    Unauthorized,
    PermissionRequired,
    Forbidden,
    NotFound(Option<ResourceType>),
    Conflict,
    RateLimit,
    Server,
}

impl Hint<'_> {
    fn render(self, locale: Locale) -> String {
        match (self, locale) {
            (Hint::Validation(Some(field)), Locale::En) => format!(
                "The field '{}' is invalid or missing. Check its value against the operation's input schema.",
                field
            ),
            (Hint::Validation(Some(field)), Locale::Fr) => format!(
                "Le champ '{}' est invalide ou manquant. Vérifiez sa valeur par rapport au schéma d'entrée de l'opération.",
                field
            ),
            (Hint::Validation(None), Locale::En) => {
                "Check the request parameters against the operation's input schema.".to_string()
            }
            (Hint::Validation(None), Locale::Fr) => {
                "Vérifiez les paramètres de la requête par rapport au schéma d'entrée de l'opération.".to_string()
            }
            (Hint::Unauthorized, Locale::En) => "Verify that the API token is set and still valid.".to_string(),
            (Hint::Unauthorized, Locale::Fr) => {
                "Vérifiez que le jeton d'API est défini et toujours valide.".to_string()
            }
            (Hint::PermissionRequired, Locale::En) => "The integration lacks the capability this operation needs. Grant it in the integration settings.".to_string(),
            (Hint::PermissionRequired, Locale::Fr) => "L'intégration n'a pas la capacité requise par cette opération. Accordez-la dans les paramètres de l'intégration.".to_string(),
            (Hint::Forbidden, Locale::En) => "The token is valid but has no access to this resource. Share the resource with the integration.".to_string(),
            (Hint::Forbidden, Locale::Fr) => "Le jeton est valide mais n'a pas accès à cette ressource. Partagez la ressource avec l'intégration.".to_string(),
            (Hint::NotFound(Some(resource)), Locale::En) => format!(
                "Check that the {} ID is correct and that the {} is shared with the integration.",
                resource.label_in(locale),
                resource.label_in(locale)
            ),
            (Hint::NotFound(Some(resource)), Locale::Fr) => format!(
                "Vérifiez que l'identifiant ({}) est correct et que la ressource ({}) est partagée avec l'intégration.",
                resource.label_in(locale),
                resource.label_in(locale)
            ),
            (Hint::NotFound(None), Locale::En) => "Check that the resource ID is correct and that the resource is shared with the integration.".to_string(),
            (Hint::NotFound(None), Locale::Fr) => "Vérifiez que l'identifiant de la ressource est correct et qu'elle est partagée avec l'intégration.".to_string(),
            (Hint::Conflict, Locale::En) => "The resource was modified concurrently. Fetch the latest version and retry.".to_string(),
            (Hint::Conflict, Locale::Fr) => "La ressource a été modifiée en parallèle. Récupérez la dernière version puis réessayez.".to_string(),
            (Hint::RateLimit, Locale::En) => "Reduce the request rate and retry after the indicated delay.".to_string(),
            (Hint::RateLimit, Locale::Fr) => "Réduisez le rythme des requêtes et réessayez après le délai indiqué.".to_string(),
            (Hint::Server, Locale::En) => "The remote service failed to process the request. Retry in a few moments.".to_string(),
            (Hint::Server, Locale::Fr) => "Le service distant n'a pas pu traiter la requête. Réessayez dans quelques instants.".to_string(),
        }
    }
}

/// Classify a remote failure with English remediation hints
///
/// `operation_id` enriches not-found suggestions and is echoed back together
/// with `params` for diagnostics.
pub fn classify(
    failure: &RemoteFailure,
    operation_id: Option<&str>,
    params: Option<&Value>,
) -> TypedError {
    classify_in(failure, operation_id, params, Locale::En)
}

/// Classify a remote failure with remediation hints in `locale`
pub fn classify_in(
    failure: &RemoteFailure,
    operation_id: Option<&str>,
    params: Option<&Value>,
    locale: Locale,
) -> TypedError {
    let details = FailureDetails::extract(failure.body.as_ref());
    let status = failure.status;
    let message = details
        .message
        .clone()
        .unwrap_or_else(|| failure.generic_message());

    let mut error = match status {
        400 => TypedError::new(ErrorKind::Validation, "validation_error", status, message)
            .with_suggestion(Hint::Validation(details.field.as_deref()).render(locale)),
        401 => TypedError::new(ErrorKind::Authentication, "unauthorized", status, message)
            .with_suggestion(Hint::Unauthorized.render(locale)),
        403 if details.code.as_deref() == Some(PERMISSION_REQUIRED) => {
            TypedError::new(ErrorKind::Permission, "forbidden", status, message)
                .with_suggestion(Hint::PermissionRequired.render(locale))
        }
        403 => TypedError::new(ErrorKind::Authentication, "forbidden", status, message)
            .with_suggestion(Hint::Forbidden.render(locale)),
        404 => {
            let resource_type = operation_id.and_then(ResourceType::infer);
            let mut error = TypedError::new(ErrorKind::NotFound, "object_not_found", status, message)
                .with_suggestion(Hint::NotFound(resource_type).render(locale));
            error.resource_type = resource_type;
            error
        }
        409 => TypedError::new(ErrorKind::Conflict, "conflict", status, message)
            .with_suggestion(Hint::Conflict.render(locale)),
        429 => {
            // A present body value is authoritative even when it does not parse
            let retry_after = if details.has_retry_after {
                details.retry_after
            } else {
                failure
                    .headers
                    .header("Retry-After")
                    .and_then(parse_seconds)
            };
            let error = TypedError::new(ErrorKind::RateLimit, "rate_limited", status, message)
                .with_suggestion(Hint::RateLimit.render(locale));
            match retry_after {
                Some(seconds) => error.with_retry_after(seconds),
                None => error,
            }
        }
        _ => TypedError::new(ErrorKind::Server, "internal_server_error", status, message)
            .with_suggestion(Hint::Server.render(locale)),
    };

    error.field = details.field;
    if let Some(operation) = operation_id {
        error.operation = Some(operation.to_string());
    }
    if let Some(params) = params {
        error.params = Some(params.clone());
    }

    tracing::debug!(
        status,
        kind = %error.kind,
        code = %error.code,
        remote_code = ?details.code,
        operation = ?operation_id,
        retryable = error.retryable(),
        "Classified remote failure"
    );

    error
}

//! User-facing rendering of typed errors
//!
//! Each kind renders a fixed template:
//!
//! ```text
//! <emoji> **<title>**
//!
//! <message>
//!
//! **<label>** : <suggestion>
//! ```
//!
//! Titles and labels are localized. Message and suggestion text are inserted
//! as-is.

use super::error::{ErrorBody, ErrorKind, TypedError};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of rendered titles and labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
        }
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" | "fr-fr" | "french" => Ok(Locale::Fr),
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::En),
            _ => Err(Error::InvalidLocale {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Template {
    emoji: &'static str,
    title: &'static str,
    label: &'static str,
}

fn template(kind: ErrorKind, locale: Locale) -> Template {
    let (emoji, title, label) = match (kind, locale) {
        (ErrorKind::Authentication, Locale::Fr) => ("🔐", "Erreur d'authentification", "Solution"),
        (ErrorKind::Authentication, Locale::En) => ("🔐", "Authentication error", "Solution"),
        (ErrorKind::Validation, Locale::Fr) => ("⚠️", "Requête invalide", "Détails"),
        (ErrorKind::Validation, Locale::En) => ("⚠️", "Invalid request", "Details"),
        (ErrorKind::Permission, Locale::Fr) => ("🚫", "Permission insuffisante", "Action"),
        (ErrorKind::Permission, Locale::En) => ("🚫", "Insufficient permission", "Action"),
        (ErrorKind::NotFound, Locale::Fr) => ("🔍", "Ressource introuvable", "Solution"),
        (ErrorKind::NotFound, Locale::En) => ("🔍", "Resource not found", "Solution"),
        (ErrorKind::Conflict, Locale::Fr) => ("⚡", "Conflit de modification", "Action"),
        (ErrorKind::Conflict, Locale::En) => ("⚡", "Edit conflict", "Action"),
        (ErrorKind::RateLimit, Locale::Fr) => ("⏳", "Limite de requêtes atteinte", "Solution"),
        (ErrorKind::RateLimit, Locale::En) => ("⏳", "Rate limit reached", "Solution"),
        (ErrorKind::Server, Locale::Fr) => ("🛠️", "Erreur du serveur distant", "Action"),
        (ErrorKind::Server, Locale::En) => ("🛠️", "Remote server error", "Action"),
    };
    Template { emoji, title, label }
}

fn retry_label(locale: Locale) -> &'static str {
    match locale {
        Locale::Fr => "Réessayer dans",
        Locale::En => "Retry in",
    }
}

/// Renders typed errors into localized markdown-ish text
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFormatter {
    locale: Locale,
}

impl MessageFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Render a classified error
    pub fn format(&self, error: &TypedError) -> String {
        self.render(
            Some(error.kind()),
            error.message(),
            error.suggestion(),
            error.retry_after(),
        )
    }

    /// Render a deserialized error body
    ///
    /// A `type` outside the known kinds renders the message alone.
    pub fn format_body(&self, body: &ErrorBody) -> String {
        let kind = body.kind.parse::<ErrorKind>().ok();
        if kind.is_none() {
            tracing::debug!(kind = %body.kind, "Rendering error body of unknown kind");
        }
        self.render(
            kind,
            &body.message,
            body.suggestion.as_deref(),
            body.retry_after,
        )
    }

    fn render(
        &self,
        kind: Option<ErrorKind>,
        message: &str,
        suggestion: Option<&str>,
        retry_after: Option<u64>,
    ) -> String {
        let Some(kind) = kind else {
            return format!("❌ {}", message);
        };

        let template = template(kind, self.locale);
        let mut output = format!("{} **{}**\n\n{}", template.emoji, template.title, message);

        if let Some(suggestion) = suggestion {
            output.push_str(&format!("\n\n**{}** : {}", template.label, suggestion));
        }

        if kind == ErrorKind::RateLimit {
            if let Some(seconds) = retry_after {
                output.push_str(&format!("\n**{}** : {} s", retry_label(self.locale), seconds));
            }
        }

        output
    }
}

/// Render an error with the default locale
pub fn format_error(error: &TypedError) -> String {
    MessageFormatter::default().format(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::classify;
    use crate::http::failure::RemoteFailure;
    use serde_json::json;

    #[test]
    fn test_each_kind_renders_template() {
        let formatter = MessageFormatter::new(Locale::Fr);
        for kind in ErrorKind::ALL {
            let error = TypedError::new(kind, "code", 500, "boom").with_suggestion("do this");
            let rendered = formatter.format(&error);
            let template = template(kind, Locale::Fr);
            assert_eq!(
                rendered,
                format!(
                    "{} **{}**\n\nboom\n\n**{}** : do this",
                    template.emoji, template.title, template.label
                )
            );
        }
    }

    #[test]
    fn test_validation_uses_details_label() {
        let error = classify(
            &RemoteFailure::new(400).with_body(json!({ "message": "body.parent should be defined" })),
            None,
            None,
        );
        let rendered = format_error(&error);
        assert!(rendered.starts_with("⚠️ **Requête invalide**"));
        assert!(rendered.contains("\n\nbody.parent should be defined\n\n"));
        assert!(rendered.contains("**Détails** : "));
    }

    #[test]
    fn test_english_locale() {
        let error = classify(&RemoteFailure::new(401), None, None);
        let rendered = MessageFormatter::new(Locale::En).format(&error);
        assert!(rendered.starts_with("🔐 **Authentication error**"));
        assert!(rendered.contains("**Solution** : Verify"));
    }

    #[test]
    fn test_rate_limit_adds_retry_line() {
        let error = classify(
            &RemoteFailure::new(429).with_body(json!({ "message": "Rate limited", "retry_after": "15" })),
            None,
            None,
        );
        let rendered = MessageFormatter::new(Locale::Fr).format(&error);
        assert!(rendered.ends_with("\n**Réessayer dans** : 15 s"));
    }

    #[test]
    fn test_unknown_body_kind_renders_message_only() {
        let body = ErrorBody {
            kind: "quota".to_string(),
            code: "quota_exceeded".to_string(),
            http_status: 402,
            message: "Quota exceeded".to_string(),
            retryable: false,
            suggestion: Some("Upgrade".to_string()),
            operation: None,
            params: None,
            retry_after: None,
        };
        assert_eq!(MessageFormatter::default().format_body(&body), "❌ Quota exceeded");
    }

    #[test]
    fn test_body_and_error_render_identically() {
        let error = classify(&RemoteFailure::new(404), Some("retrieve-a-page"), None);
        let formatter = MessageFormatter::default();
        assert_eq!(formatter.format(&error), formatter.format_body(&error.to_body()));
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("FR".parse::<Locale>().unwrap(), Locale::Fr);
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::En);
        assert!("de".parse::<Locale>().is_err());
    }
}

//! Error types for the Reshape core library
//!
//! The normalizer and the failure classifier are total and never return an
//! error. This module covers the fallible edges around them: strict parsing of
//! configuration strings, JSON (de)serialization of envelopes, and malformed
//! adapter input documents.

use thiserror::Error;

/// Main error type for Reshape operations
#[derive(Error, Debug)]
pub enum Error {
    /// A transform mode string that is not one of the known modes
    #[error("Invalid transform mode: '{value}' (expected one of: full, reduced, success_only)")]
    InvalidMode { value: String },

    /// A locale string that the formatter has no templates for
    #[error("Invalid locale: '{value}' (expected one of: fr, en)")]
    InvalidLocale { value: String },

    /// An adapter input document is missing a field or has the wrong shape
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid input error for a named field
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

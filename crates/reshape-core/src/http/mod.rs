//! Remote failure handling
//!
//! This module turns failed remote calls into typed errors:
//! - Transport-facing failure and header types
//! - Status-code classification into a closed error taxonomy
//! - Localized rendering of classified errors

pub mod diagnostics;
pub mod error;
pub mod failure;

pub use diagnostics::{format_error, Locale, MessageFormatter};
pub use error::{classify, classify_in, coerce_seconds, ErrorBody, ErrorKind, ResourceType, TypedError};
pub use failure::{HeaderLookup, Headers, RemoteFailure, RemoteSuccess};

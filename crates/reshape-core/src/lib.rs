//! Reshape Core - Response shaping for resource API adapters
//!
//! This crate sits between a remote resource API and a protocol adapter. It
//! reshapes successful responses for compact consumption and turns failed
//! calls into typed, user-presentable errors.
//!
//! # Main Components
//!
//! - **Normalizer**: Reshape payloads in `full`, `reduced` or `success_only` mode
//! - **Classifier**: Map a failed call onto a closed set of typed errors
//! - **Formatter**: Render typed errors as localized, human-readable text
//! - **Adapter**: Configuration and the success/failure entry points
//!
//! # Example
//!
//! ```
//! use reshape_core::{transform, TransformMode};
//! use serde_json::json;
//!
//! let page = json!({
//!     "object": "page",
//!     "id": "p1",
//!     "properties": {
//!         "Name": { "type": "title", "title": [{ "text": { "content": "Roadmap" } }] }
//!     }
//! });
//! let reduced = transform(&page, TransformMode::Reduced, None);
//! assert_eq!(reduced["properties"]["Name"], "Roadmap");
//! ```

pub mod adapter;
pub mod error;
pub mod http;
pub mod mode;
pub mod normalizer;

mod proptest_strategies;

// Re-export main types for convenience
pub use adapter::{
    parse_failure, parse_success, AdapterConfig, AdapterResponse, ErrorEnvelope, ResponseAdapter,
};
pub use error::{Error, Result};
pub use http::{
    classify, classify_in, format_error, ErrorBody, ErrorKind, HeaderLookup, Headers, Locale, MessageFormatter,
    RemoteFailure, RemoteSuccess, ResourceType, TypedError,
};
pub use mode::TransformMode;
pub use normalizer::{extract_property, transform, PropertyValue, ResponseNormalizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Response normalization for resource API payloads
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license
//!
//! This module reshapes successful API responses according to a
//! [`TransformMode`]:
//! - `full` hands the payload back untouched (borrowed, no copy)
//! - `reduced` flattens property values and keeps structural metadata
//! - `success_only` collapses the payload to a confirmation record
//!
//! Normalization never fails. Unknown property shapes are passed through.

pub mod property;
pub mod resource;
pub mod summary;

pub use property::{extract_property, PropertyValue};
pub use resource::{reduce_value, METADATA_FIELDS, PAGINATION_FIELDS};
pub use summary::summarize;

use crate::mode::TransformMode;
use serde_json::Value;
use std::borrow::Cow;

/// Normalizer configured with a mode and an optional field selection
#[derive(Debug, Clone, Default)]
pub struct ResponseNormalizer {
    mode: TransformMode,
    fields: Option<Vec<String>>,
}

impl ResponseNormalizer {
    /// Create a new normalizer for a mode
    pub fn new(mode: TransformMode) -> Self {
        Self { mode, fields: None }
    }

    /// Restrict `reduced` output to the named resource fields
    ///
    /// An empty list keeps every field.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// The configured mode
    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    /// Normalize a payload
    pub fn normalize<'a>(&self, data: &'a Value) -> Cow<'a, Value> {
        transform(data, self.mode, self.fields.as_deref())
    }
}

/// Normalize a payload for a mode
///
/// `fields` only affects `reduced` mode.
pub fn transform<'a>(data: &'a Value, mode: TransformMode, fields: Option<&[String]>) -> Cow<'a, Value> {
    tracing::debug!(mode = %mode, fields = ?fields, "Normalizing response");
    match mode {
        TransformMode::Full => Cow::Borrowed(data),
        TransformMode::Reduced => Cow::Owned(reduce_value(data, fields)),
        TransformMode::SuccessOnly => Cow::Owned(summarize(data)),
    }
}

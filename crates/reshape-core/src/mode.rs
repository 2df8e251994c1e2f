//! Transform mode selection
//!
//! A mode picks the output shape produced by the normalizer. It carries no
//! state between calls.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output shape requested from the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    /// Pass the payload through untouched
    #[default]
    Full,
    /// Flatten property values, keep structural and pagination metadata
    Reduced,
    /// Collapse to a minimal confirmation record
    SuccessOnly,
}

impl TransformMode {
    /// All modes, in increasing order of lossiness
    pub const ALL: [TransformMode; 3] = [
        TransformMode::Full,
        TransformMode::Reduced,
        TransformMode::SuccessOnly,
    ];

    /// Canonical name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformMode::Full => "full",
            TransformMode::Reduced => "reduced",
            TransformMode::SuccessOnly => "success_only",
        }
    }

    /// Parse a mode, falling back to `Full` for anything unrecognized
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::debug!(mode = value, "Unrecognized transform mode, using full");
            TransformMode::Full
        })
    }
}

impl FromStr for TransformMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(TransformMode::Full),
            "reduced" => Ok(TransformMode::Reduced),
            "success_only" | "success-only" => Ok(TransformMode::SuccessOnly),
            _ => Err(Error::InvalidMode {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_parsing() {
        assert_eq!("full".parse::<TransformMode>().unwrap(), TransformMode::Full);
        assert_eq!(" Reduced ".parse::<TransformMode>().unwrap(), TransformMode::Reduced);
        assert_eq!(
            "success-only".parse::<TransformMode>().unwrap(),
            TransformMode::SuccessOnly
        );
        assert!(matches!(
            "minimal".parse::<TransformMode>(),
            Err(Error::InvalidMode { .. })
        ));
    }

    #[test]
    fn test_lenient_parsing_falls_back_to_full() {
        assert_eq!(TransformMode::parse_lenient("success_only"), TransformMode::SuccessOnly);
        assert_eq!(TransformMode::parse_lenient(""), TransformMode::Full);
        assert_eq!(TransformMode::parse_lenient("compact"), TransformMode::Full);
    }

    #[test]
    fn test_display_round_trips() {
        for mode in TransformMode::ALL {
            assert_eq!(mode.to_string().parse::<TransformMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_value(TransformMode::SuccessOnly).unwrap(),
            serde_json::json!("success_only")
        );
    }
}

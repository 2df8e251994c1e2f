//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - Environment variables (after loading `.env`)
//! - Command-line arguments

use crate::cli::{ConfigFormat, OutputFormat};
use crate::error::{Error, Result};
use reshape_core::adapter::{LOCALE_ENV_VAR, MODE_ENV_VAR};
use reshape_core::{AdapterConfig, Locale, TransformMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of project configuration files
const PROJECT_CONFIG_STEM: &str = ".reshape";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Response shaping settings
    pub response: ResponseConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Response shaping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Default transform mode (full, reduced, success_only)
    pub mode: String,

    /// Locale of rendered error messages (fr, en)
    pub locale: String,

    /// Default field selection for reduced mode
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,

    /// Pretty-print JSON output by default
    pub pretty: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log format (compact, full, json)
    pub format: String,

    /// Log file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            mode: TransformMode::default().to_string(),
            locale: Locale::default().to_string(),
            fields: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
            pretty: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "compact".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file, picking the format by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        match Self::default_config_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file or default locations,
    /// then apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.apply_overrides_from(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup(MODE_ENV_VAR) {
            self.response.mode = mode;
        }
        if let Some(locale) = lookup(LOCALE_ENV_VAR) {
            self.response.locale = locale;
        }
    }

    /// Project configuration file in the working directory, if any
    pub fn find_project_config() -> Option<PathBuf> {
        ["toml", "yaml", "yml", "json"]
            .iter()
            .map(|ext| Self::project_config_path_for(ext))
            .find(|p| p.exists())
    }

    /// Project configuration path for an extension
    pub fn project_config_path_for(extension: &str) -> PathBuf {
        PathBuf::from(format!("{}.{}", PROJECT_CONFIG_STEM, extension))
    }

    /// User configuration path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("reshape").join("config.toml"))
    }

    /// Get default configuration file paths to check, in priority order
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = ["toml", "yaml", "yml", "json"]
            .iter()
            .map(|ext| Self::project_config_path_for(ext))
            .collect();
        paths.extend(Self::user_config_path());
        paths
    }

    /// Adapter configuration for the current settings
    ///
    /// Unrecognized values fall back to the defaults (`full`, `fr`), the same
    /// way the adapter reads its environment. `validate` reports them.
    pub fn adapter_config(&self) -> AdapterConfig {
        if let Err(e) = self.response.mode.parse::<TransformMode>() {
            tracing::warn!(error = %e, "Falling back to the full transform mode");
        }
        AdapterConfig::from_lookup(|key| match key {
            MODE_ENV_VAR => Some(self.response.mode.clone()),
            LOCALE_ENV_VAR => Some(self.response.locale.clone()),
            _ => None,
        })
    }

    /// Check every setting, collecting all problems
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if let Err(e) = self.response.mode.parse::<TransformMode>() {
            problems.push(e.to_string());
        }
        if let Err(e) = self.response.locale.parse::<Locale>() {
            problems.push(e.to_string());
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "compact" | "full" | "json") {
            problems.push(format!(
                "Invalid log format: '{}' (expected one of: compact, full, json)",
                self.logging.format
            ));
        }
        if self.response.fields.iter().any(|f| f.trim().is_empty()) {
            problems.push("Field selection contains an empty field name".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::config(problems.join("; ")))
        }
    }

    /// Serialize configuration in the given format
    pub fn to_string_as(&self, format: ConfigFormat) -> Result<String> {
        Ok(match format {
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }

    /// Save configuration to a file, picking the format by extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        };
        let content = self.to_string_as(format)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

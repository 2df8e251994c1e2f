//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use reshape_core::{Locale, TransformMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Reshape CLI - Normalize resource API responses and classify failures
///
/// Reads captured API responses from files or standard input, reshapes
/// successful payloads for compact consumption, and turns failed calls into
/// typed, human-readable error envelopes.
#[derive(Parser, Debug)]
#[command(
    name = "reshape",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RESHAPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a successful API response
    Transform(TransformArgs),

    /// Classify a failed API call into a typed error envelope
    Classify(ClassifyArgs),

    /// Render a serialized error envelope as a human-readable message
    Format(FormatArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the transform command
#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// Response payload file (JSON or YAML), or `-` for standard input
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Transform mode (defaults to the configured mode)
    #[arg(short, long, value_parser = parse_mode)]
    pub mode: Option<TransformMode>,

    /// Resource fields to keep in reduced mode (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Input is a success document `{ "data": ... }` rather than a bare payload
    #[arg(long)]
    pub wrapped: bool,

    /// Emit the full adapter response `{ content, isError }`
    #[arg(long)]
    pub response: bool,

    /// Save the normalized output to a file
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the classify command
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// Failure document `{ status, body?, headers?, message? }`, or `-` for standard input
    #[arg(value_name = "FAILURE")]
    pub input: PathBuf,

    /// Operation identifier of the failed call (e.g. retrieve-a-block)
    #[arg(long, value_name = "OPERATION_ID")]
    pub operation: Option<String>,

    /// Parameters of the failed call as a JSON object
    #[arg(long, value_parser = parse_json)]
    pub params: Option<Value>,

    /// Locale for the rendered message (defaults to the configured locale)
    #[arg(short, long, value_parser = parse_locale)]
    pub locale: Option<Locale>,

    /// Emit the full adapter response `{ content, isError }`
    #[arg(long)]
    pub response: bool,

    /// Save the error envelope to a file
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the format command
#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// Error envelope or bare error body, or `-` for standard input
    #[arg(value_name = "ENVELOPE")]
    pub input: PathBuf,

    /// Locale for the rendered message (defaults to the configured locale)
    #[arg(short, long, value_parser = parse_locale)]
    pub locale: Option<Locale>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize a default project configuration file
    Init(ConfigInitArgs),

    /// Show current configuration values
    Show(ConfigShowArgs),

    /// Validate current configuration
    Validate,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// File format of the new configuration
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,

    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl ConfigFormat {
    /// File extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        }
    }
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl OutputFormat {
    /// Upgrade compact JSON to pretty JSON when requested
    pub fn prettified(self, pretty: bool) -> Self {
        match self {
            OutputFormat::Json if pretty => OutputFormat::JsonPretty,
            other => other,
        }
    }
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self, configured: bool) -> bool {
        !self.no_color && configured && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

fn parse_mode(value: &str) -> Result<TransformMode, String> {
    value.parse().map_err(|e: reshape_core::Error| e.to_string())
}

fn parse_locale(value: &str) -> Result<Locale, String> {
    value.parse().map_err(|e: reshape_core::Error| e.to_string())
}

fn parse_json(value: &str) -> Result<Value, String> {
    serde_json::from_str(value).map_err(|e| format!("invalid JSON: {}", e))
}

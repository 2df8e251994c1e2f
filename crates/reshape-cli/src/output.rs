//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! human rendering for error envelopes.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use reshape_core::ErrorEnvelope;
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format an error envelope
    fn format_envelope(&self, envelope: &ErrorEnvelope) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_envelope(&self, envelope: &ErrorEnvelope) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_envelope_human(envelope)),
            _ => self.format(envelope),
        }
    }
}

/// Render an envelope as its message followed by a details footer
pub fn format_envelope_human(envelope: &ErrorEnvelope) -> String {
    let error = &envelope.error;
    let mut output = String::new();

    output.push_str(&envelope.message);
    output.push_str("\n\n");
    output.push_str(&"─".repeat(40));
    output.push('\n');
    output.push_str(&format!("type: {} | code: {} | status: {}\n", error.kind, error.code, error.http_status));
    output.push_str(&format!(
        "retryable: {}",
        if error.retryable { "yes" } else { "no" }
    ));
    if let Some(seconds) = error.retry_after {
        output.push_str(&format!(" | retry after: {} s", seconds));
    }
    if let Some(operation) = &error.operation {
        output.push_str(&format!("\noperation: {}", operation));
    }

    output
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Upgrade compact JSON output to pretty JSON
    pub fn prettify(&mut self, pretty: bool) {
        self.format = self.format.prettified(pretty);
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet {
            return Ok(());
        }

        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&format!("{} {}", "ℹ".blue(), message))
            } else {
                self.writeln(&format!("INFO: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&message.green().to_string())
            } else {
                self.writeln(message)
            }
        } else {
            Ok(())
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&message.yellow().to_string())
            } else {
                self.writeln(&format!("WARNING: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&message.red().to_string())
            } else {
                self.writeln(&format!("ERROR: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.format == OutputFormat::Human {
            self.writeln("")?;
            if self.use_color {
                self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
            } else {
                self.writeln(&format!("=== {} ===", title))
            }
        } else {
            Ok(())
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        // Create a redacted copy of the value for logging
        let value_json = redaction::redacted(&serde_json::to_value(value)?);

        trace!(
            "Outputting data: {}",
            serde_json::to_string(&value_json).unwrap_or_else(|_| "[failed to serialize]".to_string())
        );

        let formatted = self.format.format(value)?;
        self.writeln(formatted.trim_end())
    }

    /// Write an error envelope with specialized formatting
    pub fn envelope(&mut self, envelope: &ErrorEnvelope) -> Result<()> {
        let formatted = self.format.format_envelope(envelope)?;
        if self.format == OutputFormat::Human && self.use_color {
            let (message, footer) = formatted
                .split_once("\n\n─")
                .map(|(m, f)| (m.to_string(), format!("─{}", f)))
                .unwrap_or((formatted.clone(), String::new()));
            self.writeln(&message)?;
            if !footer.is_empty() {
                self.writeln("")?;
                self.writeln(&footer.dimmed().to_string())?;
            }
            Ok(())
        } else {
            self.writeln(formatted.trim_end())
        }
    }

    /// Write a rendered message; machine formats wrap it in `{ "message": ... }`
    pub fn message(&mut self, message: &str) -> Result<()> {
        match self.format {
            OutputFormat::Human => self.writeln(message),
            _ => self.data(&serde_json::json!({ "message": message })),
        }
    }
}

#[cfg(test)]
mod tests;

//! Format command handler

use super::utils::read_document;
use super::Outcome;
use crate::cli::FormatArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use reshape_core::{ErrorBody, MessageFormatter};
use serde_json::Value;

/// Handle the format command
///
/// Accepts either a full envelope `{ message, error }` or a bare error body.
pub fn handle_format(args: FormatArgs, config: &Config, output: &mut OutputWriter) -> Result<Outcome> {
    let locale = args.locale.unwrap_or_else(|| config.adapter_config().locale);

    let document = read_document(&args.input)?;
    let body: ErrorBody = match document {
        Value::Object(mut map) if map.get("error").is_some_and(Value::is_object) => {
            serde_json::from_value(map.remove("error").unwrap_or_default())?
        }
        other => serde_json::from_value(other)?,
    };

    tracing::debug!(kind = %body.kind, locale = %locale, "Rendering error body");
    output.message(&MessageFormatter::new(locale).format_body(&body))?;

    Ok(Outcome::Success)
}

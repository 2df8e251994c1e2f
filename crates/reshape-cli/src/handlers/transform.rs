//! Transform command handler

use super::utils::{read_document, save_document};
use super::Outcome;
use crate::cli::TransformArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use reshape_core::{parse_success, RemoteSuccess, ResponseAdapter, TransformMode};

/// Handle the transform command
pub fn handle_transform(
    args: TransformArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<Outcome> {
    let timer = Timer::with_details("transform", &args.input.display().to_string());
    let _entered = timer.span().enter();

    let adapter = ResponseAdapter::new(config.adapter_config());
    let mode = args.mode.unwrap_or(adapter.config().default_mode);

    let document = read_document(&args.input)?;
    let success = if args.wrapped {
        parse_success(document)?
    } else {
        RemoteSuccess::new(document)
    };

    let fields = if args.fields.is_empty() {
        &config.response.fields
    } else {
        &args.fields
    };
    if !args.fields.is_empty() && mode != TransformMode::Reduced {
        output.warning(&format!("Field selection is ignored in {} mode", mode))?;
    }
    let selection = (!fields.is_empty()).then_some(fields.as_slice());

    let response = adapter.on_success(&success, Some(mode), selection);
    tracing::info!(
        mode = %mode,
        fields = ?selection,
        "Transformed response"
    );

    output.prettify(args.pretty || config.output.pretty);
    tracing::debug!(format = ?output.format(), response = args.response, "Writing transform output");

    if let Some(path) = &args.save_to {
        if args.response {
            save_document(path, &response)?;
        } else {
            save_document(path, &response.content)?;
        }
        output.success(&format!("✓ Saved {} output to {}", mode, path.display()))?;
        return Ok(Outcome::Success);
    }

    if args.response {
        output.data(&response)?;
    } else {
        output.data(&response.content)?;
    }

    Ok(Outcome::Success)
}

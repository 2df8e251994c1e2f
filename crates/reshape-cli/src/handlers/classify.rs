//! Classify command handler

use super::utils::{read_document, save_document};
use super::Outcome;
use crate::cli::ClassifyArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::redaction;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use reshape_core::{parse_failure, ResponseAdapter};

/// Handle the classify command
///
/// A successfully classified failure is reported through
/// [`Outcome::Flagged`], never as a CLI error.
pub fn handle_classify(
    args: ClassifyArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<Outcome> {
    let timer = Timer::with_details("classify", &args.input.display().to_string());
    let _entered = timer.span().enter();

    let mut adapter_config = config.adapter_config();
    if let Some(locale) = args.locale {
        adapter_config = adapter_config.with_locale(locale);
    }
    let adapter = ResponseAdapter::new(adapter_config);

    let failure = parse_failure(read_document(&args.input)?)?;
    let operation = args.operation.as_deref();
    let params = args.params.as_ref();

    output.prettify(args.pretty || config.output.pretty);

    if args.response {
        let response = adapter.on_failure(&failure, operation, params);
        tracing::info!(status = failure.status, is_error = response.is_error, "Classified remote failure");
        match &args.save_to {
            Some(path) => {
                save_document(path, &response)?;
                output.success(&format!("✓ Saved adapter response to {}", path.display()))?;
            }
            None => output.data(&response)?,
        }
        return Ok(Outcome::Flagged);
    }

    let (error, envelope) = adapter.classify_failure(&failure, operation, params);
    tracing::info!(
        kind = %error.kind(),
        code = error.code(),
        status = error.http_status(),
        retryable = error.retryable(),
        retry_after = ?error.retry_after(),
        operation = ?error.operation(),
        params = %error
            .params()
            .map(|p| redaction::redacted(p).to_string())
            .unwrap_or_default(),
        "Classified remote failure"
    );

    match &args.save_to {
        Some(path) => {
            save_document(path, &envelope)?;
            output.success(&format!("✓ Saved error envelope to {}", path.display()))?;
        }
        None => output.envelope(&envelope)?,
    }

    Ok(Outcome::Flagged)
}

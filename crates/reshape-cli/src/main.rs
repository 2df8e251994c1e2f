//! Reshape CLI - Command-line interface for response shaping
//!
//! This is the main entry point for the Reshape CLI application, providing
//! commands for normalizing captured API responses, classifying failed calls,
//! and rendering error envelopes.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use handlers::Outcome;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Load configuration before anything else so it can shape logging and output
    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, !cli.no_color));
            process::exit(e.exit_code());
        }
    };

    // Set up colored output
    let use_color = cli.use_color(config.output.color);
    control::set_override(use_color);

    // Initialize logging; the guard flushes file output and must outlive `run`
    let guard = match init_logging(&cli, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    let code = match run(cli, &config, use_color) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            tracing::error!(error = %e, exit_code = e.exit_code(), "Command failed");
            eprintln!("{}", error::format_error(&e, use_color));
            e.exit_code()
        }
    };

    drop(guard);
    process::exit(code);
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config, use_color: bool) -> Result<Outcome> {
    let _timer = Timer::new("cli_execution");

    let format = cli.output.unwrap_or(config.output.format);
    let mut output = OutputWriter::new(format, use_color, cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        request_id = logging::current_request_id().unwrap_or("unknown"),
        "Executing command"
    );

    // Handle the subcommand
    match cli.command {
        Commands::Transform(args) => handlers::handle_transform(args, config, &mut output),
        Commands::Classify(args) => handlers::handle_classify(args, config, &mut output),
        Commands::Format(args) => handlers::handle_format(args, config, &mut output),
        Commands::Config(args) => handlers::handle_config(args, config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<Option<WorkerGuard>> {
    // Create logging configuration from CLI args, the config file and environment
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.merge_with_file(&config.logging);
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

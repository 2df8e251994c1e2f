//! Configuration command handlers

use super::Outcome;
use crate::cli::{ConfigAction, ConfigArgs, ConfigInitArgs, ConfigShowArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use reshape_core::adapter::{LOCALE_ENV_VAR, MODE_ENV_VAR};

/// Environment variables that affect the CLI
const ENV_VARS: &[&str] = &[
    MODE_ENV_VAR,
    LOCALE_ENV_VAR,
    "RESHAPE_CONFIG",
    "RESHAPE_LOG_FORMAT",
    "RESHAPE_LOG_FILE",
    "RESHAPE_LOG_CONSOLE",
    "RUST_LOG",
];

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<Outcome> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output)?,
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output)?,
        ConfigAction::Validate => handle_config_validate(config, output)?,
    }
    Ok(Outcome::Success)
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = Config::project_config_path_for(args.format.extension());

    if path.exists() && !args.force {
        output.warning(&format!(
            "Project config already exists at {} (use --force to overwrite)",
            path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(&path)?;
    output.success(&format!("✓ Created project config at {}", path.display()))?;
    output.info("Edit it to customize settings for your environment.")?;
    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let content = config.to_string_as(args.format)?;
    output.writeln(content.trim_end())
}

/// Handle config validate subcommand
fn handle_config_validate(config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info("Validating configuration...")?;

    if let Err(e) = config.validate() {
        output.error(&format!("✗ Configuration validation failed: {}", e))?;
        return Err(e);
    }
    output.success("✓ Configuration is valid")?;

    output.section("Configuration Sources")?;

    if let Some(project_path) = Config::find_project_config() {
        output.info(&format!("✓ Project config: {}", project_path.display()))?;
    } else {
        output.info("✗ No project config found")?;
    }

    if let Some(user_path) = Config::user_config_path() {
        let exists = if user_path.exists() { "✓" } else { "✗" };
        output.info(&format!("{} User config: {}", exists, user_path.display()))?;
    }

    let active: Vec<(&str, String)> = ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok().map(|value| (*var, value)))
        .collect();

    if !active.is_empty() {
        output.section("Active Environment Variables")?;
        for (var, value) in active {
            output.info(&format!("• {} = {}", var, value))?;
        }
    }

    Ok(())
}

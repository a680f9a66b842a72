//! `loopgen config`: inspect configuration values.

use std::path::PathBuf;

use crate::{
    cli::ConfigCommands,
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if output.is_json() {
                output.json(&serde_json::json!({ key: value }))?;
            } else {
                println!("{value}");
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                output.header("Current Configuration:")?;
                output.print(&config.to_toml()?)?;
            }
        }

        ConfigCommands::Path => {
            let path = config_file.unwrap_or_else(|| {
                let local = PathBuf::from(LOCAL_CONFIG_FILE);
                if local.exists() { local } else { AppConfig::config_path() }
            });
            println!("{}", path.display());
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
    match key {
        "defaults.loopback_version" => Ok(config.defaults.loopback_version.clone()),
        "defaults.template" => Ok(config.defaults.template.clone()),
        "defaults.explorer" => Ok(config.defaults.explorer.to_string()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        "templates.local_path" => Ok(path(&config.templates.local_path)),
        "network.timeout_secs" => Ok(config.network.timeout_secs.to_string()),
        "logging.dir" => Ok(path(&config.logging.dir)),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `LOOPGEN_<SECTION>__<KEY>`
//!    (e.g. `LOOPGEN_DEFAULTS__TEMPLATE=notes`)
//! 3. Config file (`--config`, else the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Name of the per-directory config file written by `loopgen init --local`.
pub const LOCAL_CONFIG_FILE: &str = ".loopgen.toml";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default values for new applications.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
    pub network: NetworkConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    pub loopback_version: String,
    pub template: String,
    pub explorer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Directory of `template.toml` templates loaded after the built-ins.
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Timeout for fetching remote WSDL documents.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write daily-rotated logs into this directory.
    pub dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults {
                loopback_version: "3.x".into(),
                template: "api-server".into(),
                explorer: true,
            },
            output: OutputConfig {
                no_color: false,
                format: "auto".into(),
            },
            templates: TemplateConfig { local_path: None },
            network: NetworkConfig { timeout_secs: 30 },
            logging: LoggingConfig { dir: None },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the file, then the environment.
    ///
    /// An explicit `config_file` must exist; the default locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;
        let mut builder = Config::builder().add_source(defaults);

        match config_file {
            Some(path) => {
                debug!(path = %path.display(), "Using explicit config file");
                builder = builder.add_source(toml_file(path).required(true));
            }
            None => {
                let local = PathBuf::from(LOCAL_CONFIG_FILE);
                let path = if local.exists() { local } else { Self::config_path() };
                debug!(path = %path.display(), "Using default config file");
                builder = builder.add_source(toml_file(&path).required(false));
            }
        }

        builder
            .add_source(
                Environment::with_prefix("LOOPGEN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.loopgen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "loopgen", "loopgen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Serialise to the TOML written by `loopgen init`.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn toml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml)
}

fn config_error(e: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}

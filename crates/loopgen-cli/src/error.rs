//! CLI-level errors: what went wrong, what to try next, and which exit
//! code the process ends with.

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use loopgen_core::error::LoopgenError;

pub use loopgen_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A value that could not be prompted for was not given.
    #[error("Missing {what}; pass {flag}")]
    MissingArgument { what: String, flag: &'static str },

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error propagated from `loopgen-core` or an adapter.
    #[error(transparent)]
    Core(#[from] LoopgenError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation cancelled")]
    Cancelled,

    /// Feature not available (e.g., interactive mode without feature flag).
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::MissingArgument { flag, .. } => vec![
                format!("Pass {flag} explicitly, or run in a terminal to be prompted"),
                "Use --help for usage information".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Print the config location with: loopgen config path".into(),
                "Use 'loopgen init --force' to write a fresh default config".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec!["No changes were made".into()],

            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{}' feature is not available in this build", feature),
                format!("Install with the feature enabled: cargo install loopgen-cli --features {feature}"),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::MissingArgument { .. } | Self::Cancelled => {
                ErrorCategory::UserError
            }
            Self::ConfigError { .. } | Self::FeatureNotAvailable { .. } => {
                ErrorCategory::Configuration
            }
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Conflict => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Render the error, its causes (when verbose) and suggestions for
    /// stderr. ANSI styling is applied only when `color` is set.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: String, style: fn(&str) -> String| {
            if color { style(&text) } else { text }
        };

        let mut out = format!(
            "\n{} {}\n",
            paint("\u{2717}".into(), |t| t.red().bold().to_string()),
            paint(format!("Error: {self}"), |t| t.red().to_string()),
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                out.push_str(&paint(format!("  caused by: {err}"), |t| t.dimmed().to_string()));
                out.push('\n');
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push('\n');
            out.push_str(&paint("Suggestions:".into(), |t| t.yellow().bold().to_string()));
            out.push('\n');
            for hint in suggestions {
                out.push_str(&format!("  - {hint}\n"));
            }
        }

        if !verbose {
            out.push('\n');
            out.push_str(&paint(
                "Run again with -v for more detail.".into(),
                |t| t.dimmed().to_string(),
            ));
            out.push('\n');
        }

        out
    }

    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, exit_code = self.exit_code(), "{self}")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, exit_code = self.exit_code(), "{self}")
            }
        }
        if let Some(cause) = self.source() {
            tracing::debug!(%cause, "underlying error");
        }
    }
}

/// Exit-code buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Convert foreign error types into [`CliError`] at call-sites with a
/// context message.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

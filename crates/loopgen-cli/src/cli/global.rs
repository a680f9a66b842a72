//! Flags shared by every `loopgen` subcommand.

use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log more: `-v` info, `-vv` debug, `-vvv` trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors and machine output.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Plain uncoloured output (also set by `NO_COLOR`).
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read settings from this TOML file instead of the usual locations.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Render results as human text, plain text or JSON.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,
}

/// How the CLI should render its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain otherwise.
    #[default]
    Auto,
    Human,
    Plain,
    /// One JSON document on stdout.
    Json,
}

impl OutputFormat {
    /// Parse the `output.format` configuration value.
    pub fn from_config(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "human" => Some(Self::Human),
            "plain" => Some(Self::Plain),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

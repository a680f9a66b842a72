//! Subscriber setup. Library crates only emit events; this is the one
//! place a subscriber is installed.
//!
//! Default level is `warn`. Each `-v` raises it one step (info, debug,
//! trace) and `--quiet` lowers it to `error`. A set `RUST_LOG` replaces
//! the computed filter entirely.

use std::{fs, io::IsTerminal as _, path::Path};

use anyhow::Context as _;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

const LOG_FILE_PREFIX: &str = "loopgen";
const MAX_LOG_FILES: usize = 7;

/// Console events go to stderr, as JSON lines when `--output-format json`
/// is selected. When `log_dir` is set, a second non-blocking layer writes
/// daily-rotated files there; the returned guard must outlive every
/// event that should reach the file.
pub fn init_logging(args: &GlobalArgs, log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let level = derive_level(args);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "loopgen={level},loopgen_cli={level},loopgen_core={level},loopgen_adapters={level}"
        ))
    });

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let mut layers = Vec::new();

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    if args.output_format == OutputFormat::Json {
        layers.push(console.json().with_ansi(false).boxed());
    } else {
        layers.push(console.with_ansi(use_ansi).boxed());
    }

    let guard = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .max_log_files(MAX_LOG_FILES)
                .build(dir)
                .context("Failed to open log file")?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(guard)
}

fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

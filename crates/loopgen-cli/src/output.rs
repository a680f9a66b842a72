//! Output management and formatting.
//!
//! Human output goes through [`OutputManager`]; with `--output-format json`
//! commands emit one JSON document on stdout via [`OutputManager::json`]
//! and the decorative lines are dropped.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

#[derive(Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Info,
    Item,
}

/// Writes user-facing lines to stdout, honouring quiet mode, colour
/// settings and the resolved output format.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // The flag wins over `output.format`; Auto then resolves to Human
        // (TTY) or Plain (piped/redirected).
        let requested = match args.output_format {
            OutputFormat::Auto => {
                OutputFormat::from_config(&config.output.format).unwrap_or(OutputFormat::Auto)
            }
            explicit => explicit,
        };
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet || resolved_format == OutputFormat::Json,
            no_color: args.no_color || config.output.no_color,
            term: Term::stdout(),
        }
    }
    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked(Tone::Success, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked(Tone::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked(Tone::Info, msg)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.no_color {
            self.term.write_line(text)
        } else {
            self.term.write_line(&text.cyan().bold().to_string())
        }
    }

    /// Indented list entry.
    pub fn item(&self, msg: &str) -> io::Result<()> {
        self.marked(Tone::Item, msg)
    }

    fn marked(&self, tone: Tone, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let (indent, mark) = match tone {
            Tone::Success => ("", "\u{2713}"),
            Tone::Warning => ("", "\u{26a0}"),
            Tone::Info => ("", "\u{2139}"),
            Tone::Item => ("  ", "\u{2022}"),
        };
        if self.no_color {
            return self.term.write_line(&format!("{indent}{mark} {msg}"));
        }
        let line = match tone {
            Tone::Success => format!("{} {}", mark.green().bold(), msg.green()),
            Tone::Warning => format!("{} {}", mark.yellow().bold(), msg.yellow()),
            Tone::Info => format!("{} {}", mark.blue().bold(), msg.blue()),
            Tone::Item => format!("{indent}{} {msg}", mark.dimmed()),
        };
        self.term.write_line(&line)
    }

    /// Pretty-printed JSON document on stdout. Never suppressed.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

//! `loopgen`: scaffold LoopBack applications and edit their `server/`
//! configuration from the command line.
//!
//! Startup reads `.env`, parses flags, loads layered configuration, then
//! installs the tracing subscriber before any command runs. Failures end
//! the process with a category-specific code:
//!
//! | Exit | Cause                                  |
//! |------|----------------------------------------|
//! | 0    | success                                |
//! | 1    | I/O or unexpected internal failure     |
//! | 2    | bad input, conflict, missing argument  |
//! | 3    | project file, template or WSDL item not found |
//! | 4    | unreadable or invalid configuration    |

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, info_span};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // Missing .env is fine; real deployments use the environment.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };
    let verbose = cli.global.verbose > 0;
    let color = !cli.global.no_color && std::io::stderr().is_terminal();

    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => return handle_error(e, verbose, color),
    };

    // Held until exit so buffered file logs are flushed.
    let _log_guard = match init_logging(&cli.global, config.logging.dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    let output = OutputManager::new(&cli.global, &config);

    let run_id = uuid::Uuid::new_v4();
    let span = info_span!(
        "run",
        %run_id,
        started_at = %chrono::Utc::now().to_rfc3339()
    );
    let _entered = span.enter();

    debug!(command = ?cli.command, format = ?output.format(), "starting");

    match run(cli, config, output) {
        Ok(()) => {
            info!("loopgen completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose, color),
    }
}

fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::App(cmd) => commands::app::execute(cmd, config, output),
        Commands::Middleware(cmd) => commands::middleware::execute(cmd, output),
        Commands::Phases(cmd) => commands::phases::execute(cmd, output),
        Commands::Datasource(cmd) => commands::datasource::execute(cmd, output),
        Commands::Soap(cmd) => commands::soap::execute(cmd, config, output),
        Commands::List(cmd) => commands::list::execute(cmd, config, output),
        Commands::Init(cmd) => commands::init::execute(cmd, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, cli.global.config, config, output),
    }
}

/// Log the error, print it with suggestions, and map it to an exit code.
fn handle_error(err: CliError, verbose: bool, color: bool) -> ExitCode {
    err.log();

    eprint!("{}", err.render(verbose, color));

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────

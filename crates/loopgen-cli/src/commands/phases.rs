//! Implementation of the `loopgen phases` command.

use loopgen_adapters::LocalFilesystem;
use loopgen_core::prelude::*;

use crate::{cli::ProjectArgs, error::CliResult, output::OutputManager};

/// Print the phase groups of `server/middleware.json` in pipeline order.
pub fn execute(args: ProjectArgs, output: OutputManager) -> CliResult<()> {
    let service = MiddlewareService::new(Box::new(LocalFilesystem::new()));
    let phases = service.list_phases(&args.project)?;

    if output.is_json() {
        output.json(&phases)?;
        return Ok(());
    }

    output.header("Middleware phases:")?;
    for (position, phase) in phases.iter().enumerate() {
        output.print(&format!("  {:>2}. {phase}", position + 1))?;
    }
    Ok(())
}

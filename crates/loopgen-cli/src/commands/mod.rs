//! Command handlers, one module per subcommand.
//!
//! Handlers translate parsed arguments into core requests, wire the
//! adapters, and render results. No document editing happens here.

pub mod app;
pub mod completions;
pub mod config;
pub mod datasource;
pub mod init;
pub mod list;
pub mod middleware;
pub mod phases;
pub mod soap;

mod prompt;

use loopgen_adapters::InMemoryStore;
use tracing::debug;

use crate::{config::AppConfig, error::CliResult};

/// Built-in templates plus the configured local template directory.
pub(crate) fn template_store(config: &AppConfig) -> CliResult<InMemoryStore> {
    let store = InMemoryStore::with_builtin()?;
    if let Some(dir) = &config.templates.local_path {
        let loaded = store.load_dir(dir)?;
        debug!(loaded, dir = %dir.display(), "Local templates added");
    }
    Ok(store)
}

//! Implementation of the `loopgen list` command.

use loopgen_core::prelude::*;

use super::template_store;
use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = TemplateService::new(Box::new(template_store(&config)?));

    let templates = match &args.loopback_version {
        Some(version) => {
            let version: LoopbackVersion = version.parse().map_err(LoopgenError::from)?;
            service.list_for_version(version)?
        }
        None => service.list()?,
    };

    // --output-format json implies the json listing
    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            let width = templates.iter().map(|t| t.id.len()).max().unwrap_or(0);
            for t in &templates {
                output.print(&format!(
                    "  {:<width$}  {:<5}  {}",
                    t.id, t.version, t.description
                ))?;
            }
        }

        // JSON must stay parseable in pipes, so it bypasses quiet mode.
        ListFormat::Json => output.json(&templates)?,

        ListFormat::List => {
            for t in &templates {
                println!("{}", t.id);
            }
        }

        ListFormat::Csv => {
            println!("id,name,loopback_version,kind");
            for t in &templates {
                println!("{},{},{},{}", t.id, csv_field(&t.name), t.version, t.kind);
            }
        }
    }

    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

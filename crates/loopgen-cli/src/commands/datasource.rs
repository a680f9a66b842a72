//! Implementation of the `loopgen datasource` command.

use serde_json::Value;
use tracing::instrument;

use loopgen_adapters::LocalFilesystem;
use loopgen_core::{domain::SOAP_CONNECTOR, prelude::*};

use crate::{
    cli::DatasourceArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(name = %args.name, connector = %args.connector))]
pub fn execute(args: DatasourceArgs, output: OutputManager) -> CliResult<()> {
    let definition = build_definition(&args)?;
    let json = definition.to_json();

    DataSourceService::new(Box::new(LocalFilesystem::new()))
        .add(&args.project.project, definition)?;

    if output.is_json() {
        output.json(&json)?;
        return Ok(());
    }

    output.success(&format!(
        "Data source '{}' ({}) added",
        args.name, args.connector
    ))?;
    if args.connector == SOAP_CONNECTOR {
        output.info(&format!(
            "Generate models with: loopgen soap --datasource {}",
            args.name
        ))?;
    }
    Ok(())
}

fn build_definition(args: &DatasourceArgs) -> CliResult<DataSourceDefinition> {
    let mut definition = if args.connector == SOAP_CONNECTOR {
        let url = args.url.clone().ok_or(CliError::MissingArgument {
            what: "SOAP endpoint URL".into(),
            flag: "--url",
        })?;
        DataSourceDefinition::soap(&args.name, url, args.wsdl.clone(), !args.no_remoting)
    } else {
        let mut def = DataSourceDefinition::new(&args.name, &args.connector);
        if let Some(url) = &args.url {
            def = def.with_option("url", Value::String(url.clone()));
        }
        def
    };

    for option in &args.options {
        let (key, value) = parse_option(option)?;
        definition = definition.with_option(key, value);
    }
    Ok(definition)
}

/// `key=value`, where the value is JSON when it parses and a string otherwise.
fn parse_option(text: &str) -> CliResult<(String, Value)> {
    let (key, raw) = text.split_once('=').ok_or_else(|| CliError::InvalidInput {
        message: format!("option '{text}' must have the form key=value"),
        source: None,
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::InvalidInput {
            message: format!("option '{text}' has an empty key"),
            source: None,
        });
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

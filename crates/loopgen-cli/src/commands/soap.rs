//! Implementation of the `loopgen soap` command.
//!
//! Reads the data source's WSDL once to offer services, bindings and
//! operations, then hands the same document to
//! [`SoapService::generate_from`] to write the models.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, instrument};

use loopgen_adapters::{LocalFilesystem, XmlWsdlReader};
use loopgen_core::{
    application::{BindingSummary, ServiceSummary},
    domain::DomainError,
    prelude::*,
};

use super::prompt;
use crate::{
    cli::{OutputFormat, SoapArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(project = %args.project.project.display()))]
pub fn execute(args: SoapArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let root = args.project.project.clone();
    let reader = XmlWsdlReader::with_timeout(Duration::from_secs(config.network.timeout_secs));
    let service = SoapService::new(Box::new(LocalFilesystem::new()), Box::new(reader));

    let data_source = match &args.datasource {
        Some(name) => name.clone(),
        None => {
            let sources = DataSourceService::new(Box::new(LocalFilesystem::new())).list(&root)?;
            let soap: Vec<String> = sources
                .into_iter()
                .filter(|d| d.is_soap())
                .map(|d| d.name)
                .collect();
            prompt::select("SOAP data source", &soap, "SOAP data source", "--datasource")?
        }
    };

    let location = service.resolve_location(&root, &data_source, args.wsdl.as_deref())?;

    let spinner = spinner(&output, &format!("Reading WSDL from {location}"));
    let wsdl = service.read(&location);
    spinner.finish_and_clear();
    let wsdl = wsdl?;
    let summary = WsdlSummary::from_definition(&location, &wsdl);

    let selected_service = pick_service(&summary, args.service.as_deref())?;
    let binding = pick_binding(selected_service, args.binding.as_deref())?;
    let operations = if args.operations.is_empty() {
        let chosen = prompt::multi_select("Operations", &binding.operations)?;
        // every operation selected is the same as no filter
        if chosen.len() == binding.operations.len() {
            Vec::new()
        } else {
            chosen
        }
    } else {
        args.operations.clone()
    };

    let request = SoapRequest {
        data_source,
        wsdl: args.wsdl.clone(),
        service: selected_service.name.clone(),
        binding: binding.name.clone(),
        operations,
    };
    let report = service.generate_from(&root, &request, &location, &wsdl)?;
    info!(models = report.models.len(), api = %report.api_model, "SOAP generation finished");

    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }

    output.success(&format!(
        "Generated {} model(s) and '{}' for {} operation(s)",
        report.models.len(),
        report.api_model,
        report.operations.len()
    ))?;
    for file in &report.files {
        output.item(file)?;
    }
    Ok(())
}

fn pick_service<'a>(summary: &'a WsdlSummary, wanted: Option<&str>) -> CliResult<&'a ServiceSummary> {
    let name = match wanted {
        Some(name) => name.to_string(),
        None => {
            let names: Vec<String> = summary.services.iter().map(|s| s.name.clone()).collect();
            prompt::select("Service", &names, "WSDL service", "--service")?
        }
    };
    summary
        .service(&name)
        .ok_or_else(|| not_found("service", &name, summary.services.iter().map(|s| &s.name)))
}

fn pick_binding<'a>(
    service: &'a ServiceSummary,
    wanted: Option<&str>,
) -> CliResult<&'a BindingSummary> {
    let name = match wanted {
        Some(name) => name.to_string(),
        None => {
            let names: Vec<String> = service.bindings.iter().map(|b| b.name.clone()).collect();
            prompt::select("Binding", &names, "SOAP binding", "--binding")?
        }
    };
    service
        .binding(&name)
        .ok_or_else(|| not_found("binding", &name, service.bindings.iter().map(|b| &b.name)))
}

fn not_found<'a>(
    kind: &'static str,
    name: &str,
    available: impl Iterator<Item = &'a String>,
) -> CliError {
    LoopgenError::from(DomainError::WsdlItemNotFound {
        kind,
        name: name.to_string(),
        available: available.cloned().collect(),
    })
    .into()
}

/// Spinner on stderr for human output; hidden otherwise.
fn spinner(output: &OutputManager, message: &str) -> ProgressBar {
    if output.is_quiet() || output.format() != OutputFormat::Human {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

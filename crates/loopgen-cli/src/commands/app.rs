//! Implementation of the `loopgen app` command.
//!
//! Responsibility: resolve the name, target and directory from flags,
//! config defaults and prompts, then hand an [`AppRequest`] to the core
//! [`AppService`]. No business logic lives here.

use std::path::{Path, PathBuf};

use chrono::Datelike as _;
use serde_json::json;
use tracing::{debug, info, instrument};

use loopgen_adapters::{LocalFilesystem, SimpleRenderer};
use loopgen_core::prelude::*;

use super::{prompt, template_store};
use crate::{
    cli::AppArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `loopgen app` command.
///
/// 1. Resolve the application name (argument or prompt)
/// 2. Resolve the LoopBack version and template (flags, prompt, config)
/// 3. Plan the file set; stop here on `--dry-run`
/// 4. Confirm unless `--yes` or `--quiet`
/// 5. Write the application and print next steps
#[instrument(skip_all, fields(name = args.name.as_deref().unwrap_or("<prompt>")))]
pub fn execute(args: AppArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let raw_name = match &args.name {
        Some(name) => name.clone(),
        None => prompt::input("Application name", None, "application name", "<NAME>")?,
    };
    let name = AppName::normalize(&raw_name).map_err(LoopgenError::from)?;
    if name.as_str() != raw_name {
        debug!(given = %raw_name, normalized = %name, "Application name normalized");
    }

    let ask = !args.yes && !output.is_quiet();
    let version = match &args.loopback_version {
        Some(v) => v.clone(),
        None if ask && prompt::interactive() => choose_version(&config)?,
        None => config.defaults.loopback_version.clone(),
    };
    let template = match &args.template {
        Some(t) => t.clone(),
        None if ask && prompt::interactive() => choose_template(&version, &config)?,
        None => config.defaults.template.clone(),
    };
    let target = AppTarget::parse(&version, &template).map_err(LoopgenError::from)?;

    let directory = resolve_directory(args.dir.as_deref(), &name);
    let request = AppRequest::new(name.clone(), target, &directory)
        .explorer(!args.no_explorer && config.defaults.explorer)
        .force(args.force)
        .variable("YEAR", chrono::Local::now().year().to_string());

    debug!(target = %request.target, explorer = request.explorer, "Request resolved");

    let service = AppService::new(
        Box::new(template_store(&config)?),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
    );

    if args.dry_run {
        let plan = service.plan(&request)?;
        return show_plan(&request, &plan, &output);
    }

    if ask {
        show_configuration(&request, &output)?;
        if !prompt::confirm("Create this application?")? {
            return Err(CliError::Cancelled);
        }
    }

    output.header(&format!("Creating '{name}'..."))?;
    let structure = service.create(&request)?;
    info!(files = structure.files().count(), "Application written");

    if output.is_json() {
        return output.json(&json!({
            "name": name.as_str(),
            "directory": directory,
            "loopbackVersion": request.target.version().as_str(),
            "template": request.target.template().as_str(),
            "files": relative_files(&structure),
        }))
        .map_err(Into::into);
    }

    output.success(&format!("Application '{name}' created"))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", directory.display()))?;
    output.print("  npm install")?;
    output.print("  node .")?;

    Ok(())
}

/// `--dir` when given, otherwise `./<normalized name>`.
fn resolve_directory(dir: Option<&Path>, name: &AppName) -> PathBuf {
    dir.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(name.as_str()))
}

/// Versions with the configured default first.
fn choose_version(config: &AppConfig) -> CliResult<String> {
    let mut items: Vec<String> = LoopbackVersion::ALL
        .iter()
        .map(|v| v.as_str().to_string())
        .collect();
    move_to_front(&mut items, &config.defaults.loopback_version);
    prompt::select("LoopBack version", &items, "LoopBack version", "--loopback-version")
}

fn choose_template(version: &str, config: &AppConfig) -> CliResult<String> {
    let version: LoopbackVersion = version.parse().map_err(LoopgenError::from)?;
    let mut items: Vec<String> = version
        .templates()
        .iter()
        .map(|k| k.as_str().to_string())
        .collect();
    move_to_front(&mut items, &config.defaults.template);
    prompt::select("Application template", &items, "template", "--template")
}

fn move_to_front(items: &mut [String], preferred: &str) {
    if let Some(pos) = items.iter().position(|i| i == preferred) {
        items[..=pos].rotate_right(1);
    }
}

fn relative_files(structure: &ProjectStructure) -> Vec<String> {
    structure
        .files()
        .map(|f| {
            f.path
                .strip_prefix(structure.root())
                .unwrap_or(&f.path)
                .display()
                .to_string()
        })
        .collect()
}

fn show_plan(request: &AppRequest, plan: &ProjectStructure, out: &OutputManager) -> CliResult<()> {
    if out.is_json() {
        out.json(&json!({
            "dryRun": true,
            "name": request.name.as_str(),
            "directory": request.directory,
            "files": relative_files(plan),
        }))?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would create '{}' ({}) at {}",
        request.name,
        request.target,
        request.directory.display(),
    ))?;
    for file in relative_files(plan) {
        out.item(&file)?;
    }
    Ok(())
}

fn show_configuration(request: &AppRequest, out: &OutputManager) -> CliResult<()> {
    out.header("Application")?;
    out.print(&format!("  Name:      {}", request.name))?;
    out.print(&format!("  LoopBack:  {}", request.target.version()))?;
    out.print(&format!("  Template:  {}", request.target.template()))?;
    out.print(&format!(
        "  Explorer:  {}",
        if request.explorer { "yes" } else { "no" }
    ))?;
    out.print(&format!("  Location:  {}", request.directory.display()))?;
    out.print("")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_defaults_to_normalized_name() {
        let name = AppName::normalize("My App").unwrap();
        assert_eq!(resolve_directory(None, &name), PathBuf::from(name.as_str()));
    }

    #[test]
    fn explicit_directory_wins() {
        let name = AppName::normalize("api").unwrap();
        assert_eq!(
            resolve_directory(Some(Path::new("/tmp/elsewhere")), &name),
            PathBuf::from("/tmp/elsewhere")
        );
    }

    #[test]
    fn preferred_item_moves_to_front_keeping_order() {
        let mut items: Vec<String> = ["api-server", "empty-server", "hello-world", "notes"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        move_to_front(&mut items, "hello-world");
        assert_eq!(items, ["hello-world", "api-server", "empty-server", "notes"]);
    }

    #[test]
    fn unknown_preferred_item_leaves_order() {
        let mut items = vec!["2.x".to_string(), "3.x".to_string()];
        move_to_front(&mut items, "9.x");
        assert_eq!(items, ["2.x", "3.x"]);
    }
}

//! Implementation of the `loopgen middleware` command.

use serde_json::json;
use tracing::instrument;

use loopgen_adapters::LocalFilesystem;
use loopgen_core::prelude::*;

use super::prompt;
use crate::{
    cli::{MiddlewareArgs, SubPhaseArg},
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(source = %args.source, project = %args.project.project.display()))]
pub fn execute(args: MiddlewareArgs, output: OutputManager) -> CliResult<()> {
    let root = args.project.project.clone();
    let service = MiddlewareService::new(Box::new(LocalFilesystem::new()));

    let (phase, new_phase_anchor) = match &args.phase {
        Some(phase) => (phase.clone(), None),
        None => prompt_phase(&service.list_phases(&root)?)?,
    };

    let mut insertion = build_insertion(&args, phase)?;
    if insertion.anchor.is_none() {
        insertion.anchor = new_phase_anchor;
    }
    let key = service.add_middleware(&root, &insertion)?;

    if output.is_json() {
        output.json(&json!({ "phase": key, "source": args.source }))?;
        return Ok(());
    }

    output.success(&format!("Registered '{}' in phase '{key}'", args.source))?;
    Ok(())
}

/// Menu entry for a phase that is not in `middleware.json` yet.
const NEW_PHASE: &str = "(new phase)";

/// Ask for the phase. A new phase is placed before a phase the user picks.
fn prompt_phase(phases: &[String]) -> CliResult<(String, Option<PhaseAnchor>)> {
    let choices = phase_choices(phases, prompt::interactive());
    let choice = prompt::select("Phase", &choices, "middleware phase", "--phase")?;
    if choice != NEW_PHASE {
        return Ok((choice, None));
    }

    let name = prompt::input("New phase name", None, "middleware phase", "--phase")?;
    let next = prompt::select("Insert before phase", phases, "next phase", "--before")?;
    Ok((name, Some(PhaseAnchor::Before(next))))
}

fn phase_choices(phases: &[String], allow_new: bool) -> Vec<String> {
    let mut choices = phases.to_vec();
    if allow_new {
        choices.push(NEW_PHASE.to_string());
    }
    choices
}

fn build_insertion(args: &MiddlewareArgs, phase: String) -> CliResult<MiddlewareInsertion> {
    let mut config = MiddlewareConfig::new().with_paths(args.paths.iter().cloned());
    if args.disabled {
        config = config.with_enabled(false);
    }
    let params = match &args.params {
        Some(text) => MiddlewareConfig::parse_params(text).map_err(LoopgenError::from)?,
        None => None,
    };
    if let Some(params) = params {
        config = config.with_params(params);
    }

    let mut insertion = MiddlewareInsertion::new(phase, args.source.clone()).config(config);
    if let Some(sub) = args.sub_phase {
        insertion = insertion.sub_phase(match sub {
            SubPhaseArg::Before => SubPhase::Before,
            SubPhaseArg::After => SubPhase::After,
        });
    }
    if let Some(before) = &args.before {
        insertion = insertion.anchor(PhaseAnchor::Before(before.clone()));
    } else if let Some(after) = &args.after {
        insertion = insertion.anchor(PhaseAnchor::After(after.clone()));
    }
    Ok(insertion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ProjectArgs;
    use std::path::PathBuf;

    fn args(source: &str) -> MiddlewareArgs {
        MiddlewareArgs {
            source: source.into(),
            phase: Some("logging".into()),
            sub_phase: None,
            before: None,
            after: None,
            paths: Vec::new(),
            params: None,
            disabled: false,
            project: ProjectArgs {
                project: PathBuf::from("."),
            },
        }
    }

    #[test]
    fn sub_phase_is_part_of_the_key() {
        let mut a = args("morgan");
        a.sub_phase = Some(SubPhaseArg::Before);
        let insertion = build_insertion(&a, "routes".into()).unwrap();
        assert_eq!(insertion.phase_key(), "routes:before");
    }

    #[test]
    fn enabled_is_only_written_for_disabled_middleware() {
        let insertion = build_insertion(&args("morgan"), "routes".into()).unwrap();
        assert_eq!(insertion.config.enabled, None);
        assert!(insertion.config.to_json().get("enabled").is_none());

        let mut a = args("morgan");
        a.disabled = true;
        let insertion = build_insertion(&a, "routes".into()).unwrap();
        assert_eq!(insertion.config.enabled, Some(false));
        assert_eq!(insertion.config.to_json()["enabled"], false);
    }

    #[test]
    fn new_phase_is_offered_only_when_asking() {
        let phases = vec!["initial".to_string(), "routes".to_string()];
        assert_eq!(phase_choices(&phases, false), ["initial", "routes"]);
        assert_eq!(
            phase_choices(&phases, true),
            ["initial", "routes", NEW_PHASE]
        );
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mut a = args("compression");
        a.params = Some("[1, 2]".into());
        assert!(build_insertion(&a, "initial".into()).is_err());
    }

    #[test]
    fn blank_params_are_ignored() {
        let mut a = args("compression");
        a.params = Some("   ".into());
        assert!(build_insertion(&a, "initial".into()).is_ok());
    }
}

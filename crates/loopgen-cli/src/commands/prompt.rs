//! Interactive prompts for values not given on the command line.
//!
//! Prompts only run when the `interactive` feature is compiled in and stdin
//! is a terminal. Otherwise a missing value becomes
//! [`CliError::MissingArgument`], confirmations pass, and selections with a
//! single candidate are picked without asking.

use std::io::IsTerminal as _;

use tracing::debug;

use crate::error::{CliError, CliResult};

/// `true` when the user can be asked.
pub fn interactive() -> bool {
    cfg!(feature = "interactive") && std::io::stdin().is_terminal()
}

/// Ask for a free-form value.
pub fn input(
    prompt: &str,
    default: Option<&str>,
    what: &str,
    flag: &'static str,
) -> CliResult<String> {
    if !interactive() {
        return Err(missing(what, flag));
    }
    ask_input(prompt, default)
}

/// Pick one of `items`; a single candidate is returned as is.
pub fn select(prompt: &str, items: &[String], what: &str, flag: &'static str) -> CliResult<String> {
    match items {
        [] => Err(missing(what, flag)),
        [only] => {
            debug!(%what, value = %only, "Single candidate selected");
            Ok(only.clone())
        }
        _ if !interactive() => Err(missing(what, flag)),
        _ => ask_select(prompt, items),
    }
}

/// Pick any subset of `items`. Without a terminal every item is kept.
pub fn multi_select(prompt: &str, items: &[String]) -> CliResult<Vec<String>> {
    if items.len() < 2 || !interactive() {
        return Ok(items.to_vec());
    }
    ask_multi_select(prompt, items)
}

/// Yes/no question defaulting to yes. Without a terminal the answer is yes.
pub fn confirm(prompt: &str) -> CliResult<bool> {
    if !interactive() {
        debug!("Not a terminal, confirmation skipped");
        return Ok(true);
    }
    ask_confirm(prompt)
}

fn missing(what: &str, flag: &'static str) -> CliError {
    CliError::MissingArgument {
        what: what.to_string(),
        flag,
    }
}

#[cfg(feature = "interactive")]
fn prompt_error(e: dialoguer::Error) -> CliError {
    CliError::IoError {
        message: format!("Failed to read user input: {e}"),
        source: std::io::Error::other(e.to_string()),
    }
}

#[cfg(feature = "interactive")]
fn ask_input(prompt: &str, default: Option<&str>) -> CliResult<String> {
    let mut input = dialoguer::Input::<String>::new().with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    input.interact_text().map_err(prompt_error)
}

#[cfg(feature = "interactive")]
fn ask_select(prompt: &str, items: &[String]) -> CliResult<String> {
    let index = dialoguer::Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(prompt_error)?;
    Ok(items[index].clone())
}

#[cfg(feature = "interactive")]
fn ask_multi_select(prompt: &str, items: &[String]) -> CliResult<Vec<String>> {
    let chosen = dialoguer::MultiSelect::new()
        .with_prompt(prompt)
        .items(items)
        .defaults(&vec![true; items.len()])
        .interact()
        .map_err(prompt_error)?;
    Ok(chosen.into_iter().map(|i| items[i].clone()).collect())
}

#[cfg(feature = "interactive")]
fn ask_confirm(prompt: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(prompt_error)
}

#[cfg(not(feature = "interactive"))]
fn ask_input(_prompt: &str, _default: Option<&str>) -> CliResult<String> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(not(feature = "interactive"))]
fn ask_select(_prompt: &str, _items: &[String]) -> CliResult<String> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(not(feature = "interactive"))]
fn ask_multi_select(_prompt: &str, items: &[String]) -> CliResult<Vec<String>> {
    Ok(items.to_vec())
}

#[cfg(not(feature = "interactive"))]
fn ask_confirm(_prompt: &str) -> CliResult<bool> {
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_candidate_is_selected_without_prompting() {
        let picked = select("Service", &names(&["Weather"]), "service", "--service").unwrap();
        assert_eq!(picked, "Weather");
    }

    #[test]
    fn no_candidates_is_a_missing_argument() {
        let err = select("Service", &[], "service", "--service").unwrap_err();
        assert!(matches!(err, CliError::MissingArgument { flag: "--service", .. }));
    }

    #[test]
    fn single_operation_is_kept() {
        let ops = multi_select("Operations", &names(&["Add"])).unwrap();
        assert_eq!(ops, ["Add"]);
    }
}

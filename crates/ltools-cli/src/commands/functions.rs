//! Functions command implementation

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use super::load_source;
use crate::error::Result;

/// Run the functions command
pub fn run_functions(source: Option<&Path>, json: bool) -> Result<()> {
    let parsed = load_source(source)?;
    let functions = &parsed.config().functions;

    if json {
        let listing: Vec<_> = functions
            .iter()
            .map(|(name, function)| {
                json!({
                    "name": name,
                    "runtime": function.runtime.as_str(),
                    "deployable": function.deploy.is_some(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if functions.is_empty() {
        println!("{}", "No functions defined".dimmed());
        return Ok(());
    }

    for (name, function) in functions {
        let deploy = if function.deploy.is_some() {
            "deploy".green()
        } else {
            "build only".yellow()
        };
        println!(
            "  {} {} ({}, {})",
            "+".green(),
            name.cyan(),
            function.runtime,
            deploy
        );
    }
    Ok(())
}

//! Check command implementation

use std::path::Path;

use colored::Colorize;

use super::load_source;
use crate::error::Result;

/// Run the check command
pub fn run_check(source: Option<&Path>) -> Result<()> {
    let parsed = load_source(source)?;
    let count = parsed.config().functions.len();

    println!(
        "{} {} ({} {})",
        "OK".green().bold(),
        parsed.root(),
        count,
        if count == 1 { "function" } else { "functions" }
    );
    Ok(())
}

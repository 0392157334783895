//! CLI command implementations

pub mod check;
pub mod run;

use anyhow::Result;
use quill_runtime::Error;

/// Print a failed run's diagnostic to stderr, human-readable or JSON.
pub fn report(err: &Error, json: bool) -> Result<()> {
    let diag = err.to_diagnostic();
    if json {
        eprintln!("{}", diag.to_json_string()?);
    } else {
        eprint!("{}", diag.to_human_string());
    }
    Ok(())
}

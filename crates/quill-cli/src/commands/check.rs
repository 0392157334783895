//! Check command - parse without executing

use anyhow::{Context, Result};
use quill_runtime::parser::Parser;
use quill_runtime::CommandRegistry;
use std::fs;

/// Parse a source file and report the first error, if any. Nothing is
/// executed and no canvas is touched.
pub fn check(file_path: &str, json: bool) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("failed to read source file: {}", file_path))?;

    let registry = CommandRegistry::new();
    match Parser::new(&source, &registry).parse() {
        Ok(program) => {
            println!(
                "{}: {} statement(s), {} method(s)",
                file_path,
                program.main.len(),
                program.methods.len()
            );
            Ok(())
        }
        Err(err) => {
            super::report(&err, json)?;
            Err(anyhow::anyhow!("{} has errors", file_path))
        }
    }
}

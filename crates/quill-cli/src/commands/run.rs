//! Run command - execute Quill source files

use anyhow::{Context, Result};
use quill_runtime::{Quill, RecordingCanvas};
use std::fs;

/// Execute a source file against a recording canvas, streaming program
/// output to stdout as it is emitted.
pub fn run(file_path: &str, json: bool, ops: bool) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("failed to read source file: {}", file_path))?;

    let mut quill = Quill::new(RecordingCanvas::new());
    let mut sink = |line: &str| println!("{}", line);
    let result = quill.execute_with_output(&source, &mut sink);

    if ops {
        for op in quill.canvas().ops() {
            println!("{:?}", op);
        }
    }

    match result {
        Ok(_) => Ok(()),
        Err(err) => {
            super::report(&err, json)?;
            Err(anyhow::anyhow!("failed to execute {}", file_path))
        }
    }
}

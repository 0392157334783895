//! Shared test helpers
//!
//! Programs run against a fresh [`RecordingCanvas`] so tests can assert on
//! both the output log and the recorded drawing operations.

use quill_runtime::{Error, Outcome, Quill, RecordingCanvas};

pub use pretty_assertions::assert_eq;

/// Run a program and return its outcome.
pub fn run(source: &str) -> Result<Outcome, Error> {
    Quill::new(RecordingCanvas::new()).execute(source)
}

/// Run a program that must succeed; return its output log.
pub fn run_log(source: &str) -> Vec<String> {
    match run(source) {
        Ok(outcome) => outcome.log,
        Err(err) => panic!("program failed: {}", err),
    }
}

/// Run a program and hand back the canvas alongside the outcome.
pub fn run_with_canvas(source: &str) -> (Result<Outcome, Error>, RecordingCanvas) {
    let mut quill = Quill::new(RecordingCanvas::new());
    let result = quill.execute(source);
    (result, quill.into_canvas())
}

/// Assert that a failed run carries the given stable diagnostic code.
pub fn assert_error_code(source: &str, expected_code: &str) {
    match run(source) {
        Err(err) => {
            let diag = err.to_diagnostic();
            assert_eq!(
                diag.code, expected_code,
                "expected {}, got {} ({})",
                expected_code, diag.code, diag.message
            );
        }
        Ok(outcome) => panic!("expected error {}, got success: {:?}", expected_code, outcome),
    }
}

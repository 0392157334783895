//! Quill: an embeddable interpreter for a small line-oriented drawing
//! language.
//!
//! Programs are sequences of statements, one per line: typed variable
//! declarations, fixed-length typed arrays with `poke`/`peek`, `if`/
//! `while`/`for` blocks, user-defined methods invoked with `call`, and a
//! set of canvas drawing commands. Execution draws through the [`Canvas`]
//! trait, so an embedder supplies whatever surface it likes; the bundled
//! [`RecordingCanvas`] records operations without rasterizing.
//!
//! ```
//! use quill_runtime::{Quill, RecordingCanvas};
//!
//! let mut quill = Quill::new(RecordingCanvas::new());
//! let outcome = quill.execute("write 2 + 3").unwrap();
//! assert_eq!(outcome.log, vec!["5".to_string()]);
//! ```

pub mod ast;
pub mod canvas;
pub mod commands;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod token;
pub mod value;

pub use canvas::{Canvas, CanvasOp, ImageFormat, RecordingCanvas, Rgb};
pub use commands::CommandRegistry;
pub use diagnostic::{Diagnostic, DiagnosticLevel, ParseError};
pub use interpreter::AliasTable;
pub use runtime::{Error, Outcome, Quill};
pub use value::{ArrayValue, RuntimeError, Value, ValueKind};

/// Crate version, from the package manifest
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke() {
        let mut quill = Quill::new(RecordingCanvas::new());
        let outcome = quill
            .execute("int x = 40\nx = x + 2\nwrite x")
            .unwrap();
        assert_eq!(outcome.statements_executed, 3);
        assert_eq!(outcome.log, vec!["42".to_string()]);
    }

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

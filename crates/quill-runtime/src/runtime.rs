//! Embedding API
//!
//! [`Quill`] owns a canvas and runs programs against it. Each `execute`
//! call is a fresh run: a new command registry, a new parse, a new scope
//! stack. Only the canvas carries state across runs, so an embedder can
//! draw incrementally by executing several programs in sequence.

use crate::canvas::Canvas;
use crate::commands::CommandRegistry;
use crate::diagnostic::{Diagnostic, ParseError};
use crate::interpreter::{execute_block, AliasTable, ExecutionContext};
use crate::parser::Parser;
use crate::value::RuntimeError;
use thiserror::Error as ThisError;

/// Failure of a run, located on a 1-based source line. Parse errors abort
/// before anything executes; runtime errors abort mid-run.
#[derive(Debug, ThisError, Clone, PartialEq)]
pub enum Error {
    #[error("parse error at line {line}: {source}")]
    Parse { source: ParseError, line: usize },
    #[error("runtime error at line {line}: {source}")]
    Runtime { source: RuntimeError, line: usize },
}

impl Error {
    pub(crate) fn parse(source: ParseError, line: usize) -> Self {
        Error::Parse { source, line }
    }

    /// 1-based source line the failure is attributed to
    pub fn line(&self) -> usize {
        match self {
            Error::Parse { line, .. } | Error::Runtime { line, .. } => *line,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::from(self)
    }
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Top-level statements that ran to completion
    pub statements_executed: usize,
    /// Output lines from `write` and `text`, in emission order
    pub log: Vec<String>,
}

/// An interpreter bound to a canvas.
pub struct Quill<C: Canvas> {
    canvas: C,
    aliases: AliasTable,
}

impl<C: Canvas> Quill<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            aliases: AliasTable::new(),
        }
    }

    /// Bind compatibility aliases for renamed arrays and methods. Lookups
    /// consult them only after a direct miss.
    pub fn with_aliases(canvas: C, aliases: AliasTable) -> Self {
        Self { canvas, aliases }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Parse and run a program. Output is collected into the returned log.
    pub fn execute(&mut self, source: &str) -> Result<Outcome, Error> {
        self.run(source, None)
    }

    /// Parse and run a program, streaming each output line to `sink` as it
    /// is emitted (it still lands in the returned log).
    pub fn execute_with_output(
        &mut self,
        source: &str,
        sink: &mut dyn FnMut(&str),
    ) -> Result<Outcome, Error> {
        self.run(source, Some(sink))
    }

    fn run<'a>(
        &'a mut self,
        source: &str,
        sink: Option<&'a mut dyn FnMut(&str)>,
    ) -> Result<Outcome, Error> {
        let registry = CommandRegistry::new();
        let program = Parser::new(source, &registry).parse()?;

        let mut ctx = ExecutionContext::new(
            program.methods,
            self.aliases.clone(),
            &mut self.canvas,
            sink,
        );

        let mut statements_executed = 0;
        for stmt in &program.main {
            if let Err(source) = execute_block(&mut ctx, std::slice::from_ref(stmt)) {
                let line = ctx.current_line;
                return Err(Error::Runtime { source, line });
            }
            statements_executed += 1;
        }

        Ok(Outcome {
            statements_executed,
            log: ctx.take_log(),
        })
    }
}

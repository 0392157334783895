//! Diagnostics for errors
//!
//! Parse and runtime failures both surface through the serializable
//! [`Diagnostic`] type so embedders (the CLI in particular) render them
//! consistently, human-readable or as JSON.

use crate::runtime::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

/// Parse-time error. The first one raised aborts translation; no statement
/// of a partially parsed program is ever executed.
#[derive(Debug, ThisError, Clone, PartialEq)]
pub enum ParseError {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unexpected character '{ch}' in expression")]
    UnexpectedCharacter { ch: char },
    #[error("invalid number '{text}'")]
    InvalidNumber { text: String },
    #[error("mismatched parentheses")]
    MismatchedParens,
    #[error("missing operand")]
    MissingOperand,
    #[error("invalid expression")]
    InvalidExpression,
    #[error("unknown statement: '{text}'")]
    UnknownStatement { text: String },
    #[error("missing '{terminator}'")]
    MissingTerminator { terminator: &'static str },
    #[error("invalid {construct}: expected {expected}")]
    InvalidStatement {
        construct: &'static str,
        expected: &'static str,
    },
    #[error("unknown type '{name}'")]
    UnknownType { name: String },
    #[error("invalid parameter '{text}'")]
    InvalidParameter { text: String },
    #[error("'{command}' expects {expected} argument(s), got {got}")]
    CommandArity {
        command: String,
        expected: usize,
        got: usize,
    },
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with a stable code and the 1-based source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    /// Stable code, e.g. "QL1011"
    pub code: String,
    pub message: String,
    /// 1-based line the failure was detected on
    pub line: usize,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>, message: impl Into<String>, line: usize) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            code: code.into(),
            message: message.into(),
            line,
        }
    }

    /// Format as human-readable string: `error[QL1011]: missing 'end while'`
    /// followed by a `--> line N` locator.
    pub fn to_human_string(&self) -> String {
        format!(
            "{}[{}]: {}\n  --> line {}\n",
            self.level, self.code, self.message, self.line
        )
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        match err {
            Error::Parse { source, line } => {
                Diagnostic::error(parse_code(source), source.to_string(), *line)
            }
            Error::Runtime { source, line } => {
                Diagnostic::error(runtime_code(source), source.to_string(), *line)
            }
        }
    }
}

fn parse_code(err: &ParseError) -> &'static str {
    use error_codes::*;
    match err {
        ParseError::UnterminatedString => UNTERMINATED_STRING,
        ParseError::UnexpectedCharacter { .. } => UNEXPECTED_CHARACTER,
        ParseError::InvalidNumber { .. } => INVALID_NUMBER,
        ParseError::MismatchedParens => MISMATCHED_PARENS,
        ParseError::MissingOperand | ParseError::InvalidExpression => INVALID_EXPRESSION,
        ParseError::UnknownStatement { .. } => UNKNOWN_STATEMENT,
        ParseError::MissingTerminator { .. } => MISSING_TERMINATOR,
        ParseError::InvalidStatement { .. } => INVALID_STATEMENT,
        ParseError::UnknownType { .. } | ParseError::InvalidParameter { .. } => UNKNOWN_TYPE,
        ParseError::CommandArity { .. } => COMMAND_ARITY,
    }
}

fn runtime_code(err: &crate::value::RuntimeError) -> &'static str {
    use crate::value::RuntimeError;
    use error_codes::*;
    match err {
        RuntimeError::UndefinedVariable { .. } => UNDEFINED_VARIABLE,
        RuntimeError::UndefinedMethod { .. } => UNDEFINED_METHOD,
        RuntimeError::ArityMismatch { .. } => ARITY_MISMATCH,
        RuntimeError::OutOfBounds { .. } => OUT_OF_BOUNDS,
        RuntimeError::Conversion { .. } | RuntimeError::InvalidParse { .. } => INVALID_CONVERSION,
        RuntimeError::NotAnArray { .. } | RuntimeError::ElementKind { .. } => ARRAY_TYPE_ERROR,
        RuntimeError::DivideByZero => DIVIDE_BY_ZERO,
        RuntimeError::ZeroStep => ZERO_STEP,
        RuntimeError::NegativeLength { .. } => NEGATIVE_LENGTH,
        RuntimeError::CanvasIo { .. } => CANVAS_IO,
    }
}

/// Error code registry
pub mod error_codes {
    // QL0xxx - Runtime errors
    pub const UNDEFINED_VARIABLE: &str = "QL0001";
    pub const UNDEFINED_METHOD: &str = "QL0002";
    pub const ARITY_MISMATCH: &str = "QL0003";
    pub const OUT_OF_BOUNDS: &str = "QL0004";
    pub const INVALID_CONVERSION: &str = "QL0005";
    pub const ARRAY_TYPE_ERROR: &str = "QL0006";
    pub const DIVIDE_BY_ZERO: &str = "QL0007";
    pub const ZERO_STEP: &str = "QL0008";
    pub const NEGATIVE_LENGTH: &str = "QL0009";
    pub const CANVAS_IO: &str = "QL0010";

    // QL1xxx - Parse errors
    pub const UNTERMINATED_STRING: &str = "QL1001";
    pub const UNEXPECTED_CHARACTER: &str = "QL1002";
    pub const INVALID_NUMBER: &str = "QL1003";
    pub const MISMATCHED_PARENS: &str = "QL1004";
    pub const INVALID_EXPRESSION: &str = "QL1005";
    pub const UNKNOWN_STATEMENT: &str = "QL1010";
    pub const MISSING_TERMINATOR: &str = "QL1011";
    pub const INVALID_STATEMENT: &str = "QL1012";
    pub const UNKNOWN_TYPE: &str = "QL1013";
    pub const COMMAND_ARITY: &str = "QL1014";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_format() {
        let diag = Diagnostic::error("QL1011", "missing 'end while'", 4);
        let out = diag.to_human_string();
        assert!(out.contains("error[QL1011]"));
        assert!(out.contains("missing 'end while'"));
        assert!(out.contains("line 4"));
    }

    #[test]
    fn test_json_format() {
        let diag = Diagnostic::error("QL0004", "array index 5 out of range (0..3)", 2);
        let json = diag.to_json_string().unwrap();
        assert!(json.contains("\"level\": \"error\""));
        assert!(json.contains("\"code\": \"QL0004\""));
        assert!(json.contains("\"line\": 2"));
    }

    #[test]
    fn test_json_round_trip() {
        let diag = Diagnostic::error("QL1010", "unknown statement: 'frobnicate'", 7);
        let json = diag.to_json_string().unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diag);
    }
}

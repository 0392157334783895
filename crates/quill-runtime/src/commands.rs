//! Drawing/utility command registry
//!
//! Maps command keywords (`moveto`, `pen`, `circle`, ...) to builders that
//! produce [`CanvasStmt`] variants at parse time. The registry is an
//! explicitly constructed object: the driver builds one per run and passes
//! it into the parser, so there is no process-wide mutable state and an
//! unknown keyword is a parse-time decision, not a runtime fallthrough.

use crate::ast::{CanvasStmt, Expr, TextSource};
use crate::diagnostic::ParseError;
use crate::parser::{expr::parse_expression, split_args};
use std::collections::HashMap;

/// Which command a keyword maps to. `pen`, `pencolour` and `pencolor` all
/// resolve to [`CommandKind::Pen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    MoveTo,
    DrawTo,
    Circle,
    Rect,
    Tri,
    Pen,
    Clear,
    Reset,
    Set,
    Text,
}

/// Keyword-to-command lookup for the statement parser.
pub struct CommandRegistry {
    keywords: HashMap<&'static str, CommandKind>,
}

impl CommandRegistry {
    /// Build the default command set.
    pub fn new() -> Self {
        let keywords = HashMap::from([
            ("moveto", CommandKind::MoveTo),
            ("drawto", CommandKind::DrawTo),
            ("circle", CommandKind::Circle),
            ("rect", CommandKind::Rect),
            ("tri", CommandKind::Tri),
            ("pen", CommandKind::Pen),
            ("pencolour", CommandKind::Pen),
            ("pencolor", CommandKind::Pen),
            ("clear", CommandKind::Clear),
            ("reset", CommandKind::Reset),
            ("set", CommandKind::Set),
            ("text", CommandKind::Text),
        ]);
        Self { keywords }
    }

    /// Try to build a canvas statement for `keyword`. Returns `None` when
    /// the keyword is not a command (the caller reports an unknown
    /// statement); a recognised keyword with malformed arguments is a
    /// parse error.
    pub fn build(&self, keyword: &str, args: &str) -> Option<Result<CanvasStmt, ParseError>> {
        let kind = *self.keywords.get(keyword.to_ascii_lowercase().as_str())?;
        Some(self.build_kind(kind, keyword, args))
    }

    fn build_kind(
        &self,
        kind: CommandKind,
        keyword: &str,
        args: &str,
    ) -> Result<CanvasStmt, ParseError> {
        match kind {
            CommandKind::MoveTo => {
                let [x, y] = take_args(keyword, args)?;
                Ok(CanvasStmt::MoveTo { x, y })
            }
            CommandKind::DrawTo => {
                let [x, y] = take_args(keyword, args)?;
                Ok(CanvasStmt::DrawTo { x, y })
            }
            // The whole remainder of the line is the radius expression
            CommandKind::Circle => Ok(CanvasStmt::Circle {
                radius: parse_expression(args)?,
            }),
            CommandKind::Rect => {
                let [width, height] = take_args(keyword, args)?;
                Ok(CanvasStmt::Rect { width, height })
            }
            CommandKind::Tri => {
                let [width, height] = take_args(keyword, args)?;
                Ok(CanvasStmt::Tri { width, height })
            }
            CommandKind::Pen => {
                let [red, green, blue] = take_args(keyword, args)?;
                Ok(CanvasStmt::Pen { red, green, blue })
            }
            CommandKind::Clear => Ok(CanvasStmt::Clear),
            CommandKind::Reset => Ok(CanvasStmt::Reset),
            CommandKind::Set => {
                let [width, height] = take_args(keyword, args)?;
                Ok(CanvasStmt::Resize { width, height })
            }
            CommandKind::Text => Ok(CanvasStmt::Text(build_text(args)?)),
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split the argument text and parse exactly N expressions from it.
fn take_args<const N: usize>(keyword: &str, args: &str) -> Result<[Expr; N], ParseError> {
    let parts = split_args(args);
    if parts.len() != N {
        return Err(ParseError::CommandArity {
            command: keyword.to_ascii_lowercase(),
            expected: N,
            got: parts.len(),
        });
    }
    let mut exprs = Vec::with_capacity(N);
    for part in &parts {
        exprs.push(parse_expression(part)?);
    }
    exprs
        .try_into()
        .map_err(|_| ParseError::InvalidExpression)
}

/// Decide whether a `text` argument is raw text or an expression. Quoted
/// text, anything containing an operator character, and a lone identifier
/// all evaluate as expressions (so `text myVar` works); everything else is
/// the raw remainder of the line.
fn build_text(args: &str) -> Result<TextSource, ParseError> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return Ok(TextSource::Raw(String::new()));
    }

    const OPERATOR_CHARS: &[char] = &[
        '+', '-', '*', '/', '(', ')', '<', '>', '!', '&', '|', '=', '"',
    ];
    let mut looks_like_expr = trimmed.contains(OPERATOR_CHARS);

    if !looks_like_expr && split_args(trimmed).len() == 1 {
        let first = trimmed.chars().next().unwrap_or(' ');
        if first.is_alphabetic() || first == '_' {
            looks_like_expr = true;
        }
    }

    if looks_like_expr {
        Ok(TextSource::Expr(parse_expression(trimmed)?))
    } else {
        Ok(TextSource::Raw(trimmed.to_string()))
    }
}

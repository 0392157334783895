//! Parsing (program text to AST)
//!
//! The language is line-oriented: one statement or block header per line.
//! Parsing walks the lines once, dispatching on the lowercased keyword
//! prefix and recursing into nested blocks; leaf expressions go through the
//! operator-precedence parser in [`expr`]. The first malformed line aborts
//! the parse, so no partial block ever reaches execution.

pub mod expr;

use crate::ast::{MethodDef, MethodTable, Param, Program, Stmt};
use crate::commands::CommandRegistry;
use crate::diagnostic::ParseError;
use crate::runtime::Error;
use crate::value::ValueKind;
use expr::parse_expression;
use std::rc::Rc;

/// Parser state for building a [`Program`] from source text
pub struct Parser<'r> {
    lines: Vec<String>,
    current: usize,
    methods: MethodTable,
    registry: &'r CommandRegistry,
}

impl<'r> Parser<'r> {
    /// Create a parser over the given program text. The command registry is
    /// supplied by the driver; the parser holds no global state.
    pub fn new(source: &str, registry: &'r CommandRegistry) -> Self {
        Self {
            lines: split_lines(source),
            current: 0,
            methods: MethodTable::new(),
            registry,
        }
    }

    /// Parse the whole program: the main statement sequence plus every
    /// method declaration encountered along the way.
    pub fn parse(mut self) -> Result<Program, Error> {
        let main = self.parse_block(None)?;
        Ok(Program {
            main,
            methods: self.methods,
        })
    }

    /// Parse statements until end of input or one of `terminators` (which
    /// is left unconsumed for the caller to verify).
    fn parse_block(&mut self, terminators: Option<&[&str]>) -> Result<Vec<Stmt>, Error> {
        let mut statements = Vec::new();

        while self.current < self.lines.len() {
            let line = self.lines[self.current].trim().to_string();
            let line_no = self.current + 1;

            if line.is_empty() || line.starts_with('*') || line.starts_with("//") {
                self.current += 1;
                continue;
            }

            let lower = line.to_ascii_lowercase();

            if let Some(ends) = terminators {
                if ends.contains(&lower.as_str()) {
                    break;
                }
            }

            if lower.starts_with("method ") {
                let method = self.parse_method(&line)?;
                self.methods
                    .insert(method.name.to_ascii_lowercase(), Rc::new(method));
                // declarations are not part of the executable sequence
                continue;
            }
            if lower.starts_with("if ") {
                statements.push(self.parse_if(&line)?);
                continue;
            }
            if lower.starts_with("while ") {
                statements.push(self.parse_while(&line)?);
                continue;
            }
            if lower.starts_with("for ") {
                statements.push(self.parse_for(&line)?);
                continue;
            }

            let stmt = if lower.starts_with("int ")
                || lower.starts_with("real ")
                || lower.starts_with("boolean ")
            {
                parse_var_decl(&line, line_no)
            } else if lower.starts_with("array ") {
                parse_array_decl(&line, line_no)
            } else if lower.starts_with("poke ") {
                parse_poke(&line, line_no)
            } else if lower.starts_with("peek ") {
                parse_peek(&line, line_no)
            } else if lower.starts_with("call ") {
                parse_call(&line, line_no)
            } else if lower.starts_with("write ") {
                parse_expression(line[5..].trim()).map(|expr| Stmt::Write { expr, line: line_no })
            } else if let Some(eq) = find_assignment_operator(&line).filter(|&i| i > 0) {
                let name = line[..eq].trim().to_string();
                parse_expression(line[eq + 1..].trim()).map(|value| Stmt::Assign {
                    name,
                    value,
                    line: line_no,
                })
            } else {
                self.parse_command(&line, line_no)
            };

            statements.push(stmt.map_err(|e| Error::parse(e, line_no))?);
            self.current += 1;
        }

        Ok(statements)
    }

    /// Resolve a line against the command registry; anything the registry
    /// does not recognise is an unknown statement.
    fn parse_command(&self, line: &str, line_no: usize) -> Result<Stmt, ParseError> {
        let (keyword, args) = split_first_token(line);
        match self.registry.build(keyword, args) {
            Some(op) => Ok(Stmt::Canvas {
                op: op?,
                line: line_no,
            }),
            None => Err(ParseError::UnknownStatement {
                text: line.to_string(),
            }),
        }
    }

    fn parse_if(&mut self, header: &str) -> Result<Stmt, Error> {
        let line_no = self.current + 1;
        let condition =
            parse_expression(header[2..].trim()).map_err(|e| Error::parse(e, line_no))?;
        self.current += 1;

        let then_block = self.parse_block(Some(&["else", "end if", "endif"]))?;

        let mut else_block = None;
        if self.peek_lower().as_deref() == Some("else") {
            self.current += 1;
            else_block = Some(self.parse_block(Some(&["end if", "endif"]))?);
        }

        self.expect_terminator(&["end if", "endif"], "end if")?;
        Ok(Stmt::If {
            condition,
            then_block,
            else_block,
            line: line_no,
        })
    }

    fn parse_while(&mut self, header: &str) -> Result<Stmt, Error> {
        let line_no = self.current + 1;
        let condition =
            parse_expression(header[5..].trim()).map_err(|e| Error::parse(e, line_no))?;
        self.current += 1;

        let body = self.parse_block(Some(&["end while", "endwhile"]))?;
        self.expect_terminator(&["end while", "endwhile"], "end while")?;
        Ok(Stmt::While {
            condition,
            body,
            line: line_no,
        })
    }

    fn parse_for(&mut self, header: &str) -> Result<Stmt, Error> {
        let line_no = self.current + 1;
        let fail = |e| Error::parse(e, line_no);
        let invalid = || {
            ParseError::InvalidStatement {
                construct: "for loop",
                expected: "for <name> = <start> to <end> step <step>",
            }
        };

        // for count = 1 to 20 step 2
        let rest = header[3..].trim();
        let eq = rest.find('=').ok_or_else(|| fail(invalid()))?;
        let var = rest[..eq].trim().to_string();
        let after_eq = rest[eq + 1..].trim();

        let lower = after_eq.to_ascii_lowercase();
        let to_idx = lower.find(" to ").ok_or_else(|| fail(invalid()))?;
        let start_text = after_eq[..to_idx].trim();
        let after_to = &after_eq[to_idx + 4..];

        let step_idx = after_to
            .to_ascii_lowercase()
            .find(" step ")
            .ok_or_else(|| fail(invalid()))?;
        let end_text = after_to[..step_idx].trim();
        let step_text = after_to[step_idx + 6..].trim();

        let start = parse_expression(start_text).map_err(fail)?;
        let end = parse_expression(end_text).map_err(fail)?;
        let step = parse_expression(step_text).map_err(fail)?;
        self.current += 1;

        let body = self.parse_block(Some(&["end for", "endfor"]))?;
        self.expect_terminator(&["end for", "endfor"], "end for")?;
        Ok(Stmt::For {
            var,
            start,
            end,
            step,
            body,
            line: line_no,
        })
    }

    fn parse_method(&mut self, header: &str) -> Result<MethodDef, Error> {
        let line_no = self.current + 1;
        let fail = |e| Error::parse(e, line_no);

        // method int testMethod int one, int two
        let rest = header[6..].trim();
        let (ret_text, after) = split_first_token(rest);
        let (name, param_text) = split_first_token(after.trim_start());

        if ret_text.is_empty() || name.is_empty() {
            return Err(fail(ParseError::InvalidStatement {
                construct: "method header",
                expected: "method <type> <name> [<type> <pname>, ...]",
            }));
        }
        let return_kind = parse_kind(ret_text).map_err(fail)?;
        let name = name.to_string();

        let mut params = Vec::new();
        for part in param_text.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let bits: Vec<&str> = part.split_whitespace().collect();
            if bits.len() != 2 {
                return Err(fail(ParseError::InvalidParameter {
                    text: part.to_string(),
                }));
            }
            params.push(Param {
                kind: parse_kind(bits[0]).map_err(fail)?,
                name: bits[1].to_string(),
            });
        }
        self.current += 1;

        let body = self.parse_block(Some(&["end method", "endmethod"]))?;
        self.expect_terminator(&["end method", "endmethod"], "end method")?;
        Ok(MethodDef {
            name,
            return_kind,
            params,
            body,
        })
    }

    /// Consume the current line if it is one of the expected terminators,
    /// or fail with a missing-terminator error.
    fn expect_terminator(
        &mut self,
        accepted: &[&str],
        canonical: &'static str,
    ) -> Result<(), Error> {
        match self.peek_lower() {
            Some(lower) if accepted.contains(&lower.as_str()) => {
                self.current += 1;
                Ok(())
            }
            _ => Err(Error::parse(
                ParseError::MissingTerminator {
                    terminator: canonical,
                },
                self.current + 1,
            )),
        }
    }

    fn peek_lower(&self) -> Option<String> {
        self.lines
            .get(self.current)
            .map(|l| l.trim().to_ascii_lowercase())
    }
}

/// Strip a leading byte-order mark, normalize line endings, and split.
fn split_lines(source: &str) -> Vec<String> {
    source
        .trim_start_matches('\u{FEFF}')
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(|l| l.trim_end().to_string())
        .collect()
}

/// Find a standalone `=` (one that is not part of `==`, `!=`, `<=`, `>=`).
/// Returns its byte index.
pub(crate) fn find_assignment_operator(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    for (i, c) in line.char_indices() {
        if c != '=' {
            continue;
        }
        let prev = if i > 0 { bytes[i - 1] as char } else { '\0' };
        let next = bytes.get(i + 1).map(|&b| b as char).unwrap_or('\0');
        if matches!(prev, '=' | '!' | '<' | '>') || next == '=' {
            continue;
        }
        return Some(i);
    }
    None
}

/// Split command/call argument text: on commas when any comma is present,
/// otherwise on whitespace. Quoted substrings are never split.
pub(crate) fn split_args(args: &str) -> Vec<String> {
    let mut result = Vec::new();
    if args.trim().is_empty() {
        return result;
    }

    let split_on_comma = args.contains(',');
    let mut buf = String::new();
    let mut in_string = false;

    for c in args.chars() {
        if c == '"' {
            in_string = !in_string;
            buf.push(c);
            continue;
        }
        let is_separator = if split_on_comma {
            c == ','
        } else {
            c.is_whitespace()
        };
        if !in_string && is_separator {
            let part = buf.trim();
            if !part.is_empty() {
                result.push(part.to_string());
            }
            buf.clear();
            continue;
        }
        buf.push(c);
    }

    let part = buf.trim();
    if !part.is_empty() {
        result.push(part.to_string());
    }
    result
}

/// Split off the first whitespace-delimited token.
fn split_first_token(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim_start()),
        None => (line, ""),
    }
}

fn parse_kind(text: &str) -> Result<ValueKind, ParseError> {
    match text.to_ascii_lowercase().as_str() {
        "int" => Ok(ValueKind::Int),
        "real" => Ok(ValueKind::Real),
        "boolean" => Ok(ValueKind::Boolean),
        other => Err(ParseError::UnknownType {
            name: other.to_string(),
        }),
    }
}

fn parse_var_decl(line: &str, line_no: usize) -> Result<Stmt, ParseError> {
    let (kind_text, rest) = split_first_token(line);
    let kind = parse_kind(kind_text)?;
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ParseError::InvalidStatement {
            construct: "variable declaration",
            expected: "<type> <name> [= <expr>]",
        });
    }

    match find_assignment_operator(rest) {
        None => Ok(Stmt::VarDecl {
            kind,
            name: rest.to_string(),
            init: None,
            line: line_no,
        }),
        Some(eq) => {
            let name = rest[..eq].trim().to_string();
            let init = parse_expression(rest[eq + 1..].trim())?;
            Ok(Stmt::VarDecl {
                kind,
                name,
                init: Some(init),
                line: line_no,
            })
        }
    }
}

fn parse_array_decl(line: &str, line_no: usize) -> Result<Stmt, ParseError> {
    // array int nums 10
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(ParseError::InvalidStatement {
            construct: "array declaration",
            expected: "array <type> <name> <length>",
        });
    }
    let element_kind = parse_kind(parts[1])?;
    let name = parts[2].to_string();
    let len = parse_expression(&parts[3..].join(" "))?;
    Ok(Stmt::ArrayDecl {
        element_kind,
        name,
        len,
        line: line_no,
    })
}

fn parse_poke(line: &str, line_no: usize) -> Result<Stmt, ParseError> {
    // poke nums 5 = 99
    let invalid = ParseError::InvalidStatement {
        construct: "poke",
        expected: "poke <array> <index> = <expr>",
    };
    let rest = line[4..].trim();
    let eq = find_assignment_operator(rest).ok_or_else(|| invalid.clone())?;
    let left = rest[..eq].trim();
    let value = parse_expression(rest[eq + 1..].trim())?;

    let (array, index_text) = split_first_token(left);
    if array.is_empty() || index_text.trim().is_empty() {
        return Err(invalid);
    }
    Ok(Stmt::Poke {
        array: array.to_string(),
        index: parse_expression(index_text.trim())?,
        value,
        line: line_no,
    })
}

fn parse_peek(line: &str, line_no: usize) -> Result<Stmt, ParseError> {
    // peek x = nums 5
    let invalid = ParseError::InvalidStatement {
        construct: "peek",
        expected: "peek <dest> = <array> <index>",
    };
    let rest = line[4..].trim();
    let eq = find_assignment_operator(rest).ok_or_else(|| invalid.clone())?;
    let dest = rest[..eq].trim();
    let right = rest[eq + 1..].trim();

    let (array, index_text) = split_first_token(right);
    if dest.is_empty() || array.is_empty() || index_text.trim().is_empty() {
        return Err(invalid);
    }
    Ok(Stmt::Peek {
        dest: dest.to_string(),
        array: array.to_string(),
        index: parse_expression(index_text.trim())?,
        line: line_no,
    })
}

fn parse_call(line: &str, line_no: usize) -> Result<Stmt, ParseError> {
    // call <method> [args...]
    let rest = line[4..].trim();
    let (name, args_text) = split_first_token(rest);
    if name.is_empty() {
        return Err(ParseError::InvalidStatement {
            construct: "call",
            expected: "call <method> [args...]",
        });
    }

    let mut args = Vec::new();
    for part in split_args(args_text.trim()) {
        args.push(parse_expression(&part)?);
    }
    Ok(Stmt::Call {
        name: name.to_string(),
        args,
        line: line_no,
    })
}

//! Expression parsing (operator-precedence)
//!
//! Classic shunting-yard over a pair of operand/operator stacks. The
//! statement parser hands in one trimmed expression substring; the result
//! is a single [`Expr`] tree. An empty substring yields a null literal.

use crate::ast::Expr;
use crate::diagnostic::ParseError;
use crate::lexer::Lexer;
use crate::token::{BinaryOp, Token, UnaryOp};
use crate::value::Value;

/// What the previous token was, for unary `+`/`-` selection.
#[derive(Clone, Copy, PartialEq)]
enum Prev {
    None,
    Value,
    Operator,
    LParen,
}

/// Operator-stack entry
enum OpEntry {
    LParen,
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl OpEntry {
    fn precedence(&self) -> u8 {
        match self {
            // A left paren never takes part in precedence comparison
            OpEntry::LParen => 0,
            OpEntry::Unary(op) => op.precedence(),
            OpEntry::Binary(op) => op.precedence(),
        }
    }
}

/// Parse a trimmed expression substring into an expression tree.
pub fn parse_expression(text: &str) -> Result<Expr, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Expr::Literal(Value::Null));
    }

    let tokens = Lexer::new(text).tokenize()?;

    let mut output: Vec<Expr> = Vec::new();
    let mut ops: Vec<OpEntry> = Vec::new();
    let mut prev = Prev::None;

    for token in tokens {
        match token {
            Token::Int(i) => {
                output.push(Expr::Literal(Value::Int(i)));
                prev = Prev::Value;
            }
            Token::Real(r) => {
                output.push(Expr::Literal(Value::Real(r)));
                prev = Prev::Value;
            }
            Token::Str(s) => {
                output.push(Expr::Literal(Value::string(s)));
                prev = Prev::Value;
            }
            Token::Ident(name) => {
                output.push(resolve_identifier(name));
                prev = Prev::Value;
            }
            Token::LeftParen => {
                ops.push(OpEntry::LParen);
                prev = Prev::LParen;
            }
            Token::RightParen => {
                loop {
                    match ops.pop() {
                        Some(OpEntry::LParen) => break,
                        Some(entry) => apply(entry, &mut output)?,
                        None => return Err(ParseError::MismatchedParens),
                    }
                }
                prev = Prev::Value;
            }
            Token::Bang => {
                push_operator(OpEntry::Unary(UnaryOp::Not), &mut ops, &mut output)?;
                prev = Prev::Operator;
            }
            Token::Op(op) => {
                let unary_position = matches!(prev, Prev::None | Prev::Operator | Prev::LParen);
                let entry = match op {
                    BinaryOp::Add if unary_position => OpEntry::Unary(UnaryOp::Plus),
                    BinaryOp::Sub if unary_position => OpEntry::Unary(UnaryOp::Neg),
                    other => OpEntry::Binary(other),
                };
                push_operator(entry, &mut ops, &mut output)?;
                prev = Prev::Operator;
            }
        }
    }

    while let Some(entry) = ops.pop() {
        if matches!(entry, OpEntry::LParen) {
            return Err(ParseError::MismatchedParens);
        }
        apply(entry, &mut output)?;
    }

    if output.len() != 1 {
        return Err(ParseError::InvalidExpression);
    }
    Ok(output.pop().unwrap_or(Expr::Literal(Value::Null)))
}

/// Pop while the stack top binds at least as tightly, then push.
fn push_operator(
    entry: OpEntry,
    ops: &mut Vec<OpEntry>,
    output: &mut Vec<Expr>,
) -> Result<(), ParseError> {
    while let Some(top) = ops.last() {
        if matches!(top, OpEntry::LParen) || top.precedence() < entry.precedence() {
            break;
        }
        let top = ops.pop().unwrap_or(OpEntry::LParen);
        apply(top, output)?;
    }
    ops.push(entry);
    Ok(())
}

/// Reduce one operator against the operand stack.
fn apply(entry: OpEntry, output: &mut Vec<Expr>) -> Result<(), ParseError> {
    match entry {
        OpEntry::LParen => Err(ParseError::MismatchedParens),
        OpEntry::Unary(op) => {
            let operand = output.pop().ok_or(ParseError::MissingOperand)?;
            output.push(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
            Ok(())
        }
        OpEntry::Binary(op) => {
            let rhs = output.pop().ok_or(ParseError::MissingOperand)?;
            let lhs = output.pop().ok_or(ParseError::MissingOperand)?;
            output.push(Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
            Ok(())
        }
    }
}

/// Keyword literals first (`true`/`false`, the legacy colour names), then a
/// plain identifier reference.
fn resolve_identifier(name: String) -> Expr {
    if name.eq_ignore_ascii_case("true") {
        return Expr::Literal(Value::Bool(true));
    }
    if name.eq_ignore_ascii_case("false") {
        return Expr::Literal(Value::Bool(false));
    }
    // A narrow legacy convenience: four colour names resolve to channel
    // intensities so `pen red 0 0` reads naturally. Not a colour system.
    match name.to_ascii_lowercase().as_str() {
        "red" | "green" | "blue" | "white" => Expr::Literal(Value::Int(255)),
        "black" => Expr::Literal(Value::Int(0)),
        _ => Expr::Ident(name),
    }
}

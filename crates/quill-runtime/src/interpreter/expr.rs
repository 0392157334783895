//! Expression evaluation
//!
//! Numeric operators promote to real when either side is real and stay in
//! wrapping 64-bit integer arithmetic otherwise. `+` concatenates when
//! either side is a string. Equality compares display representations, so
//! `2.0 == 2` holds. `&&` and `||` evaluate both operands.

use super::ExecutionContext;
use crate::ast::Expr;
use crate::token::{BinaryOp, UnaryOp};
use crate::value::{RuntimeError, Value};

pub(crate) fn eval(ctx: &ExecutionContext<'_>, expr: &Expr) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Ident(name) => ctx.get(name),
        Expr::Unary { op, operand } => {
            let value = eval(ctx, operand)?;
            eval_unary(*op, value)
        }
        Expr::Binary { op, lhs, rhs } => {
            let left = eval(ctx, lhs)?;
            let right = eval(ctx, rhs)?;
            eval_binary(*op, left, right)
        }
    }
}

fn eval_unary(op: UnaryOp, value: Value) -> Result<Value, RuntimeError> {
    match op {
        UnaryOp::Neg => match value {
            Value::Int(i) => Ok(Value::Int(i.wrapping_neg())),
            Value::Real(r) => Ok(Value::Real(-r)),
            other => Ok(Value::Real(-other.as_real()?)),
        },
        UnaryOp::Plus => match value {
            Value::Int(_) | Value::Real(_) => Ok(value),
            other => Ok(Value::Real(other.as_real()?)),
        },
        UnaryOp::Not => Ok(Value::Bool(!value.as_bool()?)),
    }
}

fn eval_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Add => {
            // String concatenation wins over numeric addition
            if left.kind() == crate::value::ValueKind::String
                || right.kind() == crate::value::ValueKind::String
            {
                return Ok(Value::string(format!("{}{}", left, right)));
            }
            numeric(left, right, |a, b| a.wrapping_add(b), |a, b| a + b)
        }
        BinaryOp::Sub => numeric(left, right, |a, b| a.wrapping_sub(b), |a, b| a - b),
        BinaryOp::Mul => numeric(left, right, |a, b| a.wrapping_mul(b), |a, b| a * b),
        BinaryOp::Div => divide(left, right),
        BinaryOp::Less => compare(left, right, |a, b| a < b),
        BinaryOp::Greater => compare(left, right, |a, b| a > b),
        BinaryOp::LessEqual => compare(left, right, |a, b| a <= b),
        BinaryOp::GreaterEqual => compare(left, right, |a, b| a >= b),
        // Display-representation equality: "2" == "2.0-as-2", "True" etc.
        BinaryOp::Equal => Ok(Value::Bool(left.to_string() == right.to_string())),
        BinaryOp::NotEqual => Ok(Value::Bool(left.to_string() != right.to_string())),
        BinaryOp::And => Ok(Value::Bool(left.as_bool()? & right.as_bool()?)),
        BinaryOp::Or => Ok(Value::Bool(left.as_bool()? | right.as_bool()?)),
    }
}

/// Integer arithmetic when both sides are ints, real arithmetic otherwise.
fn numeric(
    left: Value,
    right: Value,
    int_op: impl Fn(i64, i64) -> i64,
    real_op: impl Fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    if let (Value::Int(a), Value::Int(b)) = (&left, &right) {
        return Ok(Value::Int(int_op(*a, *b)));
    }
    Ok(Value::Real(real_op(left.as_real()?, right.as_real()?)))
}

/// Division truncates only when both operands are ints; any real operand
/// gives real division, where dividing by zero yields an infinity.
fn divide(left: Value, right: Value) -> Result<Value, RuntimeError> {
    if let (Value::Int(a), Value::Int(b)) = (&left, &right) {
        if *b == 0 {
            return Err(RuntimeError::DivideByZero);
        }
        return Ok(Value::Int(a.wrapping_div(*b)));
    }
    Ok(Value::Real(left.as_real()? / right.as_real()?))
}

fn compare(
    left: Value,
    right: Value,
    op: impl Fn(f64, f64) -> bool,
) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(op(left.as_real()?, right.as_real()?)))
}

//! Statement execution
//!
//! One function per statement shape, dispatched from [`execute`]. The
//! first runtime error unwinds the whole run; `current_line` on the
//! context tracks the statement being executed so the driver can attach a
//! source line to the error.

use super::{eval, ExecutionContext};
use crate::ast::{CanvasStmt, Expr, Stmt, TextSource};
use crate::canvas::Rgb;
use crate::value::{ArrayValue, RuntimeError, Value};

pub(crate) fn execute_block(
    ctx: &mut ExecutionContext<'_>,
    statements: &[Stmt],
) -> Result<(), RuntimeError> {
    for stmt in statements {
        execute(ctx, stmt)?;
    }
    Ok(())
}

pub(crate) fn execute(ctx: &mut ExecutionContext<'_>, stmt: &Stmt) -> Result<(), RuntimeError> {
    ctx.current_line = stmt.line();
    match stmt {
        Stmt::VarDecl {
            kind, name, init, ..
        } => {
            let value = match init {
                Some(expr) => eval(ctx, expr)?.coerce_to(*kind)?,
                None => kind.zero_value(),
            };
            ctx.declare(name, value);
            Ok(())
        }
        Stmt::Assign { name, value, .. } => {
            let value = eval(ctx, value)?;
            ctx.assign(name, value);
            Ok(())
        }
        Stmt::ArrayDecl {
            element_kind,
            name,
            len,
            ..
        } => {
            let len = eval(ctx, len)?.as_int()?;
            if len < 0 {
                return Err(RuntimeError::NegativeLength { len });
            }
            ctx.declare(
                name,
                Value::array(ArrayValue::new(*element_kind, len as usize)),
            );
            Ok(())
        }
        Stmt::Poke {
            array,
            index,
            value,
            ..
        } => {
            let handle = ctx.resolve_array(array)?;
            let index = eval(ctx, index)?.as_int()?;
            let value = eval(ctx, value)?;
            let mut array = handle.borrow_mut();
            array.set(index, value)
        }
        Stmt::Peek {
            dest,
            array,
            index,
            ..
        } => {
            let handle = ctx.resolve_array(array)?;
            let index = eval(ctx, index)?.as_int()?;
            let value = handle.borrow().get(index)?;
            ctx.assign(dest, value);
            Ok(())
        }
        Stmt::If {
            condition,
            then_block,
            else_block,
            ..
        } => {
            if eval(ctx, condition)?.as_bool()? {
                execute_block(ctx, then_block)
            } else if let Some(block) = else_block {
                execute_block(ctx, block)
            } else {
                Ok(())
            }
        }
        Stmt::While {
            condition, body, ..
        } => {
            while eval(ctx, condition)?.as_bool()? {
                execute_block(ctx, body)?;
            }
            Ok(())
        }
        Stmt::For {
            var,
            start,
            end,
            step,
            body,
            ..
        } => execute_for(ctx, var, start, end, step, body),
        Stmt::Call { name, args, .. } => execute_call(ctx, name, args),
        Stmt::Write { expr, .. } => {
            let text = eval(ctx, expr)?.to_string();
            ctx.write_output(&text);
            Ok(())
        }
        Stmt::Canvas { op, .. } => execute_canvas(ctx, op),
    }
}

/// Loop bounds and step are evaluated once, before the first iteration,
/// and a hidden counter drives the loop, so mutating any of their source
/// variables (or the loop variable itself) inside the body never changes
/// the trip count. The step's sign picks the direction of the end test;
/// the loop variable is re-assigned at the top of every iteration and
/// survives the loop in the enclosing scope.
fn execute_for(
    ctx: &mut ExecutionContext<'_>,
    var: &str,
    start: &Expr,
    end: &Expr,
    step: &Expr,
    body: &[Stmt],
) -> Result<(), RuntimeError> {
    let start = eval(ctx, start)?.as_int()?;
    let end = eval(ctx, end)?.as_int()?;
    let step = eval(ctx, step)?.as_int()?;
    if step == 0 {
        return Err(RuntimeError::ZeroStep);
    }

    ctx.assign(var, Value::Int(start));

    let mut counter = start;
    while (step > 0 && counter <= end) || (step < 0 && counter >= end) {
        ctx.assign(var, Value::Int(counter));
        execute_block(ctx, body)?;
        counter = counter.wrapping_add(step);
    }
    Ok(())
}

/// Calls return through a slot named after the method: the callee frame
/// starts with that slot at the return kind's zero value, the body assigns
/// into it, and after the frame pops the slot's value lands in the caller's
/// scope under the same name.
fn execute_call(
    ctx: &mut ExecutionContext<'_>,
    name: &str,
    args: &[Expr],
) -> Result<(), RuntimeError> {
    let method = ctx.method(name)?;
    if args.len() != method.params.len() {
        return Err(RuntimeError::ArityMismatch {
            name: method.name.clone(),
            expected: method.params.len(),
            got: args.len(),
        });
    }

    // Argument expressions see the caller's scope
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(eval(ctx, arg)?);
    }

    ctx.push_frame();
    ctx.declare(&method.name, method.return_kind.zero_value());
    let bind = method
        .params
        .iter()
        .zip(values)
        .try_for_each(|(param, value)| {
            let coerced = value.coerce_to(param.kind)?;
            ctx.declare(&param.name, coerced);
            Ok(())
        });

    let result = bind.and_then(|_| execute_block(ctx, &method.body));
    let slot = ctx.get(&method.name);
    ctx.pop_frame();
    result?;

    // Make the result visible to the caller under the method's name
    let value = slot?;
    ctx.assign(&method.name, value);
    Ok(())
}

fn execute_canvas(ctx: &mut ExecutionContext<'_>, op: &CanvasStmt) -> Result<(), RuntimeError> {
    match op {
        CanvasStmt::MoveTo { x, y } => {
            let (x, y) = eval_point(ctx, x, y)?;
            ctx.canvas().move_to(x, y);
        }
        CanvasStmt::DrawTo { x, y } => {
            let (x, y) = eval_point(ctx, x, y)?;
            ctx.canvas().draw_to(x, y);
        }
        CanvasStmt::Circle { radius } => {
            let radius = eval_i32(ctx, radius)?;
            ctx.canvas().circle(radius, false);
        }
        CanvasStmt::Rect { width, height } => {
            let (width, height) = eval_point(ctx, width, height)?;
            ctx.canvas().rect(width, height, false);
        }
        CanvasStmt::Tri { width, height } => {
            let (width, height) = eval_point(ctx, width, height)?;
            ctx.canvas().triangle(width, height);
        }
        CanvasStmt::Pen { red, green, blue } => {
            let colour = Rgb {
                r: eval_channel(ctx, red)?,
                g: eval_channel(ctx, green)?,
                b: eval_channel(ctx, blue)?,
            };
            ctx.canvas().set_pen_colour(colour);
        }
        CanvasStmt::Clear => ctx.canvas().clear(),
        CanvasStmt::Reset => ctx.canvas().reset(),
        CanvasStmt::Resize { width, height } => {
            let (width, height) = eval_point(ctx, width, height)?;
            ctx.canvas().resize(width, height);
        }
        CanvasStmt::Text(source) => {
            let text = match source {
                TextSource::Raw(raw) => raw.clone(),
                TextSource::Expr(expr) => eval(ctx, expr)?.to_string(),
            };
            ctx.write_output(&text);
        }
    }
    Ok(())
}

fn eval_i32(ctx: &ExecutionContext<'_>, expr: &Expr) -> Result<i32, RuntimeError> {
    Ok(eval(ctx, expr)?.as_int()? as i32)
}

fn eval_point(
    ctx: &ExecutionContext<'_>,
    x: &Expr,
    y: &Expr,
) -> Result<(i32, i32), RuntimeError> {
    Ok((eval_i32(ctx, x)?, eval_i32(ctx, y)?))
}

/// Pen channels clamp into 0..=255 rather than wrap.
fn eval_channel(ctx: &ExecutionContext<'_>, expr: &Expr) -> Result<u8, RuntimeError> {
    Ok(eval(ctx, expr)?.as_int()?.clamp(0, 255) as u8)
}

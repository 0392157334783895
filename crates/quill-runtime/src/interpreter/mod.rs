//! Tree-walking interpreter
//!
//! Execution state lives in [`ExecutionContext`]: a stack of scope frames
//! (the global frame plus one per active method call), the method table,
//! the alias table, and the canvas. Variable names are case-insensitive,
//! so every frame key is ASCII-lowercased on the way in.

mod expr;
mod stmt;

pub(crate) use expr::eval;
pub(crate) use stmt::execute_block;

use crate::ast::{MethodDef, MethodTable};
use crate::canvas::Canvas;
use crate::value::{ArrayRef, RuntimeError, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Caller-supplied compatibility aliases: old names that should resolve to
/// renamed arrays or methods. Empty by default; lookups only consult it
/// after a direct miss.
#[derive(Debug, Default, Clone)]
pub struct AliasTable {
    arrays: HashMap<String, String>,
    methods: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_array_alias(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.arrays
            .insert(from.into().to_ascii_lowercase(), to.into().to_ascii_lowercase());
    }

    pub fn add_method_alias(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.methods
            .insert(from.into().to_ascii_lowercase(), to.into().to_ascii_lowercase());
    }

    /// Resolve a lowercased array name through the table, if aliased.
    fn resolve_array(&self, lower: &str) -> Option<&str> {
        self.arrays.get(lower).map(String::as_str)
    }

    /// Resolve a lowercased method name through the table, if aliased.
    fn resolve_method(&self, lower: &str) -> Option<&str> {
        self.methods.get(lower).map(String::as_str)
    }
}

/// All mutable state of one program run.
pub struct ExecutionContext<'a> {
    frames: Vec<HashMap<String, Value>>,
    methods: MethodTable,
    aliases: AliasTable,
    canvas: &'a mut dyn Canvas,
    log: Vec<String>,
    sink: Option<&'a mut dyn FnMut(&str)>,
    /// 1-based line of the statement currently executing
    pub(crate) current_line: usize,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        methods: MethodTable,
        aliases: AliasTable,
        canvas: &'a mut dyn Canvas,
        sink: Option<&'a mut dyn FnMut(&str)>,
    ) -> Self {
        Self {
            frames: vec![HashMap::new()],
            methods,
            aliases,
            canvas,
            log: Vec::new(),
            sink,
            current_line: 0,
        }
    }

    /// Create or overwrite a slot in the innermost frame.
    pub fn declare(&mut self, name: &str, value: Value) {
        let frame = self
            .frames
            .last_mut()
            .unwrap_or_else(|| unreachable!("global frame always present"));
        frame.insert(name.to_ascii_lowercase(), value);
    }

    /// Write a value, searching frames innermost-first. The value is
    /// stored unchanged; when no binding exists anywhere, one is created
    /// in the innermost frame.
    pub fn assign(&mut self, name: &str, value: Value) {
        let key = name.to_ascii_lowercase();
        for frame in self.frames.iter_mut().rev() {
            if let Some(slot) = frame.get_mut(&key) {
                *slot = value;
                return;
            }
        }
        let frame = self
            .frames
            .last_mut()
            .unwrap_or_else(|| unreachable!("global frame always present"));
        frame.insert(key, value);
    }

    /// Read a variable, searching frames innermost-first.
    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        self.try_get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    pub fn try_get(&self, name: &str) -> Option<&Value> {
        let key = name.to_ascii_lowercase();
        self.frames.iter().rev().find_map(|frame| frame.get(&key))
    }

    /// Look up an array variable, consulting the alias table on a miss.
    pub fn resolve_array(&self, name: &str) -> Result<ArrayRef, RuntimeError> {
        let key = name.to_ascii_lowercase();
        let value = match self.try_get(&key) {
            Some(v) => Some(v),
            None => self
                .aliases
                .resolve_array(&key)
                .and_then(|target| self.try_get(target)),
        };
        match value {
            Some(Value::Array(arr)) => Ok(Rc::clone(arr)),
            Some(_) => Err(RuntimeError::NotAnArray {
                name: name.to_string(),
            }),
            None => Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }

    /// Look up a method, consulting the alias table on a miss.
    pub fn method(&self, name: &str) -> Result<Rc<MethodDef>, RuntimeError> {
        let key = name.to_ascii_lowercase();
        self.methods
            .get(&key)
            .or_else(|| {
                self.aliases
                    .resolve_method(&key)
                    .and_then(|target| self.methods.get(target))
            })
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedMethod {
                name: name.to_string(),
            })
    }

    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pop the innermost method frame. The global frame is never popped.
    pub fn pop_frame(&mut self) {
        debug_assert!(self.frames.len() > 1, "attempted to pop the global frame");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Emit one line of program output: appended to the run log, forwarded
    /// to the external sink, and written onto the canvas.
    pub fn write_output(&mut self, text: &str) {
        self.log.push(text.to_string());
        if let Some(sink) = self.sink.as_mut() {
            sink(text);
        }
        self.canvas.write_text(text);
    }

    pub fn canvas(&mut self) -> &mut dyn Canvas {
        self.canvas
    }

    /// All output emitted so far, one entry per `write`/`text` statement.
    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::value::ValueKind;

    fn context(canvas: &mut RecordingCanvas) -> ExecutionContext<'_> {
        ExecutionContext::new(MethodTable::new(), AliasTable::new(), canvas, None)
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let mut canvas = RecordingCanvas::new();
        let mut ctx = context(&mut canvas);
        ctx.declare("Count", Value::Int(5));
        assert_eq!(ctx.get("COUNT").unwrap(), Value::Int(5));
        assert_eq!(ctx.get("count").unwrap(), Value::Int(5));
    }

    #[test]
    fn test_assign_stores_the_value_unchanged() {
        let mut canvas = RecordingCanvas::new();
        let mut ctx = context(&mut canvas);
        ctx.declare("x", ValueKind::Int.zero_value());
        ctx.assign("x", Value::Real(2.5));
        assert_eq!(ctx.get("x").unwrap(), Value::Real(2.5));
    }

    #[test]
    fn test_assign_creates_missing_binding_innermost() {
        let mut canvas = RecordingCanvas::new();
        let mut ctx = context(&mut canvas);
        ctx.push_frame();
        ctx.assign("ghost", Value::Int(1));
        assert_eq!(ctx.get("ghost").unwrap(), Value::Int(1));
        ctx.pop_frame();
        // The binding lived in the popped frame, not the global one
        assert!(ctx.try_get("ghost").is_none());
    }

    #[test]
    fn test_assign_updates_outer_binding_through_frames() {
        let mut canvas = RecordingCanvas::new();
        let mut ctx = context(&mut canvas);
        ctx.declare("x", Value::Int(1));
        ctx.push_frame();
        ctx.assign("x", Value::Int(9));
        ctx.pop_frame();
        assert_eq!(ctx.get("x").unwrap(), Value::Int(9));
    }

    #[test]
    fn test_inner_frame_shadows_then_falls_through() {
        let mut canvas = RecordingCanvas::new();
        let mut ctx = context(&mut canvas);
        ctx.declare("x", Value::Int(1));
        ctx.push_frame();
        assert_eq!(ctx.get("x").unwrap(), Value::Int(1));
        ctx.declare("x", Value::Int(2));
        assert_eq!(ctx.get("x").unwrap(), Value::Int(2));
        ctx.pop_frame();
        assert_eq!(ctx.get("x").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_array_alias_resolves_after_miss() {
        let mut canvas = RecordingCanvas::new();
        let mut aliases = AliasTable::new();
        aliases.add_array_alias("log", "logs");
        let mut ctx =
            ExecutionContext::new(MethodTable::new(), aliases, &mut canvas, None);
        ctx.declare(
            "logs",
            Value::array(crate::value::ArrayValue::new(ValueKind::Int, 2)),
        );
        assert!(ctx.resolve_array("log").is_ok());
    }

    #[test]
    fn test_non_array_variable_is_not_an_array() {
        let mut canvas = RecordingCanvas::new();
        let mut ctx = context(&mut canvas);
        ctx.declare("x", Value::Int(1));
        assert!(matches!(
            ctx.resolve_array("x"),
            Err(RuntimeError::NotAnArray { .. })
        ));
    }

    #[test]
    fn test_write_output_reaches_log_and_canvas() {
        let mut canvas = RecordingCanvas::new();
        let mut ctx = context(&mut canvas);
        ctx.write_output("hello");
        assert_eq!(ctx.take_log(), vec!["hello".to_string()]);
        drop(ctx);
        assert_eq!(
            canvas.ops(),
            &[crate::canvas::CanvasOp::Text("hello".to_string())]
        );
    }
}

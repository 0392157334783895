//! Runtime value representation
//!
//! Shared value model for the parser and interpreter.
//! - Null, Int, Real, Bool: immediate values (stack-allocated)
//! - Strings: heap-allocated, reference-counted (Arc<String>), immutable
//! - Arrays: fixed-length typed arrays behind Rc<RefCell<..>> so that `poke`
//!   mutates through whichever scope slot holds the array
//!
//! Values are immutable once constructed; conversions always produce a new
//! value. Every conversion rule here mirrors the language definition: reals
//! round half away from zero when narrowed to int, booleans widen to 1/0,
//! and strings parse with invariant formatting.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;

/// The closed set of Quill value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Int,
    Real,
    Boolean,
    String,
    Array,
}

impl ValueKind {
    /// The zero value a declaration of this kind starts with.
    pub fn zero_value(self) -> Value {
        match self {
            ValueKind::Int => Value::Int(0),
            ValueKind::Real => Value::Real(0.0),
            ValueKind::Boolean => Value::Bool(false),
            ValueKind::String => Value::string(""),
            ValueKind::Null | ValueKind::Array => Value::Null,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Int => "int",
            ValueKind::Real => "real",
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
            ValueKind::Array => "array",
        };
        write!(f, "{}", name)
    }
}

/// Shared handle to a typed array value.
pub type ArrayRef = Rc<RefCell<ArrayValue>>;

/// Runtime value type
#[derive(Clone)]
pub enum Value {
    /// Absent value (uninitialised expression, empty literal)
    Null,
    /// Integer value
    Int(i64),
    /// Real value (IEEE 754 double-precision)
    Real(f64),
    /// Boolean value
    Bool(bool),
    /// String value (reference-counted, immutable)
    Str(Arc<String>),
    /// Fixed-length typed array (shared, interior-mutable)
    Array(ArrayRef),
}

impl Value {
    /// Create a new string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Arc::new(s.into()))
    }

    /// Wrap an array value in a shared handle
    pub fn array(arr: ArrayValue) -> Self {
        Value::Array(Rc::new(RefCell::new(arr)))
    }

    /// The kind tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Int(_) => ValueKind::Int,
            Value::Real(_) => ValueKind::Real,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Str(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
        }
    }

    /// Narrow to int. Reals round half away from zero; strings parse.
    pub fn as_int(&self) -> Result<i64, RuntimeError> {
        match self {
            Value::Int(i) => Ok(*i),
            Value::Real(r) => Ok(r.round() as i64),
            Value::Bool(b) => Ok(if *b { 1 } else { 0 }),
            Value::Str(s) => s.trim().parse::<i64>().map_err(|_| RuntimeError::InvalidParse {
                text: s.as_ref().clone(),
                to: ValueKind::Int,
            }),
            _ => Err(RuntimeError::Conversion {
                from: self.kind(),
                to: ValueKind::Int,
            }),
        }
    }

    /// Widen to real
    pub fn as_real(&self) -> Result<f64, RuntimeError> {
        match self {
            Value::Real(r) => Ok(*r),
            Value::Int(i) => Ok(*i as f64),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => s.trim().parse::<f64>().map_err(|_| RuntimeError::InvalidParse {
                text: s.as_ref().clone(),
                to: ValueKind::Real,
            }),
            _ => Err(RuntimeError::Conversion {
                from: self.kind(),
                to: ValueKind::Real,
            }),
        }
    }

    /// Coerce to boolean. Numbers test nonzero; strings parse "true"/"false".
    pub fn as_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            Value::Real(r) => Ok(r.abs() > f64::EPSILON),
            Value::Str(s) => {
                let t = s.trim();
                if t.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if t.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(RuntimeError::InvalidParse {
                        text: s.as_ref().clone(),
                        to: ValueKind::Boolean,
                    })
                }
            }
            _ => Err(RuntimeError::Conversion {
                from: self.kind(),
                to: ValueKind::Boolean,
            }),
        }
    }

    /// Borrow the array handle, or fail if this is not an array.
    pub fn as_array(&self) -> Result<ArrayRef, RuntimeError> {
        match self {
            Value::Array(arr) => Ok(Rc::clone(arr)),
            _ => Err(RuntimeError::Conversion {
                from: self.kind(),
                to: ValueKind::Array,
            }),
        }
    }

    /// Convert to the declared kind of a variable or parameter slot.
    /// Null and array targets keep the value unchanged.
    pub fn coerce_to(&self, kind: ValueKind) -> Result<Value, RuntimeError> {
        match kind {
            ValueKind::Int => Ok(Value::Int(self.as_int()?)),
            ValueKind::Real => Ok(Value::Real(self.as_real()?)),
            ValueKind::Boolean => Ok(Value::Bool(self.as_bool()?)),
            ValueKind::String => Ok(Value::string(self.to_string())),
            ValueKind::Null | ValueKind::Array => Ok(self.clone()),
        }
    }
}

impl fmt::Display for Value {
    /// Invariant display formatting: whole reals print with no trailing
    /// `.0`, booleans print `True`/`False`, arrays print a fixed
    /// placeholder. This is also the representation compared by `==`/`!=`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Real(r) => {
                if r.fract() == 0.0 && r.is_finite() {
                    write!(f, "{:.0}", r)
                } else {
                    write!(f, "{}", r)
                }
            }
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Str(s) => write!(f, "{}", s.as_ref()),
            Value::Array(_) => write!(f, "[array]"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Real(r) => write!(f, "Real({})", r),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Str(s) => write!(f, "Str({:?})", s.as_ref()),
            Value::Array(arr) => write!(f, "Array(len={})", arr.borrow().len()),
        }
    }
}

impl PartialEq for Value {
    /// Structural equality for scalars; identity equality for arrays
    /// (two array handles are equal only if they are the same allocation).
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Fixed-length typed array. The element kind is fixed at construction and
/// every slot starts at that kind's zero value. Length never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    kind: ValueKind,
    items: Vec<Value>,
}

impl ArrayValue {
    pub fn new(kind: ValueKind, len: usize) -> Self {
        Self {
            kind,
            items: vec![kind.zero_value(); len],
        }
    }

    pub fn element_kind(&self) -> ValueKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bounds-checked read. Negative indexes are out of bounds.
    pub fn get(&self, index: i64) -> Result<Value, RuntimeError> {
        self.check_bounds(index)?;
        Ok(self.items[index as usize].clone())
    }

    /// Bounds-checked write with element-kind enforcement. An int value
    /// promotes into a real-kind array (and a real narrows into an int-kind
    /// array); any other kind mismatch is fatal.
    pub fn set(&mut self, index: i64, value: Value) -> Result<(), RuntimeError> {
        self.check_bounds(index)?;

        let stored = if value.kind() == self.kind {
            value
        } else {
            match (self.kind, value.kind()) {
                (ValueKind::Real, ValueKind::Int) => Value::Real(value.as_real()?),
                (ValueKind::Int, ValueKind::Real) => Value::Int(value.as_int()?),
                (expected, got) => return Err(RuntimeError::ElementKind { expected, got }),
            }
        };

        self.items[index as usize] = stored;
        Ok(())
    }

    fn check_bounds(&self, index: i64) -> Result<(), RuntimeError> {
        if index < 0 || index as usize >= self.items.len() {
            return Err(RuntimeError::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}

/// Runtime error type. The first error raised anywhere aborts the run and
/// unwinds to the `execute` boundary; there is no local recovery.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("variable '{name}' is not defined")]
    UndefinedVariable { name: String },
    #[error("method '{name}' is not defined")]
    UndefinedMethod { name: String },
    #[error("method '{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("array index {index} out of range (0..{len})")]
    OutOfBounds { index: i64, len: usize },
    #[error("cannot convert {from} to {to}")]
    Conversion { from: ValueKind, to: ValueKind },
    #[error("cannot interpret '{text}' as {to}")]
    InvalidParse { text: String, to: ValueKind },
    #[error("'{name}' is not an array")]
    NotAnArray { name: String },
    #[error("cannot assign {got} to array of {expected}")]
    ElementKind {
        expected: ValueKind,
        got: ValueKind,
    },
    #[error("division by zero")]
    DivideByZero,
    #[error("for loop step cannot be 0")]
    ZeroStep,
    #[error("array length cannot be negative (was {len})")]
    NegativeLength { len: i64 },
    #[error("canvas I/O failed: {message}")]
    CanvasIo { message: String },
}

//! Abstract syntax tree
//!
//! Pure data produced once by parsing and immutable afterwards. Statements
//! carry their 1-based source line so runtime errors can point back at the
//! program text. Method declarations never appear in a statement list:
//! they are registered into the program's method table during parsing.

use crate::value::{Value, ValueKind};
use std::collections::HashMap;
use std::rc::Rc;

pub use crate::token::{BinaryOp, UnaryOp};

/// An evaluatable expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// An executable program statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `int|real|boolean <name> [= <expr>]`
    VarDecl {
        kind: ValueKind,
        name: String,
        init: Option<Expr>,
        line: usize,
    },
    /// `<name> = <expr>`
    Assign {
        name: String,
        value: Expr,
        line: usize,
    },
    /// `array <kind> <name> <length-expr>`
    ArrayDecl {
        element_kind: ValueKind,
        name: String,
        len: Expr,
        line: usize,
    },
    /// `poke <name> <index-expr> = <expr>`
    Poke {
        array: String,
        index: Expr,
        value: Expr,
        line: usize,
    },
    /// `peek <dest> = <name> <index-expr>`
    Peek {
        dest: String,
        array: String,
        index: Expr,
        line: usize,
    },
    If {
        condition: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
        line: usize,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        line: usize,
    },
    /// `for <name> = <start> to <end> step <step>`
    For {
        var: String,
        start: Expr,
        end: Expr,
        step: Expr,
        body: Vec<Stmt>,
        line: usize,
    },
    /// `call <name> <args...>`
    Call {
        name: String,
        args: Vec<Expr>,
        line: usize,
    },
    /// `write <expr>`
    Write { expr: Expr, line: usize },
    /// A drawing/utility command resolved at parse time
    Canvas { op: CanvasStmt, line: usize },
}

impl Stmt {
    /// 1-based source line this statement was parsed from
    pub fn line(&self) -> usize {
        match self {
            Stmt::VarDecl { line, .. }
            | Stmt::Assign { line, .. }
            | Stmt::ArrayDecl { line, .. }
            | Stmt::Poke { line, .. }
            | Stmt::Peek { line, .. }
            | Stmt::If { line, .. }
            | Stmt::While { line, .. }
            | Stmt::For { line, .. }
            | Stmt::Call { line, .. }
            | Stmt::Write { line, .. }
            | Stmt::Canvas { line, .. } => *line,
        }
    }
}

/// The closed set of canvas commands. Keyword dispatch happens once during
/// parsing; execution matches exhaustively on these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasStmt {
    MoveTo { x: Expr, y: Expr },
    DrawTo { x: Expr, y: Expr },
    Circle { radius: Expr },
    Rect { width: Expr, height: Expr },
    Tri { width: Expr, height: Expr },
    Pen { red: Expr, green: Expr, blue: Expr },
    Clear,
    Reset,
    Resize { width: Expr, height: Expr },
    Text(TextSource),
}

/// Argument of a `text` command: either the raw remainder of the line or a
/// parsed expression (quoted, operator-bearing, or single-identifier text).
#[derive(Debug, Clone, PartialEq)]
pub enum TextSource {
    Raw(String),
    Expr(Expr),
}

/// A typed method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub kind: ValueKind,
    pub name: String,
}

/// A user-defined method. The return value travels through a slot named
/// after the method itself.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub return_kind: ValueKind,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

/// Method table keyed by ASCII-lowercased method name
pub type MethodTable = HashMap<String, Rc<MethodDef>>;

/// A fully parsed program: the main statement sequence plus every method
/// registered during the parse.
#[derive(Debug, Clone)]
pub struct Program {
    pub main: Vec<Stmt>,
    pub methods: MethodTable,
}

//! Statement AST nodes

use super::{Declaration, Expr};
use crate::common::Span;

/// Statement node
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Compound statement: { ... }
    Block(Block),

    /// Local declaration: int i = 0;
    Declaration(Declaration),

    /// Expression statement: expr;
    Expr(Expr),

    /// Empty statement: ;
    Empty,

    /// If statement: if (cond) then [else else]
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// While loop: while (cond) body
    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    /// For loop: for (init; cond; step) body
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: Box<Stmt>,
    },

    /// Switch statement: switch (expr) { case e: ... default: ... }
    Switch {
        expr: Expr,
        cases: Vec<SwitchCase>,
        default: Option<SwitchCase>,
    },

    /// Break statement
    Break,

    /// Continue statement
    Continue,

    /// Return statement: return [expr];
    Return(Option<Expr>),
}

/// Block (compound statement)
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }
}

/// One arm of a switch. `label` is `None` for the default arm.
#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub label: Option<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl SwitchCase {
    pub fn new(label: Option<Expr>, body: Vec<Stmt>, span: Span) -> Self {
        Self { label, body, span }
    }
}

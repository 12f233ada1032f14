//! Abstract Syntax Tree definitions

mod expr;
mod stmt;
mod decl;

pub use expr::*;
pub use stmt::*;
pub use decl::*;

pub use crate::types::Type;

use crate::common::Span;

/// A complete shader source file
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

impl Program {
    pub fn new(declarations: Vec<Declaration>) -> Self {
        Self { declarations }
    }
}

/// A name with its location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

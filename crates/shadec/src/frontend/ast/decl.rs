//! Declaration AST nodes

use super::{Block, Expr, Identifier, Type};
use crate::common::Span;

/// Declaration node
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclKind,
    pub span: Span,
}

impl Declaration {
    pub fn new(kind: DeclKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The declared name
    pub fn name(&self) -> &Identifier {
        match &self.kind {
            DeclKind::Variable(var) => &var.name,
            DeclKind::Function(func) => &func.name,
        }
    }
}

/// Declaration kinds
#[derive(Debug, Clone)]
pub enum DeclKind {
    /// Variable declaration: vec3 color = vec;
    Variable(VarDecl),

    /// Function definition: float f(int x) { ... }
    Function(FnDecl),
}

/// Storage qualifier on a variable: in, out, const, uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeQualifier {
    In,
    Out,
    Const,
    Uniform,
}

impl TypeQualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeQualifier::In => "in",
            TypeQualifier::Out => "out",
            TypeQualifier::Const => "const",
            TypeQualifier::Uniform => "uniform",
        }
    }
}

/// Variable declaration (also used for function formals)
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: Identifier,
    pub ty: Type,
    pub qualifier: Option<TypeQualifier>,
    pub init: Option<Expr>,
    pub span: Span,
}

impl VarDecl {
    pub fn new(name: Identifier, ty: Type, span: Span) -> Self {
        Self {
            name,
            ty,
            qualifier: None,
            init: None,
            span,
        }
    }

    pub fn with_qualifier(mut self, qualifier: TypeQualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    pub fn with_init(mut self, init: Expr) -> Self {
        self.init = Some(init);
        self
    }
}

/// Function definition
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub name: Identifier,
    pub return_type: Type,
    pub params: Vec<VarDecl>,
    pub body: Block,
    pub span: Span,
}

impl FnDecl {
    pub fn new(name: Identifier, return_type: Type, params: Vec<VarDecl>, body: Block, span: Span) -> Self {
        Self {
            name,
            return_type,
            params,
            body,
            span,
        }
    }
}

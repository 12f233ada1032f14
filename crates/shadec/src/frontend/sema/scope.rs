//! Symbol table and scope management

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::ast::{FnDecl, Type, VarDecl};
use std::collections::HashMap;

/// A symbol in the symbol table.
///
/// Symbols borrow their declaring node from the program being checked.
#[derive(Debug, Clone, Copy)]
pub struct Symbol<'a> {
    pub name: &'a str,
    pub kind: SymbolKind<'a>,
}

/// Kind of symbol
#[derive(Debug, Clone, Copy)]
pub enum SymbolKind<'a> {
    Variable(&'a VarDecl),
    Function(&'a FnDecl),
}

impl<'a> Symbol<'a> {
    pub fn variable(decl: &'a VarDecl) -> Self {
        Self {
            name: decl.name.as_str(),
            kind: SymbolKind::Variable(decl),
        }
    }

    pub fn function(decl: &'a FnDecl) -> Self {
        Self {
            name: decl.name.as_str(),
            kind: SymbolKind::Function(decl),
        }
    }

    /// Location of the declared name
    pub fn span(&self) -> Span {
        match self.kind {
            SymbolKind::Variable(var) => var.name.span,
            SymbolKind::Function(func) => func.name.span,
        }
    }

    /// Declared type of a variable symbol
    pub fn variable_type(&self) -> Option<&'a Type> {
        match self.kind {
            SymbolKind::Variable(var) => Some(&var.ty),
            SymbolKind::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&'a FnDecl> {
        match self.kind {
            SymbolKind::Function(func) => Some(func),
            SymbolKind::Variable(_) => None,
        }
    }
}

/// How far a lookup may walk from the innermost scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePolicy {
    /// Innermost scope only
    CurrentOnly,
    /// Innermost scope outward to the global scope
    Enclosing,
}

/// A single lexical scope
#[derive(Debug, Default)]
pub struct ScopedTable<'a> {
    symbols: HashMap<&'a str, Symbol<'a>>,
}

impl<'a> ScopedTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol, replacing any symbol with the same name
    pub fn insert(&mut self, symbol: Symbol<'a>) {
        self.symbols.insert(symbol.name, symbol);
    }

    pub fn remove(&mut self, name: &str) -> Option<Symbol<'a>> {
        self.symbols.remove(name)
    }

    pub fn find(&self, name: &str) -> Option<Symbol<'a>> {
        self.symbols.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Stack of scopes. The bottom entry is the global scope and is never popped.
#[derive(Debug)]
pub struct SymbolTable<'a> {
    scopes: Vec<ScopedTable<'a>>,
}

impl<'a> SymbolTable<'a> {
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopedTable::new()],
        }
    }

    /// Enter a new, empty scope
    pub fn push(&mut self) {
        self.scopes.push(ScopedTable::new());
    }

    /// Leave the innermost scope
    pub fn pop(&mut self) -> CompileResult<()> {
        if self.scopes.len() <= 1 {
            return Err(CompileError::internal("attempted to pop the global scope"));
        }
        self.scopes.pop();
        Ok(())
    }

    /// Number of live scopes, the global scope included
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn insert(&mut self, symbol: Symbol<'a>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(symbol);
        }
    }

    /// Remove `name` from the innermost scope
    pub fn remove(&mut self, name: &str) -> Option<Symbol<'a>> {
        self.scopes.last_mut().and_then(|scope| scope.remove(name))
    }

    pub fn find(&self, name: &str, policy: ScopePolicy) -> Option<Symbol<'a>> {
        match policy {
            ScopePolicy::CurrentOnly => self.scopes.last().and_then(|scope| scope.find(name)),
            ScopePolicy::Enclosing => self.scopes.iter().rev().find_map(|scope| scope.find(name)),
        }
    }
}

impl Default for SymbolTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::Identifier;

    fn var(name: &str, ty: Type, at: usize) -> VarDecl {
        let span = Span::new(at, at + name.len());
        VarDecl::new(Identifier::new(name, span), ty, span)
    }

    #[test]
    fn test_global_scope_cannot_be_popped() {
        let mut table = SymbolTable::new();
        assert_eq!(table.depth(), 1);
        assert!(matches!(table.pop(), Err(CompileError::Internal { .. })));
        assert_eq!(table.depth(), 1);
    }

    #[test]
    fn test_shadow_then_restore() {
        let outer = var("x", Type::Int, 0);
        let inner = var("x", Type::Float, 10);
        let mut table = SymbolTable::new();

        table.insert(Symbol::variable(&outer));
        table.push();
        table.insert(Symbol::variable(&inner));
        let found = table.find("x", ScopePolicy::Enclosing).unwrap();
        assert_eq!(found.variable_type(), Some(&Type::Float));

        table.pop().unwrap();
        let found = table.find("x", ScopePolicy::Enclosing).unwrap();
        assert_eq!(found.variable_type(), Some(&Type::Int));
    }

    #[test]
    fn test_current_only_ignores_enclosing() {
        let outer = var("x", Type::Int, 0);
        let mut table = SymbolTable::new();

        table.insert(Symbol::variable(&outer));
        table.push();
        assert!(table.find("x", ScopePolicy::CurrentOnly).is_none());
        assert!(table.find("x", ScopePolicy::Enclosing).is_some());
        assert!(table.find("y", ScopePolicy::Enclosing).is_none());
    }

    #[test]
    fn test_insert_last_write_wins() {
        let first = var("x", Type::Int, 0);
        let second = var("x", Type::Bool, 20);
        let mut table = SymbolTable::new();

        table.insert(Symbol::variable(&first));
        table.insert(Symbol::variable(&second));
        let found = table.find("x", ScopePolicy::CurrentOnly).unwrap();
        assert_eq!(found.span(), Span::new(20, 21));
    }

    #[test]
    fn test_remove_only_touches_innermost() {
        let outer = var("x", Type::Int, 0);
        let mut table = SymbolTable::new();

        table.insert(Symbol::variable(&outer));
        table.push();
        assert!(table.remove("x").is_none());
        assert!(table.find("x", ScopePolicy::Enclosing).is_some());
    }
}

//! Semantic analysis module
//!
//! This module checks scoping, types and control-flow legality, reporting
//! violations to a [`DiagnosticSink`].

mod analyzer;
mod context;
mod diagnostic;
mod expr;
mod scope;
mod swizzle;

pub use analyzer::{check, SemanticAnalyzer};
pub use context::{AnalysisContext, ReturnFrame};
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, LookupReason, ReportingSink};
pub use scope::{ScopePolicy, ScopedTable, Symbol, SymbolKind, SymbolTable};
pub use swizzle::Swizzle;

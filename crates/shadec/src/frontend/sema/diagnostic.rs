//! Semantic diagnostics and the sinks that receive them

use crate::common::{DiagnosticReporter, Span};
use crate::frontend::ast::Type;
use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use thiserror::Error;

/// What a failed name lookup was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupReason {
    Variable,
}

impl LookupReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupReason::Variable => "variable",
        }
    }
}

/// A semantic rule violation. All kinds are recoverable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    #[error("declaration of '{name}' conflicts with an earlier declaration")]
    DeclConflict { name: String, prior: Span },

    #[error("cannot initialize '{name}' of type {expected} with a value of type {given}")]
    InvalidInitialization {
        name: String,
        expected: Type,
        given: Type,
    },

    #[error("no declaration found for {} '{name}'", .reason.as_str())]
    IdentifierNotDeclared { name: String, reason: LookupReason },

    #[error("incompatible operand: {op} {operand}")]
    IncompatibleOperand { op: &'static str, operand: Type },

    #[error("incompatible operands: {left} {op} {right}")]
    IncompatibleOperands {
        op: &'static str,
        left: Type,
        right: Type,
    },

    #[error("test expression must have boolean type")]
    TestNotBoolean,

    #[error("incompatible return: {given} given, {expected} expected")]
    ReturnMismatch { given: Type, expected: Type },

    #[error("function '{name}' must return a value")]
    ReturnMissing { name: String },

    #[error("break is only allowed inside a loop or switch")]
    BreakOutsideLoop,

    #[error("continue is only allowed inside a loop or switch")]
    ContinueOutsideLoop,

    #[error("[] can only be applied to arrays")]
    NotAnArray,

    #[error("'{name}' is not a function")]
    NotAFunction { name: String },

    #[error("function '{name}' expects {expected} argument(s) but only {given} given")]
    LessFormals {
        name: String,
        expected: usize,
        given: usize,
    },

    #[error("function '{name}' expects {expected} argument(s) but {given} given")]
    ExtraFormals {
        name: String,
        expected: usize,
        given: usize,
    },

    /// `index` is zero-based; the message counts from one.
    #[error("incompatible argument {} to '{name}': {given} given, {expected} expected", .index + 1)]
    FormalsTypeMismatch {
        name: String,
        index: usize,
        expected: Type,
        given: Type,
    },

    #[error("invalid swizzle '{field}': only x, y, z and w select components")]
    InvalidSwizzle { field: String },

    #[error("swizzle '{field}' cannot be applied to non-vector type {base}")]
    InaccessibleSwizzle { field: String, base: Type },

    #[error("swizzle '{field}' is out of bounds for {base}")]
    SwizzleOutOfBound { field: String, base: Type },

    #[error("swizzle '{field}' selects more than four components")]
    OversizedVector { field: String },
}

impl DiagnosticKind {
    /// Stable code for matching diagnostics from tools
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::DeclConflict { .. } => "S0001",
            DiagnosticKind::InvalidInitialization { .. } => "S0002",
            DiagnosticKind::IdentifierNotDeclared { .. } => "S0003",
            DiagnosticKind::IncompatibleOperand { .. } => "S0004",
            DiagnosticKind::IncompatibleOperands { .. } => "S0005",
            DiagnosticKind::TestNotBoolean => "S0006",
            DiagnosticKind::ReturnMismatch { .. } => "S0007",
            DiagnosticKind::ReturnMissing { .. } => "S0008",
            DiagnosticKind::BreakOutsideLoop => "S0009",
            DiagnosticKind::ContinueOutsideLoop => "S0010",
            DiagnosticKind::NotAnArray => "S0011",
            DiagnosticKind::NotAFunction { .. } => "S0012",
            DiagnosticKind::LessFormals { .. } => "S0013",
            DiagnosticKind::ExtraFormals { .. } => "S0014",
            DiagnosticKind::FormalsTypeMismatch { .. } => "S0015",
            DiagnosticKind::InvalidSwizzle { .. } => "S0016",
            DiagnosticKind::InaccessibleSwizzle { .. } => "S0017",
            DiagnosticKind::SwizzleOutOfBound { .. } => "S0018",
            DiagnosticKind::OversizedVector { .. } => "S0019",
        }
    }
}

/// One reported violation with its location
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Build the codespan report for this diagnostic
    pub fn to_codespan(&self, file_id: usize) -> Report<usize> {
        let mut labels = vec![Label::primary(file_id, self.span)];
        if let DiagnosticKind::DeclConflict { prior, .. } = &self.kind {
            labels.push(
                Label::secondary(file_id, *prior).with_message("previous declaration is here"),
            );
        }

        Report::error()
            .with_code(self.code())
            .with_message(self.kind.to_string())
            .with_labels(labels)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.kind)
    }
}

/// Receiver for semantic diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink that prints each diagnostic through a [`DiagnosticReporter`]
pub struct ReportingSink<'r> {
    reporter: &'r DiagnosticReporter,
    file_id: usize,
    count: usize,
}

impl<'r> ReportingSink<'r> {
    pub fn new(reporter: &'r DiagnosticReporter, file_id: usize) -> Self {
        Self {
            reporter,
            file_id,
            count: 0,
        }
    }

    /// Number of diagnostics printed so far
    pub fn count(&self) -> usize {
        self.count
    }
}

impl DiagnosticSink for ReportingSink<'_> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.count += 1;
        self.reporter.emit(&diagnostic.to_codespan(self.file_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let kind = DiagnosticKind::IncompatibleOperands {
            op: "+",
            left: Type::Int,
            right: Type::Bool,
        };
        assert_eq!(kind.to_string(), "incompatible operands: int + bool");

        let kind = DiagnosticKind::IdentifierNotDeclared {
            name: "speed".into(),
            reason: LookupReason::Variable,
        };
        assert_eq!(kind.to_string(), "no declaration found for variable 'speed'");
    }

    #[test]
    fn test_argument_index_is_one_based_in_message() {
        let kind = DiagnosticKind::FormalsTypeMismatch {
            name: "mix".into(),
            index: 0,
            expected: Type::Float,
            given: Type::Bool,
        };
        assert_eq!(
            kind.to_string(),
            "incompatible argument 1 to 'mix': bool given, float expected"
        );
    }

    #[test]
    fn test_codes_are_distinct() {
        let kinds = [
            DiagnosticKind::TestNotBoolean,
            DiagnosticKind::BreakOutsideLoop,
            DiagnosticKind::ContinueOutsideLoop,
            DiagnosticKind::NotAnArray,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.report(Diagnostic::new(DiagnosticKind::BreakOutsideLoop, Span::new(0, 6)));
        sink.report(Diagnostic::new(DiagnosticKind::NotAnArray, Span::new(8, 12)));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].code(), "S0009");
        assert_eq!(sink[1].span, Span::new(8, 12));
    }

    #[test]
    fn test_render_conflict_shows_both_locations() {
        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file("a.glsl", "int x;\nfloat x;\n");
        let diagnostic = Diagnostic::new(
            DiagnosticKind::DeclConflict {
                name: "x".into(),
                prior: Span::new(4, 5),
            },
            Span::new(13, 14),
        );

        let text = reporter.render(&diagnostic.to_codespan(file_id));
        assert!(text.contains("error[S0001]"));
        assert!(text.contains("conflicts with an earlier declaration"));
        assert!(text.contains("previous declaration is here"));
    }
}

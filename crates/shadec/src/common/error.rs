//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, ColorChoice, StandardStream};
use thiserror::Error;
use super::Span;

/// Error that stops a compilation phase.
///
/// Semantic problems in user code are not `CompileError`s: the checker
/// reports those as diagnostics and keeps going. `Internal` is reserved for
/// broken traversal invariants.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("internal compiler error: {message}")]
    Internal { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Build the codespan diagnostic for this error
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        match self {
            CompileError::Lexer { message, span } => Diagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Parser { message, span } => Diagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Internal { message } => {
                Diagnostic::bug().with_message(format!("internal compiler error: {}", message))
            }

            CompileError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {}", err))
            }
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_color(ColorChoice::Auto)
    }

    pub fn with_color(color: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(color),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        self.emit(&error.to_diagnostic(file_id));
    }

    /// Print an already-built diagnostic to stderr
    pub fn emit(&self, diagnostic: &Diagnostic<usize>) {
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, diagnostic);
    }

    /// Render a diagnostic as uncolored text
    pub fn render(&self, diagnostic: &Diagnostic<usize>) -> String {
        let mut buffer = Buffer::no_color();
        if term::emit(&mut buffer, &self.config, &self.files, diagnostic).is_err() {
            return String::new();
        }
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_parser_error() {
        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file("a.glsl", "int x = ;\n");
        let error = CompileError::parser("expected expression", Span::new(8, 9));

        let text = reporter.render(&error.to_diagnostic(file_id));
        assert!(text.contains("Syntax error"));
        assert!(text.contains("expected expression"));
        assert!(text.contains("a.glsl"));
    }

    #[test]
    fn test_internal_error_message() {
        let error = CompileError::internal("attempted to pop the global scope");
        assert_eq!(
            error.to_string(),
            "internal compiler error: attempted to pop the global scope"
        );
    }
}

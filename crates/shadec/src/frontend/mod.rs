//! Shader language frontend
//!
//! The frontend is responsible for:
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST
//! 3. Performing semantic analysis

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

use crate::common::{CompileResult, DiagnosticReporter};
use crate::frontend::ast::Program;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use sema::{ReportingSink, SemanticAnalyzer};

/// Configuration options passed to the frontend
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub verbose: bool,
}

/// Compilation context providing access to diagnostics and file info
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self { filename, file_id, reporter }
    }
}

/// Runs the lex -> parse -> analyze pipeline over one source file
pub struct ShaderFrontend;

impl ShaderFrontend {
    pub fn new() -> Self {
        Self
    }

    /// Check `source`, printing every problem through the context's reporter.
    ///
    /// Returns the number of semantic diagnostics. Lexer and parser errors
    /// stop the pipeline and are returned after being reported.
    pub fn check(
        &self,
        source: &str,
        ctx: &CompileContext,
        config: &FrontendConfig,
    ) -> CompileResult<usize> {
        // Phase 1: Lexing (optional token dump)
        if config.dump_tokens {
            match self.dump_tokens(source) {
                Ok(tokens) => {
                    eprintln!("=== Tokens ===");
                    eprint!("{}", tokens);
                    eprintln!("=== End Tokens ===\n");
                }
                Err(e) => {
                    ctx.reporter.report_error(ctx.file_id, &e);
                    return Err(e);
                }
            }
        }

        // Phase 2: Parsing
        if config.verbose {
            eprintln!("Parsing {}...", ctx.filename);
        }

        let program = match Parser::new(source).and_then(|mut parser| parser.parse()) {
            Ok(program) => program,
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        };

        if config.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{}", self.dump_ast(&program));
            eprintln!("=== End AST ===\n");
        }

        // Phase 3: Semantic Analysis
        if config.verbose {
            eprintln!("Analyzing...");
        }

        let mut sink = ReportingSink::new(ctx.reporter, ctx.file_id);
        let count = match SemanticAnalyzer::new(&mut sink).analyze(&program) {
            Ok(count) => count,
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        };

        if config.verbose {
            eprintln!("{} diagnostic(s)", count);
        }

        Ok(count)
    }

    pub fn dump_tokens(&self, source: &str) -> CompileResult<String> {
        let lexer = Lexer::new(source);
        let tokens = lexer.tokenize_all()?;
        let mut output = String::new();
        for token in &tokens {
            output.push_str(&format!("{:?}\n", token));
        }
        Ok(output)
    }

    pub fn dump_ast(&self, program: &Program) -> String {
        format!("{:#?}", program)
    }
}

impl Default for ShaderFrontend {
    fn default() -> Self {
        Self::new()
    }
}

//! Shadec - semantic checker for a small GLSL-like shading language
//!
//! This library parses shader sources and verifies scoping, typing and
//! control-flow rules, reporting every violation instead of stopping at
//! the first.
//!
//! ## Architecture
//!
//! The checker is organized into:
//! - **Frontend** (`frontend/`): Lexer, parser, AST and semantic analysis
//! - **Driver** (`driver/`): Per-file pipeline used by the binary
//! - **Common** (`common/`): Shared infrastructure (errors, spans, reporting)
//! - **Types** (`types/`): Shader value types

pub mod common;
pub mod types;
pub mod frontend;
pub mod driver;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, Span};
pub use driver::{FileReport, Pipeline};
pub use frontend::sema::{check, Diagnostic, DiagnosticKind, DiagnosticSink, SemanticAnalyzer};
pub use frontend::{CompileContext, FrontendConfig, ShaderFrontend};
pub use types::Type;

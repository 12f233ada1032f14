//! Checking driver and pipeline orchestration

use crate::common::{CompileResult, DiagnosticReporter};
use crate::frontend::{CompileContext, FrontendConfig, ShaderFrontend};
use std::fs;
use std::path::Path;

/// Result of checking one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub filename: String,
    pub diagnostics: usize,
}

impl FileReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics == 0
    }
}

/// Pipeline that checks source files and reports through one reporter
pub struct Pipeline {
    frontend: ShaderFrontend,
    config: FrontendConfig,
}

impl Pipeline {
    pub fn new(config: FrontendConfig) -> Self {
        Self {
            frontend: ShaderFrontend::new(),
            config,
        }
    }

    /// Check source text registered under `filename`
    pub fn check_source(
        &self,
        source: &str,
        filename: &str,
        reporter: &mut DiagnosticReporter,
    ) -> CompileResult<FileReport> {
        let file_id = reporter.add_file(filename, source);
        let ctx = CompileContext::new(filename.to_string(), file_id, reporter);
        let diagnostics = self.frontend.check(source, &ctx, &self.config)?;

        Ok(FileReport {
            filename: filename.to_string(),
            diagnostics,
        })
    }

    /// Read and check a file from disk
    pub fn check_file(
        &self,
        path: &Path,
        reporter: &mut DiagnosticReporter,
    ) -> CompileResult<FileReport> {
        let source = fs::read_to_string(path)?;
        self.check_source(&source, &path.display().to_string(), reporter)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(FrontendConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CompileError;

    #[test]
    fn test_check_source_report() {
        let mut reporter = DiagnosticReporter::new();
        let report = Pipeline::default()
            .check_source("float f() { return 1.0; }", "ok.glsl", &mut reporter)
            .unwrap();

        assert_eq!(report.filename, "ok.glsl");
        assert!(report.is_clean());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut reporter = DiagnosticReporter::new();
        let result = Pipeline::default()
            .check_file(Path::new("/nonexistent/shader.glsl"), &mut reporter);
        assert!(matches!(result, Err(CompileError::Io(_))));
    }
}

//! Shadec - semantic checker for a small GLSL-like shading language
//!
//! Usage: shadec [OPTIONS] <input>...

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use codespan_reporting::term::termcolor::ColorChoice;
use shade_compiler::common::{CompileError, DiagnosticReporter};
use shade_compiler::driver::Pipeline;
use shade_compiler::frontend::FrontendConfig;
use std::fs;
use std::path::PathBuf;
use std::process;

/// When to color diagnostics
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
enum Color {
    /// Color when stderr is a terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl From<Color> for ColorChoice {
    fn from(color: Color) -> Self {
        match color {
            Color::Auto => ColorChoice::Auto,
            Color::Always => ColorChoice::Always,
            Color::Never => ColorChoice::Never,
        }
    }
}

#[derive(ClapParser, Debug)]
#[command(name = "shadec")]
#[command(author = "Shadec Team")]
#[command(version = "0.1.0")]
#[command(about = "Semantic checker for a small GLSL-like shading language", long_about = None)]
struct Args {
    /// Input shader source files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Color diagnostics (auto, always, never)
    #[arg(long, value_enum, default_value = "auto")]
    color: Color,
}

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Check every input. Returns whether all of them were clean.
fn run(args: &Args) -> Result<bool> {
    let mut reporter = DiagnosticReporter::with_color(args.color.into());
    let pipeline = Pipeline::new(FrontendConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        verbose: args.verbose,
    });

    let mut clean = true;
    for input in &args.inputs {
        let source = fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let filename = input.display().to_string();

        if args.verbose {
            eprintln!("Checking {}", filename);
        }

        match pipeline.check_source(&source, &filename, &mut reporter) {
            Ok(report) => clean &= report.is_clean(),
            // Already printed by the frontend
            Err(CompileError::Lexer { .. } | CompileError::Parser { .. }) => clean = false,
            Err(e) => return Err(e).with_context(|| format!("while checking {}", filename)),
        }
    }

    if args.verbose && clean {
        eprintln!("No problems found");
    }

    Ok(clean)
}

//! Sorrel command-line interface.
//!
//! Four subcommands: `run` executes a program, `check` reports front-end
//! diagnostics (optionally as JSON for tooling), `repl` opens an interactive
//! session, and `ast` dumps the parsed tree.

mod repl;

use clap::{Parser as ClapParser, Subcommand};
use sorrel_eval::{Interpreter, RuntimeError};
use sorrel_lexer::Lexer;
use sorrel_parser::Parser;
use sorrel_types::ast::Program;
use sorrel_types::{CompileErrors, SorrelError, SourceFile};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(ClapParser)]
#[command(name = "sorrel")]
#[command(about = "Sorrel - a small scripting language with session directives")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Sorrel program
    Run {
        /// Path to a `.sor` source file
        file: PathBuf,
    },

    /// Check a file for compile errors without running it
    Check {
        /// Path to a `.sor` source file
        file: PathBuf,

        /// Emit the diagnostic report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive session
    Repl,

    /// Parse a file and dump its AST
    Ast {
        /// Path to a `.sor` source file
        file: PathBuf,
    },
}

/// Failures reported to the shell. Compile diagnostics are rendered where
/// they arise; the variant carried out only drives the summary line and the
/// exit status.
#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{count} compile error(s) in {path}")]
    Compile { path: PathBuf, count: usize },

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("cannot serialize diagnostics: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { file } => run_file(&file),
        Commands::Check { file, json } => check_file(&file, json),
        Commands::Repl => repl::run(),
        Commands::Ast { file } => dump_ast(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sorrel: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_file(path: &Path) -> Result<(), CliError> {
    let program = compile(path)?;
    let mut interp = Interpreter::new();
    let result = interp.run(&program);

    // Whatever the program printed before failing still comes out.
    for line in interp.take_output() {
        println!("{line}");
    }

    result?;
    Ok(())
}

fn check_file(path: &Path, json: bool) -> Result<(), CliError> {
    let file = load(path)?;
    let errors = front_end_errors(&file);

    if json {
        println!("{}", serde_json::to_string_pretty(&errors)?);
    } else if errors.has_errors() {
        render_errors(&errors);
    } else {
        println!("{}: no errors", path.display());
    }

    if errors.has_errors() {
        return Err(CliError::Compile {
            path: path.to_path_buf(),
            count: errors.total_errors,
        });
    }
    Ok(())
}

fn dump_ast(path: &Path) -> Result<(), CliError> {
    let program = compile(path)?;
    println!("{program:#?}");
    Ok(())
}

/// Read a source file from disk.
fn load(path: &Path) -> Result<SourceFile, CliError> {
    let source = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SourceFile::new(path.display().to_string(), source))
}

/// Lex and parse, rendering any diagnostics to stderr.
fn compile(path: &Path) -> Result<Program, CliError> {
    let file = load(path)?;

    let lex = Lexer::new(&file).lex();
    if lex.errors.has_errors() {
        render_errors(&lex.errors);
        return Err(CliError::Compile {
            path: path.to_path_buf(),
            count: lex.errors.total_errors,
        });
    }

    let result = Parser::new(lex.tokens, &file).parse();
    if result.errors.has_errors() {
        render_errors(&result.errors);
        return Err(CliError::Compile {
            path: path.to_path_buf(),
            count: result.errors.total_errors,
        });
    }
    Ok(result.program)
}

/// All front-end diagnostics for a file. Lexer errors stop the pipeline;
/// parsing a broken token stream would only cascade.
fn front_end_errors(file: &SourceFile) -> CompileErrors {
    let lex = Lexer::new(file).lex();
    if lex.errors.has_errors() {
        return lex.errors;
    }
    Parser::new(lex.tokens, file).parse().errors
}

/// Render a diagnostic report to stderr.
fn render_errors(errors: &CompileErrors) {
    for error in &errors.errors {
        render_error(error);
    }
    let dropped = errors.truncated();
    if dropped > 0 {
        eprintln!("... and {dropped} more error(s) not shown");
    }
}

/// One diagnostic with its quoted source line and a caret under the span.
fn render_error(error: &SorrelError) {
    eprintln!("{}:{}", error.file, error);
    if !error.source_line.is_empty() {
        let pad = error.span.start_col.saturating_sub(1) as usize;
        let width = if error.span.end_line == error.span.start_line {
            error.span.end_col.saturating_sub(error.span.start_col) as usize + 1
        } else {
            1
        };
        eprintln!("  | {}", error.source_line);
        eprintln!("  | {}{}", " ".repeat(pad), "^".repeat(width));
    }
    if let Some(suggestion) = &error.suggestion {
        eprintln!("  = help: {suggestion}");
    }
}

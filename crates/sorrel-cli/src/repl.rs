//! Interactive Sorrel session.
//!
//! Line-oriented: each submitted line is compiled and run against the same
//! interpreter, so bindings, functions, and session directives carry over.
//! Diagnostics render inline and leave the session alive.

use crate::{render_errors, CliError};
use sorrel_eval::{Interpreter, Value};
use sorrel_lexer::Lexer;
use sorrel_parser::Parser;
use sorrel_types::ast::{Program, Stmt};
use sorrel_types::SourceFile;
use std::io::{self, Write};

const PROMPT: &str = "sorrel> ";

pub(crate) fn run() -> Result<(), CliError> {
    println!("Sorrel {} (Ctrl-D to exit)", env!("CARGO_PKG_VERSION"));

    let mut interp = Interpreter::new();
    let mut lines = io::stdin().lines();

    loop {
        print!("{PROMPT}");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let program = match compile_line(trimmed) {
            Some(program) => program,
            None => continue,
        };

        // Each line gets a fresh gas budget; a runaway line must not
        // poison the ones after it.
        interp.reset_gas();
        let result = interp.run(&program);
        for out in interp.take_output() {
            println!("{out}");
        }
        match result {
            Ok(value) => {
                if matches!(program.body.last(), Some(Stmt::Expr(_))) && value != Value::Null {
                    println!("=> {}", interp.display_value(&value));
                }
            }
            Err(err) => eprintln!("runtime error: {err}"),
        }
    }

    println!();
    Ok(())
}

/// Compile one submitted line, rendering diagnostics on failure.
fn compile_line(line: &str) -> Option<Program> {
    let file = SourceFile::new("repl", line);

    let lex = Lexer::new(&file).lex();
    if lex.errors.has_errors() {
        render_errors(&lex.errors);
        return None;
    }

    let result = Parser::new(lex.tokens, &file).parse();
    if result.errors.has_errors() {
        render_errors(&result.errors);
        return None;
    }
    Some(result.program)
}

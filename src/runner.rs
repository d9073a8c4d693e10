use crate::context::Context;
use crate::error::Diagnostics;
use crate::evaluator::{evaluate_program, Evaluation};
use crate::lexer::lex;
use crate::parser::parse;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Switches shared by file execution and the REPL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Print the token stream before evaluating.
    pub show_tokens: bool,
    /// Print the syntax tree before evaluating.
    pub show_tree: bool,
    /// Use ANSI colours when rendering diagnostics.
    pub color: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            show_tokens: false,
            show_tree: false,
            color: true,
        }
    }
}

/// Run `source` against `context`, printing produced values on stdout and
/// diagnostics on stderr.
pub fn run(source: &str, source_name: &str, context: &mut Context, options: &RunOptions) -> Evaluation {
    let (tokens, diagnostics) = lex(source_name, source);
    if options.show_tokens {
        for token in &tokens {
            println!("{}", token);
        }
    }

    let (program, diagnostics) = parse(tokens, diagnostics);
    if options.show_tree {
        print!("{}", program);
    }

    let evaluation = evaluate_program(&program, diagnostics, context);
    for value in &evaluation.values {
        println!("{}", value);
    }
    report_all(&evaluation.diagnostics, source, options.color);

    evaluation
}

/// Read and run a script file into `context`.
pub fn run_file(path: &Path, context: &mut Context, options: &RunOptions) -> io::Result<Evaluation> {
    let source = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = source.len(), "loaded script");
    Ok(run(&source, &path.display().to_string(), context, options))
}

pub fn report_all(diagnostics: &Diagnostics, source: &str, color: bool) {
    for diagnostic in diagnostics {
        if let Err(error) = diagnostic.report(source, color) {
            warn!(%error, "failed to render diagnostic");
            eprintln!("{}", diagnostic);
        }
    }
}

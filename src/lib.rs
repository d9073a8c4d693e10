// Tally Language Interpreter Library
//
// Front end and tree-walking evaluator for a small scripting language:
// source text -> tokens -> syntax tree -> values. Lexer and parser collect
// diagnostics instead of stopping at the first defect.

// Public modules
pub mod ast;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod value;

// Re-export commonly used items
pub use ast::{BinaryOp, Node, Program, UnaryOp};
pub use context::{Context, ContextError};
pub use error::{Diagnostic, DiagnosticKind, Diagnostics, Position, Span};
pub use evaluator::{evaluate, Evaluation, Evaluator, Flow};
pub use lexer::{lex, Keyword, Lexer, Literal, Token, TokenKind};
pub use parser::{parse, Parser};
pub use value::{OperationError, Value};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;

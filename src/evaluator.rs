use crate::ast::{Node, Program};
use crate::context::Context;
use crate::error::{Diagnostic, Diagnostics, Span};
use crate::lexer::lex;
use crate::parser::parse;
use crate::value::{self, Value};
use tracing::{debug, trace};

/// Outcome of evaluating one node when no diagnostic was raised.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Value(Value),
    /// Statement that produces nothing to print (declarations, `if`, `while`).
    Unit,
    Break,
    Continue,
}

impl Flow {
    /// Loop signals must be handed to the caller untouched.
    pub fn should_stop(&self) -> bool {
        matches!(self, Flow::Break | Flow::Continue)
    }
}

/// The result envelope: a value, nothing, a loop signal, or a diagnostic.
pub type EvalResult = Result<Flow, Diagnostic>;

/// Extract an operand value, returning early with a pending loop signal.
/// Value-less nodes read as `null`.
macro_rules! operand {
    ($flow:expr) => {
        match $flow {
            Flow::Value(value) => value,
            Flow::Unit => Value::Null,
            signal => return Ok(signal),
        }
    };
}

pub struct Evaluator<'ctx> {
    context: &'ctx mut Context,
    scopes: Vec<&'static str>,
}

impl<'ctx> Evaluator<'ctx> {
    pub fn new(context: &'ctx mut Context) -> Self {
        Self {
            context,
            scopes: Vec::new(),
        }
    }

    pub fn context(&self) -> &Context {
        &*self.context
    }

    /// Evaluate every root in order, collecting produced values. Stops at the
    /// first root that raises a diagnostic.
    pub fn evaluate_program(&mut self, program: &Program) -> (Vec<Value>, Option<Diagnostic>) {
        let mut values = Vec::new();

        for statement in &program.statements {
            match self.evaluate(statement) {
                Ok(Flow::Value(value)) => values.push(value),
                Ok(Flow::Unit) => {}
                Ok(signal) => {
                    let keyword = if signal == Flow::Break { "break" } else { "continue" };
                    let error = self
                        .runtime_error(statement.span(), format!("'{}' used outside of a loop", keyword))
                        .with_help("'break' and 'continue' are only meaningful inside a 'while' body.");
                    return (values, Some(error));
                }
                Err(error) => return (values, Some(error)),
            }
        }

        (values, None)
    }

    pub fn evaluate(&mut self, node: &Node) -> EvalResult {
        match node {
            Node::Literal { token } => match token.literal.and_then(|l| l.as_number()) {
                Some(number) => Ok(Flow::Value(Value::Number(number))),
                None => Err(self.runtime_error(
                    &token.span,
                    format!("Invalid number literal '{}'", token.text),
                )),
            },
            Node::Unary {
                operator,
                operand,
                span,
            } => {
                let operand = operand!(self.evaluate(operand)?);
                value::unary(*operator, &operand)
                    .map(Flow::Value)
                    .map_err(|error| self.runtime_error(span, error.to_string()))
            }
            Node::Binary {
                left,
                operator,
                right,
                span,
            } => {
                let left = operand!(self.evaluate(left)?);
                let right = operand!(self.evaluate(right)?);
                value::binary(*operator, &left, &right)
                    .map(Flow::Value)
                    .map_err(|error| self.runtime_error(span, error.to_string()))
            }
            Node::Parenthesized { expr, .. } => self.evaluate(expr),
            Node::VarAccess { name } => match self.context.lookup(&name.text) {
                Some(value) => Ok(Flow::Value(value)),
                None => Err(self
                    .runtime_error(
                        &name.span,
                        format!("Variable '{}' is not declared", name.text),
                    )
                    .with_help(format!("Declare it first: declare {} = ...;", name.text))),
            },
            Node::VarDeclare { name, value, span } => {
                let value = operand!(self.evaluate(value)?);
                self.context
                    .declare(&name.text, value, false)
                    .map_err(|error| self.runtime_error(span, error.to_string()))?;
                Ok(Flow::Unit)
            }
            Node::If {
                condition, body, ..
            } => {
                let condition = operand!(self.evaluate(condition)?);
                if condition.is_true() {
                    self.evaluate_block(body, "IfStatement")
                } else {
                    Ok(Flow::Unit)
                }
            }
            Node::While {
                condition, body, ..
            } => {
                let mut iterations = 0usize;
                loop {
                    let condition = operand!(self.evaluate(condition)?);
                    if !condition.is_true() {
                        break;
                    }

                    iterations += 1;
                    trace!(iterations, "while iteration");
                    if self.evaluate_block(body, "WhileStatement")? == Flow::Break {
                        break;
                    }
                }
                debug!(iterations, "while finished");
                Ok(Flow::Unit)
            }
            Node::Break { .. } => Ok(Flow::Break),
            Node::Continue { .. } => Ok(Flow::Continue),
            Node::Errored { .. } => Ok(Flow::Value(Value::Null)),
        }
    }

    /// Run `body` in the current context under the scope label `label`.
    /// Returns `Flow::Unit` unless a loop signal cut the body short.
    fn evaluate_block(&mut self, body: &[Node], label: &'static str) -> EvalResult {
        self.scopes.push(label);
        let result = self.evaluate_statements(body);
        self.scopes.pop();
        result
    }

    fn evaluate_statements(&mut self, body: &[Node]) -> EvalResult {
        for statement in body {
            let flow = self.evaluate(statement)?;
            if flow.should_stop() {
                return Ok(flow);
            }
        }
        Ok(Flow::Unit)
    }

    fn runtime_error(&self, span: &Span, message: String) -> Diagnostic {
        Diagnostic::runtime_error(span.clone(), message, self.scopes.join(" -> "))
    }
}

/// Everything one evaluation call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub values: Vec<Value>,
    pub diagnostics: Diagnostics,
}

impl Evaluation {
    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.diagnostics.first()
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Evaluate a parsed program. If `diagnostics` already holds lexer or parser
/// errors, evaluation is skipped and they are returned as-is.
pub fn evaluate_program(program: &Program, mut diagnostics: Diagnostics, context: &mut Context) -> Evaluation {
    if !diagnostics.is_empty() {
        debug!(diagnostics = diagnostics.len(), "skipping evaluation");
        return Evaluation {
            values: Vec::new(),
            diagnostics,
        };
    }

    let (values, error) = Evaluator::new(context).evaluate_program(program);
    if let Some(error) = error {
        diagnostics.push(error);
    }

    Evaluation { values, diagnostics }
}

/// Lex, parse and evaluate `text` against `context`. Bindings made by the
/// source stay in `context` for the next call.
pub fn evaluate(source_name: &str, text: &str, context: &mut Context) -> Evaluation {
    let (tokens, diagnostics) = lex(source_name, text);
    let (program, diagnostics) = parse(tokens, diagnostics);
    evaluate_program(&program, diagnostics, context)
}

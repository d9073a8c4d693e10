use crate::error::Span;
use crate::lexer::Token;
use std::fmt;

/// Parsed program: the root statements in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Node>,
}

/// Syntax tree node. Each node owns its children and is never mutated once
/// the parser has built it.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal {
        token: Token,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<Node>,
        span: Span,
    },
    Binary {
        left: Box<Node>,
        operator: BinaryOp,
        right: Box<Node>,
        span: Span,
    },
    Parenthesized {
        expr: Box<Node>,
        span: Span,
    },
    VarAccess {
        name: Token,
    },
    VarDeclare {
        name: Token,
        value: Box<Node>,
        span: Span,
    },
    If {
        condition: Box<Node>,
        body: Vec<Node>,
        span: Span,
    },
    While {
        condition: Box<Node>,
        body: Vec<Node>,
        span: Span,
    },
    Break {
        span: Span,
    },
    Continue {
        span: Span,
    },
    /// Stands in for a construct the parser had to recover from.
    Errored {
        span: Span,
    },
}

impl Node {
    pub fn span(&self) -> &Span {
        match self {
            Node::Literal { token } => &token.span,
            Node::VarAccess { name } => &name.span,
            Node::Unary { span, .. } => span,
            Node::Binary { span, .. } => span,
            Node::Parenthesized { span, .. } => span,
            Node::VarDeclare { span, .. } => span,
            Node::If { span, .. } => span,
            Node::While { span, .. } => span,
            Node::Break { span } => span,
            Node::Continue { span } => span,
            Node::Errored { span } => span,
        }
    }

    /// Block statements end at their closing brace and need no `;`.
    pub fn is_block(&self) -> bool {
        matches!(self, Node::If { .. } | Node::While { .. })
    }

    fn write_tree(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            Node::Literal { token } => writeln!(f, "{}Literal {}", indent, token.text),
            Node::VarAccess { name } => writeln!(f, "{}VarAccess {}", indent, name.text),
            Node::Unary {
                operator, operand, ..
            } => {
                writeln!(f, "{}Unary {}", indent, operator)?;
                operand.write_tree(f, depth + 1)
            }
            Node::Binary {
                left,
                operator,
                right,
                ..
            } => {
                writeln!(f, "{}Binary {}", indent, operator)?;
                left.write_tree(f, depth + 1)?;
                right.write_tree(f, depth + 1)
            }
            Node::Parenthesized { expr, .. } => {
                writeln!(f, "{}Parenthesized", indent)?;
                expr.write_tree(f, depth + 1)
            }
            Node::VarDeclare { name, value, .. } => {
                writeln!(f, "{}VarDeclare {}", indent, name.text)?;
                value.write_tree(f, depth + 1)
            }
            Node::If {
                condition, body, ..
            } => {
                writeln!(f, "{}If", indent)?;
                condition.write_tree(f, depth + 1)?;
                for statement in body {
                    statement.write_tree(f, depth + 1)?;
                }
                Ok(())
            }
            Node::While {
                condition, body, ..
            } => {
                writeln!(f, "{}While", indent)?;
                condition.write_tree(f, depth + 1)?;
                for statement in body {
                    statement.write_tree(f, depth + 1)?;
                }
                Ok(())
            }
            Node::Break { .. } => writeln!(f, "{}Break", indent),
            Node::Continue { .. } => writeln!(f, "{}Continue", indent),
            Node::Errored { .. } => writeln!(f, "{}Errored", indent),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for statement in &self.statements {
            statement.write_tree(f, 0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Power => "^",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Negate,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Negate => "-",
            UnaryOp::Not => "not",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

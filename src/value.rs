use crate::ast::{BinaryOp, UnaryOp};
use std::fmt;
use thiserror::Error;

/// Runtime value. Semantics are defined by the payload alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Null,
}

impl Value {
    /// True-ish: non-null and not boolean `false`.
    pub fn is_true(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn supports_arithmetic(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn supports_comparison(&self) -> bool {
        !self.is_null()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Boolean(_) => "Boolean",
            Value::Null => "Null",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperationError {
    #[error("Cannot use '{op}' with null")]
    NullOperand { op: &'static str },
    #[error("Cannot use '{op}' with types <{left}> & <{right}>")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("Types <{left}> or/and <{right}> don't support arithmetic operations")]
    NotArithmetic {
        left: &'static str,
        right: &'static str,
    },
    #[error("Division by zero")]
    DivideByZero,
    #[error("Cannot negate null")]
    NegateNull,
    #[error("Cannot apply '{op}' to type <{ty}>")]
    UnsupportedUnary { op: &'static str, ty: &'static str },
}

pub type OperationResult = Result<Value, OperationError>;

/// Operands must both be non-null and of the same variant.
pub fn check_operands(op: BinaryOp, left: &Value, right: &Value) -> Result<(), OperationError> {
    if !left.supports_comparison() || !right.supports_comparison() {
        return Err(OperationError::NullOperand { op: op.symbol() });
    }

    if std::mem::discriminant(left) != std::mem::discriminant(right) {
        return Err(OperationError::TypeMismatch {
            op: op.symbol(),
            left: left.type_name(),
            right: right.type_name(),
        });
    }

    Ok(())
}

/// Shared path of the arithmetic operators: operand check, then the
/// arithmetic capability of both sides.
fn arithmetic(op: BinaryOp, left: &Value, right: &Value, apply: fn(f64, f64) -> f64) -> OperationResult {
    check_operands(op, left, right)?;
    if !left.supports_arithmetic() || !right.supports_arithmetic() {
        return Err(OperationError::NotArithmetic {
            left: left.type_name(),
            right: right.type_name(),
        });
    }

    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(apply(*l, *r))),
        _ => Err(OperationError::NotArithmetic {
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

pub fn add(left: &Value, right: &Value) -> OperationResult {
    arithmetic(BinaryOp::Add, left, right, |l, r| l + r)
}

pub fn subtract(left: &Value, right: &Value) -> OperationResult {
    arithmetic(BinaryOp::Subtract, left, right, |l, r| l - r)
}

pub fn multiply(left: &Value, right: &Value) -> OperationResult {
    arithmetic(BinaryOp::Multiply, left, right, |l, r| l * r)
}

pub fn divide_checked(left: &Value, right: &Value) -> OperationResult {
    if let Value::Number(r) = right {
        if *r == 0.0 {
            return Err(OperationError::DivideByZero);
        }
    }
    arithmetic(BinaryOp::Divide, left, right, |l, r| l / r)
}

pub fn power(left: &Value, right: &Value) -> OperationResult {
    arithmetic(BinaryOp::Power, left, right, f64::powf)
}

fn compare(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    numbers: fn(f64, f64) -> bool,
    booleans: fn(bool, bool) -> bool,
) -> OperationResult {
    check_operands(op, left, right)?;
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::Boolean(numbers(*l, *r))),
        (Value::Boolean(l), Value::Boolean(r)) => Ok(Value::Boolean(booleans(*l, *r))),
        _ => Err(OperationError::TypeMismatch {
            op: op.symbol(),
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

pub fn equals_to(left: &Value, right: &Value) -> OperationResult {
    compare(BinaryOp::Equal, left, right, |l, r| l == r, |l, r| l == r)
}

pub fn not_equals_to(left: &Value, right: &Value) -> OperationResult {
    compare(BinaryOp::NotEqual, left, right, |l, r| l != r, |l, r| l != r)
}

pub fn less_than(left: &Value, right: &Value) -> OperationResult {
    compare(BinaryOp::Less, left, right, |l, r| l < r, |l, r| !l & r)
}

pub fn less_than_equals(left: &Value, right: &Value) -> OperationResult {
    compare(BinaryOp::LessEqual, left, right, |l, r| l <= r, |l, r| l <= r)
}

pub fn greater_than(left: &Value, right: &Value) -> OperationResult {
    compare(BinaryOp::Greater, left, right, |l, r| l > r, |l, r| l & !r)
}

pub fn greater_than_equals(left: &Value, right: &Value) -> OperationResult {
    compare(BinaryOp::GreaterEqual, left, right, |l, r| l >= r, |l, r| l >= r)
}

/// Non-short-circuit AND over the true-ish flags; any variants may mix.
pub fn anded_by(left: &Value, right: &Value) -> Value {
    Value::Boolean(left.is_true() && right.is_true())
}

/// Non-short-circuit OR over the true-ish flags; any variants may mix.
pub fn ored_by(left: &Value, right: &Value) -> Value {
    Value::Boolean(left.is_true() || right.is_true())
}

/// Apply a binary operator. `and`/`or` bypass the operand type check.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> OperationResult {
    match op {
        BinaryOp::And => Ok(anded_by(left, right)),
        BinaryOp::Or => Ok(ored_by(left, right)),
        BinaryOp::Add => add(left, right),
        BinaryOp::Subtract => subtract(left, right),
        BinaryOp::Multiply => multiply(left, right),
        BinaryOp::Divide => divide_checked(left, right),
        BinaryOp::Power => power(left, right),
        BinaryOp::Equal => equals_to(left, right),
        BinaryOp::NotEqual => not_equals_to(left, right),
        BinaryOp::Less => less_than(left, right),
        BinaryOp::LessEqual => less_than_equals(left, right),
        BinaryOp::Greater => greater_than(left, right),
        BinaryOp::GreaterEqual => greater_than_equals(left, right),
    }
}

pub fn unary(op: UnaryOp, operand: &Value) -> OperationResult {
    match (op, operand) {
        (UnaryOp::Plus, value) => Ok(*value),
        (_, Value::Null) => Err(OperationError::NegateNull),
        (UnaryOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (op, value) => Err(OperationError::UnsupportedUnary {
            op: op.symbol(),
            ty: value.type_name(),
        }),
    }
}

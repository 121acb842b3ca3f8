use crate::environment::{EnvError, Environment};
use crate::source::Span;
use crate::types::{BinaryOp, Expr, Node, Program, Stmt, StmtKind, UnaryOp, Value};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("{0}")]
    Env(#[from] EnvError),
    #[error("Type mismatch: expected {expected}, found a {}", .found.type_name())]
    TypeMismatch {
        expected: &'static str,
        found: Value,
        span: Span,
    },
    #[error("Division by zero")]
    DivisionByZero(Span),
}

// Result type alias for convenience
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Evaluates an expression node against the environment, yielding a Value.
/// Expressions never mutate the environment; only statements do.
pub fn evaluate(node: &Node, env: &Environment) -> EvalResult {
    match &node.kind {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Identifier(name) => Ok(env.get(name, node.span)?),
        Expr::Unary { op, operand } => evaluate_unary(*op, operand, env),
        Expr::Binary { op, left, right } => evaluate_binary(*op, left, right, env),
    }
}

/// Executes one statement. Returns the rendered output line for `print` and
/// bare-expression statements (both emit their value); assignments are silent.
pub fn execute_statement(stmt: &Stmt, env: &mut Environment) -> EvalResult<Option<String>> {
    match &stmt.kind {
        StmtKind::Assignment { name, value } => {
            let value = evaluate(value, env)?;
            env.define(name.clone(), value);
            Ok(None)
        }
        StmtKind::Print(expr) | StmtKind::Expression(expr) => {
            Ok(Some(evaluate(expr, env)?.to_string()))
        }
    }
}

/// Runs a whole program: a straight-line fold over the statements, halting
/// at the first failure. Returns the output lines in execution order.
pub fn run(program: &Program, env: &mut Environment) -> EvalResult<Vec<String>> {
    let mut lines = Vec::new();
    for stmt in &program.statements {
        if let Some(line) = execute_statement(stmt, env)? {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn evaluate_unary(op: UnaryOp, operand: &Node, env: &Environment) -> EvalResult {
    let value = evaluate(operand, env)?;
    match op {
        UnaryOp::Negate => match value {
            Value::Number(n) => Ok(Value::Number(-n)),
            found => Err(type_mismatch("a number", found, operand.span)),
        },
        UnaryOp::Not => match value {
            Value::Boolean(b) => Ok(Value::Boolean(!b)),
            found => Err(type_mismatch("a boolean", found, operand.span)),
        },
    }
}

// Both operands are evaluated before the operator is applied; `and`/`or` do
// not short-circuit.
fn evaluate_binary(op: BinaryOp, left: &Node, right: &Node, env: &Environment) -> EvalResult {
    let lhs = evaluate(left, env)?;
    let rhs = evaluate(right, env)?;
    match op {
        BinaryOp::Add => match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
            (Value::Number(_), found) => Err(type_mismatch("a number", found, right.span)),
            (Value::String(_), found) => Err(type_mismatch("a string", found, right.span)),
            (found, _) => Err(type_mismatch("a number or a string", found, left.span)),
        },
        BinaryOp::Subtract => {
            let a = expect_number(lhs, left.span)?;
            let b = expect_number(rhs, right.span)?;
            Ok(Value::Number(a - b))
        }
        BinaryOp::Multiply => {
            let a = expect_number(lhs, left.span)?;
            let b = expect_number(rhs, right.span)?;
            Ok(Value::Number(a * b))
        }
        BinaryOp::Divide => {
            let a = expect_number(lhs, left.span)?;
            let b = expect_number(rhs, right.span)?;
            if b == 0.0 {
                return Err(EvalError::DivisionByZero(right.span));
            }
            Ok(Value::Number(a / b))
        }
        // Equality is structural and permissive: values of different
        // variants compare unequal rather than raising a type error.
        BinaryOp::Equal => Ok(Value::Boolean(lhs == rhs)),
        BinaryOp::NotEqual => Ok(Value::Boolean(lhs != rhs)),
        BinaryOp::Less => ordering(lhs, rhs, left, right, |ord| ord == Ordering::Less),
        BinaryOp::LessEq => ordering(lhs, rhs, left, right, |ord| ord != Ordering::Greater),
        BinaryOp::Greater => ordering(lhs, rhs, left, right, |ord| ord == Ordering::Greater),
        BinaryOp::GreaterEq => ordering(lhs, rhs, left, right, |ord| ord != Ordering::Less),
        BinaryOp::And => {
            let a = expect_boolean(lhs, left.span)?;
            let b = expect_boolean(rhs, right.span)?;
            Ok(Value::Boolean(a && b))
        }
        BinaryOp::Or => {
            let a = expect_boolean(lhs, left.span)?;
            let b = expect_boolean(rhs, right.span)?;
            Ok(Value::Boolean(a || b))
        }
    }
}

// Ordering comparisons accept two numbers or two strings (lexicographic).
// NaN compares false against everything, as in IEEE arithmetic.
fn ordering<F>(lhs: Value, rhs: Value, left: &Node, right: &Node, test: F) -> EvalResult
where
    F: Fn(Ordering) -> bool,
{
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => {
            Ok(Value::Boolean(a.partial_cmp(&b).is_some_and(|ord| test(ord))))
        }
        (Value::String(a), Value::String(b)) => Ok(Value::Boolean(test(a.cmp(&b)))),
        (Value::Number(_), found) => Err(type_mismatch("a number", found, right.span)),
        (Value::String(_), found) => Err(type_mismatch("a string", found, right.span)),
        (found, _) => Err(type_mismatch("a number or a string", found, left.span)),
    }
}

fn type_mismatch(expected: &'static str, found: Value, span: Span) -> EvalError {
    EvalError::TypeMismatch {
        expected,
        found,
        span,
    }
}

fn expect_number(value: Value, span: Span) -> EvalResult<f64> {
    match value {
        Value::Number(n) => Ok(n),
        found => Err(type_mismatch("a number", found, span)),
    }
}

fn expect_boolean(value: Value, span: Span) -> EvalResult<bool> {
    match value {
        Value::Boolean(b) => Ok(b),
        found => Err(type_mismatch("a boolean", found, span)),
    }
}

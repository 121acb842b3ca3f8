use crate::source::Span;
use std::fmt;

/// A spanned expression node. The parser builds these; the evaluator walks
/// them. Each node owns its children, so the tree needs no shared ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: Expr,
    pub span: Span,
}

impl Node {
    pub fn new(kind: Expr, span: Span) -> Self {
        Node { kind, span }
    }

    pub fn new_number(n: f64, span: Span) -> Self {
        Node::new(Expr::Literal(Value::Number(n)), span)
    }

    pub fn new_bool(b: bool, span: Span) -> Self {
        Node::new(Expr::Literal(Value::Boolean(b)), span)
    }

    pub fn new_string(s: &str, span: Span) -> Self {
        Node::new(Expr::Literal(Value::String(s.to_string())), span)
    }

    pub fn new_identifier(name: String, span: Span) -> Self {
        Node::new(Expr::Identifier(name), span)
    }

    pub fn new_unary(op: UnaryOp, operand: Node, span: Span) -> Self {
        Node::new(
            Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    pub fn new_binary(op: BinaryOp, left: Node, right: Node, span: Span) -> Self {
        Node::new(
            Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate to Expr's Display implementation
        write!(f, "{}", self.kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Identifier(String),
    Unary { op: UnaryOp, operand: Box<Node> },
    Binary { op: BinaryOp, left: Box<Node>, right: Box<Node> },
}

// Canonical prefix form, mainly for tests and debugging: `1 + 2 * 3`
// displays as `(+ 1 (* 2 3))`, making precedence decisions visible.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(Value::String(s)) => write!(f, "\"{}\"", s),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Identifier(name) => write!(f, "{}", name),
            Expr::Unary { op, operand } => write!(f, "({} {})", op, operand),
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", op, left, right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Negate => write!(f, "-"),
            UnaryOp::Not => write!(f, "not"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Assignment { name: String, value: Node },
    Print(Node),
    Expression(Node),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Assignment { name, value } => write!(f, "{} = {}", name, value),
            StmtKind::Print(expr) => write!(f, "print {}", expr),
            StmtKind::Expression(expr) => write!(f, "{}", expr),
        }
    }
}

/// An ordered sequence of statements; owns the whole AST.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A runtime value. Values are immutable once constructed; the Environment
/// stores clones, so evaluation never aliases them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    String(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
        }
    }
}

// The print rendering: numbers in their decimal form, booleans as
// `true`/`false`, strings as their raw content.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

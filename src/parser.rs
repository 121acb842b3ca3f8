use crate::lexer::{LexerError, Token, TokenKind};
use crate::types::{BinaryOp, Expr, Node, Program, Stmt, StmtKind, UnaryOp};
use std::fmt;
use std::iter::Peekable;
use std::vec::IntoIter; // To iterate over Vec<Token>

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedToken { found: Token, expected: String }, // Found token, Expected description
    UnexpectedEof(String),
    LexerError(LexerError), // Propagated when parsing directly from a string
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { found, expected } => {
                write!(
                    f,
                    "Parse Error [at {}]: Unexpected token '{}', expected {}",
                    found.span, found.kind, expected
                )
            }
            ParseError::UnexpectedEof(expected) => {
                write!(
                    f,
                    "Parse Error: Unexpected end of input. Expected {}",
                    expected
                )
            }
            ParseError::LexerError(lex_err) => write!(f, "Lexer Error during parse: {}", lex_err),
        }
    }
}

// Allow ParseError to be treated as a standard Error
impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::LexerError(lex_err) => Some(lex_err),
            _ => None,
        }
    }
}

// Allow converting LexerError into ParseError easily
impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> Self {
        ParseError::LexerError(err)
    }
}

// Result type alias for convenience
type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    // We iterate over owned Tokens, consuming them.
    tokens: Peekable<IntoIter<Token>>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens: tokens.into_iter().peekable(),
        }
    }

    // Consumes the next token if available.
    fn next_token(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    // Peeks at the next token's kind without consuming.
    fn peek_kind(&mut self) -> Option<&TokenKind> {
        self.tokens.peek().map(|t| &t.kind)
    }

    /// Parses the whole token sequence into a Program: statements repeated
    /// until the tokens are exhausted. The first malformed statement aborts
    /// the parse; there is no error recovery.
    pub fn parse(mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while self.tokens.peek().is_some() {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    /// Parses one statement: `print expr`, `IDENTIFIER = expr`, or a bare
    /// expression. Assignment is recognized after the fact: an expression
    /// followed by `=` must have been a bare identifier.
    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if matches!(self.peek_kind(), Some(TokenKind::Print)) {
            let keyword_span = match self.next_token() {
                Some(token) => token.span,
                None => return Err(ParseError::UnexpectedEof("a statement".to_string())),
            };
            let value = self.parse_expr()?;
            let span = keyword_span.merge(value.span);
            return Ok(Stmt::new(StmtKind::Print(value), span));
        }

        let expr = self.parse_expr()?;
        if matches!(self.peek_kind(), Some(TokenKind::Assign)) {
            let assign = match self.next_token() {
                Some(token) => token,
                None => return Err(ParseError::UnexpectedEof("'='".to_string())),
            };
            return match expr {
                Node {
                    kind: Expr::Identifier(name),
                    span,
                } => {
                    let value = self.parse_expr()?;
                    let span = span.merge(value.span);
                    Ok(Stmt::new(StmtKind::Assignment { name, value }, span))
                }
                _ => Err(ParseError::UnexpectedToken {
                    found: assign,
                    expected: "an identifier on the left-hand side of '='".to_string(),
                }),
            };
        }

        let span = expr.span;
        Ok(Stmt::new(StmtKind::Expression(expr), span))
    }

    /// Parses a single expression. Entry point is the lowest-precedence
    /// level; each level is one routine, with precedence encoded by the call
    /// nesting order.
    pub fn parse_expr(&mut self) -> ParseResult<Node> {
        self.parse_or()
    }

    // or_expr := and_expr ('or' and_expr)*
    fn parse_or(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_and()?;
        while matches!(self.peek_kind(), Some(TokenKind::Or)) {
            self.next_token();
            let right = self.parse_and()?;
            let span = node.span.merge(right.span);
            node = Node::new_binary(BinaryOp::Or, node, right, span);
        }
        Ok(node)
    }

    // and_expr := not_expr ('and' not_expr)*
    fn parse_and(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_not()?;
        while matches!(self.peek_kind(), Some(TokenKind::And)) {
            self.next_token();
            let right = self.parse_not()?;
            let span = node.span.merge(right.span);
            node = Node::new_binary(BinaryOp::And, node, right, span);
        }
        Ok(node)
    }

    // not_expr := 'not' not_expr | comparison
    fn parse_not(&mut self) -> ParseResult<Node> {
        if matches!(self.peek_kind(), Some(TokenKind::Not)) {
            let keyword_span = match self.next_token() {
                Some(token) => token.span,
                None => return Err(ParseError::UnexpectedEof("'not'".to_string())),
            };
            let operand = self.parse_not()?;
            let span = keyword_span.merge(operand.span);
            return Ok(Node::new_unary(UnaryOp::Not, operand, span));
        }
        self.parse_comparison()
    }

    // comparison := additive (('==' | '!=' | '<' | '>' | '<=' | '>=') additive)*
    fn parse_comparison(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_additive()?;
        while let Some(op) = self.peek_kind().and_then(comparison_op) {
            self.next_token();
            let right = self.parse_additive()?;
            let span = node.span.merge(right.span);
            node = Node::new_binary(op, node, right, span);
        }
        Ok(node)
    }

    // additive := multiplicative (('+' | '-') multiplicative)*
    fn parse_additive(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_multiplicative()?;
        while let Some(op) = self.peek_kind().and_then(additive_op) {
            self.next_token();
            let right = self.parse_multiplicative()?;
            let span = node.span.merge(right.span);
            node = Node::new_binary(op, node, right, span);
        }
        Ok(node)
    }

    // multiplicative := unary (('*' | '/') unary)*
    fn parse_multiplicative(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_unary()?;
        while let Some(op) = self.peek_kind().and_then(multiplicative_op) {
            self.next_token();
            let right = self.parse_unary()?;
            let span = node.span.merge(right.span);
            node = Node::new_binary(op, node, right, span);
        }
        Ok(node)
    }

    // unary := '-' unary | primary
    fn parse_unary(&mut self) -> ParseResult<Node> {
        if matches!(self.peek_kind(), Some(TokenKind::Minus)) {
            let op_span = match self.next_token() {
                Some(token) => token.span,
                None => return Err(ParseError::UnexpectedEof("'-'".to_string())),
            };
            let operand = self.parse_unary()?;
            let span = op_span.merge(operand.span);
            return Ok(Node::new_unary(UnaryOp::Negate, operand, span));
        }
        self.parse_primary()
    }

    // primary := NUMBER | STRING | 'true' | 'false' | IDENTIFIER | '(' or_expr ')'
    fn parse_primary(&mut self) -> ParseResult<Node> {
        match self.next_token() {
            Some(Token {
                kind: TokenKind::Number(n),
                span,
            }) => Ok(Node::new_number(n, span)),
            Some(Token {
                kind: TokenKind::String(s),
                span,
            }) => Ok(Node::new_string(&s, span)),
            Some(Token {
                kind: TokenKind::Boolean(b),
                span,
            }) => Ok(Node::new_bool(b, span)),
            Some(Token {
                kind: TokenKind::Identifier(name),
                span,
            }) => Ok(Node::new_identifier(name, span)),
            Some(Token {
                kind: TokenKind::LParen,
                span,
            }) => {
                let expr = self.parse_expr()?;
                match self.next_token() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        span: rparen_span,
                    }) => {
                        // The grouped expression spans the parentheses
                        Ok(Node::new(expr.kind, span.merge(rparen_span)))
                    }
                    Some(found) => Err(ParseError::UnexpectedToken {
                        found,
                        expected: "')'".to_string(),
                    }),
                    None => Err(ParseError::UnexpectedEof("')'".to_string())),
                }
            }
            Some(found) => Err(ParseError::UnexpectedToken {
                found,
                expected: "a number, a string, a boolean, an identifier, or '('".to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("an expression".to_string())),
        }
    }
}

fn comparison_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::EqEq => Some(BinaryOp::Equal),
        TokenKind::NotEq => Some(BinaryOp::NotEqual),
        TokenKind::Less => Some(BinaryOp::Less),
        TokenKind::LessEq => Some(BinaryOp::LessEq),
        TokenKind::Greater => Some(BinaryOp::Greater),
        TokenKind::GreaterEq => Some(BinaryOp::GreaterEq),
        _ => None,
    }
}

fn additive_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Subtract),
        _ => None,
    }
}

fn multiplicative_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Star => Some(BinaryOp::Multiply),
        TokenKind::Slash => Some(BinaryOp::Divide),
        _ => None,
    }
}

// Helper function to lex and parse a string directly (useful for tests, the
// file runner, and the REPL)
pub fn parse_str(input: &str) -> ParseResult<Program> {
    let tokens = crate::lexer::tokenize(input)?;
    Parser::new(tokens).parse()
}

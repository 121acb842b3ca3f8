use logos::Logos;
use std::collections::HashSet;
use std::fmt;

use crate::source::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")] // Skip whitespace; newlines carry no token-level meaning
#[logos(error = LexerErrorKind)]
pub enum TokenKind {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LessEq,
    #[token(">=")]
    GreaterEq,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Assign,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("print")]
    Print,
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Boolean(bool),
    // Keyword literals above outrank this regex at equal length; longer
    // identifiers like `printer` still win by maximal munch.
    #[regex(r"[A-Za-z][A-Za-z0-9]*", |lex| lex.slice().to_string())]
    Identifier(String),
    #[regex(r"[0-9]+(?:\.[0-9]+)?", |lex| {
        let slice = lex.slice();
        slice
            .parse::<f64>()
            .map_err(|_| LexerErrorKind::InvalidNumberFormat(slice.to_string()))
    })]
    Number(f64),
    // The optional closing quote lets the regex swallow an unterminated
    // literal so the callback can reject it with a proper error.
    #[regex(r#""[^"\n\r]*"?"#, |lex| {
        let slice = lex.slice();
        if slice.len() < 2 || !slice.ends_with('"') {
            return Err(LexerErrorKind::UnterminatedString);
        }
        // No escape sequences; characters between the quotes pass through as-is.
        Ok(slice[1..slice.len() - 1].to_string())
    })]
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::LessEq => write!(f, "<="),
            TokenKind::GreaterEq => write!(f, ">="),
            TokenKind::Less => write!(f, "<"),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::And => write!(f, "and"),
            TokenKind::Or => write!(f, "or"),
            TokenKind::Not => write!(f, "not"),
            TokenKind::Print => write!(f, "print"),
            TokenKind::Boolean(b) => write!(f, "{}", b),
            TokenKind::Identifier(name) => write!(f, "{}", name),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::String(s) => write!(f, "\"{}\"", s), // Display with quotes for clarity
        }
    }
}

/// The keyword set, for REPL completion alongside bound identifiers.
pub fn keyword_identifiers() -> HashSet<String> {
    ["true", "false", "and", "or", "not", "print"]
        .iter()
        .map(|kw| kw.to_string())
        .collect()
}

#[derive(Default, Debug, Clone, PartialEq)]
pub enum LexerErrorKind {
    UnterminatedString,
    InvalidNumberFormat(String),
    UnexpectedCharacter(char),
    #[default]
    InvalidToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexerError {
    pub kind: LexerErrorKind,
    pub span: Span,
}

impl fmt::Display for LexerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerErrorKind::UnterminatedString => write!(f, "Unterminated string literal"),
            LexerErrorKind::InvalidNumberFormat(s) => write!(f, "Invalid number format: '{}'", s),
            LexerErrorKind::UnexpectedCharacter(c) => {
                write!(f, "Unexpected character: '{}'", c)
            }
            LexerErrorKind::InvalidToken => write!(f, "Invalid token"),
        }
    }
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

// std::error::Error implementation allows using `?` with other error types
impl std::error::Error for LexerErrorKind {}

impl std::error::Error for LexerError {}

// Result type alias for convenience
type LexerResult<T> = Result<T, LexerError>;

/// Tokenizes the whole input eagerly, stopping at the first lexical error.
pub fn tokenize(input: &str) -> LexerResult<Vec<Token>> {
    TokenKind::lexer(input)
        .spanned()
        .map(|(result, range)| match result {
            Ok(kind) => Ok(Token {
                kind,
                span: Span::new(range.start, range.end),
            }),
            Err(kind) => {
                // The logos default error only marks the span; recover the
                // offending character from the source for the diagnostic.
                let kind = match kind {
                    LexerErrorKind::InvalidToken => input[range.clone()]
                        .chars()
                        .next()
                        .map(LexerErrorKind::UnexpectedCharacter)
                        .unwrap_or(LexerErrorKind::InvalidToken),
                    other => other,
                };
                Err(LexerError {
                    kind,
                    span: Span::new(range.start, range.end),
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to simplify testing token sequences
    fn assert_tokens(input: &str, expected: Vec<TokenKind>) {
        match tokenize(input) {
            Ok(tokens) => {
                let kinds: Vec<TokenKind> = tokens.into_iter().map(|t| t.kind).collect();
                assert_eq!(kinds, expected, "Input: '{}'", input);
            }
            Err(e) => panic!("Lexing failed for input '{}': {}", input, e),
        }
    }

    // Helper to simplify testing for lexer errors
    fn assert_lexer_error(input: &str, expected_error_variant: LexerErrorKind) {
        match tokenize(input) {
            Ok(tokens) => panic!(
                "Expected lexing to fail for input '{}', but got tokens: {:?}",
                input, tokens
            ),
            Err(e) => {
                assert_eq!(
                    std::mem::discriminant(&e.kind),
                    std::mem::discriminant(&expected_error_variant),
                    "Input: '{}', Expected error variant like {:?}, got: {:?}",
                    input,
                    expected_error_variant,
                    e
                );
            }
        }
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    #[test]
    fn test_empty_input() {
        assert_tokens("", vec![]);
        assert_tokens("  \t \n ", vec![]);
    }

    #[test]
    fn test_numbers() {
        assert_tokens("123", vec![TokenKind::Number(123.0)]);
        assert_tokens("6.78", vec![TokenKind::Number(6.78)]);
        assert_tokens("0.5", vec![TokenKind::Number(0.5)]);
        assert_tokens("0", vec![TokenKind::Number(0.0)]);
        // No sign in the literal; `-45` is a unary minus applied to 45
        assert_tokens("-45", vec![TokenKind::Minus, TokenKind::Number(45.0)]);
    }

    #[test]
    fn test_number_without_trailing_digits() {
        // A decimal point must be followed by digits; the dot itself is not a token
        assert_lexer_error("1.", LexerErrorKind::UnexpectedCharacter('.'));
        assert_lexer_error(".5", LexerErrorKind::UnexpectedCharacter('.'));
    }

    #[test]
    fn test_keywords() {
        assert_tokens("true", vec![TokenKind::Boolean(true)]);
        assert_tokens("false", vec![TokenKind::Boolean(false)]);
        assert_tokens(
            "and or not print",
            vec![
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Print,
            ],
        );
    }

    #[test]
    fn test_keyword_like_identifiers() {
        // Maximal munch: a longer identifier wins over a keyword prefix
        assert_tokens("printer", vec![ident("printer")]);
        assert_tokens("trueish", vec![ident("trueish")]);
        assert_tokens("android", vec![ident("android")]);
        // Keywords are case-sensitive
        assert_tokens("True", vec![ident("True")]);
        assert_tokens("PRINT", vec![ident("PRINT")]);
    }

    #[test]
    fn test_identifiers() {
        assert_tokens("x", vec![ident("x")]);
        assert_tokens("counter1", vec![ident("counter1")]);
        assert_tokens("someValue", vec![ident("someValue")]);
    }

    #[test]
    fn test_operators_longest_first() {
        assert_tokens("==", vec![TokenKind::EqEq]);
        assert_tokens("!=", vec![TokenKind::NotEq]);
        assert_tokens("<=", vec![TokenKind::LessEq]);
        assert_tokens(">=", vec![TokenKind::GreaterEq]);
        assert_tokens("<", vec![TokenKind::Less]);
        assert_tokens(">", vec![TokenKind::Greater]);
        assert_tokens("=", vec![TokenKind::Assign]);
        // Separated characters do not merge
        assert_tokens("= =", vec![TokenKind::Assign, TokenKind::Assign]);
        assert_tokens("< =", vec![TokenKind::Less, TokenKind::Assign]);
    }

    #[test]
    fn test_arithmetic_tokens() {
        assert_tokens(
            "(1 + 2) * 3 / 4 - 5",
            vec![
                TokenKind::LParen,
                TokenKind::Number(1.0),
                TokenKind::Plus,
                TokenKind::Number(2.0),
                TokenKind::RParen,
                TokenKind::Star,
                TokenKind::Number(3.0),
                TokenKind::Slash,
                TokenKind::Number(4.0),
                TokenKind::Minus,
                TokenKind::Number(5.0),
            ],
        );
    }

    #[test]
    fn test_strings() {
        assert_tokens(r#""hello""#, vec![TokenKind::String("hello".to_string())]);
        assert_tokens(
            r#""with space""#,
            vec![TokenKind::String("with space".to_string())],
        );
        assert_tokens(r#""""#, vec![TokenKind::String(String::new())]);
        // No escape processing; a backslash is an ordinary character
        assert_tokens(
            r#""a\b""#,
            vec![TokenKind::String("a\\b".to_string())],
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_lexer_error(r#""hello"#, LexerErrorKind::UnterminatedString);
        assert_lexer_error(r#"""#, LexerErrorKind::UnterminatedString);
        // Strings cannot span lines
        assert_lexer_error("\"ab\ncd\"", LexerErrorKind::UnterminatedString);
    }

    #[test]
    fn test_unexpected_character() {
        assert_lexer_error("@", LexerErrorKind::UnexpectedCharacter('@'));
        assert_lexer_error("1 $ 2", LexerErrorKind::UnexpectedCharacter('$'));
        // A lone '!' is not an operator; only '!=' is
        assert_lexer_error("!x", LexerErrorKind::UnexpectedCharacter('!'));
    }

    #[test]
    fn test_statement_sequence() {
        assert_tokens(
            "x = 5\nprint x + 1",
            vec![
                ident("x"),
                TokenKind::Assign,
                TokenKind::Number(5.0),
                TokenKind::Print,
                ident("x"),
                TokenKind::Plus,
                TokenKind::Number(1.0),
            ],
        );
    }

    #[test]
    fn test_mixed_statement() {
        assert_tokens(
            r#"greeting = "hi" + name"#,
            vec![
                ident("greeting"),
                TokenKind::Assign,
                TokenKind::String("hi".to_string()),
                TokenKind::Plus,
                ident("name"),
            ],
        );
    }

    #[test]
    fn test_tokenize_spans() {
        // Verify spans manually for a simple case
        let input = "x = 12";
        let tokens = tokenize(input).expect("Should tokenize successfully");

        assert_eq!(tokens.len(), 3);

        assert_eq!(tokens[0].kind, ident("x"));
        assert_eq!(tokens[0].span, Span { start: 0, end: 1 });

        assert_eq!(tokens[1].kind, TokenKind::Assign);
        assert_eq!(tokens[1].span, Span { start: 2, end: 3 });

        assert_eq!(tokens[2].kind, TokenKind::Number(12.0));
        assert_eq!(tokens[2].span, Span { start: 4, end: 6 });
    }

    #[test]
    fn test_error_span_points_at_offender() {
        let err = tokenize("ab # cd").unwrap_err();
        assert_eq!(err.kind, LexerErrorKind::UnexpectedCharacter('#'));
        assert_eq!(err.span, Span { start: 3, end: 4 });
    }
}

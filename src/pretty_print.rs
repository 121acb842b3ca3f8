use crate::environment::EnvError;
use crate::evaluator::EvalError;
use crate::parser::ParseError;
use ariadne::{Label, Report, ReportKind, Source};

impl EvalError {
    /// Renders the error as an ariadne report against the source text.
    /// `source_id` names the origin (a file path, or "REPL").
    pub fn pretty_print(&self, source_id: &str, input: &str) {
        let report = match self {
            EvalError::Env(EnvError::UndefinedVariable(name, span)) => {
                Report::build(ReportKind::Error, (source_id, span.to_range()))
                    .with_message(format!("Undefined variable `{}`", name))
                    .with_label(
                        Label::new((source_id, span.to_range()))
                            .with_message("this variable has not been assigned"),
                    )
            }
            EvalError::TypeMismatch {
                expected,
                found,
                span,
            } => Report::build(ReportKind::Error, (source_id, span.to_range()))
                .with_message("Type mismatch")
                .with_label(Label::new((source_id, span.to_range())).with_message(format!(
                    "expected {}, found a {}",
                    expected,
                    found.type_name()
                ))),
            EvalError::DivisionByZero(span) => {
                Report::build(ReportKind::Error, (source_id, span.to_range()))
                    .with_message("Division by zero")
                    .with_label(
                        Label::new((source_id, span.to_range()))
                            .with_message("this divisor evaluates to zero"),
                    )
            }
        };
        report
            .finish()
            .eprint((source_id, Source::from(input)))
            .unwrap();
    }
}

impl ParseError {
    pub fn pretty_print(&self, source_id: &str, input: &str) {
        let report = match self {
            ParseError::UnexpectedToken { found, expected } => {
                Report::build(ReportKind::Error, (source_id, found.span.to_range()))
                    .with_message(format!("Unexpected token: {}", found.kind))
                    .with_label(
                        Label::new((source_id, found.span.to_range()))
                            .with_message(format!("expected {}", expected)),
                    )
            }
            ParseError::UnexpectedEof(expected) => {
                let end = input.len()..input.len();
                Report::build(ReportKind::Error, (source_id, end.clone()))
                    .with_message("Unexpected end of input")
                    .with_label(
                        Label::new((source_id, end)).with_message(format!("expected {}", expected)),
                    )
            }
            ParseError::LexerError(lex_err) => {
                Report::build(ReportKind::Error, (source_id, lex_err.span.to_range()))
                    .with_message("Lexer error")
                    .with_label(
                        Label::new((source_id, lex_err.span.to_range()))
                            .with_message(lex_err.kind.to_string()),
                    )
            }
        };
        report
            .finish()
            .eprint((source_id, Source::from(input)))
            .unwrap();
    }
}

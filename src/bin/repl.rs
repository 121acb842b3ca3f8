use std::cell::RefCell;
use std::rc::Rc;

use rill::environment::Environment;
use rill::evaluator::execute_statement;
use rill::lexer::{TokenKind, keyword_identifiers, tokenize};
use rill::parser::parse_str;
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Cmd, Completer, Context, Editor, EventHandler, KeyCode, KeyEvent, Modifiers};
use rustyline::{Helper, Highlighter, Hinter, Validator};

struct RillCompleter {
    env: Rc<RefCell<Environment>>,
}

impl RillCompleter {
    fn new(env: Rc<RefCell<Environment>>) -> Self {
        RillCompleter { env }
    }
}

impl rustyline::completion::Completer for RillCompleter {
    type Candidate = String;
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok((
            pos,
            match tokenize(&line[..pos]) {
                Ok(tokens) => {
                    if let Some(TokenKind::Identifier(prefix)) =
                        tokens.last().map(|t| t.kind.clone())
                    {
                        self.env
                            .borrow()
                            .identifiers()
                            .union(&keyword_identifiers())
                            .filter_map(|id| {
                                if id.starts_with(&prefix) {
                                    Some(id[prefix.len()..].to_string())
                                } else {
                                    None
                                }
                            })
                            .collect()
                    } else {
                        vec![]
                    }
                }
                Err(_) => vec![],
            },
        ))
    }
}

#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct InputValidator {
    #[rustyline(Validator)]
    validator: RillValidator,
    #[rustyline(Highlighter)]
    highlighter: RillHighlighter,
    #[rustyline(Completer)]
    completer: RillCompleter,
}

struct RillValidator;

impl Validator for RillValidator {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let input = ctx.input();
        let mut stack = Vec::new();
        let mut in_string = false;

        // String literals have no escape sequences, so a quote always
        // toggles; only parentheses need balancing.
        for (i, c) in input.chars().enumerate() {
            if in_string {
                if c == '"' {
                    in_string = false;
                }
                continue;
            }

            match c {
                '"' => {
                    in_string = true;
                }
                '(' => {
                    stack.push(i);
                }
                ')' => {
                    if stack.pop().is_none() {
                        return Ok(ValidationResult::Invalid(Some(format!(
                            "  - Unmatched ')' at position {}",
                            i
                        ))));
                    }
                }
                _ => {}
            }
        }

        if in_string {
            // Strings cannot span lines, so waiting for more input is futile
            Ok(ValidationResult::Invalid(Some(
                "  - Unterminated string literal".to_string(),
            )))
        } else if stack.is_empty() {
            Ok(ValidationResult::Valid(None))
        } else {
            Ok(ValidationResult::Incomplete)
        }
    }
}

struct RillHighlighter;

impl Highlighter for RillHighlighter {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> std::borrow::Cow<'l, str> {
        let mut stack: Vec<(usize, usize)> = Vec::new(); // (line index, highlighted index)
        let mut highlighted = String::new();
        let mut in_string = false;

        for (i, c) in line.chars().enumerate() {
            if in_string {
                highlighted.push_str(&format!("\x1b[32m{}\x1b[0m", c)); // Green for strings
                if c == '"' {
                    in_string = false;
                }
                continue;
            }

            match c {
                '"' => {
                    in_string = true;
                    highlighted.push_str(&format!("\x1b[32m{}\x1b[0m", c)); // Green for strings
                }
                '(' => {
                    stack.push((i, highlighted.len()));
                    highlighted.push(c);
                }
                ')' => {
                    if let Some((open_idx, matching_pos)) = stack.pop() {
                        if open_idx == pos.saturating_sub(1) || i == pos.saturating_sub(1) {
                            highlighted.push_str(&format!("\x1b[34m{}\x1b[0m", c)); // Blue for matching parens
                            highlighted.replace_range(
                                matching_pos..=matching_pos,
                                &format!("\x1b[1;34m{}\x1b[0m", '('),
                            );
                        } else {
                            highlighted.push(c);
                        }
                    } else {
                        highlighted.push_str(&format!("\x1b[31m{}\x1b[0m", c)); // Red for unmatched parens
                    }
                }
                _ => {
                    highlighted.push(c);
                }
            }
        }

        std::borrow::Cow::Owned(highlighted)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

fn main() -> rustyline::Result<()> {
    println!("rill REPL v0.1.0");
    println!("Type 'exit' or press Ctrl-D to quit.");

    let env = Rc::new(RefCell::new(Environment::new()));
    let h = InputValidator {
        validator: RillValidator,
        highlighter: RillHighlighter,
        completer: RillCompleter::new(env.clone()),
    };
    let config = rustyline::config::Config::builder()
        .edit_mode(rustyline::EditMode::Vi)
        .build();
    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(h));
    rl.bind_sequence(
        KeyEvent(KeyCode::Char('s'), Modifiers::CTRL),
        EventHandler::Simple(Cmd::Newline),
    );
    if rl.load_history("rill_history.txt").is_err() {
        println!("No previous history.");
    }

    loop {
        let readline = rl.readline("rill> ");
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let trimmed_input = line.trim();
                if trimmed_input.is_empty() {
                    continue;
                }
                if trimmed_input.eq_ignore_ascii_case("exit") {
                    break;
                }

                match parse_str(trimmed_input) {
                    Ok(program) => {
                        for stmt in &program.statements {
                            match execute_statement(stmt, &mut env.borrow_mut()) {
                                Ok(Some(output)) => println!("{}", output),
                                Ok(None) => {}
                                Err(e) => {
                                    e.pretty_print("REPL", trimmed_input);
                                    break;
                                }
                            }
                        }
                    }
                    Err(parse_err) => {
                        parse_err.pretty_print("REPL", trimmed_input);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                println!("Interrupted. Type 'exit' or Ctrl-D to quit.");
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("\nExiting.");
                break;
            }
            Err(err) => {
                eprintln!("Readline Error: {:?}", err);
                break;
            }
        }
    }
    rl.save_history("rill_history.txt")
}

use std::env;
use std::fs;
use std::process::ExitCode;

use rill::environment::Environment;
use rill::evaluator::execute_statement;
use rill::parser::parse_str;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let (Some(path), None) = (args.next(), args.next()) else {
        eprintln!("Usage: rill <source-file>");
        return ExitCode::from(2);
    };

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Failed to read '{}': {}", path, err);
            return ExitCode::from(2);
        }
    };

    let program = match parse_str(&source) {
        Ok(program) => program,
        Err(err) => {
            err.pretty_print(&path, &source);
            return ExitCode::FAILURE;
        }
    };

    // One environment per run; output is emitted as it is produced, so a
    // runtime failure keeps everything printed before it.
    let mut env = Environment::new();
    for stmt in &program.statements {
        match execute_statement(stmt, &mut env) {
            Ok(Some(line)) => println!("{}", line),
            Ok(None) => {}
            Err(err) => {
                err.pretty_print(&path, &source);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

extern crate env_logger;
#[macro_use]
extern crate log;
extern crate rustyline;
extern crate yapscheme;

use std::env::args;
use std::fs;
use std::process;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use yapscheme::config::Config;
use yapscheme::interpreter::{interpret, InterpreterError};
use yapscheme::vm::{ExecutionError, Interpreter};

fn main() {
    env_logger::init();

    let interpreter = Interpreter::with_config(Config::from_env());
    debug!("config: {:?}", interpreter.config());

    let code = match args().nth(1) {
        Some(file) => run_file(&file, &interpreter),
        None => run_repl(&interpreter),
    };
    process::exit(code);
}

fn run_file(file_path: &str, interpreter: &Interpreter) -> i32 {
    let source = match fs::read_to_string(file_path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}: {}", file_path, e);
            return 2;
        }
    };

    match interpret(&source, interpreter) {
        Ok(results) => {
            for value in results.into_iter().flatten() {
                println!("{}", value);
            }
            0
        }
        Err(e) => {
            report(&e, "");
            1
        }
    }
}

fn run_repl(interpreter: &Interpreter) -> i32 {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("unable to start the line editor: {}", e);
            return 2;
        }
    };

    loop {
        let line = match rl.readline("yap> ") {
            Ok(line) => line,
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => {
                error!("readline: {}", e);
                break;
            }
        };

        if let Err(e) = rl.add_history_entry(line.as_str()) {
            warn!("history: {}", e);
        }

        match interpret(&line, interpreter) {
            Ok(results) => {
                for value in results.into_iter().flatten() {
                    println!("{}", value);
                }
            }
            Err(e) => report(&e, line.trim()),
        }
    }

    0
}

fn report(e: &InterpreterError, input: &str) {
    match *e {
        InterpreterError::Reader(ref e) => eprintln!("PARSE ERROR: {}", e),
        InterpreterError::Exec(ExecutionError::UnknownIdentifier(_))
            if asks_to_leave(input) =>
        {
            eprintln!("Press Ctrl-D (i.e. EOF) to exit.")
        }
        InterpreterError::Exec(ref e) => eprintln!("RUNTIME ERROR: {}", e),
    }
}

// "help", "exit" or "quit" in any case
fn asks_to_leave(input: &str) -> bool {
    ["help", "exit", "quit"].contains(&&*input.to_lowercase())
}

#[cfg(test)]
mod test {
    use super::asks_to_leave;

    #[test]
    fn exit_words_ignore_case() {
        assert!(asks_to_leave("quit"));
        assert!(asks_to_leave("HELP"));
        assert!(asks_to_leave("Exit"));
        assert!(!asks_to_leave("quitter"));
        assert!(!asks_to_leave("(exit)"));
    }
}

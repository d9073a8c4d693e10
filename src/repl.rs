use crate::context::Context;
use crate::runner::{self, RunOptions};
use std::io::{self, Write};
use std::path::Path;

const HELP: &str = "\
Commands:
  help             Show this message
  loadFile <path>  Run a script file in the current session
  #cls             Clear the screen
  exit, quit       Leave the interpreter

Anything else is evaluated as source, e.g. `declare x = 2; x ^ 3;`";

/// One line of REPL input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Empty,
    Help,
    Clear,
    Exit,
    LoadFile(Option<&'a str>),
    Source(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "" => Command::Empty,
            "help" => Command::Help,
            "#cls" => Command::Clear,
            "exit" | "quit" => Command::Exit,
            _ => match line.strip_prefix("loadFile") {
                Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                    let path = rest.trim();
                    Command::LoadFile((!path.is_empty()).then_some(path))
                }
                _ => Command::Source(line),
            },
        }
    }
}

/// Interactive loop. Bindings persist in `context` across lines.
pub fn start(context: &mut Context, options: &RunOptions) {
    println!("Tally Interpreter v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for commands, 'exit' to quit");
    println!();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => match Command::parse(&line) {
                Command::Empty => continue,
                Command::Help => println!("{}", HELP),
                Command::Clear => {
                    print!("\x1B[2J\x1B[1;1H");
                }
                Command::Exit => {
                    println!("Goodbye!");
                    break;
                }
                Command::LoadFile(None) => eprintln!("Usage: loadFile <path>"),
                Command::LoadFile(Some(path)) => {
                    if let Err(error) = runner::run_file(Path::new(path), context, options) {
                        eprintln!("Error reading file '{}': {}", path, error);
                    }
                }
                Command::Source(source) => {
                    runner::run(source, "<stdin>", context, options);
                }
            },
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

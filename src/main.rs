use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tally::runner::{self, RunOptions};
use tally::{start_repl, Context};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "A small scripting language with accumulated diagnostics")]
struct Cli {
    /// The script file to execute
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Start the REPL (after running FILE, if given)
    #[arg(short, long)]
    interactive: bool,

    /// Print the token stream before evaluating
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree before evaluating
    #[arg(long)]
    tree: bool,

    /// Disable coloured diagnostics
    #[arg(long)]
    no_color: bool,

    /// Debug-level logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = RunOptions {
        show_tokens: cli.tokens,
        show_tree: cli.tree,
        color: !cli.no_color,
    };
    let mut context = Context::new();

    if let Some(path) = &cli.file {
        if !path.exists() {
            eprintln!("Error: File '{}' not found", path.display());
            return ExitCode::FAILURE;
        }

        match runner::run_file(path, &mut context, &options) {
            Ok(evaluation) if !cli.interactive => {
                return if evaluation.is_ok() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                };
            }
            Ok(_) => {}
            Err(error) => {
                eprintln!("Error reading file '{}': {}", path.display(), error);
                return ExitCode::FAILURE;
            }
        }
    }

    start_repl(&mut context, &options);
    ExitCode::SUCCESS
}

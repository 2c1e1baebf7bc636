use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use cacophony::{Evaluator, Parser, Scanner};
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

/// Cacophony evaluates a program of parenthesized expressions and prints
/// each top-level result.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file to evaluate. Reads stdin when omitted.
    file: Option<PathBuf>,

    /// Write the token list as JSON to stderr before evaluating.
    #[arg(long)]
    dump_tokens: bool,

    /// Write the syntax tree as JSON to stderr before evaluating.
    #[arg(long)]
    dump_ast: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("{:#}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let source = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("could not read from file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("could not read from stdin")?;
            buffer
        }
    };

    let tokens = Scanner::new(&source).scan_tokens()?;
    if args.dump_tokens {
        eprintln!("{}", serde_json::to_string_pretty(&tokens)?);
    }

    let program = Parser::new(tokens).parse()?;
    if args.dump_ast {
        eprintln!("{}", serde_json::to_string_pretty(&program)?);
    }

    let stdout = io::stdout();
    let mut evaluator = Evaluator::new(stdout.lock());
    let results = evaluator.run(&program)?;
    tracing::debug!(count = results.len(), "evaluation finished");
    Ok(())
}

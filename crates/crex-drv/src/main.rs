//! crex - Stream the fully-expanded token sequence of a C source file.
//!
//! The driver is a thin shell around [`crex_lex::Lexer`]: it prints one
//! line per token, renders collected diagnostics with source excerpts,
//! and maps the outcome to an exit code (0 on clean end of file, 1 on
//! any reported error).

mod report;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indexmap::IndexMap;
use tracing_subscriber::EnvFilter;

use crex_lex::Lexer;

/// Tokenize a C source file, expanding macros along the way.
#[derive(Parser, Debug)]
#[command(name = "crex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Streaming C translation lexer", long_about = None)]
struct Cli {
    /// Input file.
    file: PathBuf,

    /// Print a per-kind token count after the listing.
    #[arg(long)]
    summary: bool,

    /// Print tokens as C struct initializers instead of the listing.
    #[arg(long)]
    c_structs: bool,

    /// Suppress the token listing (diagnostics still print).
    #[arg(short, long)]
    quiet: bool,

    /// Disable color output.
    #[arg(long, env = "CREX_NO_COLOR")]
    no_color: bool,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, env = "CREX_VERBOSE")]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    tracing::debug!(file = %cli.file.display(), "lexing");
    let mut lexer = Lexer::new(&cli.file)
        .with_context(|| format!("cannot lex '{}'", cli.file.display()))?;
    let colors = !cli.no_color && std::io::stderr().is_terminal();

    let mut counts: IndexMap<&'static str, usize> = IndexMap::new();
    let failed = loop {
        match lexer.next_token() {
            Ok(token) => {
                *counts.entry(token.kind.name()).or_insert(0) += 1;
                if !cli.quiet {
                    if cli.c_structs {
                        println!("{}", lexer.token_c_struct(&token));
                    } else {
                        println!("{}", lexer.display_token(&token));
                    }
                }
                if token.is_eof() {
                    break false;
                }
            }
            Err(_) => break true,
        }
    };

    report::print_diagnostics(&lexer, colors);
    if cli.summary {
        print_summary(&counts);
    }
    Ok(if failed { 1 } else { 0 })
}

fn print_summary(counts: &IndexMap<&'static str, usize>) {
    let total: usize = counts.values().sum();
    println!("-- token summary: {total} tokens --");
    for (name, count) in counts {
        println!("{count:>6}  {name}");
    }
}

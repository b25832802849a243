//! Quill CLI - fetch and render remote-authored markdown.
//!
//! Provides commands for:
//! - `fetch`: Print a document as JSON
//! - `render`: Render a document to HTML
//! - `build`: Render several documents to HTML files in parallel

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, FetchArgs, RenderArgs};
use output::Output;

/// Quill - remote-authored markdown renderer.
#[derive(Parser)]
#[command(name = "quill", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a document and print it as JSON.
    Fetch(FetchArgs),
    /// Fetch a document and render it to HTML.
    Render(RenderArgs),
    /// Render several documents to HTML files.
    Build(BuildArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Fetch(args) => args.source.verbose,
            Self::Render(args) => args.source.verbose,
            Self::Build(args) => args.source.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.command.verbose()))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Fetch(args) => args.execute(),
        Commands::Render(args) => args.execute(),
        Commands::Build(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

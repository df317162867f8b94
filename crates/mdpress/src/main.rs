//! mdpress CLI - Markdown editor with math, diagrams and document export.
//!
//! Provides commands for:
//! - `serve`: Start the editor server
//! - `preview`: Render a Markdown file to the preview HTML fragment
//! - `export`: Convert a Markdown file to DOCX or PDF

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExportArgs, PreviewArgs, ServeArgs};
use error::CliError;
use output::Output;

/// mdpress - Markdown editor with math, diagrams and document export.
#[derive(Parser)]
#[command(name = "mdpress", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the editor server.
    Serve(ServeArgs),
    /// Render a Markdown file to an HTML fragment.
    Preview(PreviewArgs),
    /// Convert a Markdown file to DOCX or PDF.
    Export(ExportArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute())),
        Commands::Preview(args) => args.execute(),
        Commands::Export(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

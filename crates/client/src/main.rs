//! Collectible save blob inspector.
//!
//! Validates a save blob and prints the entries a session would load from it.
//!
//! # Examples
//!
//! ```bash
//! collectible-inspect save.txt
//! collectible-inspect --format json --container Town save.txt
//! cat save.txt | collectible-inspect
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use collectible_inspect::{inspect, read_blob, render_json, render_summary};

/// Validate and print a collectible save blob
#[derive(Parser)]
#[command(name = "collectible-inspect")]
#[command(version, long_about = None)]
struct Cli {
    /// Save blob file (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Only show entries of this container
    #[arg(short, long, value_name = "CONTAINER")]
    container: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Entries grouped by container
    Summary,
    /// Full JSON report
    Json,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let blob = read_blob(cli.path.as_deref())?;
    let source = cli
        .path
        .as_ref()
        .map_or_else(|| "<stdin>".to_owned(), |path| path.display().to_string());

    let mut report = inspect(&blob).with_context(|| format!("Invalid save blob: {source}"))?;
    tracing::info!(source = %source, entries = report.entries.len(), "Save blob is valid");

    if let Some(container) = &cli.container {
        report.retain_container(container);
    }

    match cli.format {
        OutputFormat::Summary => print!("{}", render_summary(&report)),
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }

    Ok(())
}

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use gazetteer::{pipeline, Config};
use tracing_subscriber::EnvFilter;

/// Keeps per-category datasets of populated places in sync with OpenStreetMap.
#[derive(Debug, Parser)]
struct Cli {
    /// RON file overriding the default configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory the input file and datasets are resolved against
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Only fetch data from the Overpass API
    Fetch,
    /// Only process previously fetched data
    Process,
    /// Fetch, then process (the default)
    Both,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(x) => x,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                ErrorKind::InvalidSubcommand => {
                    println!();
                    let _ = Cli::command().print_help();
                    ExitCode::FAILURE
                }
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("✗ Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config = config.rooted(dir);
    }

    println!("Places Data Processor");
    println!("=====================\n");

    match cli.command.unwrap_or(Command::Both) {
        Command::Fetch => fetch(&config)?,
        Command::Process => process(&config)?,
        Command::Both => {
            fetch(&config)?;
            println!();
            process(&config)?;
        }
    }

    println!("\n✓ Operation completed successfully!");
    Ok(())
}

fn fetch(config: &Config) -> Result<()> {
    println!("Fetching data from Overpass API...");
    pipeline::fetch(config)?;
    println!(
        "✓ Data fetched successfully and saved to {}",
        config.input.display()
    );
    Ok(())
}

fn process(config: &Config) -> Result<()> {
    println!("Processing {}...", config.input.display());
    let report = pipeline::process(config)?;
    for summary in &report.summaries {
        println!("{summary}");
    }
    println!(
        "All places combined: {} total entries saved",
        report.combined
    );
    println!("✓ Data processing completed successfully!");
    Ok(())
}

//! poetry-bridge CLI
//!
//! Runs `poetry export` and `poetry build` for the project in the current
//! directory and prints the structured result.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose; RUST_LOG narrows or widens it
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(log_filter())
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    let cwd = std::env::current_dir()?;
    let mut poetry = commands::adapter(&cli, &cwd);
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Export { only, output } => {
            commands::run_export(&mut poetry, &only, output.as_deref(), &mut stdout)
        }
        Commands::Build { format } => commands::run_build(&mut poetry, &format, &mut stdout),
        Commands::Info { json } => commands::run_info(&mut poetry, json, &mut stdout),
    }
}

/// Directives used when `RUST_LOG` is unset or invalid.
const VERBOSE_FILTER: &str = "debug";

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(VERBOSE_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_verbose_filter_defaults_to_debug() {
        assert_eq!(
            EnvFilter::new(VERBOSE_FILTER).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }
}

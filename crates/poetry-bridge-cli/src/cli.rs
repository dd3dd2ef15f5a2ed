//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// poetry-bridge - Export requirements and build archives with Poetry
#[derive(Parser, Debug)]
#[command(name = "poetry-bridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory containing pyproject.toml (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Virtualenv whose bin directory is searched for poetry first
    #[arg(long, global = true, env = "VIRTUAL_ENV")]
    pub venv: Option<PathBuf>,

    /// Reuse the environment without running install commands
    #[arg(long, global = true)]
    pub no_install: bool,

    /// Python interpreter used to look up the installed poetry version
    #[arg(long, global = true)]
    pub python: Option<PathBuf>,

    /// Read installed versions from these site-packages directories instead of
    /// asking the interpreter
    #[arg(long = "site-packages", global = true)]
    pub site_packages: Vec<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Export the lock file to requirements format
    ///
    /// Examples:
    ///   poetry-bridge export                    # main and dev dependencies
    ///   poetry-bridge export --only test        # only the test group
    ///   poetry-bridge export -o requirements.txt
    Export {
        /// Dependency groups to export exclusively (repeatable)
        #[arg(long = "only")]
        only: Vec<String>,

        /// Write requirements to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the package and print the archive file name
    Build {
        /// Distribution format: wheel or sdist
        #[arg(short, long, default_value = "wheel")]
        format: String,
    },

    /// Show package metadata and poetry capabilities
    Info {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_groups() {
        let cli = Cli::parse_from(["poetry-bridge", "export", "--only", "test", "--only", "lint"]);
        assert_eq!(
            cli.command,
            Commands::Export {
                only: vec!["test".to_string(), "lint".to_string()],
                output: None,
            }
        );
    }

    #[test]
    fn test_parse_build_default_format() {
        let cli = Cli::parse_from(["poetry-bridge", "build"]);
        assert_eq!(
            cli.command,
            Commands::Build {
                format: "wheel".to_string()
            }
        );
    }

    #[test]
    fn test_parse_global_flags_after_command() {
        let cli = Cli::parse_from(["poetry-bridge", "info", "--no-install", "--project", "/tmp/p"]);
        assert!(cli.no_install);
        assert_eq!(cli.project, Some(PathBuf::from("/tmp/p")));
    }
}

//! Command implementations for the poetry-bridge CLI

use crate::cli::Cli;
use crate::error::Result;
use colored::Colorize;
use poetry_bridge::{
    DistInfoMetadata, InterpreterMetadata, PackageMetadata, Poetry, ProcessSession, Session,
    version::{parse_version, supports_group_deps},
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Adapter type driven by the CLI.
pub type CliPoetry = Poetry<ProcessSession, Box<dyn PackageMetadata>>;

/// Build the adapter from global flags.
pub fn adapter(cli: &Cli, cwd: &Path) -> CliPoetry {
    let project_dir = match &cli.project {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => cwd.join(dir),
        None => cwd.to_path_buf(),
    };

    let mut session = ProcessSession::new(&project_dir).with_no_install(cli.no_install);
    if let Some(venv) = &cli.venv {
        session = session.with_virtualenv(venv);
    }

    Poetry::new(session, metadata(cli))
}

fn metadata(cli: &Cli) -> Box<dyn PackageMetadata> {
    if !cli.site_packages.is_empty() {
        tracing::debug!("Reading versions from {:?}", cli.site_packages);
        return Box::new(DistInfoMetadata::new(cli.site_packages.iter().cloned()));
    }

    let python = match (&cli.python, &cli.venv) {
        (Some(python), _) => python.clone(),
        (None, Some(venv)) => venv_python(venv),
        (None, None) => PathBuf::from("python3"),
    };
    tracing::debug!("Asking {} for installed versions", python.display());
    Box::new(InterpreterMetadata::new(python))
}

fn venv_python(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts").join("python.exe")
    } else {
        venv.join("bin").join("python")
    }
}

/// Run `export`, writing requirements to `output` or `out`.
pub fn run_export<S: Session, M: PackageMetadata>(
    poetry: &mut Poetry<S, M>,
    only: &[String],
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()> {
    let groups = if only.is_empty() { None } else { Some(only) };
    let requirements = poetry.export(groups)?;

    match output {
        Some(path) => {
            std::fs::write(path, &requirements)?;
            tracing::info!("Wrote requirements to {}", path.display());
        }
        None => out.write_all(requirements.as_bytes())?,
    }
    Ok(())
}

/// Run `build`, printing the archive file name.
pub fn run_build<S: Session, M: PackageMetadata>(
    poetry: &mut Poetry<S, M>,
    format: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let archive = poetry.build(format)?;
    writeln!(out, "{archive}")?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct ProjectInfo {
    name: String,
    extras: Vec<String>,
    poetry_version: Option<String>,
    dependency_groups: bool,
}

/// Run `info`, describing the project and the installed poetry.
pub fn run_info<S: Session, M: PackageMetadata>(
    poetry: &mut Poetry<S, M>,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let config = poetry.config()?;
    let name = config.name()?.to_string();
    let extras = config.extras()?;

    let installed = match poetry.version() {
        Ok(raw) => Some(raw.trim().to_string()),
        Err(poetry_bridge::Error::PackageNotFound { .. }) => None,
        Err(e) => return Err(e.into()),
    };
    let dependency_groups = match &installed {
        Some(raw) => supports_group_deps(&parse_version(raw)?),
        None => false,
    };

    let info = ProjectInfo {
        name,
        extras,
        poetry_version: installed,
        dependency_groups,
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
        return Ok(());
    }

    writeln!(out, "{} {}", "package:".bold(), info.name)?;
    if info.extras.is_empty() {
        writeln!(out, "{} {}", "extras:".bold(), "(none)".dimmed())?;
    } else {
        writeln!(out, "{} {}", "extras:".bold(), info.extras.join(", "))?;
    }
    match &info.poetry_version {
        Some(version) => writeln!(out, "{} {}", "poetry:".bold(), version)?,
        None => writeln!(out, "{} {}", "poetry:".bold(), "not installed".yellow())?,
    }
    let groups = if info.dependency_groups {
        "supported".green()
    } else {
        "unsupported".yellow()
    };
    writeln!(out, "{} {}", "dependency groups:".bold(), groups)?;
    Ok(())
}

//! Poetry command adapter.
//!
//! [`Poetry`] wraps a [`Session`] and runs `poetry export` and `poetry build`
//! through it, choosing flags from the project manifest and the installed
//! poetry version, then turns the textual output into something usable.

use crate::config::{Config, POETRY_PACKAGE};
use crate::error::{Error, Result};
use crate::format::DistributionFormat;
use crate::metadata::PackageMetadata;
use crate::session::{RunOptions, Session, format_command};
use std::io::Write;

const POETRY: &str = "poetry";

/// Prefix of diagnostic lines poetry mixes into exported requirements.
const WARNING_PREFIX: &str = "Warning:";

/// Helper for invoking Poetry inside a session.
pub struct Poetry<S, M> {
    session: S,
    metadata: M,
    diagnostics: Box<dyn Write>,
    config: Option<Config>,
}

impl<S: Session, M: PackageMetadata> Poetry<S, M> {
    /// Create an adapter; warnings go to stderr.
    pub fn new(session: S, metadata: M) -> Self {
        Self {
            session,
            metadata,
            diagnostics: Box::new(std::io::stderr()),
            config: None,
        }
    }

    /// Send diagnostic lines to `sink` instead of stderr.
    pub fn with_diagnostics(mut self, sink: impl Write + 'static) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Return the package configuration, loading it on first use.
    pub fn config(&mut self) -> Result<&Config> {
        let config = match self.config.take() {
            Some(config) => config,
            None => Config::load(&self.session.project_dir()?)?,
        };
        Ok(self.config.insert(config))
    }

    /// Installed poetry version, exactly as package metadata reports it.
    pub fn version(&self) -> Result<String> {
        self.metadata.version(POETRY_PACKAGE)
    }

    /// Export the lock file to requirements format.
    ///
    /// `groups` restricts the export to those dependency groups (`--only`).
    /// Without groups, the `dev` group is included using whichever flag the
    /// installed poetry understands.
    ///
    /// Fails with [`Error::CommandSkipped`] when the session did not run
    /// `poetry export`.
    pub fn export(&mut self, groups: Option<&[String]>) -> Result<String> {
        let extras = self.config()?.extras()?;

        let mut args = vec!["export".to_string(), "--format=requirements.txt".to_string()];
        args.extend(extras.iter().map(|extra| format!("--extras={extra}")));
        args.push("--without-hashes".to_string());

        match groups {
            Some(groups) if !groups.is_empty() => {
                args.extend(groups.iter().map(|group| format!("--only={group}")));
            }
            _ => {
                if Config::supports_dependency_groups(&self.metadata)? {
                    args.push("--with=dev".to_string());
                } else {
                    args.push("--dev".to_string());
                }
            }
        }

        let output = self.run(&args)?;
        self.strip_warnings(&output)
    }

    /// Build the package and return the archive's file name.
    ///
    /// `format` must be `"wheel"` or `"sdist"`; anything else fails with
    /// [`Error::InvalidFormat`] before poetry is run.
    pub fn build(&mut self, format: &str) -> Result<String> {
        let format: DistributionFormat = format.parse()?;
        self.build_archive(format)
    }

    /// Build the package in the given format.
    ///
    /// The file name is taken from what poetry prints, which looks like:
    ///
    /// ```text
    /// Building foobar (0.1.0)
    ///  - Building wheel
    ///  - Built foobar-0.1.0-py3-none-any.whl
    /// ```
    ///
    /// The last whitespace-separated token is the archive. This is brittle,
    /// but it needs neither a clean `dist` directory nor a reconstruction of
    /// the file name from metadata, which poetry's version normalization makes
    /// unreliable.
    pub fn build_archive(&mut self, format: DistributionFormat) -> Result<String> {
        let args = vec![
            "build".to_string(),
            format!("--format={format}"),
            "--no-ansi".to_string(),
        ];

        let output = self.run(&args)?;
        output
            .split_whitespace()
            .last()
            .map(str::to_string)
            .ok_or_else(|| Error::EmptyOutput {
                command: format_command(POETRY, &args[..1]),
            })
    }

    fn run(&mut self, args: &[String]) -> Result<String> {
        self.session
            .run_always(POETRY, args, &RunOptions::captured_external())?
            .ok_or_else(|| Error::CommandSkipped {
                command: format_command(POETRY, &args[..1]),
            })
    }

    /// Move `Warning:` lines to the diagnostic sink and return the rest.
    fn strip_warnings(&mut self, output: &str) -> Result<String> {
        let mut kept = String::with_capacity(output.len());
        for line in lines_with_terminators(output) {
            if line.starts_with(WARNING_PREFIX) {
                tracing::warn!("{}", line.trim_end_matches(is_line_break));
                self.diagnostics
                    .write_all(line.as_bytes())
                    .map_err(Error::Diagnostics)?;
                if !line.ends_with(is_line_break) {
                    self.diagnostics.write_all(b"\n").map_err(Error::Diagnostics)?;
                }
                continue;
            }
            kept.push_str(line);
        }
        self.diagnostics.flush().map_err(Error::Diagnostics)?;
        Ok(kept)
    }
}

/// Characters that end a line, `\r\n` counting as one terminator.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split `text` into lines, each keeping its terminator.
fn lines_with_terminators(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = match rest.find(is_line_break) {
            Some(start) => {
                let terminator = rest[start..].chars().next()?;
                let mut end = start + terminator.len_utf8();
                if terminator == '\r' && rest[end..].starts_with('\n') {
                    end += 1;
                }
                end
            }
            None => rest.len(),
        };
        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}

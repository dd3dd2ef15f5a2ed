//! Error types for poetry-bridge

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    #[error("Invalid manifest at {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    #[error("Package not installed: {package}")]
    PackageNotFound { package: String },

    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Installed poetry version does not meet requirements.
    ///
    /// Reserved for callers; nothing in this crate returns it.
    #[error("Installed poetry {installed} does not satisfy {required}")]
    IncompatibleVersion { installed: String, required: String },

    /// The command was not executed by the session.
    #[error(
        "The command `{command}` was not executed (a possible cause is specifying `--no-install`)"
    )]
    CommandSkipped { command: String },

    #[error("Command not found: {command} ({message})")]
    CommandNotFound { command: String, message: String },

    #[error("Program `{program}` is not installed into the virtualenv and external programs are not allowed")]
    ExternalProgram { program: String },

    #[error("Command `{command}` failed with exit code {}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Command `{command}` produced no output")]
    EmptyOutput { command: String },

    #[error("Invalid distribution format '{value}' (expected 'wheel' or 'sdist')")]
    InvalidFormat { value: String },

    #[error("Failed to write diagnostics: {0}")]
    Diagnostics(#[source] std::io::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path: path.into(),
            message: message.into(),
        }
    }
}

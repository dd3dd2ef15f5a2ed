//! Installed-package metadata lookups.
//!
//! [`PackageMetadata`] answers "which version of this distribution is
//! installed?". Two implementations are provided:
//!
//! - [`DistInfoMetadata`] scans site-packages style directories for
//!   `<name>-<version>.dist-info` entries
//! - [`InterpreterMetadata`] asks a Python interpreter through
//!   `importlib.metadata`

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Lookup of installed distribution versions.
pub trait PackageMetadata {
    /// Return the installed version string of `package`.
    ///
    /// Fails with [`Error::PackageNotFound`] when it is not installed.
    fn version(&self, package: &str) -> Result<String>;
}

impl<T: PackageMetadata + ?Sized> PackageMetadata for &T {
    fn version(&self, package: &str) -> Result<String> {
        (**self).version(package)
    }
}

impl<T: PackageMetadata + ?Sized> PackageMetadata for Box<T> {
    fn version(&self, package: &str) -> Result<String> {
        (**self).version(package)
    }
}

/// Normalize a distribution name: lowercase, with runs of `-`, `_` and `.`
/// collapsed into a single `-`.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
        } else {
            normalized.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }
    normalized
}

/// Metadata read from `.dist-info` directories.
#[derive(Debug, Clone, Default)]
pub struct DistInfoMetadata {
    search_paths: Vec<PathBuf>,
}

impl DistInfoMetadata {
    pub fn new(search_paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            search_paths: search_paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Look for `wanted` in one directory.
    ///
    /// Entries are visited by file name, so when stale `.dist-info`
    /// directories are left behind the lexically first one wins.
    fn find_in(&self, dir: &Path, wanted: &str) -> Result<Option<String>> {
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut entries: Vec<_> = fs::read_dir(dir)
            .map_err(|e| Error::io(dir, e))?
            .flatten()
            .collect();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let file_name = entry.file_name();
            let Some(stem) = file_name
                .to_str()
                .and_then(|n| n.strip_suffix(".dist-info"))
            else {
                continue;
            };
            // Wheel directory names escape `-` in the project name, so the
            // last dash separates name from version
            let Some((name, dir_version)) = stem.rsplit_once('-') else {
                continue;
            };
            if normalize_name(name) != wanted {
                continue;
            }

            let metadata_path = entry.path().join("METADATA");
            let version = match fs::read_to_string(&metadata_path) {
                Ok(text) => version_header(&text).unwrap_or_else(|| dir_version.to_string()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => dir_version.to_string(),
                Err(e) => return Err(Error::io(metadata_path, e)),
            };
            tracing::debug!("Found {} {} in {}", name, version, dir.display());
            return Ok(Some(version));
        }

        Ok(None)
    }
}

impl PackageMetadata for DistInfoMetadata {
    fn version(&self, package: &str) -> Result<String> {
        let wanted = normalize_name(package);
        for dir in &self.search_paths {
            if let Some(version) = self.find_in(dir, &wanted)? {
                return Ok(version);
            }
        }
        Err(Error::PackageNotFound {
            package: package.to_string(),
        })
    }
}

/// Extract the `Version:` header from a core metadata file.
fn version_header(text: &str) -> Option<String> {
    text.lines()
        // Headers end at the first blank line; the description follows
        .take_while(|line| !line.trim().is_empty())
        .find_map(|line| line.strip_prefix("Version:"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

const VERSION_SCRIPT: &str = "import sys\n\
from importlib import metadata\n\
try:\n    print(metadata.version(sys.argv[1]))\n\
except metadata.PackageNotFoundError:\n    sys.exit(3)\n";

/// Metadata reported by a Python interpreter.
#[derive(Debug, Clone)]
pub struct InterpreterMetadata {
    python: PathBuf,
}

impl InterpreterMetadata {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }

    pub fn python(&self) -> &Path {
        &self.python
    }
}

impl Default for InterpreterMetadata {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl PackageMetadata for InterpreterMetadata {
    fn version(&self, package: &str) -> Result<String> {
        let output = Command::new(&self.python)
            .args(["-c", VERSION_SCRIPT, package])
            .output()
            .map_err(|e| Error::CommandNotFound {
                command: self.python.display().to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            tracing::debug!(
                "{} could not resolve {}: {}",
                self.python.display(),
                package,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(Error::PackageNotFound {
                package: package.to_string(),
            });
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            return Err(Error::PackageNotFound {
                package: package.to_string(),
            });
        }
        Ok(version)
    }
}

//! Poetry configuration read from `pyproject.toml`

use crate::error::{Error, Result};
use crate::metadata::PackageMetadata;
use crate::version::{parse_version, supports_group_deps};
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file name, relative to the project directory.
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// Distribution name of the tool whose version gates dependency groups.
pub const POETRY_PACKAGE: &str = "poetry";

/// The `[tool.poetry]` table of a project manifest.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    table: toml::Table,
}

impl Config {
    /// Load `<project>/pyproject.toml`.
    pub fn load(project: &Path) -> Result<Self> {
        let path = project.join(MANIFEST_FILE);
        let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Self::parse(path, &text)
    }

    /// Parse manifest text; `path` is only used in error messages.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        let mut document: toml::Table = text.parse().map_err(|e: toml::de::Error| {
            Error::ManifestParse {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;

        let table = match document.remove("tool") {
            Some(toml::Value::Table(mut tool)) => match tool.remove("poetry") {
                Some(toml::Value::Table(poetry)) => poetry,
                Some(_) => {
                    return Err(Error::invalid_manifest(&path, "[tool.poetry] is not a table"));
                }
                None => return Err(Error::invalid_manifest(&path, "missing [tool.poetry]")),
            },
            Some(_) => return Err(Error::invalid_manifest(&path, "[tool] is not a table")),
            None => return Err(Error::invalid_manifest(&path, "missing [tool.poetry]")),
        };

        tracing::debug!("Loaded [tool.poetry] from {}", path.display());
        Ok(Self { path, table })
    }

    pub fn manifest_path(&self) -> &Path {
        &self.path
    }

    /// Return the package name.
    pub fn name(&self) -> Result<&str> {
        match self.table.get("name") {
            Some(toml::Value::String(name)) => Ok(name),
            Some(other) => Err(Error::invalid_manifest(
                &self.path,
                format!("tool.poetry.name must be a string, found {}", other.type_str()),
            )),
            None => Err(Error::invalid_manifest(&self.path, "missing tool.poetry.name")),
        }
    }

    /// Return the package extras, in declaration order.
    pub fn extras(&self) -> Result<Vec<String>> {
        match self.table.get("extras") {
            Some(toml::Value::Table(extras)) => Ok(extras.keys().cloned().collect()),
            Some(other) => Err(Error::invalid_manifest(
                &self.path,
                format!("tool.poetry.extras must be a table, found {}", other.type_str()),
            )),
            None => Ok(Vec::new()),
        }
    }

    /// Current installed version of poetry.
    pub fn installed_version(metadata: &dyn PackageMetadata) -> Result<Version> {
        let raw = metadata.version(POETRY_PACKAGE)?;
        parse_version(&raw)
    }

    /// Whether the installed poetry can handle dependency groups.
    pub fn supports_dependency_groups(metadata: &dyn PackageMetadata) -> Result<bool> {
        let version = Self::installed_version(metadata)?;
        let supported = supports_group_deps(&version);
        tracing::debug!("poetry {} supports dependency groups: {}", version, supported);
        Ok(supported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct Installed(HashMap<&'static str, &'static str>);

    impl PackageMetadata for Installed {
        fn version(&self, package: &str) -> Result<String> {
            self.0
                .get(package)
                .map(|v| v.to_string())
                .ok_or_else(|| Error::PackageNotFound {
                    package: package.to_string(),
                })
        }
    }

    fn poetry(version: &'static str) -> Installed {
        Installed(HashMap::from([("poetry", version)]))
    }

    const MANIFEST: &str = r#"
[tool.poetry]
name = "foobar"
version = "0.1.0"

[tool.poetry.extras]
pygments = ["pygments"]
toml = ["tomli"]
docs = ["sphinx"]
"#;

    #[test]
    fn test_load_from_project_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), MANIFEST).unwrap();

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.name().unwrap(), "foobar");
        assert_eq!(config.manifest_path(), temp.path().join("pyproject.toml"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = Config::load(temp.path()).unwrap_err();
        match err {
            Error::Io { path, source } => {
                assert!(path.ends_with("pyproject.toml"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_malformed_toml() {
        let err = Config::parse("pyproject.toml", "[tool.poetry\nname = ").unwrap_err();
        assert!(matches!(err, Error::ManifestParse { .. }));
    }

    #[test]
    fn test_parse_missing_poetry_table() {
        let err = Config::parse("pyproject.toml", "[project]\nname = \"x\"\n").unwrap_err();
        assert!(err.to_string().contains("missing [tool.poetry]"));

        let err = Config::parse("pyproject.toml", "[tool.black]\nline-length = 88\n").unwrap_err();
        assert!(err.to_string().contains("missing [tool.poetry]"));
    }

    #[test]
    fn test_parse_poetry_not_a_table() {
        let err = Config::parse("pyproject.toml", "[tool]\npoetry = 1\n").unwrap_err();
        assert!(matches!(err, Error::InvalidManifest { .. }));
    }

    #[test]
    fn test_extras_in_declaration_order() {
        let config = Config::parse("pyproject.toml", MANIFEST).unwrap();
        assert_eq!(config.extras().unwrap(), vec!["pygments", "toml", "docs"]);
    }

    #[test]
    fn test_extras_absent() {
        let config = Config::parse("pyproject.toml", "[tool.poetry]\nname = \"foobar\"\n").unwrap();
        assert!(config.extras().unwrap().is_empty());
    }

    #[test]
    fn test_extras_wrong_type() {
        let config = Config::parse(
            "pyproject.toml",
            "[tool.poetry]\nname = \"foobar\"\nextras = [\"a\"]\n",
        )
        .unwrap();
        let err = config.extras().unwrap_err();
        assert!(err.to_string().contains("must be a table"));
    }

    #[test]
    fn test_name_missing_or_wrong_type() {
        let config = Config::parse("pyproject.toml", "[tool.poetry]\nversion = \"1.0\"\n").unwrap();
        assert!(config.name().unwrap_err().to_string().contains("missing tool.poetry.name"));

        let config = Config::parse("pyproject.toml", "[tool.poetry]\nname = 42\n").unwrap();
        assert!(config.name().unwrap_err().to_string().contains("must be a string"));
    }

    #[test]
    fn test_installed_version() {
        let version = Config::installed_version(&poetry("1.1.15")).unwrap();
        assert_eq!(version, Version::new(1, 1, 15));
    }

    #[test]
    fn test_installed_version_not_installed() {
        let err = Config::installed_version(&Installed(HashMap::new())).unwrap_err();
        assert!(matches!(err, Error::PackageNotFound { ref package } if package == "poetry"));
    }

    #[test]
    fn test_supports_dependency_groups_threshold() {
        assert!(!Config::supports_dependency_groups(&poetry("1.1.9")).unwrap());
        assert!(Config::supports_dependency_groups(&poetry("1.2.0")).unwrap());
        assert!(Config::supports_dependency_groups(&poetry("1.2.1")).unwrap());
        assert!(Config::supports_dependency_groups(&poetry("1.3.0-alpha")).unwrap());
        // Hyphenated post releases of 1.2.0
        assert!(Config::supports_dependency_groups(&poetry("1.2.0-1")).unwrap());
        assert!(Config::supports_dependency_groups(&poetry("1.2.0-post1")).unwrap());
    }
}

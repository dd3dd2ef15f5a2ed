//! [`TestProject`] builder for manifest-driven test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory holding a `pyproject.toml`.
///
/// # Example
///
/// ```rust
/// use poetry_bridge_test_utils::TestProject;
///
/// let project = TestProject::new("foobar").with_extras(&["docs", "toml"]);
/// assert!(project.manifest_path().exists());
/// ```
pub struct TestProject {
    temp_dir: TempDir,
    name: String,
    extras: Vec<String>,
}

impl TestProject {
    /// Create a project declaring `name` and no extras.
    pub fn new(name: &str) -> Self {
        let project = Self {
            temp_dir: TempDir::new().unwrap(),
            name: name.to_string(),
            extras: Vec::new(),
        };
        project.write_manifest();
        project
    }

    /// Create a project with a verbatim manifest.
    pub fn with_manifest(text: &str) -> Self {
        let project = Self {
            temp_dir: TempDir::new().unwrap(),
            name: String::new(),
            extras: Vec::new(),
        };
        project.write_raw(text);
        project
    }

    /// Declare `extras`, rewriting the manifest.
    pub fn with_extras(mut self, extras: &[&str]) -> Self {
        self.extras = extras.iter().map(|e| e.to_string()).collect();
        self.write_manifest();
        self
    }

    /// Return the project root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root().join("pyproject.toml")
    }

    /// Overwrite the manifest with `text`.
    pub fn write_raw(&self, text: &str) {
        fs::write(self.manifest_path(), text).unwrap();
    }

    fn write_manifest(&self) {
        let mut text = format!(
            "[tool.poetry]\nname = \"{}\"\nversion = \"0.1.0\"\ndescription = \"\"\n\n\
             [tool.poetry.dependencies]\npython = \"^3.8\"\n",
            self.name
        );
        if !self.extras.is_empty() {
            text.push_str("\n[tool.poetry.extras]\n");
            for extra in &self.extras {
                text.push_str(&format!("{extra} = [\"{extra}-dep\"]\n"));
            }
        }
        text.push_str(
            "\n[build-system]\nrequires = [\"poetry-core>=1.0.0\"]\n\
             build-backend = \"poetry.core.masonry.api\"\n",
        );
        self.write_raw(&text);
    }
}

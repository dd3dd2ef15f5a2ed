//! [`StaticMetadata`] with fixed installed versions.

use poetry_bridge::{Error, PackageMetadata, Result};
use std::collections::HashMap;

/// Installed versions known up front.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    versions: HashMap<String, String>,
}

impl StaticMetadata {
    /// Nothing installed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Only poetry installed, at `version`.
    pub fn poetry(version: &str) -> Self {
        Self::empty().with("poetry", version)
    }

    pub fn with(mut self, package: &str, version: &str) -> Self {
        self.versions.insert(package.to_string(), version.to_string());
        self
    }
}

impl PackageMetadata for StaticMetadata {
    fn version(&self, package: &str) -> Result<String> {
        self.versions
            .get(package)
            .cloned()
            .ok_or_else(|| Error::PackageNotFound {
                package: package.to_string(),
            })
    }
}

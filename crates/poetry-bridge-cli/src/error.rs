//! Error types for poetry-bridge-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from poetry-bridge
    #[error(transparent)]
    Bridge(#[from] poetry_bridge::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_error_is_transparent() {
        let err: CliError = poetry_bridge::Error::InvalidFormat {
            value: "zip".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid distribution format 'zip' (expected 'wheel' or 'sdist')"
        );
    }
}

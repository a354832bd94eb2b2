//! Custom error types for conx.
//!
//! The merge and candidate operations never fail. These errors come from the
//! edges of the crate: reading connection files and computing an explicit
//! step-by-step upgrade path.

use thiserror::Error;

/// Errors that can occur while loading input or planning an upgrade path.
#[derive(Error, Debug)]
pub enum ConxError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse connection JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    #[error("Invalid version format: {0}")]
    InvalidVersion(String),

    #[error("Upgrade not possible: {0}")]
    UpgradeNotPossible(String),
}

impl ConxError {
    /// Create an I/O error tagged with the offending path.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ConxError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON error tagged with the offending path.
    pub fn json(path: impl Into<String>, source: serde_json::Error) -> Self {
        ConxError::Json {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_version() {
        let err = ConxError::InvalidVersion("invalid".to_string());
        assert_eq!(err.to_string(), "Invalid version format: invalid");
    }

    #[test]
    fn test_error_display_invalid_connection() {
        let err = ConxError::InvalidConnection("page.json holds a JSON array".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid connection: page.json holds a JSON array"
        );
    }

    #[test]
    fn test_error_display_upgrade_not_possible() {
        let err = ConxError::UpgradeNotPossible("downgrade".to_string());
        assert_eq!(err.to_string(), "Upgrade not possible: downgrade");
    }

    #[test]
    fn test_error_io_helper() {
        let err = ConxError::io(
            "page.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().starts_with("Failed to read page.json"));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_error_json_helper() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ConxError::json("page.json", source);
        assert!(matches!(err, ConxError::Json { .. }));
        assert!(err.to_string().contains("page.json"));
    }
}

//! Error types for N4L

use thiserror::Error;

/// Result type alias using N4L's Error
pub type Result<T> = std::result::Result<T, Error>;

/// N4L error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Graph errors (E001-E099)
    #[error("Graph '{0}' not found. Run `n4l graphs list` to see stored graphs.")]
    GraphNotFound(String),

    // Extraction errors (E300-E399)
    #[error("Invalid extraction pattern: {0}")]
    PatternError(#[from] regex::Error),

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::GraphNotFound(_) => "E001",
            Self::PatternError(_) => "E300",
            Self::DatabaseError(_) => "E400",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
            Self::Serialization(_) => "E900",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::GraphNotFound(_) => Some("n4l graphs list".to_string()),
            Self::DatabaseError(_) => {
                Some("Check that the database path is writable and not locked".to_string())
            }
            Self::ConfigError(_) => Some("n4l config list".to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::GraphNotFound("doc1".into()).code(), "E001");
        assert_eq!(Error::ConfigError("bad".into()).code(), "E600");
        assert_eq!(Error::InvalidInput("bad".into()).code(), "E800");
        assert_eq!(Error::Other("oops".into()).code(), "E9999");
    }

    #[test]
    fn test_database_error_is_wrapped_unmodified() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert_eq!(err.code(), "E400");
        assert!(matches!(err, Error::DatabaseError(sqlx::Error::RowNotFound)));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_graph_not_found_message() {
        let err = Error::GraphNotFound("market".into());
        assert!(err.to_string().contains("'market'"));
        assert_eq!(err.suggestion().as_deref(), Some("n4l graphs list"));
    }

    #[test]
    fn test_invalid_pattern_converts() {
        let err: Error = regex::Regex::new("(").unwrap_err().into();
        assert_eq!(err.code(), "E300");
        assert!(err.suggestion().is_none());
    }
}

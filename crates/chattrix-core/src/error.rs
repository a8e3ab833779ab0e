//! Error types for chattrix

use crate::types::PostId;
use thiserror::Error;

/// Main error type for chattrix
#[derive(Debug, Error)]
pub enum ForumError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Post not found
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ForumError>,
    },
}

impl ForumError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ForumError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// True for a missing post or comment, looking through any context
    pub fn is_not_found(&self) -> bool {
        match self {
            ForumError::PostNotFound(_) | ForumError::CommentNotFound(_) => true,
            ForumError::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// True for a rejected input, looking through any context
    pub fn is_validation(&self) -> bool {
        match self {
            ForumError::Validation(_) => true,
            ForumError::WithContext { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

impl From<toml::de::Error> for ForumError {
    fn from(err: toml::de::Error) -> Self {
        ForumError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for ForumError {
    fn from(err: toml::ser::Error) -> Self {
        ForumError::Toml(err.to_string())
    }
}

/// Result type alias for chattrix
pub type Result<T> = std::result::Result<T, ForumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ForumError::PostNotFound(PostId(42));
        assert_eq!(err.to_string(), "Post not found: 42");
    }

    #[test]
    fn test_error_with_context() {
        let err = ForumError::Validation("blank comment".to_string());
        let err = err.with_context("Failed to add comment");
        assert!(err.to_string().contains("Failed to add comment"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_not_found_through_context() {
        let err = ForumError::CommentNotFound("abc".to_string()).with_context("reply");
        assert!(err.is_not_found());
        assert!(!ForumError::Config("x".to_string()).is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ForumError = io_err.into();
        assert!(matches!(err, ForumError::Io(_)));
        assert!(!err.is_not_found());
    }
}

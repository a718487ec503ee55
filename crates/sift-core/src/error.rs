//! Error types for the sift workspace.

use thiserror::Error;

/// A shared error type for the sift crates.
///
/// This covers the hard failures of the orchestration layer: storage lookups,
/// configuration problems, and missing credentials. Operational failures
/// inside a pipeline stage are deliberately *not* represented here; agents
/// convert those into diagnostic events instead of errors.
#[derive(Error, Debug, Clone)]
pub enum SiftError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Entity already exists where a fresh one was required
    #[error("Entity already exists: {entity_type} '{id}'")]
    Conflict {
        entity_type: &'static str,
        id: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more required credentials are absent from the environment
    #[error("Missing required credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SiftError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Conflict {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a missing-credentials error
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self, Self::MissingCredentials(_))
    }
}

/// A type alias for `Result<T, SiftError>`.
pub type Result<T> = std::result::Result<T, SiftError>;

//! Error types for the tab host

use thiserror::Error;

/// Main error type for tab hosting operations.
///
/// Only resource creation and input conversion fail with an error. Lookups
/// that miss resolve to `None`/`false`, and violated preconditions are
/// debug assertions.
#[derive(Debug, Error)]
pub enum TabHostError {
    /// The surface factory could not produce a surface or placeholder
    #[error("surface creation failed: {0}")]
    SurfaceCreation(String),
    /// A navigation target could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Tab values or configuration could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<url::ParseError> for TabHostError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Convenience Result type for tab host operations
pub type Result<T> = std::result::Result<T, TabHostError>;

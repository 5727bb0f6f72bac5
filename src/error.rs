//! # Error Types
//!
//! This module defines error types used throughout the cardsmith library.

use thiserror::Error;

/// Main error type for cardsmith operations
#[derive(Debug, Error)]
pub enum CardError {
    /// Image fetch or decode failure
    #[error("Image error: {0}")]
    Image(String),

    /// The compositing task did not complete
    #[error("Render error: {0}")]
    Render(String),

    /// A field id that does not exist on the addressed side
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// A precondition for saving or exporting is not met
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backing store could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, CardError>;

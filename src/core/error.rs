//! Error types for core module
//!
//! Provides custom error types for core functionality: settings persistence
//! and loading puzzle catalogs from disk.

use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings or catalog file I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings or catalog serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A catalog parsed but contains a puzzle that can't be played
    #[error("Puzzle catalog rejected: {message}")]
    Catalog { message: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

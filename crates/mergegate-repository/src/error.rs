//! Error types for the configuration store

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing rulesets
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML encoding or decoding error
    #[error("Failed to process YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid base path
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Scope key that cannot be stored
    #[error("Invalid scope: {scope}")]
    InvalidScope { scope: String },

    /// Generic error
    #[error("Store error: {0}")]
    Other(String),
}

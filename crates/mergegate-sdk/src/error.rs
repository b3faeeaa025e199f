//! SDK error types

use mergegate_core::ConfigurationError;
use mergegate_repository::StoreError;
use mergegate_runtime::RuntimeError;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// A submitted ruleset was rejected
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The configuration store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The rule registry could not be built
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl SdkError {
    /// Whether the error was caused by the submitted input rather than the system
    pub fn is_rejection(&self) -> bool {
        matches!(self, SdkError::Configuration(_))
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

//! Runtime error types

use thiserror::Error;

/// Errors raised while assembling a rule registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Two rules share a name
    #[error("Duplicate rule: {0}")]
    DuplicateRule(String),

    /// Two codecs share a type tag
    #[error("Duplicate configuration type: {0}")]
    DuplicateConfigurationType(String),

    /// A rule declares a configuration type nobody registered a codec for
    #[error("Rule '{rule}' declares configuration type '{type_tag}' without a registered codec")]
    MissingCodec { rule: String, type_tag: String },
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

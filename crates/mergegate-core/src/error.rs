//! Error types for mergegate Core

use thiserror::Error;

/// Errors raised while accepting, decoding or encoding a rule configuration
///
/// These surface synchronously to whoever saves a ruleset. Nothing is persisted
/// when one of them is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The submitted configuration does not match the rule's declared type
    #[error("Invalid configuration for rule '{rule}': {message}")]
    Parse { rule: String, message: String },

    /// The configuration parsed but violates a declared constraint
    #[error("Configuration for rule '{rule}' violates a constraint: {violation}")]
    Validation { rule: String, violation: String },

    /// The ruleset references a rule that is not installed
    #[error("Unknown rule: {rule}")]
    UnknownRule { rule: String },

    /// No codec is registered for a configuration type tag
    #[error("Unknown configuration type: {type_tag}")]
    UnknownType { type_tag: String },

    /// A configuration value could not be turned into a payload or back
    #[error("Failed to encode configuration of type '{type_tag}': {message}")]
    Encoding { type_tag: String, message: String },
}

impl ConfigurationError {
    /// Create a parse error for a rule
    pub fn parse(rule: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigurationError::Parse {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Create a validation error for a rule
    pub fn validation(rule: impl Into<String>, violation: impl Into<String>) -> Self {
        ConfigurationError::Validation {
            rule: rule.into(),
            violation: violation.into(),
        }
    }

    /// Attach the owning rule name to an error raised below the rule level
    pub fn for_rule(self, rule: &str) -> Self {
        match self {
            ConfigurationError::Parse { message, .. } => Self::parse(rule, message),
            ConfigurationError::Validation { violation, .. } => Self::validation(rule, violation),
            other => other,
        }
    }
}

/// Error returned by a rule that could not reach a verdict
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// The rule expected a configuration but none was supplied
    #[error("Rule '{rule}' requires a configuration")]
    MissingConfiguration { rule: String },

    /// The configuration handed to the rule has an unexpected type
    #[error("Rule '{rule}' expected configuration of type '{expected}', got '{actual}'")]
    ConfigurationMismatch {
        rule: String,
        expected: String,
        actual: String,
    },

    /// Generic evaluation failure
    #[error("Rule evaluation failed: {0}")]
    Evaluation(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigurationError>;

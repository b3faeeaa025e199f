//! mergegate Core - Core types and definitions for the workflow rule engine
//!
//! This crate provides the fundamental types used across the mergegate crates:
//! - The [`Rule`] strategy trait and the per-evaluation [`Context`]
//! - Rulesets ([`AppliedRule`], [`EngineConfiguration`], [`GlobalEngineConfiguration`])
//! - Evaluation outcomes ([`RuleResult`], [`Results`], [`Obstacle`])
//! - The read-only pull request model handed to rules
//! - Typed rule configuration: descriptors, validation and tagged payloads
//! - Error types

pub mod configuration;
pub mod context;
pub mod error;
pub mod model;
pub mod result;
pub mod rule;
pub mod ruleset;

// Re-export commonly used types
pub use configuration::{
    Constraint, ConfigurationType, ConfigurationValue, FieldDescriptor, FieldType,
    ShapeValidator, TaggedPayload, TypeDescriptor,
};
pub use context::Context;
pub use error::{ConfigurationError, RuleError};
pub use model::{Comment, CommentKind, PullRequest, PullRequestStatus, Repository};
pub use result::{Obstacle, ResultContext, Results, RuleResult};
pub use rule::Rule;
pub use ruleset::{AppliedRule, EngineConfiguration, GlobalEngineConfiguration};

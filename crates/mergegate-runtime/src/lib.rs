//! mergegate Runtime - Rule registry and evaluation engine
//!
//! This crate turns rulesets into verdicts:
//! - [`RuleRegistry`]: installed rules and the codecs of their configuration types
//! - [`precedence`]: choosing between the global and the repository ruleset
//! - [`Engine`]: evaluating a ruleset with a per-rule fault boundary
//! - [`guard`]: turning failed results into merge obstacles
//! - [`rules`]: the built-in rules
//!
//! # Example
//!
//! ```rust,no_run
//! use mergegate_core::{AppliedRule, EngineConfiguration, PullRequest, Repository};
//! use mergegate_runtime::{Engine, RuleRegistry};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::new(Arc::new(RuleRegistry::builtin()?));
//! let ruleset = EngineConfiguration::new(vec![AppliedRule::new("AllTasksDone")], true);
//!
//! let results = engine
//!     .evaluate(
//!         &ruleset,
//!         Arc::new(Repository::new("r1", "hitchhiker", "heart-of-gold")),
//!         Arc::new(PullRequest::new("42", "dent", "feature", "main")),
//!     )
//!     .await;
//!
//! assert!(results.is_valid());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod engine;
pub mod error;
pub mod guard;
pub mod precedence;
pub mod registry;
pub mod rules;

pub use codec::{CodecRegistry, ConfigurationCodec, TypedCodec};
pub use engine::{Engine, EngineOptions, UnresolvedRulePolicy, DEFAULT_RULE_TIMEOUT_MS};
pub use error::{Result, RuntimeError};
pub use guard::obstacles;
pub use precedence::{
    display_effective_configuration, effective_configuration, ConfigurationScope,
    EffectiveConfiguration,
};
pub use registry::{RuleRegistry, RuleRegistryBuilder};

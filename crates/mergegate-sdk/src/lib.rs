//! mergegate SDK - High-level API for gating pull request merges
//!
//! This crate ties the rule registry, the ruleset store and the evaluation
//! engine together behind [`WorkflowEngine`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mergegate_core::{PullRequest, Repository};
//! use mergegate_sdk::{AppliedRuleDto, EngineConfigurationDto, WorkflowEngineBuilder};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = WorkflowEngineBuilder::new().build()?;
//!
//!     engine
//!         .configurations()
//!         .save_repository(
//!             "r1",
//!             EngineConfigurationDto::new(
//!                 vec![AppliedRuleDto::configured(
//!                     "ApprovedByXReviewers",
//!                     json!({"numberOfReviewers": 2}),
//!                 )],
//!                 true,
//!             ),
//!         )
//!         .await?;
//!
//!     let repository = Repository::new("r1", "hitchhiker", "heart-of-gold");
//!     let pull_request = PullRequest::new("42", "dent", "feature", "main")
//!         .with_reviewer("trillian", true);
//!
//!     for obstacle in engine.obstacles(&repository, &pull_request).await {
//!         println!("{}: {}", obstacle.key, obstacle.message);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod dto;
pub mod engine;
pub mod error;
pub mod service;
pub mod settings;
pub mod telemetry;

pub use builder::WorkflowEngineBuilder;
pub use dto::{
    AppliedRuleDto, EffectiveConfigurationDto, EngineConfigurationDto,
    GlobalEngineConfigurationDto, ResultDto, RuleDescriptorDto,
};
pub use engine::{WorkflowEngine, ENGINE_RULE_NAME};
pub use error::{Result, SdkError};
pub use service::ConfigurationService;
pub use settings::{GateSettings, DEFAULT_LOG_FILTER};
pub use telemetry::init_tracing;

// Re-export lower layers
pub use mergegate_core::{Obstacle, PullRequest, Repository, Results, RuleResult};
pub use mergegate_repository::{StoreConfig, StoreFormat, StoreSource};
pub use mergegate_runtime::{ConfigurationScope, EngineOptions, UnresolvedRulePolicy};

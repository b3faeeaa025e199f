//! Ruleset persistence for mergegate
//!
//! This crate stores one ruleset per configuration scope (`global` and
//! `repository:<id>`) behind the [`ConfigurationStore`] trait.
//!
//! # Backends
//!
//! - **Memory**: [`MemoryStore`] for tests and development
//! - **File system**: [`FileSystemStore`], one JSON or YAML document per scope
//!
//! # Quick Start
//!
//! ```no_run
//! use mergegate_repository::{ConfigurationStore, Scope, StoreConfig, StoredRuleset};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = StoreConfig::file_system("rulesets").open()?;
//!
//!     store.set(&Scope::Global, StoredRuleset::new(vec![], true)).await?;
//!     let global = store.get(&Scope::Global).await?;
//!     assert!(global.is_some());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod file_system;
pub mod memory;
pub mod models;
pub mod traits;

pub use config::{StoreConfig, StoreFormat, StoreSource};
pub use error::{StoreError, StoreResult};
pub use file_system::FileSystemStore;
pub use memory::MemoryStore;
pub use models::{Scope, StoredAppliedRule, StoredRuleset};
pub use traits::ConfigurationStore;

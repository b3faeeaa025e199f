//! Store trait
//!
//! A store maps a [`Scope`] to at most one [`StoredRuleset`]. Writes replace the
//! whole ruleset with last-write-wins semantics: there is no versioning, so two
//! concurrent writers to the same scope race and one silently overwrites the
//! other.

use crate::error::StoreResult;
use crate::models::{Scope, StoredRuleset};
use async_trait::async_trait;

/// Persistence of rulesets per scope
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Load the ruleset of a scope, `None` if nothing was ever stored
    async fn get(&self, scope: &Scope) -> StoreResult<Option<StoredRuleset>>;

    /// Replace the ruleset of a scope
    async fn set(&self, scope: &Scope, ruleset: StoredRuleset) -> StoreResult<()>;
}

//! In-memory store
//!
//! Suitable for tests and development; contents are lost on restart.

use crate::error::StoreResult;
use crate::models::{Scope, StoredRuleset};
use crate::traits::ConfigurationStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory ruleset store
#[derive(Debug, Default)]
pub struct MemoryStore {
    rulesets: RwLock<HashMap<Scope, StoredRuleset>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored scopes
    pub async fn len(&self) -> usize {
        self.rulesets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rulesets.read().await.is_empty()
    }
}

#[async_trait]
impl ConfigurationStore for MemoryStore {
    async fn get(&self, scope: &Scope) -> StoreResult<Option<StoredRuleset>> {
        Ok(self.rulesets.read().await.get(scope).cloned())
    }

    async fn set(&self, scope: &Scope, ruleset: StoredRuleset) -> StoreResult<()> {
        debug!("Storing {} rules for scope {}", ruleset.rules.len(), scope);
        self.rulesets.write().await.insert(scope.clone(), ruleset);
        Ok(())
    }
}

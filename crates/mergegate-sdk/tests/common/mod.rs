//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use mergegate_core::{Comment, CommentKind, Context, PullRequest, Repository, Rule, RuleError, RuleResult};
use mergegate_repository::{
    ConfigurationStore, MemoryStore, Scope, StoreError, StoreResult, StoredRuleset,
};
use mergegate_runtime::RuleRegistry;
use mergegate_sdk::{WorkflowEngine, WorkflowEngineBuilder};
use std::sync::Arc;

/// Store whose reads always fail
pub struct UnavailableStore;

#[async_trait]
impl ConfigurationStore for UnavailableStore {
    async fn get(&self, _scope: &Scope) -> StoreResult<Option<StoredRuleset>> {
        Err(StoreError::Other("connection refused".to_string()))
    }

    async fn set(&self, _scope: &Scope, _ruleset: StoredRuleset) -> StoreResult<()> {
        Err(StoreError::Other("connection refused".to_string()))
    }
}

/// Rule that only exists in some registries
pub struct NoSelfMerge;

impl Rule for NoSelfMerge {
    fn name(&self) -> &str {
        "NoSelfMerge"
    }

    fn validate(&self, context: &Context) -> Result<RuleResult, RuleError> {
        let pull_request = context.pull_request();
        if pull_request.is_approved_by(&pull_request.author) {
            Ok(RuleResult::failed(self.name()))
        } else {
            Ok(context.success())
        }
    }
}

/// Engine over the built-in rules and the given store
pub fn engine_with_store(store: Arc<dyn ConfigurationStore>) -> WorkflowEngine {
    WorkflowEngineBuilder::new().with_store(store).build().unwrap()
}

/// Engine over the built-in rules plus [`NoSelfMerge`]
pub fn extended_engine(store: Arc<dyn ConfigurationStore>) -> WorkflowEngine {
    let registry = RuleRegistry::builder()
        .with_builtin_rules()
        .rule(NoSelfMerge)
        .build()
        .unwrap();

    WorkflowEngineBuilder::new()
        .with_registry(registry)
        .with_store(store)
        .build()
        .unwrap()
}

pub fn memory_store() -> Arc<dyn ConfigurationStore> {
    Arc::new(MemoryStore::new())
}

pub fn repository() -> Repository {
    Repository::new("r1", "hitchhiker", "heart-of-gold")
}

pub fn pull_request() -> PullRequest {
    PullRequest::new("42", "dent", "feature/towel", "main")
}

pub fn open_task(id: &str) -> Comment {
    Comment::new(id, "trillian", CommentKind::TaskTodo).with_text("calibrate the drive")
}

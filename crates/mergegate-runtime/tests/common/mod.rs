//! Common test utilities for runtime integration tests

#![allow(dead_code)]

use mergegate_core::{
    Comment, CommentKind, Context, PullRequest, Repository, ResultContext, Rule, RuleError,
    RuleResult,
};
use mergegate_runtime::{Engine, EngineOptions, RuleRegistry};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Always succeeds and counts its invocations
#[derive(Default)]
pub struct Passing {
    pub calls: AtomicUsize,
}

impl Rule for Passing {
    fn name(&self) -> &str {
        "Passing"
    }

    fn validate(&self, context: &Context) -> Result<RuleResult, RuleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(context.success())
    }
}

/// Always fails with a detail
pub struct Failing;

impl Rule for Failing {
    fn name(&self) -> &str {
        "Failing"
    }

    fn validate(&self, context: &Context) -> Result<RuleResult, RuleError> {
        Ok(context.failure(ResultContext::new(json!({ "pr": context.pull_request().id }))))
    }
}

/// Returns an evaluation error
pub struct Erroring;

impl Rule for Erroring {
    fn name(&self) -> &str {
        "Erroring"
    }

    fn validate(&self, _context: &Context) -> Result<RuleResult, RuleError> {
        Err(RuleError::Evaluation("backend unavailable".to_string()))
    }
}

/// Panics
pub struct Panicking;

impl Rule for Panicking {
    fn name(&self) -> &str {
        "Panicking"
    }

    fn validate(&self, _context: &Context) -> Result<RuleResult, RuleError> {
        panic!("rule exploded")
    }
}

/// Sleeps longer than the test timeout
pub struct Slow;

impl Rule for Slow {
    fn name(&self) -> &str {
        "Slow"
    }

    fn validate(&self, context: &Context) -> Result<RuleResult, RuleError> {
        std::thread::sleep(Duration::from_millis(500));
        Ok(context.success())
    }
}

/// Reports a result under a different identity than its own
pub struct Impostor;

impl Rule for Impostor {
    fn name(&self) -> &str {
        "Impostor"
    }

    fn validate(&self, _context: &Context) -> Result<RuleResult, RuleError> {
        Ok(RuleResult::failed("SomebodyElse"))
    }
}

/// Registry with the built-in rules plus the test rules above
pub fn registry(passing: Arc<Passing>) -> Arc<RuleRegistry> {
    Arc::new(
        RuleRegistry::builder()
            .with_builtin_rules()
            .shared_rule(passing)
            .rule(Failing)
            .rule(Erroring)
            .rule(Panicking)
            .rule(Slow)
            .rule(Impostor)
            .build()
            .unwrap(),
    )
}

/// Engine over [`registry`] with a short rule timeout
pub fn engine(options: EngineOptions) -> (Engine, Arc<Passing>) {
    let passing = Arc::new(Passing::default());
    let engine = Engine::with_options(registry(Arc::clone(&passing)), options.with_rule_timeout_ms(50));
    (engine, passing)
}

pub fn repository() -> Arc<Repository> {
    Arc::new(Repository::new("r1", "hitchhiker", "heart-of-gold"))
}

pub fn pull_request() -> PullRequest {
    PullRequest::new("42", "dent", "feature/towel", "main")
}

pub fn task(id: &str, kind: CommentKind) -> Comment {
    Comment::new(id, "trillian", kind).with_text("fix the improbability drive")
}

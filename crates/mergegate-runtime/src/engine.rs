//! Rule evaluation engine
//!
//! Every applied rule of an enabled ruleset is evaluated, even after an earlier
//! failure. Each rule runs on the blocking pool behind a timeout, so a rule that
//! errors, panics or hangs yields a failed result instead of taking the whole
//! evaluation down. A gate that cannot evaluate blocks.

use crate::registry::RuleRegistry;
use futures::future::join_all;
use mergegate_core::{
    AppliedRule, Context, EngineConfiguration, PullRequest, Repository, ResultContext, Results,
    RuleResult,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Default per-rule timeout in milliseconds
pub const DEFAULT_RULE_TIMEOUT_MS: u64 = 5000;

/// What to do with an applied rule that is no longer installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedRulePolicy {
    /// Omit the rule from the results
    #[default]
    Skip,

    /// Report the rule as failed
    Block,
}

/// Engine options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Per-rule timeout in milliseconds; 0 disables the timeout
    #[serde(default = "default_rule_timeout_ms")]
    pub rule_timeout_ms: u64,

    #[serde(default)]
    pub unresolved_rules: UnresolvedRulePolicy,
}

fn default_rule_timeout_ms() -> u64 {
    DEFAULT_RULE_TIMEOUT_MS
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            rule_timeout_ms: DEFAULT_RULE_TIMEOUT_MS,
            unresolved_rules: UnresolvedRulePolicy::Skip,
        }
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-rule timeout
    pub fn with_rule_timeout_ms(mut self, rule_timeout_ms: u64) -> Self {
        self.rule_timeout_ms = rule_timeout_ms;
        self
    }

    /// Set the unresolved rule policy
    pub fn with_unresolved_rules(mut self, policy: UnresolvedRulePolicy) -> Self {
        self.unresolved_rules = policy;
        self
    }

    fn rule_timeout(&self) -> Option<Duration> {
        (self.rule_timeout_ms > 0).then(|| Duration::from_millis(self.rule_timeout_ms))
    }
}

/// Reasons attached to synthetic failures
mod reason {
    pub const UNRESOLVED: &str = "unresolved-rule";
    pub const INVALID_CONFIGURATION: &str = "invalid-configuration";
    pub const RULE_ERROR: &str = "rule-error";
    pub const PANIC: &str = "panic";
    pub const TIMEOUT: &str = "timeout";
    pub const CANCELLED: &str = "cancelled";
}

/// Evaluates rulesets against pull requests
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<RuleRegistry>,
    options: EngineOptions,
}

impl Engine {
    /// Create an engine with default options
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self::with_options(registry, EngineOptions::default())
    }

    /// Create an engine with the given options
    pub fn with_options(registry: Arc<RuleRegistry>, options: EngineOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Evaluate a ruleset
    ///
    /// A disabled ruleset yields empty (valid) results. Results keep the order
    /// of the applied rules. This never fails.
    pub async fn evaluate(
        &self,
        configuration: &EngineConfiguration,
        repository: Arc<Repository>,
        pull_request: Arc<PullRequest>,
    ) -> Results {
        if !configuration.enabled {
            debug!(
                "Engine disabled for repository {}, nothing to evaluate",
                repository.id
            );
            return Results::new();
        }

        let evaluations = configuration.rules.iter().map(|applied| {
            self.evaluate_rule(applied, Arc::clone(&repository), Arc::clone(&pull_request))
        });

        let results: Results = join_all(evaluations).await.into_iter().flatten().collect();

        debug!(
            "Evaluated {} rules for pull request {} in {}: {} failed",
            results.len(),
            pull_request.id,
            repository.full_name(),
            results.failures().count()
        );

        results
    }

    /// Evaluate one applied rule; `None` if the rule is skipped
    async fn evaluate_rule(
        &self,
        applied: &AppliedRule,
        repository: Arc<Repository>,
        pull_request: Arc<PullRequest>,
    ) -> Option<RuleResult> {
        let name = applied.rule.as_str();

        let rule = match self.registry.resolve(name) {
            Some(rule) => rule,
            None => return self.unresolved(name),
        };

        if let Err(e) = self.registry.check_configuration(rule.as_ref(), applied) {
            warn!("Rule '{}' has an unusable configuration: {}", name, e);
            return Some(evaluation_failure(
                name,
                reason::INVALID_CONFIGURATION,
                e.to_string(),
            ));
        }

        let context = Context::new(
            name,
            repository,
            pull_request,
            applied.configuration.clone(),
        );
        let handle = tokio::task::spawn_blocking(move || rule.validate(&context));

        let joined = match self.options.rule_timeout() {
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    error!("Rule '{}' timed out after {:?}", name, limit);
                    return Some(evaluation_failure(
                        name,
                        reason::TIMEOUT,
                        format!("rule did not finish within {} ms", limit.as_millis()),
                    ));
                }
            },
            None => handle.await,
        };

        let result = match joined {
            Ok(Ok(mut result)) => {
                result.rule = name.to_string();
                result
            }
            Ok(Err(e)) => {
                warn!("Rule '{}' could not be evaluated: {}", name, e);
                evaluation_failure(name, reason::RULE_ERROR, e.to_string())
            }
            Err(e) if e.is_panic() => {
                let message = panic_message(e.into_panic());
                error!("Rule '{}' panicked: {}", name, message);
                evaluation_failure(name, reason::PANIC, message)
            }
            Err(e) => {
                error!("Rule '{}' was cancelled: {}", name, e);
                evaluation_failure(name, reason::CANCELLED, e.to_string())
            }
        };

        Some(result)
    }

    fn unresolved(&self, name: &str) -> Option<RuleResult> {
        match self.options.unresolved_rules {
            UnresolvedRulePolicy::Skip => {
                warn!("Skipping unresolved rule '{}'", name);
                None
            }
            UnresolvedRulePolicy::Block => {
                warn!("Blocking on unresolved rule '{}'", name);
                Some(evaluation_failure(
                    name,
                    reason::UNRESOLVED,
                    format!("rule '{}' is not installed", name),
                ))
            }
        }
    }
}

fn evaluation_failure(rule: &str, reason: &str, message: impl Into<String>) -> RuleResult {
    RuleResult::failed_with(rule, ResultContext::evaluation_error(reason, message))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "rule panicked".to_string()
    }
}

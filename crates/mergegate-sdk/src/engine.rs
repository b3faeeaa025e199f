//! The workflow engine facade

use crate::dto::{ResultDto, RuleDescriptorDto};
use crate::service::ConfigurationService;
use mergegate_core::{Obstacle, PullRequest, Repository, ResultContext, Results, RuleResult};
use mergegate_runtime::{guard, Engine, RuleRegistry};
use std::sync::Arc;
use tracing::{error, info};

/// Identity of the synthetic result reported when no ruleset could be loaded
pub const ENGINE_RULE_NAME: &str = "WorkflowEngine";

/// Merge gate for pull requests
///
/// Combines stored rulesets, precedence and evaluation. Build one with
/// [`WorkflowEngineBuilder`](crate::WorkflowEngineBuilder).
#[derive(Debug, Clone)]
pub struct WorkflowEngine {
    engine: Engine,
    configurations: ConfigurationService,
}

impl WorkflowEngine {
    pub(crate) fn new(engine: Engine, configurations: ConfigurationService) -> Self {
        Self {
            engine,
            configurations,
        }
    }

    /// Ruleset administration
    pub fn configurations(&self) -> &ConfigurationService {
        &self.configurations
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        self.engine.registry()
    }

    /// Evaluate the effective ruleset of a repository against a pull request
    ///
    /// Never fails. If the rulesets cannot be read the results hold a single
    /// failure so the merge stays blocked.
    pub async fn validate(&self, repository: &Repository, pull_request: &PullRequest) -> Results {
        let effective = match self
            .configurations
            .effective_configuration(&repository.id)
            .await
        {
            Ok(effective) => effective,
            Err(e) => {
                error!(
                    "Cannot load rulesets for repository {}: {}",
                    repository.full_name(),
                    e
                );
                return Results::from(vec![RuleResult::failed_with(
                    ENGINE_RULE_NAME,
                    ResultContext::evaluation_error("configuration-unavailable", e.to_string()),
                )]);
            }
        };

        let results = self
            .engine
            .evaluate(
                &effective.configuration,
                Arc::new(repository.clone()),
                Arc::new(pull_request.clone()),
            )
            .await;

        info!(
            repository = %repository.full_name(),
            pull_request = %pull_request.id,
            scope = ?effective.scope,
            valid = results.is_valid(),
            "Evaluated merge gate"
        );

        results
    }

    /// Per-rule outcomes in their wire shape
    pub async fn report(&self, repository: &Repository, pull_request: &PullRequest) -> Vec<ResultDto> {
        self.validate(repository, pull_request)
            .await
            .iter()
            .map(ResultDto::from)
            .collect()
    }

    /// Reasons the pull request cannot be merged right now
    pub async fn obstacles(&self, repository: &Repository, pull_request: &PullRequest) -> Vec<Obstacle> {
        guard::obstacles(&self.validate(repository, pull_request).await)
    }

    /// Installed rules with their configuration shapes
    pub fn available_rules(&self) -> Vec<RuleDescriptorDto> {
        let registry = self.engine.registry();
        registry
            .rules()
            .map(|rule| RuleDescriptorDto {
                name: rule.name().to_string(),
                allows_multiple_instances: rule.allows_multiple_instances(),
                configuration: registry.descriptor(rule.name()).cloned(),
            })
            .collect()
    }
}

//! Per-evaluation context handed to a rule

use crate::configuration::{ConfigurationType, ConfigurationValue};
use crate::error::RuleError;
use crate::model::{PullRequest, Repository};
use crate::result::{ResultContext, RuleResult};
use std::sync::Arc;

/// Everything one rule sees during one evaluation
///
/// Built by the engine for a single `Rule::validate` call and dropped right after.
#[derive(Debug, Clone)]
pub struct Context {
    rule: String,
    repository: Arc<Repository>,
    pull_request: Arc<PullRequest>,
    configuration: Option<ConfigurationValue>,
}

impl Context {
    /// Create a new context
    pub fn new(
        rule: impl Into<String>,
        repository: Arc<Repository>,
        pull_request: Arc<PullRequest>,
        configuration: Option<ConfigurationValue>,
    ) -> Self {
        Self {
            rule: rule.into(),
            repository,
            pull_request,
            configuration,
        }
    }

    /// Name of the rule being evaluated
    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn pull_request(&self) -> &PullRequest {
        &self.pull_request
    }

    /// The untyped configuration, if any
    pub fn configuration_value(&self) -> Option<&ConfigurationValue> {
        self.configuration.as_ref()
    }

    /// The rule's configuration as `T`
    pub fn configuration<T: ConfigurationType>(&self) -> Result<&T, RuleError> {
        let value = self
            .configuration
            .as_ref()
            .ok_or_else(|| RuleError::MissingConfiguration {
                rule: self.rule.clone(),
            })?;

        value
            .downcast_ref::<T>()
            .ok_or_else(|| RuleError::ConfigurationMismatch {
                rule: self.rule.clone(),
                expected: T::TYPE_TAG.to_string(),
                actual: value.type_tag().to_string(),
            })
    }

    /// Successful result for the rule being evaluated
    pub fn success(&self) -> RuleResult {
        RuleResult::success(&self.rule)
    }

    /// Failed result for the rule being evaluated
    pub fn failure(&self, context: ResultContext) -> RuleResult {
        RuleResult::failed_with(&self.rule, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::TypeDescriptor;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Limit {
        max: i64,
    }

    impl ConfigurationType for Limit {
        const TYPE_TAG: &'static str = "limit";

        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::new(Self::TYPE_TAG)
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Other;

    impl ConfigurationType for Other {
        const TYPE_TAG: &'static str = "other";

        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::new(Self::TYPE_TAG)
        }
    }

    fn context(configuration: Option<ConfigurationValue>) -> Context {
        Context::new(
            "Limited",
            Arc::new(Repository::new("r1", "ns", "repo")),
            Arc::new(PullRequest::new("1", "dent", "feature", "main")),
            configuration,
        )
    }

    #[test]
    fn test_typed_configuration() {
        let ctx = context(Some(ConfigurationValue::new(Limit { max: 3 })));
        assert_eq!(ctx.configuration::<Limit>().unwrap().max, 3);
    }

    #[test]
    fn test_missing_configuration() {
        let ctx = context(None);
        assert_eq!(
            ctx.configuration::<Limit>().unwrap_err(),
            RuleError::MissingConfiguration {
                rule: "Limited".to_string()
            }
        );
    }

    #[test]
    fn test_mismatched_configuration() {
        let ctx = context(Some(ConfigurationValue::new(Other)));
        assert!(matches!(
            ctx.configuration::<Limit>(),
            Err(RuleError::ConfigurationMismatch { .. })
        ));
    }

    #[test]
    fn test_result_helpers_use_rule_name() {
        let ctx = context(None);
        assert_eq!(ctx.success().rule, "Limited");
        assert!(ctx.failure(ResultContext::new(serde_json::Value::Null)).failed);
        assert_eq!(ctx.repository().id, "r1");
        assert_eq!(ctx.pull_request().author, "dent");
    }
}

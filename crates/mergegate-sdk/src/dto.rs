//! Wire shapes exchanged with callers
//!
//! Configurations travel as plain JSON here; the typed form only exists behind
//! the [`ConfigurationService`](crate::ConfigurationService).

use mergegate_core::{ResultContext, RuleResult, TypeDescriptor};
use mergegate_runtime::ConfigurationScope;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One applied rule as submitted or displayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedRuleDto {
    pub name: String,

    #[serde(default)]
    pub configuration: Option<Value>,
}

impl AppliedRuleDto {
    /// A rule without configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            configuration: None,
        }
    }

    /// A rule with configuration
    pub fn configured(name: impl Into<String>, configuration: Value) -> Self {
        Self {
            name: name.into(),
            configuration: Some(configuration),
        }
    }
}

/// Ruleset of a repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfigurationDto {
    #[serde(default)]
    pub rules: Vec<AppliedRuleDto>,

    #[serde(default)]
    pub enabled: bool,
}

impl EngineConfigurationDto {
    pub fn new(rules: Vec<AppliedRuleDto>, enabled: bool) -> Self {
        Self { rules, enabled }
    }
}

/// Global ruleset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalEngineConfigurationDto {
    #[serde(default)]
    pub rules: Vec<AppliedRuleDto>,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub disable_repository_configuration: bool,
}

impl GlobalEngineConfigurationDto {
    pub fn new(rules: Vec<AppliedRuleDto>, enabled: bool) -> Self {
        Self {
            rules,
            enabled,
            disable_repository_configuration: false,
        }
    }

    /// Set whether repository rulesets are ignored
    pub fn with_disable_repository_configuration(mut self, disable: bool) -> Self {
        self.disable_repository_configuration = disable;
        self
    }
}

/// Effective ruleset of a repository, with the scope that supplied it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfigurationDto {
    pub scope: ConfigurationScope,
    pub configuration: EngineConfigurationDto,
}

/// Outcome of one rule as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDto {
    pub rule_name: String,
    pub failed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ResultContext>,
}

impl From<&RuleResult> for ResultDto {
    fn from(result: &RuleResult) -> Self {
        Self {
            rule_name: result.rule.clone(),
            failed: result.failed,
            context: result.context.clone(),
        }
    }
}

/// An installed rule as offered to administrators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescriptorDto {
    pub name: String,
    pub allows_multiple_instances: bool,

    /// Shape of the rule's configuration, if it takes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<TypeDescriptor>,
}

//! Rulesets: applied rules plus the flags of a configuration scope

use crate::configuration::{ConfigurationType, ConfigurationValue};

/// A rule reference plus its configuration, as stored in a ruleset
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRule {
    /// Name of the referenced rule
    pub rule: String,

    /// Configuration, present iff the rule declares a configuration type
    pub configuration: Option<ConfigurationValue>,
}

impl AppliedRule {
    /// Apply a rule that takes no configuration
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            configuration: None,
        }
    }

    /// Apply a rule with a typed configuration
    pub fn configured<T: ConfigurationType>(rule: impl Into<String>, configuration: T) -> Self {
        Self {
            rule: rule.into(),
            configuration: Some(ConfigurationValue::new(configuration)),
        }
    }

    /// Apply a rule with an already erased configuration
    pub fn with_value(rule: impl Into<String>, configuration: Option<ConfigurationValue>) -> Self {
        Self {
            rule: rule.into(),
            configuration,
        }
    }
}

/// Ordered ruleset of one scope
///
/// Order is evaluation order, not priority: every rule is evaluated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfiguration {
    pub rules: Vec<AppliedRule>,
    pub enabled: bool,
}

impl EngineConfiguration {
    /// Create a configuration
    pub fn new(rules: Vec<AppliedRule>, enabled: bool) -> Self {
        Self { rules, enabled }
    }

    /// Empty, disabled configuration
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Names of the applied rules in order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.rule.as_str()).collect()
    }
}

/// Ruleset of the global scope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalEngineConfiguration {
    pub rules: Vec<AppliedRule>,
    pub enabled: bool,

    /// When set, repository rulesets are ignored
    pub disable_repository_configuration: bool,
}

impl GlobalEngineConfiguration {
    /// Create a global configuration
    pub fn new(rules: Vec<AppliedRule>, enabled: bool, disable_repository_configuration: bool) -> Self {
        Self {
            rules,
            enabled,
            disable_repository_configuration,
        }
    }

    /// The ruleset part of the global configuration
    pub fn engine_configuration(&self) -> EngineConfiguration {
        EngineConfiguration::new(self.rules.clone(), self.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled_and_empty() {
        let config = EngineConfiguration::disabled();
        assert!(!config.enabled);
        assert!(config.rules.is_empty());

        let global = GlobalEngineConfiguration::default();
        assert!(!global.enabled);
        assert!(!global.disable_repository_configuration);
    }

    #[test]
    fn test_rule_names_keep_order() {
        let config = EngineConfiguration::new(
            vec![AppliedRule::new("B"), AppliedRule::new("A")],
            true,
        );
        assert_eq!(config.rule_names(), vec!["B", "A"]);
    }

    #[test]
    fn test_global_engine_configuration() {
        let global = GlobalEngineConfiguration::new(vec![AppliedRule::new("A")], true, true);
        let config = global.engine_configuration();

        assert!(config.enabled);
        assert_eq!(config.rule_names(), vec!["A"]);
    }
}

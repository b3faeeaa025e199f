//! Rule registry
//!
//! The registry is assembled once at startup from every installed rule and the
//! codecs of their configuration types. Which rules exist never changes
//! afterwards; only which rules are applied does.

use crate::codec::{CodecRegistry, ConfigurationCodec};
use crate::error::{Result, RuntimeError};
use crate::rules;
use mergegate_core::{
    AppliedRule, ConfigurationError, ConfigurationType, ConfigurationValue, Rule, TaggedPayload,
    TypeDescriptor,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

/// Installed rules, resolvable by their stable name
pub struct RuleRegistry {
    /// Rules in registration order
    rules: Vec<Arc<dyn Rule>>,

    /// Rule name -> index into `rules`
    by_name: HashMap<String, usize>,

    /// Codecs of all configuration types
    codecs: CodecRegistry,
}

impl RuleRegistry {
    /// Start building a registry
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::new()
    }

    /// Registry with the built-in rules
    pub fn builtin() -> Result<Self> {
        Self::builder().with_builtin_rules().build()
    }

    /// Names of all installed rules in registration order
    pub fn list_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Resolve a rule by name
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Rule>> {
        self.by_name.get(name).map(|&i| Arc::clone(&self.rules[i]))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All installed rules in registration order
    pub fn rules(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    /// Declared configuration shape of a rule
    pub fn descriptor(&self, name: &str) -> Option<&TypeDescriptor> {
        self.codec_of(name).map(|codec| codec.descriptor())
    }

    fn codec_of(&self, name: &str) -> Option<&Arc<dyn ConfigurationCodec>> {
        let rule = &self.rules[*self.by_name.get(name)?];
        rule.configuration_type()
            .and_then(|tag| self.codecs.get(tag))
    }

    fn require(&self, name: &str) -> ConfigResult<&Arc<dyn Rule>> {
        self.by_name
            .get(name)
            .map(|&i| &self.rules[i])
            .ok_or_else(|| ConfigurationError::UnknownRule {
                rule: name.to_string(),
            })
    }

    /// Build an applied rule from its submitted form
    ///
    /// Unknown rule names are rejected. A rule that declares a configuration
    /// type must receive one that parses and validates; a rule that declares
    /// none must receive `null`.
    pub fn applied_rule_from_json(
        &self,
        name: &str,
        configuration: Option<&Value>,
    ) -> ConfigResult<AppliedRule> {
        let rule = self.require(name)?;
        let configuration = configuration.filter(|v| !v.is_null());

        let value = match (rule.configuration_type(), configuration) {
            (Some(tag), Some(raw)) => Some(
                self.codecs
                    .parse(tag, raw)
                    .map_err(|e| e.for_rule(name))?,
            ),
            (Some(_), None) => {
                return Err(ConfigurationError::parse(name, "configuration is required"));
            }
            (None, Some(_)) => {
                return Err(ConfigurationError::parse(
                    name,
                    "rule does not take a configuration",
                ));
            }
            (None, None) => None,
        };

        Ok(AppliedRule::with_value(name, value))
    }

    /// Render an applied rule's configuration in its submitted form
    pub fn configuration_to_json(&self, applied: &AppliedRule) -> ConfigResult<Option<Value>> {
        applied
            .configuration
            .as_ref()
            .map(|value| self.codecs.to_json(value))
            .transpose()
    }

    /// Encode an applied rule's configuration for persistence
    pub fn encode_configuration(&self, applied: &AppliedRule) -> ConfigResult<Option<TaggedPayload>> {
        applied
            .configuration
            .as_ref()
            .map(|value| self.codecs.encode(value))
            .transpose()
    }

    /// Decode a persisted configuration
    pub fn decode_configuration(
        &self,
        payload: Option<&TaggedPayload>,
    ) -> ConfigResult<Option<ConfigurationValue>> {
        payload.map(|p| self.codecs.decode(p)).transpose()
    }

    /// Check that an applied rule carries the configuration its rule declares
    pub fn check_configuration(&self, rule: &dyn Rule, applied: &AppliedRule) -> ConfigResult<()> {
        let actual = applied.configuration.as_ref().map(|c| c.type_tag());
        match (rule.configuration_type(), actual) {
            (Some(expected), Some(actual)) if expected != actual => Err(ConfigurationError::parse(
                rule.name(),
                format!("expected configuration of type '{}', got '{}'", expected, actual),
            )),
            (Some(_), None) => Err(ConfigurationError::parse(
                rule.name(),
                "configuration is required",
            )),
            (None, Some(_)) => Err(ConfigurationError::parse(
                rule.name(),
                "rule does not take a configuration",
            )),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.list_names())
            .field("codecs", &self.codecs)
            .finish()
    }
}

/// Builder for [`RuleRegistry`]
///
/// # Example
///
/// ```rust
/// use mergegate_runtime::RuleRegistry;
///
/// let registry = RuleRegistry::builder()
///     .with_builtin_rules()
///     .build()
///     .unwrap();
///
/// assert!(registry.resolve("AllTasksDone").is_some());
/// ```
#[derive(Default)]
pub struct RuleRegistryBuilder {
    rules: Vec<Arc<dyn Rule>>,
    codecs: CodecRegistry,
    errors: Vec<RuntimeError>,
}

impl RuleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule
    pub fn rule(self, rule: impl Rule + 'static) -> Self {
        self.shared_rule(Arc::new(rule))
    }

    /// Register a shared rule instance
    pub fn shared_rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Register the codec of a configuration type
    pub fn configuration<T: ConfigurationType>(mut self) -> Self {
        if let Err(e) = self.codecs.register::<T>() {
            self.errors.push(e);
        }
        self
    }

    /// Register all built-in rules and their configuration types
    pub fn with_builtin_rules(self) -> Self {
        rules::register_builtin(self)
    }

    /// Build the registry, checking names are unique and every declared
    /// configuration type has a codec
    pub fn build(self) -> Result<RuleRegistry> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        let mut by_name = HashMap::new();
        for (index, rule) in self.rules.iter().enumerate() {
            if by_name.insert(rule.name().to_string(), index).is_some() {
                return Err(RuntimeError::DuplicateRule(rule.name().to_string()));
            }
            if let Some(tag) = rule.configuration_type() {
                if !self.codecs.contains(tag) {
                    return Err(RuntimeError::MissingCodec {
                        rule: rule.name().to_string(),
                        type_tag: tag.to_string(),
                    });
                }
            }
        }

        debug!(
            "Built rule registry with {} rules and {} configuration types",
            self.rules.len(),
            self.codecs.type_tags().len()
        );

        Ok(RuleRegistry {
            rules: self.rules,
            by_name,
            codecs: self.codecs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{ApprovedByXReviewers, ApprovedByXReviewersConfiguration};
    use mergegate_core::{Context, RuleError, RuleResult};
    use serde_json::json;

    struct Plain;

    impl Rule for Plain {
        fn name(&self) -> &str {
            "Plain"
        }

        fn validate(&self, context: &Context) -> std::result::Result<RuleResult, RuleError> {
            Ok(context.success())
        }
    }

    #[test]
    fn test_builtin_registry() {
        let registry = RuleRegistry::builtin().unwrap();

        assert_eq!(
            registry.list_names(),
            vec![
                "AllTasksDone",
                "ApprovedByAllReviewers",
                "ApprovedByXReviewers",
                "ApprovedByReviewer"
            ]
        );
        assert!(registry.resolve("ApprovedByXReviewers").is_some());
        assert!(registry.resolve("Nonexistent").is_none());
        assert!(registry.descriptor("ApprovedByXReviewers").is_some());
        assert!(registry.descriptor("AllTasksDone").is_none());
    }

    #[test]
    fn test_duplicate_rule() {
        let result = RuleRegistry::builder().rule(Plain).rule(Plain).build();
        assert_eq!(
            result.unwrap_err(),
            RuntimeError::DuplicateRule("Plain".to_string())
        );
    }

    #[test]
    fn test_missing_codec() {
        let result = RuleRegistry::builder().rule(ApprovedByXReviewers).build();
        assert!(matches!(
            result.unwrap_err(),
            RuntimeError::MissingCodec { .. }
        ));
    }

    #[test]
    fn test_duplicate_codec() {
        let result = RuleRegistry::builder()
            .configuration::<ApprovedByXReviewersConfiguration>()
            .configuration::<ApprovedByXReviewersConfiguration>()
            .build();
        assert!(matches!(
            result.unwrap_err(),
            RuntimeError::DuplicateConfigurationType(_)
        ));
    }

    #[test]
    fn test_applied_rule_from_json() {
        let registry = RuleRegistry::builtin().unwrap();

        let applied = registry
            .applied_rule_from_json("ApprovedByXReviewers", Some(&json!({"numberOfReviewers": 2})))
            .unwrap();
        assert_eq!(
            applied,
            AppliedRule::configured(
                "ApprovedByXReviewers",
                ApprovedByXReviewersConfiguration::new(2)
            )
        );

        let plain = registry
            .applied_rule_from_json("AllTasksDone", Some(&Value::Null))
            .unwrap();
        assert_eq!(plain, AppliedRule::new("AllTasksDone"));
    }

    #[test]
    fn test_applied_rule_from_json_errors() {
        let registry = RuleRegistry::builtin().unwrap();

        assert_eq!(
            registry.applied_rule_from_json("Nonexistent", None).unwrap_err(),
            ConfigurationError::UnknownRule {
                rule: "Nonexistent".to_string()
            }
        );
        assert!(matches!(
            registry.applied_rule_from_json("ApprovedByXReviewers", None),
            Err(ConfigurationError::Parse { .. })
        ));
        assert!(matches!(
            registry.applied_rule_from_json("AllTasksDone", Some(&json!({"x": 1}))),
            Err(ConfigurationError::Parse { .. })
        ));

        let err = registry
            .applied_rule_from_json("ApprovedByXReviewers", Some(&json!({"numberOfReviewers": 0})))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::Validation {
                rule: "ApprovedByXReviewers".to_string(),
                violation: "numberOfReviewers must be >= 1".to_string(),
            }
        );
    }

    #[test]
    fn test_encode_and_decode_configuration() {
        let registry = RuleRegistry::builtin().unwrap();
        let applied =
            AppliedRule::configured("ApprovedByXReviewers", ApprovedByXReviewersConfiguration::new(3));

        let payload = registry.encode_configuration(&applied).unwrap();
        let decoded = registry.decode_configuration(payload.as_ref()).unwrap();
        assert_eq!(decoded, applied.configuration);

        let none = registry
            .encode_configuration(&AppliedRule::new("AllTasksDone"))
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_check_configuration() {
        let registry = RuleRegistry::builtin().unwrap();
        let rule = registry.resolve("ApprovedByXReviewers").unwrap();

        assert!(registry
            .check_configuration(
                rule.as_ref(),
                &AppliedRule::configured(
                    "ApprovedByXReviewers",
                    ApprovedByXReviewersConfiguration::new(1)
                )
            )
            .is_ok());
        assert!(registry
            .check_configuration(rule.as_ref(), &AppliedRule::new("ApprovedByXReviewers"))
            .is_err());
    }
}

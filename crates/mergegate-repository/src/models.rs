//! Persisted shapes

use crate::error::StoreError;
use mergegate_core::TaggedPayload;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const REPOSITORY_PREFIX: &str = "repository:";

/// Key of a stored ruleset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The single global ruleset
    Global,

    /// Ruleset of one repository, by repository ID
    Repository(String),
}

impl Scope {
    pub fn repository(id: impl Into<String>) -> Self {
        Scope::Repository(id.into())
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Repository(id) => write!(f, "{}{}", REPOSITORY_PREFIX, id),
        }
    }
}

impl FromStr for Scope {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "global" {
            return Ok(Scope::Global);
        }

        match s.strip_prefix(REPOSITORY_PREFIX) {
            Some(id) if !id.is_empty() => Ok(Scope::Repository(id.to_string())),
            _ => Err(StoreError::InvalidScope {
                scope: s.to_string(),
            }),
        }
    }
}

/// One applied rule as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAppliedRule {
    /// Rule name
    pub name: String,

    /// Tagged configuration payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<TaggedPayload>,
}

impl StoredAppliedRule {
    pub fn new(name: impl Into<String>, configuration: Option<TaggedPayload>) -> Self {
        Self {
            name: name.into(),
            configuration,
        }
    }
}

/// A persisted ruleset
///
/// `disable_repository_configuration` is only meaningful in the global scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRuleset {
    #[serde(default)]
    pub rules: Vec<StoredAppliedRule>,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub disable_repository_configuration: bool,
}

impl StoredRuleset {
    pub fn new(rules: Vec<StoredAppliedRule>, enabled: bool) -> Self {
        Self {
            rules,
            enabled,
            disable_repository_configuration: false,
        }
    }

    /// Set the global-only flag
    pub fn with_disable_repository_configuration(mut self, disable: bool) -> Self {
        self.disable_repository_configuration = disable;
        self
    }

    /// Stored rule names in order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_display_and_parse() {
        assert_eq!(Scope::Global.to_string(), "global");
        assert_eq!(Scope::repository("r1").to_string(), "repository:r1");

        assert_eq!("global".parse::<Scope>().unwrap(), Scope::Global);
        assert_eq!(
            "repository:r1".parse::<Scope>().unwrap(),
            Scope::repository("r1")
        );
        assert!("repository:".parse::<Scope>().is_err());
        assert!("team:r1".parse::<Scope>().is_err());
    }

    #[test]
    fn test_stored_ruleset_defaults() {
        let ruleset: StoredRuleset = serde_json::from_str("{}").unwrap();
        assert_eq!(ruleset, StoredRuleset::default());
        assert!(!ruleset.enabled);
    }

    #[test]
    fn test_stored_ruleset_wire_shape() {
        let ruleset = StoredRuleset::new(
            vec![
                StoredAppliedRule::new("AllTasksDone", None),
                StoredAppliedRule::new(
                    "ApprovedByXReviewers",
                    Some(TaggedPayload::new(
                        "approved-by-x-reviewers",
                        br#"{"numberOfReviewers":2}"#.to_vec(),
                    )),
                ),
            ],
            true,
        )
        .with_disable_repository_configuration(true);

        let json = serde_json::to_value(&ruleset).unwrap();
        assert_eq!(json["enabled"], true);
        assert_eq!(json["disableRepositoryConfiguration"], true);
        assert_eq!(json["rules"][0], serde_json::json!({"name": "AllTasksDone"}));
        assert_eq!(
            json["rules"][1]["configuration"]["typeTag"],
            "approved-by-x-reviewers"
        );
        assert_eq!(ruleset.rule_names(), vec!["AllTasksDone", "ApprovedByXReviewers"]);
    }
}

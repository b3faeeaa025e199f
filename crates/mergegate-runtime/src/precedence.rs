//! Choosing between the global and the repository ruleset

use mergegate_core::{EngineConfiguration, GlobalEngineConfiguration};
use serde::{Deserialize, Serialize};

/// Scope whose ruleset is in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationScope {
    Global,
    Repository,
    None,
}

/// The ruleset in effect for a repository, and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfiguration {
    pub scope: ConfigurationScope,
    pub configuration: EngineConfiguration,
}

/// Resolve the ruleset to evaluate
///
/// An enabled repository ruleset wins unless the global scope forbids
/// repository rulesets. Otherwise the global ruleset applies if enabled.
/// If neither applies the result is disabled, so nothing is evaluated.
pub fn effective_configuration(
    global: &GlobalEngineConfiguration,
    repository: &EngineConfiguration,
) -> EngineConfiguration {
    display_effective_configuration(global, repository).configuration
}

/// Same resolution as [`effective_configuration`], also reporting which scope won
pub fn display_effective_configuration(
    global: &GlobalEngineConfiguration,
    repository: &EngineConfiguration,
) -> EffectiveConfiguration {
    if repository.enabled && !global.disable_repository_configuration {
        EffectiveConfiguration {
            scope: ConfigurationScope::Repository,
            configuration: repository.clone(),
        }
    } else if global.enabled {
        EffectiveConfiguration {
            scope: ConfigurationScope::Global,
            configuration: global.engine_configuration(),
        }
    } else {
        EffectiveConfiguration {
            scope: ConfigurationScope::None,
            configuration: EngineConfiguration::disabled(),
        }
    }
}

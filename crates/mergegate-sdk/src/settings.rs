//! Gate settings
//!
//! Loaded from an optional `config/mergegate.{yaml,json,toml}` file overlaid with
//! `MERGEGATE_*` environment variables (`.env` is honoured). Nested keys use a
//! double underscore, e.g. `MERGEGATE_STORE__SOURCE=filesystem`.

use mergegate_repository::StoreConfig;
use mergegate_runtime::{EngineOptions, UnresolvedRulePolicy, DEFAULT_RULE_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "mergegate_sdk=info,mergegate_runtime=info,mergegate_repository=info";

/// Settings of a merge gate deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSettings {
    /// Per-rule timeout in milliseconds; 0 disables it
    #[serde(default = "default_rule_timeout_ms")]
    pub rule_timeout_ms: u64,

    /// Handling of applied rules that are no longer installed
    #[serde(default)]
    pub unresolved_rules: UnresolvedRulePolicy,

    /// Ruleset store
    #[serde(default)]
    pub store: StoreConfig,

    /// Tracing filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_rule_timeout_ms() -> u64 {
    DEFAULT_RULE_TIMEOUT_MS
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            rule_timeout_ms: DEFAULT_RULE_TIMEOUT_MS,
            unresolved_rules: UnresolvedRulePolicy::default(),
            store: StoreConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl GateSettings {
    /// Load settings from `config/mergegate` and the environment
    ///
    /// A missing file means defaults; a file that exists but cannot be read is
    /// an error.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with_base("config/mergegate")
    }

    /// Load settings from an optional file (extension inferred) and the environment
    pub fn load_with_base(base: &str) -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(environment())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize settings: {}", e))
    }

    /// Load settings from an explicit file overlaid with the environment
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize settings: {}", e))
    }

    /// Engine options described by these settings
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions::new()
            .with_rule_timeout_ms(self.rule_timeout_ms)
            .with_unresolved_rules(self.unresolved_rules)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("MERGEGATE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

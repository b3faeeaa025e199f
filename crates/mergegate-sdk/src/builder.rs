//! Builder pattern for WorkflowEngine

use crate::engine::WorkflowEngine;
use crate::error::Result;
use crate::service::ConfigurationService;
use crate::settings::GateSettings;
use mergegate_repository::{ConfigurationStore, StoreConfig};
use mergegate_runtime::{Engine, EngineOptions, RuleRegistry, UnresolvedRulePolicy};
use std::sync::Arc;
use tracing::debug;

/// Builder for WorkflowEngine
///
/// # Example
///
/// ```rust
/// use mergegate_repository::StoreConfig;
/// use mergegate_sdk::WorkflowEngineBuilder;
///
/// let engine = WorkflowEngineBuilder::new()
///     .with_store_config(StoreConfig::memory())
///     .with_rule_timeout_ms(2000)
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.available_rules().len(), 4);
/// ```
#[derive(Default)]
pub struct WorkflowEngineBuilder {
    registry: Option<Arc<RuleRegistry>>,
    store: Option<Arc<dyn ConfigurationStore>>,
    store_config: StoreConfig,
    options: EngineOptions,
}

impl WorkflowEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder configured from loaded settings
    pub fn from_settings(settings: &GateSettings) -> Self {
        Self::new()
            .with_store_config(settings.store.clone())
            .with_options(settings.engine_options())
    }

    /// Use a custom rule registry instead of the built-in rules
    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Use an already opened store; takes precedence over the store configuration
    pub fn with_store(mut self, store: Arc<dyn ConfigurationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the store configuration
    pub fn with_store_config(mut self, config: StoreConfig) -> Self {
        self.store_config = config;
        self
    }

    /// Set all engine options
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the per-rule timeout
    pub fn with_rule_timeout_ms(mut self, rule_timeout_ms: u64) -> Self {
        self.options = self.options.with_rule_timeout_ms(rule_timeout_ms);
        self
    }

    /// Set the unresolved rule policy
    pub fn with_unresolved_rules(mut self, policy: UnresolvedRulePolicy) -> Self {
        self.options = self.options.with_unresolved_rules(policy);
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<WorkflowEngine> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => Arc::new(RuleRegistry::builtin()?),
        };

        let store = match self.store {
            Some(store) => store,
            None => self.store_config.open()?,
        };

        debug!(
            "Building workflow engine with rules {:?} and options {:?}",
            registry.list_names(),
            self.options
        );

        let configurations = ConfigurationService::new(Arc::clone(&registry), store);
        let engine = Engine::with_options(registry, self.options);

        Ok(WorkflowEngine::new(engine, configurations))
    }
}

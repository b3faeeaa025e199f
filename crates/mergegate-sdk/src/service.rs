//! Reading and saving rulesets
//!
//! Saving is strict: every submitted rule must be installed, configured with a
//! valid value of its declared type, and applied at most once unless it allows
//! multiple instances. A rule name that was already stored but has since been
//! uninstalled is dropped with a warning instead of rejecting the save, so an
//! administrator can still edit a ruleset after a rule disappeared. Nothing is
//! written unless the whole ruleset is accepted.
//!
//! Reading is tolerant: a stored configuration that can no longer be decoded is
//! handed to the engine as missing, which fails that rule closed.

use crate::dto::{
    AppliedRuleDto, EffectiveConfigurationDto, EngineConfigurationDto,
    GlobalEngineConfigurationDto,
};
use crate::error::Result;
use mergegate_core::{
    AppliedRule, ConfigurationError, EngineConfiguration, GlobalEngineConfiguration,
};
use mergegate_repository::{ConfigurationStore, Scope, StoredAppliedRule, StoredRuleset};
use mergegate_runtime::{display_effective_configuration, EffectiveConfiguration, RuleRegistry};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ruleset persistence with validation against the installed rules
#[derive(Clone)]
pub struct ConfigurationService {
    registry: Arc<RuleRegistry>,
    store: Arc<dyn ConfigurationStore>,
}

impl ConfigurationService {
    pub fn new(registry: Arc<RuleRegistry>, store: Arc<dyn ConfigurationStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    // ========== Typed access ==========

    /// The global ruleset; disabled and empty if none was saved
    pub async fn global_configuration(&self) -> Result<GlobalEngineConfiguration> {
        Ok(match self.store.get(&Scope::Global).await? {
            Some(stored) => GlobalEngineConfiguration::new(
                self.decode_rules(&Scope::Global, &stored),
                stored.enabled,
                stored.disable_repository_configuration,
            ),
            None => GlobalEngineConfiguration::default(),
        })
    }

    /// The ruleset of a repository; disabled and empty if none was saved
    pub async fn repository_configuration(&self, repository_id: &str) -> Result<EngineConfiguration> {
        let scope = Scope::repository(repository_id);
        Ok(match self.store.get(&scope).await? {
            Some(stored) => EngineConfiguration::new(self.decode_rules(&scope, &stored), stored.enabled),
            None => EngineConfiguration::disabled(),
        })
    }

    /// The ruleset in effect for a repository and the scope it came from
    ///
    /// Re-read from the store on every call.
    pub async fn effective_configuration(&self, repository_id: &str) -> Result<EffectiveConfiguration> {
        let global = self.global_configuration().await?;
        let repository = self.repository_configuration(repository_id).await?;
        Ok(display_effective_configuration(&global, &repository))
    }

    /// Save the global ruleset
    pub async fn save_global_configuration(&self, configuration: GlobalEngineConfiguration) -> Result<()> {
        let scope = Scope::Global;
        let previous = self.stored_names(&scope).await?;
        let rules = self.retain_known(&scope, &previous, configuration.rules)?;

        let stored = StoredRuleset::new(self.encode_rules(&rules)?, configuration.enabled)
            .with_disable_repository_configuration(configuration.disable_repository_configuration);
        self.write(&scope, stored).await
    }

    /// Save the ruleset of a repository
    pub async fn save_repository_configuration(
        &self,
        repository_id: &str,
        configuration: EngineConfiguration,
    ) -> Result<()> {
        let scope = Scope::repository(repository_id);
        let previous = self.stored_names(&scope).await?;
        let rules = self.retain_known(&scope, &previous, configuration.rules)?;

        let stored = StoredRuleset::new(self.encode_rules(&rules)?, configuration.enabled);
        self.write(&scope, stored).await
    }

    // ========== Wire access ==========

    /// The global ruleset in its wire shape
    pub async fn global(&self) -> Result<GlobalEngineConfigurationDto> {
        let global = self.global_configuration().await?;
        Ok(GlobalEngineConfigurationDto {
            rules: self.rules_to_dto(&global.rules)?,
            enabled: global.enabled,
            disable_repository_configuration: global.disable_repository_configuration,
        })
    }

    /// A repository ruleset in its wire shape
    pub async fn repository(&self, repository_id: &str) -> Result<EngineConfigurationDto> {
        let configuration = self.repository_configuration(repository_id).await?;
        self.configuration_to_dto(&configuration)
    }

    /// The effective ruleset of a repository in its wire shape
    pub async fn effective(&self, repository_id: &str) -> Result<EffectiveConfigurationDto> {
        let effective = self.effective_configuration(repository_id).await?;
        Ok(EffectiveConfigurationDto {
            scope: effective.scope,
            configuration: self.configuration_to_dto(&effective.configuration)?,
        })
    }

    /// Save a submitted global ruleset
    pub async fn save_global(&self, dto: GlobalEngineConfigurationDto) -> Result<()> {
        let previous = self.stored_names(&Scope::Global).await?;
        let rules = self.parse_rules(&Scope::Global, &previous, &dto.rules)?;

        self.save_global_configuration(GlobalEngineConfiguration::new(
            rules,
            dto.enabled,
            dto.disable_repository_configuration,
        ))
        .await
    }

    /// Save a submitted repository ruleset
    pub async fn save_repository(&self, repository_id: &str, dto: EngineConfigurationDto) -> Result<()> {
        let scope = Scope::repository(repository_id);
        let previous = self.stored_names(&scope).await?;
        let rules = self.parse_rules(&scope, &previous, &dto.rules)?;

        self.save_repository_configuration(repository_id, EngineConfiguration::new(rules, dto.enabled))
            .await
    }

    // ========== Internals ==========

    async fn stored_names(&self, scope: &Scope) -> Result<HashSet<String>> {
        Ok(self
            .store
            .get(scope)
            .await?
            .map(|stored| stored.rules.into_iter().map(|r| r.name).collect())
            .unwrap_or_default())
    }

    async fn write(&self, scope: &Scope, stored: StoredRuleset) -> Result<()> {
        let count = stored.rules.len();
        self.store.set(scope, stored).await?;
        info!("Saved {} rules for scope {}", count, scope);
        Ok(())
    }

    /// Whether a submitted rule name is kept; unknown names are only tolerated
    /// if they were already stored
    fn is_kept(&self, scope: &Scope, previous: &HashSet<String>, name: &str) -> Result<bool> {
        if self.registry.contains(name) {
            return Ok(true);
        }

        if previous.contains(name) {
            warn!(
                "Dropping uninstalled rule '{}' from the ruleset of scope {}",
                name, scope
            );
            return Ok(false);
        }

        Err(ConfigurationError::UnknownRule {
            rule: name.to_string(),
        }
        .into())
    }

    fn retain_known(
        &self,
        scope: &Scope,
        previous: &HashSet<String>,
        rules: Vec<AppliedRule>,
    ) -> Result<Vec<AppliedRule>> {
        let mut kept = Vec::with_capacity(rules.len());
        for rule in rules {
            if self.is_kept(scope, previous, &rule.rule)? {
                kept.push(rule);
            }
        }
        Ok(kept)
    }

    fn parse_rules(
        &self,
        scope: &Scope,
        previous: &HashSet<String>,
        rules: &[AppliedRuleDto],
    ) -> Result<Vec<AppliedRule>> {
        let mut parsed = Vec::with_capacity(rules.len());
        for dto in rules {
            if self.is_kept(scope, previous, &dto.name)? {
                parsed.push(
                    self.registry
                        .applied_rule_from_json(&dto.name, dto.configuration.as_ref())?,
                );
            }
        }
        Ok(parsed)
    }

    /// Validate installed rules and encode their configurations
    fn encode_rules(&self, rules: &[AppliedRule]) -> Result<Vec<StoredAppliedRule>> {
        let mut seen = HashSet::new();
        let mut stored = Vec::with_capacity(rules.len());

        for applied in rules {
            let rule = self.registry.resolve(&applied.rule).ok_or_else(|| {
                ConfigurationError::UnknownRule {
                    rule: applied.rule.clone(),
                }
            })?;

            if !seen.insert(applied.rule.as_str()) && !rule.allows_multiple_instances() {
                return Err(ConfigurationError::validation(
                    &applied.rule,
                    "rule may only be applied once",
                )
                .into());
            }

            self.registry.check_configuration(rule.as_ref(), applied)?;

            stored.push(StoredAppliedRule::new(
                applied.rule.clone(),
                self.registry.encode_configuration(applied)?,
            ));
        }

        Ok(stored)
    }

    fn decode_rules(&self, scope: &Scope, stored: &StoredRuleset) -> Vec<AppliedRule> {
        let rules: Vec<_> = stored
            .rules
            .iter()
            .map(|rule| {
                match self.registry.decode_configuration(rule.configuration.as_ref()) {
                    Ok(configuration) => AppliedRule::with_value(rule.name.clone(), configuration),
                    Err(e) => {
                        warn!(
                            "Cannot decode configuration of rule '{}' in scope {}: {}",
                            rule.name, scope, e
                        );
                        AppliedRule::new(rule.name.clone())
                    }
                }
            })
            .collect();

        debug!("Loaded {} rules for scope {}", rules.len(), scope);
        rules
    }

    fn rules_to_dto(&self, rules: &[AppliedRule]) -> Result<Vec<AppliedRuleDto>> {
        rules
            .iter()
            .map(|applied| {
                Ok(AppliedRuleDto {
                    name: applied.rule.clone(),
                    configuration: self.registry.configuration_to_json(applied)?,
                })
            })
            .collect()
    }

    fn configuration_to_dto(&self, configuration: &EngineConfiguration) -> Result<EngineConfigurationDto> {
        Ok(EngineConfigurationDto::new(
            self.rules_to_dto(&configuration.rules)?,
            configuration.enabled,
        ))
    }
}

impl std::fmt::Debug for ConfigurationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationService")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

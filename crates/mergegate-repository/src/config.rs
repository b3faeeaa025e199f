//! Store configuration
//!
//! Selects and opens a [`ConfigurationStore`] backend.

use crate::error::{StoreError, StoreResult};
use crate::file_system::FileSystemStore;
use crate::memory::MemoryStore;
use crate::models::StoredRuleset;
use crate::traits::ConfigurationStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreSource {
    /// Keep rulesets in memory
    #[default]
    Memory,

    /// One file per scope under a base directory
    #[serde(alias = "file_system")]
    FileSystem,
}

/// Document format of the file system store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    #[default]
    Json,
    Yaml,
}

impl StoreFormat {
    /// File extension
    pub fn extension(&self) -> &'static str {
        match self {
            StoreFormat::Json => "json",
            StoreFormat::Yaml => "yaml",
        }
    }

    pub(crate) fn encode(&self, ruleset: &StoredRuleset) -> StoreResult<String> {
        Ok(match self {
            StoreFormat::Json => serde_json::to_string_pretty(ruleset)?,
            StoreFormat::Yaml => serde_yaml::to_string(ruleset)?,
        })
    }

    pub(crate) fn decode(&self, content: &str) -> StoreResult<StoredRuleset> {
        Ok(match self {
            StoreFormat::Json => serde_json::from_str(content)?,
            StoreFormat::Yaml => serde_yaml::from_str(content)?,
        })
    }
}

/// Store configuration
///
/// # Examples
///
/// ```rust
/// use mergegate_repository::{StoreConfig, StoreFormat};
///
/// // In-memory store
/// let config = StoreConfig::memory();
///
/// // YAML files under a directory
/// let config = StoreConfig::file_system("rulesets").with_format(StoreFormat::Yaml);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend
    #[serde(default)]
    pub source: StoreSource,

    /// Base directory (required for the file system backend)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<PathBuf>,

    /// Document format of the file system backend
    #[serde(default)]
    pub format: StoreFormat,
}

impl StoreConfig {
    /// In-memory store configuration
    pub fn memory() -> Self {
        Self::default()
    }

    /// File system store configuration
    pub fn file_system(path: impl Into<PathBuf>) -> Self {
        Self {
            source: StoreSource::FileSystem,
            base_path: Some(path.into()),
            format: StoreFormat::default(),
        }
    }

    /// Set the document format
    pub fn with_format(mut self, format: StoreFormat) -> Self {
        self.format = format;
        self
    }

    /// Open the configured store
    pub fn open(&self) -> StoreResult<Arc<dyn ConfigurationStore>> {
        match self.source {
            StoreSource::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreSource::FileSystem => {
                let path = self.base_path.as_ref().ok_or_else(|| {
                    StoreError::Other("file system store requires a base_path".to_string())
                })?;
                Ok(Arc::new(FileSystemStore::new(path, self.format)?))
            }
        }
    }
}

//! File system store
//!
//! Layout under the base directory:
//!
//! ```text
//! global.<ext>
//! repositories/<repository id>.<ext>
//! ```
//!
//! Every write goes to its own temporary file in the target directory and is
//! renamed into place, so a reader never sees a half-written ruleset and
//! concurrent writers to one scope resolve to the last rename.

use crate::config::StoreFormat;
use crate::error::{StoreError, StoreResult};
use crate::models::{Scope, StoredRuleset};
use crate::traits::ConfigurationStore;
use async_trait::async_trait;
use path_absolutize::Absolutize;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::debug;

const REPOSITORIES_DIR: &str = "repositories";

/// File system based ruleset store
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    /// Absolute base directory
    root_path: PathBuf,
    format: StoreFormat,
}

impl FileSystemStore {
    /// Create a store rooted at `root_path`
    ///
    /// The directory is created on first write.
    ///
    /// # Example
    /// ```no_run
    /// use mergegate_repository::{FileSystemStore, StoreFormat};
    ///
    /// let store = FileSystemStore::new("config/rulesets", StoreFormat::Yaml).unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(root_path: P, format: StoreFormat) -> StoreResult<Self> {
        let path = root_path.as_ref();

        if path.as_os_str().is_empty() || path.is_file() {
            return Err(StoreError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        let root_path = path
            .absolutize()
            .map_err(|e| StoreError::Other(format!("Failed to absolutize path: {}", e)))?
            .to_path_buf();

        Ok(Self { root_path, format })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    /// File holding the ruleset of a scope
    pub fn path_for(&self, scope: &Scope) -> StoreResult<PathBuf> {
        let extension = self.format.extension();

        match scope {
            Scope::Global => Ok(self.root_path.join(format!("global.{}", extension))),
            Scope::Repository(id) if is_safe_file_stem(id) => Ok(self
                .root_path
                .join(REPOSITORIES_DIR)
                .join(format!("{}.{}", id, extension))),
            Scope::Repository(_) => Err(StoreError::InvalidScope {
                scope: scope.to_string(),
            }),
        }
    }
}

/// Repository IDs become file names and must not escape the store directory
fn is_safe_file_stem(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control())
}

/// Write `content` to a fresh temporary file in `dir` and rename it over `target`
fn write_replacing(dir: &Path, target: &Path, content: &[u8]) -> StoreResult<()> {
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content)?;
    file.as_file().sync_all()?;
    file.persist(target).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

#[async_trait]
impl ConfigurationStore for FileSystemStore {
    async fn get(&self, scope: &Scope) -> StoreResult<Option<StoredRuleset>> {
        let path = self.path_for(scope)?;

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No ruleset stored for scope {}", scope);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        debug!("Loaded ruleset for scope {} from {}", scope, path.display());
        self.format.decode(&content).map(Some)
    }

    async fn set(&self, scope: &Scope, ruleset: StoredRuleset) -> StoreResult<()> {
        let path = self.path_for(scope)?;
        let content = self.format.encode(&ruleset)?;

        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| StoreError::InvalidPath { path: path.clone() })?;
        fs::create_dir_all(&parent).await?;

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_replacing(&parent, &target, content.as_bytes()))
            .await
            .map_err(|e| StoreError::Other(format!("Write task failed: {}", e)))??;

        debug!(
            "Stored {} rules for scope {} at {}",
            ruleset.rules.len(),
            scope,
            path.display()
        );
        Ok(())
    }
}

//! File-based configuration provider (YAML)
//!
//! User level: `<config dir>/mcp-codex/config.yaml` (e.g. `~/.config/mcp-codex/config.yaml`).
//! Workspace level: `.config/mcp-codex/config.yaml` under the workspace root.
//! A workspace file may only set `project_doc` and `max_output_bytes`.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::ConfigFile;
use super::traits::{ConfigProvider, ConfigResult};

/// Config level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    User,
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// YAML configuration layer
///
/// The file is parsed once and cached; `reload()` re-reads it. A missing
/// file is an empty layer, not an error.
///
/// # Example
///
/// ```no_run
/// use mcp_codex_core::config::FileConfigProvider;
///
/// let user = FileConfigProvider::user();
/// let workspace = FileConfigProvider::workspace("/path/to/project");
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    level: ConfigLevel,
    cache: RwLock<Option<ConfigFile>>,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// User-level config provider
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("mcp-codex").join("config.yaml"), ConfigLevel::User)
    }

    /// Workspace-level config provider
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root
            .as_ref()
            .join(".config")
            .join("mcp-codex")
            .join("config.yaml");
        Self::new(path, ConfigLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> ConfigResult<ConfigFile> {
        if !self.path.exists() {
            return Ok(ConfigFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }

        let config: ConfigFile = serde_yaml::from_str(&content)?;
        config.validate()?;

        if self.level == ConfigLevel::User {
            return Ok(config);
        }
        let (config, dropped) = config.restrict_to_workspace();
        if !dropped.is_empty() {
            crate::warn_log!(
                "{}: ignoring {} (only allowed at user level)",
                self.path.display(),
                dropped.join(", ")
            );
        }
        Ok(config)
    }

    /// Re-read the file, replacing the cache
    pub fn reload(&self) -> ConfigResult<ConfigFile> {
        let config = self.read()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    fn name(&self) -> String {
        format!("{} config ({})", self.level.as_str(), self.path.display())
    }

    async fn load(&self) -> ConfigResult<ConfigFile> {
        if let Some(config) = self.cache.read().as_ref() {
            return Ok(config.clone());
        }
        self.reload()
    }
}

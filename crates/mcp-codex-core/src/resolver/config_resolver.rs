//! Layered resolution of `BridgeConfig`
//!
//! Later layers override earlier ones:
//! 1. Built-in defaults
//! 2. User YAML (`~/.config/mcp-codex/config.yaml`)
//! 3. Workspace YAML (`<workspace>/.config/mcp-codex/config.yaml`)
//! 4. Environment variables (`MCP_CODEX_*`)
//!
//! A layer that fails to load is logged and skipped rather than aborting startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{
    validate_output_limit, BridgeConfig, ConfigError, ConfigFile, ConfigProvider, ConfigResult,
    FileConfigProvider,
};
use crate::logging::SharedLogger;
use crate::secrets::SecretStore;

pub const ENV_PROGRAM: &str = "MCP_CODEX_PROGRAM";
pub const ENV_MAX_OUTPUT_BYTES: &str = "MCP_CODEX_MAX_OUTPUT_BYTES";
pub const ENV_PROJECT_DOC: &str = "MCP_CODEX_PROJECT_DOC";

pub struct ConfigResolver {
    layers: Vec<Arc<dyn ConfigProvider>>,
    env: Arc<dyn SecretStore>,
    logger: SharedLogger,
}

impl ConfigResolver {
    /// Resolver with no file layers (defaults + environment only)
    pub fn new(env: Arc<dyn SecretStore>, logger: SharedLogger) -> Self {
        Self {
            layers: Vec::new(),
            env,
            logger,
        }
    }

    /// User and workspace YAML layers for `workspace_root`
    pub fn standard(workspace_root: &Path, env: Arc<dyn SecretStore>, logger: SharedLogger) -> Self {
        Self::new(env, logger)
            .with_layer(Arc::new(FileConfigProvider::user()))
            .with_layer(Arc::new(FileConfigProvider::workspace(workspace_root)))
    }

    /// Append a layer that overrides every layer added before it
    pub fn with_layer(mut self, provider: Arc<dyn ConfigProvider>) -> Self {
        self.layers.push(provider);
        self
    }

    pub async fn resolve(&self) -> BridgeConfig {
        let mut config = BridgeConfig::default();

        for layer in &self.layers {
            match layer.load().await {
                Ok(file) => config.apply(&file),
                Err(e) => self.logger.warn(&format!("Ignoring {}: {}", layer.name(), e)),
            }
        }

        match self.env_layer() {
            Ok(file) => config.apply(&file),
            Err(e) => self.logger.warn(&format!("Ignoring environment overrides: {}", e)),
        }

        self.logger.debug(&format!(
            "Effective config: program={} launcher_args={:?} max_output_bytes={} project_doc={}",
            config.program,
            config.launcher_args,
            config.max_output_bytes,
            config.project_doc.display()
        ));
        config
    }

    /// The layer contributed by `MCP_CODEX_*` variables
    pub fn env_layer(&self) -> ConfigResult<ConfigFile> {
        let max_output_bytes = match self.env.get(ENV_MAX_OUTPUT_BYTES) {
            Some(raw) => Some(parse_limit(&raw)?),
            None => None,
        };

        Ok(ConfigFile {
            program: self.env.get(ENV_PROGRAM),
            max_output_bytes,
            project_doc: self.env.get(ENV_PROJECT_DOC).map(PathBuf::from),
            ..ConfigFile::default()
        })
    }
}

fn parse_limit(raw: &str) -> ConfigResult<usize> {
    let limit = raw.trim().parse::<usize>().map_err(|e| ConfigError::InvalidValue {
        key: ENV_MAX_OUTPUT_BYTES.to_string(),
        reason: e.to_string(),
    })?;
    validate_output_limit(ENV_MAX_OUTPUT_BYTES, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLevel, DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_PROGRAM};
    use crate::logging::NoOpLogger;
    use crate::secrets::MemorySecretStore;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::tempdir;

    struct StaticLayer(ConfigFile);

    #[async_trait]
    impl ConfigProvider for StaticLayer {
        fn name(&self) -> String {
            "static".to_string()
        }

        async fn load(&self) -> ConfigResult<ConfigFile> {
            Ok(self.0.clone())
        }
    }

    fn layer(program: &str) -> Arc<dyn ConfigProvider> {
        Arc::new(StaticLayer(ConfigFile {
            program: Some(program.to_string()),
            ..ConfigFile::default()
        }))
    }

    fn workspace_file(content: &str) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join(".config").join("mcp-codex");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.yaml"), content).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_defaults_without_layers() {
        let resolver = ConfigResolver::new(Arc::new(MemorySecretStore::new()), Arc::new(NoOpLogger::new()));
        assert_eq!(resolver.resolve().await, BridgeConfig::default());
    }

    #[tokio::test]
    async fn test_later_layers_win() {
        let resolver = ConfigResolver::new(Arc::new(MemorySecretStore::new()), Arc::new(NoOpLogger::new()))
            .with_layer(layer("user-codex"))
            .with_layer(layer("workspace-codex"));
        assert_eq!(resolver.resolve().await.program, "workspace-codex");
    }

    #[tokio::test]
    async fn test_environment_beats_files() {
        let env = Arc::new(MemorySecretStore::with_vars([
            (ENV_PROGRAM, "env-codex"),
            (ENV_MAX_OUTPUT_BYTES, "4096"),
            (ENV_PROJECT_DOC, "AGENTS.md"),
        ]));
        let resolver = ConfigResolver::new(env, Arc::new(NoOpLogger::new())).with_layer(layer("file-codex"));

        let config = resolver.resolve().await;
        assert_eq!(config.program, "env-codex");
        assert_eq!(config.max_output_bytes, 4096);
        assert_eq!(config.project_doc, PathBuf::from("AGENTS.md"));
    }

    #[tokio::test]
    async fn test_bad_env_limit_is_ignored() {
        let env = Arc::new(MemorySecretStore::with_vars([(ENV_MAX_OUTPUT_BYTES, "lots")]));
        let resolver = ConfigResolver::new(env, Arc::new(NoOpLogger::new()));

        assert!(matches!(resolver.env_layer(), Err(ConfigError::InvalidValue { .. })));
        assert_eq!(resolver.resolve().await.max_output_bytes, DEFAULT_MAX_OUTPUT_BYTES);
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(parse_limit("0").is_err());
        assert_eq!(parse_limit(" 2048 ").unwrap(), 2048);
    }

    #[tokio::test]
    async fn test_broken_file_layer_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "program: [unterminated\n").unwrap();

        let resolver = ConfigResolver::new(Arc::new(MemorySecretStore::new()), Arc::new(NoOpLogger::new()))
            .with_layer(layer("user-codex"))
            .with_layer(Arc::new(FileConfigProvider::new(&path, ConfigLevel::Workspace)));
        assert_eq!(resolver.resolve().await.program, "user-codex");
    }

    #[tokio::test]
    async fn test_standard_reads_workspace_file() {
        let dir = workspace_file("project_doc: docs/GUIDE.md\n");

        let resolver = ConfigResolver::standard(
            dir.path(),
            Arc::new(MemorySecretStore::new()),
            Arc::new(NoOpLogger::new()),
        );
        assert_eq!(resolver.resolve().await.project_doc, PathBuf::from("docs/GUIDE.md"));
    }

    #[tokio::test]
    async fn test_workspace_program_is_ignored() {
        let dir = workspace_file(
            "program: sh\nlauncher_args: [\"-c\", \"touch pwned\"]\nproject_doc: docs/GUIDE.md\n",
        );

        let resolver = ConfigResolver::new(Arc::new(MemorySecretStore::new()), Arc::new(NoOpLogger::new()))
            .with_layer(Arc::new(FileConfigProvider::workspace(dir.path())));
        let config = resolver.resolve().await;

        assert_eq!(config.program, DEFAULT_PROGRAM);
        assert!(config.launcher_args.is_empty());
        assert_eq!(config.project_doc, PathBuf::from("docs/GUIDE.md"));
    }

    #[tokio::test]
    async fn test_zero_limit_in_yaml_keeps_default() {
        let dir = workspace_file("max_output_bytes: 0\n");

        let resolver = ConfigResolver::new(Arc::new(MemorySecretStore::new()), Arc::new(NoOpLogger::new()))
            .with_layer(Arc::new(FileConfigProvider::workspace(dir.path())));
        assert_eq!(resolver.resolve().await.max_output_bytes, DEFAULT_MAX_OUTPUT_BYTES);
    }
}

//! Layered lookup of the Codex API key
//!
//! Precedence, first hit wins:
//! 1. The environment store (no I/O)
//! 2. `<working dir>/.env`
//! 3. `<home>/.env`, where home is `$HOME` or a fixed fallback
//!
//! A value found in a file is written back into the environment store, so
//! every later `ensure()` on the same store stops at step 1.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::bridge::{BridgeError, BridgeResult};
use crate::config::BridgeConfig;
use crate::logging::SharedLogger;
use crate::secrets::{ChainSecretStore, DotenvSecretStore, SecretStore};

/// A resolved secret
///
/// `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for handing to the child process
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}

pub struct CredentialResolver {
    key: String,
    env: Arc<dyn SecretStore>,
    files: ChainSecretStore,
    logger: SharedLogger,
}

impl CredentialResolver {
    /// Resolver over `<working_dir>/.env` and `<home>/.env`
    ///
    /// `home` is read from `HOME` in `env` now, falling back to
    /// `config.home_fallback`.
    pub fn new(
        config: &BridgeConfig,
        env: Arc<dyn SecretStore>,
        working_dir: &Path,
        logger: SharedLogger,
    ) -> Self {
        let home = env
            .get("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| config.home_fallback.clone());

        let files: Vec<Arc<dyn SecretStore>> = vec![
            Arc::new(DotenvSecretStore::new(working_dir.join(".env"))),
            Arc::new(DotenvSecretStore::new(home.join(".env"))),
        ];
        Self::with_sources(config.api_key_var.clone(), env, files, logger)
    }

    /// Resolver over explicit fallback sources, consulted in order
    pub fn with_sources(
        key: impl Into<String>,
        env: Arc<dyn SecretStore>,
        sources: Vec<Arc<dyn SecretStore>>,
        logger: SharedLogger,
    ) -> Self {
        Self {
            key: key.into(),
            env,
            files: ChainSecretStore::new(sources),
            logger,
        }
    }

    /// Name of the variable being resolved
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Make sure the credential is available, resolving and caching it if needed
    pub fn ensure(&self) -> BridgeResult<Credential> {
        if let Some(value) = self.env.get(&self.key) {
            return Ok(Credential(value));
        }

        let (value, source) = self
            .files
            .resolve(&self.key)
            .map(|(value, store)| (value, store.name().to_string()))
            .ok_or_else(|| BridgeError::CredentialMissing {
                var: self.key.clone(),
                checked: self.checked_locations(),
            })?;

        self.logger.info(&format!("Resolved {} from {}", self.key, source));

        // A concurrent resolution may have filled the cache first; keep whatever won.
        if let Err(e) = self.env.store(&self.key, &value) {
            self.logger.warn(&format!("Could not cache {}: {}", self.key, e));
            if let Some(cached) = self.env.get(&self.key) {
                return Ok(Credential(cached));
            }
        }

        Ok(Credential(value))
    }

    /// Fallback locations in lookup order
    pub fn checked_locations(&self) -> Vec<PathBuf> {
        self.files
            .stores()
            .iter()
            .map(|store| {
                let name = store.name();
                PathBuf::from(name.strip_prefix("dotenv:").unwrap_or(name))
            })
            .collect()
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("key", &self.key)
            .field("env", &self.env.name())
            .field("files", &self.files)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::secrets::MemorySecretStore;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const KEY: &str = "OPENAI_API_KEY";

    struct Fixture {
        _dir: TempDir,
        cwd_env: Arc<DotenvSecretStore>,
        home_env: Arc<DotenvSecretStore>,
    }

    fn fixture(cwd: Option<&str>, home: Option<&str>) -> Fixture {
        let dir = tempdir().unwrap();
        let cwd_path = dir.path().join("project").join(".env");
        let home_path = dir.path().join("home").join(".env");
        fs::create_dir_all(cwd_path.parent().unwrap()).unwrap();
        fs::create_dir_all(home_path.parent().unwrap()).unwrap();
        if let Some(content) = cwd {
            fs::write(&cwd_path, content).unwrap();
        }
        if let Some(content) = home {
            fs::write(&home_path, content).unwrap();
        }
        Fixture {
            cwd_env: Arc::new(DotenvSecretStore::new(cwd_path)),
            home_env: Arc::new(DotenvSecretStore::new(home_path)),
            _dir: dir,
        }
    }

    fn resolver(env: Arc<MemorySecretStore>, fx: &Fixture) -> CredentialResolver {
        CredentialResolver::with_sources(
            KEY,
            env,
            vec![fx.cwd_env.clone() as Arc<dyn SecretStore>, fx.home_env.clone()],
            Arc::new(NoOpLogger::new()),
        )
    }

    #[test]
    fn test_environment_wins_without_io() {
        let fx = fixture(Some("OPENAI_API_KEY=sk-cwd\n"), Some("OPENAI_API_KEY=sk-home\n"));
        let env = Arc::new(MemorySecretStore::with_vars([(KEY, "sk-env")]));

        let credential = resolver(env, &fx).ensure().unwrap();
        assert_eq!(credential.expose(), "sk-env");
        assert_eq!(fx.cwd_env.read_count(), 0);
        assert_eq!(fx.home_env.read_count(), 0);
    }

    #[test]
    fn test_working_dir_file_is_adopted_and_cached() {
        let fx = fixture(Some("OPENAI_API_KEY=  sk-cwd  \n"), Some("OPENAI_API_KEY=sk-home\n"));
        let env = Arc::new(MemorySecretStore::new());
        let resolver = resolver(env.clone(), &fx);

        assert_eq!(resolver.ensure().unwrap().expose(), "sk-cwd");
        assert_eq!(env.get(KEY), Some("sk-cwd".to_string()));
        assert_eq!(fx.cwd_env.read_count(), 1);
        assert_eq!(fx.home_env.read_count(), 0);

        // Second call is served from the environment store
        assert_eq!(resolver.ensure().unwrap().expose(), "sk-cwd");
        assert_eq!(fx.cwd_env.read_count(), 1);
        assert_eq!(fx.home_env.read_count(), 0);
    }

    #[test]
    fn test_home_file_is_last_resort() {
        let fx = fixture(Some("OTHER=1\n"), Some("OPENAI_API_KEY=sk-home\n"));
        let env = Arc::new(MemorySecretStore::new());

        let credential = resolver(env.clone(), &fx).ensure().unwrap();
        assert_eq!(credential.expose(), "sk-home");
        assert_eq!(env.get(KEY), Some("sk-home".to_string()));
        assert_eq!(fx.cwd_env.read_count(), 1);
        assert_eq!(fx.home_env.read_count(), 1);
    }

    #[test]
    fn test_missing_everywhere() {
        let fx = fixture(None, Some("# nothing here\n"));
        let env = Arc::new(MemorySecretStore::new());
        let resolver = resolver(env.clone(), &fx);

        match resolver.ensure().unwrap_err() {
            BridgeError::CredentialMissing { var, checked } => {
                assert_eq!(var, KEY);
                assert_eq!(checked, vec![fx.cwd_env.path().to_path_buf(), fx.home_env.path().to_path_buf()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(env.is_empty());
    }

    #[test]
    fn test_no_fallback_sources() {
        let resolver = CredentialResolver::with_sources(
            KEY,
            Arc::new(MemorySecretStore::new()),
            Vec::new(),
            Arc::new(NoOpLogger::new()),
        );

        assert!(resolver.checked_locations().is_empty());
        assert!(matches!(resolver.ensure(), Err(BridgeError::CredentialMissing { .. })));
    }

    #[test]
    fn test_idempotent_resolution() {
        let fx = fixture(None, Some("OPENAI_API_KEY=sk-home\n"));
        let resolver = resolver(Arc::new(MemorySecretStore::new()), &fx);

        let first = resolver.ensure().unwrap();
        let second = resolver.ensure().unwrap();
        assert_eq!(first, second);
        assert_eq!(fx.cwd_env.read_count() + fx.home_env.read_count(), 2);
        assert_eq!(fx.home_env.read_count(), 1);
    }

    #[test]
    fn test_new_uses_home_from_env_store() {
        let dir = tempdir().unwrap();
        let home = dir.path().join("home");
        let project = dir.path().join("project");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&project).unwrap();
        fs::write(home.join(".env"), "OPENAI_API_KEY=sk-from-home\n").unwrap();

        let env = Arc::new(MemorySecretStore::with_vars([("HOME", home.to_string_lossy().to_string())]));
        let resolver = CredentialResolver::new(
            &BridgeConfig::default(),
            env,
            &project,
            Arc::new(NoOpLogger::new()),
        );

        assert_eq!(resolver.checked_locations(), vec![project.join(".env"), home.join(".env")]);
        assert_eq!(resolver.ensure().unwrap().expose(), "sk-from-home");
    }

    #[test]
    fn test_new_falls_back_to_fixed_home() {
        let dir = tempdir().unwrap();
        let config = BridgeConfig {
            home_fallback: dir.path().join("fallback"),
            ..BridgeConfig::default()
        };
        let resolver = CredentialResolver::new(
            &config,
            Arc::new(MemorySecretStore::new()),
            dir.path(),
            Arc::new(NoOpLogger::new()),
        );
        assert_eq!(
            resolver.checked_locations()[1],
            dir.path().join("fallback").join(".env")
        );
    }

    #[test]
    fn test_credential_is_redacted() {
        let credential = Credential::new("sk-secret");
        assert_eq!(format!("{:?}", credential), "Credential(***)");
        assert_eq!(credential.to_string(), "***");
    }
}

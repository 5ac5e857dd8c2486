//! In-memory secret store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

/// In-memory stand-in for the process environment
///
/// Behaves like `ProcessEnvStore` (empty values are absent, writes are
/// write-once per key) but is private to its owner, so tests and embedders
/// can run isolated credential caches side by side.
///
/// # Example
///
/// ```
/// use mcp_codex_core::secrets::{SecretStore, MemorySecretStore};
///
/// let env = MemorySecretStore::with_vars([("HOME", "/home/dev")]);
/// assert_eq!(env.get("HOME"), Some("/home/dev".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    vars: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            vars: RwLock::new(HashMap::new()),
        }
    }

    /// Create a memory store with initial variables
    pub fn with_vars<K, V>(initial: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: RwLock::new(
                initial
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Get the number of variables in the store
    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.vars
            .read()
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
    }

    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()> {
        let mut vars = self.vars.write();
        match vars.get(key) {
            Some(existing) if existing == value => Ok(()),
            Some(existing) if !existing.is_empty() => {
                Err(SecretStoreError::AlreadySet(key.to_string()))
            }
            _ => {
                vars.insert(key.to_string(), value.to_string());
                Ok(())
            }
        }
    }
}

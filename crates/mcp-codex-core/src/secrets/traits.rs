//! Core traits and types for secret storage

use thiserror::Error;

/// Errors that can occur during secret store operations
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("Store is read-only")]
    ReadOnly,

    #[error("Secret already set: {0}")]
    AlreadySet(String),
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// A named key-value source of secrets
///
/// Stores are synchronous; the only I/O any of them performs is a small
/// file read, which happens at most once per credential resolution.
///
/// # Example
///
/// ```
/// use mcp_codex_core::secrets::{SecretStore, MemorySecretStore};
///
/// let store = MemorySecretStore::new();
/// store.store("OPENAI_API_KEY", "sk-test").unwrap();
/// assert!(store.has("OPENAI_API_KEY"));
/// ```
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Retrieve a secret by its exact key (e.g. `OPENAI_API_KEY`)
    ///
    /// Empty values are treated as absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a secret
    ///
    /// Returns `Err(SecretStoreError::ReadOnly)` if the store doesn't support writing.
    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()>;

    /// Check if a secret exists
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

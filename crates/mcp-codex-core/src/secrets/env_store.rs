//! Process environment secret store

use std::env;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

/// Serializes writers so two resolutions racing on the same key cannot interleave
/// their check-then-set.
static ENV_WRITE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Secret store backed by the real process environment
///
/// This is the credential cache used in production: once a key has been
/// resolved from a dotenv file it is exported here, so later resolutions
/// in the same process return immediately and child processes inherit it.
///
/// Writes are write-once per key. Setting a key that already holds the
/// same value is a no-op; setting it to a different value fails with
/// `SecretStoreError::AlreadySet`.
#[derive(Debug, Default)]
pub struct ProcessEnvStore {
    _private: (),
}

impl ProcessEnvStore {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl SecretStore for ProcessEnvStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.is_empty())
    }

    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()> {
        let _guard = ENV_WRITE_LOCK.lock();
        match self.get(key) {
            Some(existing) if existing == value => Ok(()),
            Some(_) => Err(SecretStoreError::AlreadySet(key.to_string())),
            None => {
                env::set_var(key, value);
                Ok(())
            }
        }
    }
}

//! Ordered fallback across several secret stores

use std::sync::Arc;

use super::traits::SecretStore;

/// Consults several stores in priority order
///
/// The first store with a non-empty value wins. An empty chain resolves
/// nothing.
///
/// # Example
///
/// ```
/// use mcp_codex_core::secrets::{SecretStore, ChainSecretStore, DotenvSecretStore};
/// use std::sync::Arc;
///
/// // Project-local .env wins over the user-global one
/// let chain = ChainSecretStore::new(vec![
///     Arc::new(DotenvSecretStore::new("/work/.env")) as Arc<dyn SecretStore>,
///     Arc::new(DotenvSecretStore::new("/home/dev/.env")),
/// ]);
/// assert_eq!(chain.stores().len(), 2);
/// ```
pub struct ChainSecretStore {
    stores: Vec<Arc<dyn SecretStore>>,
}

impl ChainSecretStore {
    /// Stores are tried in the given order
    pub fn new(stores: Vec<Arc<dyn SecretStore>>) -> Self {
        Self { stores }
    }

    /// Get the stores in this chain
    pub fn stores(&self) -> &[Arc<dyn SecretStore>] {
        &self.stores
    }

    /// Look a key up and report which store answered
    ///
    /// Each member is queried at most once, stopping at the first hit.
    pub fn resolve(&self, key: &str) -> Option<(String, &Arc<dyn SecretStore>)> {
        self.stores
            .iter()
            .find_map(|store| store.get(key).map(|value| (value, store)))
    }
}

// Arc<dyn SecretStore> doesn't implement Debug
impl std::fmt::Debug for ChainSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.stores.iter().map(|s| s.name()).collect();
        f.debug_struct("ChainSecretStore")
            .field("stores", &names)
            .finish()
    }
}

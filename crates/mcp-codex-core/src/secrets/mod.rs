//! Key-value secret stores used for credential resolution
//!
//! - `SecretStore` trait shared by every source
//! - `ProcessEnvStore`: the process environment, used as the write-once credential cache
//! - `MemorySecretStore`: isolated in-memory environment for tests and embedding
//! - `DotenvSecretStore`: read-only view of a `KEY=value` file
//! - `ChainSecretStore`: ordered fallback across several stores

mod traits;
mod env_store;
mod memory_store;
mod dotenv_store;
mod chain_store;

pub use traits::{SecretStore, SecretStoreError, SecretStoreResult};
pub use env_store::ProcessEnvStore;
pub use memory_store::MemorySecretStore;
pub use dotenv_store::DotenvSecretStore;
pub use chain_store::ChainSecretStore;

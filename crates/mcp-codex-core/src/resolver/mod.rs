//! Resolution of the credential and of bridge configuration from layered sources
//!
//! - `CredentialResolver`: environment, then `<cwd>/.env`, then `<home>/.env`
//! - `ConfigResolver`: defaults, then user YAML, then workspace YAML, then environment

mod credential_resolver;
mod config_resolver;

pub use credential_resolver::{Credential, CredentialResolver};
pub use config_resolver::{ConfigResolver, ENV_MAX_OUTPUT_BYTES, ENV_PROGRAM, ENV_PROJECT_DOC};

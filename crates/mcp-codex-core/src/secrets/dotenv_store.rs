//! Read-only secret store over a `.env` file

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};
use crate::logging::file_logger as log;

/// Secret store that looks keys up in a dotenv-style file
///
/// The file is read on every `get`; callers that need memoization put a
/// writable store in front (see `CredentialResolver`). A missing or
/// unreadable file simply yields no secrets.
///
/// A line matches key `K` when, after optional leading whitespace and an
/// optional `export ` prefix, it starts with `K=`. The remainder of the
/// line is trimmed; an empty remainder does not count. Lines starting
/// with `#` are comments.
#[derive(Debug)]
pub struct DotenvSecretStore {
    path: PathBuf,
    name: String,
    reads: AtomicUsize,
}

impl DotenvSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("dotenv:{}", path.display());
        Self {
            path,
            name,
            reads: AtomicUsize::new(0),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of times the backing file has been read (or attempted)
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Extract the value for `key` from dotenv-formatted text
    pub fn parse_value(content: &str, key: &str) -> Option<String> {
        let prefix = format!("{}=", key);
        content.lines().find_map(|line| {
            let line = line.trim_start();
            if line.starts_with('#') {
                return None;
            }
            let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);
            let value = line.strip_prefix(&prefix)?.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    }
}

impl SecretStore for DotenvSecretStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match fs::read_to_string(&self.path) {
            Ok(content) => Self::parse_value(&content, key),
            Err(e) => {
                log::debug("DotenvSecretStore", &format!("{}: {}", self.path.display(), e));
                None
            }
        }
    }

    fn store(&self, _key: &str, _value: &str) -> SecretStoreResult<()> {
        Err(SecretStoreError::ReadOnly)
    }
}

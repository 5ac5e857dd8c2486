//! The request-to-subprocess bridge
//!
//! `CodexBridge::execute` is the single path from a tool handler to Codex:
//! it makes sure the API key is available, then runs the command through a
//! `CommandRunner` and classifies the result.

mod error;
mod command;
pub mod history;

use std::sync::Arc;

pub use error::{BridgeError, BridgeResult};
pub use command::{CapturedOutput, CodexCommand, CommandRequest, CommandRunner};
pub use history::{segment_sessions, HistoryPage};

use crate::logging::SharedLogger;
use crate::resolver::CredentialResolver;

pub struct CodexBridge {
    resolver: CredentialResolver,
    runner: Arc<dyn CommandRunner>,
    logger: SharedLogger,
}

impl CodexBridge {
    pub fn new(resolver: CredentialResolver, runner: Arc<dyn CommandRunner>, logger: SharedLogger) -> Self {
        Self {
            resolver,
            runner,
            logger,
        }
    }

    /// Run Codex with `args` after the quiet flag and return its stdout
    pub async fn execute(&self, args: Vec<String>) -> BridgeResult<String> {
        let credential = self.resolver.ensure()?;
        let request = CommandRequest::new(args).with_env(self.resolver.key(), credential);

        let result = self.runner.run(&request).await;
        if let Err(ref e) = result {
            self.logger.warn(&format!("Codex run failed: {}", e));
        }
        result
    }
}

impl std::fmt::Debug for CodexBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodexBridge")
            .field("resolver", &self.resolver)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::secrets::{MemorySecretStore, SecretStore};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingRunner {
        requests: Mutex<Vec<CommandRequest>>,
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, request: &CommandRequest) -> BridgeResult<String> {
            self.requests.lock().push(request.clone());
            Ok("done".to_string())
        }
    }

    fn bridge(env: MemorySecretStore, runner: Arc<RecordingRunner>) -> CodexBridge {
        let resolver = CredentialResolver::with_sources(
            "OPENAI_API_KEY",
            Arc::new(env),
            vec![Arc::new(MemorySecretStore::new()) as Arc<dyn SecretStore>],
            Arc::new(NoOpLogger::new()),
        );
        CodexBridge::new(resolver, runner, Arc::new(NoOpLogger::new()))
    }

    #[tokio::test]
    async fn test_execute_passes_credential_to_child() {
        let runner = Arc::new(RecordingRunner::default());
        let bridge = bridge(MemorySecretStore::with_vars([("OPENAI_API_KEY", "sk-env")]), runner.clone());

        assert_eq!(bridge.execute(vec!["hi".to_string()]).await.unwrap(), "done");

        let requests = runner.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].args, vec!["hi".to_string()]);
        assert_eq!(requests[0].env[0].0, "OPENAI_API_KEY");
        assert_eq!(requests[0].env[0].1.expose(), "sk-env");
    }

    #[tokio::test]
    async fn test_execute_fails_fast_without_credential() {
        let runner = Arc::new(RecordingRunner::default());
        let bridge = bridge(MemorySecretStore::new(), runner.clone());

        let err = bridge.execute(vec!["hi".to_string()]).await.unwrap_err();
        assert!(matches!(err, BridgeError::CredentialMissing { .. }));
        assert!(runner.requests.lock().is_empty());
    }
}

//! Dispatch boundary for `tools/list` and `tools/call`

use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use super::catalog::catalog;
use super::service::CodexTools;
use crate::bridge::{BridgeResult, CodexBridge, CodexCommand};
use crate::config::BridgeConfig;
use crate::logging::SharedLogger;
use crate::resolver::CredentialResolver;
use crate::secrets::SecretStore;
use crate::types::{Tool, ToolInvocation, ToolResponse};
use crate::{log_debug, log_error, log_warn};

/// Entry point used by the transport
///
/// `call_tool` never fails: every error, including a panic inside a
/// handler, comes back as an `Error: ...` response.
pub struct CodexToolServer {
    tools: CodexTools,
    logger: SharedLogger,
}

impl CodexToolServer {
    pub fn new(tools: CodexTools, logger: SharedLogger) -> Self {
        Self { tools, logger }
    }

    /// Wire up the real Codex executable from resolved configuration
    pub fn from_config(
        config: &BridgeConfig,
        env: Arc<dyn SecretStore>,
        working_dir: &Path,
        logger: SharedLogger,
    ) -> Self {
        let resolver = CredentialResolver::new(config, env, working_dir, logger.clone());
        let runner = Arc::new(CodexCommand::from_config(config));
        let bridge = CodexBridge::new(resolver, runner, logger.clone());
        let project_doc = working_dir.join(&config.project_doc);

        Self::new(CodexTools::new(bridge, project_doc, logger.clone()), logger)
    }

    pub fn list_tools(&self) -> &'static [Tool] {
        catalog()
    }

    pub async fn call_tool(&self, name: &str, arguments: Option<Value>) -> ToolResponse {
        log_debug!(self.logger, "tools/call {}", name);

        match AssertUnwindSafe(self.dispatch(name, arguments)).catch_unwind().await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                log_warn!(self.logger, "{} failed: {}", name, e);
                ToolResponse::error(e)
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                log_error!(self.logger, "{} panicked: {}", name, reason);
                ToolResponse::error(format!("internal error in {}: {}", name, reason))
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: Option<Value>) -> BridgeResult<ToolResponse> {
        let invocation = ToolInvocation::parse(name, arguments)?;
        self.tools.handle(invocation).await
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::bridge::{CommandRequest, CommandRunner};
    use crate::logging::NoOpLogger;
    use crate::secrets::MemorySecretStore;

    struct EchoRunner;

    #[async_trait]
    impl CommandRunner for EchoRunner {
        async fn run(&self, request: &CommandRequest) -> BridgeResult<String> {
            if request.args.iter().any(|a| a == "boom") {
                panic!("runner exploded");
            }
            Ok(request.args.join(" "))
        }
    }

    fn server(env: MemorySecretStore) -> CodexToolServer {
        let logger: SharedLogger = Arc::new(NoOpLogger::new());
        let resolver = CredentialResolver::with_sources(
            "OPENAI_API_KEY",
            Arc::new(env),
            vec![Arc::new(MemorySecretStore::new()) as Arc<dyn SecretStore>],
            logger.clone(),
        );
        let bridge = CodexBridge::new(resolver, Arc::new(EchoRunner), logger.clone());
        let tools = CodexTools::new(bridge, PathBuf::from("/nonexistent/CLAUDE.md"), logger.clone());
        CodexToolServer::new(tools, logger)
    }

    fn keyed() -> MemorySecretStore {
        MemorySecretStore::with_vars([("OPENAI_API_KEY", "sk-test")])
    }

    #[test]
    fn test_list_tools() {
        assert_eq!(server(keyed()).list_tools().len(), 4);
    }

    #[tokio::test]
    async fn test_call_consult() {
        let response = server(keyed())
            .call_tool("codex_consult", Some(json!({ "question": "why?" })))
            .await;
        assert_eq!(response.joined_text(), "Codex Consultation:\n\nwhy?");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let response = server(keyed()).call_tool("codex_deploy", None).await;
        assert_eq!(response.joined_text(), "Error: Unknown tool: codex_deploy");
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let response = server(keyed())
            .call_tool("codex_review", Some(json!({ "prompt": "p", "verbose": true })))
            .await;
        let text = response.joined_text();
        assert!(text.starts_with("Error: Invalid arguments for codex_review:"), "{}", text);
        assert!(text.contains("verbose"));
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let response = server(MemorySecretStore::new())
            .call_tool("codex_status", Some(json!({})))
            .await;
        let text = response.joined_text();
        assert!(text.starts_with("Error: OPENAI_API_KEY not found."), "{}", text);
    }

    #[tokio::test]
    async fn test_panic_becomes_error_response() {
        let server = server(keyed());
        let response = server
            .call_tool("codex_consult", Some(json!({ "question": "boom" })))
            .await;
        assert_eq!(
            response.joined_text(),
            "Error: internal error in codex_consult: runner exploded"
        );

        // still serving afterwards
        let response = server.call_tool("codex_consult", Some(json!({ "question": "ok" }))).await;
        assert_eq!(response.joined_text(), "Codex Consultation:\n\nok");
    }
}

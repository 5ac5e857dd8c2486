//! MCP Codex Core
//!
//! Exposes the Codex CLI as four MCP tools. This crate is transport-agnostic:
//! the stdio JSON-RPC loop lives in `mcp-codex-server`, everything it calls
//! lives here.
//!
//! ## Request flow
//!
//! 1. `ToolInvocation::parse` validates the raw `tools/call` payload
//! 2. `CredentialResolver::ensure` makes sure `OPENAI_API_KEY` is available
//!    (environment, then `<cwd>/.env`, then `<home>/.env`)
//! 3. `CodexCommand` runs `codex -q <args...>` with bounded output capture
//! 4. The result is wrapped in a `ToolResponse`; failures become `Error: ...` text
//!
//! ```rust,ignore
//! use mcp_codex_core::{CodexToolServer, ConfigResolver, ProcessEnvStore};
//!
//! let env = Arc::new(ProcessEnvStore::new());
//! let config = ConfigResolver::standard(&cwd, env.clone(), logger.clone()).resolve().await;
//! let server = CodexToolServer::from_config(&config, env, &cwd, logger);
//!
//! let response = server.call_tool("codex_consult", Some(json!({ "question": "..." }))).await;
//! ```

pub mod types;
pub mod secrets;
pub mod logging;
pub mod config;
pub mod resolver;
pub mod bridge;
pub mod tools;

// Re-export commonly used types
pub use types::{
    Tool, ToolResponse, ContentItem,
    ToolName, ToolInvocation, ReviewArgs, ConsultArgs, StatusArgs, HistoryArgs,
};

pub use secrets::{
    SecretStore, SecretStoreError, SecretStoreResult,
    ProcessEnvStore, MemorySecretStore, DotenvSecretStore, ChainSecretStore,
};

pub use logging::{Logger, SharedLogger, NoOpLogger, ConsoleLogger, LogLevel};

pub use config::{BridgeConfig, ConfigFile, ConfigProvider, ConfigError, ConfigResult};

pub use resolver::{Credential, CredentialResolver, ConfigResolver};

pub use bridge::{
    BridgeError, BridgeResult, CodexBridge, CodexCommand, CommandRequest, CommandRunner,
    HistoryPage,
};

pub use tools::{catalog, CodexToolServer, CodexTools, NO_HISTORY_MESSAGE};

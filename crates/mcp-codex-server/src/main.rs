//! `mcp-codex-server`: MCP over stdio, exposing the Codex CLI as tools
//!
//! The protocol is handled by rmcp behind a line guard (see `framing`).
//! stdout carries JSON-RPC only. Diagnostics go to stderr, and to
//! `<temp>/mcp-codex-debug.log` when `MCP_CODEX_DEBUG=1`.

mod error;
mod framing;
mod handler;

use std::process::ExitCode;
use std::sync::Arc;

use mcp_codex_core::{error_log, info_log, log_error, log_info};
use mcp_codex_core::{
    CodexToolServer, ConfigResolver, ConsoleLogger, LogLevel, ProcessEnvStore, SecretStore,
    SharedLogger,
};

use crate::error::ServerResult;

#[tokio::main]
async fn main() -> ExitCode {
    let level = std::env::var("MCP_CODEX_LOG_LEVEL")
        .ok()
        .and_then(|v| LogLevel::parse(&v))
        .unwrap_or(LogLevel::Info);
    let logger: SharedLogger = Arc::new(ConsoleLogger::new().with_min_level(level));

    match run(logger.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!(logger, "server stopped: {}", e);
            error_log!("server stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(logger: SharedLogger) -> ServerResult<()> {
    let cwd = std::env::current_dir()?;
    let env: Arc<dyn SecretStore> = Arc::new(ProcessEnvStore::new());

    let config = ConfigResolver::standard(&cwd, env.clone(), logger.clone())
        .resolve()
        .await;
    log_info!(
        logger,
        "{} {} starting (codex: {}, project doc: {})",
        handler::SERVER_NAME,
        handler::SERVER_VERSION,
        config.program,
        config.project_doc.display()
    );
    info_log!("starting in {}", cwd.display());

    let server = Arc::new(CodexToolServer::from_config(&config, env, &cwd, logger.clone()));
    let handler = handler::CodexMcpHandler::new(server, logger);
    handler::serve(tokio::io::stdin(), tokio::io::stdout(), handler).await
}

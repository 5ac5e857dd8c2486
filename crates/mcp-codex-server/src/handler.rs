//! MCP server handler backed by `CodexToolServer`
//!
//! rmcp owns the protocol (handshake, ping, request routing); this module
//! maps its `tools/list` and `tools/call` onto the core catalog and
//! dispatcher. `serve` wires it to a byte stream through the line guard.

use std::sync::Arc;

use mcp_codex_core::{log_debug, log_info};
use mcp_codex_core::{CodexToolServer, ContentItem, SharedLogger, Tool, ToolResponse};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo, Tool as McpTool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::{ServerError, ServerResult};
use crate::framing;

pub const SERVER_NAME: &str = "mcp-codex-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct CodexMcpHandler {
    server: Arc<CodexToolServer>,
    logger: SharedLogger,
}

impl CodexMcpHandler {
    pub fn new(server: Arc<CodexToolServer>, logger: SharedLogger) -> Self {
        Self { server, logger }
    }
}

impl ServerHandler for CodexMcpHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: Some("Codex MCP Server".to_string()),
                version: SERVER_VERSION.to_string(),
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Second opinions from the Codex CLI: codex_review for code, codex_consult for \
                 questions, codex_status for the project, codex_history for past sessions."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools = self.server.list_tools().iter().map(to_mcp_tool).collect();
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        log_debug!(self.logger, "tools/call {}", request.name);
        let response = self
            .server
            .call_tool(&request.name, request.arguments.map(Value::Object))
            .await;
        Ok(to_call_result(response))
    }
}

fn to_mcp_tool(tool: &Tool) -> McpTool {
    let schema = tool.input_schema.as_object().cloned().unwrap_or_default();
    McpTool::new(tool.name.clone(), tool.description.clone(), Arc::new(schema))
}

/// Failures are already `Error: ...` text, so every response is a success
fn to_call_result(response: ToolResponse) -> CallToolResult {
    let content = response
        .content
        .into_iter()
        .map(|item| match item {
            ContentItem::Text { text } => Content::text(text),
        })
        .collect();
    CallToolResult::success(content)
}

/// Serve MCP on `input`/`output` until the client closes its input
pub async fn serve<R, W>(input: R, output: W, handler: CodexMcpHandler) -> ServerResult<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let logger = handler.logger.clone();
    let (service_io, guard) = framing::guard(input, output, logger.clone());

    let service = handler
        .serve(service_io)
        .await
        .map_err(|e| ServerError::Initialize(e.to_string()))?;
    log_info!(logger, "client connected");

    let reason = service
        .waiting()
        .await
        .map_err(|e| ServerError::Task(e.to_string()))?;
    log_debug!(logger, "session ended: {:?}", reason);

    guard.await.map_err(|e| ServerError::Task(e.to_string()))?
}

//! Tool handlers
//!
//! Each handler builds its argument vector, runs Codex through the bridge
//! and wraps stdout in the tool's banner.

use std::path::PathBuf;

use super::arguments::{consult_args, existing_project_doc, history_args, review_args, status_args};
use crate::bridge::{BridgeResult, CodexBridge, HistoryPage};
use crate::logging::SharedLogger;
use crate::types::{ConsultArgs, ReviewArgs, ToolInvocation, ToolResponse};
use crate::log_info;

/// Shown for any failure of `codex_history`
pub const NO_HISTORY_MESSAGE: &str = "No history available or codex --history command not supported.";

pub struct CodexTools {
    bridge: CodexBridge,
    project_doc: PathBuf,
    logger: SharedLogger,
}

impl CodexTools {
    /// `project_doc` is checked for existence on every review call
    pub fn new(bridge: CodexBridge, project_doc: impl Into<PathBuf>, logger: SharedLogger) -> Self {
        Self {
            bridge,
            project_doc: project_doc.into(),
            logger,
        }
    }

    pub async fn handle(&self, invocation: ToolInvocation) -> BridgeResult<ToolResponse> {
        match invocation {
            ToolInvocation::Review(args) => self.review(&args).await,
            ToolInvocation::Consult(args) => self.consult(&args).await,
            ToolInvocation::Status(_) => self.status().await,
            ToolInvocation::History(args) => Ok(self.history(args.limit).await),
        }
    }

    async fn review(&self, args: &ReviewArgs) -> BridgeResult<ToolResponse> {
        let doc = if args.include_project_context {
            existing_project_doc(&self.project_doc)
        } else {
            None
        };
        let output = self.bridge.execute(review_args(args, doc)).await?;
        Ok(ToolResponse::text(format!("Codex Review Response:\n\n{}", output)))
    }

    async fn consult(&self, args: &ConsultArgs) -> BridgeResult<ToolResponse> {
        let output = self.bridge.execute(consult_args(args)).await?;
        Ok(ToolResponse::text(format!("Codex Consultation:\n\n{}", output)))
    }

    async fn status(&self) -> BridgeResult<ToolResponse> {
        let output = self.bridge.execute(status_args()).await?;
        Ok(ToolResponse::text(format!("Project Status from Codex:\n\n{}", output)))
    }

    async fn history(&self, limit: usize) -> ToolResponse {
        match self.bridge.execute(history_args()).await {
            Ok(output) => ToolResponse::text(HistoryPage::from_output(&output, limit).render()),
            Err(e) => {
                log_info!(self.logger, "History unavailable: {}", e);
                ToolResponse::text(NO_HISTORY_MESSAGE)
            }
        }
    }
}

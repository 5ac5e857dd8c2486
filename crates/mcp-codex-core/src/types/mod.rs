//! Core types shared by the bridge and the server
//!
//! - `Tool`: catalog entry returned by `tools/list`
//! - `ToolResponse`: the envelope every `tools/call` returns
//! - `ToolInvocation`: a validated, strongly-typed tool call

mod tool;
mod invocation;

pub use tool::{Tool, ToolResponse, ContentItem};
pub use invocation::{
    ToolName, ToolInvocation, ReviewArgs, ConsultArgs, StatusArgs, HistoryArgs,
    DEFAULT_HISTORY_LIMIT,
};

//! The four Codex tools
//!
//! ```text
//! tools/call { name, arguments }
//!        │
//!        ▼
//! CodexToolServer::call_tool      parse → ToolInvocation, errors → "Error: ..."
//!        │
//!        ▼
//! CodexTools::handle              per-tool argv + banner
//!        │
//!        ▼
//! CodexBridge::execute            credential → codex -q ... → stdout
//! ```

mod catalog;
pub mod arguments;
mod service;
mod server;

pub use catalog::catalog;
pub use service::{CodexTools, NO_HISTORY_MESSAGE};
pub use server::CodexToolServer;

//! Logging for the bridge
//!
//! Two layers, used side by side:
//! - `Logger` trait objects handed to components (`ConsoleLogger`, `NoOpLogger`)
//! - `file_logger`, a global debug log for when stderr isn't captured by the MCP host
//!
//! Nothing here ever writes to stdout: stdout is the JSON-RPC channel.

mod traits;
mod noop;
mod console;
pub mod file_logger;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;

pub use file_logger::LogLevel;

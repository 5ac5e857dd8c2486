//! Bridge error taxonomy

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between a tool call and Codex's output
///
/// These propagate as values through the bridge; they are turned into
/// `Error: <message>` text only at the dispatch boundary.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error(
        "{var} not found. Please set it in your environment or in a .env file (checked {})",
        display_paths(.checked)
    )]
    CredentialMissing { var: String, checked: Vec<PathBuf> },

    #[error("Failed to execute {program}: {source}")]
    LaunchFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", exit_message(.code, .signal, .detail))]
    NonZeroExit {
        code: Option<i32>,
        signal: Option<i32>,
        detail: String,
    },

    #[error(
        "Codex {stream} exceeded the {limit}-byte capture limit. Codex has no smaller-output \
         mode, so narrow the request (a specific file, a smaller diff, or a single question) and try again."
    )]
    OutputTooLarge { stream: &'static str, limit: usize },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Failed to capture codex output: {0}")]
    Capture(#[source] std::io::Error),
}

pub type BridgeResult<T> = Result<T, BridgeError>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" and ")
}

fn exit_message(code: &Option<i32>, signal: &Option<i32>, detail: &str) -> String {
    match (*code, *signal) {
        (Some(code), _) => format!("Codex exited with code {}: {}", code, detail),
        (None, Some(signal)) => format!("Codex was terminated by signal {}: {}", signal, detail),
        (None, None) => format!("Codex exited abnormally: {}", detail),
    }
}

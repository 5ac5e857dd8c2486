//! Typed tool invocations
//!
//! The raw `{ name, arguments }` payload from `tools/call` is turned into a
//! `ToolInvocation` once, at the boundary. Unknown tool names and unknown
//! or mistyped argument fields are rejected here, so handlers only ever see
//! well-formed input.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::bridge::{BridgeError, BridgeResult};

/// Number of history sessions shown when the caller doesn't say
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// The fixed set of tools this server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    Review,
    Consult,
    Status,
    History,
}

impl ToolName {
    /// Catalog order
    pub const ALL: [ToolName; 4] = [
        ToolName::Review,
        ToolName::Consult,
        ToolName::Status,
        ToolName::History,
    ];

    /// Wire name used in `tools/list` and `tools/call`
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Review => "codex_review",
            ToolName::Consult => "codex_consult",
            ToolName::Status => "codex_status",
            ToolName::History => "codex_history",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments for `codex_review`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewArgs {
    pub prompt: String,
    #[serde(default = "default_true")]
    pub include_project_context: bool,
    /// Reserved. Codex always runs with `-q`; this value changes nothing.
    #[serde(default)]
    pub quiet: Option<bool>,
}

/// Arguments for `codex_consult`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsultArgs {
    pub question: String,
    /// Reserved, see `ReviewArgs::quiet`.
    #[serde(default)]
    pub quiet: Option<bool>,
}

/// Arguments for `codex_status` (none)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusArgs {}

/// Arguments for `codex_history`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryArgs {
    #[serde(default = "default_history_limit", deserialize_with = "deserialize_limit")]
    pub limit: usize,
}

impl Default for HistoryArgs {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// The schema says `number`, so accept `3` and `3.0` alike; reject negatives and fractions.
fn deserialize_limit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let value = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).map_err(de::Error::custom);
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64 => Ok(f as usize),
        _ => Err(de::Error::custom(format!(
            "limit must be a non-negative whole number, got {}",
            value
        ))),
    }
}

/// A validated tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    Review(ReviewArgs),
    Consult(ConsultArgs),
    Status(StatusArgs),
    History(HistoryArgs),
}

impl ToolInvocation {
    /// Validate a raw `tools/call` payload
    ///
    /// Missing or `null` arguments are treated as an empty object.
    pub fn parse(name: &str, arguments: Option<Value>) -> BridgeResult<Self> {
        let tool = ToolName::from_name(name)
            .ok_or_else(|| BridgeError::UnknownTool(name.to_string()))?;

        let arguments = match arguments {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(value) => value,
        };

        Ok(match tool {
            ToolName::Review => ToolInvocation::Review(decode(tool, arguments)?),
            ToolName::Consult => ToolInvocation::Consult(decode(tool, arguments)?),
            ToolName::Status => ToolInvocation::Status(decode(tool, arguments)?),
            ToolName::History => ToolInvocation::History(decode(tool, arguments)?),
        })
    }
}

fn decode<T: DeserializeOwned>(tool: ToolName, arguments: Value) -> BridgeResult<T> {
    serde_json::from_value(arguments).map_err(|e| BridgeError::InvalidArguments {
        tool: tool.as_str().to_string(),
        reason: e.to_string(),
    })
}

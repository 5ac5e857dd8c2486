//! Tool catalog and response envelope types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition as advertised by `tools/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (e.g. `codex_review`)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the input arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// One element of a response's `content` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text { text: String },
}

/// Envelope returned for every tool call, successful or not
///
/// Failures are rendered into the text rather than surfaced as protocol
/// errors, so a client always has something to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<ContentItem>,
}

impl ToolResponse {
    /// A response holding a single text element
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Text { text: text.into() }],
        }
    }

    /// A response describing a failure as `Error: <message>`
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::text(format!("Error: {}", message))
    }

    /// All text elements concatenated
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|item| match item {
                ContentItem::Text { text } => text.as_str(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_serializes_input_schema_key() {
        let tool = Tool::new("codex_status", "Status", json!({ "type": "object", "properties": {} }));
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["name"], "codex_status");
        assert_eq!(value["inputSchema"]["type"], "object");
    }

    #[test]
    fn test_response_envelope_shape() {
        let response = ToolResponse::text("Codex Consultation:\n\nhi");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "content": [ { "type": "text", "text": "Codex Consultation:\n\nhi" } ] })
        );
    }

    #[test]
    fn test_error_response() {
        let response = ToolResponse::error("Unknown tool: nope");
        assert_eq!(response.joined_text(), "Error: Unknown tool: nope");
    }
}

//! Static tool catalog served by `tools/list`

use once_cell::sync::Lazy;
use serde_json::json;

use crate::types::{Tool, ToolName, DEFAULT_HISTORY_LIMIT};

static CATALOG: Lazy<Vec<Tool>> = Lazy::new(|| {
    ToolName::ALL.into_iter().map(definition).collect()
});

/// All tools, in a fixed order
pub fn catalog() -> &'static [Tool] {
    &CATALOG
}

fn definition(tool: ToolName) -> Tool {
    match tool {
        ToolName::Review => Tool::new(
            tool.as_str(),
            "Request a code review or evaluation from Codex. Use this for reviewing changes, \
             plans, or getting peer review on implementations.",
            json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "The review request or question for Codex"
                    },
                    "include_project_context": {
                        "type": "boolean",
                        "description": "Include CLAUDE.md as project context (default: true)",
                        "default": true
                    },
                    "quiet": {
                        "type": "boolean",
                        "description": "Reserved. Codex always runs in quiet mode."
                    }
                },
                "required": ["prompt"]
            }),
        ),
        ToolName::Consult => Tool::new(
            tool.as_str(),
            "Consult with Codex about implementation decisions, best practices, or get guidance \
             on how to approach a problem.",
            json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "The question or topic to discuss with Codex"
                    },
                    "quiet": {
                        "type": "boolean",
                        "description": "Reserved. Codex always runs in quiet mode."
                    }
                },
                "required": ["question"]
            }),
        ),
        ToolName::Status => Tool::new(
            tool.as_str(),
            "Get a summary of the current project state from Codex",
            json!({
                "type": "object",
                "properties": {}
            }),
        ),
        ToolName::History => Tool::new(
            tool.as_str(),
            "View past Codex consultation sessions",
            json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "number",
                        "description": format!(
                            "Number of recent sessions to show (default: {})",
                            DEFAULT_HISTORY_LIMIT
                        ),
                        "default": DEFAULT_HISTORY_LIMIT
                    }
                }
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_and_names() {
        let names: Vec<&str> = catalog().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["codex_review", "codex_consult", "codex_status", "codex_history"]);
    }

    #[test]
    fn test_catalog_schemas() {
        let review = &catalog()[0];
        assert_eq!(review.input_schema["required"], json!(["prompt"]));
        assert_eq!(review.input_schema["properties"]["include_project_context"]["default"], json!(true));

        let status = &catalog()[2];
        assert_eq!(status.input_schema["properties"], json!({}));
        assert!(status.input_schema.get("required").is_none());

        let history = &catalog()[3];
        assert_eq!(history.input_schema["properties"]["limit"]["type"], "number");
        assert_eq!(history.input_schema["properties"]["limit"]["default"], json!(5));
    }
}

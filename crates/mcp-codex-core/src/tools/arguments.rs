//! Codex argument vectors for each tool
//!
//! These are pure; the quiet flag is added later by `CodexCommand`.

use std::path::Path;

use crate::types::{ConsultArgs, ReviewArgs};

pub const PROJECT_DOC_FLAG: &str = "--project-doc";
pub const HISTORY_FLAG: &str = "--history";
pub const STATUS_PROMPT: &str = "summarize the current state of the project";

/// `project_doc` is the documentation file if it exists; it is only used
/// when the caller asked for project context.
pub fn review_args(args: &ReviewArgs, project_doc: Option<&Path>) -> Vec<String> {
    let mut argv = Vec::with_capacity(3);
    if args.include_project_context {
        if let Some(doc) = project_doc {
            argv.push(PROJECT_DOC_FLAG.to_string());
            argv.push(doc.to_string_lossy().into_owned());
        }
    }
    argv.push(args.prompt.clone());
    argv
}

pub fn consult_args(args: &ConsultArgs) -> Vec<String> {
    vec![args.question.clone()]
}

pub fn status_args() -> Vec<String> {
    vec![STATUS_PROMPT.to_string()]
}

pub fn history_args() -> Vec<String> {
    vec![HISTORY_FLAG.to_string()]
}

/// `Some(path)` if the project documentation file exists
pub fn existing_project_doc(path: &Path) -> Option<&Path> {
    path.is_file().then_some(path)
}

//! Splitting `codex --history` output into sessions and paging it

/// Lines starting with this open a new session record
pub const SESSION_HEADER: &str = "Session:";
/// Placed between records in the rendered page
pub const RECORD_SEPARATOR: &str = "\n---\n";

/// Split history text into session records, in the order they appear
///
/// Every line keeps its trailing newline. Text before the first header
/// forms a record of its own. Empty input yields no records.
///
/// Lines come from `str::lines`, which drops the `\r` of a CRLF ending, so
/// records always end in a bare `\n`.
pub fn segment_sessions(text: &str) -> Vec<String> {
    let mut sessions = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.starts_with(SESSION_HEADER) && !current.is_empty() {
            sessions.push(std::mem::take(&mut current));
        }
        current.push_str(line);
        current.push('\n');
    }

    if !current.is_empty() {
        sessions.push(current);
    }
    sessions
}

/// The first `limit` sessions plus how many exist in total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage {
    pub sessions: Vec<String>,
    pub total: usize,
}

impl HistoryPage {
    pub fn new(mut sessions: Vec<String>, limit: usize) -> Self {
        let total = sessions.len();
        sessions.truncate(limit);
        Self { sessions, total }
    }

    pub fn from_output(text: &str, limit: usize) -> Self {
        Self::new(segment_sessions(text), limit)
    }

    pub fn shown(&self) -> usize {
        self.sessions.len()
    }

    pub fn body(&self) -> String {
        self.sessions.join(RECORD_SEPARATOR)
    }

    /// Banner plus body, as returned by `codex_history`
    pub fn render(&self) -> String {
        format!(
            "Recent Codex Sessions (showing {} of {}):\n\n{}",
            self.shown(),
            self.total,
            self.body()
        )
    }
}

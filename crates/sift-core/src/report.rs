//! Run outcome aggregation and console report rendering.
//!
//! The aggregator is read-only over final session state: it looks up the
//! search and summary keys, classifies the overall outcome, and renders a
//! fixed-order textual report. It never mutates the session.

use std::fmt;

use crate::session::{Session, state_keys};

/// Character threshold above which the search section is truncated for
/// display.
const SEARCH_DISPLAY_LIMIT: usize = 500;

/// Fixed diagnostic attached to any run that did not produce both outputs.
const PARTIAL_FAILURE_DIAGNOSTIC: &str = "Partial or full failure in multi-agent process.";

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Both stages produced non-empty output.
    Completed,
    /// At least one stage left its output key unwritten or empty.
    Incomplete,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// Read-only snapshot of a finished run, taken once after the event stream
/// is drained. Not persisted.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The query the run was started with.
    pub initial_query: String,
    /// Identity of the session the run used.
    pub session_id: String,
    /// Raw retrieved text, when the search stage succeeded.
    pub search_result: Option<String>,
    /// Condensed text, when the summarize stage succeeded.
    pub summary: Option<String>,
    /// Overall classification.
    pub status: RunStatus,
    /// Fixed diagnostic, present exactly when the status is incomplete.
    pub error: Option<String>,
}

impl RunResult {
    /// Classifies a finished run from the final session state.
    ///
    /// Status derives purely from output-key presence: both the search and
    /// summary keys present and non-empty means completed, anything else is
    /// incomplete with the fixed diagnostic. Which of the two values is
    /// absent tells a reader which stage failed. `fallback_query` covers the
    /// case where the seeded query key itself is missing.
    pub async fn from_session(session: &Session, fallback_query: &str) -> Self {
        let initial_query = session
            .state
            .get_str(state_keys::INITIAL_QUERY)
            .await
            .unwrap_or_else(|| fallback_query.to_string());
        let search_result = session
            .state
            .get_str(state_keys::SEARCH_RESULT)
            .await
            .filter(|text| !text.is_empty());
        let summary = session
            .state
            .get_str(state_keys::SUMMARIZED_RESULT)
            .await
            .filter(|text| !text.is_empty());

        let (status, error) = if search_result.is_some() && summary.is_some() {
            (RunStatus::Completed, None)
        } else {
            (
                RunStatus::Incomplete,
                Some(PARTIAL_FAILURE_DIAGNOSTIC.to_string()),
            )
        };

        Self {
            initial_query,
            session_id: session.id.clone(),
            search_result,
            summary,
            status,
            error,
        }
    }

    /// Renders the console report.
    ///
    /// Section order is fixed: query, session id, status, truncated search
    /// block, full summary block. Both blocks render even on failure, with an
    /// absence marker where a stage produced nothing, so a reader can tell
    /// "search ok, summary failed" from "both failed".
    pub fn render(&self) -> String {
        let heavy_rule = "=".repeat(80);
        let light_rule = "-".repeat(80);
        let section_rule = "-".repeat(40);

        let mut out = String::new();
        out.push_str(&heavy_rule);
        out.push_str("\n🔍 MULTI-AGENT SYSTEM RESULTS\n");
        out.push_str(&heavy_rule);
        out.push('\n');
        out.push_str(&format!("📝 Query: {}\n", self.initial_query));
        out.push_str(&format!("🆔 Session ID: {}\n", self.session_id));
        out.push_str(&format!("📊 Status: {}\n", self.status));
        if let Some(error) = &self.error {
            out.push_str(&format!("❌ Error: {error}\n"));
        }
        out.push_str(&light_rule);
        out.push('\n');

        out.push_str("\n🔍 SEARCH RESULTS:\n");
        out.push_str(&section_rule);
        out.push('\n');
        match &self.search_result {
            Some(text) => out.push_str(&truncate_for_display(text)),
            None => out.push_str("No results"),
        }
        out.push('\n');

        out.push_str("\n📄 SUMMARY:\n");
        out.push_str(&section_rule);
        out.push('\n');
        out.push_str(self.summary.as_deref().unwrap_or("No summary available"));
        out.push('\n');

        out.push('\n');
        out.push_str(&heavy_rule);
        out.push('\n');
        out
    }
}

/// Truncates `text` to the display limit, appending a marker that carries the
/// true total length when anything was cut.
fn truncate_for_display(text: &str) -> String {
    let total = text.chars().count();
    if total <= SEARCH_DISPLAY_LIMIT {
        return text.to_string();
    }

    let shown: String = text.chars().take(SEARCH_DISPLAY_LIMIT).collect();
    format!("{shown}...\n[Results truncated - Total length: {total} characters]")
}

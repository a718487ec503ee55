//! Progress events emitted during a pipeline run.
//!
//! Events form an ordered, append-only sequence per run: stage order first,
//! then yield order within a stage. They are streamed to the caller and not
//! retained past reporting.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::Message;

/// The subset of session state keys one step changed, for audit purposes.
pub type StateDelta = HashMap<String, Value>;

/// An immutable record of one observable pipeline step.
///
/// Ordering is defined by stream position, not by the timestamp; the
/// timestamp is audit metadata only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// The agent (or pipeline) that produced this event.
    pub author: String,
    /// Zero or more text fragments describing the step.
    pub message: Message,
    /// State keys this step wrote, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_delta: Option<StateDelta>,
    /// When the event was produced.
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Creates a text-only event.
    pub fn text(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            message: Message::text(text),
            state_delta: None,
            timestamp: Utc::now(),
        }
    }

    /// Creates an event that records the state keys written by this step.
    pub fn with_state_delta<K, V>(
        author: impl Into<String>,
        text: impl Into<String>,
        delta: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let delta: StateDelta = delta
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            author: author.into(),
            message: Message::text(text),
            state_delta: Some(delta),
            timestamp: Utc::now(),
        }
    }

    /// All text fragments of this event joined with a space.
    pub fn joined_text(&self) -> String {
        self.message.joined_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_delta_records_written_keys() {
        let event = Event::with_state_delta("search", "done", [("search_result", "text")]);
        let delta = event.state_delta.expect("delta should be present");
        assert_eq!(delta.get("search_result"), Some(&Value::from("text")));
    }

    #[test]
    fn text_event_has_no_delta() {
        let event = Event::text("search", "Searching for: rust");
        assert!(event.state_delta.is_none());
        assert_eq!(event.joined_text(), "Searching for: rust");
    }
}

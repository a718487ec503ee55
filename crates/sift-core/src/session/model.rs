//! Session domain model.
//!
//! This module contains the core Session entity shared across pipeline
//! stages for the duration of one run.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Mutable keyed state shared by every holder of the owning session.
///
/// Keys, once written, may be overwritten but never removed during a run;
/// there is deliberately no remove operation. The lock exists because the
/// session is aliased (`Arc<Session>` held by the store and by the invocation
/// context), not because stages race: only one agent runs at any instant.
#[derive(Debug, Default)]
pub struct SessionState {
    entries: RwLock<HashMap<String, Value>>,
}

impl SessionState {
    /// Returns the value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    /// Returns the value stored under `key` as a string, if it is one.
    pub async fn get_str(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .await
            .get(key)
            .and_then(|value| value.as_str().map(str::to_string))
    }

    /// Writes `value` under `key`, overwriting any previous value.
    pub async fn put(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.write().await.insert(key.into(), value.into());
    }

    /// Returns true when `key` has been written.
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// Copies the current state map, for inspection after a run.
    pub async fn snapshot(&self) -> HashMap<String, Value> {
        self.entries.read().await.clone()
    }
}

/// A single run's session.
///
/// Identity is the (application name, user id, session id) tuple; the id is
/// immutable once assigned. The state map is the only mutable part.
#[derive(Debug)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Application the session belongs to
    pub app_name: String,
    /// User the session belongs to
    pub user_id: String,
    /// Keyed mutable state shared across stages
    pub state: SessionState,
}

impl Session {
    /// Creates a new session with an empty state map.
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            app_name: app_name.into(),
            user_id: user_id.into(),
            state: SessionState::default(),
        }
    }

    /// Generates a random unique session id.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_overwrites_but_keys_persist() {
        let state = SessionState::default();
        state.put("search_result", "first").await;
        state.put("search_result", "second").await;

        assert_eq!(state.get_str("search_result").await.as_deref(), Some("second"));
        assert!(state.contains("search_result").await);
    }

    #[tokio::test]
    async fn get_str_rejects_non_strings() {
        let state = SessionState::default();
        state.put("count", 3).await;

        assert!(state.get_str("count").await.is_none());
        assert_eq!(state.get("count").await, Some(serde_json::Value::from(3)));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(Session::generate_id(), Session::generate_id());
    }
}

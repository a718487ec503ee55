//! Session storage service.
//!
//! Defines the interface for session creation and retrieval, plus the
//! in-memory implementation used for single-process runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::Session;
use crate::error::{Result, SiftError};

/// Full identity of a session within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SessionKey {
    app_name: String,
    user_id: String,
    session_id: String,
}

impl SessionKey {
    fn new(app_name: &str, user_id: &str, session_id: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
        }
    }
}

/// An abstract store of per-run sessions, addressed by
/// (application, user, session) identity.
///
/// Implementations own their sessions; callers receive shared references and
/// mutate session state in place.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Creates a session under the given identity.
    ///
    /// # Returns
    ///
    /// - `Ok(session)`: the newly created session
    /// - `Err(Conflict)`: a session with this identity already exists; two
    ///   logically distinct runs are never silently merged
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Arc<Session>>;

    /// Looks up a session by identity.
    ///
    /// # Returns
    ///
    /// - `Ok(session)`: the stored session
    /// - `Err(NotFound)`: no session under this identity
    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Arc<Session>>;
}

/// In-memory session storage, scoped to the process lifetime.
///
/// No persistence across restarts; sessions are discarded with the store.
#[derive(Default)]
pub struct InMemorySessionService {
    sessions: RwLock<HashMap<SessionKey, Arc<Session>>>,
}

impl InMemorySessionService {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Arc<Session>> {
        let key = SessionKey::new(app_name, user_id, session_id);
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&key) {
            return Err(SiftError::conflict("session", session_id));
        }

        let session = Arc::new(Session::new(app_name, user_id, session_id));
        sessions.insert(key, Arc::clone(&session));
        tracing::debug!(app_name, user_id, session_id, "session created");
        Ok(session)
    }

    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Arc<Session>> {
        let key = SessionKey::new(app_name, user_id, session_id);
        self.sessions
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| SiftError::not_found("session", session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get_returns_same_session() {
        let store = InMemorySessionService::new();
        let created = store.create_session("app", "user", "s1").await.unwrap();
        let fetched = store.get_session("app", "user", "s1").await.unwrap();

        assert!(Arc::ptr_eq(&created, &fetched));
        assert_eq!(fetched.id, "s1");
    }

    #[tokio::test]
    async fn mutation_is_visible_through_refetch() {
        let store = InMemorySessionService::new();
        let created = store.create_session("app", "user", "s1").await.unwrap();
        created.state.put("search_result", "found it").await;

        let fetched = store.get_session("app", "user", "s1").await.unwrap();
        assert_eq!(
            fetched.state.get_str("search_result").await.as_deref(),
            Some("found it")
        );
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let store = InMemorySessionService::new();
        store.create_session("app", "user", "s1").await.unwrap();

        let err = store.create_session("app", "user", "s1").await.unwrap_err();
        assert!(matches!(err, SiftError::Conflict { .. }));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = InMemorySessionService::new();
        let err = store.get_session("app", "user", "missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn identity_is_the_full_tuple() {
        let store = InMemorySessionService::new();
        store.create_session("app", "user-a", "s1").await.unwrap();

        // Same session id under another user is a distinct session.
        store.create_session("app", "user-b", "s1").await.unwrap();
        assert!(store.get_session("other-app", "user-a", "s1").await.is_err());
    }
}

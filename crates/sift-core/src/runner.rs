//! Drives a root agent against a session store.

use std::sync::Arc;

use async_stream::stream;
use futures::StreamExt;

use crate::agent::{Agent, EventStream, InvocationContext};
use crate::error::Result;
use crate::message::Message;
use crate::session::{Session, SessionService, state_keys};

/// Binds a root agent to a session service under one application identity.
///
/// The runner opens the session, seeds it, and hands out the run's event
/// stream. A run is complete only when that stream is exhausted; events are
/// the only channel while it is in flight.
pub struct Runner {
    app_name: String,
    agent: Arc<dyn Agent>,
    sessions: Arc<dyn SessionService>,
}

impl Runner {
    /// Creates a runner for the given application identity.
    pub fn new(
        app_name: impl Into<String>,
        agent: Arc<dyn Agent>,
        sessions: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            agent,
            sessions,
        }
    }

    /// The application identity this runner creates sessions under.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Starts a run: creates the session, seeds the original query under
    /// [`state_keys::INITIAL_QUERY`], and returns the root agent's event
    /// stream.
    ///
    /// The query is seeded into state so stages and the aggregator can
    /// recover it even if it is never read from the message again. Drain the
    /// returned stream to completion, then fetch the authoritative final
    /// state with [`Runner::session`].
    ///
    /// # Errors
    ///
    /// Returns an error when the session cannot be created (for example a
    /// duplicate session id).
    pub async fn run(
        &self,
        user_id: &str,
        session_id: &str,
        new_message: Message,
    ) -> Result<EventStream<'static>> {
        let session = self
            .sessions
            .create_session(&self.app_name, user_id, session_id)
            .await?;
        session
            .state
            .put(state_keys::INITIAL_QUERY, new_message.joined_text())
            .await;
        tracing::info!(
            app_name = %self.app_name,
            user_id,
            session_id,
            agent = self.agent.name(),
            "run started"
        );

        let agent = Arc::clone(&self.agent);
        let ctx = InvocationContext::new(session, new_message);
        Ok(Box::pin(stream! {
            let mut events = agent.run(ctx);
            while let Some(event) = events.next().await {
                yield event;
            }
            tracing::debug!("event stream exhausted");
        }))
    }

    /// Re-fetches the session from the store.
    ///
    /// Always go through the store for the final state rather than keeping a
    /// reference from before the run; a store is free to copy instead of
    /// alias.
    pub async fn session(&self, user_id: &str, session_id: &str) -> Result<Arc<Session>> {
        self.sessions
            .get_session(&self.app_name, user_id, session_id)
            .await
    }
}

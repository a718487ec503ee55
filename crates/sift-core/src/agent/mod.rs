//! Agent contract.
//!
//! An agent is a polymorphic unit with a single capability: given an
//! invocation context, produce a lazy, finite sequence of events, mutating
//! session state as a side effect. The pipeline depends only on this
//! contract, never on concrete agent identity.

mod sequential;

pub use sequential::SequentialAgent;

use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;

use crate::event::Event;
use crate::message::Message;
use crate::session::Session;

/// A lazy, finite event sequence produced by one agent invocation.
///
/// Elements are produced incrementally, never as a pre-computed batch. The
/// stream is not restartable: consume it at most once.
pub type EventStream<'a> = Pin<Box<dyn Stream<Item = Event> + Send + 'a>>;

/// Everything an agent sees for one invocation: the shared session and the
/// pipeline's original input message.
///
/// Cloning is cheap; clones alias the same session, so state written by one
/// holder is visible to all subsequent holders within the run.
#[derive(Clone)]
pub struct InvocationContext {
    /// The shared, mutable session for this run.
    pub session: Arc<Session>,
    /// The original input message. Stages read predecessor output from
    /// session state, not from this message.
    pub input: Message,
}

impl InvocationContext {
    /// Creates a context for one run.
    pub fn new(session: Arc<Session>, input: Message) -> Self {
        Self { session, input }
    }
}

/// A single pipeline stage.
///
/// # Failure contract
///
/// Operational failures (provider error, missing credentials, absent upstream
/// state) never cross this boundary as errors or panics. An agent that cannot
/// do its work yields one diagnostic event and ends its stream, leaving unset
/// exactly the state keys it would have written on success. An absent
/// upstream key means "upstream incomplete", not a programming error.
pub trait Agent: Send + Sync {
    /// Stable name, used as the author of every event this agent yields.
    fn name(&self) -> &str;

    /// Produces this agent's event stream for one invocation.
    fn run(&self, ctx: InvocationContext) -> EventStream<'_>;
}

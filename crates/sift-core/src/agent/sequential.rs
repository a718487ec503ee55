//! Linear composition of agents.

use std::sync::Arc;

use async_stream::stream;
use futures::StreamExt;

use super::{Agent, EventStream, InvocationContext};
use crate::error::{Result, SiftError};

/// Runs an ordered list of sub-agents one after another, forwarding every
/// event it observes to its own stream.
///
/// Each sub-agent receives the same shared session, already mutated by its
/// predecessors, and the unchanged original input message. The pipeline never
/// inspects a stage's outcome between stages: stage *i*+1 runs even when
/// stage *i* ended on a diagnostic event and wrote nothing, so partial
/// results still flow downstream and into the final report. Composition is
/// strictly linear: no branching, looping, or conditional skipping.
pub struct SequentialAgent {
    name: String,
    sub_agents: Vec<Arc<dyn Agent>>,
}

impl std::fmt::Debug for SequentialAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequentialAgent")
            .field("name", &self.name)
            .field("sub_agents", &self.sub_agents.len())
            .finish()
    }
}

impl SequentialAgent {
    /// Creates a pipeline from a non-empty, ordered list of sub-agents.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when `sub_agents` is empty.
    pub fn new(name: impl Into<String>, sub_agents: Vec<Arc<dyn Agent>>) -> Result<Self> {
        if sub_agents.is_empty() {
            return Err(SiftError::config(
                "a sequential agent requires at least one sub-agent",
            ));
        }
        Ok(Self {
            name: name.into(),
            sub_agents,
        })
    }

    /// Number of stages in this pipeline.
    pub fn len(&self) -> usize {
        self.sub_agents.len()
    }

    /// Always false; construction rejects empty pipelines.
    pub fn is_empty(&self) -> bool {
        self.sub_agents.is_empty()
    }
}

impl Agent for SequentialAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: InvocationContext) -> EventStream<'_> {
        Box::pin(stream! {
            for agent in &self.sub_agents {
                tracing::debug!(stage = agent.name(), "running pipeline stage");
                let mut events = agent.run(ctx.clone());
                while let Some(event) = events.next().await {
                    yield event;
                }
            }
        })
    }
}

//! Core orchestration contract for the sift research pipeline.
//!
//! This crate defines how a sequential multi-agent pipeline propagates
//! shared session state, emits a stream of progress events, and classifies
//! the overall outcome of a run. It contains no network code; provider-backed
//! agents live in `sift-agents`.
//!
//! # Module Structure
//!
//! - `agent`: The [`Agent`](agent::Agent) contract and the sequential pipeline
//! - `event`: Immutable progress events with optional state deltas
//! - `message`: Text message payloads
//! - `session`: Session model, well-known state keys, and in-memory storage
//! - `runner`: Binds a root agent to a session store and drives a run
//! - `report`: Outcome classification and console report rendering
//! - `error`: Shared error type

pub mod agent;
pub mod error;
pub mod event;
pub mod message;
pub mod report;
pub mod runner;
pub mod session;

// Re-export common error type
pub use error::{Result, SiftError};

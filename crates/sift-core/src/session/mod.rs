//! Session domain module.
//!
//! A session is the mutable per-run state container shared by every pipeline
//! stage. It is owned by a [`SessionService`] for its lifetime; stages hold a
//! reference and mutate the state map in place.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `SessionState`)
//! - `service`: Session storage interface and in-memory implementation
//! - `state_keys`: Well-known state keys and their stage ownership

mod model;
mod service;
pub mod state_keys;

// Re-export public API
pub use model::{Session, SessionState};
pub use service::{InMemorySessionService, SessionService};

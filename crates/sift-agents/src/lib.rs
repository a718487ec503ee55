//! Provider-backed agents for the sift pipeline.
//!
//! Two concrete [`sift_core::agent::Agent`] implementations live here: a
//! retrieval agent backed by SerpAPI and a synthesis agent backed by the
//! OpenAI chat completions API. Both follow the soft-failure contract: any
//! operational problem becomes a diagnostic event, never an error or panic.
//!
//! Credentials are read from the environment exactly once, via
//! [`Credentials::from_env`], before any client exists.

pub mod config;
pub mod provider;
pub mod search;
pub mod summarize;

pub use config::Credentials;
pub use search::SearchAgent;
pub use summarize::{EmbeddingSettings, LlmSettings, SummarizeAgent};

//! Provider credential configuration.
//!
//! All three provider keys are read from the process environment exactly
//! once, before any client is constructed or any network activity happens.
//! Nothing else in this crate touches the environment; agents receive their
//! keys through explicit settings structs.

use std::env;

use sift_core::{Result, SiftError};

/// Environment variable holding the Gemini API key (embedding backend).
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// Environment variable holding the SerpAPI key (search backend).
pub const SERPAPI_API_KEY: &str = "SERPAPI_API_KEY";
/// Environment variable holding the OpenAI key (summarization backend).
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// API keys for the three external providers the pipeline talks to.
///
/// All three are required up front; a run never starts with a partial set.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Gemini key, consumed by the summarize agent's embedding settings.
    pub google_api_key: String,
    /// SerpAPI key, consumed by the search agent.
    pub serpapi_api_key: String,
    /// OpenAI key, consumed by the summarize agent's language model.
    pub openai_api_key: String,
}

impl Credentials {
    /// Reads all required keys from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` listing every absent or empty variable,
    /// so the caller can report them all at once instead of one per attempt.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds credentials from an arbitrary lookup function.
    ///
    /// Empty and whitespace-only values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut fetch = |name: &str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let google_api_key = fetch(GOOGLE_API_KEY);
        let serpapi_api_key = fetch(SERPAPI_API_KEY);
        let openai_api_key = fetch(OPENAI_API_KEY);

        if !missing.is_empty() {
            return Err(SiftError::MissingCredentials(missing));
        }

        Ok(Self {
            google_api_key,
            serpapi_api_key,
            openai_api_key,
        })
    }
}

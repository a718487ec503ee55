//! Search stage backed by SerpAPI.
//!
//! The agent resolves its query from the input message (falling back to the
//! seeded query in session state), asks SerpAPI for results, flattens them
//! into one text block, and stores it under
//! [`state_keys::SEARCH_RESULT`](sift_core::session::state_keys::SEARCH_RESULT).

use std::time::Duration;

use async_stream::stream;
use reqwest::Client;
use serde_json::Value;
use sift_core::agent::{Agent, EventStream, InvocationContext};
use sift_core::event::Event;
use sift_core::session::state_keys;

use crate::provider::{ProviderError, status_error};

const BASE_URL: &str = "https://serpapi.com/search.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Retrieval agent. Reads the query, writes `search_result`.
pub struct SearchAgent {
    name: String,
    client: SerpApiClient,
}

impl SearchAgent {
    /// Creates a search agent with the given SerpAPI key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            name: "SerpApiSearchAgent".to_string(),
            client: SerpApiClient::new(api_key),
        }
    }

    /// The query is the joined input message, or the seeded session query
    /// when the message carries no text.
    async fn resolve_query(&self, ctx: &InvocationContext) -> Option<String> {
        let from_message = ctx.input.joined_text();
        if !from_message.trim().is_empty() {
            return Some(from_message);
        }
        ctx.session
            .state
            .get_str(state_keys::INITIAL_QUERY)
            .await
            .filter(|query| !query.trim().is_empty())
    }
}

impl Agent for SearchAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: InvocationContext) -> EventStream<'_> {
        Box::pin(stream! {
            match self.resolve_query(&ctx).await {
                None => {
                    yield Event::text(self.name.as_str(), "No search query provided.");
                }
                Some(query) => {
                    yield Event::text(self.name.as_str(), format!("Searching for: {query}"));

                    match self.client.search(&query).await {
                        Ok(result_text) => {
                            ctx.session
                                .state
                                .put(state_keys::SEARCH_RESULT, result_text.clone())
                                .await;
                            yield Event::with_state_delta(
                                self.name.as_str(),
                                "Search complete.",
                                [(state_keys::SEARCH_RESULT, result_text)],
                            );
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "search stage failed");
                            yield Event::text(self.name.as_str(), format!("Search failed: {err}"));
                        }
                    }
                }
            }
        })
    }
}

/// Thin SerpAPI client.
struct SerpApiClient {
    client: Client,
    api_key: String,
}

impl SerpApiClient {
    fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key: api_key.into(),
        }
    }

    /// Runs one search and flattens the response into a single text block.
    async fn search(&self, query: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(ProviderError::request)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| ProviderError::Response(err.to_string()))?;

        if let Some(message) = payload.get("error").and_then(|v| v.as_str()) {
            return Err(ProviderError::Response(message.to_string()));
        }

        let text = flatten_results(&payload);
        if text.is_empty() {
            return Err(ProviderError::Empty);
        }
        Ok(text)
    }
}

/// Collects the answer box and organic results into newline-separated blocks.
fn flatten_results(root: &Value) -> String {
    let mut blocks = Vec::new();

    if let Some(answer_box) = root.get("answer_box") {
        let answer = answer_box
            .get("answer")
            .or_else(|| answer_box.get("snippet"))
            .and_then(|v| v.as_str());
        if let Some(answer) = answer {
            blocks.push(answer.to_string());
        }
    }

    if let Some(items) = root.get("organic_results").and_then(|v| v.as_array()) {
        for item in items {
            let title = item.get("title").and_then(|v| v.as_str());
            let snippet = item.get("snippet").and_then(|v| v.as_str());
            let link = item.get("link").and_then(|v| v.as_str());

            let mut line = String::new();
            if let Some(title) = title {
                line.push_str(title);
            }
            if let Some(snippet) = snippet {
                if !line.is_empty() {
                    line.push_str(": ");
                }
                line.push_str(snippet);
            }
            if let Some(link) = link {
                if !line.is_empty() {
                    line.push_str(&format!(" ({link})"));
                }
            }
            if !line.is_empty() {
                blocks.push(line);
            }
        }
    }

    blocks.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;
    use sift_core::message::Message;
    use sift_core::session::Session;
    use std::sync::Arc;

    #[test]
    fn flatten_prefers_answer_box_then_organic_results() {
        let payload = json!({
            "answer_box": { "answer": "42" },
            "organic_results": [
                { "title": "First", "snippet": "one", "link": "https://a.example" },
                { "title": "Second", "snippet": "two" }
            ]
        });

        let text = flatten_results(&payload);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "42");
        assert_eq!(lines[1], "First: one (https://a.example)");
        assert_eq!(lines[2], "Second: two");
    }

    #[test]
    fn flatten_of_empty_payload_is_empty() {
        assert!(flatten_results(&json!({})).is_empty());
    }

    #[tokio::test]
    async fn missing_query_yields_single_diagnostic_and_no_write() {
        let agent = SearchAgent::new("test-key");
        let session = Arc::new(Session::new("app", "user", "s1"));
        let ctx = InvocationContext::new(Arc::clone(&session), Message::default());

        let events: Vec<_> = agent.run(ctx).collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].joined_text(), "No search query provided.");
        assert!(!session.state.contains(state_keys::SEARCH_RESULT).await);
    }

    #[tokio::test]
    async fn query_falls_back_to_seeded_state() {
        let agent = SearchAgent::new("test-key");
        let session = Arc::new(Session::new("app", "user", "s1"));
        session
            .state
            .put(state_keys::INITIAL_QUERY, "seeded query")
            .await;
        let ctx = InvocationContext::new(session, Message::default());

        let query = agent.resolve_query(&ctx).await;
        assert_eq!(query.as_deref(), Some("seeded query"));
    }
}

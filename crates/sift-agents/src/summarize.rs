//! Summarize stage backed by the OpenAI chat completions API.
//!
//! The agent reads the raw search text written by the retrieval stage,
//! condenses it with a tree-style reduction (chunk summaries first, then a
//! summary of the summaries), and stores the result under
//! [`state_keys::SUMMARIZED_RESULT`](sift_core::session::state_keys::SUMMARIZED_RESULT).
//!
//! Both backends are configured up front from explicit settings; a
//! misconfiguration is reported as a diagnostic event, never raised.

use std::time::Duration;

use async_stream::stream;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sift_core::agent::{Agent, EventStream, InvocationContext};
use sift_core::event::Event;
use sift_core::session::state_keys;

use crate::provider::{ProviderError, status_error};

const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "gpt-4o";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Inputs above this many characters are reduced chunk by chunk.
const CHUNK_CHAR_LIMIT: usize = 6000;

const SUMMARY_PROMPT: &str = "Provide a concise summary of the content.";
const COMBINE_PROMPT: &str =
    "The following are partial summaries of one document. Combine them into a single concise summary.";

/// Language-generation backend settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// OpenAI API key.
    pub api_key: String,
    /// Chat model name.
    pub model: String,
}

impl LlmSettings {
    /// Settings for the default chat model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_LLM_MODEL.to_string(),
        }
    }

    /// Overrides the chat model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Vector-embedding backend settings.
///
/// Validated together with the language model at configuration time. The
/// tree reduction itself is purely chat-driven, so a valid embedding
/// configuration is a precondition of the stage rather than a per-call
/// dependency.
#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    /// Gemini API key.
    pub api_key: String,
    /// Embedding model name.
    pub model: String,
}

impl EmbeddingSettings {
    /// Settings for the default embedding model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    /// Overrides the embedding model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Synthesis agent. Reads `search_result`, writes `summarized_result`.
pub struct SummarizeAgent {
    name: String,
    llm: LlmSettings,
    embedding: EmbeddingSettings,
}

impl SummarizeAgent {
    /// Creates a summarize agent from explicit backend settings.
    pub fn new(llm: LlmSettings, embedding: EmbeddingSettings) -> Self {
        Self {
            name: "OpenAiSummarizeAgent".to_string(),
            llm,
            embedding,
        }
    }

    /// Validates both backends and builds the chat client.
    fn configure(&self) -> Result<ChatClient, ProviderError> {
        if self.llm.api_key.trim().is_empty() {
            return Err(ProviderError::Misconfigured(
                "language model API key is empty".to_string(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ProviderError::Misconfigured(
                "language model name is empty".to_string(),
            ));
        }
        if self.embedding.api_key.trim().is_empty() {
            return Err(ProviderError::Misconfigured(
                "embedding API key is empty".to_string(),
            ));
        }
        if self.embedding.model.trim().is_empty() {
            return Err(ProviderError::Misconfigured(
                "embedding model name is empty".to_string(),
            ));
        }
        Ok(ChatClient::new(&self.llm))
    }

    /// Tree-style reduction: small inputs take a single pass; oversized
    /// inputs are summarized chunk by chunk, then the chunk summaries are
    /// combined in one final pass.
    async fn summarize(&self, chat: &ChatClient, text: &str) -> Result<String, ProviderError> {
        if text.chars().count() <= CHUNK_CHAR_LIMIT {
            return chat.complete(SUMMARY_PROMPT, text).await;
        }

        let chunks = split_into_chunks(text, CHUNK_CHAR_LIMIT);
        tracing::debug!(chunks = chunks.len(), "reducing oversized search text");

        let mut partials = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            partials.push(chat.complete(SUMMARY_PROMPT, chunk).await?);
        }
        chat.complete(COMBINE_PROMPT, &partials.join("\n\n")).await
    }
}

impl Agent for SummarizeAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: InvocationContext) -> EventStream<'_> {
        Box::pin(stream! {
            match self.configure() {
                Err(err) => {
                    tracing::warn!(error = %err, "summarize backends misconfigured");
                    yield Event::text(
                        self.name.as_str(),
                        format!("Failed to initialize summarization backends: {err}"),
                    );
                }
                Ok(chat) => {
                    let upstream = ctx
                        .session
                        .state
                        .get_str(state_keys::SEARCH_RESULT)
                        .await
                        .filter(|text| !text.trim().is_empty());
                    match upstream {
                        None => {
                            // Upstream incomplete, not a programming error.
                            yield Event::text(
                                self.name.as_str(),
                                "Search result not found in session state.",
                            );
                        }
                        Some(text) => {
                            yield Event::text(self.name.as_str(), "Summarizing search results...");

                            match self.summarize(&chat, &text).await {
                                Ok(summary) => {
                                    ctx.session
                                        .state
                                        .put(state_keys::SUMMARIZED_RESULT, summary.clone())
                                        .await;
                                    yield Event::with_state_delta(
                                        self.name.as_str(),
                                        "Summarization complete. Summary stored in session state.",
                                        [(state_keys::SUMMARIZED_RESULT, summary)],
                                    );
                                }
                                Err(err) => {
                                    tracing::warn!(error = %err, "summarize stage failed");
                                    yield Event::text(
                                        self.name.as_str(),
                                        format!("Summarization failed: {err}"),
                                    );
                                }
                            }
                        }
                    }
                }
            }
        })
    }
}

/// Thin OpenAI chat completions client.
struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
}

impl ChatClient {
    fn new(settings: &LlmSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        }
    }

    /// Sends one instruction + content pair and returns the model's reply.
    async fn complete(&self, instruction: &str, content: &str) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: format!("{instruction}\n\n{content}"),
            }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(BASE_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::request)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::Response(err.to_string()))?;

        parsed
            .choices
            .into_iter()
            .filter_map(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .find(|text| !text.is_empty())
            .ok_or(ProviderError::Empty)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Splits on line boundaries where possible, hard-splitting any single line
/// longer than the limit. Every chunk stays at or under `limit` characters.
fn split_into_chunks(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.lines() {
        let line_len = line.chars().count();

        if line_len > limit {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let mut piece = String::new();
            let mut piece_len = 0usize;
            for ch in line.chars() {
                piece.push(ch);
                piece_len += 1;
                if piece_len == limit {
                    chunks.push(std::mem::take(&mut piece));
                    piece_len = 0;
                }
            }
            if !piece.is_empty() {
                chunks.push(piece);
            }
            continue;
        }

        // +1 for the newline separator when the chunk is non-empty.
        if current_len + line_len + usize::from(!current.is_empty()) > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

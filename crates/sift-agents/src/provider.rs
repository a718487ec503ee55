//! Shared plumbing for HTTP providers.

use reqwest::{Response, StatusCode};
use thiserror::Error;

/// Operational failure while talking to an external provider.
///
/// These never cross an agent boundary as errors; agents convert them into
/// diagnostic events and end their streams.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request could not be sent or completed.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body could not be understood.
    #[error("unexpected response: {0}")]
    Response(String),

    /// The provider answered, but with nothing usable.
    #[error("provider returned no usable content")]
    Empty,

    /// A backend was configured with unusable settings.
    #[error("misconfigured backend: {0}")]
    Misconfigured(String),
}

impl ProviderError {
    /// Wraps a transport-level reqwest error.
    pub fn request(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

/// Turns a non-success response into a status error, keeping whatever body
/// text the provider sent for diagnostics.
pub(crate) async fn status_error(response: Response) -> ProviderError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "failed to read error body".to_string());
    ProviderError::Status { status, body }
}

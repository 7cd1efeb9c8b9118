// Text generator trait and its error type.

use async_trait::async_trait;
use thiserror::Error;

/// Why a generation request produced no result.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The request never got a response: connection refused, timeout, DNS.
    #[error("transport error")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-200 status.
    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// A 200 response whose body isn't the expected JSON.
    #[error("malformed response body")]
    Parse(#[source] serde_json::Error),
}

impl GenerateError {
    /// Short machine-readable label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerateError::Transport(_) => "transport",
            GenerateError::RequestFailed { .. } => "request_failed",
            GenerateError::Parse(_) => "parse",
        }
    }
}

/// Trait for generating text from a prompt. Implementations are async
/// because the real backend is an HTTP service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt` with the given model.
    ///
    /// An empty string is a successful (if useless) result; callers decide
    /// whether to treat it as output.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GenerateError>;
}

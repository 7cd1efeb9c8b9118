// Ollama HTTP client.
//
// Non-streaming generation via POST /api/generate: one request, one JSON
// response whose `response` field holds the whole completion. Errors are
// reported once and never retried.
//
// API docs: https://github.com/ollama/ollama/blob/main/docs/api.md

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::traits::{GenerateError, TextGenerator};
use crate::output::truncate_chars;

/// Client for a local (or remote) Ollama server.
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    /// Create a client for the server at `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("whatis/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List the model names installed on the server (GET /api/tags).
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Ollama server unreachable at {}", self.base_url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama /api/tags returned {}: {}", status, body);
        }

        let tags: TagsResponse = response
            .json()
            .await
            .context("Failed to parse Ollama /api/tags response")?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GenerateError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        info!(
            model = model,
            prompt_preview = %truncate_chars(prompt, 40),
            "Sending prompt to Ollama"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(kind = "transport", error = %e, "Ollama request failed");
                GenerateError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(kind = "transport", error = %e, "Failed to read Ollama response body");
            GenerateError::Transport(e)
        })?;

        if status != StatusCode::OK {
            warn!(
                kind = "request_failed",
                status = status.as_u16(),
                body = %truncate_chars(&body, 200),
                "Ollama returned an error status"
            );
            return Err(GenerateError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(kind = "parse", error = %e, "Ollama response was not valid JSON");
            GenerateError::Parse(e)
        })?;

        Ok(parsed.response.unwrap_or_default())
    }
}

// --- Ollama API request/response types ---

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

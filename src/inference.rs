//! Text generation providers.
//!
//! Generation is an opaque capability behind the [`Generator`] trait; the
//! orchestration layer never assumes anything about the model beyond
//! "system + prompt in, text out".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// A text generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn answer(&self, system: &str, prompt: &str) -> Result<String, InferenceError>;
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation request rejected with {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid generation endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Ollama `/api/generate` client (non-streaming).
#[derive(Clone)]
pub struct OllamaGenerator {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaGenerator {
    pub fn new(base_url: &str, model: &str) -> Result<Self, InferenceError> {
        let endpoint = Url::parse(base_url)?.join("api/generate")?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn answer(&self, system: &str, prompt: &str) -> Result<String, InferenceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&GenerateRequest {
                model: &self.model,
                system,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.response)
    }
}

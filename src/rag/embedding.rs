//! Embedding providers and vector math helpers.
//!
//! Everything that needs a dense vector goes through [`EmbeddingProvider`].
//! The stock implementation talks to an Ollama server; tests use
//! [`MockEmbeddingProvider`], a deterministic bag-of-words hasher whose
//! cosine similarities track word overlap closely enough to exercise
//! ranking and relevance thresholds without a model.

use async_trait::async_trait;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use url::Url;

use super::types::RagError;

/// Produces dense vectors for text.
///
/// `prefix` is an optional instruction prepended before embedding; insertion
/// and query flows use different prefixes with the same model so stored and
/// query vectors stay in one space. Implementations must be deterministic
/// for a given (text, prefix) pair.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str, prefix: Option<&str>) -> Result<Vec<f32>, RagError>;

    /// Dimensionality of the vectors this provider produces.
    fn dimensions(&self) -> usize;
}

/// Cosine similarity of two equal-length vectors. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Ollama `/api/embeddings` client.
#[derive(Clone)]
pub struct OllamaEmbedder {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    /// Dimensionality of the default embedding model family.
    pub const DEFAULT_DIMENSIONS: usize = 768;

    pub fn new(base_url: &str, model: &str) -> Result<Self, RagError> {
        Self::with_dimensions(base_url, model, Self::DEFAULT_DIMENSIONS)
    }

    pub fn with_dimensions(
        base_url: &str,
        model: &str,
        dimensions: usize,
    ) -> Result<Self, RagError> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join("api/embeddings"))
            .map_err(|err| RagError::Embedding(format!("invalid base url {base_url}: {err}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            model: model.to_string(),
            dimensions,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str, prefix: Option<&str>) -> Result<Vec<f32>, RagError> {
        let prompt = match prefix {
            Some(prefix) => format!("{prefix}{text}"),
            None => text.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt,
            })
            .send()
            .await
            .map_err(|err| RagError::Embedding(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Embedding(format!(
                "embedding request failed with {status}: {body}"
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| RagError::Embedding(err.to_string()))?;
        if parsed.embedding.is_empty() {
            return Err(RagError::Embedding("provider returned empty vector".into()));
        }
        Ok(parsed.embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Deterministic test provider: hashed bag-of-words, L2-normalized.
///
/// Texts sharing words land near each other in cosine space, so similarity
/// ranking and threshold behavior are testable without a real model. The
/// prefix is ignored so stored and query vectors for the same text match.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self { dimensions: 1024 }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];
        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = FxHasher::default();
            word.hash(&mut hasher);
            let slot = (hasher.finish() as usize) % self.dimensions;
            v[slot] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            // Keep a valid unit vector even for empty input.
            v[0] = 1.0;
        } else {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str, _prefix: Option<&str>) -> Result<Vec<f32>, RagError> {
        Ok(self.vectorize(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

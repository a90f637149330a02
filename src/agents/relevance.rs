//! Relevance gate: is this question about immigration at all?
//!
//! Classification is embedding-based, not an LLM call: the question is
//! compared against a baseline set of in-scope prompts and the best cosine
//! similarity decides. Cheap, deterministic, and good enough to keep the
//! expensive agents out of off-topic conversations.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use crate::agent::{Agent, AgentError};
use crate::rag::embedding::{EmbeddingProvider, cosine_similarity};
use crate::state::{ConversationState, HistoryEntry, Relevance, StatePartial};
use crate::types::{AgentKind, Flow};

/// Similarity above which a question counts as in scope.
pub const DEFAULT_THRESHOLD: f32 = 0.4;

#[derive(Deserialize)]
struct BaselinePrompt {
    question: String,
}

pub struct RelevanceAgent {
    provider: Arc<dyn EmbeddingProvider>,
    baseline: Vec<Vec<f32>>,
    threshold: f32,
}

impl RelevanceAgent {
    /// Embed a baseline prompt set up front.
    pub async fn new(
        provider: Arc<dyn EmbeddingProvider>,
        baseline_questions: Vec<String>,
        threshold: f32,
    ) -> Result<Self, AgentError> {
        if baseline_questions.is_empty() {
            return Err(AgentError::MissingInput {
                what: "baseline questions",
            });
        }
        let mut baseline = Vec::with_capacity(baseline_questions.len());
        for question in &baseline_questions {
            baseline.push(provider.embed(question, None).await?);
        }
        Ok(Self {
            provider,
            baseline,
            threshold,
        })
    }

    /// Load baseline prompts from a JSON file of `{"question": ...}` objects.
    pub async fn from_baseline_file(
        provider: Arc<dyn EmbeddingProvider>,
        path: &Path,
        threshold: f32,
    ) -> Result<Self, AgentError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| AgentError::MissingInput {
                what: "baseline prompt file",
            })?;
        let prompts: Vec<BaselinePrompt> = serde_json::from_str(&raw)?;
        let questions = prompts.into_iter().map(|p| p.question).collect();
        Self::new(provider, questions, threshold).await
    }

    /// Best similarity between the question and the baseline set.
    async fn score(&self, question: &str) -> Result<f32, AgentError> {
        let embedding = self.provider.embed(question, None).await?;
        let best = self
            .baseline
            .iter()
            .map(|prompt| cosine_similarity(&embedding, prompt))
            .fold(f32::MIN, f32::max);
        Ok(best)
    }
}

#[async_trait]
impl Agent for RelevanceAgent {
    async fn invoke(&self, state: &ConversationState) -> Result<StatePartial, AgentError> {
        if state.question.trim().is_empty() {
            return Err(AgentError::MissingInput { what: "question" });
        }
        let score = self.score(&state.question).await?;
        let relevance = if score > self.threshold {
            Relevance::Relevant
        } else {
            Relevance::Irrelevant
        };
        if state.verbose {
            tracing::info!(score, ?relevance, "relevance assessment");
        }
        Ok(StatePartial::new()
            .with_relevance(relevance)
            .with_history_entry(HistoryEntry::now(
                AgentKind::Relevance,
                json!({ "assessment": relevance, "score": score }),
            )))
    }

    fn route(&self, state: &ConversationState) -> Flow {
        match state.relevance {
            Relevance::Relevant => Flow::Next(AgentKind::Reasoning),
            Relevance::Irrelevant => Flow::Terminal,
            Relevance::Unknown => Flow::Next(AgentKind::Relevance),
        }
    }
}

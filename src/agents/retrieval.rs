//! Retrieval agent: fan the question out to the document store.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::agent::{Agent, AgentError};
use crate::rag::search::RetrievalService;
use crate::state::{ConversationState, GenerationStage, HistoryEntry, StatePartial};
use crate::types::{AgentKind, Flow};

/// Default number of hits requested per content type.
pub const DEFAULT_TOP_K: usize = 5;

pub struct RetrievalAgent {
    service: Arc<RetrievalService>,
    top_k: usize,
}

impl RetrievalAgent {
    pub fn new(service: Arc<RetrievalService>, top_k: usize) -> Self {
        Self { service, top_k }
    }
}

#[async_trait]
impl Agent for RetrievalAgent {
    async fn invoke(&self, state: &ConversationState) -> Result<StatePartial, AgentError> {
        let outcome = self.service.query(&state.question, self.top_k).await?;
        if state.verbose {
            tracing::info!(
                forms = outcome.forms.len(),
                legislation = outcome.legislation.len(),
                "retrieval complete"
            );
        }
        let entry = HistoryEntry::now(
            AgentKind::Retrieval,
            json!({
                "forms": outcome.forms.len(),
                "legislation": outcome.legislation.len(),
            }),
        );
        Ok(StatePartial::new()
            .with_forms(outcome.forms)
            .with_legislation(outcome.legislation)
            .with_history_entry(entry))
    }

    /// Forms drive timelines; without them, go straight back to reasoning.
    ///
    /// When retrieval finds nothing at all (an empty or unpopulated store),
    /// reasoning stays in its initial stage and routes here again; the
    /// conductor's step ceiling turns that cycle into an error instead of
    /// letting it spin.
    fn route(&self, state: &ConversationState) -> Flow {
        if !state.forms.is_empty() && state.generation_stage == GenerationStage::Initial {
            Flow::Next(AgentKind::Timeline)
        } else {
            Flow::Next(AgentKind::Reasoning)
        }
    }
}

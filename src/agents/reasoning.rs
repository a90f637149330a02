//! Two-stage reasoning: a draft before retrieval, the grounded answer after.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::agent::{Agent, AgentError};
use crate::inference::Generator;
use crate::state::{ConversationState, GenerationStage, HistoryEntry, StatePartial};
use crate::types::{AgentKind, Flow};

const INITIAL_SYSTEM: &str = "You are an immigration counsel assistant. Give a concise first \
answer to the user's question from general knowledge of immigration procedure. State plainly \
when something depends on details you do not have.";

const FINAL_SYSTEM: &str = "You are an immigration counsel assistant. Revise your draft answer \
using the retrieved forms, legislation, and processing timelines provided as context. Cite \
forms by their identifier. Do not invent forms or citations that are not in the context.";

pub struct ReasoningAgent {
    generator: Arc<dyn Generator>,
}

impl ReasoningAgent {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    fn has_context(state: &ConversationState) -> bool {
        !state.forms.is_empty() || !state.legislation.is_empty() || !state.timeline.is_empty()
    }

    fn build_context(state: &ConversationState) -> String {
        let mut context = String::new();
        context.push_str("Question: ");
        context.push_str(&state.question);
        if let Some(draft) = &state.initial_response {
            context.push_str("\n\nDraft answer: ");
            context.push_str(draft);
        }
        if !state.forms.is_empty() {
            context.push_str("\n\nRelevant forms:\n");
            for form in &state.forms {
                context.push_str(&format!("- {} ({}): {}\n", form.id, form.title, form.description));
            }
        }
        if !state.legislation.is_empty() {
            context.push_str("\nRelevant legislation:\n");
            for law in &state.legislation {
                context.push_str(&format!("- {}: {}\n", law.title, law.description));
            }
        }
        if !state.timeline.is_empty() {
            context.push_str("\nProcessing timelines:\n");
            for line in &state.timeline {
                context.push_str(&format!("- {line}\n"));
            }
        }
        context
    }
}

#[async_trait]
impl Agent for ReasoningAgent {
    async fn invoke(&self, state: &ConversationState) -> Result<StatePartial, AgentError> {
        // Generation is closed once a final answer exists; contribute nothing.
        if state.generation_stage == GenerationStage::Final && state.final_response.is_some() {
            return Ok(StatePartial::new());
        }

        if Self::has_context(state) && state.generation_stage == GenerationStage::Initial {
            let context = Self::build_context(state);
            let response = self.generator.answer(FINAL_SYSTEM, &context).await?;
            if state.verbose {
                tracing::info!(chars = response.len(), "final response generated");
            }
            Ok(StatePartial::new()
                .with_final_response(response)
                .with_generation_stage(GenerationStage::Final)
                .with_history_entry(HistoryEntry::now(
                    AgentKind::Reasoning,
                    json!({
                        "stage": GenerationStage::Final,
                        "forms_in_context": state.forms.len(),
                        "legislation_in_context": state.legislation.len(),
                    }),
                )))
        } else {
            let response = self.generator.answer(INITIAL_SYSTEM, &state.question).await?;
            if state.verbose {
                tracing::info!(chars = response.len(), "initial response generated");
            }
            Ok(StatePartial::new()
                .with_initial_response(response)
                .with_generation_stage(GenerationStage::Initial)
                .with_history_entry(HistoryEntry::now(
                    AgentKind::Reasoning,
                    json!({ "stage": GenerationStage::Initial }),
                )))
        }
    }

    fn route(&self, state: &ConversationState) -> Flow {
        match state.generation_stage {
            GenerationStage::Initial => Flow::Next(AgentKind::Retrieval),
            GenerationStage::Final => Flow::Terminal,
        }
    }
}

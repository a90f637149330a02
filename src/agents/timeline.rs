//! Timeline agent: deterministic processing-time lines for retrieved forms.

use async_trait::async_trait;
use serde_json::json;

use crate::agent::{Agent, AgentError};
use crate::state::{ConversationState, GenerationStage, HistoryEntry, StatePartial};
use crate::types::{AgentKind, Flow};

#[derive(Default)]
pub struct TimelineAgent {
    _private: (),
}

impl TimelineAgent {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Agent for TimelineAgent {
    async fn invoke(&self, state: &ConversationState) -> Result<StatePartial, AgentError> {
        if state.forms.is_empty() {
            return Ok(StatePartial::new());
        }
        let timeline: Vec<String> = state
            .forms
            .iter()
            .map(|form| format!("{} ({}): typical processing 3 to 6 months", form.id, form.title))
            .collect();
        if state.verbose {
            tracing::info!(lines = timeline.len(), "timeline derived");
        }
        let entry = HistoryEntry::now(AgentKind::Timeline, json!({ "lines": timeline.len() }));
        Ok(StatePartial::new()
            .with_timeline(timeline)
            .with_history_entry(entry))
    }

    fn route(&self, state: &ConversationState) -> Flow {
        match state.generation_stage {
            GenerationStage::Initial => Flow::Next(AgentKind::Reasoning),
            GenerationStage::Final => Flow::Terminal,
        }
    }
}

//! Conversation state and the merge rules agents use to update it.
//!
//! A single [`ConversationState`] value travels through the graph. Agents
//! never mutate it directly; they return a [`StatePartial`] and the conductor
//! applies it with [`ConversationState::apply`]:
//!
//! - scalar fields are last-writer-wins (a `Some` in the partial replaces
//!   the current value)
//! - `forms`, `legislation`, and `timeline` are replaced wholesale
//! - `history` is append-only
//!
//! Once `generation_stage` is [`GenerationStage::Final`] and a final response
//! is present, further writes to `final_response` are dropped; the graph is
//! expected to reach terminal without revisiting generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rag::types::SearchResult;
use crate::types::AgentKind;

/// Whether the question is in scope for the assistant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    Relevant,
    Irrelevant,
    /// Not yet classified. Routing loops back to the relevance gate until
    /// this resolves.
    #[default]
    Unknown,
}

/// Which generation pass the conversation is in.
///
/// `Initial` is the pre-retrieval draft; `Final` means the grounded answer
/// has been produced and generation is closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    #[default]
    Initial,
    Final,
}

/// One entry in the execution audit trail.
///
/// Each agent appends a structured summary of what it did (assessment,
/// result counts, stage) so a finished state explains its own run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub agent: AgentKind,
    pub when: DateTime<Utc>,
    pub detail: serde_json::Value,
}

impl HistoryEntry {
    pub fn now(agent: AgentKind, detail: serde_json::Value) -> Self {
        Self {
            agent,
            when: Utc::now(),
            detail,
        }
    }
}

/// The shared state threaded through every agent in a conversation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConversationState {
    /// The user's question, set once at the start of a run.
    pub question: String,
    pub relevance: Relevance,
    pub generation_stage: GenerationStage,
    /// Pre-retrieval draft answer.
    pub initial_response: Option<String>,
    /// Grounded answer produced after retrieval context is available.
    pub final_response: Option<String>,
    /// Form matches from the latest retrieval pass.
    pub forms: Vec<SearchResult>,
    /// Legislation matches from the latest retrieval pass.
    pub legislation: Vec<SearchResult>,
    /// Processing-time lines derived from retrieved forms.
    pub timeline: Vec<String>,
    /// Append-only audit trail in execution order.
    pub history: Vec<HistoryEntry>,
    /// When set, agents log their intermediate output at info level.
    pub verbose: bool,
}

impl ConversationState {
    /// Fresh state for a new question. Everything else starts at defaults.
    pub fn new_with_question(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Merge a partial update into this state.
    pub fn apply(&mut self, partial: StatePartial) {
        let finalized =
            self.generation_stage == GenerationStage::Final && self.final_response.is_some();

        if let Some(relevance) = partial.relevance {
            self.relevance = relevance;
        }
        if let Some(stage) = partial.generation_stage {
            self.generation_stage = stage;
        }
        if let Some(initial) = partial.initial_response {
            self.initial_response = Some(initial);
        }
        if let Some(final_response) = partial.final_response {
            if finalized {
                tracing::warn!("discarding final_response update: generation already closed");
            } else {
                self.final_response = Some(final_response);
            }
        }
        if let Some(forms) = partial.forms {
            self.forms = forms;
        }
        if let Some(legislation) = partial.legislation {
            self.legislation = legislation;
        }
        if let Some(timeline) = partial.timeline {
            self.timeline = timeline;
        }
        if let Some(history) = partial.history {
            self.history.extend(history);
        }
    }

    /// Clean end-user view of a finished conversation.
    pub fn summary(&self) -> ResponseSummary {
        ResponseSummary {
            relevance: self.relevance,
            final_response: self.final_response.clone(),
            forms: self.forms.iter().map(|r| r.title.clone()).collect(),
            legislation: self.legislation.iter().map(|r| r.title.clone()).collect(),
            timeline: self.timeline.clone(),
        }
    }
}

/// User-facing digest of a completed run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseSummary {
    pub relevance: Relevance,
    pub final_response: Option<String>,
    pub forms: Vec<String>,
    pub legislation: Vec<String>,
    pub timeline: Vec<String>,
}

/// Partial state update returned by agent execution.
///
/// All fields are optional so agents only touch the state they own. The
/// conductor merges these via [`ConversationState::apply`].
///
/// # Examples
///
/// ```rust
/// use counselgraph::state::{GenerationStage, StatePartial};
///
/// let partial = StatePartial::new()
///     .with_final_response("File form I-765 with your I-485.")
///     .with_generation_stage(GenerationStage::Final);
/// assert!(!partial.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StatePartial {
    pub relevance: Option<Relevance>,
    pub generation_stage: Option<GenerationStage>,
    pub initial_response: Option<String>,
    pub final_response: Option<String>,
    pub forms: Option<Vec<SearchResult>>,
    pub legislation: Option<Vec<SearchResult>>,
    pub timeline: Option<Vec<String>>,
    pub history: Option<Vec<HistoryEntry>>,
}

impl StatePartial {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the partial carries no updates at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relevance.is_none()
            && self.generation_stage.is_none()
            && self.initial_response.is_none()
            && self.final_response.is_none()
            && self.forms.is_none()
            && self.legislation.is_none()
            && self.timeline.is_none()
            && self.history.is_none()
    }

    #[must_use]
    pub fn with_relevance(mut self, relevance: Relevance) -> Self {
        self.relevance = Some(relevance);
        self
    }

    #[must_use]
    pub fn with_generation_stage(mut self, stage: GenerationStage) -> Self {
        self.generation_stage = Some(stage);
        self
    }

    #[must_use]
    pub fn with_initial_response(mut self, response: impl Into<String>) -> Self {
        self.initial_response = Some(response.into());
        self
    }

    #[must_use]
    pub fn with_final_response(mut self, response: impl Into<String>) -> Self {
        self.final_response = Some(response.into());
        self
    }

    #[must_use]
    pub fn with_forms(mut self, forms: Vec<SearchResult>) -> Self {
        self.forms = Some(forms);
        self
    }

    #[must_use]
    pub fn with_legislation(mut self, legislation: Vec<SearchResult>) -> Self {
        self.legislation = Some(legislation);
        self
    }

    #[must_use]
    pub fn with_timeline(mut self, timeline: Vec<String>) -> Self {
        self.timeline = Some(timeline);
        self
    }

    #[must_use]
    pub fn with_history_entry(mut self, entry: HistoryEntry) -> Self {
        self.history.get_or_insert_with(Vec::new).push(entry);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn apply_is_last_writer_wins_for_scalars() {
        let mut state = ConversationState::new_with_question("q");
        state.apply(StatePartial::new().with_relevance(Relevance::Relevant));
        state.apply(StatePartial::new().with_relevance(Relevance::Irrelevant));
        assert_eq!(state.relevance, Relevance::Irrelevant);
    }

    #[test]
    fn apply_replaces_timeline_and_appends_history() {
        let mut state = ConversationState::new_with_question("q");
        state.apply(
            StatePartial::new()
                .with_timeline(vec!["a".into()])
                .with_history_entry(HistoryEntry::now(AgentKind::Timeline, json!({"n": 1}))),
        );
        state.apply(
            StatePartial::new()
                .with_timeline(vec!["b".into(), "c".into()])
                .with_history_entry(HistoryEntry::now(AgentKind::Timeline, json!({"n": 2}))),
        );
        assert_eq!(state.timeline, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(state.history.len(), 2);
    }

    #[test]
    fn final_response_is_write_once_after_finalization() {
        let mut state = ConversationState::new_with_question("q");
        state.apply(
            StatePartial::new()
                .with_final_response("grounded answer")
                .with_generation_stage(GenerationStage::Final),
        );
        state.apply(StatePartial::new().with_final_response("overwrite attempt"));
        assert_eq!(state.final_response.as_deref(), Some("grounded answer"));
    }

    #[test]
    fn empty_partial_is_a_no_op() {
        let mut state = ConversationState::new_with_question("q");
        state.relevance = Relevance::Relevant;
        let before = state.history.len();
        state.apply(StatePartial::new());
        assert_eq!(state.relevance, Relevance::Relevant);
        assert_eq!(state.history.len(), before);
    }
}

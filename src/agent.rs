//! The agent contract: one async work step plus a pure routing decision.

use async_trait::async_trait;
use thiserror::Error;

use crate::inference::InferenceError;
use crate::rag::types::RagError;
use crate::state::{ConversationState, StatePartial};
use crate::types::Flow;

/// A node in the conversation graph.
///
/// `invoke` reads the current state and produces a partial update; it never
/// mutates the state it was given. `route` runs after the update has been
/// merged and picks the next hop from the merged state. Keeping `route`
/// synchronous and side-effect free means the topology can be reasoned about
/// (and validated) without executing agents.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use counselgraph::agent::{Agent, AgentError};
/// use counselgraph::state::{ConversationState, StatePartial};
/// use counselgraph::types::Flow;
///
/// struct EchoAgent;
///
/// #[async_trait]
/// impl Agent for EchoAgent {
///     async fn invoke(&self, state: &ConversationState) -> Result<StatePartial, AgentError> {
///         Ok(StatePartial::new().with_initial_response(state.question.clone()))
///     }
///
///     fn route(&self, _state: &ConversationState) -> Flow {
///         Flow::Terminal
///     }
/// }
/// ```
#[async_trait]
pub trait Agent: Send + Sync {
    /// Perform this agent's work against a read-only view of the state.
    async fn invoke(&self, state: &ConversationState) -> Result<StatePartial, AgentError>;

    /// Decide where control flows next, given the post-merge state.
    fn route(&self, state: &ConversationState) -> Flow;
}

/// Fatal agent failures. The conductor propagates these unmodified.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The state is missing something this agent requires.
    #[error("missing expected input: {what}")]
    MissingInput { what: &'static str },

    /// The generation provider failed.
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// The retrieval engine failed.
    #[error(transparent)]
    Retrieval(#[from] RagError),

    /// Malformed baseline or history payload.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

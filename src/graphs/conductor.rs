//! The sequential execution loop: invoke, merge, route, repeat.

use thiserror::Error;
use uuid::Uuid;

use super::builder::CompiledGraph;
use crate::agent::AgentError;
use crate::state::ConversationState;
use crate::types::{AgentKind, Flow};

/// Steps a run may take before it is declared stuck.
pub const DEFAULT_STEP_LIMIT: usize = 32;

/// Fatal run failures.
#[derive(Debug, Error)]
pub enum ConductorError {
    /// An agent failed; propagated unmodified.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// A routing function returned a target with no declared edge. The graph
    /// compiled with a different topology than the agent assumes.
    #[error("agent {from} routed to {target}, but no such edge is declared")]
    UndeclaredRoute { from: AgentKind, target: AgentKind },

    /// The run took more steps than allowed. Cyclic topologies are legal,
    /// unbounded ones are not.
    #[error("conversation exceeded the step limit of {limit}")]
    StepLimitExceeded { limit: usize },
}

/// Drives a [`CompiledGraph`] over one conversation at a time.
///
/// Each step invokes the current agent against the state, merges the
/// returned partial, then asks the agent where to go next. Agents run
/// strictly one at a time; a conversation is a single logical thread of
/// control. Concurrency lives below the agents (retrieval fan-out), not
/// between them.
///
/// The step ceiling is also how degenerate topologies surface: in the
/// standard graph, a relevant question against an empty document store
/// cycles between reasoning and retrieval and ends in
/// [`ConductorError::StepLimitExceeded`] rather than an empty answer.
pub struct Conductor {
    graph: CompiledGraph,
    step_limit: usize,
}

impl Conductor {
    pub fn new(graph: CompiledGraph) -> Self {
        Self {
            graph,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    #[must_use]
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit.max(1);
        self
    }

    /// Run a fresh conversation for a question.
    pub async fn ask(&self, question: &str) -> Result<ConversationState, ConductorError> {
        self.run(ConversationState::new_with_question(question)).await
    }

    /// Run the graph to termination over an existing state.
    pub async fn run(
        &self,
        mut state: ConversationState,
    ) -> Result<ConversationState, ConductorError> {
        let run_id = Uuid::new_v4();
        let mut current = self.graph.entry().clone();
        let mut steps = 0usize;

        loop {
            steps += 1;
            if steps > self.step_limit {
                tracing::error!(%run_id, limit = self.step_limit, "step limit exceeded");
                return Err(ConductorError::StepLimitExceeded {
                    limit: self.step_limit,
                });
            }

            // Registration was validated at compile time; a missing agent
            // here means the entry itself, which compile checks.
            let agent = self
                .graph
                .agent(&current)
                .ok_or_else(|| ConductorError::UndeclaredRoute {
                    from: current.clone(),
                    target: current.clone(),
                })?;

            tracing::debug!(%run_id, step = steps, agent = %current, "invoking agent");
            let partial = agent.invoke(&state).await?;
            state.apply(partial);

            match agent.route(&state) {
                Flow::Terminal => {
                    tracing::info!(%run_id, steps, "conversation complete");
                    return Ok(state);
                }
                Flow::Next(next) => {
                    if !self.graph.allows(&current, &next) {
                        tracing::error!(%run_id, from = %current, target = %next, "undeclared route");
                        return Err(ConductorError::UndeclaredRoute {
                            from: current,
                            target: next,
                        });
                    }
                    tracing::debug!(%run_id, from = %current, to = %next, "routing");
                    current = next;
                }
            }
        }
    }
}

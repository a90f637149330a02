//! The four stock agents and the standard conversation topology.
//!
//! Control flow of the standard graph:
//!
//! ```text
//! Relevance --(relevant)--> Reasoning --(initial)--> Retrieval
//!     |  \--(unknown: retry)                             |
//!     |                                   (forms found)--+--(no forms)
//! (irrelevant)                                  |              |
//!     v                                      Timeline -----> Reasoning --(final)--> end
//!    end
//! ```

pub mod reasoning;
pub mod relevance;
pub mod retrieval;
pub mod timeline;

pub use reasoning::ReasoningAgent;
pub use relevance::RelevanceAgent;
pub use retrieval::RetrievalAgent;
pub use timeline::TimelineAgent;

use std::sync::Arc;

use crate::graphs::{CompiledGraph, GraphBuilder, GraphError};
use crate::types::AgentKind;

/// Wire the stock agents into the standard topology.
pub fn standard_graph(
    relevance: RelevanceAgent,
    reasoning: ReasoningAgent,
    retrieval: RetrievalAgent,
    timeline: TimelineAgent,
) -> Result<CompiledGraph, GraphError> {
    GraphBuilder::new()
        .add_agent(AgentKind::Relevance, Arc::new(relevance))
        .add_agent(AgentKind::Reasoning, Arc::new(reasoning))
        .add_agent(AgentKind::Retrieval, Arc::new(retrieval))
        .add_agent(AgentKind::Timeline, Arc::new(timeline))
        .set_entry(AgentKind::Relevance)
        // Unknown relevance loops back for another pass.
        .add_edge(AgentKind::Relevance, AgentKind::Relevance)
        .add_edge(AgentKind::Relevance, AgentKind::Reasoning)
        .add_edge(AgentKind::Reasoning, AgentKind::Retrieval)
        .add_edge(AgentKind::Retrieval, AgentKind::Timeline)
        .add_edge(AgentKind::Retrieval, AgentKind::Reasoning)
        .add_edge(AgentKind::Timeline, AgentKind::Reasoning)
        .compile()
}

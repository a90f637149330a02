//! Core identifiers for the counselgraph orchestration layer.
//!
//! [`AgentKind`] names the nodes of a conversation graph and [`Flow`] is the
//! outcome of a routing decision: hand control to another node, or stop.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a node in the conversation graph.
///
/// The four built-in variants cover the stock topology (relevance gate,
/// two-stage reasoning, retrieval, timeline). `Custom` exists so embedding
/// applications can wire their own agents into a graph without forking the
/// enum.
///
/// # Examples
///
/// ```rust
/// use counselgraph::types::AgentKind;
///
/// let kind = AgentKind::Retrieval;
/// assert_eq!(kind.to_string(), "Retrieval");
/// assert_eq!(AgentKind::from("Retrieval"), kind);
/// assert_eq!(AgentKind::from("Audit"), AgentKind::Custom("Audit".into()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Gate that decides whether a question is in scope at all.
    Relevance,
    /// Two-stage generation: a draft answer before retrieval, the grounded
    /// answer after.
    Reasoning,
    /// Fans the question out to the document store.
    Retrieval,
    /// Derives processing-time estimates from retrieved forms.
    Timeline,
    /// Application-defined agent identified by name.
    Custom(String),
}

impl AgentKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            AgentKind::Relevance => "Relevance",
            AgentKind::Reasoning => "Reasoning",
            AgentKind::Retrieval => "Retrieval",
            AgentKind::Timeline => "Timeline",
            AgentKind::Custom(name) => name.as_str(),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Allow string literals where an AgentKind is expected.
impl From<&str> for AgentKind {
    fn from(s: &str) -> Self {
        match s {
            "Relevance" => AgentKind::Relevance,
            "Reasoning" => AgentKind::Reasoning,
            "Retrieval" => AgentKind::Retrieval,
            "Timeline" => AgentKind::Timeline,
            other => AgentKind::Custom(other.to_string()),
        }
    }
}

/// Outcome of an agent's routing decision.
///
/// There is no explicit terminal node in a graph; any agent may end the
/// conversation by returning [`Flow::Terminal`]. A `Next` target must name a
/// declared edge or the conductor fails the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Hand control to the named agent.
    Next(AgentKind),
    /// The conversation is complete.
    Terminal,
}

impl Flow {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Flow::Terminal)
    }
}

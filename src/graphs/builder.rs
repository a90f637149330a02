//! Fluent graph assembly with build-time validation.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::agent::Agent;
use crate::types::AgentKind;

/// Structural problems caught when a graph compiles.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("graph has no agents")]
    NoAgents,

    #[error("no entry point set")]
    MissingEntry,

    #[error("entry point {0} is not a registered agent")]
    UnknownEntry(AgentKind),

    #[error("edge source {0} is not a registered agent")]
    UnknownEdgeSource(AgentKind),

    #[error("edge {from} -> {to} targets an unregistered agent")]
    UnknownEdgeTarget { from: AgentKind, to: AgentKind },
}

/// Collects agents, edges, and an entry point, then validates the whole
/// topology in one place.
///
/// Edges declare where an agent is *allowed* to route; the agent's `route`
/// function picks among them at run time. Termination needs no edge, any
/// agent may return `Flow::Terminal`.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use counselgraph::agent::{Agent, AgentError};
/// use counselgraph::graphs::GraphBuilder;
/// use counselgraph::state::{ConversationState, StatePartial};
/// use counselgraph::types::{AgentKind, Flow};
///
/// struct Stop;
///
/// #[async_trait]
/// impl Agent for Stop {
///     async fn invoke(&self, _: &ConversationState) -> Result<StatePartial, AgentError> {
///         Ok(StatePartial::new())
///     }
///     fn route(&self, _: &ConversationState) -> Flow {
///         Flow::Terminal
///     }
/// }
///
/// let graph = GraphBuilder::new()
///     .add_agent(AgentKind::Reasoning, Arc::new(Stop))
///     .set_entry(AgentKind::Reasoning)
///     .compile()
///     .unwrap();
/// assert_eq!(graph.entry(), &AgentKind::Reasoning);
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    agents: FxHashMap<AgentKind, Arc<dyn Agent>>,
    edges: FxHashMap<AgentKind, Vec<AgentKind>>,
    entry: Option<AgentKind>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under a node identifier. Re-registering the same
    /// kind replaces the previous agent.
    #[must_use]
    pub fn add_agent(mut self, kind: AgentKind, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(kind, agent);
        self
    }

    /// Declare that `from` may route to `to`.
    #[must_use]
    pub fn add_edge(mut self, from: AgentKind, to: AgentKind) -> Self {
        self.edges.entry(from).or_default().push(to);
        self
    }

    #[must_use]
    pub fn set_entry(mut self, kind: AgentKind) -> Self {
        self.entry = Some(kind);
        self
    }

    /// Validate the topology and freeze it.
    pub fn compile(self) -> Result<CompiledGraph, GraphError> {
        if self.agents.is_empty() {
            return Err(GraphError::NoAgents);
        }
        let entry = self.entry.ok_or(GraphError::MissingEntry)?;
        if !self.agents.contains_key(&entry) {
            return Err(GraphError::UnknownEntry(entry));
        }
        for (from, targets) in &self.edges {
            if !self.agents.contains_key(from) {
                return Err(GraphError::UnknownEdgeSource(from.clone()));
            }
            for to in targets {
                if !self.agents.contains_key(to) {
                    return Err(GraphError::UnknownEdgeTarget {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
            }
        }
        Ok(CompiledGraph {
            agents: self.agents,
            edges: self.edges,
            entry,
        })
    }
}

/// A validated, immutable graph ready for execution.
pub struct CompiledGraph {
    agents: FxHashMap<AgentKind, Arc<dyn Agent>>,
    edges: FxHashMap<AgentKind, Vec<AgentKind>>,
    entry: AgentKind,
}

impl std::fmt::Debug for CompiledGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("agents", &self.agents.keys().collect::<Vec<_>>())
            .field("edges", &self.edges)
            .field("entry", &self.entry)
            .finish()
    }
}

impl CompiledGraph {
    pub fn entry(&self) -> &AgentKind {
        &self.entry
    }

    pub fn agent(&self, kind: &AgentKind) -> Option<&Arc<dyn Agent>> {
        self.agents.get(kind)
    }

    /// True when `from -> to` was declared at build time.
    pub fn allows(&self, from: &AgentKind, to: &AgentKind) -> bool {
        self.edges
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }

    pub fn edges(&self) -> &FxHashMap<AgentKind, Vec<AgentKind>> {
        &self.edges
    }
}

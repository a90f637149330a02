//! Graph construction, validation, and execution.
//!
//! A graph is a static table of agents and declared edges, validated once
//! at build time by [`GraphBuilder::compile`]. The [`Conductor`] then runs
//! the sequential invoke → merge → route loop over a [`CompiledGraph`].

mod builder;
mod conductor;

pub use builder::{CompiledGraph, GraphBuilder, GraphError};
pub use conductor::{Conductor, ConductorError, DEFAULT_STEP_LIMIT};

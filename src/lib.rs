//! # Counselgraph: graph-orchestrated immigration counsel assistant
//!
//! Counselgraph answers user questions about immigration procedure by routing
//! a shared [`state::ConversationState`] through a small directed graph of
//! agents, each of which reads the state, contributes a partial update, and
//! decides where control flows next.
//!
//! ## Core concepts
//!
//! - **Agents**: async units implementing [`agent::Agent`] with an `invoke`
//!   step (produce a [`state::StatePartial`]) and a `route` step (pick the
//!   next node or terminate)
//! - **Conductor**: the sequential invoke → merge → route loop in
//!   [`graphs::Conductor`], with a step ceiling so cyclic topologies cannot
//!   run forever
//! - **Retrieval**: [`rag`] ingests form and legislation corpora into a
//!   SQLite store with dense vector columns and serves cosine-ranked
//!   similarity search across both content types
//! - **Inference**: text generation stays behind the [`inference::Generator`]
//!   seam; the stock implementation talks to an Ollama server
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use counselgraph::agents::{self, ReasoningAgent, RelevanceAgent, RetrievalAgent, TimelineAgent};
//! use counselgraph::graphs::Conductor;
//! use counselgraph::inference::OllamaGenerator;
//! use counselgraph::rag::embedding::OllamaEmbedder;
//! use counselgraph::rag::search::RetrievalService;
//! use counselgraph::rag::store::VectorStore;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = counselgraph::config::Settings::from_env();
//! let provider = Arc::new(OllamaEmbedder::new(
//!     &settings.ollama_url,
//!     &settings.embedding_model,
//! )?);
//! let store = VectorStore::open(&settings.database_path).await?;
//! let service = Arc::new(RetrievalService::new(
//!     store,
//!     provider.clone(),
//!     settings.query_prefix.clone(),
//! ));
//! let generator = Arc::new(OllamaGenerator::new(
//!     &settings.ollama_url,
//!     &settings.generation_model,
//! )?);
//!
//! let graph = agents::standard_graph(
//!     RelevanceAgent::new(provider, vec!["how do I renew my visa?".into()], 0.4).await?,
//!     ReasoningAgent::new(generator),
//!     RetrievalAgent::new(service, settings.top_k),
//!     TimelineAgent::new(),
//! )?;
//! let conductor = Conductor::new(graph).with_step_limit(settings.step_limit);
//! let outcome = conductor.ask("Can I work while my I-485 is pending?").await?;
//! println!("{:?}", outcome.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module guide
//!
//! - [`types`] - Agent identifiers and routing outcomes
//! - [`state`] - Conversation state, partial updates, and merge rules
//! - [`agent`] - The `Agent` trait and agent-level errors
//! - [`graphs`] - Graph construction, validation, and the conductor loop
//! - [`agents`] - The four concrete agents and the standard topology
//! - [`rag`] - Ingestion, vector storage, chunking, and similarity search
//! - [`inference`] - Text generation providers
//! - [`config`] - Environment-driven settings
//! - [`telemetry`] - Tracing subscriber setup

pub mod agent;
pub mod agents;
pub mod config;
pub mod graphs;
pub mod inference;
pub mod rag;
pub mod state;
pub mod telemetry;
pub mod types;

//! Retrieval engine: ingestion, vector storage, chunking, and search.
//!
//! The corpus is a directory tree of JSON metadata files with sibling
//! document files (PDF forms, HTML pages, HTML statute text). Ingestion
//! chunks and embeds everything into a SQLite store with `sqlite-vec`
//! columns; [`search::RetrievalService`] ranks chunks by cosine distance
//! and groups hits under their parent sources.

pub mod chunking;
pub mod embedding;
pub mod ingest;
pub mod search;
pub mod store;
pub mod types;

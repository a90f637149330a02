//! Environment-driven configuration.
//!
//! Every knob has a default so a bare environment still produces a working
//! local setup. `.env` files are honored via `dotenvy`.

use std::path::PathBuf;

use crate::agents::retrieval::DEFAULT_TOP_K;
use crate::graphs::DEFAULT_STEP_LIMIT;
use crate::rag::chunking::{DEFAULT_CHUNK_CHARS, DEFAULT_CHUNK_OVERLAP};
use crate::rag::ingest::DEFAULT_CONCURRENCY;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_path: PathBuf,
    pub forms_dir: PathBuf,
    pub legislation_dir: PathBuf,
    pub baseline_prompts_path: PathBuf,

    pub ollama_url: String,
    pub generation_model: String,
    pub embedding_model: String,

    /// Instruction prepended to texts at insertion time.
    pub insert_prefix: Option<String>,
    /// Instruction prepended to query text; distinct from the insert prefix
    /// but served by the same model so vectors share a space.
    pub query_prefix: Option<String>,

    pub chunk_chars: usize,
    pub chunk_overlap: usize,
    pub ingest_concurrency: usize,

    pub relevance_threshold: f32,
    pub top_k: usize,
    pub step_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("counselgraph.db"),
            forms_dir: PathBuf::from("corpus/forms"),
            legislation_dir: PathBuf::from("corpus/legislation"),
            baseline_prompts_path: PathBuf::from("corpus/baseline_prompts.json"),
            ollama_url: "http://localhost:11434".to_string(),
            generation_model: "llama3.1".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            insert_prefix: Some("search_document: ".to_string()),
            query_prefix: Some("search_query: ".to_string()),
            chunk_chars: DEFAULT_CHUNK_CHARS,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            ingest_concurrency: DEFAULT_CONCURRENCY,
            relevance_threshold: crate::agents::relevance::DEFAULT_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}

impl Settings {
    /// Build settings from the process environment, falling back to
    /// defaults field by field. Unparseable numeric values fall back too.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Self {
            database_path: path_var("COUNSELGRAPH_DB", defaults.database_path),
            forms_dir: path_var("COUNSELGRAPH_FORMS_DIR", defaults.forms_dir),
            legislation_dir: path_var("COUNSELGRAPH_LEGISLATION_DIR", defaults.legislation_dir),
            baseline_prompts_path: path_var(
                "COUNSELGRAPH_BASELINE_PROMPTS",
                defaults.baseline_prompts_path,
            ),
            ollama_url: string_var("OLLAMA_URL", defaults.ollama_url),
            generation_model: string_var("COUNSELGRAPH_GENERATION_MODEL", defaults.generation_model),
            embedding_model: string_var("COUNSELGRAPH_EMBEDDING_MODEL", defaults.embedding_model),
            insert_prefix: optional_var("COUNSELGRAPH_INSERT_PREFIX").or(defaults.insert_prefix),
            query_prefix: optional_var("COUNSELGRAPH_QUERY_PREFIX").or(defaults.query_prefix),
            chunk_chars: parsed_var("COUNSELGRAPH_CHUNK_CHARS", defaults.chunk_chars),
            chunk_overlap: parsed_var("COUNSELGRAPH_CHUNK_OVERLAP", defaults.chunk_overlap),
            ingest_concurrency: parsed_var(
                "COUNSELGRAPH_INGEST_CONCURRENCY",
                defaults.ingest_concurrency,
            ),
            relevance_threshold: parsed_var(
                "COUNSELGRAPH_RELEVANCE_THRESHOLD",
                defaults.relevance_threshold,
            ),
            top_k: parsed_var("COUNSELGRAPH_TOP_K", defaults.top_k),
            step_limit: parsed_var("COUNSELGRAPH_STEP_LIMIT", defaults.step_limit),
        }
    }
}

fn string_var(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn optional_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn path_var(key: &str, default: PathBuf) -> PathBuf {
    std::env::var(key).map(PathBuf::from).unwrap_or(default)
}

fn parsed_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.chunk_chars, DEFAULT_CHUNK_CHARS);
        assert_eq!(settings.top_k, DEFAULT_TOP_K);
        assert!(settings.relevance_threshold > 0.0);
    }
}

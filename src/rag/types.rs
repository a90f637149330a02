//! Shared retrieval types: content kinds, search hits, and the error enum.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two searchable content families in the corpus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Forms,
    Legislation,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Forms => write!(f, "forms"),
            ContentKind::Legislation => write!(f, "legislation"),
        }
    }
}

/// One ranked hit, grouped under its parent source.
///
/// `score` is cosine *distance*: lower is better. Chunk matches for the same
/// source are collapsed into one result carrying the best distance, with the
/// matched chunk texts retained as `snippets`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
    pub kind: ContentKind,
    /// Stable source identifier: form id, or `act code` for legislation.
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    /// Cosine distance of the best-matching chunk. Comparable across content
    /// kinds only when both were embedded by the same provider.
    pub score: f32,
    /// Matched chunk texts, best first.
    pub snippets: Vec<String>,
    pub details: SourceDetails,
}

/// Per-kind metadata attached to a hit.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceDetails {
    Form(FormDetails),
    Legislation(LegislationDetails),
}

/// Fee schedule excerpt for a form hit, when the form has filings on record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FormDetails {
    pub topic_id: Option<String>,
    pub fee_category: Option<String>,
    pub paper_fee: Option<String>,
    pub online_fee: Option<String>,
}

/// Citation for a legislation hit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LegislationDetails {
    pub act: String,
    pub code: String,
}

/// Retrieval-engine failures, spanning ingestion, storage, and providers.
#[derive(Debug, Error)]
pub enum RagError {
    /// A metadata file failed schema validation. Ingestion skips the file
    /// and continues with the rest of the batch.
    #[error("invalid metadata in {path}: {reason}")]
    Validation { path: String, reason: String },

    /// A required corpus directory or store object is absent. Fatal.
    #[error("not found: {0}")]
    NotFound(String),

    /// Database failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Embedding provider failure.
    #[error("embedding provider error: {0}")]
    Embedding(String),

    /// Document file could not be parsed into chunks.
    #[error("failed to extract text from {path}: {reason}")]
    Extraction { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

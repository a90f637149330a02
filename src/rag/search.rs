//! Query-side retrieval: embed once, fan out per content type, merge.

use std::sync::Arc;

use super::embedding::EmbeddingProvider;
use super::store::VectorStore;
use super::types::{ContentKind, RagError, SearchResult};

/// Outcome of a combined query across both content types.
#[derive(Clone, Debug)]
pub struct RetrievalOutcome {
    pub question: String,
    pub forms: Vec<SearchResult>,
    pub legislation: Vec<SearchResult>,
    /// Both lists merged, stable-sorted ascending by distance.
    pub combined: Vec<SearchResult>,
}

/// Search facade over the vector store.
///
/// Holds a single [`EmbeddingProvider`] so scores from both content types
/// live in one vector space and stay comparable after merging.
pub struct RetrievalService {
    store: VectorStore,
    provider: Arc<dyn EmbeddingProvider>,
    query_prefix: Option<String>,
}

impl RetrievalService {
    pub fn new(
        store: VectorStore,
        provider: Arc<dyn EmbeddingProvider>,
        query_prefix: Option<String>,
    ) -> Self {
        Self {
            store,
            provider,
            query_prefix,
        }
    }

    /// Rank one content type against the question.
    pub async fn search(
        &self,
        text: &str,
        top_k: usize,
        kind: ContentKind,
    ) -> Result<Vec<SearchResult>, RagError> {
        let embedding = self
            .provider
            .embed(text, self.query_prefix.as_deref())
            .await?;
        let results = match kind {
            ContentKind::Forms => self.store.search_forms(&embedding, top_k).await?,
            ContentKind::Legislation => self.store.search_legislation(&embedding, top_k).await?,
        };
        tracing::debug!(kind = %kind, hits = results.len(), "search complete");
        Ok(results)
    }

    /// Embed the question once, then rank forms and legislation concurrently.
    pub async fn query(&self, text: &str, top_k: usize) -> Result<RetrievalOutcome, RagError> {
        let embedding = self
            .provider
            .embed(text, self.query_prefix.as_deref())
            .await?;
        let (forms, legislation) = tokio::join!(
            self.store.search_forms(&embedding, top_k),
            self.store.search_legislation(&embedding, top_k),
        );
        let forms = forms?;
        let legislation = legislation?;
        let combined = merge_results(forms.clone(), legislation.clone());
        tracing::debug!(
            forms = forms.len(),
            legislation = legislation.len(),
            "query fan-out complete"
        );
        Ok(RetrievalOutcome {
            question: text.to_string(),
            forms,
            legislation,
            combined,
        })
    }
}

/// Merge two ranked lists into one, ascending by distance.
///
/// The sort is stable, so ties keep their input order (forms before
/// legislation). Scores are only meaningful together when both lists came
/// from the same embedding provider.
pub fn merge_results(
    forms: Vec<SearchResult>,
    legislation: Vec<SearchResult>,
) -> Vec<SearchResult> {
    let mut merged: Vec<SearchResult> = forms.into_iter().chain(legislation).collect();
    merged.sort_by(|a, b| a.score.total_cmp(&b.score));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::types::{FormDetails, LegislationDetails, SourceDetails};

    fn hit(kind: ContentKind, id: &str, score: f32) -> SearchResult {
        SearchResult {
            kind,
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            url: String::new(),
            score,
            snippets: Vec::new(),
            details: match kind {
                ContentKind::Forms => SourceDetails::Form(FormDetails::default()),
                ContentKind::Legislation => SourceDetails::Legislation(LegislationDetails {
                    act: "INA".into(),
                    code: id.to_string(),
                }),
            },
        }
    }

    #[test]
    fn merge_sorts_ascending_by_distance() {
        let forms = vec![
            hit(ContentKind::Forms, "I-765", 0.2),
            hit(ContentKind::Forms, "I-485", 0.6),
        ];
        let legislation = vec![hit(ContentKind::Legislation, "274a", 0.4)];
        let merged = merge_results(forms, legislation);
        let scores: Vec<f32> = merged.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.2, 0.4, 0.6]);
    }

    #[test]
    fn merge_is_stable_on_ties() {
        let forms = vec![hit(ContentKind::Forms, "I-765", 0.5)];
        let legislation = vec![hit(ContentKind::Legislation, "274a", 0.5)];
        let merged = merge_results(forms, legislation);
        assert_eq!(merged[0].kind, ContentKind::Forms);
        assert_eq!(merged[1].kind, ContentKind::Legislation);
    }
}

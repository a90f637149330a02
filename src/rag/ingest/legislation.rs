//! Legislation ingestion: citation metadata plus sibling statute HTML.

use serde::Deserialize;
use std::path::Path;

use super::{FileReport, IngestionPipeline};
use crate::rag::chunking;
use crate::rag::store::LegislationRow;
use crate::rag::types::RagError;

/// Schema of a legislation metadata file.
#[derive(Clone, Debug, Deserialize)]
pub struct LegislationMetadata {
    pub act: String,
    pub code: String,
    pub link: String,
    pub description: String,
}

impl IngestionPipeline {
    pub(crate) async fn process_legislation_file(
        &self,
        path: &Path,
    ) -> Result<FileReport, RagError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let metadata: LegislationMetadata = match serde_json::from_str(&raw) {
            Ok(metadata) => metadata,
            Err(err) => {
                let err = RagError::Validation {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                };
                tracing::warn!(%err, "skipping legislation metadata file");
                return Ok(FileReport {
                    skipped: true,
                    chunks_written: 0,
                });
            }
        };

        if !self
            .store
            .legislation_exists(&metadata.act, &metadata.code)
            .await?
        {
            let embedding = self.embed(&metadata.description).await?;
            self.store
                .insert_legislation(
                    LegislationRow {
                        act: metadata.act.clone(),
                        code: metadata.code.clone(),
                        link: metadata.link.clone(),
                        description: metadata.description.clone(),
                    },
                    embedding,
                )
                .await?;
        }

        let mut chunks_written = 0usize;
        for html_path in super::sibling_files(path, "html") {
            let html = tokio::fs::read_to_string(&html_path).await?;
            let windows = chunking::html_windows(&html, self.config.chunk_chars);

            let mut chunks = Vec::new();
            for window in windows {
                if self
                    .store
                    .legislation_chunk_exists(&metadata.act, &metadata.code, &window)
                    .await?
                {
                    continue;
                }
                let embedding = self.embed(&window).await?;
                chunks.push((window, embedding));
            }
            chunks_written += self
                .store
                .insert_legislation_chunks(&metadata.act, &metadata.code, chunks)
                .await?;
        }

        tracing::debug!(
            act = %metadata.act,
            code = %metadata.code,
            chunks = chunks_written,
            "legislation ingested"
        );
        Ok(FileReport {
            skipped: false,
            chunks_written,
        })
    }
}

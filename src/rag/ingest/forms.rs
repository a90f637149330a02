//! Form family ingestion.
//!
//! One metadata file describes a form family: the parent description, the
//! physical PDFs (form itself plus any instructions documents), fee topics,
//! and optional sibling HTML pages. Instructions documents are detected by
//! naming convention and kept in their own chunk set so primary-document
//! search is not diluted by filing instructions.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::{FileReport, IngestionPipeline};
use crate::rag::chunking;
use crate::rag::store::{ChunkSource, FilingRow, FormDocumentRow, FormRow};
use crate::rag::types::RagError;

/// Schema of a form family metadata file.
#[derive(Clone, Debug, Deserialize)]
pub struct FormMetadata {
    pub id: String,
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(default)]
    pub forms: Vec<FormFile>,
    #[serde(default)]
    pub fees: BTreeMap<String, FeeTopic>,
}

/// One physical document belonging to the family. `id` doubles as the file
/// name of the PDF sitting next to the metadata file.
#[derive(Clone, Debug, Deserialize)]
pub struct FormFile {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
}

impl FormFile {
    /// Instructions documents say so in their title or carry an `instr`
    /// marker in the file name.
    pub fn is_instructions(&self) -> bool {
        self.title.contains("Instructions") || self.id.contains("instr")
    }
}

/// A filing topic with its per-category fee lines.
#[derive(Clone, Debug, Deserialize)]
pub struct FeeTopic {
    pub topic_id: String,
    #[serde(default)]
    pub filings: Vec<Filing>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Filing {
    pub category: String,
    #[serde(default)]
    pub paper_fee: Option<String>,
    #[serde(default)]
    pub online_fee: Option<String>,
}

impl IngestionPipeline {
    pub(crate) async fn process_form_file(&self, path: &Path) -> Result<FileReport, RagError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let metadata: FormMetadata = match serde_json::from_str(&raw) {
            Ok(metadata) => metadata,
            Err(err) => {
                let err = RagError::Validation {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                };
                tracing::warn!(%err, "skipping form metadata file");
                return Ok(FileReport {
                    skipped: true,
                    chunks_written: 0,
                });
            }
        };

        let mut chunks_written = 0usize;

        if !self.store.form_exists(&metadata.id).await? {
            let embedding = self.embed(&metadata.description).await?;
            self.store
                .insert_form(
                    FormRow {
                        form_id: metadata.id.clone(),
                        title: metadata.title.clone(),
                        link: metadata.link.clone(),
                        description: metadata.description.clone(),
                    },
                    embedding,
                )
                .await?;
        }

        for file in &metadata.forms {
            let source = if file.is_instructions() {
                ChunkSource::Instructions
            } else {
                ChunkSource::Pdf
            };
            chunks_written += self.process_pdf(path, &metadata.id, file, source).await?;
        }

        for topic in metadata.fees.values() {
            let filings = topic
                .filings
                .iter()
                .map(|filing| FilingRow {
                    category: filing.category.clone(),
                    paper_fee: filing.paper_fee.clone(),
                    online_fee: filing.online_fee.clone(),
                })
                .collect::<Vec<_>>();
            if !filings.is_empty() {
                self.store
                    .insert_filings(&metadata.id, &topic.topic_id, filings)
                    .await?;
            }
        }

        chunks_written += self.process_form_html(path, &metadata).await?;

        tracing::debug!(
            form = %metadata.id,
            chunks = chunks_written,
            "form family ingested"
        );
        Ok(FileReport {
            skipped: false,
            chunks_written,
        })
    }

    async fn process_pdf(
        &self,
        metadata_path: &Path,
        form_id: &str,
        file: &FormFile,
        source: ChunkSource,
    ) -> Result<usize, RagError> {
        if self.store.form_document_exists(form_id, &file.id).await? {
            tracing::debug!(form = form_id, document = %file.id, "document already ingested");
            return Ok(0);
        }
        let pdf_path = match metadata_path.parent() {
            Some(dir) => dir.join(&file.id),
            None => return Ok(0),
        };
        if !pdf_path.is_file() {
            tracing::warn!(form = form_id, path = %pdf_path.display(), "referenced PDF missing");
            return Ok(0);
        }

        // PDF extraction is synchronous; keep it off the runtime threads.
        let pages = tokio::task::spawn_blocking(move || chunking::pdf_pages(&pdf_path))
            .await
            .map_err(|err| RagError::Storage(err.to_string()))??;

        let mut chunks = Vec::new();
        for page in pages {
            if self.store.form_chunk_exists(form_id, &page).await? {
                continue;
            }
            let embedding = self.embed(&page).await?;
            chunks.push((page, embedding));
        }

        self.store
            .insert_form_document(
                FormDocumentRow {
                    form_id: form_id.to_string(),
                    file_name: file.id.clone(),
                    url: file.link.clone(),
                    title: file.title.clone(),
                },
                source,
                chunks,
            )
            .await
    }

    async fn process_form_html(
        &self,
        metadata_path: &Path,
        metadata: &FormMetadata,
    ) -> Result<usize, RagError> {
        let mut written = 0usize;
        for html_path in super::sibling_files(metadata_path, "html") {
            let file_name = html_path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("page.html")
                .to_string();
            let html = tokio::fs::read_to_string(&html_path).await?;
            let windows = chunking::html_windows(&html, self.config.chunk_chars);

            let mut chunks = Vec::new();
            for window in windows {
                if self.store.form_chunk_exists(&metadata.id, &window).await? {
                    continue;
                }
                let embedding = self.embed(&window).await?;
                chunks.push((window, embedding));
            }
            written += self
                .store
                .insert_form_document(
                    FormDocumentRow {
                        form_id: metadata.id.clone(),
                        file_name,
                        url: Some(metadata.link.clone()),
                        title: metadata.title.clone(),
                    },
                    ChunkSource::Html,
                    chunks,
                )
                .await?;
        }
        Ok(written)
    }
}

//! Corpus ingestion: walk metadata files, chunk and embed their documents,
//! and write everything to the vector store.
//!
//! Each metadata file is processed as an independent unit of work under an
//! admission semaphore. A file that fails schema validation is logged and
//! skipped; the rest of the batch continues. Any other failure aborts the
//! run so a broken store or provider is not papered over.
//!
//! Re-running `populate` over the same corpus is a no-op: every chunk is
//! checked against the store before it is embedded, and UNIQUE constraints
//! backstop the write. The check-then-insert window is only closed within
//! one process; concurrent ingestors sharing a database rely on the
//! constraints alone.

mod forms;
mod legislation;

pub use forms::{FeeTopic, Filing, FormFile, FormMetadata};
pub use legislation::LegislationMetadata;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use walkdir::WalkDir;

use super::embedding::EmbeddingProvider;
use super::store::VectorStore;
use super::types::RagError;

/// Default number of metadata files processed concurrently.
pub const DEFAULT_CONCURRENCY: usize = 5;

#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Window size in characters for HTML and text chunks.
    pub chunk_chars: usize,
    /// Overlap in characters between consecutive text windows.
    pub chunk_overlap: usize,
    /// Admission semaphore permits.
    pub concurrency: usize,
    /// Instruction prepended to texts at insertion time.
    pub insert_prefix: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_chars: super::chunking::DEFAULT_CHUNK_CHARS,
            chunk_overlap: super::chunking::DEFAULT_CHUNK_OVERLAP,
            concurrency: DEFAULT_CONCURRENCY,
            insert_prefix: None,
        }
    }
}

/// What a populate run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopulateReport {
    /// Metadata files fully processed.
    pub processed: usize,
    /// Metadata files skipped after validation failure.
    pub skipped: usize,
    /// New chunks written to the store.
    pub chunks_written: usize,
}

/// Outcome of one metadata file's worth of work.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FileReport {
    pub skipped: bool,
    pub chunks_written: usize,
}

#[derive(Clone)]
pub struct IngestionPipeline {
    pub(crate) store: VectorStore,
    pub(crate) provider: Arc<dyn EmbeddingProvider>,
    pub(crate) config: IngestConfig,
}

impl IngestionPipeline {
    pub fn new(
        store: VectorStore,
        provider: Arc<dyn EmbeddingProvider>,
        config: IngestConfig,
    ) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    /// Ingest both corpora. Directories must exist; a missing corpus root is
    /// fatal rather than an empty run.
    pub async fn populate(
        &self,
        forms_dir: &Path,
        legislation_dir: &Path,
    ) -> Result<PopulateReport, RagError> {
        for dir in [forms_dir, legislation_dir] {
            if !dir.is_dir() {
                return Err(RagError::NotFound(format!(
                    "corpus directory {}",
                    dir.display()
                )));
            }
        }

        let mut report = self
            .run_batch(metadata_files(forms_dir), |pipeline, path| async move {
                pipeline.process_form_file(&path).await
            })
            .await?;
        let legislation = self
            .run_batch(
                metadata_files(legislation_dir),
                |pipeline, path| async move { pipeline.process_legislation_file(&path).await },
            )
            .await?;

        report.processed += legislation.processed;
        report.skipped += legislation.skipped;
        report.chunks_written += legislation.chunks_written;
        tracing::info!(
            processed = report.processed,
            skipped = report.skipped,
            chunks = report.chunks_written,
            "corpus populate complete"
        );
        Ok(report)
    }

    /// Drop all ingested content. Explicit only.
    pub async fn clear(&self) -> Result<(), RagError> {
        self.store.clear().await
    }

    async fn run_batch<F, Fut>(&self, files: Vec<PathBuf>, work: F) -> Result<PopulateReport, RagError>
    where
        F: Fn(IngestionPipeline, PathBuf) -> Fut + Send + Sync + Clone + 'static,
        Fut: std::future::Future<Output = Result<FileReport, RagError>> + Send,
    {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut tasks: JoinSet<Result<FileReport, RagError>> = JoinSet::new();

        for path in files {
            let pipeline = self.clone();
            let semaphore = semaphore.clone();
            let work = work.clone();
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| RagError::Storage("ingestion semaphore closed".into()))?;
                work(pipeline, path).await
            });
        }

        let mut report = PopulateReport::default();
        while let Some(joined) = tasks.join_next().await {
            let file = joined.map_err(|err| RagError::Storage(err.to_string()))??;
            if file.skipped {
                report.skipped += 1;
            } else {
                report.processed += 1;
                report.chunks_written += file.chunks_written;
            }
        }
        Ok(report)
    }

    pub(crate) async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        self.provider
            .embed(text, self.config.insert_prefix.as_deref())
            .await
    }
}

fn metadata_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().and_then(|ext| ext.to_str()) == Some("json")
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Sibling files of a metadata file with the given extension.
pub(crate) fn sibling_files(metadata_path: &Path, extension: &str) -> Vec<PathBuf> {
    let Some(dir) = metadata_path.parent() else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(extension)
        })
        .collect();
    files.sort();
    files
}

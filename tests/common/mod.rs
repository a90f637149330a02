#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use counselgraph::agent::{Agent, AgentError};
use counselgraph::inference::{Generator, InferenceError};
use counselgraph::rag::embedding::MockEmbeddingProvider;
use counselgraph::rag::ingest::{IngestConfig, IngestionPipeline};
use counselgraph::rag::store::VectorStore;
use counselgraph::state::{ConversationState, HistoryEntry, StatePartial};
use counselgraph::types::{AgentKind, Flow};

/// Agent that replays a fixed partial and routing decision, counting calls.
pub struct ScriptedAgent {
    kind: AgentKind,
    flow: Flow,
    calls: Arc<AtomicUsize>,
}

impl ScriptedAgent {
    pub fn new(kind: AgentKind, flow: Flow) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                kind,
                flow,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn invoke(&self, _state: &ConversationState) -> Result<StatePartial, AgentError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(StatePartial::new().with_history_entry(HistoryEntry::now(
            self.kind.clone(),
            json!({ "call": call }),
        )))
    }

    fn route(&self, _state: &ConversationState) -> Flow {
        self.flow.clone()
    }
}

/// Agent that always fails.
pub struct FailingAgent;

#[async_trait]
impl Agent for FailingAgent {
    async fn invoke(&self, _state: &ConversationState) -> Result<StatePartial, AgentError> {
        Err(AgentError::MissingInput { what: "question" })
    }

    fn route(&self, _state: &ConversationState) -> Flow {
        Flow::Terminal
    }
}

/// Generator that returns a draft on the first call and a grounded answer on
/// every call after that.
#[derive(Default)]
pub struct MockGenerator {
    calls: AtomicUsize,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn answer(&self, _system: &str, _prompt: &str) -> Result<String, InferenceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(if call == 0 {
            "draft answer".to_string()
        } else {
            "final answer".to_string()
        })
    }
}

/// Baseline prompt shared by relevance tests; word overlap with it drives
/// the mock embedder's similarity.
pub const BASELINE_QUESTION: &str = "how do i renew my employment authorization card";

/// A question far from the baseline in bag-of-words space.
pub const OFF_TOPIC_QUESTION: &str = "what is the weather forecast today";

/// Write a two-family sample corpus under `root` and return the forms and
/// legislation roots.
pub fn write_sample_corpus(root: &Path) -> (PathBuf, PathBuf) {
    let forms_root = root.join("forms");
    let legislation_root = root.join("legislation");

    let form_dir = forms_root.join("i-765");
    std::fs::create_dir_all(&form_dir).unwrap();
    std::fs::write(
        form_dir.join("metadata.json"),
        serde_json::to_string_pretty(&json!({
            "id": "I-765",
            "title": "Application for Employment Authorization",
            "link": "https://example.gov/i-765",
            "description": "Request an employment authorization document to work lawfully",
            "forms": [],
            "fees": {
                "direct": {
                    "topic_id": "97",
                    "filings": [
                        {
                            "category": "General filing",
                            "paper_fee": "$520",
                            "online_fee": "$470"
                        }
                    ]
                }
            }
        }))
        .unwrap(),
    )
    .unwrap();
    std::fs::write(
        form_dir.join("page.html"),
        "<html><body><p>To renew your employment authorization document, file this \
         form before your current card expires.</p></body></html>",
    )
    .unwrap();

    let legislation_dir = legislation_root.join("ina-274a");
    std::fs::create_dir_all(&legislation_dir).unwrap();
    std::fs::write(
        legislation_dir.join("metadata.json"),
        serde_json::to_string_pretty(&json!({
            "act": "INA",
            "code": "274A",
            "link": "https://example.gov/ina-274a",
            "description": "Unlawful employment of aliens and employment verification requirements"
        }))
        .unwrap(),
    )
    .unwrap();
    std::fs::write(
        legislation_dir.join("statute.html"),
        "<html><body><p>It is unlawful for a person to hire an alien for employment \
         without completing the employment verification system.</p></body></html>",
    )
    .unwrap();

    (forms_root, legislation_root)
}

/// In-memory store plus a pipeline over it with the mock embedder.
pub async fn mock_pipeline() -> (IngestionPipeline, VectorStore, Arc<MockEmbeddingProvider>) {
    let store = VectorStore::open_in_memory().await.unwrap();
    let provider = Arc::new(MockEmbeddingProvider::new());
    let pipeline = IngestionPipeline::new(store.clone(), provider.clone(), IngestConfig::default());
    (pipeline, store, provider)
}

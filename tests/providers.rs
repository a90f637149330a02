use httpmock::prelude::*;
use serde_json::json;

use counselgraph::inference::{Generator, InferenceError, OllamaGenerator};
use counselgraph::rag::embedding::{EmbeddingProvider, OllamaEmbedder};
use counselgraph::rag::types::RagError;

#[tokio::test]
async fn embedder_sends_prefixed_prompt_and_parses_vector() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embeddings").json_body(json!({
                "model": "embed-test",
                "prompt": "search_query: green card renewal",
            }));
            then.status(200)
                .json_body(json!({ "embedding": [0.25, -0.5, 0.75] }));
        })
        .await;

    let embedder = OllamaEmbedder::new(&server.base_url(), "embed-test").unwrap();
    assert_eq!(embedder.dimensions(), OllamaEmbedder::DEFAULT_DIMENSIONS);

    let vector = embedder
        .embed("green card renewal", Some("search_query: "))
        .await
        .unwrap();

    assert_eq!(vector, vec![0.25, -0.5, 0.75]);
    mock.assert_async().await;
}

#[tokio::test]
async fn embedder_surfaces_server_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embeddings");
            then.status(500).body("model not loaded");
        })
        .await;

    let embedder = OllamaEmbedder::new(&server.base_url(), "embed-test").unwrap();
    let err = embedder.embed("anything", None).await.unwrap_err();
    assert!(matches!(err, RagError::Embedding(_)));
}

#[tokio::test]
async fn embedder_rejects_empty_vectors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embeddings");
            then.status(200).json_body(json!({ "embedding": [] }));
        })
        .await;

    let embedder = OllamaEmbedder::new(&server.base_url(), "embed-test").unwrap();
    let err = embedder.embed("anything", None).await.unwrap_err();
    assert!(matches!(err, RagError::Embedding(_)));
}

#[tokio::test]
async fn generator_posts_system_and_prompt_without_streaming() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate").json_body(json!({
                "model": "gen-test",
                "system": "You are terse.",
                "prompt": "Which form renews a green card?",
                "stream": false,
            }));
            then.status(200).json_body(json!({
                "response": "Form I-90.",
                "done": true,
            }));
        })
        .await;

    let generator = OllamaGenerator::new(&server.base_url(), "gen-test").unwrap();
    let answer = generator
        .answer("You are terse.", "Which form renews a green card?")
        .await
        .unwrap();

    assert_eq!(answer, "Form I-90.");
    mock.assert_async().await;
}

#[tokio::test]
async fn generator_surfaces_api_rejections() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(404).body("model missing");
        })
        .await;

    let generator = OllamaGenerator::new(&server.base_url(), "gen-test").unwrap();
    let err = generator.answer("sys", "prompt").await.unwrap_err();
    match err {
        InferenceError::Api { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "model missing");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

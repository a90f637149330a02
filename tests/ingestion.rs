mod common;

use common::*;

use counselgraph::rag::embedding::EmbeddingProvider;
use counselgraph::rag::store::{ChunkSource, FormDocumentRow, FormRow};
use counselgraph::rag::types::RagError;

#[tokio::test]
async fn populate_ingests_both_corpora() {
    let (pipeline, store, _) = mock_pipeline().await;
    let tmp = tempfile::tempdir().unwrap();
    let (forms_dir, legislation_dir) = write_sample_corpus(tmp.path());

    let report = pipeline.populate(&forms_dir, &legislation_dir).await.unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped, 0);
    assert!(report.chunks_written > 0);

    let counts = store.counts().await.unwrap();
    assert_eq!(counts.forms, 1);
    assert_eq!(counts.legislation, 1);
    assert_eq!(counts.form_filings, 1);
    assert!(counts.form_chunks > 0);
    assert!(counts.legislation_chunks > 0);
}

#[tokio::test]
async fn populate_is_idempotent() {
    let (pipeline, store, _) = mock_pipeline().await;
    let tmp = tempfile::tempdir().unwrap();
    let (forms_dir, legislation_dir) = write_sample_corpus(tmp.path());

    pipeline.populate(&forms_dir, &legislation_dir).await.unwrap();
    let first = store.counts().await.unwrap();

    let second_report = pipeline.populate(&forms_dir, &legislation_dir).await.unwrap();
    let second = store.counts().await.unwrap();

    assert_eq!(first, second, "second run must not change the store");
    assert_eq!(second_report.chunks_written, 0);
}

#[tokio::test]
async fn invalid_metadata_skips_the_file_but_not_the_batch() {
    let (pipeline, store, _) = mock_pipeline().await;
    let tmp = tempfile::tempdir().unwrap();
    let (forms_dir, legislation_dir) = write_sample_corpus(tmp.path());

    let broken_dir = forms_dir.join("broken");
    std::fs::create_dir_all(&broken_dir).unwrap();
    std::fs::write(broken_dir.join("metadata.json"), "{ not json").unwrap();

    let report = pipeline.populate(&forms_dir, &legislation_dir).await.unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.processed, 2);

    let counts = store.counts().await.unwrap();
    assert_eq!(counts.forms, 1, "the valid form family still landed");
}

#[tokio::test]
async fn missing_corpus_directory_is_fatal() {
    let (pipeline, _, _) = mock_pipeline().await;
    let tmp = tempfile::tempdir().unwrap();
    let (forms_dir, _) = write_sample_corpus(tmp.path());

    let err = pipeline
        .populate(&forms_dir, &tmp.path().join("does-not-exist"))
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::NotFound(_)));
}

#[tokio::test]
async fn clear_empties_every_pipeline_owned_table() {
    let (pipeline, store, _) = mock_pipeline().await;
    let tmp = tempfile::tempdir().unwrap();
    let (forms_dir, legislation_dir) = write_sample_corpus(tmp.path());
    pipeline.populate(&forms_dir, &legislation_dir).await.unwrap();

    pipeline.clear().await.unwrap();
    let counts = store.counts().await.unwrap();
    assert_eq!(counts.forms, 0);
    assert_eq!(counts.form_documents, 0);
    assert_eq!(counts.form_chunks, 0);
    assert_eq!(counts.form_filings, 0);
    assert_eq!(counts.legislation, 0);
    assert_eq!(counts.legislation_chunks, 0);
}

#[tokio::test]
async fn duplicate_chunks_within_a_unit_are_written_once() {
    let (_, store, provider) = mock_pipeline().await;

    let embed = |text: &str| {
        let provider = provider.clone();
        let text = text.to_string();
        async move { provider.embed(&text, None).await.unwrap() }
    };

    store
        .insert_legislation(
            counselgraph::rag::store::LegislationRow {
                act: "INA".into(),
                code: "212".into(),
                link: "https://example.gov/ina-212".into(),
                description: "Inadmissible aliens".into(),
            },
            embed("Inadmissible aliens").await,
        )
        .await
        .unwrap();

    // Chunk two is already on record before the batch arrives.
    store
        .insert_legislation_chunks(
            "INA",
            "212",
            vec![("chunk two".to_string(), embed("chunk two").await)],
        )
        .await
        .unwrap();

    let written = store
        .insert_legislation_chunks(
            "INA",
            "212",
            vec![
                ("chunk one".to_string(), embed("chunk one").await),
                ("chunk two".to_string(), embed("chunk two").await),
                ("chunk three".to_string(), embed("chunk three").await),
            ],
        )
        .await
        .unwrap();

    assert_eq!(written, 2, "only the new chunks are written");
    let counts = store.counts().await.unwrap();
    assert_eq!(counts.legislation_chunks, 3);
}

#[tokio::test]
async fn instruction_chunks_stay_out_of_primary_search() {
    let (_, store, provider) = mock_pipeline().await;

    store
        .insert_form(
            FormRow {
                form_id: "I-131".into(),
                title: "Application for Travel Document".into(),
                link: "https://example.gov/i-131".into(),
                description: "Reentry permits and advance parole travel documents".into(),
            },
            provider
                .embed("Reentry permits and advance parole travel documents", None)
                .await
                .unwrap(),
        )
        .await
        .unwrap();

    let instructions_text = "carefully assemble and mail your completed application packet";
    store
        .insert_form_document(
            FormDocumentRow {
                form_id: "I-131".into(),
                file_name: "i-131instr.pdf".into(),
                url: None,
                title: "Instructions for Form I-131".into(),
            },
            ChunkSource::Instructions,
            vec![(
                instructions_text.to_string(),
                provider.embed(instructions_text, None).await.unwrap(),
            )],
        )
        .await
        .unwrap();

    let query = provider
        .embed("assemble and mail your application", None)
        .await
        .unwrap();
    let results = store.search_forms(&query, 10).await.unwrap();
    for result in &results {
        assert!(
            result
                .snippets
                .iter()
                .all(|snippet| !snippet.contains("assemble and mail")),
            "instruction text must not surface as a primary snippet"
        );
    }
}

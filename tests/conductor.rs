mod common;

use common::*;
use std::sync::Arc;

use counselgraph::agent::{Agent, AgentError};
use counselgraph::agents::{
    self, ReasoningAgent, RelevanceAgent, RetrievalAgent, TimelineAgent,
};
use counselgraph::graphs::{Conductor, ConductorError, GraphBuilder};
use counselgraph::rag::search::RetrievalService;
use counselgraph::state::{ConversationState, GenerationStage, Relevance};
use counselgraph::types::{AgentKind, Flow};

fn kind(name: &str) -> AgentKind {
    AgentKind::Custom(name.to_string())
}

#[tokio::test]
async fn agents_run_sequentially_in_history_order() {
    let (a, a_calls) = ScriptedAgent::new(kind("A"), Flow::Next(kind("B")));
    let (b, b_calls) = ScriptedAgent::new(kind("B"), Flow::Next(kind("C")));
    let (c, c_calls) = ScriptedAgent::new(kind("C"), Flow::Terminal);

    let graph = GraphBuilder::new()
        .add_agent(kind("A"), Arc::new(a))
        .add_agent(kind("B"), Arc::new(b))
        .add_agent(kind("C"), Arc::new(c))
        .set_entry(kind("A"))
        .add_edge(kind("A"), kind("B"))
        .add_edge(kind("B"), kind("C"))
        .compile()
        .unwrap();

    let state = Conductor::new(graph).ask("q").await.unwrap();
    let order: Vec<AgentKind> = state.history.iter().map(|e| e.agent.clone()).collect();
    assert_eq!(order, vec![kind("A"), kind("B"), kind("C")]);
    assert_eq!(a_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(c_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cyclic_graph_hits_the_step_limit_instead_of_hanging() {
    let (looping, _) = ScriptedAgent::new(kind("Loop"), Flow::Next(kind("Loop")));
    let graph = GraphBuilder::new()
        .add_agent(kind("Loop"), Arc::new(looping))
        .set_entry(kind("Loop"))
        .add_edge(kind("Loop"), kind("Loop"))
        .compile()
        .unwrap();

    let err = Conductor::new(graph)
        .with_step_limit(5)
        .ask("q")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ConductorError::StepLimitExceeded { limit: 5 }
    ));
}

#[tokio::test]
async fn routing_to_an_undeclared_edge_is_fatal() {
    let (a, _) = ScriptedAgent::new(kind("A"), Flow::Next(kind("B")));
    let (b, b_calls) = ScriptedAgent::new(kind("B"), Flow::Terminal);
    // B is registered, but the A -> B edge is never declared.
    let graph = GraphBuilder::new()
        .add_agent(kind("A"), Arc::new(a))
        .add_agent(kind("B"), Arc::new(b))
        .set_entry(kind("A"))
        .compile()
        .unwrap();

    let err = Conductor::new(graph).ask("q").await.unwrap_err();
    match err {
        ConductorError::UndeclaredRoute { from, target } => {
            assert_eq!(from, kind("A"));
            assert_eq!(target, kind("B"));
        }
        other => panic!("expected UndeclaredRoute, got {other:?}"),
    }
    assert_eq!(b_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn agent_errors_propagate_unmodified() {
    let graph = GraphBuilder::new()
        .add_agent(kind("Fail"), Arc::new(FailingAgent))
        .set_entry(kind("Fail"))
        .compile()
        .unwrap();

    let err = Conductor::new(graph).ask("q").await.unwrap_err();
    assert!(matches!(
        err,
        ConductorError::Agent(AgentError::MissingInput { what: "question" })
    ));
}

async fn standard_conductor_with_corpus(populate: bool) -> Conductor {
    let (pipeline, store, provider) = mock_pipeline().await;
    if populate {
        let tmp = tempfile::tempdir().unwrap();
        let (forms_dir, legislation_dir) = write_sample_corpus(tmp.path());
        pipeline.populate(&forms_dir, &legislation_dir).await.unwrap();
    }

    let service = Arc::new(RetrievalService::new(store, provider.clone(), None));
    let graph = agents::standard_graph(
        RelevanceAgent::new(provider, vec![BASELINE_QUESTION.to_string()], 0.4)
            .await
            .unwrap(),
        ReasoningAgent::new(Arc::new(MockGenerator::new())),
        RetrievalAgent::new(service, 5),
        TimelineAgent::new(),
    )
    .unwrap();
    Conductor::new(graph)
}

async fn standard_conductor() -> Conductor {
    standard_conductor_with_corpus(true).await
}

#[tokio::test]
async fn off_topic_question_terminates_at_the_relevance_gate() {
    let conductor = standard_conductor().await;
    let state = conductor.ask(OFF_TOPIC_QUESTION).await.unwrap();

    assert_eq!(state.relevance, Relevance::Irrelevant);
    assert!(state.final_response.is_none());
    assert!(state.forms.is_empty());
    let agents_run: Vec<AgentKind> = state.history.iter().map(|e| e.agent.clone()).collect();
    assert_eq!(agents_run, vec![AgentKind::Relevance]);
}

#[tokio::test]
async fn on_topic_question_runs_the_full_path_to_a_final_answer() {
    let conductor = standard_conductor().await;
    let state = conductor
        .ask("how do i renew my employment authorization")
        .await
        .unwrap();

    assert_eq!(state.relevance, Relevance::Relevant);
    assert_eq!(state.generation_stage, GenerationStage::Final);
    assert_eq!(state.final_response.as_deref(), Some("final answer"));
    assert_eq!(state.initial_response.as_deref(), Some("draft answer"));
    assert!(!state.forms.is_empty(), "expected form hits for an EAD question");
    assert!(!state.timeline.is_empty(), "forms should produce timeline lines");

    let agents_run: Vec<AgentKind> = state.history.iter().map(|e| e.agent.clone()).collect();
    assert_eq!(
        agents_run,
        vec![
            AgentKind::Relevance,
            AgentKind::Reasoning,
            AgentKind::Retrieval,
            AgentKind::Timeline,
            AgentKind::Reasoning,
        ]
    );

    let summary = state.summary();
    assert_eq!(summary.final_response.as_deref(), Some("final answer"));
    assert!(summary
        .forms
        .iter()
        .any(|title| title.contains("Employment Authorization")));
}

#[tokio::test]
async fn reasoning_contributes_nothing_once_generation_is_closed() {
    let agent = ReasoningAgent::new(Arc::new(MockGenerator::new()));
    let mut state = ConversationState::new_with_question("how do i renew my green card");
    state.generation_stage = GenerationStage::Final;
    state.final_response = Some("grounded answer".to_string());

    let partial = agent.invoke(&state).await.unwrap();
    assert!(partial.is_empty(), "a closed conversation takes no further updates");
}

#[tokio::test]
async fn relevant_question_with_an_empty_corpus_hits_the_step_limit() {
    // Nothing ingested: retrieval keeps coming back empty, so the
    // reasoning/retrieval pair cycles until the ceiling trips.
    let conductor = standard_conductor_with_corpus(false).await;
    let err = conductor
        .with_step_limit(8)
        .ask("how do i renew my employment authorization")
        .await
        .unwrap_err();
    assert!(matches!(err, ConductorError::StepLimitExceeded { limit: 8 }));
}

#[tokio::test]
async fn verbose_runs_complete_like_quiet_ones() {
    let conductor = standard_conductor().await;
    let state = conductor
        .run(
            ConversationState::new_with_question("how do i renew my employment authorization")
                .with_verbose(true),
        )
        .await
        .unwrap();
    assert!(state.verbose);
    assert_eq!(state.final_response.as_deref(), Some("final answer"));
}

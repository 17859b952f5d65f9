// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! RAG engine orchestration tests with fake collaborators.

use std::sync::Arc;

use rag_node::rag::{RagEngine, RagError, NO_INFO_ANSWER, TOP_K};

use super::mocks::*;

fn engine(
    embedder: Arc<FixedEmbedder>,
    index: Arc<StaticIndex>,
    generator: Arc<RecordingGenerator>,
) -> RagEngine {
    RagEngine::new(embedder, index, generator)
}

#[tokio::test]
async fn test_no_matches_returns_fixed_answer_without_generation() {
    let embedder = Arc::new(FixedEmbedder::new());
    let index = Arc::new(StaticIndex::empty());
    let generator = Arc::new(RecordingGenerator::new("should never be used"));

    let outcome = engine(embedder.clone(), index.clone(), generator.clone())
        .answer_question("What is diabetes?")
        .await
        .unwrap();

    assert_eq!(outcome.answer, NO_INFO_ANSWER);
    assert!(outcome.context.is_empty());
    assert_eq!(generator.prompt_count(), 0, "generator must not be called");
    assert_eq!(embedder.call_count(), 1);
}

#[tokio::test]
async fn test_no_info_answer_is_independent_of_question_content() {
    for question in ["What is diabetes?", "", "completely unrelated text"] {
        let outcome = engine(
            Arc::new(FixedEmbedder::new()),
            Arc::new(StaticIndex::empty()),
            Arc::new(RecordingGenerator::new("unused")),
        )
        .answer_question(question)
        .await
        .unwrap();
        assert_eq!(outcome.answer, NO_INFO_ANSWER);
    }
}

#[tokio::test]
async fn test_query_uses_top_k_three() {
    let index = Arc::new(StaticIndex::empty());
    engine(
        Arc::new(FixedEmbedder::new()),
        index.clone(),
        Arc::new(RecordingGenerator::new("unused")),
    )
    .answer_question("q")
    .await
    .unwrap();

    let queries = index.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].1, TOP_K);
    assert_eq!(TOP_K, 3);
}

#[tokio::test]
async fn test_prompt_joins_matched_texts_with_blank_line() {
    let matches = vec![
        make_match("a", "first chunk", 0.9),
        make_match("b", "second chunk", 0.8),
        make_match("c", "third chunk", 0.7),
    ];
    let generator = Arc::new(RecordingGenerator::new("An answer."));

    let outcome = engine(
        Arc::new(FixedEmbedder::new()),
        Arc::new(StaticIndex::with_matches(matches)),
        generator.clone(),
    )
    .answer_question("What is diabetes?")
    .await
    .unwrap();

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("first chunk\n\nsecond chunk\n\nthird chunk"));
    assert!(prompts[0].contains("Question: What is diabetes?"));

    assert_eq!(outcome.answer, "An answer.");
}

#[tokio::test]
async fn test_context_preserves_match_order_and_length() {
    let matches = vec![
        make_match("a", "one", 0.9),
        make_match("b", "two", 0.8),
        make_match("c", "three", 0.7),
    ];

    let outcome = engine(
        Arc::new(FixedEmbedder::new()),
        Arc::new(StaticIndex::with_matches(matches.clone())),
        Arc::new(RecordingGenerator::new("answer")),
    )
    .answer_question("q")
    .await
    .unwrap();

    assert_eq!(outcome.context.len(), matches.len());
    let ids: Vec<&str> = outcome.context.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_generator_failure_embeds_error_and_keeps_context() {
    let matches = vec![make_match("a", "some text", 0.9)];

    let outcome = RagEngine::new(
        Arc::new(FixedEmbedder::new()),
        Arc::new(StaticIndex::with_matches(matches)),
        Arc::new(FailingGenerator),
    )
    .answer_question("q")
    .await
    .unwrap();

    assert!(outcome.answer.starts_with("Error generating answer:"));
    assert!(outcome.answer.contains("model overloaded"));
    assert_eq!(outcome.context.len(), 1, "context survives generator failure");
}

#[tokio::test]
async fn test_embedding_failure_propagates() {
    let result = RagEngine::new(
        Arc::new(FailingEmbedder),
        Arc::new(StaticIndex::empty()),
        Arc::new(RecordingGenerator::new("unused")),
    )
    .answer_question("q")
    .await;

    assert!(matches!(result, Err(RagError::Embed(_))));
}

#[tokio::test]
async fn test_index_failure_propagates() {
    let result = RagEngine::new(
        Arc::new(FixedEmbedder::new()),
        Arc::new(StaticIndex::failing()),
        Arc::new(RecordingGenerator::new("unused")),
    )
    .answer_question("q")
    .await;

    assert!(matches!(result, Err(RagError::Index(_))));
}

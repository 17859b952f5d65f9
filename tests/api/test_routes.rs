// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP route tests driven through the router with `tower::ServiceExt`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rag_node::api::{build_router, AppState, TIMEOUT_DETAIL};
use rag_node::ingest::{Document, LoadError};
use rag_node::rag::NO_INFO_ANSWER;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use super::mocks::*;

async fn send(
    state: AppState,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let app = build_router(state);
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_root_liveness() {
    let (status, body) = send(state_with_matches(vec![], "unused"), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "RAG API is running");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(state_with_matches(vec![], "unused"), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_chat_with_matches() {
    let state = state_with_matches(
        vec![
            make_match("a", "first chunk", 0.9),
            make_match("b", "second chunk", 0.8),
        ],
        "Diabetes is a chronic condition.",
    );

    let (status, body) = send(
        state,
        "POST",
        "/chat",
        Some(json!({ "message": "What is diabetes?" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"], "What is diabetes?");
    assert_eq!(body["answer"], "Diabetes is a chronic condition.");
    let documents = body["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0]["id"], "a");
    assert_eq!(documents[0]["metadata"]["text"], "first chunk");
}

#[tokio::test]
async fn test_chat_without_indexed_content() {
    let (status, body) = send(
        state_with_matches(vec![], "unused"),
        "POST",
        "/chat",
        Some(json!({ "message": "What is diabetes?" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], NO_INFO_ANSWER);
    assert!(body["documents"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_empty_message_is_400() {
    let (status, body) = send(
        state_with_matches(vec![], "unused"),
        "POST",
        "/chat",
        Some(json!({ "message": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_chat_upstream_failure_is_500_with_detail() {
    let (status, body) = send(
        state_with_failing_index(),
        "POST",
        "/chat",
        Some(json!({ "message": "q" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("index unreachable"));
}

#[tokio::test]
async fn test_chat_timeout_is_504() {
    let state = state_with_slow_generator().with_chat_timeout(Duration::from_millis(100));

    let (status, body) = send(state, "POST", "/chat", Some(json!({ "message": "q" }))).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["detail"], TIMEOUT_DETAIL);
}

#[tokio::test]
async fn test_indexing_success_names_chunks_url_namespace() {
    let state = state_with_loader(StaticLoader {
        result: Ok(vec![Document {
            text: "A short page that fits in one chunk.".to_string(),
            source: "https://example.com".to_string(),
            title: None,
        }]),
    });

    let (status, body) = send(
        state,
        "POST",
        "/indexing",
        Some(json!({ "message": "https://example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response = body["response"].as_str().unwrap();
    assert!(response.contains("1 chunks"));
    assert!(response.contains("example.com"));
    assert!(response.contains("ns1"));
}

#[tokio::test]
async fn test_indexing_load_failure_is_400() {
    let state = state_with_loader(StaticLoader {
        result: Err(LoadError::Http("connection refused".to_string())),
    });

    let (status, body) = send(
        state,
        "POST",
        "/indexing",
        Some(json!({ "message": "https://example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Failed to load"));
    assert!(error.contains("connection refused"));
}

#[tokio::test]
async fn test_indexing_empty_page_is_400() {
    let state = state_with_loader(StaticLoader { result: Ok(vec![]) });

    let (status, body) = send(
        state,
        "POST",
        "/indexing",
        Some(json!({ "message": "https://example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("No content found"));
}

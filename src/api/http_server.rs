// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP surface
//!
//! Routes:
//! - `GET  /`           liveness text
//! - `GET  /health`     health probe
//! - `POST /chat`       synchronous Q&A (120 s wall-clock budget)
//! - `POST /indexing`   ingest one URL into the vector index
//! - `WS   /async_chat` streaming Q&A
//!
//! Both POST endpoints map failures to transport-level statuses with
//! structured JSON bodies: `/chat` → 504/500 `{detail}`, `/indexing` →
//! 400 `{error}`.

use axum::http::HeaderValue;
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::time::timeout;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};
use tracing::{error, info};

use super::websocket::async_chat_handler;
use super::{
    ApiError, ChatResponse, HealthResponse, IndexingResponse, MessageRequest, RootResponse,
};
use crate::config::ALLOWED_ORIGINS;
use crate::ingest::IngestPipeline;
use crate::rag::RagEngine;

/// Wall-clock budget for one `/chat` request.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RagEngine>,
    pub ingest: Arc<IngestPipeline>,
    pub chat_timeout: Duration,
}

impl AppState {
    pub fn new(engine: Arc<RagEngine>, ingest: Arc<IngestPipeline>) -> Self {
        Self {
            engine,
            ingest,
            chat_timeout: CHAT_TIMEOUT,
        }
    }

    /// Override the `/chat` budget (used by tests).
    pub fn with_chat_timeout(mut self, chat_timeout: Duration) -> Self {
        self.chat_timeout = chat_timeout;
        self
    }
}

/// Build the router with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = ALLOWED_ORIGINS
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/indexing", post(indexing_handler))
        .route("/async_chat", get(async_chat_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("RAG API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Json(RootResponse {
        message: "RAG API is running".to_string(),
    })
}

async fn health_handler() -> impl IntoResponse {
    axum::response::Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Synchronous Q&A.
///
/// The engine future runs as its own task so one slow generation cannot
/// stall other connections; on timeout the wait is abandoned but the task
/// keeps running (best-effort timeout, not cancellation).
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<axum::response::Json<ChatResponse>, ApiError> {
    request.validate()?;

    let engine = state.engine.clone();
    let question = request.message.clone();
    let task = tokio::spawn(async move { engine.answer_question(&question).await });

    match timeout(state.chat_timeout, task).await {
        Err(_) => {
            error!("Chat request exceeded {:?} budget", state.chat_timeout);
            Err(ApiError::Timeout)
        }
        Ok(Err(join_err)) => Err(ApiError::Internal(join_err.to_string())),
        Ok(Ok(Err(e))) => {
            error!("Chat request failed: {}", e);
            Err(ApiError::Internal(e.to_string()))
        }
        Ok(Ok(Ok(outcome))) => Ok(axum::response::Json(ChatResponse {
            question: request.message,
            answer: outcome.answer,
            documents: outcome.context,
        })),
    }
}

/// Ingest one URL. Failed outcomes become 400 with the human-readable
/// status line; the tagged outcome, not the string marker, decides.
pub async fn indexing_handler(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<axum::response::Json<IndexingResponse>, ApiError> {
    request.validate()?;

    let pipeline = state.ingest.clone();
    let url = request.message.clone();
    let outcome = tokio::spawn(async move { pipeline.ingest_url(&url).await })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if outcome.is_success() {
        Ok(axum::response::Json(IndexingResponse {
            response: outcome.message(),
        }))
    } else {
        Err(ApiError::InvalidRequest(outcome.message()))
    }
}

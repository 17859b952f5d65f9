// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Streaming Q&A over WebSocket
//!
//! One question in flight per connection. For each question the server
//! emits `start` → `answer` → `context` → `done` and then closes the
//! connection. Any processing failure closes the connection without
//! emitting further events (fail-fast, no retry).

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::http_server::AppState;
use crate::vector::{ChunkMetadata, Match};

/// Notice sent in the `start` event while the question is being processed.
pub const PROCESSING_NOTICE: &str = "Processing...";

/// Payload of the `done` event.
pub const DONE_NOTICE: &str = "Completed";

/// One event in the per-question sequence.
///
/// Serializes as `{"event_type": ..., "data": ...}`. The `context` event
/// carries match metadata only, not full matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event_type", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    Start(String),
    Answer(String),
    Context(Vec<ChunkMetadata>),
    Done(String),
}

impl StreamEvent {
    pub fn start() -> Self {
        StreamEvent::Start(PROCESSING_NOTICE.to_string())
    }

    pub fn done() -> Self {
        StreamEvent::Done(DONE_NOTICE.to_string())
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            StreamEvent::Start(_) => "start",
            StreamEvent::Answer(_) => "answer",
            StreamEvent::Context(_) => "context",
            StreamEvent::Done(_) => "done",
        }
    }
}

/// Strip matches down to the metadata sent in the `context` event.
pub fn context_metadata(matches: &[Match]) -> Vec<ChunkMetadata> {
    matches.iter().map(|m| m.metadata.clone()).collect()
}

pub async fn async_chat_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    while let Some(message) = socket.recv().await {
        match message {
            Ok(Message::Text(question)) => {
                if let Err(e) = stream_answer(&mut socket, &state, &question).await {
                    warn!("WebSocket turn aborted: {}", e);
                }
                // The sequence ends the connection either way: after `done`
                // on success, immediately on failure.
                let _ = socket.close().await;
                return;
            }
            Ok(Message::Ping(data)) => {
                if socket.send(Message::Pong(data)).await.is_err() {
                    return;
                }
            }
            Ok(Message::Close(_)) => return,
            Err(_) => return,
            _ => {}
        }
    }
}

/// Emit the full event sequence for one question.
async fn stream_answer(
    socket: &mut WebSocket,
    state: &AppState,
    question: &str,
) -> Result<(), String> {
    info!("Streaming answer for question over WebSocket");

    send_event(socket, &StreamEvent::start()).await?;

    let outcome = state
        .engine
        .answer_question(question)
        .await
        .map_err(|e| e.to_string())?;

    send_event(socket, &StreamEvent::Answer(outcome.answer)).await?;
    send_event(socket, &StreamEvent::Context(context_metadata(&outcome.context))).await?;
    send_event(socket, &StreamEvent::done()).await?;

    Ok(())
}

async fn send_event(socket: &mut WebSocket, event: &StreamEvent) -> Result<(), String> {
    let payload = serde_json::to_string(event).map_err(|e| e.to_string())?;
    socket
        .send(Message::Text(payload))
        .await
        .map_err(|e| e.to_string())
}

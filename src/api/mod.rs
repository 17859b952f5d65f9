// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod websocket;

pub use errors::{ApiError, TIMEOUT_DETAIL};
pub use handlers::{
    ChatResponse, HealthResponse, IndexingResponse, MessageRequest, RootResponse,
};
pub use http_server::{build_router, start_server, AppState, CHAT_TIMEOUT};
pub use websocket::{context_metadata, StreamEvent, DONE_NOTICE, PROCESSING_NOTICE};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

/// Detail text returned when the Q&A flow exceeds its wall-clock budget.
pub const TIMEOUT_DETAIL: &str = "Request timeout - please try a simpler question";

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Request was well-formed JSON but semantically unusable; body is
    /// `{"error": ...}`.
    InvalidRequest(String),
    /// Unexpected failure in the underlying flow; body is `{"detail": ...}`.
    Internal(String),
    /// The Q&A flow did not finish inside the 120 s budget.
    Timeout,
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) => 400,
            ApiError::Internal(_) => 500,
            ApiError::Timeout => 504,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Timeout => write!(f, "Request timed out"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = match self {
            ApiError::InvalidRequest(msg) => json!({ "error": msg }),
            ApiError::Internal(msg) => json!({ "detail": msg }),
            ApiError::Timeout => json!({ "detail": TIMEOUT_DETAIL }),
        };

        (status, axum::response::Json(body)).into_response()
    }
}

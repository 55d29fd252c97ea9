//! Error types for ada-mock
//!
//! Handler errors render as `{"detail": "..."}`, the body shape the mobile
//! client already parses.

use ada_common::api::types::ErrorResponse;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::warn;

use crate::session::SessionNotFound;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown session referenced by a chunk (404)
    #[error("Session not found")]
    SessionNotFound(#[from] SessionNotFound),

    /// Multipart body could not be read (400)
    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// Required form field absent (422)
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Multipart(err) => err.status(),
            ApiError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::SessionNotFound(SessionNotFound(id)) => {
                warn!(session_id = %id, "Chunk for unknown session");
            }
            other => warn!("Rejected request: {}", other),
        }

        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

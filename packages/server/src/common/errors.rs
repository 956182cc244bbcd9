//! Error taxonomy for the engagement core.
//!
//! Every failure a request can surface maps to one of these variants; the
//! axum layer converts them into structured JSON error payloads so no fault
//! escapes the boundary unclassified.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::common::auth::AuthError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// A required field is missing or malformed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Missing or invalid credential, or insufficient capability.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A reporter may not report their own content.
    #[error("Cannot report your own lesson")]
    SelfReport,

    /// A report for this (lesson, reported user) pair already exists.
    #[error("This lesson has already been reported for that user")]
    DuplicateReport,

    /// Storage or other infrastructure failure, reported generically.
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        ApiError::NotFound(entity.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Auth(AuthError::AuthenticationRequired)
            | ApiError::Auth(AuthError::InvalidToken) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(_) => StatusCode::FORBIDDEN,
            ApiError::SelfReport => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::DuplicateReport => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::NotFound(_) => "not_found",
            ApiError::Auth(_) => "auth",
            ApiError::SelfReport => "self_report",
            ApiError::DuplicateReport => "duplicate_report",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internal details stay in the logs, not in the payload.
        if let ApiError::Internal(ref source) = self {
            tracing::error!(error = %source, "request failed with internal error");
        }

        let status = self.status_code();
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

//! Errors a handler can return, and how each becomes an HTTP response.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::envelope::Envelope;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input: bad id, bad body, empty fields.
    #[error("{0}")]
    Validation(String),

    #[error("To-do with the given ID not found")]
    NotFound,

    /// Anything unexpected. The detail is logged, never sent to the client.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(error = %detail, "request failed");
        }
        (self.status_code(), Json(Envelope::error(self.to_string()))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(message) => ApiError::Validation(message),
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Io(_)
            | StoreError::Serde(_)
            | StoreError::Corrupt(_)
            | StoreError::IdsExhausted => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// The id segment could not even be decoded (e.g. invalid UTF-8).
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(format!("Invalid to-do ID: {}", rejection.body_text()))
    }
}

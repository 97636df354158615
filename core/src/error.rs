//! Error types for the todo API client.
//!
//! `NotFound` and `BadRequest` get their own variants because callers act on
//! them directly. Any other unexpected status lands in `HttpError`. The
//! message is taken from the server's error envelope when there is one, and
//! falls back to the raw body otherwise.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned 400: invalid id, missing fields or bad body.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

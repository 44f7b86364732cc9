//! Error types for podsync
//!
//! `SyncError` covers the fatal failure modes of a sync pass; per-guest
//! failures are recoverable and live in `GuestReconcileError`. `ApiError`
//! adapts both for the HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Fatal errors from a sync pass. Any of these aborts the whole pass;
/// files already committed stay committed (no cross-file rollback).
#[derive(Debug, Error)]
pub enum SyncError {
    /// File unreadable, or the filename does not yield an episode number
    #[error("failed to load show file {file}: {reason}")]
    Load { file: String, reason: String },

    /// Front matter malformed beyond recovery (e.g. missing `title`)
    #[error("failed to parse front matter in {file}: {reason}")]
    Parse { file: String, reason: String },

    /// Store rejected the show upsert (constraint violation, unparsable date)
    #[error("failed to persist show {number} from {file}: {reason}")]
    ShowPersist {
        number: i64,
        file: String,
        reason: String,
    },
}

/// Recoverable per-guest failure. Caught by the guest reconciler, logged
/// with show/guest context, and never propagated past the guest it came from.
#[derive(Debug, Error)]
pub enum GuestReconcileError {
    /// Guest name missing or normalizes to an empty slug
    #[error("guest name is missing or does not slugify")]
    EmptyNameSlug,

    /// Underlying store failure while upserting guest/join/social rows
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors from the AI note regeneration pipeline
#[derive(Debug, Error)]
pub enum NotesError {
    #[error("no show with number {0}")]
    ShowNotFound(i64),

    /// Notes cannot be generated without a transcript
    #[error("show {0} has no transcript")]
    TranscriptMissing(i64),

    #[error("note generation failed: {0}")]
    Generator(#[source] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Feature not wired up in this deployment (503)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Fatal sync failure, surfaced to callers as a generic import error
    #[error("Error Importing Shows")]
    Sync(#[from] SyncError),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            // The underlying cause is logged where it happened; callers get
            // the generic import failure message.
            ApiError::Sync(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IMPORT_ERROR",
                "Error Importing Shows".to_string(),
            ),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<NotesError> for ApiError {
    fn from(err: NotesError) -> Self {
        match err {
            NotesError::ShowNotFound(n) => ApiError::BadRequest(format!("no show {}", n)),
            NotesError::TranscriptMissing(n) => {
                ApiError::BadRequest(format!("no transcript for show {}", n))
            }
            NotesError::Generator(e) => ApiError::Internal(format!("note generation failed: {e}")),
            NotesError::Database(e) => ApiError::Internal(format!("database error: {e}")),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

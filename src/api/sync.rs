//! Sync trigger endpoints
//!
//! POST /sync/all and POST /sync/changed run a pass inline and answer when
//! it finishes. Callers (a cron hook, an operator) are expected to serialize
//! invocations; nothing here prevents overlapping passes.

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::error::ApiResult;
use crate::services::sync_orchestrator::{self, SyncSummary};
use crate::AppState;

/// Sync completion response
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub files: usize,
    pub reconciled: usize,
    pub skipped: usize,
    pub guest_failures: usize,
}

impl SyncResponse {
    fn new(message: &str, summary: SyncSummary) -> Self {
        Self {
            message: message.to_string(),
            files: summary.files,
            reconciled: summary.reconciled,
            skipped: summary.skipped,
            guest_failures: summary.guest_failures,
        }
    }
}

/// POST /sync/all
pub async fn sync_all(State(state): State<AppState>) -> ApiResult<Json<SyncResponse>> {
    let summary = sync_orchestrator::sync_all(&state.db, &state.shows_dir)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "pod sync error");
            err
        })?;
    Ok(Json(SyncResponse::new("Import All Shows", summary)))
}

/// POST /sync/changed
pub async fn sync_changed(State(state): State<AppState>) -> ApiResult<Json<SyncResponse>> {
    let summary = sync_orchestrator::sync_changed(&state.db, &state.shows_dir)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "pod sync error");
            err
        })?;
    Ok(Json(SyncResponse::new("Import Changed Shows", summary)))
}

/// Build sync routes
pub fn sync_routes() -> Router<AppState> {
    Router::new()
        .route("/sync/all", post(sync_all))
        .route("/sync/changed", post(sync_changed))
}

//! AI note regeneration endpoints
//!
//! Available only when a note generator is configured; without one these
//! routes answer 503 and the rest of the service is unaffected.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::services::ai_notes::{self, NoteGenerator};
use crate::AppState;

/// Note regeneration response
#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub message: String,
}

fn generator(state: &AppState) -> ApiResult<Arc<dyn NoteGenerator>> {
    state
        .note_generator
        .clone()
        .ok_or_else(|| ApiError::ServiceUnavailable("no note generator configured".to_string()))
}

/// POST /shows/{number}/ai-notes
pub async fn regenerate_for_show(
    State(state): State<AppState>,
    Path(number): Path<i64>,
) -> ApiResult<Json<NotesResponse>> {
    let generator = generator(&state)?;
    ai_notes::regenerate_for_show(&state.db, generator.as_ref(), number).await?;
    Ok(Json(NotesResponse {
        message: "AI Notes Created".to_string(),
    }))
}

/// POST /ai-notes/latest
///
/// Cron-style entry point: picks the newest show with a transcript and no
/// notes, regenerates, and reports how long it took.
pub async fn regenerate_latest(State(state): State<AppState>) -> ApiResult<Json<NotesResponse>> {
    let generator = generator(&state)?;

    let start = std::time::Instant::now();
    let handled = ai_notes::regenerate_latest(&state.db, generator.as_ref()).await?;

    let message = match handled {
        Some(number) => {
            let elapsed = start.elapsed();
            format!(
                "AI notes generated for show #{number}. Took {}m {:.1}s",
                elapsed.as_secs() / 60,
                (elapsed.as_millis() % 60_000) as f64 / 1000.0
            )
        }
        None => "No shows without AI Show notes found.".to_string(),
    };

    Ok(Json(NotesResponse { message }))
}

/// Build AI note routes
pub fn ai_note_routes() -> Router<AppState> {
    Router::new()
        .route("/shows/:number/ai-notes", post(regenerate_for_show))
        .route("/ai-notes/latest", post(regenerate_latest))
}

//! Show read endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::shows;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /shows/latest response
#[derive(Debug, Serialize)]
pub struct LatestShowResponse {
    pub number: i64,
    pub title: String,
    pub slug: String,
    pub date: String,
    pub url: Option<String>,
    pub show_type: String,
    pub notes_file: String,
    pub guests: Vec<String>,
}

/// GET /shows/latest
pub async fn latest_show(State(state): State<AppState>) -> ApiResult<Json<LatestShowResponse>> {
    let (show, guests) = shows::latest_show_with_guests(&state.db)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("no shows imported yet".to_string()))?;

    Ok(Json(LatestShowResponse {
        number: show.number,
        title: show.title,
        slug: show.slug,
        date: show.date,
        url: show.url,
        show_type: show.show_type.as_str().to_string(),
        notes_file: show.md_file,
        guests,
    }))
}

/// Build show routes
pub fn show_routes() -> Router<AppState> {
    Router::new().route("/shows/latest", get(latest_show))
}

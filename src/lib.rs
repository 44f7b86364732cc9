//! podsync - Podcast show-note sync service
//!
//! Ingests a folder of show-note markdown files, reconciles shows, guests,
//! show-guest joins, and social links into SQLite, and orchestrates AI
//! show-note generation from transcripts.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

use crate::services::ai_notes::NoteGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Folder of show-note markdown files
    pub shows_dir: PathBuf,
    /// Optional AI note generator; absent when no API key is configured
    pub note_generator: Option<Arc<dyn NoteGenerator>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        shows_dir: PathBuf,
        note_generator: Option<Arc<dyn NoteGenerator>>,
    ) -> Self {
        Self {
            db,
            shows_dir,
            note_generator,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::sync_routes())
        .merge(api::show_routes())
        .merge(api::ai_note_routes())
        .with_state(state)
}

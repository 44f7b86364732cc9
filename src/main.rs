//! podsync - Podcast show-note sync service

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use podsync::config::Config;
use podsync::services::ai_notes::NoteGenerator;
use podsync::services::openai_notes::OpenAiNoteGenerator;
use podsync::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting podsync");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!("Shows folder: {}", config.shows_dir.display());

    let db_path = config.database_path();
    info!("Database: {}", db_path.display());
    let db_pool = podsync::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    let note_generator: Option<Arc<dyn NoteGenerator>> = match &config.openai_api_key {
        Some(key) => {
            info!("AI note generator configured");
            Some(Arc::new(OpenAiNoteGenerator::new(key.clone())))
        }
        None => {
            info!("No OpenAI API key configured, AI note routes disabled");
            None
        }
    };

    let state = AppState::new(db_pool, config.shows_dir.clone(), note_generator);
    let app = podsync::build_router(state);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");
    info!("Health check: http://{addr}/health");

    axum::serve(listener, app).await?;

    Ok(())
}

//! Database access for podsync
//!
//! One SQLite database holds shows, guests, their join rows, social links,
//! transcripts, and AI-generated notes. Connection setup runs WAL with a
//! busy timeout so the concurrent guest fan-out serializes on the store's
//! locking instead of failing fast.

pub mod ai_notes;
pub mod guests;
pub mod shows;
pub mod transcripts;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Initialize the database connection pool, creating the file and schema
/// if they do not exist yet.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    tracing::debug!(path = %db_path.display(), "connecting to database");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the podsync tables if they don't exist.
///
/// Also used directly by tests against in-memory pools.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shows (
            guid TEXT PRIMARY KEY,
            number INTEGER UNIQUE NOT NULL,
            slug TEXT NOT NULL,
            title TEXT NOT NULL,
            date TEXT NOT NULL,
            url TEXT,
            show_notes TEXT NOT NULL,
            hash TEXT NOT NULL,
            md_file TEXT NOT NULL,
            show_type TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS guests (
            guid TEXT PRIMARY KEY,
            name_slug TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            twitter TEXT,
            url TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS show_guests (
            show_id TEXT NOT NULL REFERENCES shows(guid) ON DELETE CASCADE,
            guest_id TEXT NOT NULL REFERENCES guests(guid) ON DELETE CASCADE,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(show_id, guest_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS social_links (
            guid TEXT PRIMARY KEY,
            guest_id TEXT NOT NULL REFERENCES guests(guid) ON DELETE CASCADE,
            link TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(link, guest_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transcripts (
            guid TEXT PRIMARY KEY,
            show_id TEXT UNIQUE NOT NULL REFERENCES shows(guid) ON DELETE CASCADE,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transcript_utterances (
            guid TEXT PRIMARY KEY,
            transcript_id TEXT NOT NULL REFERENCES transcripts(guid) ON DELETE CASCADE,
            utterance_index INTEGER NOT NULL,
            speaker TEXT,
            transcript_value TEXT NOT NULL,
            start_ms INTEGER,
            end_ms INTEGER,
            UNIQUE(transcript_id, utterance_index)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ai_show_notes (
            guid TEXT PRIMARY KEY,
            show_id TEXT UNIQUE NOT NULL REFERENCES shows(guid) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ai_summaries (
            guid TEXT PRIMARY KEY,
            note_id TEXT UNIQUE NOT NULL REFERENCES ai_show_notes(guid) ON DELETE CASCADE,
            content TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ai_tweets (
            guid TEXT PRIMARY KEY,
            note_id TEXT NOT NULL REFERENCES ai_show_notes(guid) ON DELETE CASCADE,
            content TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ai_topics (
            guid TEXT PRIMARY KEY,
            note_id TEXT NOT NULL REFERENCES ai_show_notes(guid) ON DELETE CASCADE,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ai_note_links (
            guid TEXT PRIMARY KEY,
            note_id TEXT NOT NULL REFERENCES ai_show_notes(guid) ON DELETE CASCADE,
            name TEXT,
            url TEXT NOT NULL,
            timestamp TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("database tables initialized");

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    /// In-memory pool with the full schema. A single connection keeps every
    /// query on the same memory database.
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to create in-memory database");
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .unwrap();
        super::init_tables(&pool).await.expect("schema init failed");
        pool
    }
}

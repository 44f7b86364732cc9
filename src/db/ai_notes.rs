//! AI show-note persistence
//!
//! A show owns at most one AI note. Regeneration deletes the note and all of
//! its children wholesale, then writes the fresh generation result in a
//! single transaction. Notes are never partially updated.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::GeneratedNotes;

/// Delete a show's AI note and all child rows, if present.
pub async fn delete_notes_for_show(pool: &SqlitePool, show_id: Uuid) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query("SELECT guid FROM ai_show_notes WHERE show_id = ?")
        .bind(show_id.to_string())
        .fetch_optional(&mut *tx)
        .await?;

    if let Some(row) = existing {
        let note_id: String = row.get("guid");
        for table in ["ai_summaries", "ai_tweets", "ai_topics", "ai_note_links"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE note_id = ?"))
                .bind(&note_id)
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("DELETE FROM ai_show_notes WHERE guid = ?")
            .bind(&note_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Persist one generation result as the show's AI note.
///
/// Callers delete the previous note first; this insert assumes the slot is
/// free and the whole tree lands in one transaction.
pub async fn save_notes(
    pool: &SqlitePool,
    show_id: Uuid,
    notes: &GeneratedNotes,
) -> Result<Uuid, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let note_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO ai_show_notes (guid, show_id, title, description, created_at)
        VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(note_id.to_string())
    .bind(show_id.to_string())
    .bind(&notes.title)
    .bind(notes.description_or_short())
    .execute(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO ai_summaries (guid, note_id, content) VALUES (?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(note_id.to_string())
        .bind(&notes.summary)
        .execute(&mut *tx)
        .await?;

    for tweet in &notes.tweets {
        sqlx::query("INSERT INTO ai_tweets (guid, note_id, content) VALUES (?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(note_id.to_string())
            .bind(tweet)
            .execute(&mut *tx)
            .await?;
    }

    for topic in &notes.topics {
        sqlx::query("INSERT INTO ai_topics (guid, note_id, name) VALUES (?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(note_id.to_string())
            .bind(topic)
            .execute(&mut *tx)
            .await?;
    }

    for link in &notes.links {
        sqlx::query(
            "INSERT INTO ai_note_links (guid, note_id, name, url, timestamp) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(note_id.to_string())
        .bind(&link.name)
        .bind(&link.url)
        .bind(&link.timestamp)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(note_id)
}

//! Transcript read access
//!
//! Transcripts are produced by the transcription pipeline and are read-only
//! inputs to AI note generation here. A show has at most one transcript,
//! stored as ordered utterances.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// One transcript utterance, in order.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub speaker: Option<String>,
    pub transcript_value: String,
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
}

/// Load a show's transcript utterances in order; `None` when the show has no
/// transcript at all.
pub async fn transcript_for_show(
    pool: &SqlitePool,
    show_id: Uuid,
) -> Result<Option<Vec<Utterance>>, sqlx::Error> {
    let transcript = sqlx::query("SELECT guid FROM transcripts WHERE show_id = ?")
        .bind(show_id.to_string())
        .fetch_optional(pool)
        .await?;

    let Some(transcript) = transcript else {
        return Ok(None);
    };
    let transcript_id: String = transcript.get("guid");

    let rows = sqlx::query(
        r#"
        SELECT speaker, transcript_value, start_ms, end_ms
        FROM transcript_utterances
        WHERE transcript_id = ?
        ORDER BY utterance_index
        "#,
    )
    .bind(&transcript_id)
    .fetch_all(pool)
    .await?;

    let utterances = rows
        .iter()
        .map(|row| Utterance {
            speaker: row.get("speaker"),
            transcript_value: row.get("transcript_value"),
            start_ms: row.get("start_ms"),
            end_ms: row.get("end_ms"),
        })
        .collect();

    Ok(Some(utterances))
}

/// Store a transcript for a show, replacing any existing one.
///
/// The transcription pipeline owns this in production; tests use it to build
/// fixtures.
pub async fn replace_transcript(
    pool: &SqlitePool,
    show_id: Uuid,
    utterances: &[Utterance],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query("SELECT guid FROM transcripts WHERE show_id = ?")
        .bind(show_id.to_string())
        .fetch_optional(&mut *tx)
        .await?;
    if let Some(row) = existing {
        let guid: String = row.get("guid");
        sqlx::query("DELETE FROM transcript_utterances WHERE transcript_id = ?")
            .bind(&guid)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM transcripts WHERE guid = ?")
            .bind(&guid)
            .execute(&mut *tx)
            .await?;
    }

    let transcript_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO transcripts (guid, show_id, created_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
    )
    .bind(transcript_id.to_string())
    .bind(show_id.to_string())
    .execute(&mut *tx)
    .await?;

    for (index, utterance) in utterances.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO transcript_utterances
                (guid, transcript_id, utterance_index, speaker, transcript_value, start_ms, end_ms)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(transcript_id.to_string())
        .bind(index as i64)
        .bind(&utterance.speaker)
        .bind(&utterance.transcript_value)
        .bind(utterance.start_ms)
        .bind(utterance.end_ms)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Newest show (by episode number) that has a transcript but no AI notes yet.
pub async fn latest_show_needing_notes(
    pool: &SqlitePool,
) -> Result<Option<(Uuid, i64, String)>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT s.guid, s.number, s.title
        FROM shows s
        JOIN transcripts t ON t.show_id = s.guid
        LEFT JOIN ai_show_notes n ON n.show_id = s.guid
        WHERE n.guid IS NULL
        ORDER BY s.number DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let guid_str: String = row.get("guid");
            let guid = Uuid::parse_str(&guid_str)
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
            Ok(Some((guid, row.get("number"), row.get("title"))))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::shows::{upsert_show, Show};
    use crate::db::test_support::memory_pool;
    use crate::models::ShowType;

    async fn insert_show(pool: &SqlitePool, number: i64) -> Uuid {
        let show = Show {
            guid: Uuid::new_v4(),
            number,
            slug: format!("show-{number}"),
            title: format!("Show {number}"),
            date: "2023-04-03T00:00:00+00:00".to_string(),
            url: None,
            show_notes: String::new(),
            hash: "h".to_string(),
            md_file: format!("{number} - Show.md"),
            show_type: ShowType::Hasty,
        };
        upsert_show(pool, &show).await.unwrap().guid
    }

    fn utterance(text: &str) -> Utterance {
        Utterance {
            speaker: Some("Host".to_string()),
            transcript_value: text.to_string(),
            start_ms: Some(0),
            end_ms: Some(1000),
        }
    }

    #[tokio::test]
    async fn transcript_round_trip_preserves_order() {
        let pool = memory_pool().await;
        let show = insert_show(&pool, 1).await;

        replace_transcript(&pool, show, &[utterance("one"), utterance("two")])
            .await
            .unwrap();

        let loaded = transcript_for_show(&pool, show).await.unwrap().unwrap();
        let texts: Vec<_> = loaded.iter().map(|u| u.transcript_value.as_str()).collect();
        assert_eq!(texts, ["one", "two"]);
    }

    #[tokio::test]
    async fn no_transcript_is_none_not_empty() {
        let pool = memory_pool().await;
        let show = insert_show(&pool, 1).await;
        assert!(transcript_for_show(&pool, show).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn latest_show_needing_notes_skips_shows_without_transcripts() {
        let pool = memory_pool().await;
        let with_transcript = insert_show(&pool, 10).await;
        insert_show(&pool, 11).await; // newer, but transcript-less

        replace_transcript(&pool, with_transcript, &[utterance("hello")])
            .await
            .unwrap();

        let (guid, number, _title) =
            latest_show_needing_notes(&pool).await.unwrap().unwrap();
        assert_eq!(guid, with_transcript);
        assert_eq!(number, 10);
    }
}

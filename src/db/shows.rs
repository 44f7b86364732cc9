//! Show persistence
//!
//! Shows are keyed by their episode number (the natural key from the
//! filename); the `guid` is the internal identity used for joins.

use anyhow::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::ShowType;

/// A show row.
#[derive(Debug, Clone)]
pub struct Show {
    pub guid: Uuid,
    pub number: i64,
    pub slug: String,
    pub title: String,
    /// RFC 3339 UTC timestamp of the show date
    pub date: String,
    pub url: Option<String>,
    pub show_notes: String,
    pub hash: String,
    pub md_file: String,
    pub show_type: ShowType,
}

/// Persisted show identity handed to the guest reconciler.
#[derive(Debug, Clone, Copy)]
pub struct ShowRef {
    pub guid: Uuid,
    pub number: i64,
}

/// Upsert a show keyed by episode number.
///
/// On conflict every mutable field is refreshed; the row keeps its original
/// `guid`. Returns the persisted identity.
pub async fn upsert_show(pool: &SqlitePool, show: &Show) -> Result<ShowRef, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO shows (
            guid, number, slug, title, date, url, show_notes, hash, md_file,
            show_type, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(number) DO UPDATE SET
            slug = excluded.slug,
            title = excluded.title,
            date = excluded.date,
            url = excluded.url,
            show_notes = excluded.show_notes,
            hash = excluded.hash,
            md_file = excluded.md_file,
            show_type = excluded.show_type,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(show.guid.to_string())
    .bind(show.number)
    .bind(&show.slug)
    .bind(&show.title)
    .bind(&show.date)
    .bind(&show.url)
    .bind(&show.show_notes)
    .bind(&show.hash)
    .bind(&show.md_file)
    .bind(show.show_type.as_str())
    .execute(pool)
    .await?;

    // The stored guid is the original one when the row already existed
    let row = sqlx::query("SELECT guid FROM shows WHERE number = ?")
        .bind(show.number)
        .fetch_one(pool)
        .await?;
    let guid_str: String = row.get("guid");
    let guid = Uuid::parse_str(&guid_str)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(ShowRef {
        guid,
        number: show.number,
    })
}

/// Load a show by episode number.
pub async fn find_show_by_number(
    pool: &SqlitePool,
    number: i64,
) -> Result<Option<Show>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT guid, number, slug, title, date, url, show_notes, hash, md_file, show_type
        FROM shows
        WHERE number = ?
        "#,
    )
    .bind(number)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let guid_str: String = row.get("guid");
            let show_type: String = row.get("show_type");
            Ok(Some(Show {
                guid: Uuid::parse_str(&guid_str)
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
                number: row.get("number"),
                slug: row.get("slug"),
                title: row.get("title"),
                date: row.get("date"),
                url: row.get("url"),
                show_notes: row.get("show_notes"),
                hash: row.get("hash"),
                md_file: row.get("md_file"),
                show_type: ShowType::from_str_lossy(&show_type),
            }))
        }
        None => Ok(None),
    }
}

/// Stored content fingerprint for an episode number, if the show exists.
pub async fn find_stored_hash(
    pool: &SqlitePool,
    number: i64,
) -> Result<Option<String>, sqlx::Error> {
    let row = sqlx::query("SELECT hash FROM shows WHERE number = ?")
        .bind(number)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get("hash")))
}

/// Latest show by episode number, with its guest names.
pub async fn latest_show_with_guests(
    pool: &SqlitePool,
) -> Result<Option<(Show, Vec<String>)>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT guid, number, slug, title, date, url, show_notes, hash, md_file, show_type
        FROM shows
        ORDER BY number DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let guid_str: String = row.get("guid");
    let show_type: String = row.get("show_type");
    let show = Show {
        guid: Uuid::parse_str(&guid_str).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        number: row.get("number"),
        slug: row.get("slug"),
        title: row.get("title"),
        date: row.get("date"),
        url: row.get("url"),
        show_notes: row.get("show_notes"),
        hash: row.get("hash"),
        md_file: row.get("md_file"),
        show_type: ShowType::from_str_lossy(&show_type),
    };

    let guest_rows = sqlx::query(
        r#"
        SELECT g.name
        FROM guests g
        JOIN show_guests sg ON sg.guest_id = g.guid
        WHERE sg.show_id = ?
        ORDER BY g.name
        "#,
    )
    .bind(show.guid.to_string())
    .fetch_all(pool)
    .await?;

    let guests = guest_rows.iter().map(|r| r.get("name")).collect();
    Ok(Some((show, guests)))
}

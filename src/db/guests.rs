//! Guest, show-guest join, and social link persistence
//!
//! Guests are keyed by `name_slug`; two raw names that normalize to the same
//! slug are the same guest. The guest upsert and the join upsert each run in
//! their own transaction so a reader never observes a guest without its join
//! mid-flight, and a lost insert race degrades into the update path.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Mutable guest attributes carried by a single upsert.
#[derive(Debug, Clone)]
pub struct GuestUpsert {
    pub name_slug: String,
    pub name: String,
    pub twitter: Option<String>,
    pub url: Option<String>,
}

/// A guest row.
#[derive(Debug, Clone)]
pub struct Guest {
    pub guid: Uuid,
    pub name_slug: String,
    pub name: String,
    pub twitter: Option<String>,
    pub url: Option<String>,
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.kind() == sqlx::error::ErrorKind::UniqueViolation)
        .unwrap_or(false)
}

/// Upsert a guest by `name_slug` inside its own transaction.
///
/// Find-then-update keeps `name_slug` immutable once assigned; everything
/// else is refreshed. Two reconciliations racing on the same slug can both
/// miss the find and collide on insert, so a unique violation retries once
/// through the update path.
pub async fn upsert_guest_by_slug(
    pool: &SqlitePool,
    guest: &GuestUpsert,
) -> Result<Uuid, sqlx::Error> {
    match try_upsert_guest(pool, guest).await {
        Ok(guid) => Ok(guid),
        Err(err) if is_unique_violation(&err) => {
            tracing::debug!(
                name_slug = %guest.name_slug,
                "guest insert lost a slug race, retrying as update"
            );
            try_upsert_guest(pool, guest).await
        }
        Err(err) => Err(err),
    }
}

async fn try_upsert_guest(pool: &SqlitePool, guest: &GuestUpsert) -> Result<Uuid, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query("SELECT guid FROM guests WHERE name_slug = ?")
        .bind(&guest.name_slug)
        .fetch_optional(&mut *tx)
        .await?;

    let guid = match existing {
        Some(row) => {
            let guid_str: String = row.get("guid");
            sqlx::query(
                r#"
                UPDATE guests
                SET name = ?, twitter = ?, url = ?, updated_at = CURRENT_TIMESTAMP
                WHERE name_slug = ?
                "#,
            )
            .bind(&guest.name)
            .bind(&guest.twitter)
            .bind(&guest.url)
            .bind(&guest.name_slug)
            .execute(&mut *tx)
            .await?;
            Uuid::parse_str(&guid_str).map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        }
        None => {
            let guid = Uuid::new_v4();
            sqlx::query(
                r#"
                INSERT INTO guests (guid, name_slug, name, twitter, url, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
                "#,
            )
            .bind(guid.to_string())
            .bind(&guest.name_slug)
            .bind(&guest.name)
            .bind(&guest.twitter)
            .bind(&guest.url)
            .execute(&mut *tx)
            .await?;
            guid
        }
    };

    tx.commit().await?;
    Ok(guid)
}

/// Create the (show, guest) join row if it is absent; existing pairs are left
/// untouched. Runs in its own transaction, separate from the guest upsert.
pub async fn link_show_guest(
    pool: &SqlitePool,
    show_id: Uuid,
    guest_id: Uuid,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query("SELECT 1 FROM show_guests WHERE show_id = ? AND guest_id = ?")
        .bind(show_id.to_string())
        .bind(guest_id.to_string())
        .fetch_optional(&mut *tx)
        .await?;

    if existing.is_none() {
        let insert = sqlx::query(
            "INSERT INTO show_guests (show_id, guest_id, created_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
        )
        .bind(show_id.to_string())
        .bind(guest_id.to_string())
        .execute(&mut *tx)
        .await;

        match insert {
            Ok(_) => {}
            // A concurrent linker got there first; the pair exists, which is
            // all this upsert asserts
            Err(err) if is_unique_violation(&err) => {
                tx.rollback().await?;
                return Ok(());
            }
            Err(err) => return Err(err),
        }
    }

    tx.commit().await?;
    Ok(())
}

/// Upsert a social link by its (`link`, `guest_id`) pair.
pub async fn upsert_social_link(
    pool: &SqlitePool,
    guest_id: Uuid,
    link: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO social_links (guid, guest_id, link, created_at, updated_at)
        VALUES (?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(link, guest_id) DO UPDATE SET
            link = excluded.link,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(guest_id.to_string())
    .bind(link)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a guest by slug.
pub async fn find_guest_by_slug(
    pool: &SqlitePool,
    name_slug: &str,
) -> Result<Option<Guest>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT guid, name_slug, name, twitter, url FROM guests WHERE name_slug = ?",
    )
    .bind(name_slug)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let guid_str: String = row.get("guid");
            Ok(Some(Guest {
                guid: Uuid::parse_str(&guid_str)
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
                name_slug: row.get("name_slug"),
                name: row.get("name"),
                twitter: row.get("twitter"),
                url: row.get("url"),
            }))
        }
        None => Ok(None),
    }
}

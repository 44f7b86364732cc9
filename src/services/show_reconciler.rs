//! Show reconciliation
//!
//! Turns a parsed show-note document into an upserted show row. Show
//! identity (episode number) is a prerequisite for everything downstream,
//! so any failure here is fatal to the sync pass rather than per-file
//! recoverable.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::shows::{self, Show, ShowRef};
use crate::error::SyncError;
use crate::models::ShowType;
use crate::services::front_matter::Document;
use crate::services::show_scanner::ShowFile;
use crate::utils::slug::slugify;

/// Upsert the show described by `doc`, keyed by the file's episode number.
///
/// Derives the slug from the title and the show type from the show date's
/// day of week. An absent or unparsable date is a persist error: the store
/// requires a real date and the parser deliberately leaves validation to
/// this step.
pub async fn reconcile_show(
    pool: &SqlitePool,
    doc: &Document,
    file: &ShowFile,
) -> Result<ShowRef, SyncError> {
    let raw_date = doc.matter.date.as_deref().ok_or_else(|| SyncError::ShowPersist {
        number: file.number,
        file: file.md_file.clone(),
        reason: "front matter has no `date`".to_string(),
    })?;

    let date = parse_show_date(raw_date).ok_or_else(|| SyncError::ShowPersist {
        number: file.number,
        file: file.md_file.clone(),
        reason: format!("unparsable show date: {raw_date:?}"),
    })?;

    let show_type = ShowType::from_weekday(chrono::Datelike::weekday(&date));

    let show = Show {
        guid: Uuid::new_v4(),
        number: file.number,
        slug: slugify(&doc.matter.title),
        title: doc.matter.title.clone(),
        date: date.to_rfc3339(),
        url: doc.matter.url.clone(),
        show_notes: doc.body.clone(),
        hash: file.hash.clone(),
        md_file: file.md_file.clone(),
        show_type,
    };

    let show_ref = shows::upsert_show(pool, &show)
        .await
        .map_err(|e| SyncError::ShowPersist {
            number: file.number,
            file: file.md_file.clone(),
            reason: e.to_string(),
        })?;

    tracing::debug!(
        number = show_ref.number,
        slug = %show.slug,
        show_type = show.show_type.as_str(),
        "show upserted"
    );

    Ok(show_ref)
}

/// Parse the raw front-matter date: epoch milliseconds, RFC 3339, or a plain
/// calendar date (taken as midnight UTC).
fn parse_show_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(millis) = raw.parse::<i64>() {
        return Utc.timestamp_millis_opt(millis).single();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&midnight));
        }
    }
    None
}

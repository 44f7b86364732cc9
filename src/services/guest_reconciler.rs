//! Guest reconciliation
//!
//! For each guest attached to a show: slugify the name, upsert the guest by
//! slug, assert the show-guest join, and upsert each social link. Guests are
//! dispatched concurrently and every task's failure is captured into its own
//! outcome; one broken guest never takes down its siblings or the pass.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::guests::{self, GuestUpsert};
use crate::db::shows::ShowRef;
use crate::error::GuestReconcileError;
use crate::services::front_matter::GuestMatter;
use crate::utils::slug::slugify;

/// Aggregate result of one show's guest fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuestReport {
    pub linked: usize,
    pub failed: usize,
}

/// Reconcile all guests of a show concurrently.
///
/// Failures are logged with show and guest context and counted, never
/// propagated; the caller only sees the report.
pub async fn reconcile_guests(
    pool: &SqlitePool,
    show: ShowRef,
    guests: &[GuestMatter],
) -> GuestReport {
    let tasks = guests.iter().map(|guest| reconcile_guest(pool, show, guest));
    let results = futures::future::join_all(tasks).await;

    let mut report = GuestReport::default();
    for (guest, result) in guests.iter().zip(results) {
        match result {
            Ok(_) => report.linked += 1,
            Err(err) => {
                report.failed += 1;
                tracing::error!(
                    show = show.number,
                    guest = ?guest,
                    error = %err,
                    "error importing guest, skipping"
                );
            }
        }
    }
    report
}

/// Reconcile a single guest: guest upsert, join upsert, social links.
///
/// The guest upsert and the join upsert each run in their own transaction
/// (see `db::guests`); this function only sequences them.
async fn reconcile_guest(
    pool: &SqlitePool,
    show: ShowRef,
    guest: &GuestMatter,
) -> Result<Uuid, GuestReconcileError> {
    let name_slug = slugify(&guest.name);
    if name_slug.is_empty() {
        return Err(GuestReconcileError::EmptyNameSlug);
    }

    let guest_id = guests::upsert_guest_by_slug(
        pool,
        &GuestUpsert {
            name_slug,
            name: guest.name.clone(),
            twitter: guest.twitter.clone(),
            url: guest.url.clone(),
        },
    )
    .await?;

    guests::link_show_guest(pool, show.guid, guest_id).await?;

    for link in &guest.social {
        guests::upsert_social_link(pool, guest_id, link).await?;
    }

    Ok(guest_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::shows::{upsert_show, Show};
    use crate::db::test_support::memory_pool;
    use crate::models::ShowType;
    use sqlx::Row;

    fn matter(name: &str, social: &[&str]) -> GuestMatter {
        GuestMatter {
            name: name.to_string(),
            twitter: None,
            url: None,
            social: social.iter().map(|s| s.to_string()).collect(),
        }
    }

    async fn insert_show(pool: &SqlitePool, number: i64) -> ShowRef {
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
        upsert_show(pool, &show).await.unwrap()
    }

    async fn count(pool: &SqlitePool, sql: &str) -> i64 {
        sqlx::query(sql)
            .fetch_one(pool)
            .await
            .map(|r| r.get::<i64, _>(0))
            .unwrap()
    }

    #[tokio::test]
    async fn links_all_guests_and_social_links() {
        let pool = memory_pool().await;
        let show = insert_show(&pool, 1).await;

        let report = reconcile_guests(
            &pool,
            show,
            &[
                matter("Jon Doe", &["https://a.example", "https://b.example"]),
                matter("Jane Roe", &[]),
            ],
        )
        .await;

        assert_eq!(report, GuestReport { linked: 2, failed: 0 });
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM guests").await, 2);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM show_guests").await, 2);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM social_links").await, 2);
    }

    #[tokio::test]
    async fn one_failing_guest_does_not_abort_siblings() {
        let pool = memory_pool().await;
        let show = insert_show(&pool, 1).await;

        // The middle entry has no usable name and must fail alone
        let report = reconcile_guests(
            &pool,
            show,
            &[
                matter("First Guest", &[]),
                matter("", &[]),
                matter("Third Guest", &[]),
            ],
        )
        .await;

        assert_eq!(report, GuestReport { linked: 2, failed: 1 });

        let names: Vec<String> = sqlx::query("SELECT name FROM guests ORDER BY name")
            .fetch_all(&pool)
            .await
            .unwrap()
            .iter()
            .map(|r| r.get("name"))
            .collect();
        assert_eq!(names, ["First Guest", "Third Guest"]);
    }

    #[tokio::test]
    async fn colliding_name_variants_merge_into_one_guest() {
        let pool = memory_pool().await;
        let show_a = insert_show(&pool, 1).await;
        let show_b = insert_show(&pool, 2).await;

        reconcile_guests(&pool, show_a, &[matter("Jon Doe", &[])]).await;
        reconcile_guests(&pool, show_b, &[matter("Jon  Doe", &[])]).await;

        // One guest row, linked to both shows
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM guests").await, 1);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM show_guests").await, 2);
    }

    #[tokio::test]
    async fn same_guest_twice_in_one_list_races_safely() {
        let pool = memory_pool().await;
        let show = insert_show(&pool, 1).await;

        let report = reconcile_guests(
            &pool,
            show,
            &[matter("Jon Doe", &[]), matter("jon doe", &[])],
        )
        .await;

        assert_eq!(report.failed, 0);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM guests").await, 1);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM show_guests").await, 1);
    }

    #[tokio::test]
    async fn rerun_does_not_duplicate_joins_or_socials() {
        let pool = memory_pool().await;
        let show = insert_show(&pool, 1).await;
        let guests = [matter("Jon Doe", &["https://a.example"])];

        reconcile_guests(&pool, show, &guests).await;
        reconcile_guests(&pool, show, &guests).await;

        assert_eq!(count(&pool, "SELECT COUNT(*) FROM guests").await, 1);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM show_guests").await, 1);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM social_links").await, 1);
    }
}

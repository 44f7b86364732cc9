//! End-to-end sync tests over a real shows folder and an in-memory store

mod helpers;

use helpers::{count, memory_pool, show_md, write_show_file};
use podsync::db::shows::find_show_by_number;
use podsync::error::SyncError;
use podsync::services::sync_orchestrator::{sync_all, sync_changed};
use podsync::utils::slug::slugify;
use sqlx::Row;

#[tokio::test]
async fn full_sync_imports_folder_and_is_idempotent() {
    let pool = memory_pool().await;
    let dir = tempfile::tempdir().unwrap();

    write_show_file(
        dir.path(),
        "700 - Potluck.md",
        &show_md(
            "Potluck - AMA",
            "2023-04-03",
            "guest:\n  - name: Jon Doe\n    social:\n      - https://a.example\n  - name: Jane Roe\n",
            "## Notes\n",
        ),
    );
    write_show_file(
        dir.path(),
        "701 - Supper Club.md",
        &show_md("Supper Club - Rust", "2023-04-07", "", "body\n"),
    );

    let summary = sync_all(&pool, dir.path()).await.unwrap();
    assert_eq!(summary.files, 2);
    assert_eq!(summary.reconciled, 2);
    assert_eq!(summary.guest_failures, 0);

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM shows").await, 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM guests").await, 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM show_guests").await, 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM social_links").await, 1);

    let show = find_show_by_number(&pool, 700).await.unwrap().unwrap();
    let first_guid = show.guid;
    assert_eq!(show.show_type.as_str(), "HASTY"); // 2023-04-03 is a Monday
    assert_eq!(show.md_file, "700 - Potluck.md");

    let supper = find_show_by_number(&pool, 701).await.unwrap().unwrap();
    assert_eq!(supper.show_type.as_str(), "SUPPER"); // 2023-04-07 is a Friday

    // Second byte-identical pass: same rows, no duplicates, stable identity
    let summary = sync_all(&pool, dir.path()).await.unwrap();
    assert_eq!(summary.reconciled, 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM shows").await, 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM guests").await, 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM show_guests").await, 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM social_links").await, 1);

    let show = find_show_by_number(&pool, 700).await.unwrap().unwrap();
    assert_eq!(show.guid, first_guid);
}

#[tokio::test]
async fn show_slug_is_idempotent_under_slugify() {
    let pool = memory_pool().await;
    let dir = tempfile::tempdir().unwrap();
    write_show_file(
        dir.path(),
        "1 - Emojis.md",
        &show_md("Wes & Scott's Spéciäl — Show!", "2023-04-04", "", ""),
    );

    sync_all(&pool, dir.path()).await.unwrap();

    let show = find_show_by_number(&pool, 1).await.unwrap().unwrap();
    assert_eq!(slugify(&show.slug), show.slug);
}

#[tokio::test]
async fn changed_only_skips_unchanged_files_entirely() {
    let pool = memory_pool().await;
    let dir = tempfile::tempdir().unwrap();
    write_show_file(
        dir.path(),
        "700 - Potluck.md",
        &show_md("Potluck", "2023-04-03", "guest:\n  name: Jon Doe\n", ""),
    );

    sync_all(&pool, dir.path()).await.unwrap();
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM show_guests").await, 1);

    // Knock out the join row; a skipped file must not re-assert it
    sqlx::query("DELETE FROM show_guests")
        .execute(&pool)
        .await
        .unwrap();

    let summary = sync_changed(&pool, dir.path()).await.unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.reconciled, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM show_guests").await, 0);

    // Full sync re-asserts guest links even for unchanged content
    let summary = sync_all(&pool, dir.path()).await.unwrap();
    assert_eq!(summary.reconciled, 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM show_guests").await, 1);
}

#[tokio::test]
async fn single_byte_change_triggers_full_reconciliation() {
    let pool = memory_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let original = show_md("Potluck", "2023-04-03", "", "original body\n");
    write_show_file(dir.path(), "700 - Potluck.md", &original);

    sync_all(&pool, dir.path()).await.unwrap();
    let before = find_show_by_number(&pool, 700).await.unwrap().unwrap();

    // Unchanged re-run is a pure skip
    let summary = sync_changed(&pool, dir.path()).await.unwrap();
    assert_eq!(summary.skipped, 1);

    // One changed byte in the body flips the fingerprint
    let modified = original.replace("original body", "original bodY");
    write_show_file(dir.path(), "700 - Potluck.md", &modified);

    let summary = sync_changed(&pool, dir.path()).await.unwrap();
    assert_eq!(summary.reconciled, 1);
    assert_eq!(summary.skipped, 0);

    let after = find_show_by_number(&pool, 700).await.unwrap().unwrap();
    assert_ne!(before.hash, after.hash);
    assert_eq!(after.show_notes, "original bodY\n");
}

#[tokio::test]
async fn changed_only_imports_brand_new_files() {
    let pool = memory_pool().await;
    let dir = tempfile::tempdir().unwrap();
    write_show_file(
        dir.path(),
        "42 - Fresh.md",
        &show_md("Fresh", "2023-04-05", "", ""),
    );

    let summary = sync_changed(&pool, dir.path()).await.unwrap();
    assert_eq!(summary.reconciled, 1);
    assert!(find_show_by_number(&pool, 42).await.unwrap().is_some());
}

#[tokio::test]
async fn unparsable_filename_aborts_the_whole_pass() {
    let pool = memory_pool().await;
    let dir = tempfile::tempdir().unwrap();
    write_show_file(
        dir.path(),
        "1 - Fine.md",
        &show_md("Fine", "2023-04-03", "", ""),
    );
    write_show_file(
        dir.path(),
        "No Number Here.md",
        &show_md("Broken", "2023-04-03", "", ""),
    );

    let err = sync_all(&pool, dir.path()).await.unwrap_err();
    assert!(matches!(err, SyncError::Load { .. }), "{err}");

    let err = sync_changed(&pool, dir.path()).await.unwrap_err();
    assert!(matches!(err, SyncError::Load { .. }), "{err}");
}

#[tokio::test]
async fn missing_title_aborts_the_pass() {
    let pool = memory_pool().await;
    let dir = tempfile::tempdir().unwrap();
    write_show_file(dir.path(), "1 - Untitled.md", "---\ndate: 2023-04-03\n---\n");

    let err = sync_all(&pool, dir.path()).await.unwrap_err();
    assert!(matches!(err, SyncError::Parse { .. }), "{err}");
}

#[tokio::test]
async fn unparsable_date_aborts_the_pass_at_persist_time() {
    let pool = memory_pool().await;
    let dir = tempfile::tempdir().unwrap();
    write_show_file(
        dir.path(),
        "1 - Whenever.md",
        &show_md("Whenever", "sometime soon", "", ""),
    );

    let err = sync_all(&pool, dir.path()).await.unwrap_err();
    assert!(matches!(err, SyncError::ShowPersist { number: 1, .. }), "{err}");
}

#[tokio::test]
async fn guest_failures_are_isolated_per_guest() {
    let pool = memory_pool().await;
    let dir = tempfile::tempdir().unwrap();
    write_show_file(
        dir.path(),
        "700 - Guests.md",
        &show_md(
            "Guests",
            "2023-04-03",
            "guest:\n  - name: First Guest\n  - twitter: nameless\n  - name: Third Guest\n",
            "",
        ),
    );

    let summary = sync_all(&pool, dir.path()).await.unwrap();
    assert_eq!(summary.reconciled, 1);
    assert_eq!(summary.guest_failures, 1);

    let names: Vec<String> = sqlx::query("SELECT name FROM guests ORDER BY name")
        .fetch_all(&pool)
        .await
        .unwrap()
        .iter()
        .map(|r| r.get("name"))
        .collect();
    assert_eq!(names, ["First Guest", "Third Guest"]);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM show_guests").await, 2);
}

#[tokio::test]
async fn colliding_guest_names_across_shows_share_one_guest_row() {
    let pool = memory_pool().await;
    let dir = tempfile::tempdir().unwrap();
    write_show_file(
        dir.path(),
        "1 - A.md",
        &show_md("A", "2023-04-03", "guest:\n  name: Jon Doe\n", ""),
    );
    write_show_file(
        dir.path(),
        "2 - B.md",
        &show_md("B", "2023-04-05", "guest:\n  name: \"Jon  Doe\"\n", ""),
    );

    sync_all(&pool, dir.path()).await.unwrap();

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM guests").await, 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM show_guests").await, 2);
}

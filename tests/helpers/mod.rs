//! Shared test fixtures

#![allow(dead_code)]

use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// In-memory pool with the podsync schema. A single connection keeps every
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
    podsync::db::init_tables(&pool)
        .await
        .expect("schema init failed");
    pool
}

/// Write a show-note markdown file into the folder.
pub fn write_show_file(dir: &Path, filename: &str, content: &str) {
    std::fs::write(dir.join(filename), content).expect("failed to write show file");
}

/// Minimal show-note document with optional extra front-matter lines.
pub fn show_md(title: &str, date: &str, extra_matter: &str, body: &str) -> String {
    let mut doc = format!("---\ntitle: {title}\ndate: {date}\n");
    if !extra_matter.is_empty() {
        doc.push_str(extra_matter);
        if !extra_matter.ends_with('\n') {
            doc.push('\n');
        }
    }
    doc.push_str("---\n");
    doc.push_str(body);
    doc
}

pub async fn count(pool: &SqlitePool, sql: &str) -> i64 {
    use sqlx::Row;
    sqlx::query(sql)
        .fetch_one(pool)
        .await
        .map(|r| r.get::<i64, _>(0))
        .unwrap()
}

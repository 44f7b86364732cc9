//! Sync orchestration
//!
//! Drives a full-folder pass (`sync_all`) or a changed-only pass
//! (`sync_changed`) over the shows folder. Both share one per-file pipeline:
//! load, fingerprint, parse front matter, upsert the show, reconcile guests.
//! Loader, parser, and show failures abort the whole pass; guest failures
//! are isolated per guest inside the pipeline. Files already committed when
//! a pass aborts stay committed.

use std::path::Path;

use sqlx::SqlitePool;

use crate::db::shows;
use crate::error::SyncError;
use crate::services::fingerprint::{self, ChangeClass};
use crate::services::front_matter;
use crate::services::guest_reconciler;
use crate::services::show_reconciler;
use crate::services::show_scanner::{self, ShowFile};

/// Counters for one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Markdown files seen in the folder
    pub files: usize,
    /// Files that went through full reconciliation
    pub reconciled: usize,
    /// Files skipped because their fingerprint was unchanged
    pub skipped: usize,
    /// Guests that failed reconciliation and were skipped
    pub guest_failures: usize,
}

/// Reconcile every markdown file in the folder, unconditionally.
///
/// Re-running on unchanged content re-asserts all show, guest, and social
/// rows; that re-assertion is intentional, `sync_changed` is the optimized
/// path.
pub async fn sync_all(pool: &SqlitePool, shows_dir: &Path) -> Result<SyncSummary, SyncError> {
    let md_files = show_scanner::list_markdown_files(shows_dir)?;
    let mut summary = SyncSummary {
        files: md_files.len(),
        ..SyncSummary::default()
    };

    for md_file in &md_files {
        let show_file = show_scanner::load_show_file(shows_dir, md_file).await?;
        let report = reconcile_file(pool, &show_file).await?;
        summary.reconciled += 1;
        summary.guest_failures += report.failed;
    }

    tracing::info!(
        files = summary.files,
        reconciled = summary.reconciled,
        guest_failures = summary.guest_failures,
        "pod sync complete"
    );
    Ok(summary)
}

/// Reconcile only files whose content fingerprint differs from the stored
/// show, skipping unchanged files entirely.
pub async fn sync_changed(pool: &SqlitePool, shows_dir: &Path) -> Result<SyncSummary, SyncError> {
    let md_files = show_scanner::list_markdown_files(shows_dir)?;
    let mut summary = SyncSummary {
        files: md_files.len(),
        ..SyncSummary::default()
    };

    for md_file in &md_files {
        let show_file = show_scanner::load_show_file(shows_dir, md_file).await?;

        let stored = shows::find_stored_hash(pool, show_file.number)
            .await
            .map_err(|e| SyncError::ShowPersist {
                number: show_file.number,
                file: md_file.clone(),
                reason: e.to_string(),
            })?;

        match fingerprint::classify(stored.as_deref(), &show_file.hash) {
            ChangeClass::Unchanged => {
                tracing::debug!(number = show_file.number, "unchanged, skipping");
                summary.skipped += 1;
            }
            ChangeClass::New | ChangeClass::Modified => {
                let report = reconcile_file(pool, &show_file).await?;
                summary.reconciled += 1;
                summary.guest_failures += report.failed;
            }
        }
    }

    tracing::info!(
        files = summary.files,
        reconciled = summary.reconciled,
        skipped = summary.skipped,
        guest_failures = summary.guest_failures,
        "pod sync complete"
    );
    Ok(summary)
}

/// Shared per-file pipeline: parse, upsert show, fan out guests.
async fn reconcile_file(
    pool: &SqlitePool,
    show_file: &ShowFile,
) -> Result<guest_reconciler::GuestReport, SyncError> {
    let doc = front_matter::parse_document(&show_file.content, &show_file.md_file)?;
    let show_ref = show_reconciler::reconcile_show(pool, &doc, show_file).await?;
    let report = guest_reconciler::reconcile_guests(pool, show_ref, &doc.matter.guests).await;

    tracing::info!(number = show_ref.number, "episode imported");
    Ok(report)
}

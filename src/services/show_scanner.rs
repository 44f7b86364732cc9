//! Show folder scanning and file loading
//!
//! The shows folder is a flat directory of `<number> - <slug>.md` files. The
//! leading integer before the first ` - ` is the episode number and primary
//! natural key, so a filename that does not yield one is a hard load error,
//! never a silent default.

use std::path::Path;

use crate::error::SyncError;
use crate::services::fingerprint;

/// Filename delimiter between episode number and title slug
const NUMBER_DELIMITER: &str = " - ";

/// A loaded show file: source name, episode number, raw content, fingerprint.
#[derive(Debug, Clone)]
pub struct ShowFile {
    pub md_file: String,
    pub number: i64,
    pub content: String,
    pub hash: String,
}

/// List markdown filenames in the shows folder.
///
/// Immediate directory contents only; subdirectories are not descended into.
/// Order is whatever the directory listing yields, callers must not rely on
/// it.
pub fn list_markdown_files(dir: &Path) -> Result<Vec<String>, SyncError> {
    let entries = std::fs::read_dir(dir).map_err(|e| SyncError::Load {
        file: dir.display().to_string(),
        reason: format!("cannot read shows folder: {e}"),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::Load {
            file: dir.display().to_string(),
            reason: format!("cannot read directory entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
            continue;
        }
        files.push(entry.file_name().to_string_lossy().to_string());
    }
    Ok(files)
}

/// Parse the episode number from a `<number> - <slug>.md` filename.
pub fn episode_number(md_file: &str) -> Result<i64, SyncError> {
    let token = md_file
        .split(NUMBER_DELIMITER)
        .next()
        .unwrap_or(md_file)
        .trim();

    token.parse::<i64>().map_err(|_| SyncError::Load {
        file: md_file.to_string(),
        reason: format!("filename does not start with an episode number: {token:?}"),
    })
}

/// Read a show file and derive its episode number and content fingerprint.
pub async fn load_show_file(dir: &Path, md_file: &str) -> Result<ShowFile, SyncError> {
    let number = episode_number(md_file)?;

    let path = dir.join(md_file);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| SyncError::Load {
            file: md_file.to_string(),
            reason: format!("cannot read file: {e}"),
        })?;

    let hash = fingerprint::content_hash(content.as_bytes());

    Ok(ShowFile {
        md_file: md_file.to_string(),
        number,
        content,
        hash,
    })
}

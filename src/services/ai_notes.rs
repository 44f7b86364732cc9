//! AI show-note regeneration pipeline
//!
//! The model call itself lives behind [`NoteGenerator`]; this module owns
//! the surrounding lifecycle: pick the show, load its transcript, delete any
//! existing notes wholesale, generate, persist the result. A show never
//! keeps a partially updated note.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::{ai_notes, shows, transcripts};
use crate::error::NotesError;
use crate::models::GeneratedNotes;

/// Generation input: the show plus its transcript utterances.
#[derive(Debug, Clone)]
pub struct NotesInput {
    pub show_number: i64,
    pub title: String,
    pub utterances: Vec<transcripts::Utterance>,
}

/// Collaborator that turns a transcript into show notes.
#[async_trait]
pub trait NoteGenerator: Send + Sync {
    async fn generate(&self, input: &NotesInput) -> anyhow::Result<GeneratedNotes>;
}

/// Regenerate AI notes for one show by episode number.
pub async fn regenerate_for_show(
    pool: &SqlitePool,
    generator: &dyn NoteGenerator,
    show_number: i64,
) -> Result<(), NotesError> {
    let show = shows::find_show_by_number(pool, show_number)
        .await?
        .ok_or(NotesError::ShowNotFound(show_number))?;

    let utterances = transcripts::transcript_for_show(pool, show.guid)
        .await?
        .ok_or(NotesError::TranscriptMissing(show_number))?;

    // Delete first: regeneration replaces the whole tree, never merges
    ai_notes::delete_notes_for_show(pool, show.guid).await?;

    let input = NotesInput {
        show_number,
        title: show.title.clone(),
        utterances,
    };
    let notes = generator
        .generate(&input)
        .await
        .map_err(NotesError::Generator)?;

    tracing::info!(number = show_number, "saving AI notes");
    ai_notes::save_notes(pool, show.guid, &notes).await?;

    Ok(())
}

/// Regenerate notes for the newest show that has a transcript but no notes.
///
/// Returns the episode number handled, or `None` when every transcribed
/// show already has notes.
pub async fn regenerate_latest(
    pool: &SqlitePool,
    generator: &dyn NoteGenerator,
) -> Result<Option<i64>, NotesError> {
    let Some((_guid, number, title)) = transcripts::latest_show_needing_notes(pool).await? else {
        return Ok(None);
    };

    tracing::info!(number, title = %title, "found a show that needs AI show notes");
    regenerate_for_show(pool, generator, number).await?;
    Ok(Some(number))
}

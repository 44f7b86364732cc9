//! AI-generated show note payloads
//!
//! The shape a `NoteGenerator` implementation must produce, and the shape
//! the persistence layer writes as an `ai_show_notes` row plus children.

use serde::{Deserialize, Serialize};

/// One generation result for a show. Persisted wholesale; a show's previous
/// notes are deleted before this is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedNotes {
    pub title: String,
    /// Long description; generators may only produce `short_description`,
    /// in which case that is promoted here by the caller.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub tweets: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub links: Vec<GeneratedLink>,
}

impl GeneratedNotes {
    /// Description with the short-description fallback applied.
    pub fn description_or_short(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.short_description.as_deref())
    }
}

/// A link mentioned in the episode, with an optional `HH:MM:SS` timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedLink {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

//! Front-matter parsing for show-note markdown
//!
//! Splits a document into a YAML metadata block and body content, and
//! normalizes the polymorphic shapes the metadata allows (`guest` as one
//! object or a sequence, `social` as one string or a sequence) into plain
//! `Vec`s at this boundary. Nothing past the parser branches on shape.
//!
//! Dates are deliberately kept raw here: a malformed date must not fail the
//! parse, it surfaces when the show is persisted.

use serde::Deserialize;

use crate::error::SyncError;

/// A parsed show-note document: normalized metadata plus the markdown body.
#[derive(Debug, Clone)]
pub struct Document {
    pub matter: FrontMatter,
    pub body: String,
}

/// Normalized front-matter metadata.
#[derive(Debug, Clone)]
pub struct FrontMatter {
    pub title: String,
    /// Raw date field: either an epoch-milliseconds token or a date string.
    /// Parsed (and validated) by the show reconciler at persist time.
    pub date: Option<String>,
    pub url: Option<String>,
    pub guests: Vec<GuestMatter>,
}

/// One guest entry, with `social` already normalized to a sequence.
#[derive(Debug, Clone)]
pub struct GuestMatter {
    /// Display name; empty when the entry omitted it. The guest reconciler
    /// rejects entries whose name does not slugify.
    pub name: String,
    pub twitter: Option<String>,
    pub url: Option<String>,
    pub social: Vec<String>,
}

/// Either a single value or a sequence of values, as YAML allows both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// Date as written in the metadata block: epoch millis or a date string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDate {
    Millis(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawFrontMatter {
    title: Option<String>,
    date: Option<RawDate>,
    url: Option<String>,
    guest: Option<OneOrMany<RawGuest>>,
}

#[derive(Debug, Deserialize)]
struct RawGuest {
    name: Option<String>,
    twitter: Option<String>,
    url: Option<String>,
    social: Option<OneOrMany<String>>,
}

/// Parse a raw show-note document into metadata and body.
///
/// The file must open with a `---` fenced YAML block; `title` is required
/// (the show slug derives from it). Everything after the closing fence is
/// body content, untouched.
pub fn parse_document(raw: &str, md_file: &str) -> Result<Document, SyncError> {
    let (yaml, body) = split_front_matter(raw).ok_or_else(|| SyncError::Parse {
        file: md_file.to_string(),
        reason: "missing front matter block".to_string(),
    })?;

    let raw_matter: RawFrontMatter =
        serde_yaml::from_str(yaml).map_err(|e| SyncError::Parse {
            file: md_file.to_string(),
            reason: format!("invalid front matter: {e}"),
        })?;

    let title = raw_matter
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| SyncError::Parse {
            file: md_file.to_string(),
            reason: "front matter is missing required `title`".to_string(),
        })?;

    let date = raw_matter.date.map(|d| match d {
        RawDate::Millis(ms) => ms.to_string(),
        RawDate::Text(s) => s,
    });

    let guests = raw_matter
        .guest
        .map(Vec::from)
        .unwrap_or_default()
        .into_iter()
        .map(|g| GuestMatter {
            name: g.name.unwrap_or_default(),
            twitter: g.twitter,
            url: g.url,
            social: g.social.map(Vec::from).unwrap_or_default(),
        })
        .collect();

    Ok(Document {
        matter: FrontMatter {
            title,
            date,
            url: raw_matter.url,
            guests,
        },
        body: body.to_string(),
    })
}

/// Split a document into its YAML block and body.
///
/// Returns `None` when the document does not open with a `---` fence or the
/// closing fence is missing.
fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix("---")?;
    let rest = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n"))?;

    // Find the closing fence on its own line
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

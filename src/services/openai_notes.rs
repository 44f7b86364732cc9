//! OpenAI-backed note generator
//!
//! Thin HTTP wrapper implementing [`NoteGenerator`] against the chat
//! completions API. The prompt asks for a single JSON object matching
//! [`GeneratedNotes`]; everything interesting about notes lives in the
//! pipeline, not here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::GeneratedNotes;
use crate::services::ai_notes::{NoteGenerator, NotesInput};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Cap on transcript characters shipped to the model
const MAX_TRANSCRIPT_CHARS: usize = 120_000;

pub struct OpenAiNoteGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<serde_json::Value>,
    response_format: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiNoteGenerator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Flatten utterances into a speaker-labelled transcript block.
    fn transcript_text(input: &NotesInput) -> String {
        let mut text = String::new();
        for utterance in &input.utterances {
            if let Some(speaker) = &utterance.speaker {
                text.push_str(speaker);
                text.push_str(": ");
            }
            text.push_str(&utterance.transcript_value);
            text.push('\n');
            if text.len() >= MAX_TRANSCRIPT_CHARS {
                break;
            }
        }
        text
    }

    fn build_request(&self, input: &NotesInput) -> ChatRequest<'_> {
        let system = "You write podcast show notes from transcripts. \
            Respond with a single JSON object with keys: title, description, \
            summary, tweets (array of strings), topics (array of strings), \
            links (array of {name, url, timestamp}).";
        let user = format!(
            "Episode {} - {}\n\nTranscript:\n{}",
            input.show_number,
            input.title,
            Self::transcript_text(input)
        );

        ChatRequest {
            model: &self.model,
            messages: vec![
                json!({ "role": "system", "content": system }),
                json!({ "role": "user", "content": user }),
            ],
            response_format: json!({ "type": "json_object" }),
        }
    }
}

#[async_trait]
impl NoteGenerator for OpenAiNoteGenerator {
    async fn generate(&self, input: &NotesInput) -> anyhow::Result<GeneratedNotes> {
        let request = self.build_request(input);

        let response = self
            .client
            .post(format!("{OPENAI_BASE_URL}/chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("openai returned {status}: {body}");
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| anyhow::anyhow!("openai response had no choices"))?;

        let notes: GeneratedNotes = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("generation result is not valid notes JSON: {e}"))?;
        Ok(notes)
    }
}

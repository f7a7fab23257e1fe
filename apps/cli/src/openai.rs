//! OpenAI speech and chat clients for the listen mode.
//!
//! Speech uses `tts-1` with the `nova` voice; explanations use
//! `gpt-4o-mini`. Synthesized audio is cached in memory by the exact input
//! text for the session.

use std::collections::HashMap;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sqlcards_core::Card;

use crate::error::{AppError, Result};

const SPEECH_URL: &str = "https://api.openai.com/v1/audio/speech";
const CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const SPEECH_MODEL: &str = "tts-1";
const SPEECH_VOICE: &str = "nova";
const CHAT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Client for the two OpenAI endpoints the game uses.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    speech_cache: HashMap<String, Vec<u8>>,
}

impl OpenAiClient {
    /// Refuses construction without a key, so a missing credential is
    /// reported before any call is attempted.
    pub fn new(api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::MissingApiKey);
        }
        Ok(Self {
            http: Client::new(),
            api_key: api_key.to_string(),
            speech_cache: HashMap::new(),
        })
    }

    /// Synthesize speech for `text`, returning the audio bytes. Cached by
    /// the exact input string for the lifetime of the client.
    pub async fn synthesize(&mut self, text: &str) -> Result<Vec<u8>> {
        if let Some(clip) = self.speech_cache.get(text) {
            return Ok(clip.clone());
        }

        let response = self
            .http
            .post(SPEECH_URL)
            .bearer_auth(&self.api_key)
            .json(&SpeechRequest {
                model: SPEECH_MODEL,
                input: text,
                voice: SPEECH_VOICE,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let clip = response.bytes().await?.to_vec();
        self.speech_cache.insert(text.to_string(), clip.clone());
        Ok(clip)
    }

    pub fn clear_cache(&mut self) {
        self.speech_cache.clear();
    }

    pub fn cached_clips(&self) -> usize {
        self.speech_cache.len()
    }

    /// Ask for a detailed explanation of a card's command. Returns the raw
    /// markdown-ish text; rendering is the caller's business.
    pub async fn explain(&self, card: &Card) -> Result<String> {
        let request = ChatRequest {
            model: CHAT_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: explain_prompt(card),
            }],
        };

        let response = self
            .http
            .post(CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(AppError::Api {
                status: status.as_u16(),
                message: "response contained no choices".to_string(),
            })
    }
}

fn explain_prompt(card: &Card) -> String {
    format!(
        "Explain this SQL command in detail: {}\n\nSyntax: {}\nExample: {}\n\n\
         Include:\n1. What it does\n2. When to use it\n3. Common patterns\n\
         4. Tips and best practices\n5. Related commands",
        card.command,
        card.syntax.as_deref().unwrap_or(""),
        card.example.as_deref().unwrap_or(""),
    )
}

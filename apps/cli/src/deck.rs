//! Deck and library loading.
//!
//! # Deck file format
//! ```json
//! { "cards": [ { "id": "1_1", "command": "SELECT", "description": "...",
//!               "syntax": "...", "example": "...", "explanation": "...",
//!               "category": "..." } ] }
//! ```
//!
//! Loading falls back to a single built-in card on any failure; importing
//! is strict so a malformed file leaves the active deck untouched.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sqlcards_core::{Card, Deck};

use crate::error::Result;

/// On-disk deck file.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckFile {
    pub cards: Vec<Card>,
}

/// One entry of the library index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckEntry {
    pub name: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub card_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// The library index listing available deck files.
#[derive(Debug, Serialize, Deserialize)]
pub struct LibraryIndex {
    pub decks: Vec<DeckEntry>,
}

/// The single built-in card used when nothing else loads.
pub fn fallback_deck() -> Deck {
    Deck::new(vec![Card {
        id: "1_1".to_string(),
        command: "SELECT".to_string(),
        description: "Retrieves data".to_string(),
        syntax: Some("SELECT col FROM table;".to_string()),
        example: Some("SELECT name FROM users;".to_string()),
        explanation: Some("SELECT retrieves data from tables.".to_string()),
        category: None,
    }])
}

/// Parse a deck strictly. Used by import: errors propagate and the caller
/// keeps its current deck.
pub fn parse_deck(contents: &str) -> Result<Deck> {
    let file: DeckFile = serde_json::from_str(contents)?;
    Ok(Deck::new(file.cards))
}

/// Read and parse a deck file strictly.
pub fn read_deck(path: &Path) -> Result<Deck> {
    let contents = std::fs::read_to_string(path)?;
    parse_deck(&contents)
}

/// Load a deck, falling back to the built-in card on any failure. Load
/// failures are logged, never surfaced as blocking errors.
pub fn load_deck(path: &Path) -> Deck {
    match read_deck(path) {
        Ok(deck) if !deck.is_empty() => deck,
        Ok(_) => {
            tracing::warn!(path = %path.display(), "deck file has no cards, using fallback");
            fallback_deck()
        }
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "failed to load deck, using fallback");
            fallback_deck()
        }
    }
}

/// Load the library index, or `None` (logged) if it cannot be read.
pub fn load_library(path: &Path) -> Option<LibraryIndex> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "failed to read library index");
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(library) => Some(library),
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "failed to parse library index");
            None
        }
    }
}

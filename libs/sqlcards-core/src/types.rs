//! Core types for the SQL card game.

use serde::{Deserialize, Serialize};

/// One vocabulary unit: a SQL command and its descriptive text.
///
/// Field names match the deck JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique within a deck; identifies the pair on the board.
    pub id: String,
    pub command: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// An ordered set of cards. Read-only during a round; replaced wholesale
/// when a new deck is loaded or imported, never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Which face of a card a board entry shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRole {
    Command,
    Explanation,
}

/// One board entry: a card projected into a single role.
///
/// Every deck card yields exactly two of these, one per role. `matched`
/// starts false and is set permanently when the pair resolves; only
/// dealing a new board resets it.
#[derive(Debug, Clone)]
pub struct BoardCard {
    pub card: Card,
    pub role: CardRole,
    pub matched: bool,
}

impl BoardCard {
    /// The text shown when this entry is face-up.
    pub fn face_text(&self) -> &str {
        match self.role {
            CardRole::Command => &self.card.command,
            CardRole::Explanation => &self.card.description,
        }
    }
}

/// The screens of the game. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    ModeSelect,
    PreGame,
    Concentration,
    DragDrop,
    Listen,
    Practice,
    Timed,
}

/// Reported when the last pair of a round resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub round_number: u32,
    pub score: u32,
    pub attempts: u32,
}

/// Final tally of a practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PracticeSummary {
    pub correct: u32,
    pub incorrect: u32,
}

/// Final score of a timed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimedSummary {
    pub score: u32,
}

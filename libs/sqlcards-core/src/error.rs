//! Error types for sqlcards-core.

use thiserror::Error;

/// Result type alias using GameError.
pub type Result<T> = std::result::Result<T, GameError>;

/// Errors from the game engines. All are recoverable; none ends the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("cannot start a round with an empty deck")]
    EmptyDeck,

    #[error("no active round")]
    NoActiveRound,
}

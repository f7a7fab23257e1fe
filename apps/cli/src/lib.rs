//! Terminal host for the SQL card game.
//!
//! The game logic lives in `sqlcards-core`; this crate supplies everything
//! around it: deck and library loading from JSON files, deck import,
//! settings persistence, the OpenAI speech/chat client, sequential audio
//! playback, and the interactive front-end.

pub mod audio;
pub mod deck;
pub mod error;
pub mod markdown;
pub mod openai;
pub mod play;
pub mod store;

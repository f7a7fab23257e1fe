//! Core game logic for the SQL card-matching game.
//!
//! Provides:
//! - Pair-matching (concentration) board with flip guards and scoring
//! - Mode/screen state machine and round controller (`GameSession`)
//! - Practice and timed scoring sub-engines, drag-drop validation
//! - Answer normalization for typed practice answers
//! - Typed settings with a defaulted merge
//!
//! The crate does no I/O and owns no clocks: time advances only through
//! explicit `tick()` calls and randomness is injected as `&mut impl Rng`,
//! so every behavior is deterministic under test.

pub mod board;
pub mod countdown;
pub mod error;
pub mod matching;
pub mod modes;
pub mod session;
pub mod settings;
pub mod shuffle;
pub mod types;

pub use board::{Board, FlipRejection, FlipResult, MatchOutcome, Resolution, RoundState};
pub use countdown::{Countdown, CountdownTick};
pub use error::{GameError, Result};
pub use matching::{answers_match, command_hint, normalize_command};
pub use modes::dragdrop::{DragDropSession, DropOutcome};
pub use modes::practice::{PracticeGrade, PracticeSession};
pub use modes::timed::{TimedAnswer, TimedSession, TimedTick};
pub use session::{GameSession, PreGameTick};
pub use settings::{GameSettings, MatchedPairBehavior, SettingsUpdate};
pub use types::{
    BoardCard, Card, CardRole, Deck, PracticeSummary, RoundSummary, Screen, TimedSummary,
};

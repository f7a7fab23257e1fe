//! Practice mode: type the command for each card in a shuffled order.

use std::time::Duration;

use rand::Rng;

use crate::matching::answers_match;
use crate::shuffle::shuffled_indices;
use crate::types::PracticeSummary;

/// Correct answers advance after a short delay.
pub const CORRECT_ADVANCE_DELAY: Duration = Duration::from_secs(1);
/// Incorrect answers linger longer so the expected command can be read.
pub const INCORRECT_ADVANCE_DELAY: Duration = Duration::from_secs(2);

/// Outcome of grading an answer. Carries the delay the host should wait
/// before calling [`PracticeSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeGrade {
    Correct { advance_after: Duration },
    Incorrect { advance_after: Duration },
}

/// One practice run over a shuffled card order.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    order: Vec<usize>,
    index: usize,
    correct: u32,
    incorrect: u32,
}

impl PracticeSession {
    pub fn new(deck_len: usize, rng: &mut impl Rng) -> Self {
        Self {
            order: shuffled_indices(deck_len, rng),
            index: 0,
            correct: 0,
            incorrect: 0,
        }
    }

    /// Deck index of the card being presented, if the session is not over.
    pub fn current_index(&self) -> Option<usize> {
        self.order.get(self.index).copied()
    }

    /// Grade a typed answer against the expected command.
    pub fn grade(&mut self, expected_command: &str, answer: &str) -> PracticeGrade {
        if answers_match(expected_command, answer) {
            self.correct += 1;
            PracticeGrade::Correct {
                advance_after: CORRECT_ADVANCE_DELAY,
            }
        } else {
            self.incorrect += 1;
            PracticeGrade::Incorrect {
                advance_after: INCORRECT_ADVANCE_DELAY,
            }
        }
    }

    /// Skip the current card immediately. Tallies are untouched.
    pub fn skip(&mut self) {
        self.advance();
    }

    /// Move to the next card.
    pub fn advance(&mut self) {
        if self.index < self.order.len() {
            self.index += 1;
        }
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    /// Position within the session, for progress display.
    pub fn progress(&self) -> (usize, usize) {
        (self.index.min(self.order.len()), self.order.len())
    }

    /// The final tally, once the cursor has passed the end of the order.
    pub fn summary(&self) -> Option<PracticeSummary> {
        (self.index >= self.order.len()).then_some(PracticeSummary {
            correct: self.correct,
            incorrect: self.incorrect,
        })
    }
}

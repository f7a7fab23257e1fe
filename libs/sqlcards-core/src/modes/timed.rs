//! Timed mode: five seconds per card, points scaled to the clock.

use rand::Rng;

use crate::countdown::{Countdown, CountdownTick};
use crate::shuffle::shuffled_indices;
use crate::types::TimedSummary;

pub const SECONDS_PER_CARD: u32 = 5;
pub const POINTS_PER_SECOND: u32 = 10;
pub const MIN_AWARD: u32 = 10;

/// Outcome of a tick of the per-card clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedTick {
    /// No clock running (session over, or nothing started).
    Idle,
    /// Still counting; carries the seconds left on the current card.
    Counting(u32),
    /// The card timed out: zero points, already advanced.
    TimedOut,
}

/// Outcome of a manual thumbs-up / thumbs-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedAnswer {
    /// Points awarded for this card (zero on thumbs-down).
    Scored(u32),
    /// No card is on the clock; nothing changed.
    Rejected,
}

/// One timed run over a shuffled card order.
#[derive(Debug, Clone)]
pub struct TimedSession {
    order: Vec<usize>,
    index: usize,
    score: u32,
    countdown: Countdown,
}

impl TimedSession {
    pub fn new(deck_len: usize, rng: &mut impl Rng) -> Self {
        let order = shuffled_indices(deck_len, rng);
        let mut countdown = Countdown::new();
        if !order.is_empty() {
            countdown.start(SECONDS_PER_CARD);
        }
        Self {
            order,
            index: 0,
            score: 0,
            countdown,
        }
    }

    /// Deck index of the card on the clock, if the session is not over.
    pub fn current_index(&self) -> Option<usize> {
        self.order.get(self.index).copied()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    /// Position within the session, for progress display.
    pub fn progress(&self) -> (usize, usize) {
        (self.index.min(self.order.len()), self.order.len())
    }

    /// Advance the per-card clock by one second. A timeout awards nothing
    /// and moves to the next card.
    pub fn tick(&mut self) -> TimedTick {
        match self.countdown.tick() {
            CountdownTick::Idle => TimedTick::Idle,
            CountdownTick::Running(left) => TimedTick::Counting(left),
            CountdownTick::Finished => {
                self.advance();
                TimedTick::TimedOut
            }
        }
    }

    /// Claim the current card as known. Awards points scaled to the time
    /// left, stops the clock first so the pending timeout cannot advance a
    /// second time, and moves on. Rejected once the clock has expired (the
    /// timeout already resolved the card).
    pub fn thumbs_up(&mut self) -> TimedAnswer {
        let Some(remaining) = self.countdown.remaining() else {
            return TimedAnswer::Rejected;
        };
        self.countdown.stop();
        let points = (remaining * POINTS_PER_SECOND).max(MIN_AWARD);
        self.score += points;
        self.advance();
        TimedAnswer::Scored(points)
    }

    /// Give up on the current card: zero points, move on.
    pub fn thumbs_down(&mut self) -> TimedAnswer {
        if !self.countdown.is_running() {
            return TimedAnswer::Rejected;
        }
        self.countdown.stop();
        self.advance();
        TimedAnswer::Scored(0)
    }

    fn advance(&mut self) {
        self.index += 1;
        if self.index < self.order.len() {
            self.countdown.start(SECONDS_PER_CARD);
        } else {
            self.countdown.stop();
        }
    }

    /// The final score, once the cursor has passed the end of the order.
    pub fn summary(&self) -> Option<TimedSummary> {
        (self.index >= self.order.len()).then_some(TimedSummary { score: self.score })
    }
}

//! Cancellable second-resolution countdowns.
//!
//! The host decides what a second is (a real timer, a test calling `tick`
//! directly); the countdown only tracks remaining time. Used for the
//! pre-game auto-start timer and the timed mode's per-card clock.

/// A countdown over whole seconds. Stopped when `remaining` is `None`.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    remaining: Option<u32>,
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// No countdown is running.
    Idle,
    /// Still counting; carries the seconds left.
    Running(u32),
    /// The final second just elapsed. Fires once; the countdown is now
    /// stopped.
    Finished,
}

impl Countdown {
    pub fn new() -> Self {
        Self { remaining: None }
    }

    /// Start (or restart) the countdown. Replaces any running countdown.
    pub fn start(&mut self, seconds: u32) {
        self.remaining = Some(seconds);
    }

    /// Stop the countdown. Stopping an already-stopped countdown is a no-op.
    pub fn stop(&mut self) {
        self.remaining = None;
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> CountdownTick {
        match self.remaining {
            None => CountdownTick::Idle,
            Some(left) if left <= 1 => {
                self.remaining = None;
                CountdownTick::Finished
            }
            Some(left) => {
                self.remaining = Some(left - 1);
                CountdownTick::Running(left - 1)
            }
        }
    }
}

//! Per-mode scoring state machines, independent of the concentration round.

pub mod dragdrop;
pub mod practice;
pub mod timed;

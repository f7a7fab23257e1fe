//! The pair-matching (concentration) engine.
//!
//! A board is dealt from a card set captured at round start: every card
//! becomes two entries, one per role, shuffled uniformly. Flips are guarded,
//! pairs are evaluated synchronously on the second flip, and the visual
//! resolution (flip-back or matched-highlight) is deferred: the caller waits
//! `resolve_after` and then calls [`Board::resolve`], which clears the flip
//! selection and reports round completion.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;

use crate::error::{GameError, Result};
use crate::shuffle::fisher_yates;
use crate::types::{BoardCard, Card, CardRole, RoundSummary};

pub const STARTING_SCORE: u32 = 1000;
pub const MATCH_BONUS: u32 = 50;
pub const MISMATCH_PENALTY: u32 = 10;

/// Delay before a matched pair is highlighted and the selection cleared.
pub const MATCH_RESOLVE_DELAY: Duration = Duration::from_millis(500);
/// Delay before a mismatched pair flips back down.
pub const MISMATCH_RESOLVE_DELAY: Duration = Duration::from_millis(1000);

/// Mutable state of one round. Rebuilt by every deal.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub attempts: u32,
    pub score: u32,
    pub matched_pairs: HashSet<String>,
    pub round_number: u32,
    pub active: bool,
}

/// Why a flip was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipRejection {
    RoundInactive,
    PairPending,
    OutOfBounds,
    AlreadySelected,
    AlreadyMatched,
}

/// Whether a completed pair matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Match,
    Mismatch,
}

/// Result of a flip attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipResult {
    /// Guarded no-op; the board did not change.
    Rejected(FlipRejection),
    /// First card of a pair is now face-up.
    FirstUp,
    /// Second card completed a pair. Score and matched flags are already
    /// updated; call [`Board::resolve`] after `resolve_after` to clear the
    /// selection.
    Evaluated {
        outcome: MatchOutcome,
        positions: [usize; 2],
        resolve_after: Duration,
    },
}

/// Result of resolving a pending pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Matched pair stays revealed; more pairs remain.
    MatchKept,
    /// Mismatched pair flipped back down.
    FlippedBack,
    /// The last pair resolved; the round is over.
    RoundComplete(RoundSummary),
}

/// The shuffled board for one round.
#[derive(Debug, Clone)]
pub struct Board {
    cards: Vec<BoardCard>,
    flipped: Vec<usize>,
    pending: Option<MatchOutcome>,
    pair_count: usize,
    state: RoundState,
}

impl Board {
    /// Deal a new board from the given card set.
    ///
    /// The set is the round's single source of truth: exactly `2 * N` board
    /// entries are created and completion is judged against `N`. An empty
    /// set is refused rather than dealt as an instantly-complete round.
    pub fn deal(cards: &[Card], round_number: u32, rng: &mut impl Rng) -> Result<Self> {
        if cards.is_empty() {
            return Err(GameError::EmptyDeck);
        }

        let mut board_cards = Vec::with_capacity(cards.len() * 2);
        for card in cards {
            for role in [CardRole::Command, CardRole::Explanation] {
                board_cards.push(BoardCard {
                    card: card.clone(),
                    role,
                    matched: false,
                });
            }
        }
        fisher_yates(&mut board_cards, rng);

        Ok(Self {
            cards: board_cards,
            flipped: Vec::new(),
            pending: None,
            pair_count: cards.len(),
            state: RoundState {
                attempts: 0,
                score: STARTING_SCORE,
                matched_pairs: HashSet::new(),
                round_number,
                active: true,
            },
        })
    }

    /// Flip the card at `position` face-up.
    ///
    /// The flip selection never exceeds two entries, never contains a
    /// duplicate, and never contains a matched card. The second valid flip
    /// counts an attempt and evaluates the pair: a match needs the same card
    /// id in two different roles.
    pub fn flip(&mut self, position: usize) -> FlipResult {
        if !self.state.active {
            return FlipResult::Rejected(FlipRejection::RoundInactive);
        }
        if self.pending.is_some() || self.flipped.len() >= 2 {
            return FlipResult::Rejected(FlipRejection::PairPending);
        }
        if position >= self.cards.len() {
            return FlipResult::Rejected(FlipRejection::OutOfBounds);
        }
        if self.flipped.contains(&position) {
            return FlipResult::Rejected(FlipRejection::AlreadySelected);
        }
        if self.cards[position].matched {
            return FlipResult::Rejected(FlipRejection::AlreadyMatched);
        }

        self.flipped.push(position);
        if self.flipped.len() < 2 {
            return FlipResult::FirstUp;
        }

        self.state.attempts += 1;
        let positions = [self.flipped[0], self.flipped[1]];
        let (first, second) = (&self.cards[positions[0]], &self.cards[positions[1]]);
        let is_match = first.card.id == second.card.id && first.role != second.role;

        let outcome = if is_match {
            let pair_id = first.card.id.clone();
            self.state.score += MATCH_BONUS;
            self.state.matched_pairs.insert(pair_id);
            self.cards[positions[0]].matched = true;
            self.cards[positions[1]].matched = true;
            MatchOutcome::Match
        } else {
            self.state.score = self.state.score.saturating_sub(MISMATCH_PENALTY);
            MatchOutcome::Mismatch
        };

        self.pending = Some(outcome);
        FlipResult::Evaluated {
            outcome,
            positions,
            resolve_after: match outcome {
                MatchOutcome::Match => MATCH_RESOLVE_DELAY,
                MatchOutcome::Mismatch => MISMATCH_RESOLVE_DELAY,
            },
        }
    }

    /// Clear the pending pair after its resolution delay. Returns `None`
    /// when nothing is pending.
    pub fn resolve(&mut self) -> Option<Resolution> {
        let outcome = self.pending.take()?;
        self.flipped.clear();

        match outcome {
            MatchOutcome::Match if self.state.matched_pairs.len() == self.pair_count => {
                self.state.active = false;
                Some(Resolution::RoundComplete(RoundSummary {
                    round_number: self.state.round_number,
                    score: self.state.score,
                    attempts: self.state.attempts,
                }))
            }
            MatchOutcome::Match => Some(Resolution::MatchKept),
            MatchOutcome::Mismatch => Some(Resolution::FlippedBack),
        }
    }

    pub fn cards(&self) -> &[BoardCard] {
        &self.cards
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Number of pairs on this board.
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Positions currently face-up and unresolved, in flip order.
    pub fn flipped(&self) -> &[usize] {
        &self.flipped
    }

    /// Whether the entry at `position` should render face-up.
    pub fn is_face_up(&self, position: usize) -> bool {
        self.flipped.contains(&position)
            || self.cards.get(position).is_some_and(|card| card.matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(id: &str, command: &str) -> Card {
        Card {
            id: id.to_string(),
            command: command.to_string(),
            description: format!("{command} does things"),
            syntax: None,
            example: None,
            explanation: None,
            category: None,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn position_of(board: &Board, id: &str, role: CardRole) -> usize {
        board
            .cards()
            .iter()
            .position(|c| c.card.id == id && c.role == role)
            .unwrap()
    }

    #[test]
    fn deal_builds_two_entries_per_card() {
        let cards: Vec<Card> = (0..5).map(|i| card(&i.to_string(), "CMD")).collect();
        let board = Board::deal(&cards, 1, &mut rng()).unwrap();

        assert_eq!(board.cards().len(), 10);
        let commands = board
            .cards()
            .iter()
            .filter(|c| c.role == CardRole::Command)
            .count();
        assert_eq!(commands, 5);

        for wanted in &cards {
            let occurrences = board
                .cards()
                .iter()
                .filter(|c| c.card.id == wanted.id)
                .count();
            assert_eq!(occurrences, 2, "id {} should appear exactly twice", wanted.id);
        }

        let state = board.state();
        assert_eq!(state.score, STARTING_SCORE);
        assert_eq!(state.attempts, 0);
        assert!(state.matched_pairs.is_empty());
        assert!(state.active);
    }

    #[test]
    fn empty_deck_is_refused() {
        assert_eq!(
            Board::deal(&[], 1, &mut rng()).unwrap_err(),
            GameError::EmptyDeck
        );
    }

    #[test]
    fn match_requires_same_id_and_different_roles() {
        let cards = vec![card("A", "SELECT"), card("B", "INSERT")];
        let mut board = Board::deal(&cards, 1, &mut rng()).unwrap();

        let a_cmd = position_of(&board, "A", CardRole::Command);
        let b_cmd = position_of(&board, "B", CardRole::Command);

        assert_eq!(board.flip(a_cmd), FlipResult::FirstUp);
        let result = board.flip(b_cmd);
        match result {
            FlipResult::Evaluated {
                outcome: MatchOutcome::Mismatch,
                resolve_after,
                ..
            } => assert_eq!(resolve_after, MISMATCH_RESOLVE_DELAY),
            other => panic!("expected mismatch, got {other:?}"),
        }
        assert_eq!(board.state().score, STARTING_SCORE - MISMATCH_PENALTY);
    }

    #[test]
    fn same_role_with_equal_id_does_not_match() {
        // Two cards sharing an id put two command entries on the board;
        // flipping both must not count as a pair.
        let cards = vec![card("A", "SELECT"), card("A", "SELECT")];
        let mut board = Board::deal(&cards, 1, &mut rng()).unwrap();

        let positions: Vec<usize> = board
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.role == CardRole::Command)
            .map(|(i, _)| i)
            .collect();

        board.flip(positions[0]);
        let result = board.flip(positions[1]);
        assert!(matches!(
            result,
            FlipResult::Evaluated {
                outcome: MatchOutcome::Mismatch,
                ..
            }
        ));
    }

    #[test]
    fn flip_guards_reject_invalid_positions() {
        let cards = vec![card("A", "SELECT"), card("B", "INSERT")];
        let mut board = Board::deal(&cards, 1, &mut rng()).unwrap();

        assert_eq!(
            board.flip(99),
            FlipResult::Rejected(FlipRejection::OutOfBounds)
        );

        let a_cmd = position_of(&board, "A", CardRole::Command);
        board.flip(a_cmd);
        assert_eq!(
            board.flip(a_cmd),
            FlipResult::Rejected(FlipRejection::AlreadySelected)
        );

        // Second flip makes a pending pair; a third flip is ignored.
        let b_cmd = position_of(&board, "B", CardRole::Command);
        board.flip(b_cmd);
        let b_exp = position_of(&board, "B", CardRole::Explanation);
        assert_eq!(
            board.flip(b_exp),
            FlipResult::Rejected(FlipRejection::PairPending)
        );
        assert_eq!(board.flipped().len(), 2);
    }

    #[test]
    fn matched_cards_cannot_be_flipped_again() {
        let cards = vec![card("A", "SELECT"), card("B", "INSERT")];
        let mut board = Board::deal(&cards, 1, &mut rng()).unwrap();

        let a_cmd = position_of(&board, "A", CardRole::Command);
        let a_exp = position_of(&board, "A", CardRole::Explanation);
        board.flip(a_cmd);
        board.flip(a_exp);
        assert_eq!(board.resolve(), Some(Resolution::MatchKept));

        assert_eq!(
            board.flip(a_cmd),
            FlipResult::Rejected(FlipRejection::AlreadyMatched)
        );
    }

    #[test]
    fn score_is_floored_at_zero() {
        let cards = vec![card("A", "SELECT"), card("B", "INSERT")];
        let mut board = Board::deal(&cards, 1, &mut rng()).unwrap();

        let a_cmd = position_of(&board, "A", CardRole::Command);
        let b_cmd = position_of(&board, "B", CardRole::Command);

        // 1000 / 10 = 100 mismatches to reach zero; keep going past it.
        for _ in 0..120 {
            board.flip(a_cmd);
            board.flip(b_cmd);
            board.resolve();
        }
        assert_eq!(board.state().score, 0);
        assert_eq!(board.state().attempts, 120);
    }

    #[test]
    fn inactive_board_rejects_flips() {
        let cards = vec![card("A", "SELECT")];
        let mut board = Board::deal(&cards, 1, &mut rng()).unwrap();

        board.flip(0);
        board.flip(1);
        assert!(matches!(
            board.resolve(),
            Some(Resolution::RoundComplete(_))
        ));
        assert_eq!(
            board.flip(0),
            FlipResult::Rejected(FlipRejection::RoundInactive)
        );
    }

    #[test]
    fn resolve_without_pending_pair_is_none() {
        let cards = vec![card("A", "SELECT")];
        let mut board = Board::deal(&cards, 1, &mut rng()).unwrap();
        assert_eq!(board.resolve(), None);
        board.flip(0);
        assert_eq!(board.resolve(), None);
    }

    /// Full two-card round walkthrough: match A, get guarded
    /// against the matched card, then finish with B.
    #[test]
    fn two_card_round_walkthrough() {
        let cards = vec![card("A", "SELECT"), card("B", "INSERT")];
        let mut board = Board::deal(&cards, 3, &mut rng()).unwrap();
        assert_eq!(board.cards().len(), 4);

        let a_cmd = position_of(&board, "A", CardRole::Command);
        let a_exp = position_of(&board, "A", CardRole::Explanation);
        let b_cmd = position_of(&board, "B", CardRole::Command);
        let b_exp = position_of(&board, "B", CardRole::Explanation);

        assert_eq!(board.flip(a_cmd), FlipResult::FirstUp);
        match board.flip(a_exp) {
            FlipResult::Evaluated {
                outcome: MatchOutcome::Match,
                resolve_after,
                ..
            } => assert_eq!(resolve_after, MATCH_RESOLVE_DELAY),
            other => panic!("expected match, got {other:?}"),
        }
        assert_eq!(board.state().score, 1050);
        assert_eq!(board.state().attempts, 1);
        assert!(board.state().matched_pairs.contains("A"));
        assert_eq!(board.resolve(), Some(Resolution::MatchKept));

        assert_eq!(board.flip(b_cmd), FlipResult::FirstUp);
        assert_eq!(
            board.flip(a_cmd),
            FlipResult::Rejected(FlipRejection::AlreadyMatched)
        );
        assert_eq!(board.flipped(), &[b_cmd]);

        let result = board.flip(b_exp);
        assert!(matches!(
            result,
            FlipResult::Evaluated {
                outcome: MatchOutcome::Match,
                ..
            }
        ));
        assert_eq!(
            board.resolve(),
            Some(Resolution::RoundComplete(RoundSummary {
                round_number: 3,
                score: 1100,
                attempts: 2,
            }))
        );
        assert!(!board.state().active);
    }
}

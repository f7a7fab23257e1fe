//! The session context: one deck, one active screen, one state slice per
//! mode.
//!
//! `GameSession` owns the screen state machine and the round controller.
//! Transitions are atomic: leaving a screen stops its timers and drops its
//! mode state, so a countdown scheduled on one screen can never fire into
//! another. Tick methods are relevance-checked against the current screen
//! for the same reason.

use rand::Rng;

use crate::board::{Board, FlipRejection, FlipResult, Resolution};
use crate::countdown::{Countdown, CountdownTick};
use crate::error::{GameError, Result};
use crate::modes::dragdrop::{DragDropSession, DropOutcome};
use crate::modes::practice::{PracticeGrade, PracticeSession};
use crate::modes::timed::{TimedAnswer, TimedSession, TimedTick};
use crate::settings::{GameSettings, SettingsUpdate};
use crate::shuffle::fisher_yates;
use crate::types::{Card, Deck, Screen};

/// Outcome of a pre-game auto-start tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreGameTick {
    /// No countdown running, or the tick was not for this screen.
    Idle,
    /// Auto-start counting down; carries the seconds left.
    Counting(u32),
    /// The countdown ran out and the round just started.
    Started,
}

/// Top-level game state: deck, screen, settings, and per-mode slices.
#[derive(Debug)]
pub struct GameSession {
    deck: Deck,
    display_order: Vec<usize>,
    screen: Screen,
    settings: GameSettings,
    round_number: u32,
    pregame: Countdown,
    commands_hidden: bool,
    explanations_hidden: bool,
    board: Option<Board>,
    practice: Option<PracticeSession>,
    timed: Option<TimedSession>,
    drag_drop: Option<DragDropSession>,
}

impl GameSession {
    pub fn new(deck: Deck, settings: GameSettings) -> Self {
        let display_order = (0..deck.len()).collect();
        Self {
            deck,
            display_order,
            screen: Screen::ModeSelect,
            settings,
            round_number: 1,
            pregame: Countdown::new(),
            commands_hidden: false,
            explanations_hidden: false,
            board: None,
            practice: None,
            timed: None,
            drag_drop: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) {
        self.settings.apply(update);
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Replace the deck wholesale (load or import). Resets the display
    /// order; an in-flight board keeps its own snapshot and is unaffected
    /// until the next deal.
    pub fn replace_deck(&mut self, deck: Deck) {
        self.display_order = (0..deck.len()).collect();
        self.deck = deck;
    }

    /// The active card set, in display order. This is the single accessor
    /// both the pre-game screen and `start`/`deal` go through.
    pub fn display_cards(&self) -> Vec<&Card> {
        self.display_order
            .iter()
            .filter_map(|&i| self.deck.cards().get(i))
            .collect()
    }

    /// Re-shuffle the pre-game display order. Independent of the in-round
    /// board shuffle.
    pub fn scramble_display(&mut self, rng: &mut impl Rng) {
        fisher_yates(&mut self.display_order, rng);
    }

    pub fn commands_hidden(&self) -> bool {
        self.commands_hidden
    }

    pub fn explanations_hidden(&self) -> bool {
        self.explanations_hidden
    }

    pub fn toggle_commands_hidden(&mut self) {
        self.commands_hidden = !self.commands_hidden;
    }

    pub fn toggle_explanations_hidden(&mut self) {
        self.explanations_hidden = !self.explanations_hidden;
    }

    /// Switch screens. Leaving the current screen stops its timers and
    /// drops its mode state; entering a mode screen initializes a fresh one.
    /// Entering `Concentration` always deals a new board.
    pub fn enter(&mut self, screen: Screen, rng: &mut impl Rng) -> Result<()> {
        // Refuse up-front so a failed transition leaves everything intact.
        if screen == Screen::Concentration && self.deck.is_empty() {
            return Err(GameError::EmptyDeck);
        }

        self.leave_current();
        match screen {
            Screen::Concentration => {
                self.board = Some(self.deal(self.round_number, rng)?);
            }
            Screen::PreGame => {
                if self.settings.auto_advance {
                    self.pregame.start(self.settings.timer_duration);
                }
            }
            Screen::Practice => {
                self.practice = Some(PracticeSession::new(self.deck.len(), rng));
            }
            Screen::Timed => {
                self.timed = Some(TimedSession::new(self.deck.len(), rng));
            }
            Screen::DragDrop => {
                self.drag_drop = Some(DragDropSession::new(&self.deck));
            }
            Screen::ModeSelect | Screen::Listen => {}
        }
        self.screen = screen;
        Ok(())
    }

    fn leave_current(&mut self) {
        match self.screen {
            Screen::PreGame => self.pregame.stop(),
            Screen::Concentration => self.board = None,
            Screen::Practice => self.practice = None,
            Screen::Timed => self.timed = None,
            Screen::DragDrop => self.drag_drop = None,
            Screen::ModeSelect | Screen::Listen => {}
        }
    }

    fn deal(&self, round_number: u32, rng: &mut impl Rng) -> Result<Board> {
        let cards: Vec<Card> = self.display_cards().into_iter().cloned().collect();
        Board::deal(&cards, round_number, rng)
    }

    /// Manual start from the pre-game screen: cancels the auto-start
    /// countdown and deals the round.
    pub fn start_game(&mut self, rng: &mut impl Rng) -> Result<()> {
        self.pregame.stop();
        self.enter(Screen::Concentration, rng)
    }

    /// Cancel the pre-game auto-start countdown. No-op if not running.
    pub fn cancel_pregame(&mut self) {
        self.pregame.stop();
    }

    pub fn pregame_remaining(&self) -> Option<u32> {
        self.pregame.remaining()
    }

    /// Advance the pre-game auto-start countdown by one second. Ignored off
    /// the pre-game screen, so a tick scheduled before a transition cannot
    /// mutate the new screen's state.
    pub fn tick_pregame(&mut self, rng: &mut impl Rng) -> PreGameTick {
        if self.screen != Screen::PreGame {
            return PreGameTick::Idle;
        }
        match self.pregame.tick() {
            CountdownTick::Idle => PreGameTick::Idle,
            CountdownTick::Running(left) => PreGameTick::Counting(left),
            CountdownTick::Finished => match self.enter(Screen::Concentration, rng) {
                Ok(()) => PreGameTick::Started,
                // Empty deck: stay on the pre-game screen, countdown spent.
                Err(_) => PreGameTick::Idle,
            },
        }
    }

    /// Re-deal the current round, keeping its number.
    pub fn restart_round(&mut self, rng: &mut impl Rng) -> Result<()> {
        if self.screen != Screen::Concentration {
            return Err(GameError::NoActiveRound);
        }
        self.board = Some(self.deal(self.round_number, rng)?);
        Ok(())
    }

    /// Advance to the next round and deal it.
    pub fn next_round(&mut self, rng: &mut impl Rng) -> Result<()> {
        if self.screen != Screen::Concentration {
            return Err(GameError::NoActiveRound);
        }
        self.board = Some(self.deal(self.round_number + 1, rng)?);
        self.round_number += 1;
        Ok(())
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Flip a board position. Rejected when no round is active.
    pub fn flip(&mut self, position: usize) -> FlipResult {
        match self.board.as_mut() {
            Some(board) => board.flip(position),
            None => FlipResult::Rejected(FlipRejection::RoundInactive),
        }
    }

    /// Resolve the pending pair after its delay.
    pub fn resolve_flips(&mut self) -> Option<Resolution> {
        self.board.as_mut()?.resolve()
    }

    pub fn practice(&self) -> Option<&PracticeSession> {
        self.practice.as_ref()
    }

    /// The card the practice session is presenting.
    pub fn practice_card(&self) -> Option<&Card> {
        let index = self.practice.as_ref()?.current_index()?;
        self.deck.cards().get(index)
    }

    /// Grade a typed answer against the current practice card.
    pub fn grade_practice(&mut self, answer: &str) -> Option<PracticeGrade> {
        if self.screen != Screen::Practice {
            return None;
        }
        let practice = self.practice.as_mut()?;
        let index = practice.current_index()?;
        let expected = self.deck.cards().get(index)?.command.clone();
        Some(practice.grade(&expected, answer))
    }

    pub fn advance_practice(&mut self) {
        if let Some(practice) = self.practice.as_mut() {
            practice.advance();
        }
    }

    pub fn skip_practice(&mut self) {
        if let Some(practice) = self.practice.as_mut() {
            practice.skip();
        }
    }

    pub fn timed(&self) -> Option<&TimedSession> {
        self.timed.as_ref()
    }

    /// The card the timed session has on the clock.
    pub fn timed_card(&self) -> Option<&Card> {
        let index = self.timed.as_ref()?.current_index()?;
        self.deck.cards().get(index)
    }

    /// Advance the timed mode's per-card clock. Ignored off the timed
    /// screen.
    pub fn tick_timed(&mut self) -> TimedTick {
        if self.screen != Screen::Timed {
            return TimedTick::Idle;
        }
        match self.timed.as_mut() {
            Some(timed) => timed.tick(),
            None => TimedTick::Idle,
        }
    }

    pub fn timed_thumbs_up(&mut self) -> TimedAnswer {
        match self.timed.as_mut() {
            Some(timed) => timed.thumbs_up(),
            None => TimedAnswer::Rejected,
        }
    }

    pub fn timed_thumbs_down(&mut self) -> TimedAnswer {
        match self.timed.as_mut() {
            Some(timed) => timed.thumbs_down(),
            None => TimedAnswer::Rejected,
        }
    }

    pub fn drag_drop(&self) -> Option<&DragDropSession> {
        self.drag_drop.as_ref()
    }

    pub fn drop_item(&mut self, dragged_id: &str, zone_id: &str) -> DropOutcome {
        match self.drag_drop.as_mut() {
            Some(session) => session.drop_item(dragged_id, zone_id),
            None => DropOutcome::UnknownItem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STARTING_SCORE;
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

    fn deck(n: usize) -> Deck {
        Deck::new(
            (0..n)
                .map(|i| card(&format!("c{i}"), &format!("CMD{i}")))
                .collect(),
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn starts_on_mode_select() {
        let session = GameSession::new(deck(3), GameSettings::default());
        assert_eq!(session.screen(), Screen::ModeSelect);
        assert!(session.board().is_none());
    }

    #[test]
    fn entering_concentration_deals_a_fresh_board() {
        let mut session = GameSession::new(deck(3), GameSettings::default());
        session.enter(Screen::Concentration, &mut rng()).unwrap();
        let board = session.board().unwrap();
        assert_eq!(board.cards().len(), 6);
        assert_eq!(board.state().score, STARTING_SCORE);
        assert_eq!(board.state().round_number, 1);
    }

    #[test]
    fn entering_concentration_with_empty_deck_fails_atomically() {
        let mut session = GameSession::new(deck(0), GameSettings::default());
        session.enter(Screen::Listen, &mut rng()).unwrap();
        assert_eq!(
            session.enter(Screen::Concentration, &mut rng()),
            Err(GameError::EmptyDeck)
        );
        assert_eq!(session.screen(), Screen::Listen);
    }

    #[test]
    fn leaving_pregame_cancels_the_auto_start_countdown() {
        let settings = GameSettings {
            auto_advance: true,
            timer_duration: 10,
            ..Default::default()
        };
        let mut session = GameSession::new(deck(2), settings);
        session.enter(Screen::PreGame, &mut rng()).unwrap();
        assert_eq!(session.pregame_remaining(), Some(10));

        session.enter(Screen::Listen, &mut rng()).unwrap();
        assert_eq!(session.pregame_remaining(), None);
        // A straggler tick is ignored off-screen.
        assert_eq!(session.tick_pregame(&mut rng()), PreGameTick::Idle);
    }

    #[test]
    fn pregame_countdown_auto_starts_the_round() {
        let settings = GameSettings {
            auto_advance: true,
            timer_duration: 2,
            ..Default::default()
        };
        let mut session = GameSession::new(deck(2), settings);
        session.enter(Screen::PreGame, &mut rng()).unwrap();

        assert_eq!(session.tick_pregame(&mut rng()), PreGameTick::Counting(1));
        assert_eq!(session.tick_pregame(&mut rng()), PreGameTick::Started);
        assert_eq!(session.screen(), Screen::Concentration);
        assert!(session.board().is_some());
    }

    #[test]
    fn manual_start_cancels_the_countdown() {
        let settings = GameSettings {
            auto_advance: true,
            timer_duration: 30,
            ..Default::default()
        };
        let mut session = GameSession::new(deck(2), settings);
        session.enter(Screen::PreGame, &mut rng()).unwrap();
        session.start_game(&mut rng()).unwrap();
        assert_eq!(session.screen(), Screen::Concentration);
        assert_eq!(session.pregame_remaining(), None);
    }

    #[test]
    fn pregame_without_auto_advance_runs_no_countdown() {
        let mut session = GameSession::new(deck(2), GameSettings::default());
        session.enter(Screen::PreGame, &mut rng()).unwrap();
        assert_eq!(session.pregame_remaining(), None);
        assert_eq!(session.tick_pregame(&mut rng()), PreGameTick::Idle);
    }

    #[test]
    fn restart_keeps_the_round_number_next_increments() {
        let mut session = GameSession::new(deck(2), GameSettings::default());
        session.enter(Screen::Concentration, &mut rng()).unwrap();

        session.restart_round(&mut rng()).unwrap();
        assert_eq!(session.round_number(), 1);
        assert_eq!(session.board().unwrap().state().round_number, 1);

        session.next_round(&mut rng()).unwrap();
        assert_eq!(session.round_number(), 2);
        assert_eq!(session.board().unwrap().state().round_number, 2);
    }

    #[test]
    fn round_controls_require_an_active_round() {
        let mut session = GameSession::new(deck(2), GameSettings::default());
        assert_eq!(
            session.restart_round(&mut rng()),
            Err(GameError::NoActiveRound)
        );
        assert_eq!(session.next_round(&mut rng()), Err(GameError::NoActiveRound));
    }

    #[test]
    fn scramble_reorders_the_display_not_the_deck() {
        let mut session = GameSession::new(deck(8), GameSettings::default());
        let before: Vec<String> = session
            .display_cards()
            .iter()
            .map(|c| c.id.clone())
            .collect();

        let mut rng = rng();
        let mut after = before.clone();
        // An 8-element shuffle landing on the identity is possible, just
        // vanishingly unlikely to repeat.
        for _ in 0..10 {
            session.scramble_display(&mut rng);
            after = session
                .display_cards()
                .iter()
                .map(|c| c.id.clone())
                .collect();
            if after != before {
                break;
            }
        }

        let mut sorted = after.clone();
        sorted.sort();
        let mut expected = before.clone();
        expected.sort();
        assert_eq!(sorted, expected, "same cards, different order");
        assert_ne!(before, after);
        // Underlying deck untouched.
        assert_eq!(session.deck().cards()[0].id, "c0");
    }

    #[test]
    fn board_snapshot_survives_deck_replacement() {
        let mut session = GameSession::new(deck(2), GameSettings::default());
        session.enter(Screen::Concentration, &mut rng()).unwrap();
        session.replace_deck(deck(5));

        // The in-flight round still judges completion against its own
        // two-pair snapshot.
        assert_eq!(session.board().unwrap().pair_count(), 2);
        assert_eq!(session.display_cards().len(), 5);
    }

    #[test]
    fn flip_without_a_round_is_rejected() {
        let mut session = GameSession::new(deck(2), GameSettings::default());
        assert_eq!(
            session.flip(0),
            FlipResult::Rejected(FlipRejection::RoundInactive)
        );
        assert_eq!(session.resolve_flips(), None);
    }

    #[test]
    fn mode_state_is_dropped_on_leave() {
        let mut session = GameSession::new(deck(3), GameSettings::default());
        session.enter(Screen::Practice, &mut rng()).unwrap();
        assert!(session.practice().is_some());

        session.enter(Screen::Timed, &mut rng()).unwrap();
        assert!(session.practice().is_none());
        assert!(session.timed().is_some());

        session.enter(Screen::ModeSelect, &mut rng()).unwrap();
        assert!(session.timed().is_none());
        // Timed ticks can no longer reach a session.
        assert_eq!(session.tick_timed(), TimedTick::Idle);
    }

    #[test]
    fn practice_grading_goes_through_the_session() {
        let mut session = GameSession::new(deck(2), GameSettings::default());
        session.enter(Screen::Practice, &mut rng()).unwrap();

        let command = session.practice_card().unwrap().command.clone();
        let grade = session.grade_practice(&command.to_lowercase()).unwrap();
        assert!(matches!(grade, PracticeGrade::Correct { .. }));

        // Grading off the practice screen is refused.
        session.enter(Screen::Listen, &mut rng()).unwrap();
        assert_eq!(session.grade_practice("SELECT"), None);
    }

    #[test]
    fn drag_drop_goes_through_the_session() {
        let mut session = GameSession::new(deck(2), GameSettings::default());
        assert_eq!(session.drop_item("c0", "c0"), DropOutcome::UnknownItem);

        session.enter(Screen::DragDrop, &mut rng()).unwrap();
        assert_eq!(
            session.drop_item("c0", "c0"),
            DropOutcome::Placed { complete: false }
        );
    }
}

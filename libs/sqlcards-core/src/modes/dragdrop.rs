//! Drag-and-drop mode: attempt counting over id-equality drops.

use std::collections::HashSet;

use crate::types::Deck;

/// Outcome of dropping a dragged item onto a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The dragged id is not part of this session; not counted.
    UnknownItem,
    /// The item was already placed; its source is disabled, not counted.
    AlreadyPlaced,
    /// Ids matched; the item is now permanently placed.
    Placed { complete: bool },
    /// Ids differed; counted as an attempt, nothing placed.
    Wrong,
}

/// One drag-and-drop run. No timers, no ordering: just attempts and placements.
#[derive(Debug, Clone)]
pub struct DragDropSession {
    ids: HashSet<String>,
    placed: HashSet<String>,
    attempts: u32,
}

impl DragDropSession {
    pub fn new(deck: &Deck) -> Self {
        Self {
            ids: deck.cards().iter().map(|c| c.id.clone()).collect(),
            placed: HashSet::new(),
            attempts: 0,
        }
    }

    /// Validate a drop: the dragged identifier must equal the zone's.
    /// Every counted attempt, matching or not, increments the counter.
    pub fn drop_item(&mut self, dragged_id: &str, zone_id: &str) -> DropOutcome {
        if !self.ids.contains(dragged_id) {
            return DropOutcome::UnknownItem;
        }
        if self.placed.contains(dragged_id) {
            return DropOutcome::AlreadyPlaced;
        }

        self.attempts += 1;
        if dragged_id == zone_id {
            self.placed.insert(dragged_id.to_string());
            DropOutcome::Placed {
                complete: self.placed.len() == self.ids.len(),
            }
        } else {
            DropOutcome::Wrong
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    pub fn item_count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_placed(&self, id: &str) -> bool {
        self.placed.contains(id)
    }

    pub fn is_complete(&self) -> bool {
        self.placed.len() == self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Card;
    use pretty_assertions::assert_eq;

    fn deck() -> Deck {
        let card = |id: &str, command: &str| Card {
            id: id.to_string(),
            command: command.to_string(),
            description: String::new(),
            syntax: None,
            example: None,
            explanation: None,
            category: None,
        };
        Deck::new(vec![card("A", "SELECT"), card("B", "INSERT")])
    }

    #[test]
    fn matching_drop_places_and_counts() {
        let mut session = DragDropSession::new(&deck());
        assert_eq!(
            session.drop_item("A", "A"),
            DropOutcome::Placed { complete: false }
        );
        assert_eq!(session.attempts(), 1);
        assert!(session.is_placed("A"));
    }

    #[test]
    fn wrong_drop_counts_but_places_nothing() {
        let mut session = DragDropSession::new(&deck());
        assert_eq!(session.drop_item("A", "B"), DropOutcome::Wrong);
        assert_eq!(session.attempts(), 1);
        assert_eq!(session.placed_count(), 0);
    }

    #[test]
    fn placed_items_are_permanently_disabled() {
        let mut session = DragDropSession::new(&deck());
        session.drop_item("A", "A");
        assert_eq!(session.drop_item("A", "A"), DropOutcome::AlreadyPlaced);
        assert_eq!(session.drop_item("A", "B"), DropOutcome::AlreadyPlaced);
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn completion_when_every_item_is_placed() {
        let mut session = DragDropSession::new(&deck());
        session.drop_item("A", "A");
        assert_eq!(
            session.drop_item("B", "B"),
            DropOutcome::Placed { complete: true }
        );
        assert!(session.is_complete());
    }

    #[test]
    fn unknown_ids_are_rejected_without_counting() {
        let mut session = DragDropSession::new(&deck());
        assert_eq!(session.drop_item("Z", "Z"), DropOutcome::UnknownItem);
        assert_eq!(session.attempts(), 0);
    }
}

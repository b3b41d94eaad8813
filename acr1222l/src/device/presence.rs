// acr1222l-rs/acr1222l/src/device/presence.rs

use crate::types::{CardPresence, ReaderState};

/// Edge-triggered card presence derived from successive hardware state
/// bitmasks. Only a watched bit that flips (and is set afterwards) moves
/// the state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresenceTracker {
    presence: CardPresence,
    last: ReaderState,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presence(&self) -> CardPresence {
        self.presence
    }

    pub fn is_present(&self) -> bool {
        self.presence == CardPresence::Present
    }

    pub fn last_state(&self) -> ReaderState {
        self.last
    }

    /// Feed the next bitmask. Returns the new presence when a transition
    /// happened.
    ///
    /// Removal needs a previously known state: the first EMPTY report after
    /// start-up only records the baseline.
    pub fn observe(&mut self, next: ReaderState) -> Option<CardPresence> {
        let prev = self.last;
        let changes = prev.changes(next);
        self.last = next;

        if !prev.is_empty()
            && changes.contains(ReaderState::EMPTY)
            && next.contains(ReaderState::EMPTY)
        {
            return self.transition(CardPresence::Absent);
        }
        if changes.contains(ReaderState::PRESENT) && next.contains(ReaderState::PRESENT) {
            return self.transition(CardPresence::Present);
        }
        None
    }

    /// Forget everything (reader gone)
    pub fn reset(&mut self) -> Option<CardPresence> {
        let was = self.presence;
        *self = Self::default();
        (was == CardPresence::Present).then_some(CardPresence::Absent)
    }

    fn transition(&mut self, to: CardPresence) -> Option<CardPresence> {
        if self.presence == to {
            return None;
        }
        self.presence = to;
        Some(to)
    }
}

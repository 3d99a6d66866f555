//! Per-player state: the five zones, lore, per-turn flags.

use serde::{Deserialize, Serialize};

use crate::core::{InstanceId, Zone};

/// One player's side of the game.
///
/// The zone lists hold instance ids in order: for the deck, the last
/// element is the top; for other zones order is presentational.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    deck: Vec<InstanceId>,
    hand: Vec<InstanceId>,
    discard: Vec<InstanceId>,
    inkwell: Vec<InstanceId>,
    play: Vec<InstanceId>,

    /// Lore score. Reaching the game's lore goal wins.
    pub lore: i64,

    /// Has this player inked a card this turn?
    pub inked_this_turn: bool,

    /// Eliminated players take no further part in the game.
    pub eliminated: bool,
}

impl PlayerState {
    /// Create an empty player state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cards in a zone, in order.
    #[must_use]
    pub fn zone(&self, zone: Zone) -> &[InstanceId] {
        match zone {
            Zone::Deck => &self.deck,
            Zone::Hand => &self.hand,
            Zone::Discard => &self.discard,
            Zone::Inkwell => &self.inkwell,
            Zone::Play => &self.play,
        }
    }

    pub(crate) fn zone_mut(&mut self, zone: Zone) -> &mut Vec<InstanceId> {
        match zone {
            Zone::Deck => &mut self.deck,
            Zone::Hand => &mut self.hand,
            Zone::Discard => &mut self.discard,
            Zone::Inkwell => &mut self.inkwell,
            Zone::Play => &mut self.play,
        }
    }

    /// Append a card to a zone.
    pub fn push_to(&mut self, zone: Zone, id: InstanceId) {
        self.zone_mut(zone).push(id);
    }

    /// Remove a card from a zone. Returns whether it was present.
    pub fn remove_from(&mut self, zone: Zone, id: InstanceId) -> bool {
        let list = self.zone_mut(zone);
        if let Some(pos) = list.iter().position(|&c| c == id) {
            list.remove(pos);
            true
        } else {
            false
        }
    }

    /// Is the card in the given zone list?
    #[must_use]
    pub fn contains(&self, zone: Zone, id: InstanceId) -> bool {
        self.zone(zone).contains(&id)
    }

    /// Number of cards in a zone.
    #[must_use]
    pub fn zone_size(&self, zone: Zone) -> usize {
        self.zone(zone).len()
    }

    /// Remove and return the top card of the deck.
    pub fn pop_deck(&mut self) -> Option<InstanceId> {
        self.deck.pop()
    }

    /// Reset flags that only last one turn.
    pub fn reset_turn_flags(&mut self) {
        self.inked_this_turn = false;
    }
}

//! Turn-scoped history of zone changes.
//!
//! Effects sometimes key off what happened earlier in the same turn
//! ("if a character was banished this turn", "for each card you put under
//! this one today"). The history records every zone change and tuck for
//! the current turn and is cleared when the next turn starts.
//!
//! Backed by `im::Vector` so snapshots of the game state share structure
//! cheaply.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{InstanceId, Zone};

/// One zone change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneChange {
    /// Turn the move happened on.
    pub turn: u32,
    /// The card that moved.
    pub card: InstanceId,
    /// Where it came from. `None` for the initial deal.
    pub from: Option<Zone>,
    /// Where it went.
    pub to: Zone,
}

/// One placed-under record (shift stacks).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuckRecord {
    /// Turn the tuck happened on.
    pub turn: u32,
    /// The card now on top.
    pub host: InstanceId,
    /// The card placed underneath.
    pub card: InstanceId,
}

/// Turn-scoped zone-change log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnHistory {
    moves: Vector<ZoneChange>,
    tucks: Vector<TuckRecord>,
}

impl TurnHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a zone change.
    pub fn record_move(&mut self, turn: u32, card: InstanceId, from: Option<Zone>, to: Zone) {
        self.moves.push_back(ZoneChange { turn, card, from, to });
    }

    /// Record a card being placed under another.
    pub fn record_tuck(&mut self, turn: u32, host: InstanceId, card: InstanceId) {
        self.tucks.push_back(TuckRecord { turn, host, card });
    }

    /// Clear at turn start.
    pub fn clear(&mut self) {
        self.moves.clear();
        self.tucks.clear();
    }

    /// Iterate recorded moves.
    pub fn moves(&self) -> impl Iterator<Item = &ZoneChange> {
        self.moves.iter()
    }

    /// Iterate recorded tucks.
    pub fn tucks(&self) -> impl Iterator<Item = &TuckRecord> {
        self.tucks.iter()
    }

    /// How many cards moved into `zone` this turn.
    #[must_use]
    pub fn moved_into(&self, zone: Zone) -> usize {
        self.moves.iter().filter(|m| m.to == zone).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_query() {
        let mut history = TurnHistory::new();

        history.record_move(1, InstanceId::new(5), Some(Zone::Deck), Zone::Hand);
        history.record_move(1, InstanceId::new(6), Some(Zone::Play), Zone::Discard);
        history.record_move(1, InstanceId::new(7), Some(Zone::Hand), Zone::Discard);

        assert_eq!(history.moves().count(), 3);
        assert_eq!(history.moved_into(Zone::Discard), 2);
        assert_eq!(history.moved_into(Zone::Inkwell), 0);
    }

    #[test]
    fn test_clear() {
        let mut history = TurnHistory::new();
        history.record_move(1, InstanceId::new(5), None, Zone::Deck);
        history.record_tuck(1, InstanceId::new(1), InstanceId::new(2));

        history.clear();

        assert_eq!(history.moves().count(), 0);
        assert_eq!(history.tucks().count(), 0);
    }

    #[test]
    fn test_snapshot_sharing() {
        let mut history = TurnHistory::new();
        history.record_move(1, InstanceId::new(5), None, Zone::Deck);

        let snapshot = history.clone();
        history.record_move(1, InstanceId::new(6), None, Zone::Deck);

        assert_eq!(snapshot.moves().count(), 1);
        assert_eq!(history.moves().count(), 2);
    }
}

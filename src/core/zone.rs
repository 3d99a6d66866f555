//! The five game zones.
//!
//! Unlike a configurable-zone engine, the zone set here is fixed by the
//! rules: deck, hand, discard, inkwell, play. A card occupies exactly one
//! zone at a time; the zone field on the instance and the per-player zone
//! lists are kept in sync by `GameState::move_card`.

use serde::{Deserialize, Serialize};

/// One of the five zones a card can occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Face-down, ordered; the top is drawn from.
    Deck,
    /// Visible to the owner only.
    Hand,
    /// Face-up, public.
    Discard,
    /// Face-down resources; ready cards here pay ink costs.
    Inkwell,
    /// The battlefield: characters, items, locations.
    Play,
}

impl Zone {
    /// All zones, in canonical order.
    pub const ALL: [Zone; 5] = [
        Zone::Deck,
        Zone::Hand,
        Zone::Discard,
        Zone::Inkwell,
        Zone::Play,
    ];

    /// Whether cards in this zone are public knowledge.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Zone::Discard | Zone::Play)
    }

    /// Whether card order matters in this zone.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self, Zone::Deck | Zone::Discard)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Zone::Deck => "deck",
            Zone::Hand => "hand",
            Zone::Discard => "discard",
            Zone::Inkwell => "inkwell",
            Zone::Play => "play",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_visibility() {
        assert!(Zone::Play.is_public());
        assert!(Zone::Discard.is_public());
        assert!(!Zone::Hand.is_public());
        assert!(!Zone::Deck.is_public());
        assert!(!Zone::Inkwell.is_public());
    }

    #[test]
    fn test_zone_order() {
        assert!(Zone::Deck.is_ordered());
        assert!(!Zone::Play.is_ordered());
    }

    #[test]
    fn test_zone_display() {
        assert_eq!(format!("{}", Zone::Inkwell), "inkwell");
    }

    #[test]
    fn test_zone_all_distinct() {
        for (i, a) in Zone::ALL.iter().enumerate() {
            for b in &Zone::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

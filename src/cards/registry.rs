//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition a game may use and
//! provides lookup by `CardId`. Decks reference definitions by id; the
//! registry is the single source of printed stats during overlay resets.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use glimmer_engine::cards::{CardDefinition, CardId, CardKind, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(
///     CardDefinition::new(CardId::new(1), "Wandering Bard", CardKind::Character)
///         .with_cost(2)
///         .with_stats(1, 3, 1),
/// );
///
/// assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Wandering Bard");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check whether a definition is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate all definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();

        registry.register(CardDefinition::new(
            CardId::new(1),
            "Test Card",
            CardKind::Action,
        ));

        assert!(registry.contains(CardId::new(1)));
        assert!(registry.get(CardId::new(2)).is_none());
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_registration_panics() {
        let mut registry = CardRegistry::new();

        registry.register(CardDefinition::new(CardId::new(1), "A", CardKind::Item));
        registry.register(CardDefinition::new(CardId::new(1), "B", CardKind::Item));
    }
}

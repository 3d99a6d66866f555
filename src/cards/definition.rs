//! Card definitions - static printed data.
//!
//! `CardDefinition` holds the unchanging properties of a card: cost,
//! stats, subtypes, keywords, and the structured ability trees produced
//! by the external text compiler. The raw printed text is retained for
//! diagnostics only; the engine never parses it.
//!
//! Instance-specific data (damage, zone, working stats) is stored
//! separately in `CardInstance`.

use serde::{Deserialize, Serialize};

use super::keywords::Keywords;
use crate::abilities::AbilityDefinition;

/// Unique identifier for a card definition.
///
/// This identifies the "printing" of a card, not a specific copy in a
/// game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// The kind of card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    /// Stays in play; quests, challenges, sings.
    Character,
    /// Resolves its effects, then goes to the discard.
    Action,
    /// An action that characters can sing instead of paying ink.
    Song,
    /// Stays in play; usually carries activated abilities.
    Item,
    /// Stays in play; grants its lore to its controller each Set step.
    Location,
}

impl CardKind {
    /// Whether a card of this kind remains in play after being played.
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        matches!(self, CardKind::Character | CardKind::Item | CardKind::Location)
    }
}

/// Static card definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this definition.
    pub id: CardId,

    /// Card name. Shift matches on this.
    pub name: String,

    /// What kind of card this is.
    pub kind: CardKind,

    /// Ink cost to play.
    pub cost: i64,

    /// May be placed in the inkwell as a resource.
    pub inkable: bool,

    /// Printed strength (0 for non-characters).
    pub strength: i64,

    /// Printed willpower (0 for non-characters).
    pub willpower: i64,

    /// Printed lore: quest value for characters, per-turn grant for
    /// locations.
    pub lore: i64,

    /// Subtypes ("Hero", "Princess", "Storyborn", ...).
    pub subtypes: Vec<String>,

    /// Printed keywords.
    pub keywords: Keywords,

    /// Structured abilities from the text compiler.
    pub abilities: Vec<AbilityDefinition>,

    /// Raw printed text, kept for diagnostics only.
    pub text: String,
}

impl CardDefinition {
    /// Create a new card definition.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, kind: CardKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            cost: 0,
            inkable: false,
            strength: 0,
            willpower: 0,
            lore: 0,
            subtypes: Vec::new(),
            keywords: Keywords::default(),
            abilities: Vec::new(),
            text: String::new(),
        }
    }

    /// Set the ink cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: i64) -> Self {
        self.cost = cost;
        self
    }

    /// Mark the card inkable (builder pattern).
    #[must_use]
    pub fn inkable(mut self) -> Self {
        self.inkable = true;
        self
    }

    /// Set strength/willpower/lore (builder pattern).
    #[must_use]
    pub fn with_stats(mut self, strength: i64, willpower: i64, lore: i64) -> Self {
        self.strength = strength;
        self.willpower = willpower;
        self.lore = lore;
        self
    }

    /// Add a subtype (builder pattern).
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtypes.push(subtype.into());
        self
    }

    /// Set the printed keywords (builder pattern).
    #[must_use]
    pub fn with_keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Add an ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: AbilityDefinition) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Set the diagnostic text (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Check for a subtype.
    #[must_use]
    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtypes.iter().any(|s| s == subtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(5);
        assert_eq!(id.raw(), 5);
        assert_eq!(format!("{}", id), "Card(5)");
    }

    #[test]
    fn test_definition_builder() {
        let def = CardDefinition::new(CardId::new(1), "Brave Knight", CardKind::Character)
            .with_cost(3)
            .inkable()
            .with_stats(2, 4, 1)
            .with_subtype("Hero")
            .with_keywords(Keywords::default().bodyguard());

        assert_eq!(def.name, "Brave Knight");
        assert_eq!(def.cost, 3);
        assert!(def.inkable);
        assert_eq!(def.strength, 2);
        assert_eq!(def.willpower, 4);
        assert_eq!(def.lore, 1);
        assert!(def.has_subtype("Hero"));
        assert!(!def.has_subtype("Villain"));
        assert!(def.keywords.bodyguard);
    }

    #[test]
    fn test_permanence() {
        assert!(CardKind::Character.is_permanent());
        assert!(CardKind::Item.is_permanent());
        assert!(CardKind::Location.is_permanent());
        assert!(!CardKind::Action.is_permanent());
        assert!(!CardKind::Song.is_permanent());
    }

    #[test]
    fn test_definition_serialization() {
        let def = CardDefinition::new(CardId::new(2), "Old Map", CardKind::Item)
            .with_cost(1)
            .inkable();

        let json = serde_json::to_string(&def).unwrap();
        let deserialized: CardDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.name, "Old Map");
        assert_eq!(deserialized.cost, 1);
    }
}

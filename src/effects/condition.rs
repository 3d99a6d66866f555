//! Conditions for conditional effect nodes.

use serde::{Deserialize, Serialize};

use crate::cards::CardRegistry;
use crate::core::{InstanceId, PlayerId, Zone};
use crate::state::GameState;

use super::node::Stat;
use super::target::CardFilter;

/// A predicate evaluated before a conditional branch recurses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// The acting player's hand is empty.
    SelfHandEmpty,
    /// It is the acting player's turn.
    OwnTurn,
    /// The effect's source card has at least this much working stat.
    SourceStatAtLeast { stat: Stat, amount: i64 },
    /// At least `count` cards match the filter, from the acting
    /// player's point of view.
    CardsMatching { filter: CardFilter, count: usize },
    /// All conditions hold.
    All(Vec<Condition>),
    /// At least one condition holds.
    Any(Vec<Condition>),
    /// The condition does not hold.
    Not(Box<Condition>),
}

impl Condition {
    /// At least one matching card exists.
    #[must_use]
    pub fn exists(filter: CardFilter) -> Self {
        Self::CardsMatching { filter, count: 1 }
    }

    /// A subtype is present among the acting player's cards in play.
    #[must_use]
    pub fn subtype_in_play(subtype: impl Into<String>) -> Self {
        Self::exists(CardFilter::characters().mine().with_subtype(subtype))
    }

    /// Evaluate against the current state.
    #[must_use]
    pub fn evaluate(
        &self,
        state: &GameState,
        registry: &CardRegistry,
        acting: PlayerId,
        source: Option<InstanceId>,
    ) -> bool {
        match self {
            Condition::SelfHandEmpty => state.player(acting).zone_size(Zone::Hand) == 0,

            Condition::OwnTurn => state.active_player == acting,

            Condition::SourceStatAtLeast { stat, amount } => source
                .and_then(|id| state.card(id))
                .is_some_and(|card| {
                    let value = match stat {
                        Stat::Strength => card.strength,
                        Stat::Willpower => card.willpower,
                        Stat::Lore => card.lore,
                    };
                    value >= *amount
                }),

            Condition::CardsMatching { filter, count } => {
                filter.collect(state, registry, acting).len() >= *count
            }

            Condition::All(conditions) => conditions
                .iter()
                .all(|c| c.evaluate(state, registry, acting, source)),

            Condition::Any(conditions) => conditions
                .iter()
                .any(|c| c.evaluate(state, registry, acting, source)),

            Condition::Not(inner) => !inner.evaluate(state, registry, acting, source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId, CardKind};

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    fn setup() -> (GameState, CardRegistry) {
        let mut registry = CardRegistry::new();
        registry.register(
            CardDefinition::new(CardId::new(1), "Scout", CardKind::Character)
                .with_stats(2, 1, 1)
                .with_subtype("Ally"),
        );
        (GameState::new(2, 3), registry)
    }

    #[test]
    fn test_hand_empty() {
        let (mut state, registry) = setup();
        assert!(Condition::SelfHandEmpty.evaluate(&state, &registry, P0, None));

        state.spawn_card(CardId::new(1), P0, Zone::Hand);
        assert!(!Condition::SelfHandEmpty.evaluate(&state, &registry, P0, None));
    }

    #[test]
    fn test_own_turn() {
        let (state, registry) = setup();
        assert!(Condition::OwnTurn.evaluate(&state, &registry, P0, None));
        assert!(!Condition::OwnTurn.evaluate(&state, &registry, P1, None));
    }

    #[test]
    fn test_source_stat() {
        let (mut state, registry) = setup();
        let scout = state.spawn_card(CardId::new(1), P0, Zone::Play);
        state.card_mut(scout).unwrap().strength = 2;

        let cond = Condition::SourceStatAtLeast {
            stat: Stat::Strength,
            amount: 2,
        };
        assert!(cond.evaluate(&state, &registry, P0, Some(scout)));

        let harder = Condition::SourceStatAtLeast {
            stat: Stat::Strength,
            amount: 3,
        };
        assert!(!harder.evaluate(&state, &registry, P0, Some(scout)));
        assert!(!harder.evaluate(&state, &registry, P0, None));
    }

    #[test]
    fn test_subtype_presence_and_combinators() {
        let (mut state, registry) = setup();
        state.spawn_card(CardId::new(1), P0, Zone::Play);

        let ally = Condition::subtype_in_play("Ally");
        let villain = Condition::subtype_in_play("Villain");

        assert!(ally.evaluate(&state, &registry, P0, None));
        assert!(!villain.evaluate(&state, &registry, P0, None));
        assert!(!ally.evaluate(&state, &registry, P1, None));

        assert!(Condition::All(vec![ally.clone(), Condition::OwnTurn])
            .evaluate(&state, &registry, P0, None));
        assert!(Condition::Any(vec![villain.clone(), ally.clone()])
            .evaluate(&state, &registry, P0, None));
        assert!(Condition::Not(Box::new(villain)).evaluate(&state, &registry, P0, None));
    }
}

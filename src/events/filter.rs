//! Structural filters on trigger subscriptions.
//!
//! A triggered ability fires for an event kind *and* a structural match:
//! whose card it was, what subtype, which zone, how big. The filter is
//! evaluated from the subscriber's point of view, so one definition works
//! for every copy of a card.

use serde::{Deserialize, Serialize};

use crate::cards::CardRegistry;
use crate::core::{InstanceId, PlayerId, Zone};
use crate::state::GameState;

use super::event::GameEvent;

/// Context for evaluating an event filter.
pub struct FilterContext<'a> {
    /// The event being tested.
    pub event: &'a GameEvent,
    /// Current game state.
    pub state: &'a GameState,
    /// Card definitions.
    pub registry: &'a CardRegistry,
    /// The subscribed card.
    pub subscriber: InstanceId,
    /// The subscribed card's controller.
    pub controller: PlayerId,
}

/// A structural condition on an event, relative to the subscriber.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFilter {
    /// The event's source card is the subscriber itself
    /// ("whenever this character ...").
    SelfSource,
    /// The event's target card is the subscriber itself.
    SelfTarget,
    /// The event concerns the subscriber's controller.
    OwnController,
    /// The event concerns any other player.
    OpponentController,
    /// The event's source card belongs to the subscriber's controller.
    SourceOwn,
    /// The event's source card belongs to an opponent.
    SourceOpposing,
    /// The event's source card has a subtype.
    SourceHasSubtype(String),
    /// The event's source card is in a zone.
    SourceInZone(Zone),
    /// The event's source card has at least this much working strength.
    SourceStrengthAtLeast(i64),
    /// The event's magnitude is at least this much.
    AmountAtLeast(i64),
    /// All conditions hold.
    All(Vec<EventFilter>),
    /// At least one condition holds.
    Any(Vec<EventFilter>),
    /// The condition does not hold.
    Not(Box<EventFilter>),
}

impl EventFilter {
    /// Combine with another filter under AND.
    #[must_use]
    pub fn and(self, other: EventFilter) -> Self {
        match self {
            EventFilter::All(mut filters) => {
                filters.push(other);
                EventFilter::All(filters)
            }
            _ => EventFilter::All(vec![self, other]),
        }
    }

    /// Does the filter match?
    #[must_use]
    pub fn matches(&self, ctx: &FilterContext) -> bool {
        match self {
            EventFilter::SelfSource => ctx.event.source == Some(ctx.subscriber),

            EventFilter::SelfTarget => ctx.event.target == Some(ctx.subscriber),

            EventFilter::OwnController => ctx.event.player == Some(ctx.controller),

            EventFilter::OpponentController => ctx
                .event
                .player
                .is_some_and(|p| p != ctx.controller),

            EventFilter::SourceOwn => source_owner(ctx).is_some_and(|o| o == ctx.controller),

            EventFilter::SourceOpposing => {
                source_owner(ctx).is_some_and(|o| o != ctx.controller)
            }

            EventFilter::SourceHasSubtype(subtype) => ctx
                .event
                .source
                .and_then(|id| ctx.state.card(id))
                .and_then(|card| ctx.registry.get(card.card))
                .is_some_and(|def| def.has_subtype(subtype)),

            EventFilter::SourceInZone(zone) => ctx
                .event
                .source
                .and_then(|id| ctx.state.card(id))
                .is_some_and(|card| card.zone == *zone),

            EventFilter::SourceStrengthAtLeast(min) => ctx
                .event
                .source
                .and_then(|id| ctx.state.card(id))
                .is_some_and(|card| card.strength >= *min),

            EventFilter::AmountAtLeast(min) => ctx.event.amount >= *min,

            EventFilter::All(filters) => filters.iter().all(|f| f.matches(ctx)),

            EventFilter::Any(filters) => filters.iter().any(|f| f.matches(ctx)),

            EventFilter::Not(inner) => !inner.matches(ctx),
        }
    }
}

fn source_owner(ctx: &FilterContext) -> Option<PlayerId> {
    ctx.event
        .source
        .and_then(|id| ctx.state.card(id))
        .map(|card| card.owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId, CardKind};
    use crate::events::EventKind;

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    fn setup() -> (GameState, CardRegistry) {
        let mut registry = CardRegistry::new();
        registry.register(
            CardDefinition::new(CardId::new(1), "Pirate", CardKind::Character)
                .with_stats(4, 3, 1)
                .with_subtype("Pirate"),
        );
        (GameState::new(2, 1), registry)
    }

    #[test]
    fn test_self_source() {
        let (mut state, registry) = setup();
        let me = state.spawn_card(CardId::new(1), P0, Zone::Play);
        let other = state.spawn_card(CardId::new(1), P0, Zone::Play);

        let event = GameEvent::for_card(EventKind::CharacterQuested, me, P0);
        let ctx = FilterContext {
            event: &event,
            state: &state,
            registry: &registry,
            subscriber: me,
            controller: P0,
        };
        assert!(EventFilter::SelfSource.matches(&ctx));

        let ctx_other = FilterContext {
            subscriber: other,
            ..ctx
        };
        assert!(!EventFilter::SelfSource.matches(&ctx_other));
    }

    #[test]
    fn test_controller_filters() {
        let (mut state, registry) = setup();
        let me = state.spawn_card(CardId::new(1), P0, Zone::Play);

        let event = GameEvent::for_player(EventKind::TurnStart, P1);
        let ctx = FilterContext {
            event: &event,
            state: &state,
            registry: &registry,
            subscriber: me,
            controller: P0,
        };

        assert!(!EventFilter::OwnController.matches(&ctx));
        assert!(EventFilter::OpponentController.matches(&ctx));
    }

    #[test]
    fn test_source_ownership_and_subtype() {
        let (mut state, registry) = setup();
        let mine = state.spawn_card(CardId::new(1), P0, Zone::Play);
        let theirs = state.spawn_card(CardId::new(1), P1, Zone::Play);

        let event = GameEvent::for_card(EventKind::CardPlayed, theirs, P1);
        let ctx = FilterContext {
            event: &event,
            state: &state,
            registry: &registry,
            subscriber: mine,
            controller: P0,
        };

        assert!(EventFilter::SourceOpposing.matches(&ctx));
        assert!(!EventFilter::SourceOwn.matches(&ctx));
        assert!(EventFilter::SourceHasSubtype("Pirate".to_string()).matches(&ctx));
        assert!(!EventFilter::SourceHasSubtype("Hero".to_string()).matches(&ctx));
        assert!(EventFilter::SourceInZone(Zone::Play).matches(&ctx));
    }

    #[test]
    fn test_amount_and_strength() {
        let (mut state, registry) = setup();
        let me = state.spawn_card(CardId::new(1), P0, Zone::Play);
        state.card_mut(me).unwrap().strength = 4;

        let event = GameEvent::damage(Some(me), me, 3);
        let ctx = FilterContext {
            event: &event,
            state: &state,
            registry: &registry,
            subscriber: me,
            controller: P0,
        };

        assert!(EventFilter::AmountAtLeast(3).matches(&ctx));
        assert!(!EventFilter::AmountAtLeast(4).matches(&ctx));
        assert!(EventFilter::SourceStrengthAtLeast(4).matches(&ctx));
        assert!(!EventFilter::SourceStrengthAtLeast(5).matches(&ctx));
    }

    #[test]
    fn test_combinators() {
        let (mut state, registry) = setup();
        let me = state.spawn_card(CardId::new(1), P0, Zone::Play);

        let event = GameEvent::for_card(EventKind::CardPlayed, me, P0);
        let ctx = FilterContext {
            event: &event,
            state: &state,
            registry: &registry,
            subscriber: me,
            controller: P0,
        };

        let both = EventFilter::SelfSource.and(EventFilter::OwnController);
        assert!(both.matches(&ctx));

        let neither = EventFilter::All(vec![
            EventFilter::SelfSource,
            EventFilter::OpponentController,
        ]);
        assert!(!neither.matches(&ctx));

        assert!(EventFilter::Not(Box::new(EventFilter::OpponentController)).matches(&ctx));
        assert!(EventFilter::Any(vec![
            EventFilter::OpponentController,
            EventFilter::SelfSource,
        ])
        .matches(&ctx));
    }
}

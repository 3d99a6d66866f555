//! The bag: triggered-ability registry and pending queue.
//!
//! Cards subscribe their triggered abilities when they enter play and
//! unsubscribe when they leave. `emit` only *collects*: every matching
//! subscription is snapshotted into the pending queue, and nothing
//! resolves until a checkpoint drains the queue. That one discipline
//! keeps every mutation path free of re-entrant resolution.
//!
//! Drain ordering (the simultaneous-trigger rule) lives in the effect
//! interpreter, which owns the pieces a resolution needs.

use tracing::debug;

use crate::cards::CardDefinition;
use crate::core::{InstanceId, PlayerId};
use crate::effects::node::EffectNode;
use crate::state::GameState;

use super::event::{EventKind, GameEvent};
use super::filter::{EventFilter, FilterContext};

/// One registered triggered ability.
#[derive(Clone, Debug)]
pub struct Subscription {
    /// The card in play carrying the ability.
    pub card: InstanceId,
    /// Its controller (makes the resolve-order and optional choices).
    pub controller: PlayerId,
    /// Ability display name.
    pub name: String,
    /// Event kinds subscribed to.
    pub events: Vec<EventKind>,
    /// Structural filter, if any.
    pub filter: Option<EventFilter>,
    /// Ask the controller before resolving?
    pub optional: bool,
    /// Effects to resolve when fired.
    pub effects: Vec<EffectNode>,
}

/// A collected trigger awaiting resolution.
#[derive(Clone, Debug)]
pub struct PendingTrigger {
    /// The card whose ability fired.
    pub card: InstanceId,
    /// Its controller.
    pub controller: PlayerId,
    /// Ability display name.
    pub name: String,
    /// Ask before resolving?
    pub optional: bool,
    /// Effects to resolve.
    pub effects: Vec<EffectNode>,
    /// The event that fired this trigger.
    pub event: GameEvent,
}

/// Registry of triggered abilities plus the pending queue.
#[derive(Debug, Default)]
pub struct TriggerBag {
    subscriptions: Vec<Subscription>,
    pending: Vec<PendingTrigger>,
}

impl TriggerBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe every triggered ability of a card entering play.
    pub fn subscribe_card(
        &mut self,
        card: InstanceId,
        controller: PlayerId,
        def: &CardDefinition,
    ) {
        for ability in &def.abilities {
            if let Some(triggered) = ability.as_triggered() {
                debug!(card = %card, ability = %triggered.name, "subscribing trigger");
                self.subscriptions.push(Subscription {
                    card,
                    controller,
                    name: triggered.name.clone(),
                    events: triggered.events.to_vec(),
                    filter: triggered.filter.clone(),
                    optional: triggered.optional,
                    effects: triggered.effects.clone(),
                });
            }
        }
    }

    /// Remove every subscription of a card leaving play.
    pub fn unsubscribe_card(&mut self, card: InstanceId) {
        self.subscriptions.retain(|s| s.card != card);
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Collect every matching subscription into the pending queue.
    ///
    /// Never resolves anything; a checkpoint drain does that.
    pub fn emit(
        &mut self,
        state: &GameState,
        registry: &crate::cards::CardRegistry,
        event: GameEvent,
    ) {
        for sub in &self.subscriptions {
            if !sub.events.contains(&event.kind) {
                continue;
            }
            if let Some(filter) = &sub.filter {
                let ctx = FilterContext {
                    event: &event,
                    state,
                    registry,
                    subscriber: sub.card,
                    controller: sub.controller,
                };
                if !filter.matches(&ctx) {
                    continue;
                }
            }
            debug!(
                event = %event.kind,
                card = %sub.card,
                ability = %sub.name,
                "trigger collected"
            );
            self.pending.push(PendingTrigger {
                card: sub.card,
                controller: sub.controller,
                name: sub.name.clone(),
                optional: sub.optional,
                effects: sub.effects.clone(),
                event: event.clone(),
            });
        }
    }

    /// Number of pending triggers.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Is the queue empty?
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }

    /// Does a player have pending triggers?
    #[must_use]
    pub fn has_pending_for(&self, player: PlayerId) -> bool {
        self.pending.iter().any(|t| t.controller == player)
    }

    /// Names of a player's pending triggers, in queue order.
    #[must_use]
    pub fn pending_names_for(&self, player: PlayerId) -> Vec<String> {
        self.pending
            .iter()
            .filter(|t| t.controller == player)
            .map(|t| t.name.clone())
            .collect()
    }

    /// Remove the nth pending trigger (in queue order) of a player.
    pub fn remove_pending_for(
        &mut self,
        player: PlayerId,
        nth: usize,
    ) -> Option<PendingTrigger> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.controller == player)
            .map(|(i, _)| i)
            .nth(nth)?;
        Some(self.pending.remove(index))
    }

    /// Drop everything pending (game over).
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{AbilityDefinition, TriggeredAbility};
    use crate::cards::{CardDefinition, CardId, CardKind, CardRegistry};
    use crate::core::Zone;
    use crate::effects::node::EffectNode;

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    fn registry_with_trigger() -> CardRegistry {
        let mut registry = CardRegistry::new();
        registry.register(
            CardDefinition::new(CardId::new(1), "Watcher", CardKind::Character)
                .with_stats(1, 1, 1)
                .with_ability(AbilityDefinition::Triggered(
                    TriggeredAbility::new("Vigil", EventKind::CardPlayed)
                        .with_effect(EffectNode::draw(1)),
                )),
        );
        registry.register(CardDefinition::new(CardId::new(2), "Rock", CardKind::Item));
        registry
    }

    #[test]
    fn test_subscribe_and_collect() {
        let registry = registry_with_trigger();
        let mut state = GameState::new(2, 1);
        let mut bag = TriggerBag::new();

        let watcher = state.spawn_card(CardId::new(1), P0, Zone::Play);
        bag.subscribe_card(watcher, P0, registry.get(CardId::new(1)).unwrap());
        assert_eq!(bag.subscription_count(), 1);

        bag.emit(
            &state,
            &registry,
            GameEvent::for_card(EventKind::CardPlayed, watcher, P0),
        );
        assert_eq!(bag.pending_len(), 1);
        assert!(bag.has_pending_for(P0));
        assert!(!bag.has_pending_for(P1));

        // Non-subscribed events collect nothing.
        bag.emit(
            &state,
            &registry,
            GameEvent::for_player(EventKind::TurnEnd, P0),
        );
        assert_eq!(bag.pending_len(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_collection() {
        let registry = registry_with_trigger();
        let mut state = GameState::new(2, 1);
        let mut bag = TriggerBag::new();

        let watcher = state.spawn_card(CardId::new(1), P0, Zone::Play);
        bag.subscribe_card(watcher, P0, registry.get(CardId::new(1)).unwrap());
        bag.unsubscribe_card(watcher);

        bag.emit(
            &state,
            &registry,
            GameEvent::for_card(EventKind::CardPlayed, watcher, P0),
        );
        assert!(bag.is_drained());
    }

    #[test]
    fn test_cards_without_triggers_subscribe_nothing() {
        let registry = registry_with_trigger();
        let mut state = GameState::new(2, 1);
        let mut bag = TriggerBag::new();

        let rock = state.spawn_card(CardId::new(2), P0, Zone::Play);
        bag.subscribe_card(rock, P0, registry.get(CardId::new(2)).unwrap());
        assert_eq!(bag.subscription_count(), 0);
    }

    #[test]
    fn test_remove_pending_by_owner_order() {
        let registry = registry_with_trigger();
        let mut state = GameState::new(2, 1);
        let mut bag = TriggerBag::new();

        let mine = state.spawn_card(CardId::new(1), P0, Zone::Play);
        let theirs = state.spawn_card(CardId::new(1), P1, Zone::Play);
        bag.subscribe_card(mine, P0, registry.get(CardId::new(1)).unwrap());
        bag.subscribe_card(theirs, P1, registry.get(CardId::new(1)).unwrap());

        bag.emit(
            &state,
            &registry,
            GameEvent::for_card(EventKind::CardPlayed, mine, P0),
        );
        assert_eq!(bag.pending_len(), 2);

        let took = bag.remove_pending_for(P1, 0).unwrap();
        assert_eq!(took.controller, P1);
        assert_eq!(bag.pending_len(), 1);
        assert!(bag.remove_pending_for(P1, 0).is_none());

        bag.clear_pending();
        assert!(bag.is_drained());
    }
}

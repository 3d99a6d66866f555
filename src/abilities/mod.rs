//! Ability definitions.
//!
//! The external text compiler hands the engine fully structured ability
//! trees; nothing here parses text. The tagged variant is validated at
//! construction, so the interpreter never probes for optional fields at
//! runtime.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::effects::node::EffectNode;
use crate::effects::target::CardFilter;
use crate::events::{EventFilter, EventKind};
use crate::overlay::ContinuousPayload;

/// A card ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AbilityDefinition {
    /// Fires when a subscribed event matches.
    Triggered(TriggeredAbility),
    /// Applies continuously while the card is in play.
    Static(StaticAbility),
    /// Paid and used during the controller's Main phase.
    Activated(ActivatedAbility),
}

impl AbilityDefinition {
    /// Display name of the ability.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            AbilityDefinition::Triggered(a) => &a.name,
            AbilityDefinition::Static(a) => &a.name,
            AbilityDefinition::Activated(a) => &a.name,
        }
    }

    /// Get the triggered form, if that is what this is.
    #[must_use]
    pub fn as_triggered(&self) -> Option<&TriggeredAbility> {
        match self {
            AbilityDefinition::Triggered(a) => Some(a),
            _ => None,
        }
    }

    /// Get the activated form, if that is what this is.
    #[must_use]
    pub fn as_activated(&self) -> Option<&ActivatedAbility> {
        match self {
            AbilityDefinition::Activated(a) => Some(a),
            _ => None,
        }
    }
}

/// A triggered ability: events + structural filter + effects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggeredAbility {
    /// Display name.
    pub name: String,
    /// Event kinds this ability listens for.
    pub events: SmallVec<[EventKind; 2]>,
    /// Structural filter, if any.
    pub filter: Option<EventFilter>,
    /// Effects resolved in order when the trigger fires.
    pub effects: Vec<EffectNode>,
    /// Optional triggers ask their controller before resolving;
    /// mandatory ones auto-fire.
    pub optional: bool,
}

impl TriggeredAbility {
    /// Create a triggered ability listening for one event.
    #[must_use]
    pub fn new(name: impl Into<String>, event: EventKind) -> Self {
        Self {
            name: name.into(),
            events: SmallVec::from_slice(&[event]),
            filter: None,
            effects: Vec::new(),
            optional: false,
        }
    }

    /// Listen for an additional event (builder pattern).
    #[must_use]
    pub fn also_on(mut self, event: EventKind) -> Self {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
        self
    }

    /// Set the structural filter (builder pattern).
    #[must_use]
    pub fn with_filter(mut self, filter: EventFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: EffectNode) -> Self {
        self.effects.push(effect);
        self
    }

    /// Mark the trigger optional (builder pattern).
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// What a static ability applies its payload to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaticTarget {
    /// The card carrying the ability.
    SelfCard,
    /// Every matching card, from the controller's point of view.
    Matching(CardFilter),
}

/// A static ability: a continuous payload applied during overlay
/// recalculation while the card is in play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAbility {
    /// Display name.
    pub name: String,
    /// Which cards the payload applies to.
    pub target: StaticTarget,
    /// What it does to each of them.
    pub payload: ContinuousPayload,
}

impl StaticAbility {
    /// Create a static ability.
    #[must_use]
    pub fn new(name: impl Into<String>, target: StaticTarget, payload: ContinuousPayload) -> Self {
        Self {
            name: name.into(),
            target,
            payload,
        }
    }

    /// A self-only static ability.
    #[must_use]
    pub fn on_self(name: impl Into<String>, payload: ContinuousPayload) -> Self {
        Self::new(name, StaticTarget::SelfCard, payload)
    }
}

/// The cost to use an activated ability.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationCost {
    /// Exert the card.
    pub exert: bool,
    /// Ink to pay.
    pub ink: i64,
    /// Cards to discard from hand.
    pub discard: u32,
    /// Banish the card itself.
    pub banish_self: bool,
}

impl ActivationCost {
    /// A free ability.
    #[must_use]
    pub fn free() -> Self {
        Self::default()
    }

    /// An exert-only cost.
    #[must_use]
    pub fn exert() -> Self {
        Self {
            exert: true,
            ..Self::default()
        }
    }

    /// Add an ink component (builder pattern).
    #[must_use]
    pub fn with_ink(mut self, ink: i64) -> Self {
        self.ink = ink;
        self
    }

    /// Add a discard component (builder pattern).
    #[must_use]
    pub fn with_discard(mut self, count: u32) -> Self {
        self.discard = count;
        self
    }

    /// Add a banish-self component (builder pattern).
    #[must_use]
    pub fn banishing_self(mut self) -> Self {
        self.banish_self = true;
        self
    }
}

/// An activated ability: cost + effects, limited per turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivatedAbility {
    /// Display name.
    pub name: String,
    /// What using it costs.
    pub cost: ActivationCost,
    /// Effects resolved in order when used.
    pub effects: Vec<EffectNode>,
    /// Uses allowed per turn. The ledger that enforces this is keyed by
    /// turn number, so re-entrant resolution cannot loop.
    pub uses_per_turn: u32,
}

impl ActivatedAbility {
    /// Create an activated ability with a single use per turn.
    #[must_use]
    pub fn new(name: impl Into<String>, cost: ActivationCost) -> Self {
        Self {
            name: name.into(),
            cost,
            effects: Vec::new(),
            uses_per_turn: 1,
        }
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: EffectNode) -> Self {
        self.effects.push(effect);
        self
    }

    /// Allow multiple uses per turn (builder pattern).
    #[must_use]
    pub fn with_uses_per_turn(mut self, uses: u32) -> Self {
        self.uses_per_turn = uses;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triggered_builder() {
        let ability = TriggeredAbility::new("On a Roll", EventKind::CharacterQuested)
            .also_on(EventKind::CardPlayed)
            .with_filter(EventFilter::SelfSource)
            .with_effect(EffectNode::draw(1))
            .optional();

        assert_eq!(ability.name, "On a Roll");
        assert_eq!(ability.events.len(), 2);
        assert!(ability.filter.is_some());
        assert_eq!(ability.effects.len(), 1);
        assert!(ability.optional);
    }

    #[test]
    fn test_also_on_deduplicates() {
        let ability = TriggeredAbility::new("Echo", EventKind::TurnEnd)
            .also_on(EventKind::TurnEnd);
        assert_eq!(ability.events.len(), 1);
    }

    #[test]
    fn test_activation_cost_builder() {
        let cost = ActivationCost::exert().with_ink(2).with_discard(1);

        assert!(cost.exert);
        assert_eq!(cost.ink, 2);
        assert_eq!(cost.discard, 1);
        assert!(!cost.banish_self);

        assert_eq!(ActivationCost::free(), ActivationCost::default());
    }

    #[test]
    fn test_ability_accessors() {
        let triggered = AbilityDefinition::Triggered(TriggeredAbility::new(
            "T",
            EventKind::CardPlayed,
        ));
        let activated = AbilityDefinition::Activated(ActivatedAbility::new(
            "A",
            ActivationCost::exert(),
        ));

        assert_eq!(triggered.name(), "T");
        assert!(triggered.as_triggered().is_some());
        assert!(triggered.as_activated().is_none());
        assert!(activated.as_activated().is_some());
        assert_eq!(activated.as_activated().unwrap().uses_per_turn, 1);
    }
}

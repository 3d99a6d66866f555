//! Continuous-effect overlay.
//!
//! Stat and keyword modifiers never mutate a card's base values. Instead,
//! recalculation runs after every action and effect: pass 1 resets every
//! in-play card's working stats to the printed base, pass 2 reapplies
//! every active static ability and continuous effect in a fixed order.
//! Resetting first makes the result independent of how many times
//! recalculation runs, which incremental mutation cannot guarantee.
//!
//! Cost is cards × effects per pass; object counts per game are small
//! enough that this never shows up in a profile.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::abilities::{AbilityDefinition, StaticTarget};
use crate::cards::{CardRegistry, KeywordGrant};
use crate::core::{EffectId, InstanceId, PlayerId, Zone};
use crate::effects::target::CardFilter;
use crate::state::GameState;

/// How long a continuous effect or shield lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Duration {
    /// Never expires on its own.
    Permanent,
    /// Swept when the current turn ends.
    EndOfTurn,
    /// Swept when the named player's next turn starts.
    UntilTurnStart(PlayerId),
    /// Applies only while the source card is in play.
    WhileSourceInPlay,
}

/// Broad classification of a continuous effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Changes stats or grants keywords.
    Modification,
    /// Forbids or permits an action.
    Restriction,
}

/// A restriction (or allowance) applied to cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestrictionKind {
    /// Does not ready at the start of its controller's turn.
    CantReady,
    /// May not quest.
    CantQuest,
    /// May not challenge.
    CantChallenge,
    /// May not be challenged; with a threshold, only attackers at or
    /// above that strength may challenge.
    CantBeChallenged {
        unless_strength_at_least: Option<i64>,
    },
    /// May challenge ready characters.
    CanChallengeReady,
}

/// The payload a continuous effect applies to each target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContinuousPayload {
    /// Numeric deltas to the working stats.
    Stats {
        strength: i64,
        willpower: i64,
        lore: i64,
    },
    /// A keyword grant.
    Keyword(KeywordGrant),
    /// A restriction flag.
    Restriction(RestrictionKind),
}

impl ContinuousPayload {
    /// Strength-only delta.
    #[must_use]
    pub fn strength(delta: i64) -> Self {
        Self::Stats {
            strength: delta,
            willpower: 0,
            lore: 0,
        }
    }

    /// Lore-only delta.
    #[must_use]
    pub fn lore(delta: i64) -> Self {
        Self::Stats {
            strength: 0,
            willpower: 0,
            lore: delta,
        }
    }
}

/// The cards a continuous effect applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    /// A fixed set of instances, resolved when the effect was created.
    Cards(Vec<InstanceId>),
    /// Re-resolved each recalculation from `perspective`'s point of view.
    Matching {
        filter: CardFilter,
        perspective: PlayerId,
    },
}

impl EffectTarget {
    /// A single fixed instance.
    #[must_use]
    pub fn one(id: InstanceId) -> Self {
        Self::Cards(vec![id])
    }
}

/// A timed modifier applied during overlay recalculation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuousEffect {
    /// Assigned by `GameState::add_effect`; creation order is
    /// application order.
    pub id: EffectId,

    /// The card that created this effect, if any.
    pub source: Option<InstanceId>,

    /// The player whose turn start prunes source-expired effects.
    pub controller: PlayerId,

    /// The cards this effect applies to.
    pub target: EffectTarget,

    /// When this effect expires.
    pub duration: Duration,

    /// What this effect does to each target.
    pub payload: ContinuousPayload,
}

impl ContinuousEffect {
    /// Create an effect; the id is assigned when it is added to state.
    #[must_use]
    pub fn new(
        controller: PlayerId,
        target: EffectTarget,
        duration: Duration,
        payload: ContinuousPayload,
    ) -> Self {
        Self {
            id: EffectId::new(0),
            source: None,
            controller,
            target,
            duration,
            payload,
        }
    }

    /// Set the source card (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: InstanceId) -> Self {
        self.source = Some(source);
        self
    }

    /// Modification or restriction?
    #[must_use]
    pub fn kind(&self) -> EffectKind {
        match self.payload {
            ContinuousPayload::Restriction(_) => EffectKind::Restriction,
            _ => EffectKind::Modification,
        }
    }
}

/// Recompute every in-play card's working stats.
///
/// Pass 1 resets to printed base; pass 2 applies static abilities (play
/// order) then continuous effects (creation order). Idempotent: running
/// it twice without an intervening mutation changes nothing.
pub fn recalculate(state: &mut GameState, registry: &CardRegistry) {
    let in_play = state.all_in_play();

    // Pass 1: reset to base.
    for &id in &in_play {
        let Some(card) = state.card(id) else { continue };
        let Some(def) = registry.get(card.card) else {
            warn!(card = %id, "no definition for card in play; skipping reset");
            continue;
        };
        let def = def.clone();
        if let Some(card) = state.card_mut(id) {
            card.reset_working(&def);
        }
    }

    // Pass 2a: static abilities, in play order.
    let mut statics = Vec::new();
    for &id in &in_play {
        let Some(card) = state.card(id) else { continue };
        let Some(def) = registry.get(card.card) else { continue };
        for ability in &def.abilities {
            if let AbilityDefinition::Static(s) = ability {
                statics.push((id, card.owner, s.clone()));
            }
        }
    }
    for (source, controller, ability) in statics {
        let targets: Vec<InstanceId> = match &ability.target {
            StaticTarget::SelfCard => vec![source],
            StaticTarget::Matching(filter) => filter.collect(state, registry, controller),
        };
        for target in targets {
            apply_payload(state, target, &ability.payload);
        }
    }

    // Pass 2b: continuous effects, in creation order.
    let effects = state.effects.clone();
    for effect in &effects {
        if effect.duration == Duration::WhileSourceInPlay && !source_in_play(state, effect) {
            continue;
        }
        let targets: Vec<InstanceId> = match &effect.target {
            EffectTarget::Cards(ids) => ids.clone(),
            EffectTarget::Matching {
                filter,
                perspective,
            } => filter.collect(state, registry, *perspective),
        };
        for target in targets {
            // Fixed sets may reference cards that have since left play.
            if state.card(target).is_some_and(|c| c.zone == Zone::Play) {
                apply_payload(state, target, &effect.payload);
            }
        }
    }
}

fn source_in_play(state: &GameState, effect: &ContinuousEffect) -> bool {
    effect
        .source
        .and_then(|id| state.card(id))
        .is_some_and(|c| c.zone == Zone::Play)
}

fn apply_payload(state: &mut GameState, target: InstanceId, payload: &ContinuousPayload) {
    let Some(card) = state.card_mut(target) else {
        return;
    };
    match payload {
        ContinuousPayload::Stats {
            strength,
            willpower,
            lore,
        } => {
            card.strength += strength;
            card.willpower += willpower;
            card.lore += lore;
        }
        ContinuousPayload::Keyword(grant) => card.keywords.apply(grant),
        ContinuousPayload::Restriction(restriction) => match restriction {
            RestrictionKind::CantReady => card.restrictions.cant_ready = true,
            RestrictionKind::CantQuest => card.restrictions.cant_quest = true,
            RestrictionKind::CantChallenge => card.restrictions.cant_challenge = true,
            RestrictionKind::CantBeChallenged {
                unless_strength_at_least,
            } => match unless_strength_at_least {
                None => card.restrictions.cant_be_challenged = true,
                Some(gate) => {
                    let current = card.restrictions.challenge_strength_gate;
                    card.restrictions.challenge_strength_gate =
                        Some(current.map_or(*gate, |g| g.max(*gate)));
                }
            },
            RestrictionKind::CanChallengeReady => {
                card.restrictions.can_challenge_ready = true;
            }
        },
    }
}

/// Sweep effects and shields that expire when the turn ends.
pub fn prune_end_of_turn(state: &mut GameState) {
    let before = state.effects.len();
    state.effects.retain(|e| e.duration != Duration::EndOfTurn);
    if state.effects.len() != before {
        debug!(
            removed = before - state.effects.len(),
            "pruned end-of-turn effects"
        );
    }

    for id in state.all_in_play() {
        if let Some(card) = state.card_mut(id) {
            card.shields.retain(|s| s.duration != Duration::EndOfTurn);
        }
    }
}

/// Sweep at the start of `player`'s turn.
///
/// Removes effects and shields tagged "until this player's next turn
/// start", and effects whose source has left play once their
/// controller's turn comes around.
pub fn prune_at_turn_start(state: &mut GameState, player: PlayerId) {
    let expired: Vec<bool> = state
        .effects
        .iter()
        .map(|e| {
            if e.duration == Duration::UntilTurnStart(player) {
                return true;
            }
            if e.controller == player {
                if let Some(source) = e.source {
                    return !state
                        .card(source)
                        .is_some_and(|c| c.zone == Zone::Play);
                }
            }
            false
        })
        .collect();

    let mut keep = expired.iter().map(|&drop| !drop);
    state.effects.retain(|_| keep.next().unwrap_or(true));

    for id in state.all_in_play() {
        if let Some(card) = state.card_mut(id) {
            card.shields
                .retain(|s| s.duration != Duration::UntilTurnStart(player));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::StaticAbility;
    use crate::cards::{CardDefinition, CardId, CardKind, Keywords};

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    fn setup() -> (GameState, CardRegistry) {
        let mut registry = CardRegistry::new();
        registry.register(
            CardDefinition::new(CardId::new(1), "Squire", CardKind::Character)
                .with_stats(1, 2, 1),
        );
        registry.register(
            CardDefinition::new(CardId::new(2), "Captain", CardKind::Character)
                .with_stats(3, 3, 2)
                .with_ability(AbilityDefinition::Static(StaticAbility {
                    name: "Rally".to_string(),
                    target: StaticTarget::Matching(CardFilter::characters().mine()),
                    payload: ContinuousPayload::strength(1),
                })),
        );
        (GameState::new(2, 7), registry)
    }

    #[test]
    fn test_reset_then_reapply() {
        let (mut state, registry) = setup();
        let squire = state.spawn_card(CardId::new(1), P0, Zone::Play);

        state.add_effect(ContinuousEffect::new(
            P0,
            EffectTarget::one(squire),
            Duration::EndOfTurn,
            ContinuousPayload::strength(2),
        ));

        recalculate(&mut state, &registry);
        assert_eq!(state.card(squire).unwrap().strength, 3);

        // Idempotent: no double application.
        recalculate(&mut state, &registry);
        assert_eq!(state.card(squire).unwrap().strength, 3);
    }

    #[test]
    fn test_static_ability_applies_to_matching() {
        let (mut state, registry) = setup();
        let squire = state.spawn_card(CardId::new(1), P0, Zone::Play);
        let captain = state.spawn_card(CardId::new(2), P0, Zone::Play);
        let enemy = state.spawn_card(CardId::new(1), P1, Zone::Play);

        recalculate(&mut state, &registry);

        // Captain's aura: +1 strength to its controller's characters,
        // itself included.
        assert_eq!(state.card(squire).unwrap().strength, 2);
        assert_eq!(state.card(captain).unwrap().strength, 4);
        assert_eq!(state.card(enemy).unwrap().strength, 1);
    }

    #[test]
    fn test_keyword_grant_and_restriction() {
        let (mut state, registry) = setup();
        let squire = state.spawn_card(CardId::new(1), P0, Zone::Play);

        state.add_effect(ContinuousEffect::new(
            P1,
            EffectTarget::one(squire),
            Duration::EndOfTurn,
            ContinuousPayload::Keyword(KeywordGrant::Ward),
        ));
        state.add_effect(ContinuousEffect::new(
            P1,
            EffectTarget::one(squire),
            Duration::EndOfTurn,
            ContinuousPayload::Restriction(RestrictionKind::CantQuest),
        ));

        recalculate(&mut state, &registry);

        let card = state.card(squire).unwrap();
        assert!(card.keywords.ward);
        assert!(card.restrictions.cant_quest);

        // Expire, sweep, recalculate: gone.
        prune_end_of_turn(&mut state);
        recalculate(&mut state, &registry);
        let card = state.card(squire).unwrap();
        assert!(!card.keywords.ward);
        assert!(!card.restrictions.cant_quest);
    }

    #[test]
    fn test_until_turn_start_pruning() {
        let (mut state, registry) = setup();
        let squire = state.spawn_card(CardId::new(1), P0, Zone::Play);

        state.add_effect(ContinuousEffect::new(
            P1,
            EffectTarget::one(squire),
            Duration::UntilTurnStart(P1),
            ContinuousPayload::strength(5),
        ));

        recalculate(&mut state, &registry);
        assert_eq!(state.card(squire).unwrap().strength, 6);

        // Not P1's turn start yet.
        prune_at_turn_start(&mut state, P0);
        assert_eq!(state.effects.len(), 1);

        prune_at_turn_start(&mut state, P1);
        assert!(state.effects.is_empty());

        recalculate(&mut state, &registry);
        assert_eq!(state.card(squire).unwrap().strength, 1);
    }

    #[test]
    fn test_source_expiry_pruned_on_controller_turn() {
        let (mut state, _registry) = setup();
        let source = state.spawn_card(CardId::new(1), P0, Zone::Play);
        let squire = state.spawn_card(CardId::new(1), P1, Zone::Play);

        state.add_effect(
            ContinuousEffect::new(
                P0,
                EffectTarget::one(squire),
                Duration::Permanent,
                ContinuousPayload::strength(2),
            )
            .with_source(source),
        );

        // Source leaves play; effect lingers until P0's turn start.
        state.move_card(source, Zone::Discard);
        prune_at_turn_start(&mut state, P1);
        assert_eq!(state.effects.len(), 1);

        prune_at_turn_start(&mut state, P0);
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_while_source_in_play_suspends() {
        let (mut state, registry) = setup();
        let source = state.spawn_card(CardId::new(1), P0, Zone::Play);
        let squire = state.spawn_card(CardId::new(1), P0, Zone::Play);

        state.add_effect(
            ContinuousEffect::new(
                P0,
                EffectTarget::one(squire),
                Duration::WhileSourceInPlay,
                ContinuousPayload::strength(3),
            )
            .with_source(source),
        );

        recalculate(&mut state, &registry);
        assert_eq!(state.card(squire).unwrap().strength, 4);

        state.move_card(source, Zone::Discard);
        recalculate(&mut state, &registry);
        assert_eq!(state.card(squire).unwrap().strength, 1);
    }

    #[test]
    fn test_challenge_gate_keeps_strictest() {
        let (mut state, registry) = setup();
        let squire = state.spawn_card(CardId::new(1), P0, Zone::Play);

        for gate in [2, 4] {
            state.add_effect(ContinuousEffect::new(
                P0,
                EffectTarget::one(squire),
                Duration::Permanent,
                ContinuousPayload::Restriction(RestrictionKind::CantBeChallenged {
                    unless_strength_at_least: Some(gate),
                }),
            ));
        }

        recalculate(&mut state, &registry);
        assert_eq!(
            state
                .card(squire)
                .unwrap()
                .restrictions
                .challenge_strength_gate,
            Some(4)
        );
    }

    #[test]
    fn test_matching_target_tracks_the_board() {
        let (mut state, registry) = setup();
        let first = state.spawn_card(CardId::new(1), P0, Zone::Play);

        // "Your characters get +2 strength" as a dynamic target set.
        state.add_effect(ContinuousEffect::new(
            P0,
            EffectTarget::Matching {
                filter: CardFilter::characters().mine(),
                perspective: P0,
            },
            Duration::Permanent,
            ContinuousPayload::strength(2),
        ));

        recalculate(&mut state, &registry);
        assert_eq!(state.card(first).unwrap().strength, 3);

        // A later arrival is picked up on the next recalculation.
        let second = state.spawn_card(CardId::new(1), P0, Zone::Play);
        let enemy = state.spawn_card(CardId::new(1), P1, Zone::Play);
        recalculate(&mut state, &registry);

        assert_eq!(state.card(second).unwrap().strength, 3);
        assert_eq!(state.card(enemy).unwrap().strength, 1);
    }

    #[test]
    fn test_printed_keywords_survive_reset() {
        let (mut state, mut registry) = setup();
        registry.register(
            CardDefinition::new(CardId::new(3), "Phantom", CardKind::Character)
                .with_stats(2, 2, 1)
                .with_keywords(Keywords::default().evasive()),
        );
        let phantom = state.spawn_card(CardId::new(3), P0, Zone::Play);

        recalculate(&mut state, &registry);
        assert!(state.card(phantom).unwrap().keywords.evasive);
    }
}

//! Combat: challenge legality, simultaneous damage, banishment.
//!
//! `deal_damage` is the one damage-application routine in the engine;
//! effect damage and challenge damage both go through it, so shields and
//! Resist behave identically everywhere. Challenge damage is
//! simultaneous: both amounts are computed from pre-damage stats before
//! either side takes a point.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cards::{CardKind, CardRegistry};
use crate::core::{InstanceId, Zone};
use crate::events::{EventKind, GameEvent, TriggerBag};
use crate::state::GameState;

/// Why a challenge is not legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeBlock {
    /// Attacker or target is not a character in play.
    NotACharacterInPlay,
    /// Characters cannot challenge their controller's own characters.
    OwnCharacter,
    /// The attacker is exerted.
    AttackerExerted,
    /// The attacker's ink is not dry and it lacks Rush.
    AttackerNotDry,
    /// A restriction forbids the attacker from challenging.
    AttackerForbidden,
    /// The target is ready and the attacker may not challenge ready
    /// characters.
    TargetReady,
    /// The target has Evasive and the attacker does not.
    Evasive,
    /// A restriction protects the target outright.
    TargetProtected,
    /// The target's challenge gate requires more attacker strength.
    BelowStrengthGate,
    /// An exerted Bodyguard must be challenged first.
    Bodyguard,
}

impl std::fmt::Display for ChallengeBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            ChallengeBlock::NotACharacterInPlay => "not a character in play",
            ChallengeBlock::OwnCharacter => "cannot challenge your own character",
            ChallengeBlock::AttackerExerted => "attacker is exerted",
            ChallengeBlock::AttackerNotDry => "attacker's ink is not dry",
            ChallengeBlock::AttackerForbidden => "attacker may not challenge",
            ChallengeBlock::TargetReady => "target is ready",
            ChallengeBlock::Evasive => "target is Evasive",
            ChallengeBlock::TargetProtected => "target cannot be challenged",
            ChallengeBlock::BelowStrengthGate => "attacker is below the strength gate",
            ChallengeBlock::Bodyguard => "an exerted Bodyguard is in the way",
        };
        write!(f, "{reason}")
    }
}

fn is_character_in_play(
    state: &GameState,
    registry: &CardRegistry,
    id: InstanceId,
) -> bool {
    state.card(id).is_some_and(|card| {
        card.zone == Zone::Play
            && registry
                .get(card.card)
                .is_some_and(|def| def.kind == CardKind::Character)
    })
}

/// Check challenge legality.
pub fn can_challenge(
    state: &GameState,
    registry: &CardRegistry,
    attacker: InstanceId,
    target: InstanceId,
) -> Result<(), ChallengeBlock> {
    if !is_character_in_play(state, registry, attacker)
        || !is_character_in_play(state, registry, target)
    {
        return Err(ChallengeBlock::NotACharacterInPlay);
    }
    let atk = state.card(attacker).expect("checked above");
    let tgt = state.card(target).expect("checked above");

    if atk.owner == tgt.owner {
        return Err(ChallengeBlock::OwnCharacter);
    }
    if atk.exerted {
        return Err(ChallengeBlock::AttackerExerted);
    }
    if !atk.is_dry(state.turn_number) && !atk.keywords.rush {
        return Err(ChallengeBlock::AttackerNotDry);
    }
    if atk.restrictions.cant_challenge {
        return Err(ChallengeBlock::AttackerForbidden);
    }
    if tgt.is_ready() && !atk.restrictions.can_challenge_ready {
        return Err(ChallengeBlock::TargetReady);
    }
    if tgt.keywords.evasive && !atk.keywords.evasive {
        return Err(ChallengeBlock::Evasive);
    }
    if tgt.restrictions.cant_be_challenged {
        return Err(ChallengeBlock::TargetProtected);
    }
    if let Some(gate) = tgt.restrictions.challenge_strength_gate {
        if atk.strength < gate {
            return Err(ChallengeBlock::BelowStrengthGate);
        }
    }

    // An exerted Bodyguard soaks challenges unless the target is itself
    // a Bodyguard.
    if !tgt.keywords.bodyguard {
        let defender = tgt.owner;
        let has_exerted_bodyguard = state
            .player(defender)
            .zone(Zone::Play)
            .iter()
            .filter_map(|&id| state.card(id))
            .any(|card| card.keywords.bodyguard && card.exerted);
        if has_exerted_bodyguard {
            return Err(ChallengeBlock::Bodyguard);
        }
    }

    Ok(())
}

/// Apply damage to a card through shields, then Resist.
///
/// Returns the damage actually applied (never negative) and emits
/// `CharacterDamaged` when nonzero.
pub fn deal_damage(
    state: &mut GameState,
    registry: &CardRegistry,
    bag: &mut TriggerBag,
    source: Option<InstanceId>,
    target: InstanceId,
    amount: i64,
) -> i64 {
    let Some(card) = state.card_mut(target) else {
        return 0;
    };

    let mut incoming = amount.max(0);

    // Shields absorb first, in the order they were granted.
    for shield in card.shields.iter_mut() {
        if incoming == 0 {
            break;
        }
        match shield.amount.as_mut() {
            // Blanket prevention: nothing gets through while it lasts.
            None => incoming = 0,
            Some(remaining) => {
                let absorbed = (*remaining).min(incoming);
                *remaining -= absorbed;
                incoming -= absorbed;
            }
        }
    }
    card.shields.retain(|s| s.amount != Some(0));

    let applied = (incoming - card.keywords.resist).max(0);
    card.take_damage(applied);

    if applied > 0 {
        let name = state
            .card(target)
            .and_then(|c| registry.get(c.card))
            .map_or("?", |d| d.name.as_str());
        info!(card = %target, name, applied, "damage dealt");
        bag.emit(state, registry, GameEvent::damage(source, target, applied));
    } else {
        debug!(card = %target, amount, "damage fully prevented");
    }
    applied
}

/// Banish a card: events, unsubscription, the move to discard.
///
/// Events are collected before the card's triggers unsubscribe so its
/// own "when banished" abilities still fire.
pub fn banish(
    state: &mut GameState,
    registry: &CardRegistry,
    bag: &mut TriggerBag,
    id: InstanceId,
    in_challenge: bool,
) {
    let Some(card) = state.card(id) else {
        return;
    };
    if card.zone != Zone::Play {
        return;
    }
    let controller = card.owner;
    let name = registry
        .get(card.card)
        .map_or("?", |d| d.name.as_str())
        .to_string();

    bag.emit(
        state,
        registry,
        GameEvent::for_card(EventKind::CharacterBanished, id, controller),
    );
    if in_challenge {
        bag.emit(
            state,
            registry,
            GameEvent::for_card(EventKind::BanishedInChallenge, id, controller),
        );
    }

    bag.unsubscribe_card(id);
    state.move_card(id, Zone::Discard);
    info!(card = %id, name, in_challenge, "banished");
}

/// Banish a character whose damage has met its willpower.
///
/// Returns whether it was banished.
pub fn check_banish(
    state: &mut GameState,
    registry: &CardRegistry,
    bag: &mut TriggerBag,
    id: InstanceId,
    in_challenge: bool,
) -> bool {
    let doomed = state.card(id).is_some_and(|card| {
        card.zone == Zone::Play
            && registry
                .get(card.card)
                .is_some_and(|def| def.kind == CardKind::Character)
            && card.damage >= card.willpower
    });
    if doomed {
        banish(state, registry, bag, id, in_challenge);
    }
    doomed
}

/// Resolve a legal challenge.
///
/// Exerts the attacker, applies both damage amounts simultaneously
/// (Challenger boosts only the attacker's outgoing damage), then checks
/// banishment on both sides.
pub fn resolve_challenge(
    state: &mut GameState,
    registry: &CardRegistry,
    bag: &mut TriggerBag,
    attacker: InstanceId,
    target: InstanceId,
) {
    let (atk_owner, atk_out, exempt) = {
        let Some(atk) = state.card(attacker) else { return };
        (
            atk.owner,
            (atk.strength + atk.keywords.challenger).max(0),
            atk.get_meta("challenge_without_exerting", 0) != 0,
        )
    };
    let def_out = state.card(target).map_or(0, |t| t.strength.max(0));

    if !exempt {
        if let Some(atk) = state.card_mut(attacker) {
            atk.exert();
        }
    }

    info!(attacker = %attacker, defender = %target, atk_out, def_out, "challenge");
    let event = GameEvent::for_card(EventKind::ChallengeDeclared, attacker, atk_owner)
        .with_target(target);
    bag.emit(state, registry, event);

    // Both amounts were computed above, so neither side's damage can
    // weaken the other's blow.
    deal_damage(state, registry, bag, Some(attacker), target, atk_out);
    deal_damage(state, registry, bag, Some(target), attacker, def_out);

    check_banish(state, registry, bag, target, true);
    check_banish(state, registry, bag, attacker, true);
}

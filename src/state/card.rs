//! Runtime card state.
//!
//! `CardInstance` is one physical card in one game. The working stats and
//! keyword set on it are owned by overlay recalculation: they are reset to
//! the printed base and rebuilt from active effects after every action, so
//! readers never see a stale modifier. Everything else (damage, exertion,
//! shields, the ability-usage ledger) is ordinary mutable state.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, CardId, Keywords};
use crate::core::{InstanceId, PlayerId, Zone};
use crate::overlay::Duration;

/// A damage-prevention shield on a card.
///
/// `amount: None` prevents all damage for the shield's duration;
/// `amount: Some(n)` absorbs up to `n` damage and is consumed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageShield {
    /// Remaining absorption. `None` = unlimited for the duration.
    pub amount: Option<i64>,
    /// When the shield expires.
    pub duration: Duration,
}

/// One activated ability's usage record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityUse {
    /// Turn the ability was last used.
    pub turn: u32,
    /// Uses within that turn.
    pub count: u32,
}

/// Working restriction and allowance flags.
///
/// Reset by overlay pass 1 and rebuilt from active restriction effects in
/// pass 2; never mutate these outside recalculation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRestrictions {
    /// Does not ready during its controller's Ready step.
    pub cant_ready: bool,
    /// May not quest.
    pub cant_quest: bool,
    /// May not challenge.
    pub cant_challenge: bool,
    /// May not be challenged at all.
    pub cant_be_challenged: bool,
    /// Only attackers with at least this strength may challenge this card.
    pub challenge_strength_gate: Option<i64>,
    /// May challenge ready characters.
    pub can_challenge_ready: bool,
}

/// A card instance in a game.
///
/// Created once at deck construction and never duplicated; zone moves
/// mutate `zone` in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique ID for this physical card.
    pub id: InstanceId,

    /// The definition this card was printed from.
    pub card: CardId,

    /// Owning player.
    pub owner: PlayerId,

    /// Current zone.
    pub zone: Zone,

    /// Exerted flag. Ready is the absence of exertion, so the two states
    /// are mutually exclusive by construction.
    pub exerted: bool,

    /// Damage counters. Never negative.
    pub damage: i64,

    /// Turn this card entered play. `None` while not in play.
    pub turn_played: Option<u32>,

    /// Working strength (overlay-owned).
    pub strength: i64,

    /// Working willpower (overlay-owned).
    pub willpower: i64,

    /// Working lore value (overlay-owned).
    pub lore: i64,

    /// Working keyword set (overlay-owned).
    pub keywords: Keywords,

    /// Working restriction flags (overlay-owned).
    pub restrictions: ActiveRestrictions,

    /// Cards tucked underneath (shift stacks).
    pub under: Vec<InstanceId>,

    /// Active damage-prevention shields, consumed in order.
    pub shields: Vec<DamageShield>,

    /// Per-turn activated-ability ledger, keyed by ability index.
    #[serde(default)]
    pub ability_uses: FxHashMap<usize, AbilityUse>,

    /// Structured extension map for rare one-off markers.
    #[serde(default)]
    pub meta: FxHashMap<String, i64>,
}

impl CardInstance {
    /// Create a card instance.
    #[must_use]
    pub fn new(id: InstanceId, card: CardId, owner: PlayerId, zone: Zone) -> Self {
        Self {
            id,
            card,
            owner,
            zone,
            exerted: false,
            damage: 0,
            turn_played: None,
            strength: 0,
            willpower: 0,
            lore: 0,
            keywords: Keywords::default(),
            restrictions: ActiveRestrictions::default(),
            under: Vec::new(),
            shields: Vec::new(),
            ability_uses: FxHashMap::default(),
            meta: FxHashMap::default(),
        }
    }

    /// Is the card ready (not exerted)?
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.exerted
    }

    /// Ready the card.
    pub fn ready(&mut self) {
        self.exerted = false;
    }

    /// Exert the card.
    pub fn exert(&mut self) {
        self.exerted = true;
    }

    /// Is the card's ink dry (played on an earlier turn)?
    ///
    /// Cards not in play are never dry.
    #[must_use]
    pub fn is_dry(&self, current_turn: u32) -> bool {
        self.turn_played.is_some_and(|t| t < current_turn)
    }

    /// Remove up to `amount` damage. Damage never goes below zero.
    pub fn heal(&mut self, amount: i64) {
        self.damage = (self.damage - amount.max(0)).max(0);
    }

    /// Add raw damage counters (already past shields and Resist).
    pub fn take_damage(&mut self, amount: i64) {
        self.damage += amount.max(0);
    }

    /// Reset working stats and flags to the printed base.
    ///
    /// Overlay recalculation pass 1.
    pub fn reset_working(&mut self, def: &CardDefinition) {
        self.strength = def.strength;
        self.willpower = def.willpower;
        self.lore = def.lore;
        self.keywords = def.keywords.clone();
        self.restrictions = ActiveRestrictions::default();
    }

    /// Uses of an activated ability this turn.
    #[must_use]
    pub fn uses_this_turn(&self, ability: usize, turn: u32) -> u32 {
        self.ability_uses
            .get(&ability)
            .filter(|u| u.turn == turn)
            .map_or(0, |u| u.count)
    }

    /// Record one use of an activated ability.
    pub fn record_ability_use(&mut self, ability: usize, turn: u32) {
        let entry = self.ability_uses.entry(ability).or_default();
        if entry.turn == turn {
            entry.count += 1;
        } else {
            entry.turn = turn;
            entry.count = 1;
        }
    }

    /// Clear the ability ledger (Ready step).
    pub fn clear_ability_uses(&mut self) {
        self.ability_uses.clear();
    }

    /// Reset state that only applies while in play.
    ///
    /// Called when the card leaves the play zone.
    pub fn clear_play_state(&mut self) {
        self.exerted = false;
        self.damage = 0;
        self.turn_played = None;
        self.shields.clear();
        self.ability_uses.clear();
        self.meta.clear();
    }

    /// Get an extension value with a default.
    #[must_use]
    pub fn get_meta(&self, key: &str, default: i64) -> i64 {
        self.meta.get(key).copied().unwrap_or(default)
    }

    /// Set an extension value.
    pub fn set_meta(&mut self, key: impl Into<String>, value: i64) {
        self.meta.insert(key.into(), value);
    }
}

//! The effect-description tree.
//!
//! Every card ability bottoms out in a list of `EffectNode`s. Nodes are
//! data, produced by the external text compiler; the interpreter gives
//! them meaning. Composite nodes (`ForEach`, `Conditional`, `Sequence`,
//! `Optional`, `Modal`) recurse into child nodes with unbounded depth,
//! bounded in practice by card design.

use serde::{Deserialize, Serialize};

use crate::cards::KeywordGrant;
use crate::overlay::{Duration, RestrictionKind};

use super::condition::Condition;
use super::target::{CardFilter, TargetQuery};

/// A stat a modifier can touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stat {
    Strength,
    Willpower,
    Lore,
}

/// One mode of a modal effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectMode {
    /// Shown to the choosing player.
    pub label: String,
    /// Effects of this mode.
    pub effects: Vec<EffectNode>,
}

/// Which players a player-directed effect applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerQuery {
    /// The acting player.
    Controller,
    /// One opponent, chosen by the acting player.
    ChosenOpponent,
    /// Every opponent, in turn order from the acting player.
    EachOpponent,
    /// Every player, acting player first.
    EachPlayer,
}

/// One node of an effect tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectNode {
    /// Deal damage to a card (shields and Resist apply).
    Damage { amount: i64, target: TargetQuery },

    /// Remove damage from a card.
    Heal { amount: i64, target: TargetQuery },

    /// Banish a card to its owner's discard.
    Banish { target: TargetQuery },

    /// Return a card to its owner's hand.
    ReturnToHand { target: TargetQuery },

    /// Put a card into its owner's inkwell.
    PutIntoInkwell { target: TargetQuery, exerted: bool },

    /// Ready a card.
    Ready { target: TargetQuery },

    /// Exert a card.
    Exert { target: TargetQuery },

    /// Players draw cards.
    Draw { player: PlayerQuery, count: usize },

    /// Players discard cards from hand; the discarding player picks
    /// unless `random`.
    Discard {
        player: PlayerQuery,
        count: usize,
        random: bool,
    },

    /// Players gain lore.
    GainLore { player: PlayerQuery, amount: i64 },

    /// Players lose lore.
    LoseLore { player: PlayerQuery, amount: i64 },

    /// Grant a timed stat delta via a new continuous effect.
    ModifyStat {
        stat: Stat,
        amount: i64,
        duration: Duration,
        target: TargetQuery,
    },

    /// Grant a timed keyword via a new continuous effect.
    GrantKeyword {
        grant: KeywordGrant,
        duration: Duration,
        target: TargetQuery,
    },

    /// Impose a timed restriction via a new continuous effect.
    Restrict {
        restriction: RestrictionKind,
        duration: Duration,
        target: TargetQuery,
    },

    /// Put a damage-prevention shield on a card.
    PreventDamage {
        amount: Option<i64>,
        duration: Duration,
        target: TargetQuery,
    },

    /// Expand into one invocation of `effect` per matching card, with
    /// the target pre-resolved. Handlers never special-case area
    /// application.
    ForEach {
        filter: CardFilter,
        effect: Box<EffectNode>,
    },

    /// Evaluate a condition and recurse into one branch.
    Conditional {
        condition: Condition,
        then: Vec<EffectNode>,
        otherwise: Vec<EffectNode>,
    },

    /// Resolve child effects in order.
    Sequence(Vec<EffectNode>),

    /// The acting player may decline the wrapped effects.
    Optional {
        prompt: String,
        effects: Vec<EffectNode>,
    },

    /// The acting player picks `picks` modes to resolve, in listed
    /// order.
    Modal {
        prompt: String,
        modes: Vec<EffectMode>,
        picks: usize,
    },
}

impl EffectNode {
    /// Deal damage to a chosen character.
    #[must_use]
    pub fn damage(amount: i64) -> Self {
        Self::Damage {
            amount,
            target: TargetQuery::chosen_character(),
        }
    }

    /// Remove damage from a chosen character.
    #[must_use]
    pub fn heal(amount: i64) -> Self {
        Self::Heal {
            amount,
            target: TargetQuery::chosen_character(),
        }
    }

    /// The acting player draws.
    #[must_use]
    pub fn draw(count: usize) -> Self {
        Self::Draw {
            player: PlayerQuery::Controller,
            count,
        }
    }

    /// The acting player gains lore.
    #[must_use]
    pub fn gain_lore(amount: i64) -> Self {
        Self::GainLore {
            player: PlayerQuery::Controller,
            amount,
        }
    }

    /// Banish a chosen character.
    #[must_use]
    pub fn banish_chosen() -> Self {
        Self::Banish {
            target: TargetQuery::chosen_character(),
        }
    }

    /// A sequence of effects.
    #[must_use]
    pub fn sequence(effects: impl IntoIterator<Item = EffectNode>) -> Self {
        Self::Sequence(effects.into_iter().collect())
    }
}

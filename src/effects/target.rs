//! Effect targeting.
//!
//! `CardFilter` describes a set of cards declaratively; `TargetQuery`
//! says how a handler obtains its single target. The Ward rule is
//! enforced at choice time, not here: a filter happily matches a warded
//! card, but the interpreter refuses to let an opponent *choose* it.

use serde::{Deserialize, Serialize};

use crate::cards::{CardKind, CardRegistry};
use crate::core::{InstanceId, PlayerId, Zone};
use crate::state::{CardInstance, GameState};

/// Whose cards a filter matches, relative to a perspective player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerFilter {
    /// Any player's cards.
    #[default]
    Any,
    /// The perspective player's own cards.
    Mine,
    /// Cards of any other player.
    Opponents,
}

/// A declarative description of a set of cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFilter {
    /// Required card kind, if any.
    pub kind: Option<CardKind>,
    /// Ownership relative to the perspective player.
    pub owner: OwnerFilter,
    /// Zone to search. Almost always `Play`.
    pub zone: Zone,
    /// Required subtype, if any.
    pub subtype: Option<String>,
    /// Required exertion state, if any.
    pub exerted: Option<bool>,
    /// Required damage state, if any.
    pub damaged: Option<bool>,
    /// Excluded instance (e.g. "another character").
    pub exclude: Option<InstanceId>,
}

impl Default for CardFilter {
    fn default() -> Self {
        Self {
            kind: None,
            owner: OwnerFilter::Any,
            zone: Zone::Play,
            subtype: None,
            exerted: None,
            damaged: None,
            exclude: None,
        }
    }
}

impl CardFilter {
    /// Any character in play.
    #[must_use]
    pub fn characters() -> Self {
        Self {
            kind: Some(CardKind::Character),
            ..Self::default()
        }
    }

    /// Any card in play.
    #[must_use]
    pub fn any_in_play() -> Self {
        Self::default()
    }

    /// Restrict to the perspective player's cards (builder pattern).
    #[must_use]
    pub fn mine(mut self) -> Self {
        self.owner = OwnerFilter::Mine;
        self
    }

    /// Restrict to opposing cards (builder pattern).
    #[must_use]
    pub fn opposing(mut self) -> Self {
        self.owner = OwnerFilter::Opponents;
        self
    }

    /// Restrict to a kind (builder pattern).
    #[must_use]
    pub fn of_kind(mut self, kind: CardKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restrict to a subtype (builder pattern).
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Restrict to exerted cards (builder pattern).
    #[must_use]
    pub fn exerted(mut self) -> Self {
        self.exerted = Some(true);
        self
    }

    /// Restrict to damaged cards (builder pattern).
    #[must_use]
    pub fn damaged(mut self) -> Self {
        self.damaged = Some(true);
        self
    }

    /// Exclude one instance (builder pattern).
    #[must_use]
    pub fn excluding(mut self, id: InstanceId) -> Self {
        self.exclude = Some(id);
        self
    }

    /// Does one card match, from `perspective`'s point of view?
    #[must_use]
    pub fn matches(
        &self,
        registry: &CardRegistry,
        perspective: PlayerId,
        card: &CardInstance,
    ) -> bool {
        if card.zone != self.zone {
            return false;
        }
        if self.exclude == Some(card.id) {
            return false;
        }
        match self.owner {
            OwnerFilter::Any => {}
            OwnerFilter::Mine => {
                if card.owner != perspective {
                    return false;
                }
            }
            OwnerFilter::Opponents => {
                if card.owner == perspective {
                    return false;
                }
            }
        }
        if let Some(exerted) = self.exerted {
            if card.exerted != exerted {
                return false;
            }
        }
        if let Some(damaged) = self.damaged {
            if (card.damage > 0) != damaged {
                return false;
            }
        }
        if self.kind.is_some() || self.subtype.is_some() {
            let Some(def) = registry.get(card.card) else {
                return false;
            };
            if let Some(kind) = self.kind {
                if def.kind != kind {
                    return false;
                }
            }
            if let Some(subtype) = &self.subtype {
                if !def.has_subtype(subtype) {
                    return false;
                }
            }
        }
        true
    }

    /// Collect every matching card, players in id order, zone order
    /// within each player.
    #[must_use]
    pub fn collect(
        &self,
        state: &GameState,
        registry: &CardRegistry,
        perspective: PlayerId,
    ) -> Vec<InstanceId> {
        let mut out = Vec::new();
        for (_, ps) in state.players() {
            for &id in ps.zone(self.zone) {
                if let Some(card) = state.card(id) {
                    if self.matches(registry, perspective, card) {
                        out.push(id);
                    }
                }
            }
        }
        out
    }
}

/// How a handler obtains its single target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetQuery {
    /// The effect's own source card.
    Source,
    /// The acting player chooses one matching card. The Ward rule
    /// applies: opposing warded cards cannot be chosen.
    Chosen(CardFilter),
}

impl TargetQuery {
    /// Choose any character in play.
    #[must_use]
    pub fn chosen_character() -> Self {
        Self::Chosen(CardFilter::characters())
    }

    /// Choose an opposing character.
    #[must_use]
    pub fn chosen_opposing_character() -> Self {
        Self::Chosen(CardFilter::characters().opposing())
    }

    /// Choose one of your own characters.
    #[must_use]
    pub fn chosen_own_character() -> Self {
        Self::Chosen(CardFilter::characters().mine())
    }
}

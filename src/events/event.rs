//! Game events.
//!
//! Events are facts about things that already happened (or, for
//! `ChallengeDeclared`, are in the middle of happening). Emitting an
//! event never resolves anything inline: the bag collects matching
//! triggered abilities and a checkpoint drains them later.

use serde::{Deserialize, Serialize};

use crate::core::{InstanceId, PlayerId};

/// The named events triggered abilities can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A player's turn began.
    TurnStart,
    /// A player's turn is ending.
    TurnEnd,
    /// A card was played (characters, items, locations, actions, songs).
    CardPlayed,
    /// A song was sung (also fires `CardPlayed`).
    SongSung,
    /// A character quested.
    CharacterQuested,
    /// A challenge was declared; damage has not been dealt yet.
    ChallengeDeclared,
    /// A card took nonzero damage.
    CharacterDamaged,
    /// A character was banished.
    CharacterBanished,
    /// A character was banished during a challenge (fires alongside
    /// `CharacterBanished`).
    BanishedInChallenge,
    /// A player drew a card.
    CardDrawn,
    /// A player inked a card.
    CardInked,
    /// A card was discarded from hand.
    CardDiscarded,
    /// A player gained lore.
    LoreGained,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventKind::TurnStart => "turn-start",
            EventKind::TurnEnd => "turn-end",
            EventKind::CardPlayed => "card-played",
            EventKind::SongSung => "song-sung",
            EventKind::CharacterQuested => "character-quested",
            EventKind::ChallengeDeclared => "challenge-declared",
            EventKind::CharacterDamaged => "character-damaged",
            EventKind::CharacterBanished => "character-banished",
            EventKind::BanishedInChallenge => "banished-in-challenge",
            EventKind::CardDrawn => "card-drawn",
            EventKind::CardInked => "card-inked",
            EventKind::CardDiscarded => "card-discarded",
            EventKind::LoreGained => "lore-gained",
        };
        write!(f, "{name}")
    }
}

/// An event with its contextual data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// What happened.
    pub kind: EventKind,
    /// The card that caused it, if any.
    pub source: Option<InstanceId>,
    /// The card it happened to, if any.
    pub target: Option<InstanceId>,
    /// The player it concerns, if any.
    pub player: Option<PlayerId>,
    /// Magnitude (damage dealt, lore gained, cards drawn).
    pub amount: i64,
}

impl GameEvent {
    /// Create an event with just a kind.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            source: None,
            target: None,
            player: None,
            amount: 0,
        }
    }

    /// Set the source card (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: InstanceId) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the target card (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: InstanceId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the player (builder pattern).
    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    /// Set the magnitude (builder pattern).
    #[must_use]
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    /// A player-centric event (turn start, lore gained).
    #[must_use]
    pub fn for_player(kind: EventKind, player: PlayerId) -> Self {
        Self::new(kind).with_player(player)
    }

    /// A card-centric event (played, quested, banished).
    #[must_use]
    pub fn for_card(kind: EventKind, card: InstanceId, controller: PlayerId) -> Self {
        Self::new(kind).with_source(card).with_player(controller)
    }

    /// A damage event.
    #[must_use]
    pub fn damage(source: Option<InstanceId>, target: InstanceId, amount: i64) -> Self {
        let mut event = Self::new(EventKind::CharacterDamaged)
            .with_target(target)
            .with_amount(amount);
        event.source = source;
        event
    }
}

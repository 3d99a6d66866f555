//! Player actions and their outcomes.
//!
//! An action is data: what a player wants to do plus any pre-made
//! decisions. Rule violations are rejections, not errors — the executor
//! hands back a `RejectReason` with no mutation and an automated player
//! simply tries something else.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::combat::ChallengeBlock;
use crate::core::InstanceId;
use crate::effects::ChoicePayload;

/// How a card's play cost is paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    /// Pay the printed ink cost.
    Ink,
    /// Shift: pay the shift cost and play on top of a same-name
    /// character.
    Shift { over: InstanceId },
}

/// One player action, submitted during the Main phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Place a hand card into the inkwell as a resource (once per turn).
    Ink { card: InstanceId },

    /// Play a card from hand.
    Play {
        card: InstanceId,
        mode: PlayMode,
        payload: ChoicePayload,
    },

    /// Exert a character to gain its lore.
    Quest { card: InstanceId },

    /// Challenge an opposing character.
    Challenge {
        attacker: InstanceId,
        target: InstanceId,
    },

    /// Use an activated ability.
    UseAbility {
        card: InstanceId,
        ability: usize,
        payload: ChoicePayload,
    },

    /// Sing a song instead of paying its ink cost.
    SingSong {
        song: InstanceId,
        singers: SmallVec<[InstanceId; 2]>,
        payload: ChoicePayload,
    },

    /// Give up.
    Concede,

    /// End the turn.
    PassTurn,
}

impl Action {
    /// Play a card for ink with no pre-made decisions.
    #[must_use]
    pub fn play(card: InstanceId) -> Self {
        Self::Play {
            card,
            mode: PlayMode::Ink,
            payload: ChoicePayload::new(),
        }
    }

    /// Sing with one singer.
    #[must_use]
    pub fn sing(song: InstanceId, singer: InstanceId) -> Self {
        Self::SingSong {
            song,
            singers: SmallVec::from_slice(&[singer]),
            payload: ChoicePayload::new(),
        }
    }
}

/// Why an action was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The game already has a winner.
    GameOver,
    /// Not this player's turn (or the player was eliminated).
    NotActivePlayer,
    /// Actions are only accepted during the Main phase.
    WrongPhase,
    /// The referenced card or definition does not exist.
    UnknownCard,
    /// The card is not in the acting player's hand.
    NotInHand,
    /// The card is not in the acting player's play zone.
    NotInPlay,
    /// The card is not inkable.
    NotInkable,
    /// One ink per turn.
    AlreadyInkedThisTurn,
    /// Not enough ready ink.
    InsufficientInk,
    /// Only characters do that.
    NotACharacter,
    /// Only songs can be sung.
    NotASong,
    /// The card is exerted.
    NotReady,
    /// The card was played this turn.
    InkNotDry,
    /// A restriction forbids questing.
    CannotQuest,
    /// Reckless: a legal challenge exists, so questing is blocked.
    MustChallenge,
    /// The challenge is illegal.
    Challenge(ChallengeBlock),
    /// No activated ability at that index.
    NoSuchAbility,
    /// The ability was already used this turn.
    AbilityExhausted,
    /// The activation cost cannot be paid.
    CostNotPayable,
    /// The singers cannot cover the song's cost.
    CannotSing,
    /// Wrong number of singers, or a singer is not eligible.
    InvalidSingers,
    /// Shift is unavailable or the shift target does not match.
    ShiftTargetInvalid,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::GameOver => write!(f, "the game is over"),
            RejectReason::NotActivePlayer => write!(f, "not the active player"),
            RejectReason::WrongPhase => write!(f, "not in the main phase"),
            RejectReason::UnknownCard => write!(f, "unknown card"),
            RejectReason::NotInHand => write!(f, "card is not in hand"),
            RejectReason::NotInPlay => write!(f, "card is not in play"),
            RejectReason::NotInkable => write!(f, "card is not inkable"),
            RejectReason::AlreadyInkedThisTurn => write!(f, "already inked this turn"),
            RejectReason::InsufficientInk => write!(f, "not enough ready ink"),
            RejectReason::NotACharacter => write!(f, "not a character"),
            RejectReason::NotASong => write!(f, "not a song"),
            RejectReason::NotReady => write!(f, "card is exerted"),
            RejectReason::InkNotDry => write!(f, "ink is not dry"),
            RejectReason::CannotQuest => write!(f, "questing is forbidden"),
            RejectReason::MustChallenge => write!(f, "Reckless: must challenge instead"),
            RejectReason::Challenge(block) => write!(f, "illegal challenge: {block}"),
            RejectReason::NoSuchAbility => write!(f, "no such ability"),
            RejectReason::AbilityExhausted => write!(f, "ability already used this turn"),
            RejectReason::CostNotPayable => write!(f, "activation cost cannot be paid"),
            RejectReason::CannotSing => write!(f, "singers cannot cover the song"),
            RejectReason::InvalidSingers => write!(f, "invalid singers"),
            RejectReason::ShiftTargetInvalid => write!(f, "invalid shift target"),
        }
    }
}

/// Result of a submitted action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// The action was applied and state mutated.
    Applied,
    /// The action was rejected; nothing changed.
    Rejected(RejectReason),
}

impl ActionOutcome {
    /// Did the action apply?
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let play = Action::play(InstanceId::new(3));
        assert!(matches!(
            play,
            Action::Play {
                mode: PlayMode::Ink,
                ..
            }
        ));

        let sing = Action::sing(InstanceId::new(1), InstanceId::new(2));
        match sing {
            Action::SingSong { singers, .. } => assert_eq!(singers.len(), 1),
            other => panic!("expected SingSong, got {other:?}"),
        }
    }

    #[test]
    fn test_outcome() {
        assert!(ActionOutcome::Applied.is_applied());
        assert!(!ActionOutcome::Rejected(RejectReason::GameOver).is_applied());
    }

    #[test]
    fn test_reject_reason_display() {
        assert_eq!(
            RejectReason::AlreadyInkedThisTurn.to_string(),
            "already inked this turn"
        );
        assert_eq!(
            RejectReason::Challenge(ChallengeBlock::Evasive).to_string(),
            "illegal challenge: target is Evasive"
        );
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::Challenge {
            attacker: InstanceId::new(1),
            target: InstanceId::new(2),
        };
        let json = serde_json::to_string(&action).unwrap();
        let deserialized: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, deserialized);
    }
}

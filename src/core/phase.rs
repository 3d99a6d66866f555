//! Turn phases.
//!
//! A turn runs Ready → Set → Draw → Main → End, then the next player's
//! Ready. The first three form the beginning phase and accept no player
//! actions; Main accepts exactly one action at a time; End is transient
//! while end-of-turn triggers and expiries resolve.

use serde::{Deserialize, Serialize};

/// The phase the game is currently in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Untap step: the active player's cards ready.
    #[default]
    Ready,
    /// Locations grant lore; start-of-turn triggers resolve.
    Set,
    /// The active player draws (skipped on the very first turn).
    Draw,
    /// The action window.
    Main,
    /// End-of-turn triggers and expiries.
    End,
}

impl Phase {
    /// Whether player actions are accepted in this phase.
    #[must_use]
    pub const fn accepts_actions(self) -> bool {
        matches!(self, Phase::Main)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Ready => "ready",
            Phase::Set => "set",
            Phase::Draw => "draw",
            Phase::Main => "main",
            Phase::End => "end",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_main_accepts_actions() {
        assert!(Phase::Main.accepts_actions());
        assert!(!Phase::Ready.accepts_actions());
        assert!(!Phase::Set.accepts_actions());
        assert!(!Phase::Draw.accepts_actions());
        assert!(!Phase::End.accepts_actions());
    }

    #[test]
    fn test_default_phase() {
        assert_eq!(Phase::default(), Phase::Ready);
    }
}

//! Runtime game state: cards, players, history, the state store.

pub mod card;
pub mod game;
pub mod history;
pub mod player;

pub use card::{AbilityUse, ActiveRestrictions, CardInstance, DamageShield};
pub use game::{GameState, DEFAULT_LORE_GOAL};
pub use history::{TuckRecord, TurnHistory, ZoneChange};
pub use player::PlayerState;

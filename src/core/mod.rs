//! Core engine types: identifiers, players, zones, phases, RNG.
//!
//! These are the fundamental building blocks everything else is written
//! against. They carry no rules knowledge of their own.

pub mod ids;
pub mod phase;
pub mod player;
pub mod rng;
pub mod zone;

pub use ids::{ChoiceId, EffectId, InstanceId};
pub use phase::Phase;
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use zone::Zone;

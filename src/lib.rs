//! # glimmer-engine
//!
//! A rules engine for a two-or-more-player, zone-based trading card
//! game built around ink (resources) and lore (victory points). The
//! crate enforces turn structure, validates and executes player
//! actions, and resolves structured card effects — including keyword
//! interactions such as damage prevention, targeting restrictions, and
//! simultaneous-trigger ordering.
//!
//! ## Design Principles
//!
//! 1. **One state handle**: a single `GameState` is owned by the turn
//!    orchestrator and passed explicitly to every component. No ambient
//!    globals.
//!
//! 2. **Reset-then-reapply**: derived card stats are never mutated
//!    incrementally. Overlay recalculation resets every in-play card to
//!    its printed base and reapplies all active effects in a fixed
//!    order, so recalculation is idempotent.
//!
//! 3. **Collect, then drain**: emitting an event never resolves
//!    anything inline. Matching triggers land in the bag and resolve at
//!    explicit checkpoints, owner-first, with the order picked through
//!    the choice protocol.
//!
//! 4. **Structured card data**: the engine consumes ability trees from
//!    an external text compiler and never parses card text.
//!
//! ## Modules
//!
//! - `core`: identifiers, players, zones, phases, RNG
//! - `cards`: definitions, keywords, the registry
//! - `abilities`: triggered / static / activated ability definitions
//! - `state`: card instances, player state, history, the state store
//! - `choices`: the request/response choice protocol
//! - `events`: the event bus and trigger bag
//! - `effects`: effect trees and the interpreter
//! - `overlay`: continuous effects and recalculation
//! - `combat`: challenge legality and damage
//! - `engine`: the turn orchestrator, executor, and enumerator
//! - `error`: the integration-error taxonomy

pub mod abilities;
pub mod cards;
pub mod choices;
pub mod combat;
pub mod core;
pub mod effects;
pub mod engine;
pub mod error;
pub mod events;
pub mod overlay;
pub mod state;

// Re-export commonly used types
pub use crate::core::{ChoiceId, EffectId, GameRng, InstanceId, Phase, PlayerId, PlayerMap, Zone};

pub use crate::cards::{CardDefinition, CardId, CardKind, CardRegistry, KeywordGrant, Keywords};

pub use crate::abilities::{
    AbilityDefinition, ActivatedAbility, ActivationCost, StaticAbility, StaticTarget,
    TriggeredAbility,
};

pub use crate::state::{CardInstance, DamageShield, GameState, PlayerState};

pub use crate::choices::{
    AutoChoiceHandler, ChoiceBroker, ChoiceHandler, ChoiceOption, ChoiceRequest, ChoiceResponse,
    ScriptedChoiceHandler,
};

pub use crate::events::{EventFilter, EventKind, GameEvent, TriggerBag};

pub use crate::effects::{
    CardFilter, ChoicePayload, Condition, EffectContext, EffectMode, EffectNode, Interpreter,
    OwnerFilter, PlayerQuery, Stat, TargetQuery,
};

pub use crate::overlay::{
    ContinuousEffect, ContinuousPayload, Duration, EffectTarget, RestrictionKind,
};

pub use crate::combat::ChallengeBlock;

pub use crate::engine::{Action, ActionOutcome, Game, GameBuilder, PlayMode, RejectReason};

pub use crate::error::{EngineError, EngineResult};

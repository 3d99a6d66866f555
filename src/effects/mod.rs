//! The effect system.
//!
//! - `node`: the effect-description tree (data, produced by the external
//!   text compiler)
//! - `target`: card filters and target queries
//! - `condition`: predicates for conditional nodes
//! - `interpreter`: walks trees and mutates state; owns the bag drain

pub mod condition;
pub mod interpreter;
pub mod node;
pub mod target;

pub use condition::Condition;
pub use interpreter::{ChoicePayload, EffectContext, Interpreter};
pub use node::{EffectMode, EffectNode, PlayerQuery, Stat};
pub use target::{CardFilter, OwnerFilter, TargetQuery};

//! Engine error taxonomy.
//!
//! Only integration-level problems are errors: a missing or misbehaving
//! choice handler, unknown ids, bad setup. Rule violations are not errors
//! — they come back as `ActionOutcome::Rejected` with no mutation, so
//! automated players can simply try another action.

use thiserror::Error;

use crate::cards::CardId;
use crate::core::{ChoiceId, InstanceId, PlayerId};

/// An integration-level failure.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No choice handler registered for a player that must decide.
    #[error("no choice handler registered for {0}")]
    MissingChoiceHandler(PlayerId),

    /// A handler returned an out-of-contract response.
    #[error("invalid response to {request}: {reason}")]
    InvalidChoiceResponse { request: ChoiceId, reason: String },

    /// A deck or effect referenced an unregistered card definition.
    #[error("unknown card definition {0}")]
    UnknownCard(CardId),

    /// An action or effect referenced a nonexistent card instance.
    #[error("unknown card instance {0}")]
    UnknownInstance(InstanceId),

    /// The game was misconfigured at build time.
    #[error("game setup invalid: {0}")]
    InvalidSetup(String),
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

//! The choice protocol.
//!
//! Any rule that needs a player decision builds a `ChoiceRequest` and
//! routes it through the `ChoiceBroker` to that player's registered
//! handler. Handler identity is opaque: a bot that answers inline and a
//! human surface that blocks on a UI are indistinguishable to the engine.
//!
//! A missing handler is a hard failure (an integration bug, not a rule
//! violation). `ask_or_random` exists only for legacy/test call sites and
//! picks a uniformly random legal subset.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ChoiceId, GameRng, PlayerId};
use crate::error::{EngineError, EngineResult};

/// One selectable option in a choice request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Stable id echoed back in the response.
    pub id: String,
    /// Human-readable label.
    pub label: String,
}

impl ChoiceOption {
    /// Create an option.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A request for a player decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRequest {
    /// Unique id, echoed in the response.
    pub id: ChoiceId,
    /// The player who must decide.
    pub player: PlayerId,
    /// What is being decided.
    pub prompt: String,
    /// The legal options.
    pub options: Vec<ChoiceOption>,
    /// Minimum selections.
    pub min: usize,
    /// Maximum selections.
    pub max: usize,
}

/// A player's answer to a choice request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceResponse {
    /// The request this answers.
    pub id: ChoiceId,
    /// Selected option ids.
    pub selected: Vec<String>,
}

/// A registered decision-maker for one player.
///
/// Implementations may compute inline (bots) or block until an external
/// answer arrives (humans); the engine does not care which.
pub trait ChoiceHandler {
    /// Answer a choice request.
    fn choose(&mut self, request: &ChoiceRequest) -> ChoiceResponse;
}

/// A handler that always selects the first `min` options.
///
/// Useful as a baseline bot and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoChoiceHandler;

impl ChoiceHandler for AutoChoiceHandler {
    fn choose(&mut self, request: &ChoiceRequest) -> ChoiceResponse {
        let take = request.min.min(request.options.len());
        ChoiceResponse {
            id: request.id,
            selected: request.options[..take].iter().map(|o| o.id.clone()).collect(),
        }
    }
}

/// A handler that replays a scripted sequence of selections.
///
/// Each call pops the next script entry. Panics when the script runs out,
/// which is what a test wants.
#[derive(Clone, Debug, Default)]
pub struct ScriptedChoiceHandler {
    script: std::collections::VecDeque<Vec<String>>,
}

impl ScriptedChoiceHandler {
    /// Create a scripted handler.
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Vec<String>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl ChoiceHandler for ScriptedChoiceHandler {
    fn choose(&mut self, request: &ChoiceRequest) -> ChoiceResponse {
        let selected = self
            .script
            .pop_front()
            .unwrap_or_else(|| panic!("scripted handler exhausted at {:?}", request.prompt));
        ChoiceResponse {
            id: request.id,
            selected,
        }
    }
}

/// Routes choice requests to per-player handlers.
pub struct ChoiceBroker {
    handlers: rustc_hash::FxHashMap<PlayerId, Box<dyn ChoiceHandler>>,
    next_id: u64,
}

impl std::fmt::Debug for ChoiceBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChoiceBroker")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Default for ChoiceBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl ChoiceBroker {
    /// Create an empty broker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: rustc_hash::FxHashMap::default(),
            next_id: 0,
        }
    }

    /// Register (or replace) a player's handler.
    pub fn register(&mut self, player: PlayerId, handler: Box<dyn ChoiceHandler>) {
        self.handlers.insert(player, handler);
    }

    /// Is a handler registered for this player?
    #[must_use]
    pub fn has_handler(&self, player: PlayerId) -> bool {
        self.handlers.contains_key(&player)
    }

    /// Build a request with a fresh id.
    pub fn request(
        &mut self,
        player: PlayerId,
        prompt: impl Into<String>,
        options: Vec<ChoiceOption>,
        min: usize,
        max: usize,
    ) -> ChoiceRequest {
        let id = ChoiceId::new(self.next_id);
        self.next_id += 1;
        ChoiceRequest {
            id,
            player,
            prompt: prompt.into(),
            options,
            min,
            max,
        }
    }

    /// Route a request to the player's handler and validate the answer.
    pub fn ask(&mut self, request: &ChoiceRequest) -> EngineResult<ChoiceResponse> {
        let handler = self
            .handlers
            .get_mut(&request.player)
            .ok_or(EngineError::MissingChoiceHandler(request.player))?;

        let response = handler.choose(request);
        debug!(
            request = %request.id,
            player = %request.player,
            selected = ?response.selected,
            "choice answered"
        );
        Self::validate(request, &response)?;
        Ok(response)
    }

    /// Ask if a handler exists, otherwise pick a uniformly random legal
    /// subset of size `min(max, option_count)`.
    ///
    /// Legacy/test call sites only; new code should require a handler.
    pub fn ask_or_random(
        &mut self,
        request: &ChoiceRequest,
        rng: &mut GameRng,
    ) -> EngineResult<ChoiceResponse> {
        if self.has_handler(request.player) {
            return self.ask(request);
        }

        let take = request.max.min(request.options.len());
        let ids: Vec<String> = request.options.iter().map(|o| o.id.clone()).collect();
        let selected = rng.sample(&ids, take);
        debug!(request = %request.id, "no handler; random fallback");
        Ok(ChoiceResponse {
            id: request.id,
            selected,
        })
    }

    /// Convenience: ask the player to pick exactly one option.
    pub fn ask_one(
        &mut self,
        player: PlayerId,
        prompt: impl Into<String>,
        options: Vec<ChoiceOption>,
    ) -> EngineResult<String> {
        let request = self.request(player, prompt, options, 1, 1);
        let response = self.ask(&request)?;
        Ok(response.selected.into_iter().next().expect("validated"))
    }

    /// Convenience: yes/no confirmation.
    pub fn confirm(
        &mut self,
        player: PlayerId,
        prompt: impl Into<String>,
    ) -> EngineResult<bool> {
        let options = vec![
            ChoiceOption::new("yes", "Yes"),
            ChoiceOption::new("no", "No"),
        ];
        Ok(self.ask_one(player, prompt, options)? == "yes")
    }

    fn validate(request: &ChoiceRequest, response: &ChoiceResponse) -> EngineResult<()> {
        let fail = |reason: String| EngineError::InvalidChoiceResponse {
            request: request.id,
            reason,
        };

        if response.id != request.id {
            return Err(fail(format!("answered {} instead", response.id)));
        }
        if response.selected.len() < request.min || response.selected.len() > request.max {
            return Err(fail(format!(
                "selected {} options, expected {}..={}",
                response.selected.len(),
                request.min,
                request.max
            )));
        }
        for id in &response.selected {
            if !request.options.iter().any(|o| &o.id == id) {
                return Err(fail(format!("unknown option {id:?}")));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for id in &response.selected {
            if !seen.insert(id) {
                return Err(fail(format!("duplicate option {id:?}")));
            }
        }
        Ok(())
    }
}

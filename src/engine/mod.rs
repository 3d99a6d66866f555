//! The turn orchestrator.
//!
//! `Game` owns one game's state and every service around it: the card
//! registry, the trigger bag, the choice broker. It drives the phase
//! sequence, dispatches actions to the executor, and runs the
//! recalculation and win checks after each one. Build with
//! `GameBuilder`, register choice handlers, then call `begin`.

pub mod action;
mod executor;
mod legal;

pub use action::{Action, ActionOutcome, PlayMode, RejectReason};

use tracing::{debug, info};

use crate::cards::{CardId, CardKind, CardRegistry};
use crate::choices::{ChoiceBroker, ChoiceHandler};
use crate::core::{InstanceId, Phase, PlayerId, Zone};
use crate::effects::Interpreter;
use crate::error::{EngineError, EngineResult};
use crate::events::{EventKind, GameEvent, TriggerBag};
use crate::overlay;
use crate::state::{GameState, DEFAULT_LORE_GOAL};

/// Builder for a new game.
pub struct GameBuilder {
    registry: CardRegistry,
    decks: Vec<Vec<CardId>>,
    seed: u64,
    lore_goal: i64,
    starting_hand: usize,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self {
            registry: CardRegistry::new(),
            decks: Vec::new(),
            seed: 0,
            lore_goal: DEFAULT_LORE_GOAL,
            starting_hand: 7,
        }
    }
}

impl GameBuilder {
    /// Start a builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the card registry.
    #[must_use]
    pub fn with_registry(mut self, registry: CardRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Add one player's deck; player ids follow the order of calls.
    #[must_use]
    pub fn add_deck(mut self, deck: Vec<CardId>) -> Self {
        self.decks.push(deck);
        self
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the lore goal.
    #[must_use]
    pub fn with_lore_goal(mut self, goal: i64) -> Self {
        self.lore_goal = goal;
        self
    }

    /// Override the starting hand size.
    #[must_use]
    pub fn with_starting_hand(mut self, size: usize) -> Self {
        self.starting_hand = size;
        self
    }

    /// Build the game: spawn decks, shuffle, deal starting hands.
    ///
    /// The game is not started — register choice handlers, then call
    /// [`Game::begin`].
    pub fn build(self) -> EngineResult<Game> {
        if self.decks.len() < 2 {
            return Err(EngineError::InvalidSetup(
                "need at least two decks".to_string(),
            ));
        }
        for deck in &self.decks {
            for &card in deck {
                if !self.registry.contains(card) {
                    return Err(EngineError::UnknownCard(card));
                }
            }
        }

        let mut state = GameState::new(self.decks.len(), self.seed);
        state.lore_goal = self.lore_goal;

        for (index, deck) in self.decks.iter().enumerate() {
            let player = PlayerId::new(index as u8);
            for &card in deck {
                state.spawn_card(card, player, Zone::Deck);
            }
            state.shuffle_deck(player);
            for _ in 0..self.starting_hand {
                state.draw(player);
            }
        }
        // The opening deal is not part of turn one's history.
        state.history.clear();

        Ok(Game {
            state,
            registry: self.registry,
            bag: TriggerBag::new(),
            choices: ChoiceBroker::new(),
            started: false,
        })
    }
}

/// One running game.
pub struct Game {
    state: GameState,
    registry: CardRegistry,
    bag: TriggerBag,
    choices: ChoiceBroker,
    started: bool,
}

impl Game {
    /// Read the game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutate the game state directly.
    ///
    /// Escape hatch for hosts restoring snapshots and for scenario
    /// setup; normal play goes through [`Game::submit`].
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// The card registry.
    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    /// Register a player's choice handler.
    pub fn register_choice_handler(&mut self, player: PlayerId, handler: Box<dyn ChoiceHandler>) {
        self.choices.register(player, handler);
    }

    /// Place a card directly into a zone, bypassing costs.
    ///
    /// Scenario setup and tests. Cards placed into play arrive dry with
    /// triggers subscribed and stats recalculated.
    pub fn place_card(
        &mut self,
        player: PlayerId,
        card: CardId,
        zone: Zone,
    ) -> EngineResult<InstanceId> {
        let def = self
            .registry
            .get(card)
            .ok_or(EngineError::UnknownCard(card))?
            .clone();

        let id = self.state.spawn_card(card, player, zone);
        if zone == Zone::Play {
            if let Some(instance) = self.state.card_mut(id) {
                instance.turn_played = Some(0);
            }
            if def.kind.is_permanent() {
                self.bag.subscribe_card(id, player, &def);
            }
            overlay::recalculate(&mut self.state, &self.registry);
        }
        Ok(id)
    }

    /// Recompute working stats from the active effect set.
    ///
    /// `submit` does this automatically; hosts only need it after
    /// editing state directly through [`Game::state_mut`].
    pub fn recalculate(&mut self) {
        overlay::recalculate(&mut self.state, &self.registry);
    }

    /// Run the first turn's beginning phase; the game then sits in Main.
    ///
    /// Call after registering choice handlers: start-of-turn triggers
    /// may already need decisions.
    pub fn begin(&mut self) -> EngineResult<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        info!(player = %self.state.active_player, "game begins");
        self.start_turn()
    }

    // === Turn flow ===

    pub(crate) fn start_turn(&mut self) -> EngineResult<()> {
        if self.state.is_over() {
            return Ok(());
        }
        let active = self.state.active_player;

        // An eliminated player's turn is skipped outright.
        if self.state.player(active).eliminated {
            self.state.active_player = self.state.next_player(active);
            return self.start_turn();
        }

        debug!(turn = self.state.turn_number, player = %active, "turn starts");
        self.state.history.clear();
        self.state.player_mut(active).reset_turn_flags();
        overlay::prune_at_turn_start(&mut self.state, active);

        // Ready step: untap unless forbidden, reset the ability ledger.
        self.state.phase = Phase::Ready;
        overlay::recalculate(&mut self.state, &self.registry);
        for id in self.state.in_play(active) {
            if let Some(card) = self.state.card_mut(id) {
                if !card.restrictions.cant_ready {
                    card.ready();
                }
                card.clear_ability_uses();
            }
        }
        self.bag.emit(
            &self.state,
            &self.registry,
            GameEvent::for_player(EventKind::TurnStart, active),
        );

        // Set step: locations grant lore, start-of-turn triggers resolve.
        self.state.phase = Phase::Set;
        for id in self.state.in_play(active) {
            let grant = self
                .state
                .card(id)
                .filter(|c| {
                    self.registry
                        .get(c.card)
                        .is_some_and(|d| d.kind == CardKind::Location)
                })
                .map(|c| c.lore)
                .unwrap_or(0);
            if grant > 0 {
                info!(location = %id, grant, "location grants lore");
                self.state.gain_lore(active, grant);
                self.bag.emit(
                    &self.state,
                    &self.registry,
                    GameEvent::for_player(EventKind::LoreGained, active)
                        .with_source(id)
                        .with_amount(grant),
                );
            }
        }
        self.drain_and_recalc()?;
        if self.state.is_over() {
            return Ok(());
        }

        // Draw step: skipped for the starting player's first turn.
        self.state.phase = Phase::Draw;
        let skip = self.state.turn_number == 1 && active == self.state.first_player;
        if !skip {
            match self.state.draw(active) {
                Some(drawn) => {
                    self.bag.emit(
                        &self.state,
                        &self.registry,
                        GameEvent::for_player(EventKind::CardDrawn, active)
                            .with_target(drawn)
                            .with_amount(1),
                    );
                }
                None => {
                    // Decked: the draw a player cannot take eliminates
                    // them.
                    info!(player = %active, "deck empty on draw");
                    self.state.eliminate(active);
                }
            }
        }
        self.drain_and_recalc()?;
        if self.state.is_over() {
            return Ok(());
        }
        if self.state.player(active).eliminated {
            self.state.active_player = self.state.next_player(active);
            self.state.turn_number += 1;
            return self.start_turn();
        }

        self.state.phase = Phase::Main;
        Ok(())
    }

    pub(crate) fn pass_turn(&mut self) -> EngineResult<()> {
        let active = self.state.active_player;
        self.state.phase = Phase::End;
        debug!(turn = self.state.turn_number, player = %active, "turn ends");

        // End-of-turn triggers fire for every player's cards; some
        // effects key off any turn ending, not just their controller's.
        self.bag.emit(
            &self.state,
            &self.registry,
            GameEvent::for_player(EventKind::TurnEnd, active),
        );
        self.drain_and_recalc()?;

        overlay::prune_end_of_turn(&mut self.state);
        overlay::recalculate(&mut self.state, &self.registry);
        if self.state.is_over() {
            return Ok(());
        }

        self.state.active_player = self.state.next_player(active);
        self.state.turn_number += 1;
        self.start_turn()
    }

    /// Drain the bag at a checkpoint, then recalculate.
    pub(crate) fn drain_and_recalc(&mut self) -> EngineResult<()> {
        let mut interp = Interpreter::new(
            &mut self.state,
            &self.registry,
            &mut self.bag,
            &mut self.choices,
        );
        interp.drain_bag()?;
        overlay::recalculate(&mut self.state, &self.registry);
        Ok(())
    }
}

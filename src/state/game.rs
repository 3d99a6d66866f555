//! The single shared game state.
//!
//! One `GameState` per game, owned by the turn orchestrator and passed
//! explicitly to every component; there is no ambient global. All zone
//! bookkeeping goes through `move_card` so the instance's zone field, the
//! per-player zone lists, and the turn history can never disagree.

use rustc_hash::FxHashMap;

use crate::cards::CardId;
use crate::core::{GameRng, InstanceId, Phase, PlayerId, PlayerMap, Zone};
use crate::error::{EngineError, EngineResult};
use crate::overlay::ContinuousEffect;

use super::card::CardInstance;
use super::history::TurnHistory;
use super::player::PlayerState;

/// Default lore goal.
pub const DEFAULT_LORE_GOAL: i64 = 20;

/// Complete state of one game.
pub struct GameState {
    players: PlayerMap<PlayerState>,
    cards: FxHashMap<InstanceId, CardInstance>,

    /// Whose turn it is.
    pub active_player: PlayerId,

    /// The player who took the very first turn (their first Draw step is
    /// skipped).
    pub first_player: PlayerId,

    /// Turn counter; one turn per player, starting at 1.
    pub turn_number: u32,

    /// Current phase.
    pub phase: Phase,

    /// Set exactly once; after that no action is legal.
    pub winner: Option<PlayerId>,

    /// Lore needed to win.
    pub lore_goal: i64,

    /// Active continuous effects, in creation order. Application order
    /// during recalculation is list order.
    pub effects: Vec<ContinuousEffect>,

    /// Turn-scoped zone-change history.
    pub history: TurnHistory,

    /// Deterministic RNG for shuffles and the random-choice fallback.
    pub rng: GameRng,

    next_instance: u32,
    next_effect: u64,
}

impl GameState {
    /// Create an empty game state.
    #[must_use]
    pub fn new(player_count: usize, seed: u64) -> Self {
        Self {
            players: PlayerMap::new(player_count, |_| PlayerState::new()),
            cards: FxHashMap::default(),
            active_player: PlayerId::new(0),
            first_player: PlayerId::new(0),
            turn_number: 1,
            phase: Phase::default(),
            winner: None,
            lore_goal: DEFAULT_LORE_GOAL,
            effects: Vec::new(),
            history: TurnHistory::new(),
            rng: GameRng::new(seed),
            next_instance: 0,
            next_effect: 0,
        }
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// A player's state.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    /// A player's state, mutable.
    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    /// Iterate (PlayerId, &PlayerState).
    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &PlayerState)> {
        self.players.iter()
    }

    /// Is the game over?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    // === Cards ===

    /// Create a new card instance in a zone. The sole allocation path:
    /// instances are never duplicated afterwards.
    pub fn spawn_card(&mut self, card: CardId, owner: PlayerId, zone: Zone) -> InstanceId {
        let id = InstanceId::new(self.next_instance);
        self.next_instance += 1;

        self.cards.insert(id, CardInstance::new(id, card, owner, zone));
        self.players[owner].push_to(zone, id);
        self.history.record_move(self.turn_number, id, None, zone);
        id
    }

    /// Look up a card instance.
    #[must_use]
    pub fn card(&self, id: InstanceId) -> Option<&CardInstance> {
        self.cards.get(&id)
    }

    /// Look up a card instance, mutable.
    pub fn card_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&id)
    }

    /// Look up a card instance or fail with `UnknownInstance`.
    pub fn require_card(&self, id: InstanceId) -> EngineResult<&CardInstance> {
        self.cards.get(&id).ok_or(EngineError::UnknownInstance(id))
    }

    /// Move a card to a new zone.
    ///
    /// Returns the old zone, or `None` if the instance is unknown.
    /// Leaving play clears play-only state and sends any tucked cards to
    /// their owner's discard.
    pub fn move_card(&mut self, id: InstanceId, to: Zone) -> Option<Zone> {
        let (owner, from) = {
            let card = self.cards.get(&id)?;
            (card.owner, card.zone)
        };

        if from == to {
            return Some(from);
        }

        // A tucked card is absent from the zone lists; tolerate that.
        self.players[owner].remove_from(from, id);
        self.players[owner].push_to(to, id);

        let turn = self.turn_number;
        self.history.record_move(turn, id, Some(from), to);

        let mut freed = Vec::new();
        if let Some(card) = self.cards.get_mut(&id) {
            card.zone = to;
            if from == Zone::Play && to != Zone::Play {
                card.clear_play_state();
                freed = std::mem::take(&mut card.under);
            }
        }

        // The shift stack follows its host out of play.
        for tucked in freed {
            if let Some(card) = self.cards.get_mut(&tucked) {
                card.zone = Zone::Discard;
                let owner = card.owner;
                self.players[owner].push_to(Zone::Discard, tucked);
                self.history
                    .record_move(turn, tucked, Some(Zone::Play), Zone::Discard);
            }
        }

        Some(from)
    }

    /// Place `card` underneath `host` (shift).
    ///
    /// The tucked card stays in the play zone conceptually but leaves the
    /// zone lists; it is only reachable through the host.
    pub fn tuck_under(&mut self, host: InstanceId, card: InstanceId) -> EngineResult<()> {
        let (owner, zone) = {
            let c = self.require_card(card)?;
            (c.owner, c.zone)
        };
        self.require_card(host)?;

        self.players[owner].remove_from(zone, card);
        if let Some(c) = self.cards.get_mut(&card) {
            c.zone = Zone::Play;
        }
        if let Some(h) = self.cards.get_mut(&host) {
            h.under.push(card);
        }
        self.history.record_tuck(self.turn_number, host, card);
        Ok(())
    }

    /// Instance ids of a player's cards in play (tucked cards excluded).
    #[must_use]
    pub fn in_play(&self, player: PlayerId) -> Vec<InstanceId> {
        self.players[player].zone(Zone::Play).to_vec()
    }

    /// Instance ids of every card in play, players in id order.
    #[must_use]
    pub fn all_in_play(&self) -> Vec<InstanceId> {
        let mut out = Vec::new();
        for (_, player) in self.players.iter() {
            out.extend_from_slice(player.zone(Zone::Play));
        }
        out
    }

    // === Deck ===

    /// Shuffle a player's deck.
    pub fn shuffle_deck(&mut self, player: PlayerId) {
        let mut deck = std::mem::take(self.players[player].zone_mut(Zone::Deck));
        self.rng.shuffle(&mut deck);
        *self.players[player].zone_mut(Zone::Deck) = deck;
    }

    /// Draw the top card of a player's deck into their hand.
    ///
    /// Returns the drawn card, or `None` if the deck is empty.
    pub fn draw(&mut self, player: PlayerId) -> Option<InstanceId> {
        let id = self.players[player].pop_deck()?;
        self.players[player].push_to(Zone::Hand, id);
        if let Some(card) = self.cards.get_mut(&id) {
            card.zone = Zone::Hand;
        }
        self.history
            .record_move(self.turn_number, id, Some(Zone::Deck), Zone::Hand);
        Some(id)
    }

    // === Ink ===

    /// Number of ready cards in a player's inkwell.
    #[must_use]
    pub fn ready_ink(&self, player: PlayerId) -> i64 {
        self.players[player]
            .zone(Zone::Inkwell)
            .iter()
            .filter(|id| self.cards.get(id).is_some_and(|c| c.is_ready()))
            .count() as i64
    }

    /// Exert `amount` ready inkwell cards. Returns false (and exerts
    /// nothing) if there is not enough ready ink.
    pub fn pay_ink(&mut self, player: PlayerId, amount: i64) -> bool {
        if amount <= 0 {
            return true;
        }
        let ready: Vec<InstanceId> = self.players[player]
            .zone(Zone::Inkwell)
            .iter()
            .copied()
            .filter(|id| self.cards.get(id).is_some_and(|c| c.is_ready()))
            .collect();

        if (ready.len() as i64) < amount {
            return false;
        }
        for id in ready.into_iter().take(amount as usize) {
            if let Some(card) = self.cards.get_mut(&id) {
                card.exert();
            }
        }
        true
    }

    // === Lore and winning ===

    /// Grant lore and check the goal. The first mutation that reaches the
    /// goal freezes the game.
    pub fn gain_lore(&mut self, player: PlayerId, amount: i64) {
        if self.winner.is_some() {
            return;
        }
        let lore = &mut self.players[player].lore;
        *lore = (*lore + amount).max(0);
        if *lore >= self.lore_goal {
            self.winner = Some(player);
        }
    }

    /// Remove lore, never going below zero.
    pub fn lose_lore(&mut self, player: PlayerId, amount: i64) {
        self.gain_lore(player, -amount.max(0));
    }

    // === Elimination ===

    /// Eliminate a player (concede, deck-out). When one player remains,
    /// they win.
    pub fn eliminate(&mut self, player: PlayerId) {
        self.players[player].eliminated = true;

        let remaining: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|(_, p)| !p.eliminated)
            .map(|(id, _)| id)
            .collect();
        if remaining.len() == 1 && self.winner.is_none() {
            self.winner = Some(remaining[0]);
        }
    }

    /// The next non-eliminated player after `player`, round-robin.
    #[must_use]
    pub fn next_player(&self, player: PlayerId) -> PlayerId {
        let count = self.player_count() as u8;
        let mut candidate = player.0;
        for _ in 0..count {
            candidate = (candidate + 1) % count;
            if !self.players[PlayerId::new(candidate)].eliminated {
                return PlayerId::new(candidate);
            }
        }
        player
    }

    // === Continuous effects ===

    /// Add a continuous effect, assigning its id. List order is
    /// application order.
    pub fn add_effect(&mut self, mut effect: ContinuousEffect) -> crate::core::EffectId {
        let id = crate::core::EffectId::new(self.next_effect);
        self.next_effect += 1;
        effect.id = id;
        self.effects.push(effect);
        id
    }
}

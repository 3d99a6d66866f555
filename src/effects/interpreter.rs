//! The effect interpreter.
//!
//! Walks effect-description trees and mutates game state. Dispatch is a
//! single match from node kind to one handler method each; handlers
//! share the `fn(&mut self, &mut EffectContext, ...) -> EngineResult<_>`
//! shape and are independently testable.
//!
//! Target resolution precedence: a pre-resolved context target, then a
//! payload-supplied id, then an interactive choice. The Ward rule is
//! enforced at the choice step: a warded card can never be *chosen* by
//! an opponent-sourced effect (challenge targeting bypasses this module
//! entirely).
//!
//! The interpreter also owns the bag drain, because a drained trigger
//! resolves through the same `apply` entry point.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cards::CardRegistry;
use crate::choices::{ChoiceBroker, ChoiceOption};
use crate::combat;
use crate::core::{InstanceId, PlayerId, Zone};
use crate::error::{EngineError, EngineResult};
use crate::events::{EventKind, GameEvent, TriggerBag};
use crate::overlay::{self, ContinuousEffect, ContinuousPayload, Duration, EffectTarget};
use crate::state::{DamageShield, GameState};

use super::condition::Condition;
use super::node::{EffectMode, EffectNode, PlayerQuery, Stat};
use super::target::TargetQuery;

/// Pre-made decisions submitted with an action.
///
/// Consumed front-to-back as handlers reach their decision points;
/// anything not supplied is asked interactively through the choice
/// protocol.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicePayload {
    /// Pre-picked targets, consumed in resolution order.
    pub targets: VecDeque<InstanceId>,
    /// Pre-picked modal modes, consumed in resolution order.
    pub modes: VecDeque<usize>,
    /// Pre-picked discards (own discard costs and effects).
    pub discards: Vec<InstanceId>,
    /// Pre-answered optional-effect confirmation.
    pub accept_optional: Option<bool>,
}

impl ChoicePayload {
    /// An empty payload: everything is asked interactively.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply pre-picked targets (builder pattern).
    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = InstanceId>) -> Self {
        self.targets = targets.into_iter().collect();
        self
    }

    /// Supply pre-picked modes (builder pattern).
    #[must_use]
    pub fn with_modes(mut self, modes: impl IntoIterator<Item = usize>) -> Self {
        self.modes = modes.into_iter().collect();
        self
    }

    /// Supply pre-picked discards (builder pattern).
    #[must_use]
    pub fn with_discards(mut self, discards: impl IntoIterator<Item = InstanceId>) -> Self {
        self.discards = discards.into_iter().collect();
        self
    }

    /// Pre-accept optional effects (builder pattern).
    #[must_use]
    pub fn accepting(mut self) -> Self {
        self.accept_optional = Some(true);
        self
    }
}

/// Everything a handler needs besides the node itself.
#[derive(Clone, Debug)]
pub struct EffectContext {
    /// The acting player (makes choices, is "you" in effect text).
    pub player: PlayerId,
    /// The card the effect came from, if any.
    pub source: Option<InstanceId>,
    /// Pre-resolved target; set by area expansion and combat routing.
    pub target: Option<InstanceId>,
    /// Pre-made decisions.
    pub payload: ChoicePayload,
}

impl EffectContext {
    /// Context for an acting player.
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            source: None,
            target: None,
            payload: ChoicePayload::new(),
        }
    }

    /// Set the source card (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: InstanceId) -> Self {
        self.source = Some(source);
        self
    }

    /// Set a pre-resolved target (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: InstanceId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the payload (builder pattern).
    #[must_use]
    pub fn with_payload(mut self, payload: ChoicePayload) -> Self {
        self.payload = payload;
        self
    }
}

/// Walks effect trees against one game's mutable internals.
///
/// Short-lived: the engine assembles one per resolution from its own
/// fields, so the interpreter is re-entrant by construction (a drained
/// trigger builds nested `apply` calls on the same instance).
pub struct Interpreter<'a> {
    pub state: &'a mut GameState,
    pub registry: &'a CardRegistry,
    pub bag: &'a mut TriggerBag,
    pub choices: &'a mut ChoiceBroker,
}

impl<'a> Interpreter<'a> {
    /// Assemble an interpreter over the engine internals.
    pub fn new(
        state: &'a mut GameState,
        registry: &'a CardRegistry,
        bag: &'a mut TriggerBag,
        choices: &'a mut ChoiceBroker,
    ) -> Self {
        Self {
            state,
            registry,
            bag,
            choices,
        }
    }

    /// Apply a list of effects in order, stopping if the game ends.
    pub fn apply_all(
        &mut self,
        ctx: &mut EffectContext,
        nodes: &[EffectNode],
    ) -> EngineResult<()> {
        for node in nodes {
            if self.state.is_over() {
                break;
            }
            self.apply(ctx, node)?;
        }
        Ok(())
    }

    /// Apply one effect node.
    pub fn apply(&mut self, ctx: &mut EffectContext, node: &EffectNode) -> EngineResult<()> {
        match node {
            EffectNode::Damage { amount, target } => self.damage(ctx, *amount, target),
            EffectNode::Heal { amount, target } => self.heal(ctx, *amount, target),
            EffectNode::Banish { target } => self.banish(ctx, target),
            EffectNode::ReturnToHand { target } => self.return_to_hand(ctx, target),
            EffectNode::PutIntoInkwell { target, exerted } => {
                self.put_into_inkwell(ctx, target, *exerted)
            }
            EffectNode::Ready { target } => self.ready(ctx, target),
            EffectNode::Exert { target } => self.exert(ctx, target),
            EffectNode::Draw { player, count } => self.draw(ctx, player, *count),
            EffectNode::Discard {
                player,
                count,
                random,
            } => self.discard(ctx, player, *count, *random),
            EffectNode::GainLore { player, amount } => self.gain_lore(ctx, player, *amount),
            EffectNode::LoseLore { player, amount } => self.lose_lore(ctx, player, *amount),
            EffectNode::ModifyStat {
                stat,
                amount,
                duration,
                target,
            } => self.modify_stat(ctx, *stat, *amount, *duration, target),
            EffectNode::GrantKeyword {
                grant,
                duration,
                target,
            } => self.grant_keyword(ctx, grant.clone(), *duration, target),
            EffectNode::Restrict {
                restriction,
                duration,
                target,
            } => self.restrict(ctx, restriction.clone(), *duration, target),
            EffectNode::PreventDamage {
                amount,
                duration,
                target,
            } => self.prevent_damage(ctx, *amount, *duration, target),
            EffectNode::ForEach { filter, effect } => self.for_each(ctx, filter, effect),
            EffectNode::Conditional {
                condition,
                then,
                otherwise,
            } => self.conditional(ctx, condition, then, otherwise),
            EffectNode::Sequence(nodes) => self.apply_all(ctx, nodes),
            EffectNode::Optional { prompt, effects } => self.optional(ctx, prompt, effects),
            EffectNode::Modal {
                prompt,
                modes,
                picks,
            } => self.modal(ctx, prompt, modes, *picks),
        }
    }

    /// Drain the bag to empty.
    ///
    /// The active player picks the order of their own pending triggers
    /// first, then each other player in turn order, until the bag is
    /// empty; resolving a trigger may collect more. A trigger whose
    /// resolution fails is logged and dropped; integration errors
    /// (missing handler, bad response) propagate.
    pub fn drain_bag(&mut self) -> EngineResult<()> {
        while !self.bag.is_drained() {
            if self.state.is_over() {
                self.bag.clear_pending();
                break;
            }

            let count = self.state.player_count() as u8;
            let active = self.state.active_player;
            let Some(who) = (0..count)
                .map(|offset| PlayerId::new((active.0 + offset) % count))
                .find(|&p| self.bag.has_pending_for(p))
            else {
                break;
            };

            let names = self.bag.pending_names_for(who);
            let nth = if names.len() == 1 {
                0
            } else {
                let options = names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| ChoiceOption::new(i.to_string(), name.clone()))
                    .collect();
                let picked =
                    self.choices
                        .ask_one(who, "Choose the next ability to resolve", options)?;
                picked.parse::<usize>().unwrap_or(0)
            };

            let Some(trigger) = self.bag.remove_pending_for(who, nth) else {
                continue;
            };

            if trigger.optional
                && !self
                    .choices
                    .confirm(who, format!("Resolve \"{}\"?", trigger.name))?
            {
                debug!(ability = %trigger.name, "optional trigger declined");
                continue;
            }

            info!(ability = %trigger.name, controller = %who, "resolving trigger");
            let mut ctx = EffectContext::new(who).with_source(trigger.card);
            match self.apply_all(&mut ctx, &trigger.effects) {
                Ok(()) => {}
                Err(
                    err @ (EngineError::MissingChoiceHandler(_)
                    | EngineError::InvalidChoiceResponse { .. }),
                ) => return Err(err),
                Err(err) => {
                    warn!(ability = %trigger.name, error = %err, "trigger failed; dropped");
                }
            }
            overlay::recalculate(self.state, self.registry);
        }
        Ok(())
    }

    // === Target resolution ===

    /// May `player` choose `id` as an effect target?
    fn choosable(&self, player: PlayerId, id: InstanceId) -> bool {
        self.state
            .card(id)
            .is_some_and(|card| !card.keywords.ward || card.owner == player)
    }

    /// Resolve a node's card target.
    ///
    /// `Ok(None)` means "no legal target" or "invalid payload pick" —
    /// the handler skips with state untouched.
    fn resolve_target(
        &mut self,
        ctx: &mut EffectContext,
        query: &TargetQuery,
    ) -> EngineResult<Option<InstanceId>> {
        if let Some(target) = ctx.target {
            return Ok(Some(target));
        }

        match query {
            TargetQuery::Source => Ok(ctx.source),

            TargetQuery::Chosen(filter) => {
                let mut candidates = filter.collect(self.state, self.registry, ctx.player);
                candidates.retain(|&id| self.choosable(ctx.player, id));

                if let Some(pick) = ctx.payload.targets.pop_front() {
                    if candidates.contains(&pick) {
                        return Ok(Some(pick));
                    }
                    warn!(pick = %pick, "payload target not legal; effect skipped");
                    return Ok(None);
                }

                if candidates.is_empty() {
                    debug!("no legal target; effect skipped");
                    return Ok(None);
                }

                let options = candidates
                    .iter()
                    .map(|&id| ChoiceOption::new(id.raw().to_string(), self.card_label(id)))
                    .collect();
                let picked = self
                    .choices
                    .ask_one(ctx.player, "Choose a target", options)?;
                let raw = picked.parse::<u32>().map_err(|_| {
                    EngineError::InvalidChoiceResponse {
                        request: crate::core::ChoiceId::new(0),
                        reason: format!("unparseable target id {picked:?}"),
                    }
                })?;
                Ok(Some(InstanceId::new(raw)))
            }
        }
    }

    /// Resolve a player query to concrete players.
    fn resolve_players(
        &mut self,
        ctx: &EffectContext,
        query: &PlayerQuery,
    ) -> EngineResult<Vec<PlayerId>> {
        let count = self.state.player_count() as u8;
        let me = ctx.player;
        let in_turn_order = |from: PlayerId| {
            (0..count).map(move |offset| PlayerId::new((from.0 + offset) % count))
        };

        Ok(match query {
            PlayerQuery::Controller => vec![me],
            PlayerQuery::EachPlayer => in_turn_order(me).collect(),
            PlayerQuery::EachOpponent => in_turn_order(me).filter(|&p| p != me).collect(),
            PlayerQuery::ChosenOpponent => {
                let opponents: Vec<PlayerId> =
                    in_turn_order(me).filter(|&p| p != me).collect();
                if opponents.len() == 1 {
                    opponents
                } else {
                    let options = opponents
                        .iter()
                        .map(|p| ChoiceOption::new(p.0.to_string(), p.to_string()))
                        .collect();
                    let picked = self.choices.ask_one(me, "Choose an opponent", options)?;
                    vec![PlayerId::new(picked.parse::<u8>().unwrap_or(0))]
                }
            }
        })
    }

    fn card_label(&self, id: InstanceId) -> String {
        let name = self
            .state
            .card(id)
            .and_then(|c| self.registry.get(c.card))
            .map_or("?", |d| d.name.as_str());
        format!("{name} ({id})")
    }

    fn recalc(&mut self) {
        overlay::recalculate(self.state, self.registry);
    }

    // === Handlers ===

    fn damage(
        &mut self,
        ctx: &mut EffectContext,
        amount: i64,
        query: &TargetQuery,
    ) -> EngineResult<()> {
        let Some(target) = self.resolve_target(ctx, query)? else {
            return Ok(());
        };
        info!(card = %self.card_label(target), amount, "effect: damage");
        combat::deal_damage(self.state, self.registry, self.bag, ctx.source, target, amount);
        combat::check_banish(self.state, self.registry, self.bag, target, false);
        self.recalc();
        Ok(())
    }

    fn heal(
        &mut self,
        ctx: &mut EffectContext,
        amount: i64,
        query: &TargetQuery,
    ) -> EngineResult<()> {
        let Some(target) = self.resolve_target(ctx, query)? else {
            return Ok(());
        };
        info!(card = %self.card_label(target), amount, "effect: heal");
        if let Some(card) = self.state.card_mut(target) {
            card.heal(amount);
        }
        Ok(())
    }

    fn banish(&mut self, ctx: &mut EffectContext, query: &TargetQuery) -> EngineResult<()> {
        let Some(target) = self.resolve_target(ctx, query)? else {
            return Ok(());
        };
        info!(card = %self.card_label(target), "effect: banish");
        combat::banish(self.state, self.registry, self.bag, target, false);
        self.recalc();
        Ok(())
    }

    fn return_to_hand(
        &mut self,
        ctx: &mut EffectContext,
        query: &TargetQuery,
    ) -> EngineResult<()> {
        let Some(target) = self.resolve_target(ctx, query)? else {
            return Ok(());
        };
        info!(card = %self.card_label(target), "effect: return to hand");
        self.bag.unsubscribe_card(target);
        self.state.move_card(target, Zone::Hand);
        self.recalc();
        Ok(())
    }

    fn put_into_inkwell(
        &mut self,
        ctx: &mut EffectContext,
        query: &TargetQuery,
        exerted: bool,
    ) -> EngineResult<()> {
        let Some(target) = self.resolve_target(ctx, query)? else {
            return Ok(());
        };
        info!(card = %self.card_label(target), "effect: put into inkwell");
        self.bag.unsubscribe_card(target);
        self.state.move_card(target, Zone::Inkwell);
        if let Some(card) = self.state.card_mut(target) {
            card.exerted = exerted;
        }
        self.recalc();
        Ok(())
    }

    fn ready(&mut self, ctx: &mut EffectContext, query: &TargetQuery) -> EngineResult<()> {
        let Some(target) = self.resolve_target(ctx, query)? else {
            return Ok(());
        };
        info!(card = %self.card_label(target), "effect: ready");
        if let Some(card) = self.state.card_mut(target) {
            card.ready();
        }
        Ok(())
    }

    fn exert(&mut self, ctx: &mut EffectContext, query: &TargetQuery) -> EngineResult<()> {
        let Some(target) = self.resolve_target(ctx, query)? else {
            return Ok(());
        };
        info!(card = %self.card_label(target), "effect: exert");
        if let Some(card) = self.state.card_mut(target) {
            card.exert();
        }
        Ok(())
    }

    fn draw(
        &mut self,
        ctx: &mut EffectContext,
        query: &PlayerQuery,
        count: usize,
    ) -> EngineResult<()> {
        for player in self.resolve_players(ctx, query)? {
            for _ in 0..count {
                let Some(drawn) = self.state.draw(player) else {
                    debug!(%player, "draw from empty deck; nothing happens");
                    break;
                };
                info!(%player, card = %self.card_label(drawn), "effect: draw");
                self.bag.emit(
                    self.state,
                    self.registry,
                    GameEvent::for_player(EventKind::CardDrawn, player)
                        .with_target(drawn)
                        .with_amount(1),
                );
            }
        }
        Ok(())
    }

    fn discard(
        &mut self,
        ctx: &mut EffectContext,
        query: &PlayerQuery,
        count: usize,
        random: bool,
    ) -> EngineResult<()> {
        for player in self.resolve_players(ctx, query)? {
            let hand: Vec<InstanceId> = self.state.player(player).zone(Zone::Hand).to_vec();
            let take = count.min(hand.len());
            if take == 0 {
                continue;
            }

            let picked: Vec<InstanceId> = if random {
                self.state.rng.sample(&hand, take)
            } else if player == ctx.player && !ctx.payload.discards.is_empty() {
                let picks: Vec<InstanceId> = ctx
                    .payload
                    .discards
                    .iter()
                    .copied()
                    .filter(|id| hand.contains(id))
                    .take(take)
                    .collect();
                if picks.len() < take {
                    warn!("payload discards not all in hand; asking instead");
                    self.pick_discards(player, &hand, take)?
                } else {
                    picks
                }
            } else {
                self.pick_discards(player, &hand, take)?
            };

            for id in picked {
                info!(%player, card = %self.card_label(id), "effect: discard");
                self.state.move_card(id, Zone::Discard);
                self.bag.emit(
                    self.state,
                    self.registry,
                    GameEvent::for_player(EventKind::CardDiscarded, player).with_target(id),
                );
            }
        }
        Ok(())
    }

    fn pick_discards(
        &mut self,
        player: PlayerId,
        hand: &[InstanceId],
        take: usize,
    ) -> EngineResult<Vec<InstanceId>> {
        let options = hand
            .iter()
            .map(|&id| ChoiceOption::new(id.raw().to_string(), self.card_label(id)))
            .collect();
        let request = self.choices.request(
            player,
            format!("Choose {take} card(s) to discard"),
            options,
            take,
            take,
        );
        let response = self.choices.ask(&request)?;
        Ok(response
            .selected
            .iter()
            .filter_map(|s| s.parse::<u32>().ok())
            .map(InstanceId::new)
            .collect())
    }

    fn gain_lore(
        &mut self,
        ctx: &mut EffectContext,
        query: &PlayerQuery,
        amount: i64,
    ) -> EngineResult<()> {
        for player in self.resolve_players(ctx, query)? {
            info!(%player, amount, "effect: gain lore");
            self.state.gain_lore(player, amount);
            self.bag.emit(
                self.state,
                self.registry,
                GameEvent::for_player(EventKind::LoreGained, player).with_amount(amount),
            );
        }
        Ok(())
    }

    fn lose_lore(
        &mut self,
        ctx: &mut EffectContext,
        query: &PlayerQuery,
        amount: i64,
    ) -> EngineResult<()> {
        for player in self.resolve_players(ctx, query)? {
            info!(%player, amount, "effect: lose lore");
            self.state.lose_lore(player, amount);
        }
        Ok(())
    }

    fn modify_stat(
        &mut self,
        ctx: &mut EffectContext,
        stat: Stat,
        amount: i64,
        duration: Duration,
        query: &TargetQuery,
    ) -> EngineResult<()> {
        let Some(target) = self.resolve_target(ctx, query)? else {
            return Ok(());
        };
        let payload = match stat {
            Stat::Strength => ContinuousPayload::Stats {
                strength: amount,
                willpower: 0,
                lore: 0,
            },
            Stat::Willpower => ContinuousPayload::Stats {
                strength: 0,
                willpower: amount,
                lore: 0,
            },
            Stat::Lore => ContinuousPayload::Stats {
                strength: 0,
                willpower: 0,
                lore: amount,
            },
        };
        info!(card = %self.card_label(target), ?stat, amount, "effect: modify stat");
        self.push_effect(ctx, target, duration, payload);
        Ok(())
    }

    fn grant_keyword(
        &mut self,
        ctx: &mut EffectContext,
        grant: crate::cards::KeywordGrant,
        duration: Duration,
        query: &TargetQuery,
    ) -> EngineResult<()> {
        let Some(target) = self.resolve_target(ctx, query)? else {
            return Ok(());
        };
        info!(card = %self.card_label(target), grant = %grant, "effect: grant keyword");
        self.push_effect(ctx, target, duration, ContinuousPayload::Keyword(grant));
        Ok(())
    }

    fn restrict(
        &mut self,
        ctx: &mut EffectContext,
        restriction: crate::overlay::RestrictionKind,
        duration: Duration,
        query: &TargetQuery,
    ) -> EngineResult<()> {
        let Some(target) = self.resolve_target(ctx, query)? else {
            return Ok(());
        };
        info!(card = %self.card_label(target), "effect: restriction");
        self.push_effect(
            ctx,
            target,
            duration,
            ContinuousPayload::Restriction(restriction),
        );
        Ok(())
    }

    fn push_effect(
        &mut self,
        ctx: &EffectContext,
        target: InstanceId,
        duration: Duration,
        payload: ContinuousPayload,
    ) {
        let mut effect = ContinuousEffect::new(
            ctx.player,
            EffectTarget::one(target),
            duration,
            payload,
        );
        if let Some(source) = ctx.source {
            effect = effect.with_source(source);
        }
        self.state.add_effect(effect);
        self.recalc();
    }

    fn prevent_damage(
        &mut self,
        ctx: &mut EffectContext,
        amount: Option<i64>,
        duration: Duration,
        query: &TargetQuery,
    ) -> EngineResult<()> {
        let Some(target) = self.resolve_target(ctx, query)? else {
            return Ok(());
        };
        info!(card = %self.card_label(target), ?amount, "effect: damage shield");
        if let Some(card) = self.state.card_mut(target) {
            card.shields.push(DamageShield { amount, duration });
        }
        Ok(())
    }

    fn for_each(
        &mut self,
        ctx: &mut EffectContext,
        filter: &super::target::CardFilter,
        effect: &EffectNode,
    ) -> EngineResult<()> {
        // Area expansion: N single-target invocations of the same node,
        // with the target pre-resolved. Not a choice, so Ward does not
        // apply.
        let matching = filter.collect(self.state, self.registry, ctx.player);
        debug!(count = matching.len(), "effect: area expansion");
        for target in matching {
            let mut child = EffectContext::new(ctx.player).with_target(target);
            child.source = ctx.source;
            self.apply(&mut child, effect)?;
        }
        Ok(())
    }

    fn conditional(
        &mut self,
        ctx: &mut EffectContext,
        condition: &Condition,
        then: &[EffectNode],
        otherwise: &[EffectNode],
    ) -> EngineResult<()> {
        let holds = condition.evaluate(self.state, self.registry, ctx.player, ctx.source);
        debug!(holds, "effect: conditional");
        if holds {
            self.apply_all(ctx, then)
        } else {
            self.apply_all(ctx, otherwise)
        }
    }

    fn optional(
        &mut self,
        ctx: &mut EffectContext,
        prompt: &str,
        effects: &[EffectNode],
    ) -> EngineResult<()> {
        let accepted = match ctx.payload.accept_optional.take() {
            Some(answer) => answer,
            None => self.choices.confirm(ctx.player, prompt)?,
        };
        if accepted {
            self.apply_all(ctx, effects)
        } else {
            debug!(prompt, "optional effect declined");
            Ok(())
        }
    }

    fn modal(
        &mut self,
        ctx: &mut EffectContext,
        prompt: &str,
        modes: &[EffectMode],
        picks: usize,
    ) -> EngineResult<()> {
        let picks = picks.min(modes.len());

        let mut chosen: Vec<usize> = Vec::new();
        while chosen.len() < picks {
            let Some(mode) = ctx.payload.modes.pop_front() else {
                break;
            };
            if mode < modes.len() && !chosen.contains(&mode) {
                chosen.push(mode);
            }
        }

        if chosen.len() < picks {
            let options = modes
                .iter()
                .enumerate()
                .filter(|(i, _)| !chosen.contains(i))
                .map(|(i, mode)| ChoiceOption::new(i.to_string(), mode.label.clone()))
                .collect();
            let request =
                self.choices
                    .request(ctx.player, prompt, options, picks - chosen.len(), picks - chosen.len());
            let response = self.choices.ask(&request)?;
            chosen.extend(
                response
                    .selected
                    .iter()
                    .filter_map(|s| s.parse::<usize>().ok()),
            );
        }

        // Modes resolve in listed order regardless of pick order.
        chosen.sort_unstable();
        for index in chosen {
            if let Some(mode) = modes.get(index) {
                info!(mode = %mode.label, "effect: mode");
                self.apply_all(ctx, &mode.effects)?;
            }
        }
        Ok(())
    }
}

//! The action executor.
//!
//! `submit` accepts exactly one action for the active player during the
//! Main phase. Validation and execution are split into `check_*` and
//! `do_*` pairs; the legal-action enumerator calls the same `check_*`
//! functions, which is what keeps the two exactly consistent.
//!
//! Every applied action ends with the same checkpoint: drain the bag,
//! recalculate the overlay. Rejections mutate nothing.

use tracing::{debug, info};

use crate::cards::CardKind;
use crate::choices::ChoiceOption;
use crate::combat;
use crate::core::{InstanceId, PlayerId, Zone};
use crate::effects::{ChoicePayload, EffectContext, EffectNode, Interpreter, PlayerQuery};
use crate::error::EngineResult;
use crate::events::{EventKind, GameEvent};
use crate::overlay::{self, ContinuousEffect, ContinuousPayload, Duration, EffectTarget};

use super::action::{Action, ActionOutcome, PlayMode, RejectReason};
use super::Game;

impl Game {
    /// Submit one action for `player`.
    ///
    /// Rule violations come back as `Rejected` with no mutation;
    /// integration problems (missing choice handler, invalid response)
    /// are errors.
    pub fn submit(&mut self, player: PlayerId, action: &Action) -> EngineResult<ActionOutcome> {
        if let Err(reason) = self.gate(player) {
            debug!(%player, %reason, "action gated");
            return Ok(ActionOutcome::Rejected(reason));
        }

        let checked: Result<(), RejectReason> = match action {
            Action::Ink { card } => self.check_ink(player, *card),
            Action::Play { card, mode, .. } => self.check_play(player, *card, mode).map(|_| ()),
            Action::Quest { card } => self.check_quest(player, *card),
            Action::Challenge { attacker, target } => {
                self.check_challenge(player, *attacker, *target)
            }
            Action::UseAbility { card, ability, .. } => {
                self.check_use_ability(player, *card, *ability)
            }
            Action::SingSong { song, singers, .. } => self.check_sing(player, *song, singers),
            Action::Concede | Action::PassTurn => Ok(()),
        };
        if let Err(reason) = checked {
            debug!(%player, %reason, "action rejected");
            return Ok(ActionOutcome::Rejected(reason));
        }

        match action {
            Action::Ink { card } => self.do_ink(player, *card),
            Action::Play {
                card,
                mode,
                payload,
            } => self.do_play(player, *card, mode, payload.clone())?,
            Action::Quest { card } => self.do_quest(player, *card)?,
            Action::Challenge { attacker, target } => {
                combat::resolve_challenge(
                    &mut self.state,
                    &self.registry,
                    &mut self.bag,
                    *attacker,
                    *target,
                );
            }
            Action::UseAbility {
                card,
                ability,
                payload,
            } => self.do_use_ability(player, *card, *ability, payload.clone())?,
            Action::SingSong {
                song,
                singers,
                payload,
            } => self.do_sing(player, *song, singers, payload.clone())?,
            Action::Concede => {
                info!(%player, "concedes");
                self.state.eliminate(player);
                if !self.state.is_over() {
                    self.pass_turn()?;
                }
                return Ok(ActionOutcome::Applied);
            }
            Action::PassTurn => {
                self.pass_turn()?;
                return Ok(ActionOutcome::Applied);
            }
        }

        // Checkpoint: collected triggers resolve, stats recalculate.
        self.drain_and_recalc()?;
        Ok(ActionOutcome::Applied)
    }

    // === Gating and checks (shared with the enumerator) ===

    pub(crate) fn gate(&self, player: PlayerId) -> Result<(), RejectReason> {
        if self.state.is_over() {
            return Err(RejectReason::GameOver);
        }
        if self.state.player(player).eliminated || player != self.state.active_player {
            return Err(RejectReason::NotActivePlayer);
        }
        if !self.state.phase.accepts_actions() {
            return Err(RejectReason::WrongPhase);
        }
        Ok(())
    }

    pub(crate) fn check_ink(
        &self,
        player: PlayerId,
        card: InstanceId,
    ) -> Result<(), RejectReason> {
        let instance = self.state.card(card).ok_or(RejectReason::UnknownCard)?;
        if instance.owner != player || instance.zone != Zone::Hand {
            return Err(RejectReason::NotInHand);
        }
        let def = self
            .registry
            .get(instance.card)
            .ok_or(RejectReason::UnknownCard)?;
        if !def.inkable {
            return Err(RejectReason::NotInkable);
        }
        if self.state.player(player).inked_this_turn {
            return Err(RejectReason::AlreadyInkedThisTurn);
        }
        Ok(())
    }

    pub(crate) fn check_play(
        &self,
        player: PlayerId,
        card: InstanceId,
        mode: &PlayMode,
    ) -> Result<i64, RejectReason> {
        let instance = self.state.card(card).ok_or(RejectReason::UnknownCard)?;
        if instance.owner != player || instance.zone != Zone::Hand {
            return Err(RejectReason::NotInHand);
        }
        let def = self
            .registry
            .get(instance.card)
            .ok_or(RejectReason::UnknownCard)?;

        let cost = match mode {
            PlayMode::Ink => def.cost,
            PlayMode::Shift { over } => {
                let shift_cost = def
                    .keywords
                    .shift
                    .ok_or(RejectReason::ShiftTargetInvalid)?;
                if def.kind != CardKind::Character {
                    return Err(RejectReason::NotACharacter);
                }
                let over_card = self
                    .state
                    .card(*over)
                    .ok_or(RejectReason::ShiftTargetInvalid)?;
                if over_card.owner != player || over_card.zone != Zone::Play {
                    return Err(RejectReason::ShiftTargetInvalid);
                }
                let over_def = self
                    .registry
                    .get(over_card.card)
                    .ok_or(RejectReason::ShiftTargetInvalid)?;
                if over_def.kind != CardKind::Character || over_def.name != def.name {
                    return Err(RejectReason::ShiftTargetInvalid);
                }
                shift_cost
            }
        };

        if self.state.ready_ink(player) < cost {
            return Err(RejectReason::InsufficientInk);
        }
        Ok(cost)
    }

    pub(crate) fn check_quest(
        &self,
        player: PlayerId,
        card: InstanceId,
    ) -> Result<(), RejectReason> {
        let instance = self.state.card(card).ok_or(RejectReason::UnknownCard)?;
        if instance.owner != player || instance.zone != Zone::Play {
            return Err(RejectReason::NotInPlay);
        }
        let def = self
            .registry
            .get(instance.card)
            .ok_or(RejectReason::UnknownCard)?;
        if def.kind != CardKind::Character {
            return Err(RejectReason::NotACharacter);
        }
        if !instance.is_ready() {
            return Err(RejectReason::NotReady);
        }
        if !instance.is_dry(self.state.turn_number) && !instance.keywords.rush {
            return Err(RejectReason::InkNotDry);
        }
        if instance.restrictions.cant_quest {
            return Err(RejectReason::CannotQuest);
        }
        if instance.keywords.reckless && self.any_legal_challenge(card) {
            return Err(RejectReason::MustChallenge);
        }
        Ok(())
    }

    /// Does this character have at least one legal challenge target?
    pub(crate) fn any_legal_challenge(&self, attacker: InstanceId) -> bool {
        let Some(owner) = self.state.card(attacker).map(|c| c.owner) else {
            return false;
        };
        self.state
            .players()
            .filter(|(p, _)| *p != owner)
            .flat_map(|(_, ps)| ps.zone(Zone::Play).iter().copied())
            .any(|target| {
                combat::can_challenge(&self.state, &self.registry, attacker, target).is_ok()
            })
    }

    pub(crate) fn check_challenge(
        &self,
        player: PlayerId,
        attacker: InstanceId,
        target: InstanceId,
    ) -> Result<(), RejectReason> {
        let instance = self.state.card(attacker).ok_or(RejectReason::UnknownCard)?;
        if instance.owner != player || instance.zone != Zone::Play {
            return Err(RejectReason::NotInPlay);
        }
        combat::can_challenge(&self.state, &self.registry, attacker, target)
            .map_err(RejectReason::Challenge)
    }

    pub(crate) fn check_use_ability(
        &self,
        player: PlayerId,
        card: InstanceId,
        index: usize,
    ) -> Result<(), RejectReason> {
        let instance = self.state.card(card).ok_or(RejectReason::UnknownCard)?;
        if instance.owner != player || instance.zone != Zone::Play {
            return Err(RejectReason::NotInPlay);
        }
        let def = self
            .registry
            .get(instance.card)
            .ok_or(RejectReason::UnknownCard)?;
        let ability = def
            .abilities
            .get(index)
            .and_then(|a| a.as_activated())
            .ok_or(RejectReason::NoSuchAbility)?;

        if instance.uses_this_turn(index, self.state.turn_number) >= ability.uses_per_turn {
            return Err(RejectReason::AbilityExhausted);
        }
        if ability.cost.exert {
            if !instance.is_ready() {
                return Err(RejectReason::NotReady);
            }
            if def.kind == CardKind::Character
                && !instance.is_dry(self.state.turn_number)
                && !instance.keywords.rush
            {
                return Err(RejectReason::InkNotDry);
            }
        }
        if self.state.ready_ink(player) < ability.cost.ink {
            return Err(RejectReason::InsufficientInk);
        }
        if (self.state.player(player).zone_size(Zone::Hand) as u32) < ability.cost.discard {
            return Err(RejectReason::CostNotPayable);
        }
        Ok(())
    }

    pub(crate) fn check_sing(
        &self,
        player: PlayerId,
        song: InstanceId,
        singers: &[InstanceId],
    ) -> Result<(), RejectReason> {
        let song_card = self.state.card(song).ok_or(RejectReason::UnknownCard)?;
        if song_card.owner != player || song_card.zone != Zone::Hand {
            return Err(RejectReason::NotInHand);
        }
        let song_def = self
            .registry
            .get(song_card.card)
            .ok_or(RejectReason::UnknownCard)?;
        if song_def.kind != CardKind::Song {
            return Err(RejectReason::NotASong);
        }

        if singers.is_empty() || singers.len() > 2 {
            return Err(RejectReason::InvalidSingers);
        }
        if singers.len() == 2 && singers[0] == singers[1] {
            return Err(RejectReason::InvalidSingers);
        }

        let mut total = 0;
        for &singer in singers {
            let instance = self.state.card(singer).ok_or(RejectReason::UnknownCard)?;
            if instance.owner != player || instance.zone != Zone::Play {
                return Err(RejectReason::InvalidSingers);
            }
            let def = self
                .registry
                .get(instance.card)
                .ok_or(RejectReason::UnknownCard)?;
            if def.kind != CardKind::Character {
                return Err(RejectReason::InvalidSingers);
            }
            if !instance.is_ready() {
                return Err(RejectReason::NotReady);
            }
            // Singing is never Rush-exempt: a wet character cannot sing.
            if !instance.is_dry(self.state.turn_number) {
                return Err(RejectReason::InkNotDry);
            }
            total += sing_value(def.cost, &instance.keywords);
        }

        match singers.len() {
            1 => {
                if total < song_def.cost {
                    return Err(RejectReason::CannotSing);
                }
            }
            _ => {
                let Some(needed) = song_def.keywords.sing_together else {
                    return Err(RejectReason::InvalidSingers);
                };
                if total < needed {
                    return Err(RejectReason::CannotSing);
                }
            }
        }
        Ok(())
    }

    // === Execution ===

    fn do_ink(&mut self, player: PlayerId, card: InstanceId) {
        info!(%player, card = %card, "inks a card");
        self.state.move_card(card, Zone::Inkwell);
        self.state.player_mut(player).inked_this_turn = true;
        self.bag.emit(
            &self.state,
            &self.registry,
            GameEvent::for_player(EventKind::CardInked, player).with_target(card),
        );
    }

    fn do_play(
        &mut self,
        player: PlayerId,
        card: InstanceId,
        mode: &PlayMode,
        payload: ChoicePayload,
    ) -> EngineResult<()> {
        // Re-derive the validated cost; check_play cannot fail here.
        let cost = self
            .check_play(player, card, mode)
            .unwrap_or_default();
        self.state.pay_ink(player, cost);

        let Some(instance) = self.state.card(card) else {
            return Ok(());
        };
        let Some(def) = self.registry.get(instance.card).cloned() else {
            return Ok(());
        };
        info!(%player, name = %def.name, cost, "plays a card");

        match mode {
            PlayMode::Ink if def.kind.is_permanent() => {
                self.state.move_card(card, Zone::Play);
                let turn = self.state.turn_number;
                if let Some(instance) = self.state.card_mut(card) {
                    instance.turn_played = Some(turn);
                }
                self.bag.subscribe_card(card, player, &def);
                overlay::recalculate(&mut self.state, &self.registry);
                self.bag.emit(
                    &self.state,
                    &self.registry,
                    GameEvent::for_card(EventKind::CardPlayed, card, player),
                );
            }
            PlayMode::Ink => {
                // Actions and songs: announce, resolve, discard.
                self.bag.emit(
                    &self.state,
                    &self.registry,
                    GameEvent::for_card(EventKind::CardPlayed, card, player),
                );
                self.resolve_play_script(player, card, &def, payload)?;
                self.state.move_card(card, Zone::Discard);
            }
            PlayMode::Shift { over } => {
                // The shifted character takes over the old one's board
                // state: exertion, damage, drying status, and its stack.
                let inherited = self.state.card_mut(*over).map(|o| {
                    (
                        o.damage,
                        o.exerted,
                        o.turn_played,
                        std::mem::take(&mut o.under),
                    )
                });
                self.bag.unsubscribe_card(*over);

                self.state.move_card(card, Zone::Play);
                if let Some((damage, exerted, turn_played, under)) = inherited {
                    if let Some(instance) = self.state.card_mut(card) {
                        instance.damage = damage;
                        instance.exerted = exerted;
                        instance.turn_played = turn_played;
                        instance.under = under;
                    }
                }
                self.state.tuck_under(card, *over)?;
                self.bag.subscribe_card(card, player, &def);
                overlay::recalculate(&mut self.state, &self.registry);
                self.bag.emit(
                    &self.state,
                    &self.registry,
                    GameEvent::for_card(EventKind::CardPlayed, card, player),
                );
            }
        }
        Ok(())
    }

    /// Resolve a non-permanent's on-play effects: the effect lists of
    /// its triggered abilities listening for `CardPlayed`.
    fn resolve_play_script(
        &mut self,
        player: PlayerId,
        card: InstanceId,
        def: &crate::cards::CardDefinition,
        payload: ChoicePayload,
    ) -> EngineResult<()> {
        let script: Vec<EffectNode> = def
            .abilities
            .iter()
            .filter_map(|a| a.as_triggered())
            .filter(|t| t.events.contains(&EventKind::CardPlayed))
            .flat_map(|t| t.effects.clone())
            .collect();
        if script.is_empty() {
            return Ok(());
        }

        let mut ctx = EffectContext::new(player)
            .with_source(card)
            .with_payload(payload);
        let mut interp = Interpreter::new(
            &mut self.state,
            &self.registry,
            &mut self.bag,
            &mut self.choices,
        );
        interp.apply_all(&mut ctx, &script)
    }

    fn do_quest(&mut self, player: PlayerId, card: InstanceId) -> EngineResult<()> {
        let (lore, strength, has_support) = {
            let Some(instance) = self.state.card_mut(card) else {
                return Ok(());
            };
            instance.exert();
            (
                instance.lore,
                instance.strength,
                instance.keywords.support,
            )
        };

        info!(%player, card = %card, lore, "quests");
        self.state.gain_lore(player, lore);
        self.bag.emit(
            &self.state,
            &self.registry,
            GameEvent::for_card(EventKind::CharacterQuested, card, player).with_amount(lore),
        );
        self.bag.emit(
            &self.state,
            &self.registry,
            GameEvent::for_player(EventKind::LoreGained, player).with_amount(lore),
        );

        if has_support && !self.state.is_over() {
            self.offer_support(player, card, strength)?;
        }
        Ok(())
    }

    /// Support: when this character quests, its strength may be lent to
    /// another of its controller's characters until end of turn.
    fn offer_support(
        &mut self,
        player: PlayerId,
        card: InstanceId,
        strength: i64,
    ) -> EngineResult<()> {
        let candidates: Vec<InstanceId> = self
            .state
            .player(player)
            .zone(Zone::Play)
            .iter()
            .copied()
            .filter(|&id| id != card)
            .filter(|&id| {
                self.state.card(id).is_some_and(|c| {
                    self.registry
                        .get(c.card)
                        .is_some_and(|d| d.kind == CardKind::Character)
                })
            })
            .collect();
        if candidates.is_empty() || strength <= 0 {
            return Ok(());
        }

        if !self.choices.confirm(player, "Use Support?")? {
            return Ok(());
        }
        let options = candidates
            .iter()
            .map(|&id| {
                let name = self
                    .state
                    .card(id)
                    .and_then(|c| self.registry.get(c.card))
                    .map_or("?", |d| d.name.as_str());
                ChoiceOption::new(id.raw().to_string(), format!("{name} ({id})"))
            })
            .collect();
        let picked = self
            .choices
            .ask_one(player, "Choose a character to support", options)?;
        let Some(target) = picked.parse::<u32>().ok().map(InstanceId::new) else {
            return Ok(());
        };

        info!(supporter = %card, recipient = %target, strength, "support grant");
        self.state.add_effect(
            ContinuousEffect::new(
                player,
                EffectTarget::one(target),
                Duration::EndOfTurn,
                ContinuousPayload::strength(strength),
            )
            .with_source(card),
        );
        overlay::recalculate(&mut self.state, &self.registry);
        Ok(())
    }

    fn do_use_ability(
        &mut self,
        player: PlayerId,
        card: InstanceId,
        index: usize,
        payload: ChoicePayload,
    ) -> EngineResult<()> {
        let Some(instance) = self.state.card(card) else {
            return Ok(());
        };
        let Some(ability) = self
            .registry
            .get(instance.card)
            .and_then(|d| d.abilities.get(index))
            .and_then(|a| a.as_activated())
            .cloned()
        else {
            return Ok(());
        };

        info!(%player, card = %card, ability = %ability.name, "uses ability");

        // Ledger first: re-entrant resolution cannot use it again this
        // turn.
        let turn = self.state.turn_number;
        if let Some(instance) = self.state.card_mut(card) {
            instance.record_ability_use(index, turn);
        }

        // Pay the cost.
        if ability.cost.exert {
            if let Some(instance) = self.state.card_mut(card) {
                instance.exert();
            }
        }
        self.state.pay_ink(player, ability.cost.ink);

        let mut ctx = EffectContext::new(player)
            .with_source(card)
            .with_payload(payload);

        if ability.cost.discard > 0 {
            let discard = EffectNode::Discard {
                player: PlayerQuery::Controller,
                count: ability.cost.discard as usize,
                random: false,
            };
            let mut interp = Interpreter::new(
                &mut self.state,
                &self.registry,
                &mut self.bag,
                &mut self.choices,
            );
            interp.apply(&mut ctx, &discard)?;
        }
        if ability.cost.banish_self {
            combat::banish(&mut self.state, &self.registry, &mut self.bag, card, false);
        }

        let mut interp = Interpreter::new(
            &mut self.state,
            &self.registry,
            &mut self.bag,
            &mut self.choices,
        );
        interp.apply_all(&mut ctx, &ability.effects)
    }

    fn do_sing(
        &mut self,
        player: PlayerId,
        song: InstanceId,
        singers: &[InstanceId],
        payload: ChoicePayload,
    ) -> EngineResult<()> {
        let Some(def) = self
            .state
            .card(song)
            .and_then(|c| self.registry.get(c.card))
            .cloned()
        else {
            return Ok(());
        };

        for &singer in singers {
            if let Some(instance) = self.state.card_mut(singer) {
                instance.exert();
            }
        }
        info!(%player, song = %def.name, singers = singers.len(), "sings");

        self.bag.emit(
            &self.state,
            &self.registry,
            GameEvent::for_card(EventKind::SongSung, song, player),
        );
        self.bag.emit(
            &self.state,
            &self.registry,
            GameEvent::for_card(EventKind::CardPlayed, song, player),
        );

        self.resolve_play_script(player, song, &def, payload)?;
        self.state.move_card(song, Zone::Discard);
        Ok(())
    }
}

/// The value a character sings for: its cost, improved by Singer.
fn sing_value(cost: i64, keywords: &crate::cards::Keywords) -> i64 {
    keywords.singer.map_or(cost, |singer| singer.max(cost))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sing_value() {
        let plain = crate::cards::Keywords::default();
        assert_eq!(sing_value(3, &plain), 3);

        let singer = crate::cards::Keywords::default().with_singer(5);
        assert_eq!(sing_value(3, &singer), 5);

        // Singer never lowers the value below cost.
        let weak_singer = crate::cards::Keywords::default().with_singer(2);
        assert_eq!(sing_value(4, &weak_singer), 4);
    }
}

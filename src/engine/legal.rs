//! Legal-action enumeration.
//!
//! The sole contract UIs and automated players build on: everything
//! returned here would be accepted by `submit`, and everything `submit`
//! would accept for the same state is returned. Both sides call the
//! same `check_*` functions, so they cannot drift apart.

use smallvec::SmallVec;

use crate::cards::CardKind;
use crate::core::{InstanceId, PlayerId, Zone};
use crate::effects::ChoicePayload;

use super::action::{Action, PlayMode};
use super::Game;

impl Game {
    /// Enumerate every action `submit` would currently accept for
    /// `player`, in a deterministic order. Empty once the game is over
    /// or outside the player's Main phase.
    #[must_use]
    pub fn legal_actions(&self, player: PlayerId) -> Vec<Action> {
        if self.gate(player).is_err() {
            return Vec::new();
        }

        let mut actions = Vec::new();
        let hand: Vec<InstanceId> = self.state.player(player).zone(Zone::Hand).to_vec();
        let in_play: Vec<InstanceId> = self.state.player(player).zone(Zone::Play).to_vec();

        // Ink
        for &card in &hand {
            if self.check_ink(player, card).is_ok() {
                actions.push(Action::Ink { card });
            }
        }

        // Play (normal cost, then shift over each same-name character)
        for &card in &hand {
            if self.check_play(player, card, &PlayMode::Ink).is_ok() {
                actions.push(Action::Play {
                    card,
                    mode: PlayMode::Ink,
                    payload: ChoicePayload::new(),
                });
            }
            for &over in &in_play {
                let mode = PlayMode::Shift { over };
                if self.check_play(player, card, &mode).is_ok() {
                    actions.push(Action::Play {
                        card,
                        mode,
                        payload: ChoicePayload::new(),
                    });
                }
            }
        }

        // Quest
        for &card in &in_play {
            if self.check_quest(player, card).is_ok() {
                actions.push(Action::Quest { card });
            }
        }

        // Challenge
        for &attacker in &in_play {
            for (opponent, ps) in self.state.players() {
                if opponent == player {
                    continue;
                }
                for &target in ps.zone(Zone::Play) {
                    if self.check_challenge(player, attacker, target).is_ok() {
                        actions.push(Action::Challenge { attacker, target });
                    }
                }
            }
        }

        // Activated abilities
        for &card in &in_play {
            let Some(count) = self
                .state
                .card(card)
                .and_then(|c| self.registry.get(c.card))
                .map(|d| d.abilities.len())
            else {
                continue;
            };
            for index in 0..count {
                if self.check_use_ability(player, card, index).is_ok() {
                    actions.push(Action::UseAbility {
                        card,
                        ability: index,
                        payload: ChoicePayload::new(),
                    });
                }
            }
        }

        // Songs
        let songs: Vec<InstanceId> = hand
            .iter()
            .copied()
            .filter(|&card| {
                self.state
                    .card(card)
                    .and_then(|c| self.registry.get(c.card))
                    .is_some_and(|d| d.kind == CardKind::Song)
            })
            .collect();
        for &song in &songs {
            for &singer in &in_play {
                if self.check_sing(player, song, &[singer]).is_ok() {
                    actions.push(Action::SingSong {
                        song,
                        singers: SmallVec::from_slice(&[singer]),
                        payload: ChoicePayload::new(),
                    });
                }
            }
            // Sing Together pairs
            for (i, &a) in in_play.iter().enumerate() {
                for &b in &in_play[i + 1..] {
                    if self.check_sing(player, song, &[a, b]).is_ok() {
                        actions.push(Action::SingSong {
                            song,
                            singers: SmallVec::from_slice(&[a, b]),
                            payload: ChoicePayload::new(),
                        });
                    }
                }
            }
        }

        actions.push(Action::Concede);
        actions.push(Action::PassTurn);
        actions
    }
}

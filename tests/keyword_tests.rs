//! Keyword mechanics exercised through the public action interface:
//! Ward, Resist, Evasive, Rush, Challenger, Support, Singer, Sing
//! Together, Shift, Reckless.

use glimmer_engine::{
    AbilityDefinition, Action, ActionOutcome, AutoChoiceHandler, CardDefinition, CardId, CardKind,
    CardRegistry, EffectNode, EventKind, Game, GameBuilder, InstanceId, Keywords, PlayMode,
    PlayerId, RejectReason, ScriptedChoiceHandler, TargetQuery, TriggeredAbility, Zone,
};
use smallvec::SmallVec;

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);

const SCOUT: CardId = CardId::new(1);
const WARDED: CardId = CardId::new(2);
const RESISTANT: CardId = CardId::new(3);
const SHADE: CardId = CardId::new(4);
const RUSHER: CardId = CardId::new(5);
const DUELIST: CardId = CardId::new(6);
const HELPER: CardId = CardId::new(7);
const BARD: CardId = CardId::new(8);
const FIREBALL: CardId = CardId::new(9);
const ANTHEM: CardId = CardId::new(10);
const MAGE: CardId = CardId::new(11);
const GREATER_MAGE: CardId = CardId::new(12);
const HOTHEAD: CardId = CardId::new(13);

fn registry() -> CardRegistry {
    let mut registry = CardRegistry::new();
    registry.register(
        CardDefinition::new(SCOUT, "Village Scout", CardKind::Character)
            .with_cost(1)
            .inkable()
            .with_stats(2, 5, 1),
    );
    registry.register(
        CardDefinition::new(WARDED, "Veiled Fox", CardKind::Character)
            .with_cost(2)
            .inkable()
            .with_stats(1, 3, 2)
            .with_keywords(Keywords::default().ward()),
    );
    registry.register(
        CardDefinition::new(RESISTANT, "Stone Golem", CardKind::Character)
            .with_cost(4)
            .with_stats(2, 6, 1)
            .with_keywords(Keywords::default().with_resist(2)),
    );
    registry.register(
        CardDefinition::new(SHADE, "Night Shade", CardKind::Character)
            .with_cost(3)
            .with_stats(2, 3, 2)
            .with_keywords(Keywords::default().evasive()),
    );
    registry.register(
        CardDefinition::new(RUSHER, "Eager Recruit", CardKind::Character)
            .with_cost(2)
            .with_stats(2, 2, 1)
            .with_keywords(Keywords::default().rush()),
    );
    registry.register(
        CardDefinition::new(DUELIST, "Arena Duelist", CardKind::Character)
            .with_cost(3)
            .with_stats(1, 4, 1)
            .with_keywords(Keywords::default().with_challenger(3)),
    );
    registry.register(
        CardDefinition::new(HELPER, "Kind Helper", CardKind::Character)
            .with_cost(2)
            .with_stats(2, 3, 1)
            .with_keywords(Keywords::default().support()),
    );
    registry.register(
        CardDefinition::new(BARD, "Traveling Bard", CardKind::Character)
            .with_cost(2)
            .with_stats(1, 2, 1)
            .with_keywords(Keywords::default().with_singer(5)),
    );
    registry.register(
        CardDefinition::new(FIREBALL, "Sudden Blaze", CardKind::Song)
            .with_cost(4)
            .with_ability(AbilityDefinition::Triggered(
                TriggeredAbility::new("Blaze", EventKind::CardPlayed).with_effect(
                    EffectNode::Damage {
                        amount: 2,
                        target: TargetQuery::chosen_opposing_character(),
                    },
                ),
            )),
    );
    registry.register(
        CardDefinition::new(ANTHEM, "Marching Anthem", CardKind::Song)
            .with_cost(6)
            .with_keywords(Keywords::default().with_sing_together(6))
            .with_ability(AbilityDefinition::Triggered(
                TriggeredAbility::new("Anthem", EventKind::CardPlayed)
                    .with_effect(EffectNode::gain_lore(2)),
            )),
    );
    registry.register(
        CardDefinition::new(MAGE, "Arcane Mage", CardKind::Character)
            .with_cost(2)
            .inkable()
            .with_stats(1, 3, 1),
    );
    registry.register(
        CardDefinition::new(GREATER_MAGE, "Arcane Mage", CardKind::Character)
            .with_cost(5)
            .with_stats(3, 5, 2)
            .with_keywords(Keywords::default().with_shift(3)),
    );
    registry.register(
        CardDefinition::new(HOTHEAD, "Hotheaded Brawler", CardKind::Character)
            .with_cost(2)
            .with_stats(3, 3, 2)
            .with_keywords(Keywords::default().reckless()),
    );
    registry
}

fn build_game() -> Game {
    let deck: Vec<CardId> = vec![SCOUT; 15];
    let mut game = GameBuilder::new()
        .with_registry(registry())
        .add_deck(deck.clone())
        .add_deck(deck)
        .with_starting_hand(0)
        .with_seed(21)
        .build()
        .unwrap();
    game.register_choice_handler(P0, Box::new(AutoChoiceHandler));
    game.register_choice_handler(P1, Box::new(AutoChoiceHandler));
    game.begin().unwrap();
    game
}

fn give_ink(game: &mut Game, player: PlayerId, amount: usize) {
    for _ in 0..amount {
        game.place_card(player, SCOUT, Zone::Inkwell).unwrap();
    }
}

/// Ward: an opposing warded card never resolves as the target of a
/// chosen effect, but a challenge reaches it.
#[test]
fn test_ward_blocks_effects_not_challenges() {
    let mut game = build_game();
    let fox = game.place_card(P1, WARDED, Zone::Play).unwrap();
    let blaze = game.place_card(P0, FIREBALL, Zone::Hand).unwrap();
    give_ink(&mut game, P0, 4);

    // The song resolves, but with no choosable target it fizzles.
    assert!(game.submit(P0, &Action::play(blaze)).unwrap().is_applied());
    assert_eq!(game.state().card(fox).unwrap().damage, 0);

    // A challenge is not a chosen effect; Ward does not protect.
    let attacker = game.place_card(P0, SCOUT, Zone::Play).unwrap();
    game.state_mut().card_mut(fox).unwrap().exert();
    assert!(game
        .submit(P0, &Action::Challenge { attacker, target: fox })
        .unwrap()
        .is_applied());
    assert_eq!(game.state().card(fox).unwrap().damage, 2);
}

/// Resist: incoming damage D lands as max(0, D - R).
#[test]
fn test_resist_mitigates_challenge_damage() {
    let mut game = build_game();
    let attacker = game.place_card(P0, SCOUT, Zone::Play).unwrap();
    let golem = game.place_card(P1, RESISTANT, Zone::Play).unwrap();
    game.state_mut().card_mut(golem).unwrap().exert();

    assert!(game
        .submit(P0, &Action::Challenge { attacker, target: golem })
        .unwrap()
        .is_applied());

    // Attacker strength 2 against Resist 2: nothing lands. The golem's
    // 2 strength lands in full on the scout.
    assert_eq!(game.state().card(golem).unwrap().damage, 0);
    assert_eq!(game.state().card(attacker).unwrap().damage, 2);
}

/// Evasive: only Evasive attackers may challenge an Evasive target.
#[test]
fn test_evasive_gate() {
    let mut game = build_game();
    let scout = game.place_card(P0, SCOUT, Zone::Play).unwrap();
    let shade = game.place_card(P1, SHADE, Zone::Play).unwrap();
    game.state_mut().card_mut(shade).unwrap().exert();

    let outcome = game
        .submit(P0, &Action::Challenge { attacker: scout, target: shade })
        .unwrap();
    assert!(matches!(
        outcome,
        ActionOutcome::Rejected(RejectReason::Challenge(_))
    ));

    let own_shade = game.place_card(P0, SHADE, Zone::Play).unwrap();
    assert!(game
        .submit(P0, &Action::Challenge { attacker: own_shade, target: shade })
        .unwrap()
        .is_applied());
}

/// Rush: may challenge the turn it is played, but still cannot quest.
#[test]
fn test_rush_challenges_wet() {
    let mut game = build_game();
    let target = game.place_card(P1, SCOUT, Zone::Play).unwrap();
    game.state_mut().card_mut(target).unwrap().exert();

    let rusher = game.place_card(P0, RUSHER, Zone::Play).unwrap();
    game.state_mut().card_mut(rusher).unwrap().turn_played = Some(game.state().turn_number);

    assert!(game
        .submit(P0, &Action::Challenge { attacker: rusher, target })
        .unwrap()
        .is_applied());
}

/// Challenger: the bonus applies to outgoing challenge damage only.
#[test]
fn test_challenger_bonus() {
    let mut game = build_game();
    let duelist = game.place_card(P0, DUELIST, Zone::Play).unwrap();
    let target = game.place_card(P1, SCOUT, Zone::Play).unwrap();
    game.state_mut().card_mut(target).unwrap().exert();

    assert!(game
        .submit(P0, &Action::Challenge { attacker: duelist, target })
        .unwrap()
        .is_applied());

    // 1 strength + Challenger 3 = 4 damage out; 2 back.
    assert_eq!(game.state().card(target).unwrap().damage, 4);
    assert_eq!(game.state().card(duelist).unwrap().damage, 2);
}

/// Support: questing lends the character's strength to another until
/// end of turn.
#[test]
fn test_support_grant_expires() {
    let mut game = build_game();
    let helper = game.place_card(P0, HELPER, Zone::Play).unwrap();
    let scout = game.place_card(P0, SCOUT, Zone::Play).unwrap();

    // Scripted: accept Support, then pick the scout.
    game.register_choice_handler(
        P0,
        Box::new(ScriptedChoiceHandler::new([
            vec!["yes".to_string()],
            vec![scout.raw().to_string()],
        ])),
    );

    assert!(game
        .submit(P0, &Action::Quest { card: helper })
        .unwrap()
        .is_applied());

    assert_eq!(game.state().player(P0).lore, 1);
    assert_eq!(
        game.state().card(scout).unwrap().strength,
        4,
        "2 printed + 2 support"
    );

    // The grant is gone on the next turn.
    game.register_choice_handler(P0, Box::new(AutoChoiceHandler));
    assert!(game.submit(P0, &Action::PassTurn).unwrap().is_applied());
    assert_eq!(game.state().card(scout).unwrap().strength, 2);
}

/// Singer: sings songs above its cost; the singer exerts and the song
/// resolves without ink.
#[test]
fn test_singer_sings_for_free() {
    let mut game = build_game();
    let bard = game.place_card(P0, BARD, Zone::Play).unwrap();
    let blaze = game.place_card(P0, FIREBALL, Zone::Hand).unwrap();
    let victim = game.place_card(P1, SCOUT, Zone::Play).unwrap();

    assert!(game
        .submit(P0, &Action::sing(blaze, bard))
        .unwrap()
        .is_applied());

    assert!(game.state().card(bard).unwrap().exerted);
    assert_eq!(game.state().card(victim).unwrap().damage, 2);
    assert_eq!(game.state().card(blaze).unwrap().zone, Zone::Discard);
    assert_eq!(game.state().ready_ink(P0), 0, "no ink was spent");
}

/// A plain character cannot sing a song above its cost.
#[test]
fn test_cheap_singer_rejected() {
    let mut game = build_game();
    let scout = game.place_card(P0, SCOUT, Zone::Play).unwrap();
    let blaze = game.place_card(P0, FIREBALL, Zone::Hand).unwrap();

    let outcome = game.submit(P0, &Action::sing(blaze, scout)).unwrap();
    assert!(matches!(
        outcome,
        ActionOutcome::Rejected(RejectReason::CannotSing)
    ));
}

/// Sing Together: two characters cover the song with their summed
/// value.
#[test]
fn test_sing_together() {
    let mut game = build_game();
    let bard = game.place_card(P0, BARD, Zone::Play).unwrap();
    let scout = game.place_card(P0, SCOUT, Zone::Play).unwrap();
    let anthem = game.place_card(P0, ANTHEM, Zone::Hand).unwrap();

    // Bard sings for 5, scout for 1: 6 together covers Sing Together 6.
    let action = Action::SingSong {
        song: anthem,
        singers: smallvec_pair(bard, scout),
        payload: Default::default(),
    };
    assert!(game.submit(P0, &action).unwrap().is_applied());

    assert!(game.state().card(bard).unwrap().exerted);
    assert!(game.state().card(scout).unwrap().exerted);
    assert_eq!(game.state().player(P0).lore, 2);
}

fn smallvec_pair(a: InstanceId, b: InstanceId) -> SmallVec<[InstanceId; 2]> {
    SmallVec::from_slice(&[a, b])
}

/// Shift: the shifted character pays the shift cost, inherits the old
/// one's board state, and keeps the stack underneath.
#[test]
fn test_shift_inherits_state() {
    let mut game = build_game();
    let base = game.place_card(P0, MAGE, Zone::Play).unwrap();
    game.state_mut().card_mut(base).unwrap().take_damage(1);
    game.state_mut().card_mut(base).unwrap().exert();

    let greater = game.place_card(P0, GREATER_MAGE, Zone::Hand).unwrap();
    give_ink(&mut game, P0, 3);

    let action = Action::Play {
        card: greater,
        mode: PlayMode::Shift { over: base },
        payload: Default::default(),
    };
    assert!(game.submit(P0, &action).unwrap().is_applied());

    let shifted = game.state().card(greater).unwrap();
    assert_eq!(shifted.zone, Zone::Play);
    assert_eq!(shifted.damage, 1, "damage carries over");
    assert!(shifted.exerted, "exertion carries over");
    assert_eq!(shifted.under, vec![base], "the old card is tucked under");
    assert_eq!(game.state().ready_ink(P0), 0, "paid 3 shift ink");

    // The tucked card leaves the play list.
    assert!(!game.state().player(P0).contains(Zone::Play, base));
}

/// Shift is rejected without a same-name character.
#[test]
fn test_shift_needs_matching_name() {
    let mut game = build_game();
    let scout = game.place_card(P0, SCOUT, Zone::Play).unwrap();
    let greater = game.place_card(P0, GREATER_MAGE, Zone::Hand).unwrap();
    give_ink(&mut game, P0, 5);

    let action = Action::Play {
        card: greater,
        mode: PlayMode::Shift { over: scout },
        payload: Default::default(),
    };
    let outcome = game.submit(P0, &action).unwrap();
    assert!(matches!(
        outcome,
        ActionOutcome::Rejected(RejectReason::ShiftTargetInvalid)
    ));
}

/// Reckless: questing is blocked while a legal challenge exists.
#[test]
fn test_reckless_must_challenge() {
    let mut game = build_game();
    let hothead = game.place_card(P0, HOTHEAD, Zone::Play).unwrap();
    let target = game.place_card(P1, SCOUT, Zone::Play).unwrap();
    game.state_mut().card_mut(target).unwrap().exert();

    let outcome = game.submit(P0, &Action::Quest { card: hothead }).unwrap();
    assert!(matches!(
        outcome,
        ActionOutcome::Rejected(RejectReason::MustChallenge)
    ));

    // With no legal challenge, the reckless character may quest.
    game.state_mut().card_mut(target).unwrap().ready();
    assert!(game
        .submit(P0, &Action::Quest { card: hothead })
        .unwrap()
        .is_applied());
}

//! Turn flow integration tests: setup, turn order, the market, the
//! promotion ledger and the end of the match.

mod common;

use common::*;
use rust_sitewar::cards::{Aspect, CardDefinition, CardRegistry};
use rust_sitewar::command::{CommandKind, Match};
use rust_sitewar::core::{NullSink, Phase, PlayerColor, Resource, RuleViolation};
use rust_sitewar::effects::CardEffect;
use rust_sitewar::rules::GameResult;
use rust_sitewar::zones::Pile;

// =============================================================================
// Setup
// =============================================================================

/// Test that setup takes free deploys in seat order, then starts seat 0.
#[test]
fn test_setup_phase() {
    let mut m = two_player(&[(NOBLE_ID, 5)], 2);
    assert_eq!(m.game().phase(), Phase::Setup);

    assert_eq!(
        m.execute(seat(0), CommandKind::EndTurn),
        Err(RuleViolation::WrongPhase(Phase::Setup))
    );
    assert!(matches!(
        m.execute(seat(1), CommandKind::DeployTroop { node: node(0) }),
        Err(RuleViolation::WrongSeat { .. })
    ));

    m.execute(seat(0), CommandKind::DeployTroop { node: node(0) }).unwrap();
    assert_eq!(m.game().setup_remaining(), 1);
    // Setup placement ignores reach
    m.execute(seat(0), CommandKind::DeployTroop { node: node(5) }).unwrap();
    assert_eq!(m.active_seat(), seat(1));
    assert_eq!(m.game().setup_remaining(), 2);

    assert_eq!(
        m.execute(seat(1), CommandKind::DeployTroop { node: node(0) }),
        Err(RuleViolation::NodeOccupied(node(0)))
    );
    m.execute(seat(1), CommandKind::DeployTroop { node: node(2) }).unwrap();
    m.execute(seat(1), CommandKind::DeployTroop { node: node(3) }).unwrap();

    assert_eq!(m.game().phase(), Phase::Main);
    assert_eq!(m.active_seat(), seat(0));
    assert_eq!(m.game().turn_number(), 1);
    // Setup troops are free
    assert_eq!(m.game().player(seat(0)).unwrap().resource(Resource::Power), 0);
    assert_eq!(m.game().player(seat(1)).unwrap().troops_in_barracks(), 38);
}

// =============================================================================
// Turn Order
// =============================================================================

/// Test that turns rotate and the turn number counts rounds.
#[test]
fn test_turn_rotation() {
    let mut m = two_player(&[(NOBLE_ID, 5)], 0);
    play(&mut m, NOBLE_ID);
    play(&mut m, NOBLE_ID);

    end_turn(&mut m);
    assert_eq!(m.active_seat(), seat(1));
    assert_eq!(m.game().turn_number(), 1);
    // The ending seat cleaned up and drew a fresh hand
    let piles = m.game().player(seat(0)).unwrap().piles();
    assert_eq!(piles.len(Pile::Hand), 5);
    assert_eq!(piles.len(Pile::Played), 0);

    assert!(matches!(
        m.execute(seat(0), CommandKind::EndTurn),
        Err(RuleViolation::WrongSeat { .. })
    ));

    end_turn(&mut m);
    assert_eq!(m.active_seat(), seat(0));
    assert_eq!(m.game().turn_number(), 2);
    // Resources carry over between turns
    assert_eq!(m.game().player(seat(0)).unwrap().resource(Resource::Influence), 2);
}

/// Test that site owners are paid when their turn starts.
#[test]
fn test_rewards_at_turn_start() {
    let mut m = two_player(&[(NOBLE_ID, 5)], 1);
    place(&mut m, &[&[3], &[0]]);

    // Seat 0's turn has started: site 1, total control
    let first = m.game().player(seat(0)).unwrap();
    assert_eq!(first.resource(Resource::Influence), 1);
    assert_eq!(first.resource(Resource::VictoryPoints), 1);
    assert_eq!(m.game().player(seat(1)).unwrap().resource(Resource::Influence), 0);

    end_turn(&mut m);
    let second = m.game().player(seat(1)).unwrap();
    assert_eq!(second.resource(Resource::Influence), 1);
    assert_eq!(second.resource(Resource::VictoryPoints), 1);
}

/// Test that unused requests and credits do not outlive the turn.
#[test]
fn test_end_turn_forfeits_pending() {
    let mut m = two_player(&[(ZEALOT, 1), (BLACKGUARD, 1), (NOBLE_ID, 3)], 1);
    place(&mut m, &[&[2], &[3]]);
    play(&mut m, ZEALOT);
    play(&mut m, BLACKGUARD);
    assert_eq!(m.game().turn().pending_credits(), 1);
    assert_eq!(m.game().pending_requests().len(), 1);

    end_turn(&mut m);
    assert_eq!(m.game().turn().pending_credits(), 0);
    assert!(m.game().pending_requests().is_empty());
    assert_eq!(m.game().turn().seat(), seat(1));
}

/// Test that the action history spans turns.
#[test]
fn test_history_carries_over() {
    let mut m = two_player(&[(NOBLE_ID, 5)], 0);
    play(&mut m, NOBLE_ID);
    end_turn(&mut m);

    let history = m.game().turn().history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].kind, CommandKind::EndTurn);
    assert_eq!(history[1].sequence, 1);
}

// =============================================================================
// Market
// =============================================================================

/// Test buying from the market row.
#[test]
fn test_buy_card() {
    let mut m = two_player(&[(NOBLE_ID, 5)], 0);
    for _ in 0..5 {
        play(&mut m, NOBLE_ID);
    }
    let row_size = m.game().market().len();
    let supply = m.game().market_supply();
    let (card, cost) = m
        .game()
        .market()
        .iter()
        .filter_map(|c| m.game().registry().get_card_by_id(c.card_id))
        .map(|d| (d.id, d.cost))
        .find(|&(_, cost)| cost <= 5)
        .expect("affordable card in the row");

    m.execute(seat(0), CommandKind::BuyCard { card_id: card }).unwrap();
    let player = m.game().active_player();
    assert_eq!(player.resource(Resource::Influence), 5 - cost);
    assert!(player.piles().pile(Pile::Discard).iter().any(|c| c.card_id == card));
    assert_eq!(m.game().market().len(), row_size);
    assert_eq!(m.game().market_supply(), supply - 1);

    assert_eq!(
        m.execute(seat(0), CommandKind::BuyCard { card_id: NOBLE_ID }),
        Err(RuleViolation::NotInMarket(NOBLE_ID))
    );
}

/// Test that an unaffordable purchase changes nothing.
#[test]
fn test_buy_without_influence() {
    let mut m = two_player(&[(NOBLE_ID, 5)], 0);
    let card = m.game().market()[0].card_id;
    let before = m.digest();

    let err = m.execute(seat(0), CommandKind::BuyCard { card_id: card }).unwrap_err();
    assert!(matches!(
        err,
        RuleViolation::InsufficientResource {
            resource: Resource::Influence,
            ..
        }
    ));
    assert_eq!(m.digest(), before);
}

// =============================================================================
// End of Match
// =============================================================================

/// Test that a seat with empty barracks ends the match.
#[test]
fn test_game_over_on_empty_barracks() {
    let config =
        config(&[PlayerColor::Red, PlayerColor::Blue], &[(NOBLE_ID, 5)], 1).with_barracks(1, 5);
    let mut m = new_match(config, 4);
    place(&mut m, &[&[3], &[5]]);
    assert_eq!(m.result(), None);

    end_turn(&mut m);
    assert_eq!(m.game().phase(), Phase::GameOver);
    // Seat 0 took the site reward at the start of its turn
    assert_eq!(m.game().final_scores()[seat(0)], 1);
    assert_eq!(m.game().final_scores()[seat(1)], 0);
    assert_eq!(m.result(), Some(GameResult::Winner(seat(0))));

    assert_eq!(
        m.execute(seat(1), CommandKind::EndTurn),
        Err(RuleViolation::WrongPhase(Phase::GameOver))
    );
}

/// Test that equal scores are a draw.
#[test]
fn test_draw_result() {
    let config =
        config(&[PlayerColor::Red, PlayerColor::Blue], &[(NOBLE_ID, 5)], 1).with_barracks(1, 5);
    let mut m = new_match(config, 4);
    place(&mut m, &[&[2], &[5]]);
    end_turn(&mut m);
    assert_eq!(m.result(), Some(GameResult::Draw));
}

/// Test that an exhausted market supply ends the match.
#[test]
fn test_game_over_on_market_exhaustion() {
    let mut registry = CardRegistry::new();
    registry
        .register(
            CardDefinition::new(NOBLE_ID, "Noble", Aspect::Obedience)
                .with_effect(CardEffect::gain(Resource::Influence, 1)),
        )
        .unwrap();
    registry
        .register(
            CardDefinition::new(AMBASSADOR, "Ambassador", Aspect::Ambition)
                .with_cost(1)
                .with_market_copies(2),
        )
        .unwrap();

    let config =
        config(&[PlayerColor::Red, PlayerColor::Blue], &[(NOBLE_ID, 5)], 0).with_market_size(2);
    let mut m = Match::new(config, registry, line_map(), 8)
        .unwrap()
        .with_sink(Box::new(NullSink));
    assert_eq!(m.game().market().len(), 2);

    // A full row with an empty supply is not yet the end
    end_turn(&mut m);
    assert_eq!(m.game().phase(), Phase::Main);

    play(&mut m, NOBLE_ID);
    m.execute(seat(1), CommandKind::BuyCard { card_id: AMBASSADOR }).unwrap();
    assert_eq!(m.game().market().len(), 1);

    end_turn(&mut m);
    assert_eq!(m.game().phase(), Phase::GameOver);
    // The bought copy scores nothing without victory points
    assert_eq!(m.result(), Some(GameResult::Draw));
}

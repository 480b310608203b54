//! Shared fixtures for the integration suites.
//!
//! Matches are built with a hand size equal to the starting deck size,
//! so every seat holds its whole deck and tests can pick cards by id.

#![allow(dead_code)]

use rust_sitewar::cards::CardId;
use rust_sitewar::command::{CommandKind, Match};
use rust_sitewar::core::{
    DeckEntry, GameConfig, NullSink, PlayerColor, SeatIndex, NOBLE, SOLDIER,
};
use rust_sitewar::map::{MapData, MapGraph};
use rust_sitewar::zones::Pile;
use rust_sitewar::{CardRegistry, NodeId, SiteId};

pub const NOBLE_ID: CardId = NOBLE;
pub const SOLDIER_ID: CardId = SOLDIER;
pub const BLACKGUARD: CardId = CardId::new(10);
pub const INFILTRATOR: CardId = CardId::new(11);
pub const SPYMASTER: CardId = CardId::new(12);
pub const WARLORD: CardId = CardId::new(13);
pub const ZEALOT: CardId = CardId::new(14);
pub const DEVOURER: CardId = CardId::new(15);
pub const TYRANTS_HAND: CardId = CardId::new(16);
pub const AMBASSADOR: CardId = CardId::new(17);
pub const QUARTERMASTER: CardId = CardId::new(18);
pub const HERALD: CardId = CardId::new(19);
pub const EXILE: CardId = CardId::new(20);
pub const OVERSEER: CardId = CardId::new(21);
pub const REAVER: CardId = CardId::new(22);

/// Path 0-1-2-3-4-5. Site 0 = {0, 1}, site 1 = {3}, site 2 = {4, 5}.
pub fn line_map() -> MapGraph {
    MapGraph::from_data(&MapData::line(6, &[&[0, 1], &[3], &[4, 5]])).unwrap()
}

pub fn seat(i: u8) -> SeatIndex {
    SeatIndex::new(i)
}

pub fn node(i: u32) -> NodeId {
    NodeId::new(i)
}

pub fn site(i: u32) -> SiteId {
    SiteId::new(i)
}

/// Config whose starting deck is `deck`, with the whole deck in hand.
pub fn config(colors: &[PlayerColor], deck: &[(CardId, u32)], setup_troops: u32) -> GameConfig {
    let entries: Vec<DeckEntry> = deck
        .iter()
        .map(|&(card, copies)| DeckEntry { card, copies })
        .collect();
    let hand_size = entries.iter().map(|e| e.copies).sum();
    GameConfig::new(colors.iter().copied())
        .with_starting_deck(entries)
        .with_hand_size(hand_size)
        .with_setup_troops(setup_troops)
}

pub fn new_match(config: GameConfig, seed: u64) -> Match {
    Match::new(config, CardRegistry::builtin(), line_map(), seed)
        .unwrap()
        .with_sink(Box::new(NullSink))
}

/// Two-player match on the line map.
pub fn two_player(deck: &[(CardId, u32)], setup_troops: u32) -> Match {
    new_match(
        config(&[PlayerColor::Red, PlayerColor::Blue], deck, setup_troops),
        7,
    )
}

/// Play the setup phase: seat `i` deploys onto `placements[i]`.
pub fn place(m: &mut Match, placements: &[&[u32]]) {
    for (i, nodes) in placements.iter().enumerate() {
        for &n in *nodes {
            m.execute(seat(i as u8), CommandKind::DeployTroop { node: node(n) })
                .unwrap();
        }
    }
}

pub fn color(m: &Match, s: SeatIndex) -> PlayerColor {
    m.game().player(s).unwrap().color
}

pub fn hand_idx(m: &Match, s: SeatIndex, card: CardId) -> u32 {
    m.game()
        .player(s)
        .unwrap()
        .piles()
        .pile(Pile::Hand)
        .iter()
        .position(|c| c.card_id == card)
        .expect("card in hand") as u32
}

pub fn hand_len(m: &Match, s: SeatIndex) -> usize {
    m.game().player(s).unwrap().piles().len(Pile::Hand)
}

/// Play the first copy of `card` from the active seat's hand.
pub fn play(m: &mut Match, card: CardId) {
    let s = m.active_seat();
    let hand_idx = hand_idx(m, s, card);
    m.execute(
        s,
        CommandKind::PlayCard {
            card_id: card,
            hand_idx,
            skip_optional: false,
        },
    )
    .unwrap();
}

pub fn end_turn(m: &mut Match) {
    let s = m.active_seat();
    m.execute(s, CommandKind::EndTurn).unwrap();
}

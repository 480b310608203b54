//! Authoritative match state.
//!
//! ## GameState
//!
//! Everything a match needs to continue: the board, every player with
//! their piles, the market, pending card actions, the turn context and
//! the match RNG. Commands change it through `GameState::execute`
//! (see `rules`); this module covers setup and read access.
//!
//! ## Setup order
//!
//! Setup draws from the RNG in a fixed order so a seed fully decides
//! the opening:
//! 1. seat order (shuffle of the configured colors)
//! 2. per seat: starting deck shuffle, then the opening hand
//! 3. market supply shuffle, then the face-up row

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::entity::CardUid;
use super::error::DataError;
use super::log::{LogEntry, LogSink, TracingSink};
use super::player::{PlayerState, SeatIndex, SeatMap};
use super::rng::GameRng;
use crate::actions::TargetKind;
use crate::cards::{CardId, CardInstance, CardLocation, CardRegistry};
use crate::map::MapGraph;
use crate::turn::TurnContext;

/// Match phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Seats place their free opening troops.
    Setup,
    Main,
    GameOver,
}

/// A targeted action granted by a played card and not yet carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRequest {
    pub kind: TargetKind,
    /// The copy that granted it.
    pub source: CardUid,
    pub card_id: CardId,
    /// Chained action, carried out by the same command.
    pub then: Option<TargetKind>,
}

/// Complete match state.
#[derive(Debug)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) registry: CardRegistry,
    pub(crate) map: MapGraph,
    pub(crate) players: SeatMap<PlayerState>,
    pub(crate) active: SeatIndex,
    pub(crate) phase: Phase,
    pub(crate) turn_number: u32,
    /// Free troops the active seat still places during setup.
    pub(crate) setup_remaining: u32,
    pub(crate) turn: TurnContext,
    pub(crate) market: Vec<CardInstance>,
    pub(crate) market_deck: Vec<CardInstance>,
    pub(crate) devoured: Vec<CardInstance>,
    pub(crate) pending: VecDeque<TargetRequest>,
    pub(crate) rng: GameRng,
    next_uid: u32,
    sink: Box<dyn LogSink>,
}

impl GameState {
    /// Set up a new match.
    pub fn new(
        config: GameConfig,
        registry: CardRegistry,
        map: MapGraph,
        seed: u64,
    ) -> Result<Self, DataError> {
        config.validate()?;
        for entry in &config.starting_deck {
            if !registry.contains(entry.card) {
                return Err(DataError::UnknownStartingCard(entry.card));
            }
        }

        let mut rng = GameRng::new(seed);
        let mut colors = config.colors.clone();
        rng.shuffle(&mut colors);

        let players = SeatMap::from_vec(
            colors
                .iter()
                .enumerate()
                .map(|(i, &color)| {
                    PlayerState::new(
                        color,
                        SeatIndex::new(i as u8),
                        config.troops_per_player,
                        config.spies_per_player,
                    )
                })
                .collect(),
        );

        let phase = if config.setup_troops > 0 {
            Phase::Setup
        } else {
            Phase::Main
        };
        let first = SeatIndex::new(0);

        let mut state = Self {
            setup_remaining: config.setup_troops,
            config,
            registry,
            map,
            players,
            active: first,
            phase,
            turn_number: 1,
            turn: TurnContext::new(first, 1),
            market: Vec::new(),
            market_deck: Vec::new(),
            devoured: Vec::new(),
            pending: VecDeque::new(),
            rng,
            next_uid: 0,
            sink: Box::new(TracingSink),
        };
        state.deal_starting_decks();
        state.fill_market_supply();

        let seats: Vec<String> = state
            .players
            .iter()
            .map(|(seat, p)| format!("{}={}", seat, p.color))
            .collect();
        state.log(None, format!("match started, seed {}: {}", seed, seats.join(", ")));
        Ok(state)
    }

    /// Replace the game log sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    fn alloc_uid(&mut self) -> CardUid {
        let uid = CardUid::new(self.next_uid);
        self.next_uid += 1;
        uid
    }

    fn deal_starting_decks(&mut self) {
        let deck: Vec<CardId> = self
            .config
            .starting_deck
            .iter()
            .flat_map(|e| std::iter::repeat(e.card).take(e.copies as usize))
            .collect();
        let hand_size = self.config.hand_size;

        for seat in SeatIndex::all(self.players.seat_count()) {
            let cards: Vec<CardInstance> = deck
                .iter()
                .map(|&id| CardInstance::new(self.alloc_uid(), id, CardLocation::Deck))
                .collect();
            let piles = self.players[seat].piles_mut();
            for card in cards {
                piles.add_to_deck(card);
            }
            piles.shuffle_deck(&mut self.rng);
            piles.draw_many(hand_size, &mut self.rng);
        }
    }

    fn fill_market_supply(&mut self) {
        let supply = self.registry.all_market_cards(&mut self.rng);
        let market_deck = supply
            .into_iter()
            .map(|id| CardInstance::new(self.alloc_uid(), id, CardLocation::MarketDeck))
            .collect();
        self.market_deck = market_deck;
        for _ in 0..self.config.market_size {
            if !self.refill_market_slot() {
                break;
            }
        }
    }

    /// Turn the top market card face up. False if the supply is empty.
    pub(crate) fn refill_market_slot(&mut self) -> bool {
        match self.market_deck.pop() {
            Some(mut card) => {
                card.set_location(CardLocation::Market);
                self.market.push(card);
                true
            }
            None => false,
        }
    }

    pub(crate) fn log(&mut self, seat: Option<SeatIndex>, message: impl Into<String>) {
        let entry = LogEntry::new(self.turn_number, seat, message);
        self.sink.record(&entry);
    }

    // === Read access ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    #[must_use]
    pub fn map(&self) -> &MapGraph {
        &self.map
    }

    #[must_use]
    pub fn players(&self) -> &SeatMap<PlayerState> {
        &self.players
    }

    #[must_use]
    pub fn player(&self, seat: SeatIndex) -> Option<&PlayerState> {
        self.players.get(seat)
    }

    #[must_use]
    pub fn active_seat(&self) -> SeatIndex {
        self.active
    }

    #[must_use]
    pub fn active_player(&self) -> &PlayerState {
        &self.players[self.active]
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn turn(&self) -> &TurnContext {
        &self.turn
    }

    /// Face-up market row.
    #[must_use]
    pub fn market(&self) -> &[CardInstance] {
        &self.market
    }

    /// Cards left in the market supply.
    #[must_use]
    pub fn market_supply(&self) -> usize {
        self.market_deck.len()
    }

    #[must_use]
    pub fn devoured(&self) -> &[CardInstance] {
        &self.devoured
    }

    /// Card actions waiting for targets, oldest first.
    #[must_use]
    pub fn pending_requests(&self) -> &VecDeque<TargetRequest> {
        &self.pending
    }

    #[must_use]
    pub fn rng_state(&self) -> super::rng::GameRngState {
        self.rng.state()
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Free troops the active seat still places during setup.
    #[must_use]
    pub fn setup_remaining(&self) -> u32 {
        self.setup_remaining
    }
}

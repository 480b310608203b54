//! Match configuration.
//!
//! A match is configured at startup with:
//! - the colors taking part (seat order is drawn from the seed)
//! - barracks sizes, hand size and market row size
//! - Power prices for actions bought without a card
//! - the starting deck every player shuffles
//!
//! Configurations are plain serde data. `GameConfig::load_or_default`
//! falls back to the built-in defaults when the data is unusable.

use serde::{Deserialize, Serialize};

use super::error::DataError;
use super::player::PlayerColor;
use crate::actions::TargetKind;
use crate::cards::CardId;

/// Card id of the built-in "Noble" starter.
pub const NOBLE: CardId = CardId::new(1);
/// Card id of the built-in "Soldier" starter.
pub const SOLDIER: CardId = CardId::new(2);

/// Power prices for board actions taken without a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionCosts {
    pub deploy: u32,
    pub assassinate: u32,
    pub return_spy: u32,
}

impl Default for ActionCosts {
    fn default() -> Self {
        Self {
            deploy: 1,
            assassinate: 3,
            return_spy: 3,
        }
    }
}

impl ActionCosts {
    /// Power price of a targeted action, or `None` if only a card can grant it.
    #[must_use]
    pub fn power_cost(&self, kind: TargetKind) -> Option<u32> {
        match kind {
            TargetKind::Assassinate => Some(self.assassinate),
            TargetKind::ReturnSpy => Some(self.return_spy),
            _ => None,
        }
    }
}

/// Copies of one card in the starting deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card: CardId,
    pub copies: u32,
}

/// Complete match configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Colors taking part. Seat order is shuffled from the seed.
    pub colors: Vec<PlayerColor>,

    /// Troops each player starts with in barracks.
    pub troops_per_player: u32,

    /// Spies each player starts with in barracks.
    pub spies_per_player: u32,

    /// Cards drawn at the end of each turn.
    pub hand_size: u32,

    /// Face-up cards available to buy.
    pub market_size: u32,

    /// Free troops each seat places during setup.
    pub setup_troops: u32,

    pub costs: ActionCosts,

    pub starting_deck: Vec<DeckEntry>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            colors: vec![PlayerColor::Red, PlayerColor::Blue],
            troops_per_player: 40,
            spies_per_player: 5,
            hand_size: 5,
            market_size: 6,
            setup_troops: 1,
            costs: ActionCosts::default(),
            starting_deck: vec![
                DeckEntry { card: NOBLE, copies: 7 },
                DeckEntry { card: SOLDIER, copies: 3 },
            ],
        }
    }
}

impl GameConfig {
    /// Default configuration for the given colors.
    #[must_use]
    pub fn new(colors: impl IntoIterator<Item = PlayerColor>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.colors.len()
    }

    /// Set the starting barracks.
    #[must_use]
    pub fn with_barracks(mut self, troops: u32, spies: u32) -> Self {
        self.troops_per_player = troops;
        self.spies_per_player = spies;
        self
    }

    #[must_use]
    pub fn with_hand_size(mut self, hand_size: u32) -> Self {
        self.hand_size = hand_size;
        self
    }

    #[must_use]
    pub fn with_market_size(mut self, market_size: u32) -> Self {
        self.market_size = market_size;
        self
    }

    #[must_use]
    pub fn with_setup_troops(mut self, setup_troops: u32) -> Self {
        self.setup_troops = setup_troops;
        self
    }

    #[must_use]
    pub fn with_costs(mut self, costs: ActionCosts) -> Self {
        self.costs = costs;
        self
    }

    #[must_use]
    pub fn with_starting_deck(mut self, deck: Vec<DeckEntry>) -> Self {
        self.starting_deck = deck;
        self
    }

    /// Check structural constraints.
    pub fn validate(&self) -> Result<(), DataError> {
        if !(2..=PlayerColor::ALL.len()).contains(&self.colors.len()) {
            return Err(DataError::Invalid(format!(
                "a match needs 2-{} players, got {}",
                PlayerColor::ALL.len(),
                self.colors.len()
            )));
        }
        for (i, color) in self.colors.iter().enumerate() {
            if self.colors[..i].contains(color) {
                return Err(DataError::Invalid(format!("{} is listed twice", color)));
            }
        }
        if self.hand_size == 0 {
            return Err(DataError::Invalid("hand size must be positive".to_string()));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration, falling back to the defaults.
    #[must_use]
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "unusable match config, using defaults");
                Self::default()
            }
        }
    }
}

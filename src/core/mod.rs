//! Core engine types: ids, players, state, RNG, configuration, errors, logging.

pub mod config;
pub mod entity;
pub mod error;
pub mod log;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{ActionCosts, DeckEntry, GameConfig, NOBLE, SOLDIER};
pub use entity::{CardUid, NodeId, SiteId};
pub use error::{DataError, RuleViolation};
pub use log::{LogEntry, LogSink, MemorySink, NullSink, TracingSink};
pub use player::{PlayerColor, PlayerState, Resource, SeatIndex, SeatMap};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, Phase, TargetRequest};

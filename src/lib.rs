//! # rust-sitewar
//!
//! Deterministic rules core for a deck-building territory-control game.
//!
//! ## Design Principles
//!
//! 1. **Seeded Determinism**: One `GameRng` per match. A seed plus the
//!    ordered command log reproduces the match exactly.
//!
//! 2. **Validate, Then Mutate**: A rejected command leaves the state
//!    untouched. Every handler checks everything before its first write.
//!
//! 3. **Seat Addressing**: Commands name seats, cards, nodes and sites by
//!    id. Seat order is fixed from the seed at setup.
//!
//! ## Modules
//!
//! - `core`: Ids, players, configuration, RNG, errors, game log, `GameState`
//! - `cards`: Card definitions, copies and the registry
//! - `zones`: Per-player piles (hand, played, inner circle, deck, discard)
//! - `map`: Board graph, site control, combat and spy operations
//! - `effects`: Card effects, conditions and the resolver
//! - `turn`: Per-turn context and the promotion ledger
//! - `actions`: Targeting state machine
//! - `rules`: Command execution, target legality, scoring
//! - `command`: Commands, replay and the match session

pub mod actions;
pub mod cards;
pub mod command;
pub mod core;
pub mod effects;
pub mod map;
pub mod rules;
pub mod turn;
pub mod zones;

pub use crate::core::{
    CardUid, DataError, GameConfig, GameRng, GameState, LogSink, NodeId, Phase, PlayerColor,
    PlayerState, Resource, RuleViolation, SeatIndex, SiteId,
};

pub use crate::cards::{Aspect, CardDefinition, CardId, CardInstance, CardRegistry};

pub use crate::zones::{Pile, PileSet};

pub use crate::map::{MapData, MapGraph};

pub use crate::effects::{CardEffect, ConditionKind, EffectCondition, EffectResolver, EffectType};

pub use crate::turn::TurnContext;

pub use crate::actions::{
    ActionError, ActionSource, ActionState, ActionSystem, PreTarget, Resolution, TargetKind,
};

pub use crate::rules::GameResult;

pub use crate::command::{
    Command, CommandKind, Match, Replay, ReplayBundle, ReplayError, StateDigest,
};

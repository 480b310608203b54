//! Error types shared across the engine.
//!
//! - `RuleViolation`: a command or targeting attempt broke a game rule.
//!   State is left exactly as it was before the attempt.
//! - `DataError`: map, card or config data could not be used. Loaders
//!   fall back to the built-in dataset when they see one.

use crate::actions::TargetKind;
use crate::cards::{CardId, CardLocation};

use super::entity::{CardUid, NodeId, SiteId};
use super::player::{PlayerColor, Resource, SeatIndex};
use super::state::Phase;

/// A validation failure. The `Display` text is the reason shown to players.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("{0} does not exist")]
    UnknownNode(NodeId),

    #[error("{0} does not exist")]
    UnknownSite(SiteId),

    #[error("{card} is not in {location:?}")]
    CardNotFound { card: CardId, location: CardLocation },

    #[error("{0} is not a known card")]
    UnknownCard(CardId),

    #[error("{0} is not in the market row")]
    NotInMarket(CardId),

    #[error("not enough {resource}: need {needed}, have {available}")]
    InsufficientResource {
        resource: Resource,
        needed: u32,
        available: u32,
    },

    #[error("{color} has no presence at {site}")]
    NoPresence { color: PlayerColor, site: SiteId },

    #[error("{color} cannot reach {node}")]
    NoReach { color: PlayerColor, node: NodeId },

    #[error("{0} is already occupied")]
    NodeOccupied(NodeId),

    #[error("{0} is empty")]
    NodeEmpty(NodeId),

    #[error("{0} holds your own troop")]
    OwnTroop(NodeId),

    #[error("source and destination are the same node")]
    SameNode,

    #[error("no troops left in barracks")]
    NoTroopsInBarracks,

    #[error("no spies left in barracks")]
    NoSpiesInBarracks,

    #[error("{color} already has a spy at {site}")]
    SpyAlreadyPlaced { color: PlayerColor, site: SiteId },

    #[error("{color} has no spy at {site}")]
    NoSuchSpy { color: PlayerColor, site: SiteId },

    #[error("cannot return your own spy")]
    OwnSpy,

    #[error("no pending {kind:?} granted by {card}")]
    NoPendingRequest { kind: TargetKind, card: CardId },

    #[error("{0:?} cannot be paid for with power")]
    NotPurchasable(TargetKind),

    #[error("no promotion credit can promote {0}")]
    NoPromotionCredit(CardUid),

    #[error("{0} cannot promote itself")]
    SelfPromotion(CardUid),

    #[error("{actual} acted during {expected}'s turn")]
    WrongSeat {
        expected: SeatIndex,
        actual: SeatIndex,
    },

    #[error("not allowed during the {0:?} phase")]
    WrongPhase(Phase),
}

/// Malformed map, card, config or replay data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed binary data: {0}")]
    Binary(#[from] bincode::Error),

    #[error("node ids must be dense: expected {expected}, found {found}")]
    NonDenseNode { expected: u32, found: u32 },

    #[error("site ids must be dense: expected {expected}, found {found}")]
    NonDenseSite { expected: u32, found: u32 },

    #[error("edge references missing {0}")]
    DanglingEdge(NodeId),

    #[error("{0} links to itself")]
    SelfLoop(NodeId),

    #[error("{node} belongs to both {first} and {second}")]
    NodeInTwoSites {
        node: NodeId,
        first: SiteId,
        second: SiteId,
    },

    #[error("{0} has no member nodes")]
    EmptySite(SiteId),

    #[error("card {0} is defined twice")]
    DuplicateCard(CardId),

    #[error("starting deck references unknown card {0}")]
    UnknownStartingCard(CardId),

    #[error("{0}")]
    Invalid(String),
}

//! Targeting states and the values that flow through them.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{CardUid, NodeId, SiteId};

/// A targeted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Assassinate,
    ReturnSpy,
    ReturnTroop,
    Supplant,
    DevourHand,
    MoveTroop,
    PlaceSpy,
    Promote,
}

/// Where the action system is in a targeting flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionState {
    #[default]
    Normal,
    TargetingAssassinate,
    TargetingReturnSpy,
    TargetingReturnTroop,
    TargetingSupplant,
    TargetingDevourHand,
    TargetingMoveSource,
    TargetingMoveDestination,
    TargetingPlaceSpy,
    /// Several enemy spies share the chosen site; pick one color.
    SelectingSpyToReturn,
    /// Promotions still to choose.
    TargetingPromote(u32),
}

impl ActionState {
    /// Entry state for a targeted action.
    #[must_use]
    pub fn entry(kind: TargetKind, promotions: u32) -> Self {
        match kind {
            TargetKind::Assassinate => ActionState::TargetingAssassinate,
            TargetKind::ReturnSpy => ActionState::TargetingReturnSpy,
            TargetKind::ReturnTroop => ActionState::TargetingReturnTroop,
            TargetKind::Supplant => ActionState::TargetingSupplant,
            TargetKind::DevourHand => ActionState::TargetingDevourHand,
            TargetKind::MoveTroop => ActionState::TargetingMoveSource,
            TargetKind::PlaceSpy => ActionState::TargetingPlaceSpy,
            TargetKind::Promote => ActionState::TargetingPromote(promotions),
        }
    }

    /// The action being targeted, if any.
    #[must_use]
    pub fn kind(self) -> Option<TargetKind> {
        match self {
            ActionState::Normal => None,
            ActionState::TargetingAssassinate => Some(TargetKind::Assassinate),
            ActionState::TargetingReturnSpy | ActionState::SelectingSpyToReturn => {
                Some(TargetKind::ReturnSpy)
            }
            ActionState::TargetingReturnTroop => Some(TargetKind::ReturnTroop),
            ActionState::TargetingSupplant => Some(TargetKind::Supplant),
            ActionState::TargetingDevourHand => Some(TargetKind::DevourHand),
            ActionState::TargetingMoveSource | ActionState::TargetingMoveDestination => {
                Some(TargetKind::MoveTroop)
            }
            ActionState::TargetingPlaceSpy => Some(TargetKind::PlaceSpy),
            ActionState::TargetingPromote(_) => Some(TargetKind::Promote),
        }
    }

    #[must_use]
    pub fn is_targeting(self) -> bool {
        self != ActionState::Normal
    }
}

/// A remembered choice for a later targeting phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreTarget {
    Node(NodeId),
    Site(SiteId),
    /// The player chose no target.
    Skipped,
}

/// What pays for a targeted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionSource {
    /// Granted by a played card.
    Card { uid: CardUid, card_id: CardId },
    /// Bought with Power.
    Power,
}

impl ActionSource {
    #[must_use]
    pub fn card_id(self) -> Option<CardId> {
        match self {
            ActionSource::Card { card_id, .. } => Some(card_id),
            ActionSource::Power => None,
        }
    }

    #[must_use]
    pub fn uid(self) -> Option<CardUid> {
        match self {
            ActionSource::Card { uid, .. } => Some(uid),
            ActionSource::Power => None,
        }
    }
}

/// What happens after a devour selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Continuation {
    /// Start targeting another action with the same source.
    StartTargeting(TargetKind),
}

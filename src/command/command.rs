//! Commands: one player action as plain data.
//!
//! A command carries only ids, indices, the issuing seat and its
//! sequence number. Applying it depends on nothing but those fields and
//! the current game state, which is what makes replay exact.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{NodeId, PlayerColor, SeatIndex, SiteId};

/// What a command does.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// Play a card from hand. `skip_optional` resolves it without its
    /// optional effects.
    PlayCard {
        card_id: CardId,
        hand_idx: u32,
        #[serde(default)]
        skip_optional: bool,
    },
    BuyCard {
        card_id: CardId,
    },
    DeployTroop {
        node: NodeId,
    },
    /// Devour `card_id` from hand, using the devour granted by
    /// `source_card_id`.
    Devour {
        card_id: CardId,
        hand_idx: u32,
        source_card_id: CardId,
    },
    /// Return `color`'s spy from `site`. Without a card it is paid with Power.
    ResolveSpy {
        site: SiteId,
        color: PlayerColor,
        card_id: Option<CardId>,
    },
    Assassinate {
        node: NodeId,
        card_id: Option<CardId>,
        devour_card_id: Option<CardId>,
    },
    Supplant {
        node: NodeId,
        card_id: CardId,
        devour_card_id: Option<CardId>,
    },
    PlaceSpy {
        site: SiteId,
        card_id: CardId,
    },
    MoveTroop {
        src: NodeId,
        dest: NodeId,
        card_id: CardId,
    },
    ReturnTroop {
        node: NodeId,
        card_id: CardId,
    },
    /// Move the named card from Played or Discard to the Inner Circle.
    Promote {
        card_id: CardId,
    },
    EndTurn,
    CancelAction,
    ToggleMarket,
    SwitchMode,
    /// Give up the oldest pending card action.
    ActionCompleted,
}

impl CommandKind {
    /// Commands that only change how the session is viewed.
    #[must_use]
    pub fn is_view_only(&self) -> bool {
        matches!(
            self,
            CommandKind::CancelAction | CommandKind::ToggleMarket | CommandKind::SwitchMode
        )
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::PlayCard { .. } => "PlayCard",
            CommandKind::BuyCard { .. } => "BuyCard",
            CommandKind::DeployTroop { .. } => "DeployTroop",
            CommandKind::Devour { .. } => "Devour",
            CommandKind::ResolveSpy { .. } => "ResolveSpy",
            CommandKind::Assassinate { .. } => "Assassinate",
            CommandKind::Supplant { .. } => "Supplant",
            CommandKind::PlaceSpy { .. } => "PlaceSpy",
            CommandKind::MoveTroop { .. } => "MoveTroop",
            CommandKind::ReturnTroop { .. } => "ReturnTroop",
            CommandKind::Promote { .. } => "Promote",
            CommandKind::EndTurn => "EndTurn",
            CommandKind::CancelAction => "CancelAction",
            CommandKind::ToggleMarket => "ToggleMarket",
            CommandKind::SwitchMode => "SwitchMode",
            CommandKind::ActionCompleted => "ActionCompleted",
        }
    }
}

/// A sequenced command from one seat.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    /// Position in the match log, from 0.
    pub seq: u64,
    pub seat: SeatIndex,
    pub kind: CommandKind,
}

impl Command {
    #[must_use]
    pub fn new(seq: u64, seat: SeatIndex, kind: CommandKind) -> Self {
        Self { seq, seat, kind }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} {}", self.seq, self.seat, self.kind.name())
    }
}

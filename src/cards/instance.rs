//! Card instances - one physical copy and where it is.
//!
//! A copy carries exactly one mutable field, its `CardLocation`. The
//! location is only ever changed by the pile move operations in
//! `zones`, which keeps "one card, one pile" true by construction.

use serde::{Deserialize, Serialize};

use super::definition::CardId;
use crate::core::CardUid;
use crate::zones::Pile;

/// Where a card copy currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardLocation {
    /// Face-down market supply.
    MarketDeck,
    /// Face-up and available to buy.
    Market,
    Hand,
    Played,
    InnerCircle,
    Deck,
    Discard,
    /// Removed from the match.
    Devoured,
}

impl From<Pile> for CardLocation {
    fn from(pile: Pile) -> Self {
        match pile {
            Pile::Hand => CardLocation::Hand,
            Pile::Played => CardLocation::Played,
            Pile::InnerCircle => CardLocation::InnerCircle,
            Pile::Deck => CardLocation::Deck,
            Pile::Discard => CardLocation::Discard,
        }
    }
}

/// A card copy in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    pub uid: CardUid,
    pub card_id: CardId,
    location: CardLocation,
}

impl CardInstance {
    #[must_use]
    pub fn new(uid: CardUid, card_id: CardId, location: CardLocation) -> Self {
        Self {
            uid,
            card_id,
            location,
        }
    }

    #[must_use]
    pub fn location(&self) -> CardLocation {
        self.location
    }

    pub(crate) fn set_location(&mut self, location: CardLocation) {
        self.location = location;
    }
}

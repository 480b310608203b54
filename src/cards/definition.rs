//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: its price,
//! aspect, victory points and effect list. Where a particular copy
//! currently sits is tracked separately by `CardInstance`.

use serde::{Deserialize, Serialize};

use crate::effects::CardEffect;

/// Unique identifier for a card definition.
///
/// This identifies the "kind" of card (e.g., "Blackguard"),
/// not a specific copy in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card aspect. Playing several cards of one aspect in a turn feeds
/// synergy effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Aspect {
    Ambition,
    Conquest,
    Guile,
    Malice,
    Obedience,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use rust_sitewar::cards::{Aspect, CardDefinition, CardId};
/// use rust_sitewar::core::Resource;
/// use rust_sitewar::effects::CardEffect;
///
/// let card = CardDefinition::new(CardId::new(10), "Blackguard", Aspect::Conquest)
///     .with_cost(3)
///     .with_victory_points(1, 3)
///     .with_effect(CardEffect::gain(Resource::Power, 2));
///
/// assert_eq!(card.cost, 3);
/// assert_eq!(card.effects.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,

    /// Card name (for display/logging).
    pub name: String,

    /// Influence price in the market.
    #[serde(default)]
    pub cost: u32,

    pub aspect: Aspect,

    /// Victory points while the card is anywhere in the player's deck cycle.
    #[serde(default)]
    pub deck_vp: u32,

    /// Victory points once promoted to the Inner Circle.
    #[serde(default)]
    pub inner_circle_vp: u32,

    /// Copies shuffled into the market deck. Zero for starter cards.
    #[serde(default)]
    pub market_copies: u32,

    /// Effects applied in order when the card is played.
    #[serde(default)]
    pub effects: Vec<CardEffect>,
}

impl CardDefinition {
    /// Create a new card definition with no cost, points or effects.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, aspect: Aspect) -> Self {
        Self {
            id,
            name: name.into(),
            cost: 0,
            aspect,
            deck_vp: 0,
            inner_circle_vp: 0,
            market_copies: 0,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Set deck and inner-circle victory points.
    #[must_use]
    pub fn with_victory_points(mut self, deck_vp: u32, inner_circle_vp: u32) -> Self {
        self.deck_vp = deck_vp;
        self.inner_circle_vp = inner_circle_vp;
        self
    }

    #[must_use]
    pub fn with_market_copies(mut self, copies: u32) -> Self {
        self.market_copies = copies;
        self
    }

    /// Append an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: CardEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

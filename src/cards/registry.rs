//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores all card definitions for a match. It
//! provides lookup by `CardId` and builds the shuffled market supply.
//! Definitions load from a JSON card list or from the built-in set.

use rustc_hash::FxHashMap;

use super::builtin;
use super::definition::{CardDefinition, CardId};
use crate::core::{DataError, GameRng};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use rust_sitewar::cards::{Aspect, CardDefinition, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry
///     .register(CardDefinition::new(CardId::new(1), "Noble", Aspect::Obedience))
///     .unwrap();
///
/// let found = registry.get_card_by_id(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Noble");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in card set.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for card in builtin::cards() {
            if let Err(err) = registry.register(card) {
                tracing::error!(error = %err, "built-in card set is inconsistent");
            }
        }
        registry
    }

    /// Parse a JSON array of card definitions.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let cards: Vec<CardDefinition> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for card in cards {
            registry.register(card)?;
        }
        Ok(registry)
    }

    /// Parse a JSON card list, falling back to the built-in set.
    #[must_use]
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(registry) => registry,
            Err(err) => {
                tracing::warn!(error = %err, "unusable card data, using built-in cards");
                Self::builtin()
            }
        }
    }

    /// Register a card definition. Ids must be unique.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), DataError> {
        if self.cards.contains_key(&card.id) {
            return Err(DataError::DuplicateCard(card.id));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get_card_by_id(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        let mut cards: Vec<_> = self.cards.values().collect();
        cards.sort_by_key(|c| c.id);
        cards.into_iter()
    }

    /// Every market copy, one entry per copy, shuffled with the match RNG.
    ///
    /// Copies are expanded in id order before shuffling so the result
    /// depends only on the registry contents and the RNG state.
    pub fn all_market_cards(&self, rng: &mut GameRng) -> Vec<CardId> {
        let mut supply: Vec<CardId> = self
            .iter()
            .flat_map(|card| std::iter::repeat(card.id).take(card.market_copies as usize))
            .collect();
        rng.shuffle(&mut supply);
        supply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Aspect;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDefinition::new(CardId::new(1), "Test Card", Aspect::Guile))
            .unwrap();

        let found = registry.get_card_by_id(CardId::new(1));
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "Test Card");

        assert!(registry.get_card_by_id(CardId::new(99)).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDefinition::new(CardId::new(1), "Card A", Aspect::Guile))
            .unwrap();

        let err = registry
            .register(CardDefinition::new(CardId::new(1), "Card B", Aspect::Malice))
            .unwrap_err();
        assert!(matches!(err, DataError::DuplicateCard(id) if id == CardId::new(1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_market_cards_expand_copies() {
        let mut registry = CardRegistry::new();
        registry
            .register(
                CardDefinition::new(CardId::new(10), "A", Aspect::Ambition).with_market_copies(2),
            )
            .unwrap();
        registry
            .register(
                CardDefinition::new(CardId::new(11), "B", Aspect::Conquest).with_market_copies(3),
            )
            .unwrap();
        registry
            .register(CardDefinition::new(CardId::new(1), "Starter", Aspect::Obedience))
            .unwrap();

        let mut supply = registry.all_market_cards(&mut GameRng::new(5));
        assert_eq!(supply.len(), 5);
        supply.sort();
        assert_eq!(
            supply,
            vec![
                CardId::new(10),
                CardId::new(10),
                CardId::new(11),
                CardId::new(11),
                CardId::new(11)
            ]
        );
    }

    #[test]
    fn test_market_cards_deterministic() {
        let registry = CardRegistry::builtin();
        let a = registry.all_market_cards(&mut GameRng::new(77));
        let b = registry.all_market_cards(&mut GameRng::new(77));
        assert_eq!(a, b);
    }

    #[test]
    fn test_builtin_has_starters() {
        let registry = CardRegistry::builtin();
        assert!(registry.contains(crate::core::NOBLE));
        assert!(registry.contains(crate::core::SOLDIER));
        assert!(registry.len() > 10);
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id": 1, "name": "Noble", "aspect": "Obedience",
             "effects": [{"effect_type": "GainResource", "amount": 1, "resource": "Influence"}]},
            {"id": 5, "name": "Raider", "cost": 3, "aspect": "Conquest", "market_copies": 2}
        ]"#;
        let registry = CardRegistry::from_json(json).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_card_by_id(CardId::new(5)).unwrap().cost, 3);
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let registry = CardRegistry::load_or_default("[{\"id\": ");
        assert_eq!(registry.len(), CardRegistry::builtin().len());
    }
}

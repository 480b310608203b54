//! A player's five card piles.
//!
//! Cards move between piles only through the named transitions below.
//! Every transition removes the card from exactly one pile, pushes it
//! onto exactly one other, and updates its location tag.
//!
//! Deck order: index 0 is the bottom, the last index is the top.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardInstance, CardLocation};
use crate::core::{CardUid, GameRng};

/// One of a player's piles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    Hand,
    Played,
    InnerCircle,
    Deck,
    Discard,
}

impl Pile {
    pub const ALL: [Pile; 5] = [
        Pile::Hand,
        Pile::Played,
        Pile::InnerCircle,
        Pile::Deck,
        Pile::Discard,
    ];
}

/// Hand, Played, Inner Circle, Deck and Discard for one player.
///
/// ```
/// use rust_sitewar::cards::{CardId, CardInstance, CardLocation};
/// use rust_sitewar::core::{CardUid, GameRng};
/// use rust_sitewar::zones::{Pile, PileSet};
///
/// let mut piles = PileSet::new();
/// piles.gain_to_discard(CardInstance::new(CardUid::new(0), CardId::new(1), CardLocation::Market));
///
/// // Empty deck: the discard is shuffled back in before drawing.
/// let drawn = piles.draw(&mut GameRng::new(1));
/// assert_eq!(drawn, Some(CardUid::new(0)));
/// assert_eq!(piles.len(Pile::Hand), 1);
/// assert_eq!(piles.pile(Pile::Hand)[0].location(), CardLocation::Hand);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileSet {
    hand: Vec<CardInstance>,
    played: Vec<CardInstance>,
    inner_circle: Vec<CardInstance>,
    deck: Vec<CardInstance>,
    discard: Vec<CardInstance>,
}

impl PileSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards in a pile, in order.
    #[must_use]
    pub fn pile(&self, pile: Pile) -> &[CardInstance] {
        match pile {
            Pile::Hand => &self.hand,
            Pile::Played => &self.played,
            Pile::InnerCircle => &self.inner_circle,
            Pile::Deck => &self.deck,
            Pile::Discard => &self.discard,
        }
    }

    fn pile_mut(&mut self, pile: Pile) -> &mut Vec<CardInstance> {
        match pile {
            Pile::Hand => &mut self.hand,
            Pile::Played => &mut self.played,
            Pile::InnerCircle => &mut self.inner_circle,
            Pile::Deck => &mut self.deck,
            Pile::Discard => &mut self.discard,
        }
    }

    #[must_use]
    pub fn len(&self, pile: Pile) -> usize {
        self.pile(pile).len()
    }

    /// Total cards across all five piles.
    #[must_use]
    pub fn total(&self) -> usize {
        Pile::ALL.iter().map(|&p| self.len(p)).sum()
    }

    /// Every card the player owns, pile by pile.
    pub fn all_cards(&self) -> impl Iterator<Item = &CardInstance> {
        Pile::ALL.into_iter().flat_map(move |p| self.pile(p).iter())
    }

    /// Position of a card by definition id.
    ///
    /// `hint` is tried first; if it does not hold `card_id` the first
    /// matching copy is used.
    #[must_use]
    pub fn find(&self, pile: Pile, card_id: CardId, hint: Option<usize>) -> Option<usize> {
        let cards = self.pile(pile);
        if let Some(idx) = hint {
            if cards.get(idx).is_some_and(|c| c.card_id == card_id) {
                return Some(idx);
            }
        }
        cards.iter().position(|c| c.card_id == card_id)
    }

    /// Position of a specific copy.
    #[must_use]
    pub fn find_uid(&self, pile: Pile, uid: CardUid) -> Option<usize> {
        self.pile(pile).iter().position(|c| c.uid == uid)
    }

    fn push(&mut self, pile: Pile, mut card: CardInstance) {
        card.set_location(pile.into());
        self.pile_mut(pile).push(card);
    }

    fn transfer(&mut self, from: Pile, idx: usize, to: Pile) -> Option<CardInstance> {
        if idx >= self.len(from) {
            return None;
        }
        let card = self.pile_mut(from).remove(idx);
        self.push(to, card);
        self.pile(to).last().copied()
    }

    // === Transitions ===

    /// Put a starting card on top of the deck.
    pub fn add_to_deck(&mut self, card: CardInstance) {
        self.push(Pile::Deck, card);
    }

    /// A bought card arrives in the discard pile.
    pub fn gain_to_discard(&mut self, card: CardInstance) {
        self.push(Pile::Discard, card);
    }

    /// Hand → Played. Returns the played copy.
    pub fn play_from_hand(&mut self, idx: usize) -> Option<CardInstance> {
        self.transfer(Pile::Hand, idx, Pile::Played)
    }

    /// Deck top → Hand.
    ///
    /// An empty deck is refilled from the discard pile with a seeded
    /// shuffle first. Returns `None` when both are empty.
    pub fn draw(&mut self, rng: &mut GameRng) -> Option<CardUid> {
        if self.deck.is_empty() {
            if self.discard.is_empty() {
                return None;
            }
            let mut refill = std::mem::take(&mut self.discard);
            rng.shuffle(&mut refill);
            for card in refill {
                self.push(Pile::Deck, card);
            }
        }
        let top = self.deck.len().checked_sub(1)?;
        self.transfer(Pile::Deck, top, Pile::Hand).map(|c| c.uid)
    }

    /// Draw up to `count` cards. Returns how many were drawn.
    pub fn draw_many(&mut self, count: u32, rng: &mut GameRng) -> u32 {
        let mut drawn = 0;
        while drawn < count && self.draw(rng).is_some() {
            drawn += 1;
        }
        drawn
    }

    /// Remove a card from hand for good. The caller files it with the
    /// match's devoured cards.
    pub fn devour_from_hand(&mut self, idx: usize) -> Option<CardInstance> {
        if idx >= self.hand.len() {
            return None;
        }
        let mut card = self.hand.remove(idx);
        card.set_location(CardLocation::Devoured);
        Some(card)
    }

    /// Played or Discard → Inner Circle.
    pub fn promote(&mut self, uid: CardUid) -> Option<CardInstance> {
        for from in [Pile::Played, Pile::Discard] {
            if let Some(idx) = self.find_uid(from, uid) {
                return self.transfer(from, idx, Pile::InnerCircle);
            }
        }
        None
    }

    /// End of turn: Hand and Played → Discard.
    pub fn cleanup(&mut self) {
        let hand = std::mem::take(&mut self.hand);
        let played = std::mem::take(&mut self.played);
        for card in hand.into_iter().chain(played) {
            self.push(Pile::Discard, card);
        }
    }

    pub fn shuffle_deck(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.deck);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(uid: u32, id: u32) -> CardInstance {
        CardInstance::new(CardUid::new(uid), CardId::new(id), CardLocation::Deck)
    }

    fn deck_of(n: u32) -> PileSet {
        let mut piles = PileSet::new();
        for i in 0..n {
            piles.add_to_deck(card(i, 1 + i % 2));
        }
        piles
    }

    fn assert_tags_match(piles: &PileSet) {
        for pile in Pile::ALL {
            for c in piles.pile(pile) {
                assert_eq!(c.location(), CardLocation::from(pile));
            }
        }
    }

    #[test]
    fn test_draw_takes_top() {
        let mut piles = deck_of(3);
        let mut rng = GameRng::new(1);
        assert_eq!(piles.draw(&mut rng), Some(CardUid::new(2)));
        assert_eq!(piles.len(Pile::Deck), 2);
        assert_eq!(piles.len(Pile::Hand), 1);
        assert_tags_match(&piles);
    }

    #[test]
    fn test_draw_reshuffles_discard() {
        let mut piles = PileSet::new();
        let mut rng = GameRng::new(1);
        piles.gain_to_discard(card(0, 1));
        piles.gain_to_discard(card(1, 1));

        assert_eq!(piles.draw_many(5, &mut rng), 2);
        assert_eq!(piles.len(Pile::Hand), 2);
        assert_eq!(piles.len(Pile::Discard), 0);
        assert_eq!(piles.draw(&mut rng), None);
        assert_tags_match(&piles);
    }

    #[test]
    fn test_play_and_cleanup() {
        let mut piles = deck_of(5);
        let mut rng = GameRng::new(2);
        piles.draw_many(3, &mut rng);

        let played = piles.play_from_hand(0).unwrap();
        assert_eq!(played.location(), CardLocation::Played);
        assert!(piles.play_from_hand(10).is_none());

        piles.cleanup();
        assert_eq!(piles.len(Pile::Hand), 0);
        assert_eq!(piles.len(Pile::Played), 0);
        assert_eq!(piles.len(Pile::Discard), 3);
        assert_eq!(piles.total(), 5);
        assert_tags_match(&piles);
    }

    #[test]
    fn test_devour_leaves_piles() {
        let mut piles = deck_of(2);
        piles.draw(&mut GameRng::new(3));

        let devoured = piles.devour_from_hand(0).unwrap();
        assert_eq!(devoured.location(), CardLocation::Devoured);
        assert_eq!(piles.total(), 1);
        assert!(piles.devour_from_hand(0).is_none());
    }

    #[test]
    fn test_promote_from_played_or_discard() {
        let mut piles = deck_of(2);
        let mut rng = GameRng::new(4);
        piles.draw_many(2, &mut rng);
        let played = piles.play_from_hand(0).unwrap();

        let promoted = piles.promote(played.uid).unwrap();
        assert_eq!(promoted.location(), CardLocation::InnerCircle);
        assert_eq!(piles.len(Pile::InnerCircle), 1);

        // Cards in hand cannot be promoted.
        let in_hand = piles.pile(Pile::Hand)[0].uid;
        assert!(piles.promote(in_hand).is_none());

        piles.cleanup();
        assert!(piles.promote(in_hand).is_some());
        assert_tags_match(&piles);
    }

    #[test]
    fn test_find_prefers_hint() {
        let mut piles = deck_of(4);
        piles.draw_many(4, &mut GameRng::new(5));
        let hand = piles.pile(Pile::Hand).to_vec();
        let target = hand[3].card_id;

        assert_eq!(piles.find(Pile::Hand, target, Some(3)), Some(3));
        let first = hand.iter().position(|c| c.card_id == target);
        assert_eq!(piles.find(Pile::Hand, target, Some(99)), first);
        assert_eq!(piles.find(Pile::Hand, CardId::new(42), None), None);
    }
}

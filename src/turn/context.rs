//! Per-turn bookkeeping.
//!
//! A `TurnContext` lives for one seat's turn. It counts the aspects of
//! cards played, holds promotion credits, hands out action sequence
//! numbers and appends to the action history. The history carries over
//! from turn to turn; it is an `im::Vector` so a context clones in O(1).

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::Aspect;
use crate::command::CommandKind;
use crate::core::{CardUid, SeatIndex};

/// A right to move one *other* card into the Inner Circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionCredit {
    /// Card whose effect produced the credit.
    pub source: CardUid,
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The seat that took this action.
    pub seat: SeatIndex,
    pub kind: CommandKind,
    /// Turn number when the action was taken.
    pub turn: u32,
    /// Sequence number within the turn.
    pub sequence: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnContext {
    seat: SeatIndex,
    turn: u32,
    aspect_counts: FxHashMap<Aspect, u32>,
    credits: Vec<PromotionCredit>,
    free_deploys: u32,
    sequence: u32,
    history: Vector<ActionRecord>,
}

impl TurnContext {
    #[must_use]
    pub fn new(seat: SeatIndex, turn: u32) -> Self {
        Self {
            seat,
            turn,
            aspect_counts: FxHashMap::default(),
            credits: Vec::new(),
            free_deploys: 0,
            sequence: 0,
            history: Vector::new(),
        }
    }

    /// Context for the next turn. Unused credits and free deploys are
    /// forfeited; the history carries over.
    #[must_use]
    pub fn next_turn(&self, seat: SeatIndex, turn: u32) -> Self {
        if !self.credits.is_empty() {
            tracing::debug!(
                seat = %self.seat,
                forfeited = self.credits.len(),
                "promotion credits forfeited"
            );
        }
        Self {
            history: self.history.clone(),
            ..Self::new(seat, turn)
        }
    }

    /// Seat whose turn this is.
    #[must_use]
    pub fn seat(&self) -> SeatIndex {
        self.seat
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    // === Aspects ===

    pub fn record_played_card(&mut self, aspect: Aspect) {
        *self.aspect_counts.entry(aspect).or_insert(0) += 1;
    }

    /// Cards of `aspect` played so far this turn.
    #[must_use]
    pub fn aspect_count(&self, aspect: Aspect) -> u32 {
        self.aspect_counts.get(&aspect).copied().unwrap_or(0)
    }

    // === Promotion credits ===

    /// Add `amount` credits produced by `source`.
    pub fn add_promotion_credit(&mut self, source: CardUid, amount: u32) {
        for _ in 0..amount {
            self.credits.push(PromotionCredit { source });
        }
    }

    #[must_use]
    pub fn pending_credits(&self) -> usize {
        self.credits.len()
    }

    /// Some credit came from a card other than `target`. A card never
    /// promotes itself.
    #[must_use]
    pub fn has_valid_credit_for(&self, target: CardUid) -> bool {
        self.credits.iter().any(|c| c.source != target)
    }

    /// Spend one credit whose source is not `target`.
    ///
    /// Callers check `has_valid_credit_for` first. If they did not and
    /// only self-credits remain, an arbitrary credit is spent instead.
    pub fn consume_credit_for(&mut self, target: CardUid) -> Option<PromotionCredit> {
        if let Some(idx) = self.credits.iter().position(|c| c.source != target) {
            return Some(self.credits.remove(idx));
        }
        if self.credits.is_empty() {
            return None;
        }
        tracing::warn!(%target, "no valid promotion credit, consuming an arbitrary one");
        Some(self.credits.remove(0))
    }

    // === Free deploys ===

    pub fn add_free_deploys(&mut self, amount: u32) {
        self.free_deploys += amount;
    }

    #[must_use]
    pub fn free_deploys(&self) -> u32 {
        self.free_deploys
    }

    /// Use a free deploy if one is left.
    pub fn take_free_deploy(&mut self) -> bool {
        if self.free_deploys == 0 {
            return false;
        }
        self.free_deploys -= 1;
        true
    }

    // === History ===

    /// Append an action to the history and return its sequence number.
    pub fn record(&mut self, seat: SeatIndex, kind: CommandKind) -> u32 {
        let sequence = self.sequence;
        self.sequence += 1;
        self.history.push_back(ActionRecord {
            seat,
            kind,
            turn: self.turn,
            sequence,
        });
        sequence
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }
}

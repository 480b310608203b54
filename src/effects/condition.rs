//! Effect conditions.
//!
//! A condition is checked against the acting player and the board just
//! before its effect would apply. An effect without a condition always
//! applies.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerState, Resource};
use crate::map::MapGraph;
use crate::zones::Pile;

/// What a condition tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Always true.
    None,
    /// Some site has at least one member node held by the player.
    ControlsSite,
    /// Some node anywhere is held by the player.
    HasTroopsDeployed,
    /// `resource` is at least `threshold`.
    HasResourceAmount,
    /// Inner Circle holds at least `threshold` cards.
    InnerCircleCount,
    /// Hand holds at least `threshold` cards.
    HandSize,
}

/// A gate on a card effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectCondition {
    pub kind: ConditionKind,
    #[serde(default)]
    pub threshold: u32,
    #[serde(default)]
    pub resource: Option<Resource>,
}

impl EffectCondition {
    #[must_use]
    pub fn new(kind: ConditionKind, threshold: u32) -> Self {
        Self {
            kind,
            threshold,
            resource: None,
        }
    }

    /// `resource >= threshold`.
    #[must_use]
    pub fn resource_at_least(resource: Resource, threshold: u32) -> Self {
        Self {
            kind: ConditionKind::HasResourceAmount,
            threshold,
            resource: Some(resource),
        }
    }

    /// Evaluate for `player` on `map`.
    #[must_use]
    pub fn evaluate(&self, player: &PlayerState, map: &MapGraph) -> bool {
        match self.kind {
            ConditionKind::None => true,
            ConditionKind::ControlsSite => map.sites().iter().any(|site| {
                site.nodes()
                    .iter()
                    .any(|&node| map.occupant(node) == Some(player.color))
            }),
            ConditionKind::HasTroopsDeployed => map.troop_count(player.color) > 0,
            ConditionKind::HasResourceAmount => match self.resource {
                Some(resource) => player.resource(resource) >= self.threshold,
                None => {
                    tracing::warn!("resource condition without a resource never holds");
                    false
                }
            },
            ConditionKind::InnerCircleCount => {
                player.piles().len(Pile::InnerCircle) >= self.threshold as usize
            }
            ConditionKind::HandSize => player.piles().len(Pile::Hand) >= self.threshold as usize,
        }
    }
}

//! Card effect data.
//!
//! An effect is plain data: what happens, how much, and an optional
//! condition gating it. `EffectResolver` gives it meaning.

use serde::{Deserialize, Serialize};

use super::condition::EffectCondition;
use crate::core::Resource;

/// What an effect does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    /// Gain `amount` of `resource`.
    GainResource,
    /// Draw `amount` cards.
    DrawCards,
    /// Grant `amount` free deploys this turn.
    Deploy,
    Assassinate,
    ReturnSpy,
    ReturnTroop,
    Supplant,
    MoveTroop,
    PlaceSpy,
    /// Devour a card from hand.
    DevourHand,
    /// Devour a card from hand, then supplant. Both happen in one command.
    DevourThenSupplant,
    /// Devour a card from hand, then assassinate. Both happen in one command.
    DevourThenAssassinate,
    /// Grant `amount` promotion credits.
    Promote,
    /// Gain `amount` of `resource` per card of the same aspect played
    /// earlier this turn.
    AspectSynergy,
}

impl EffectType {
    /// Whether the effect needs the player to pick a target.
    #[must_use]
    pub fn is_targeted(self) -> bool {
        !matches!(
            self,
            EffectType::GainResource
                | EffectType::DrawCards
                | EffectType::Deploy
                | EffectType::Promote
                | EffectType::AspectSynergy
        )
    }
}

fn default_amount() -> u32 {
    1
}

/// One entry in a card's effect list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEffect {
    pub effect_type: EffectType,

    #[serde(default = "default_amount")]
    pub amount: u32,

    /// Resource for `GainResource` and `AspectSynergy`.
    #[serde(default)]
    pub resource: Option<Resource>,

    #[serde(default)]
    pub condition: Option<EffectCondition>,

    /// Skipped during an optional pass.
    #[serde(default)]
    pub optional: bool,
}

impl CardEffect {
    /// Unconditional effect of the given type and amount.
    #[must_use]
    pub fn new(effect_type: EffectType, amount: u32) -> Self {
        Self {
            effect_type,
            amount,
            resource: None,
            condition: None,
            optional: false,
        }
    }

    /// Gain a resource.
    #[must_use]
    pub fn gain(resource: Resource, amount: u32) -> Self {
        Self {
            resource: Some(resource),
            ..Self::new(EffectType::GainResource, amount)
        }
    }

    /// Draw cards.
    #[must_use]
    pub fn draw(amount: u32) -> Self {
        Self::new(EffectType::DrawCards, amount)
    }

    /// Per-aspect synergy bonus.
    #[must_use]
    pub fn synergy(resource: Resource, amount: u32) -> Self {
        Self {
            resource: Some(resource),
            ..Self::new(EffectType::AspectSynergy, amount)
        }
    }

    #[must_use]
    pub fn when(mut self, condition: EffectCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

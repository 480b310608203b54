//! Card effects: effect data, conditions and resolution.
//!
//! ## Key Types
//!
//! - `CardEffect`: One entry in a card's effect list
//! - `EffectCondition`: Optional gate checked when the effect resolves
//! - `EffectResolver`: Applies a played card's effects to the game state

pub mod condition;
pub mod effect;
pub mod resolver;

pub use condition::{ConditionKind, EffectCondition};
pub use effect::{CardEffect, EffectType};
pub use resolver::{EffectResolver, ResolveResult};

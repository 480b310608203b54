//! The built-in card set used when no card data is supplied.

use super::definition::{Aspect, CardDefinition, CardId};
use crate::core::{Resource, NOBLE, SOLDIER};
use crate::effects::{CardEffect, ConditionKind, EffectCondition, EffectType};

pub(super) fn cards() -> Vec<CardDefinition> {
    vec![
        CardDefinition::new(NOBLE, "Noble", Aspect::Obedience)
            .with_victory_points(0, 1)
            .with_effect(CardEffect::gain(Resource::Influence, 1)),
        CardDefinition::new(SOLDIER, "Soldier", Aspect::Conquest)
            .with_victory_points(0, 1)
            .with_effect(CardEffect::gain(Resource::Power, 1)),
        CardDefinition::new(CardId::new(10), "Blackguard", Aspect::Conquest)
            .with_cost(3)
            .with_victory_points(1, 3)
            .with_market_copies(2)
            .with_effect(CardEffect::gain(Resource::Power, 2))
            .with_effect(CardEffect::new(EffectType::Assassinate, 1).optional()),
        CardDefinition::new(CardId::new(11), "Infiltrator", Aspect::Guile)
            .with_cost(3)
            .with_victory_points(1, 3)
            .with_market_copies(2)
            .with_effect(CardEffect::new(EffectType::PlaceSpy, 1))
            .with_effect(CardEffect::draw(1)),
        CardDefinition::new(CardId::new(12), "Spymaster", Aspect::Guile)
            .with_cost(5)
            .with_victory_points(2, 4)
            .with_market_copies(1)
            .with_effect(CardEffect::new(EffectType::ReturnSpy, 1))
            .with_effect(
                CardEffect::gain(Resource::Influence, 2)
                    .when(EffectCondition::new(ConditionKind::InnerCircleCount, 2)),
            ),
        CardDefinition::new(CardId::new(13), "Warlord", Aspect::Conquest)
            .with_cost(5)
            .with_victory_points(2, 5)
            .with_market_copies(1)
            .with_effect(CardEffect::new(EffectType::Supplant, 1))
            .with_effect(
                CardEffect::gain(Resource::Power, 1)
                    .when(EffectCondition::new(ConditionKind::ControlsSite, 1)),
            ),
        CardDefinition::new(CardId::new(14), "Zealot", Aspect::Obedience)
            .with_cost(2)
            .with_victory_points(1, 2)
            .with_market_copies(3)
            .with_effect(CardEffect::new(EffectType::Promote, 1))
            .with_effect(CardEffect::gain(Resource::Influence, 1)),
        CardDefinition::new(CardId::new(15), "Devourer", Aspect::Malice)
            .with_cost(4)
            .with_victory_points(2, 4)
            .with_market_copies(2)
            .with_effect(CardEffect::new(EffectType::DevourThenSupplant, 1)),
        CardDefinition::new(CardId::new(16), "Tyrant's Hand", Aspect::Malice)
            .with_cost(4)
            .with_victory_points(1, 3)
            .with_market_copies(2)
            .with_effect(CardEffect::new(EffectType::DevourHand, 1).optional())
            .with_effect(CardEffect::gain(Resource::Power, 2)),
        CardDefinition::new(CardId::new(17), "Ambassador", Aspect::Ambition)
            .with_cost(2)
            .with_victory_points(1, 2)
            .with_market_copies(3)
            .with_effect(CardEffect::gain(Resource::Influence, 2))
            .with_effect(CardEffect::synergy(Resource::Influence, 1)),
        CardDefinition::new(CardId::new(18), "Quartermaster", Aspect::Ambition)
            .with_cost(3)
            .with_victory_points(1, 3)
            .with_market_copies(2)
            .with_effect(CardEffect::new(EffectType::Deploy, 2))
            .with_effect(
                CardEffect::gain(Resource::Power, 1)
                    .when(EffectCondition::new(ConditionKind::HandSize, 4)),
            ),
        CardDefinition::new(CardId::new(19), "Herald", Aspect::Obedience)
            .with_cost(4)
            .with_victory_points(2, 4)
            .with_market_copies(2)
            .with_effect(CardEffect::new(EffectType::MoveTroop, 1))
            .with_effect(
                CardEffect::new(EffectType::Promote, 1)
                    .when(EffectCondition::new(ConditionKind::HasTroopsDeployed, 1)),
            ),
        CardDefinition::new(CardId::new(20), "Exile", Aspect::Malice)
            .with_cost(3)
            .with_victory_points(1, 3)
            .with_market_copies(2)
            .with_effect(CardEffect::new(EffectType::ReturnTroop, 1))
            .with_effect(CardEffect::gain(Resource::Power, 1)),
        CardDefinition::new(CardId::new(21), "Overseer", Aspect::Ambition)
            .with_cost(6)
            .with_victory_points(3, 6)
            .with_market_copies(1)
            .with_effect(CardEffect::gain(Resource::Influence, 3))
            .with_effect(
                CardEffect::gain(Resource::VictoryPoints, 2)
                    .when(EffectCondition::resource_at_least(Resource::Power, 3)),
            ),
        CardDefinition::new(CardId::new(22), "Reaver", Aspect::Malice)
            .with_cost(5)
            .with_victory_points(2, 4)
            .with_market_copies(1)
            .with_effect(CardEffect::new(EffectType::DevourThenAssassinate, 1))
            .with_effect(CardEffect::gain(Resource::Influence, 1)),
    ]
}

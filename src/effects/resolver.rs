//! Effect resolution - applying a played card's effects.
//!
//! Effects resolve in list order. Each condition is checked against the
//! state left by the effects before it. Untargeted effects apply on the
//! spot through `PlayerState`; targeted ones become `TargetRequest`s for
//! the action system to complete later.

use crate::actions::TargetKind;
use crate::cards::{Aspect, CardInstance};
use crate::core::{GameState, SeatIndex, TargetRequest};

use super::effect::{CardEffect, EffectType};

/// Result of resolving one effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    /// Applied immediately.
    Applied,
    /// Queued as target requests of this kind.
    Queued(TargetKind),
    /// Condition false, optional effect skipped, or nothing to do.
    Skipped,
}

/// Resolves card effects on game state.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve every effect of `card`, played by `seat`.
    ///
    /// With `optional_pass` set, effects flagged optional are skipped.
    pub fn resolve_effects(
        state: &mut GameState,
        seat: SeatIndex,
        card: &CardInstance,
        optional_pass: bool,
    ) -> Vec<ResolveResult> {
        let Some(definition) = state.registry.get_card_by_id(card.card_id) else {
            tracing::warn!(card = %card.card_id, "played card has no definition");
            return Vec::new();
        };
        let aspect = definition.aspect;
        let effects = definition.effects.clone();

        effects
            .iter()
            .map(|effect| {
                if optional_pass && effect.optional {
                    return ResolveResult::Skipped;
                }
                Self::resolve_single(state, seat, card, aspect, effect)
            })
            .collect()
    }

    fn resolve_single(
        state: &mut GameState,
        seat: SeatIndex,
        card: &CardInstance,
        aspect: Aspect,
        effect: &CardEffect,
    ) -> ResolveResult {
        if let Some(condition) = &effect.condition {
            if !condition.evaluate(&state.players[seat], &state.map) {
                return ResolveResult::Skipped;
            }
        }

        let request = |kind: TargetKind, then: Option<TargetKind>| TargetRequest {
            kind,
            source: card.uid,
            card_id: card.card_id,
            then,
        };
        let queued = match effect.effect_type {
            EffectType::GainResource => {
                let Some(resource) = effect.resource else {
                    tracing::warn!(card = %card.card_id, "resource effect without a resource");
                    return ResolveResult::Skipped;
                };
                state.players[seat].gain(resource, effect.amount);
                return ResolveResult::Applied;
            }
            EffectType::AspectSynergy => {
                let Some(resource) = effect.resource else {
                    tracing::warn!(card = %card.card_id, "synergy effect without a resource");
                    return ResolveResult::Skipped;
                };
                // The card itself was counted when it was played.
                let earlier = state.turn.aspect_count(aspect).saturating_sub(1);
                if earlier == 0 {
                    return ResolveResult::Skipped;
                }
                state.players[seat].gain(resource, effect.amount * earlier);
                return ResolveResult::Applied;
            }
            EffectType::DrawCards => {
                state.players[seat]
                    .piles_mut()
                    .draw_many(effect.amount, &mut state.rng);
                return ResolveResult::Applied;
            }
            EffectType::Deploy => {
                state.turn.add_free_deploys(effect.amount);
                return ResolveResult::Applied;
            }
            EffectType::Promote => {
                state.turn.add_promotion_credit(card.uid, effect.amount);
                return ResolveResult::Applied;
            }
            EffectType::Assassinate => request(TargetKind::Assassinate, None),
            EffectType::ReturnSpy => request(TargetKind::ReturnSpy, None),
            EffectType::ReturnTroop => request(TargetKind::ReturnTroop, None),
            EffectType::Supplant => request(TargetKind::Supplant, None),
            EffectType::MoveTroop => request(TargetKind::MoveTroop, None),
            EffectType::PlaceSpy => request(TargetKind::PlaceSpy, None),
            EffectType::DevourHand => request(TargetKind::DevourHand, None),
            EffectType::DevourThenSupplant => {
                request(TargetKind::DevourHand, Some(TargetKind::Supplant))
            }
            EffectType::DevourThenAssassinate => {
                request(TargetKind::DevourHand, Some(TargetKind::Assassinate))
            }
        };

        if effect.amount == 0 {
            return ResolveResult::Skipped;
        }
        for _ in 0..effect.amount {
            state.pending.push_back(queued);
        }
        tracing::debug!(
            card = %card.card_id,
            kind = ?queued.kind,
            count = effect.amount,
            "target request queued"
        );
        ResolveResult::Queued(queued.kind)
    }
}

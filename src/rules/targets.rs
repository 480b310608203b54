//! Target legality queries used before entering a targeting flow.

use crate::actions::{ActionSource, TargetKind};
use crate::core::{GameState, NodeId, Phase, PlayerColor, Resource, SeatIndex, SiteId};
use crate::zones::Pile;

impl GameState {
    /// Whether `seat` could complete `kind` from `source` right now.
    ///
    /// Power-paid actions also need the Power to pay for them.
    #[must_use]
    pub fn has_legal_target(
        &self,
        seat: SeatIndex,
        kind: TargetKind,
        source: ActionSource,
    ) -> bool {
        if self.phase != Phase::Main || seat != self.active {
            return false;
        }
        let Some(player) = self.players.get(seat) else {
            return false;
        };
        if source == ActionSource::Power {
            match self.config.costs.power_cost(kind) {
                Some(cost) if player.can_spend(Resource::Power, cost).is_ok() => {}
                _ => return false,
            }
        }
        let color = player.color;
        let map = &self.map;

        match kind {
            TargetKind::Assassinate => self.enemy_targets(color).next().is_some(),
            TargetKind::Supplant => {
                player.troops_in_barracks() > 0 && self.enemy_targets(color).next().is_some()
            }
            TargetKind::ReturnTroop => map
                .nodes()
                .iter()
                .any(|n| n.occupant().is_some() && map.reach(n.id, color)),
            TargetKind::MoveTroop => {
                map.empty_nodes().next().is_some()
                    && map.nodes().iter().any(|n| self.is_move_source(n.id, color))
            }
            TargetKind::PlaceSpy => {
                player.spies_in_barracks() > 0 && map.sites().iter().any(|s| !s.has_spy(color))
            }
            TargetKind::ReturnSpy => map
                .sites()
                .iter()
                .any(|s| !self.returnable_spies(s.id, color).is_empty()),
            TargetKind::DevourHand => player.piles().len(Pile::Hand) > 0,
            TargetKind::Promote => [Pile::Played, Pile::Discard].into_iter().any(|p| {
                player
                    .piles()
                    .pile(p)
                    .iter()
                    .any(|c| self.turn.has_valid_credit_for(c.uid))
            }),
        }
    }

    /// Nodes holding an enemy troop within `color`'s reach.
    pub fn enemy_targets(&self, color: PlayerColor) -> impl Iterator<Item = NodeId> + '_ {
        self.map
            .nodes()
            .iter()
            .filter(move |n| {
                n.occupant().is_some_and(|c| c != color) && self.map.reach(n.id, color)
            })
            .map(|n| n.id)
    }

    /// An occupied node `color` can reach.
    #[must_use]
    pub fn is_move_source(&self, node: NodeId, color: PlayerColor) -> bool {
        self.map.occupant(node).is_some() && self.map.reach(node, color)
    }

    /// Enemy spies at `site` that `color` could send home. Empty when
    /// `color` has no presence there.
    #[must_use]
    pub fn returnable_spies(&self, site: SiteId, color: PlayerColor) -> Vec<PlayerColor> {
        if !self.map.site_presence(site, color) {
            return Vec::new();
        }
        self.map
            .site(site)
            .map(|s| s.spies().iter().copied().filter(|&c| c != color).collect())
            .unwrap_or_default()
    }
}

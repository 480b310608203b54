//! Site ownership and start-of-turn rewards.
//!
//! `owner` and `has_total_control` are derived state. They change only
//! here, from member occupancy and the site's spies.
//!
//! - Owner: the color holding strictly more member nodes than any other.
//!   A tie for the most nodes leaves the site without an owner.
//! - Total control: an owner exists and no other color has a spy there.

use super::graph::MapGraph;
use crate::core::{NodeId, PlayerColor, PlayerState, SiteId};

impl MapGraph {
    /// Recompute owner and total control of one site.
    ///
    /// `active` is the player whose action triggered the recalculation;
    /// it only tags the trace event.
    pub fn recalculate_site_state(&mut self, site: SiteId, active: Option<PlayerColor>) {
        let Some(members) = self.site(site).map(|s| s.nodes().to_vec()) else {
            return;
        };

        let mut counts = [0u32; PlayerColor::ALL.len()];
        for node in members {
            if let Some(color) = self.occupant(node) {
                counts[color as usize] += 1;
            }
        }

        let best = counts.iter().copied().max().unwrap_or(0);
        let mut leaders = PlayerColor::ALL
            .iter()
            .zip(counts)
            .filter(|&(_, n)| n > 0 && n == best)
            .map(|(&color, _)| color);
        let owner = match (leaders.next(), leaders.next()) {
            (Some(color), None) => Some(color),
            _ => None,
        };

        let Some(state) = self.site_mut(site) else {
            return;
        };
        let total = owner.is_some_and(|o| state.spies().iter().all(|&spy| spy == o));
        if state.owner() != owner || state.has_total_control() != total {
            tracing::debug!(
                site = %state.name,
                ?owner,
                total,
                ?active,
                "site control changed"
            );
        }
        state.set_control(owner, total);
    }

    /// Recompute the site a node belongs to, if any.
    pub fn recalculate_node_site(&mut self, node: NodeId, active: Option<PlayerColor>) {
        if let Some(site) = self.site_of(node) {
            self.recalculate_site_state(site, active);
        }
    }

    /// Recompute every site.
    pub fn recalculate_all(&mut self) {
        for idx in 0..self.sites().len() {
            self.recalculate_site_state(SiteId::new(idx as u32), None);
        }
    }
}

/// Pay `player` for every site it owns: the control reward, plus the
/// total-control reward where it has total control.
pub fn distribute_start_of_turn_rewards(map: &MapGraph, player: &mut PlayerState) {
    for site in map.sites() {
        if site.owner() != Some(player.color) {
            continue;
        }
        player.gain(site.control_resource, site.control_amount);
        if site.has_total_control() {
            player.gain(site.total_control_resource, site.total_control_amount);
        }
    }
}

//! Troop and spy operations.
//!
//! Each operation validates everything first and only then mutates, so
//! an `Err` leaves the board and the player untouched. Every mutation
//! is followed by recalculation of the affected sites.
//!
//! Who may act where (reach, presence, card grants) is decided by the
//! rules layer before these are called. `cost` is the Power price; card
//! granted actions pass 0.

use super::graph::MapGraph;
use crate::core::{NodeId, PlayerColor, PlayerState, Resource, RuleViolation, SiteId};

impl MapGraph {
    fn check_empty(&self, node: NodeId) -> Result<(), RuleViolation> {
        match self.check_node(node)?.occupant() {
            Some(_) => Err(RuleViolation::NodeOccupied(node)),
            None => Ok(()),
        }
    }

    fn check_enemy(
        &self,
        node: NodeId,
        attacker: PlayerColor,
    ) -> Result<PlayerColor, RuleViolation> {
        match self.check_node(node)?.occupant() {
            None => Err(RuleViolation::NodeEmpty(node)),
            Some(color) if color == attacker => Err(RuleViolation::OwnTroop(node)),
            Some(color) => Ok(color),
        }
    }

    /// Place one of `player`'s barracks troops on an empty node.
    pub fn deploy(
        &mut self,
        node: NodeId,
        player: &mut PlayerState,
        cost: u32,
    ) -> Result<(), RuleViolation> {
        self.check_empty(node)?;
        if player.troops_in_barracks() == 0 {
            return Err(RuleViolation::NoTroopsInBarracks);
        }
        player.can_spend(Resource::Power, cost)?;

        player.try_spend(Resource::Power, cost)?;
        player.take_troop()?;
        self.set_occupant(node, Some(player.color));
        self.recalculate_node_site(node, Some(player.color));
        tracing::debug!(color = %player.color, %node, "troop deployed");
        Ok(())
    }

    /// Remove an enemy troop and credit the attacker a trophy.
    /// Returns the victim's color.
    pub fn assassinate(
        &mut self,
        node: NodeId,
        attacker: &mut PlayerState,
        cost: u32,
    ) -> Result<PlayerColor, RuleViolation> {
        let victim = self.check_enemy(node, attacker.color)?;
        attacker.can_spend(Resource::Power, cost)?;

        attacker.try_spend(Resource::Power, cost)?;
        self.set_occupant(node, None);
        attacker.add_trophy(victim);
        self.recalculate_node_site(node, Some(attacker.color));
        tracing::debug!(attacker = %attacker.color, %victim, %node, "troop assassinated");
        Ok(victim)
    }

    /// Relocate whatever troop is on `src` to the empty node `dest`.
    pub fn move_troop(
        &mut self,
        src: NodeId,
        dest: NodeId,
        mover: PlayerColor,
    ) -> Result<(), RuleViolation> {
        if src == dest {
            return Err(RuleViolation::SameNode);
        }
        let Some(occupant) = self.check_node(src)?.occupant() else {
            return Err(RuleViolation::NodeEmpty(src));
        };
        self.check_empty(dest)?;

        self.set_occupant(src, None);
        self.set_occupant(dest, Some(occupant));
        self.recalculate_node_site(src, Some(mover));
        self.recalculate_node_site(dest, Some(mover));
        tracing::debug!(%mover, %occupant, %src, %dest, "troop moved");
        Ok(())
    }

    /// Clear `node`. A troop of the requester's own color goes back to
    /// its barracks; an enemy troop is removed from play and does not.
    /// Returns the removed troop's color.
    pub fn return_troop(
        &mut self,
        node: NodeId,
        requester: &mut PlayerState,
    ) -> Result<PlayerColor, RuleViolation> {
        let Some(occupant) = self.check_node(node)?.occupant() else {
            return Err(RuleViolation::NodeEmpty(node));
        };

        self.set_occupant(node, None);
        if occupant == requester.color {
            requester.return_troop();
        }
        self.recalculate_node_site(node, Some(requester.color));
        tracing::debug!(requester = %requester.color, %occupant, %node, "troop returned");
        Ok(occupant)
    }

    /// Assassinate an enemy troop and deploy into its node as one step.
    /// Returns the victim's color.
    pub fn supplant(
        &mut self,
        node: NodeId,
        attacker: &mut PlayerState,
        cost: u32,
    ) -> Result<PlayerColor, RuleViolation> {
        let victim = self.check_enemy(node, attacker.color)?;
        if attacker.troops_in_barracks() == 0 {
            return Err(RuleViolation::NoTroopsInBarracks);
        }
        attacker.can_spend(Resource::Power, cost)?;

        attacker.try_spend(Resource::Power, cost)?;
        attacker.take_troop()?;
        attacker.add_trophy(victim);
        self.set_occupant(node, Some(attacker.color));
        self.recalculate_node_site(node, Some(attacker.color));
        tracing::debug!(attacker = %attacker.color, %victim, %node, "troop supplanted");
        Ok(victim)
    }

    /// Put one of `player`'s barracks spies at `site`.
    pub fn place_spy(
        &mut self,
        site: SiteId,
        player: &mut PlayerState,
    ) -> Result<(), RuleViolation> {
        if self.check_site(site)?.has_spy(player.color) {
            return Err(RuleViolation::SpyAlreadyPlaced {
                color: player.color,
                site,
            });
        }
        player.take_spy()?;
        self.add_spy(site, player.color);
        self.recalculate_site_state(site, Some(player.color));
        tracing::debug!(color = %player.color, %site, "spy placed");
        Ok(())
    }

    /// Remove `target`'s spy from `site`. The caller hands the spy back
    /// to its owner's barracks.
    pub fn return_spy(
        &mut self,
        site: SiteId,
        requester: &mut PlayerState,
        target: PlayerColor,
        cost: u32,
    ) -> Result<(), RuleViolation> {
        if target == requester.color {
            return Err(RuleViolation::OwnSpy);
        }
        if !self.check_site(site)?.has_spy(target) {
            return Err(RuleViolation::NoSuchSpy {
                color: target,
                site,
            });
        }
        requester.can_spend(Resource::Power, cost)?;

        requester.try_spend(Resource::Power, cost)?;
        self.remove_spy(site, target);
        self.recalculate_site_state(site, Some(requester.color));
        tracing::debug!(requester = %requester.color, %target, %site, "spy returned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SeatIndex;
    use crate::map::MapData;

    /// Line 0-1-2; site 0 = {0}, site 1 = {2}
    fn setup() -> (MapGraph, PlayerState, PlayerState) {
        let map = MapGraph::from_data(&MapData::line(3, &[&[0], &[2]])).unwrap();
        let red = PlayerState::new(PlayerColor::Red, SeatIndex::new(0), 5, 2);
        let blue = PlayerState::new(PlayerColor::Blue, SeatIndex::new(1), 5, 2);
        (map, red, blue)
    }

    #[test]
    fn test_deploy_spends_and_recalculates() {
        let (mut map, mut red, _) = setup();
        red.gain(Resource::Power, 2);

        map.deploy(NodeId::new(0), &mut red, 1).unwrap();
        assert_eq!(map.occupant(NodeId::new(0)), Some(PlayerColor::Red));
        assert_eq!(red.resource(Resource::Power), 1);
        assert_eq!(red.troops_in_barracks(), 4);
        assert_eq!(map.site(SiteId::new(0)).unwrap().owner(), Some(PlayerColor::Red));
    }

    #[test]
    fn test_failed_deploy_changes_nothing() {
        let (mut map, mut red, mut blue) = setup();
        map.deploy(NodeId::new(0), &mut blue, 0).unwrap();

        let (map_before, red_before) = (map.clone(), red.clone());
        assert_eq!(
            map.deploy(NodeId::new(0), &mut red, 0),
            Err(RuleViolation::NodeOccupied(NodeId::new(0)))
        );
        assert!(matches!(
            map.deploy(NodeId::new(1), &mut red, 1),
            Err(RuleViolation::InsufficientResource { .. })
        ));
        assert_eq!(map, map_before);
        assert_eq!(red, red_before);
    }

    #[test]
    fn test_assassinate_takes_trophy() {
        let (mut map, mut red, mut blue) = setup();
        map.deploy(NodeId::new(2), &mut blue, 0).unwrap();
        red.gain(Resource::Power, 3);

        let victim = map.assassinate(NodeId::new(2), &mut red, 3).unwrap();
        assert_eq!(victim, PlayerColor::Blue);
        assert_eq!(map.occupant(NodeId::new(2)), None);
        assert_eq!(red.trophies(), &[PlayerColor::Blue]);
        assert_eq!(red.resource(Resource::Power), 0);
        assert_eq!(map.site(SiteId::new(1)).unwrap().owner(), None);
        // Victim's barracks are unchanged.
        assert_eq!(blue.troops_in_barracks(), 4);
    }

    #[test]
    fn test_assassinate_rejects_own_and_empty() {
        let (mut map, mut red, _) = setup();
        map.deploy(NodeId::new(0), &mut red, 0).unwrap();
        assert_eq!(
            map.assassinate(NodeId::new(0), &mut red, 0),
            Err(RuleViolation::OwnTroop(NodeId::new(0)))
        );
        assert_eq!(
            map.assassinate(NodeId::new(1), &mut red, 0),
            Err(RuleViolation::NodeEmpty(NodeId::new(1)))
        );
    }

    #[test]
    fn test_move_recalculates_both_sites() {
        let (mut map, mut red, _) = setup();
        map.deploy(NodeId::new(0), &mut red, 0).unwrap();

        map.move_troop(NodeId::new(0), NodeId::new(2), PlayerColor::Red)
            .unwrap();
        assert_eq!(map.site(SiteId::new(0)).unwrap().owner(), None);
        assert_eq!(map.site(SiteId::new(1)).unwrap().owner(), Some(PlayerColor::Red));
        assert_eq!(
            map.move_troop(NodeId::new(2), NodeId::new(2), PlayerColor::Red),
            Err(RuleViolation::SameNode)
        );
    }

    #[test]
    fn test_return_troop_asymmetry() {
        let (mut map, mut red, mut blue) = setup();
        map.deploy(NodeId::new(0), &mut red, 0).unwrap();
        map.deploy(NodeId::new(2), &mut blue, 0).unwrap();

        map.return_troop(NodeId::new(0), &mut red).unwrap();
        assert_eq!(red.troops_in_barracks(), 5);

        map.return_troop(NodeId::new(2), &mut red).unwrap();
        assert_eq!(map.occupant(NodeId::new(2)), None);
        assert_eq!(blue.troops_in_barracks(), 4);
        assert_eq!(red.troops_in_barracks(), 5);
    }

    #[test]
    fn test_supplant() {
        let (mut map, mut red, mut blue) = setup();
        map.deploy(NodeId::new(2), &mut blue, 0).unwrap();

        let victim = map.supplant(NodeId::new(2), &mut red, 0).unwrap();
        assert_eq!(victim, PlayerColor::Blue);
        assert_eq!(map.occupant(NodeId::new(2)), Some(PlayerColor::Red));
        assert_eq!(red.troops_in_barracks(), 4);
        assert_eq!(red.trophies(), &[PlayerColor::Blue]);
        assert_eq!(map.site(SiteId::new(1)).unwrap().owner(), Some(PlayerColor::Red));
    }

    #[test]
    fn test_supplant_without_troops_changes_nothing() {
        let (mut map, _, mut blue) = setup();
        map.deploy(NodeId::new(2), &mut blue, 0).unwrap();
        let mut red = PlayerState::new(PlayerColor::Red, SeatIndex::new(0), 0, 0);

        let before = map.clone();
        assert_eq!(
            map.supplant(NodeId::new(2), &mut red, 0),
            Err(RuleViolation::NoTroopsInBarracks)
        );
        assert_eq!(map, before);
        assert!(red.trophies().is_empty());
    }

    #[test]
    fn test_place_spy_once_per_site() {
        let (mut map, mut red, _) = setup();
        map.place_spy(SiteId::new(0), &mut red).unwrap();
        assert_eq!(red.spies_in_barracks(), 1);
        assert_eq!(
            map.place_spy(SiteId::new(0), &mut red),
            Err(RuleViolation::SpyAlreadyPlaced {
                color: PlayerColor::Red,
                site: SiteId::new(0),
            })
        );
        assert_eq!(red.spies_in_barracks(), 1);
    }

    #[test]
    fn test_spy_flips_total_control() {
        let (mut map, mut red, mut blue) = setup();
        map.deploy(NodeId::new(0), &mut red, 0).unwrap();
        assert!(map.site(SiteId::new(0)).unwrap().has_total_control());

        map.place_spy(SiteId::new(0), &mut blue).unwrap();
        let site = map.site(SiteId::new(0)).unwrap();
        assert_eq!(site.owner(), Some(PlayerColor::Red));
        assert!(!site.has_total_control());

        red.gain(Resource::Power, 3);
        map.return_spy(SiteId::new(0), &mut red, PlayerColor::Blue, 3)
            .unwrap();
        assert!(map.site(SiteId::new(0)).unwrap().has_total_control());
    }

    #[test]
    fn test_return_spy_rejections() {
        let (mut map, mut red, mut blue) = setup();
        map.place_spy(SiteId::new(1), &mut red).unwrap();
        assert_eq!(
            map.return_spy(SiteId::new(1), &mut red, PlayerColor::Red, 0),
            Err(RuleViolation::OwnSpy)
        );
        assert_eq!(
            map.return_spy(SiteId::new(1), &mut blue, PlayerColor::Green, 0),
            Err(RuleViolation::NoSuchSpy {
                color: PlayerColor::Green,
                site: SiteId::new(1),
            })
        );
        assert!(map.site(SiteId::new(1)).unwrap().has_spy(PlayerColor::Red));
    }
}

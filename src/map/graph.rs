//! Board topology: nodes, edges and sites.
//!
//! The board is an undirected graph. Edges are always stored on both
//! endpoints. A node belongs to at most one site; route nodes between
//! sites belong to none.
//!
//! ## Presence and reach
//!
//! A color has *presence* at a node when it occupies the node or holds a
//! spy at the node's own site. Presence never crosses an edge. *Reach*
//! extends presence by one step: a node is reachable when the color has
//! presence there or at any neighbour.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{DataError, NodeId, PlayerColor, Resource, RuleViolation, SiteId};

/// A board location that holds at most one troop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    occupant: Option<PlayerColor>,
    neighbors: SmallVec<[NodeId; 4]>,
    site: Option<SiteId>,
}

impl Node {
    #[must_use]
    pub fn occupant(&self) -> Option<PlayerColor> {
        self.occupant
    }

    #[must_use]
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    /// Site this node belongs to, if any.
    #[must_use]
    pub fn site(&self) -> Option<SiteId> {
        self.site
    }
}

/// A named group of nodes that pays rewards to its owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    /// Paid to the owner at the start of its turn.
    pub control_resource: Resource,
    pub control_amount: u32,
    /// Paid on top when the owner has total control.
    pub total_control_resource: Resource,
    pub total_control_amount: u32,
    nodes: SmallVec<[NodeId; 6]>,
    spies: SmallVec<[PlayerColor; 4]>,
    owner: Option<PlayerColor>,
    has_total_control: bool,
}

impl Site {
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Colors with a spy here. At most one per color.
    #[must_use]
    pub fn spies(&self) -> &[PlayerColor] {
        &self.spies
    }

    #[must_use]
    pub fn has_spy(&self, color: PlayerColor) -> bool {
        self.spies.contains(&color)
    }

    /// Majority occupant, as of the last recalculation.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerColor> {
        self.owner
    }

    #[must_use]
    pub fn has_total_control(&self) -> bool {
        self.has_total_control
    }

    pub(super) fn set_control(&mut self, owner: Option<PlayerColor>, total: bool) {
        self.owner = owner;
        self.has_total_control = total;
    }
}

/// Reward settings for a new site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRewards {
    pub control_resource: Resource,
    pub control_amount: u32,
    pub total_control_resource: Resource,
    pub total_control_amount: u32,
}

impl Default for SiteRewards {
    fn default() -> Self {
        Self {
            control_resource: Resource::Influence,
            control_amount: 1,
            total_control_resource: Resource::VictoryPoints,
            total_control_amount: 1,
        }
    }
}

/// The board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapGraph {
    nodes: Vec<Node>,
    sites: Vec<Site>,
}

impl MapGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Construction ===

    /// Add an unconnected node. Ids are dense, in creation order.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            occupant: None,
            neighbors: SmallVec::new(),
            site: None,
        });
        id
    }

    /// Connect two nodes in both directions.
    ///
    /// Both endpoints are checked before either side is touched, so a
    /// failed call leaves the graph unchanged. Adding an existing edge
    /// is a no-op.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), DataError> {
        for end in [a, b] {
            if self.node(end).is_none() {
                return Err(DataError::DanglingEdge(end));
            }
        }
        if a == b {
            return Err(DataError::SelfLoop(a));
        }
        if self.nodes[a.index()].neighbors.contains(&b) {
            return Ok(());
        }
        self.nodes[a.index()].neighbors.push(b);
        self.nodes[b.index()].neighbors.push(a);
        Ok(())
    }

    /// Group existing nodes into a new site.
    ///
    /// Fails without change if a member is unknown or already belongs
    /// to another site, or if there are no members.
    pub fn add_site(
        &mut self,
        name: impl Into<String>,
        members: &[NodeId],
        rewards: SiteRewards,
    ) -> Result<SiteId, DataError> {
        let id = SiteId::new(self.sites.len() as u32);
        if members.is_empty() {
            return Err(DataError::EmptySite(id));
        }
        for &node in members {
            let Some(n) = self.node(node) else {
                return Err(DataError::Invalid(format!("{} lists missing {}", id, node)));
            };
            if let Some(first) = n.site {
                return Err(DataError::NodeInTwoSites {
                    node,
                    first,
                    second: id,
                });
            }
        }
        for &node in members {
            self.nodes[node.index()].site = Some(id);
        }
        self.sites.push(Site {
            id,
            name: name.into(),
            control_resource: rewards.control_resource,
            control_amount: rewards.control_amount,
            total_control_resource: rewards.total_control_resource,
            total_control_amount: rewards.total_control_amount,
            nodes: members.iter().copied().collect(),
            spies: SmallVec::new(),
            owner: None,
            has_total_control: false,
        });
        Ok(id)
    }

    // === Lookup ===

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[must_use]
    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(id.index())
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn check_node(&self, id: NodeId) -> Result<&Node, RuleViolation> {
        self.node(id).ok_or(RuleViolation::UnknownNode(id))
    }

    pub fn check_site(&self, id: SiteId) -> Result<&Site, RuleViolation> {
        self.site(id).ok_or(RuleViolation::UnknownSite(id))
    }

    #[must_use]
    pub fn occupant(&self, id: NodeId) -> Option<PlayerColor> {
        self.node(id).and_then(Node::occupant)
    }

    #[must_use]
    pub fn site_of(&self, id: NodeId) -> Option<SiteId> {
        self.node(id).and_then(Node::site)
    }

    /// Troops of `color` on the board.
    #[must_use]
    pub fn troop_count(&self, color: PlayerColor) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.occupant == Some(color))
            .count()
    }

    /// Unoccupied nodes in id order.
    pub fn empty_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|n| n.occupant.is_none())
            .map(|n| n.id)
    }

    // === Presence ===

    /// `color` occupies `node` or has a spy at the node's site.
    #[must_use]
    pub fn presence(&self, node: NodeId, color: PlayerColor) -> bool {
        let Some(n) = self.node(node) else {
            return false;
        };
        if n.occupant == Some(color) {
            return true;
        }
        n.site
            .and_then(|s| self.site(s))
            .is_some_and(|site| site.has_spy(color))
    }

    /// `color` has presence at `node` or at one of its neighbours.
    #[must_use]
    pub fn reach(&self, node: NodeId, color: PlayerColor) -> bool {
        let Some(n) = self.node(node) else {
            return false;
        };
        self.presence(node, color) || n.neighbors.iter().any(|&nb| self.presence(nb, color))
    }

    /// `color` has presence at any member node of `site`.
    #[must_use]
    pub fn site_presence(&self, site: SiteId, color: PlayerColor) -> bool {
        self.site(site)
            .is_some_and(|s| s.nodes.iter().any(|&n| self.presence(n, color)))
    }

    // === Raw mutation (combat and control keep the derived state in step) ===

    pub(crate) fn set_occupant(&mut self, node: NodeId, occupant: Option<PlayerColor>) {
        if let Some(n) = self.nodes.get_mut(node.index()) {
            n.occupant = occupant;
        }
    }

    pub(crate) fn add_spy(&mut self, site: SiteId, color: PlayerColor) {
        if let Some(s) = self.sites.get_mut(site.index()) {
            if !s.spies.contains(&color) {
                s.spies.push(color);
            }
        }
    }

    pub(crate) fn remove_spy(&mut self, site: SiteId, color: PlayerColor) {
        if let Some(s) = self.sites.get_mut(site.index()) {
            s.spies.retain(|c| *c != color);
        }
    }

    pub(super) fn site_mut(&mut self, id: SiteId) -> Option<&mut Site> {
        self.sites.get_mut(id.index())
    }
}

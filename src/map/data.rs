//! Map data: the serde form of a board and its validation.
//!
//! ```json
//! {
//!   "nodes": [0, 1, 2],
//!   "edges": [[0, 1], [1, 2]],
//!   "sites": [{"id": 0, "name": "Keep", "nodes": [0]}]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::graph::{MapGraph, SiteRewards};
use crate::core::{DataError, NodeId, Resource};

/// One site in map data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteData {
    pub id: u32,
    pub name: String,
    pub nodes: Vec<u32>,
    #[serde(default)]
    pub rewards: SiteRewards,
}

/// A whole board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapData {
    /// Node ids, which must be 0, 1, 2, ... in order.
    pub nodes: Vec<u32>,
    pub edges: Vec<[u32; 2]>,
    pub sites: Vec<SiteData>,
}

impl MapData {
    /// A path `0 - 1 - ... - (count-1)` with the given member lists as
    /// sites, all paying the default rewards.
    #[must_use]
    pub fn line(count: u32, sites: &[&[u32]]) -> Self {
        Self {
            nodes: (0..count).collect(),
            edges: (1..count).map(|i| [i - 1, i]).collect(),
            sites: sites
                .iter()
                .enumerate()
                .map(|(i, members)| SiteData {
                    id: i as u32,
                    name: format!("Site {}", i),
                    nodes: members.to_vec(),
                    rewards: SiteRewards::default(),
                })
                .collect(),
        }
    }

    /// The built-in board: five sites joined by route nodes.
    #[must_use]
    pub fn builtin() -> Self {
        let site = |id: u32, name: &str, nodes: &[u32], rewards: SiteRewards| SiteData {
            id,
            name: name.to_string(),
            nodes: nodes.to_vec(),
            rewards,
        };
        let rewards = |control: Resource, amount: u32, total: u32| SiteRewards {
            control_resource: control,
            control_amount: amount,
            total_control_resource: Resource::VictoryPoints,
            total_control_amount: total,
        };
        Self {
            nodes: (0..15).collect(),
            edges: vec![
                [0, 1],
                [1, 9],
                [9, 2],
                [2, 10],
                [10, 3],
                [3, 4],
                [4, 5],
                [5, 11],
                [11, 6],
                [6, 12],
                [12, 7],
                [7, 8],
                [8, 13],
                [13, 0],
                [9, 14],
                [14, 4],
                [14, 7],
            ],
            sites: vec![
                site(0, "Obsidian Gate", &[0, 1], rewards(Resource::Power, 1, 2)),
                site(1, "Sunken Forum", &[2], rewards(Resource::Influence, 1, 1)),
                site(2, "Ember Hollow", &[3, 4, 5], rewards(Resource::Influence, 2, 2)),
                site(3, "Glass Spire", &[6], rewards(Resource::Power, 1, 1)),
                site(4, "Salt Market", &[7, 8], rewards(Resource::Influence, 1, 2)),
            ],
        }
    }
}

impl MapGraph {
    /// Build and validate a board from data.
    pub fn from_data(data: &MapData) -> Result<Self, DataError> {
        let mut map = MapGraph::new();
        for (expected, &found) in data.nodes.iter().enumerate() {
            if found != expected as u32 {
                return Err(DataError::NonDenseNode {
                    expected: expected as u32,
                    found,
                });
            }
            map.add_node();
        }
        for &[a, b] in &data.edges {
            map.add_edge(NodeId::new(a), NodeId::new(b))?;
        }
        for (expected, site) in data.sites.iter().enumerate() {
            if site.id != expected as u32 {
                return Err(DataError::NonDenseSite {
                    expected: expected as u32,
                    found: site.id,
                });
            }
            let members: Vec<NodeId> = site.nodes.iter().copied().map(NodeId::new).collect();
            map.add_site(site.name.clone(), &members, site.rewards)?;
        }
        map.recalculate_all();
        Ok(map)
    }

    /// Parse and validate a JSON board.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let data: MapData = serde_json::from_str(json)?;
        Self::from_data(&data)
    }

    /// The built-in board.
    #[must_use]
    pub fn builtin() -> Self {
        match Self::from_data(&MapData::builtin()) {
            Ok(map) => map,
            Err(err) => {
                tracing::error!(error = %err, "built-in map is invalid");
                MapGraph::new()
            }
        }
    }

    /// Parse a JSON board, falling back to the built-in one.
    #[must_use]
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(error = %err, "unusable map data, using built-in map");
                Self::builtin()
            }
        }
    }
}

//! Board and card identifiers.
//!
//! Every addressable thing in a match has a small integer id:
//! - `NodeId`: a troop space on the map graph
//! - `SiteId`: a named group of nodes
//! - `CardUid`: one physical copy of a card
//!
//! Ids are plain values so they can travel inside commands and replay
//! bundles. They never carry references into game state.
//!
//! ## Usage
//!
//! ```
//! use rust_sitewar::core::{CardUid, NodeId, SiteId};
//!
//! let node = NodeId::new(3);
//! assert_eq!(node.index(), 3);
//! assert_eq!(format!("{}", SiteId::new(1)), "Site(1)");
//! assert_eq!(CardUid::new(7).raw(), 7);
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a node on the map graph.
///
/// Map data must use dense ids `0..node_count`; the id doubles as the
/// node's index in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the graph's node table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Identifier of a site (a named set of nodes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(pub u32);

impl SiteId {
    /// Create a new site ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the graph's site table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Site({})", self.0)
    }
}

/// Identity of one physical card copy.
///
/// Two copies of the same definition share a `CardId` but never a
/// `CardUid`. Uids are allocated in a fixed order at setup, so the same
/// seed always yields the same uid for the same copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardUid(pub u32);

impl CardUid {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CardUid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Copy({})", self.0)
    }
}

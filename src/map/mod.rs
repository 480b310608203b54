//! The board: topology, site control and troop/spy operations.
//!
//! ## Key Types
//!
//! - `MapGraph`: Nodes, edges, sites; presence and reach queries
//! - `Site`: Member nodes, spies, derived owner and total control
//! - `MapData`: Serde form of a board, validated by `MapGraph::from_data`

pub mod combat;
pub mod control;
pub mod data;
pub mod graph;

pub use control::distribute_start_of_turn_rewards;
pub use data::{MapData, SiteData};
pub use graph::{MapGraph, Node, Site, SiteRewards};

//! hatetris-engine - placement graphs and per-board landing enumeration.
//!
//! The graph of every reachable piece placement is built once per well and
//! shared read-only; collision, completion and landing queries run against a
//! `Board` without mutating the graph.

pub mod apply;
pub mod collision;
pub mod graph;
pub mod landing;
pub mod render;
pub mod table;

pub use apply::{apply_placement, apply_placement_mut, unapply_placement};
pub use collision::{can_place, collides, would_complete};
pub use graph::{
    Action, Footprint, NodeId, Placement, PlacementGraph, PlacementGraphs, PlacementNode,
};
pub use landing::{find_landings, LandingList, Landings, VisitedSet};
pub use render::{describe, render};
pub use table::{GraphTable, NodeRecord, PieceTable, TableError};

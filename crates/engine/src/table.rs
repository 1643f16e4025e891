//! Static placement table - the graph flattened to serializable records
//!
//! Lets a run load a precomputed graph instead of rebuilding it. Records keep
//! the dense node order, so every edge is a plain index.

use hatetris_core::{ConfigError, Piece, Row, WellConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::graph::{
    spawn_footprints, Action, Footprint, NodeId, Placement, PlacementGraph, PlacementGraphs,
    PlacementNode,
};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("invalid well configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("full row mask {actual:#b} does not match the well width (expected {expected:#b})")]
    FullRow { expected: Row, actual: Row },
    #[error("descend action index {0} does not match this build")]
    DownAction(u8),
    #[error("expected {expected} piece tables, found {actual}")]
    PieceCount { expected: usize, actual: usize },
    #[error("piece table {index} is {actual}, expected {expected}")]
    PieceOrder {
        index: usize,
        expected: Piece,
        actual: Piece,
    },
    #[error("piece {0} has no nodes")]
    EmptyGraph(Piece),
    #[error("piece {piece} node {node} has edge to {target}, outside {len} nodes")]
    Edge {
        piece: Piece,
        node: usize,
        target: NodeId,
        len: usize,
    },
    #[error("piece {piece} node {node}: {reason}")]
    Record {
        piece: Piece,
        node: usize,
        reason: &'static str,
    },
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NodeRecord {
    pub orientation: u8,
    pub x: i32,
    pub y: i32,
    pub y_top: usize,
    pub y_bottom: usize,
    pub rows: Vec<Row>,
    pub next: [NodeId; Action::COUNT],
    pub out_of_bounds: bool,
    pub overlaps_spawn: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PieceTable {
    pub piece: Piece,
    pub nodes: Vec<NodeRecord>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GraphTable {
    pub config: WellConfig,
    /// Deepest search the well allows.
    pub max_depth: usize,
    /// Node count of the largest piece graph.
    pub max_nodes: usize,
    pub full_row: Row,
    pub down_action: u8,
    pub pieces: Vec<PieceTable>,
}

impl GraphTable {
    pub fn from_graphs(graphs: &PlacementGraphs) -> Self {
        let config = *graphs.config();
        let pieces = graphs
            .iter()
            .map(|graph| PieceTable {
                piece: graph.piece(),
                nodes: graph.nodes().iter().map(NodeRecord::from_node).collect(),
            })
            .collect();
        Self {
            config,
            max_depth: config.max_depth(),
            max_nodes: graphs.max_nodes(),
            full_row: config.full_row(),
            down_action: Action::Down.index() as u8,
            pieces,
        }
    }
}

impl NodeRecord {
    fn from_node(node: &PlacementNode) -> Self {
        let placement = node.placement();
        Self {
            orientation: placement.orientation,
            x: placement.x,
            y: placement.y,
            y_top: node.y_top(),
            y_bottom: node.y_bottom(),
            rows: node.rows().to_vec(),
            next: *node.edges(),
            out_of_bounds: node.out_of_bounds(),
            overlaps_spawn: node.overlaps_spawn(),
        }
    }

    /// Rebuild the node from its placement and check the record against it.
    fn to_node(
        &self,
        config: &WellConfig,
        spawns: &[Footprint],
        piece: Piece,
        index: usize,
        len: usize,
    ) -> Result<PlacementNode, TableError> {
        let bad = |reason| TableError::Record {
            piece,
            node: index,
            reason,
        };
        if self.orientation as usize >= piece.orientation_count() {
            return Err(bad("orientation out of range"));
        }
        if self.rows.iter().any(|&row| row & !config.full_row() != 0) {
            return Err(bad("row wider than the well"));
        }
        if let Some(&target) = self.next.iter().find(|&&t| t as usize >= len) {
            return Err(TableError::Edge {
                piece,
                node: index,
                target,
                len,
            });
        }
        let placement = Placement {
            piece,
            orientation: self.orientation,
            x: self.x,
            y: self.y,
        };
        if !placement.fits(config) {
            return Err(bad("placement outside the well"));
        }

        let derived = PlacementNode::new(config, placement, spawns, index as NodeId);
        if self.y_top != derived.y_top()
            || self.y_bottom != derived.y_bottom()
            || self.rows != derived.rows()
        {
            return Err(bad("rows do not match the placement"));
        }
        if self.out_of_bounds != derived.out_of_bounds() {
            return Err(bad("out-of-bounds flag does not match the placement"));
        }
        if self.overlaps_spawn != derived.overlaps_spawn() {
            return Err(bad("spawn overlap flag does not match the placement"));
        }
        Ok(PlacementNode::from_parts(
            placement,
            *derived.footprint(),
            derived.out_of_bounds(),
            derived.overlaps_spawn(),
            self.next,
        ))
    }
}

impl PlacementGraphs {
    /// Rebuild graphs from a table, checking every record and edge.
    pub fn from_table(table: &GraphTable) -> Result<Self, TableError> {
        let config = WellConfig::with_spare_rows(
            table.config.width(),
            table.config.height(),
            table.config.spare_rows(),
        )?;
        if table.full_row != config.full_row() {
            return Err(TableError::FullRow {
                expected: config.full_row(),
                actual: table.full_row,
            });
        }
        if table.down_action as usize != Action::Down.index() {
            return Err(TableError::DownAction(table.down_action));
        }
        if table.pieces.len() != Piece::COUNT {
            return Err(TableError::PieceCount {
                expected: Piece::COUNT,
                actual: table.pieces.len(),
            });
        }

        let spawns = spawn_footprints(&config);
        let mut graphs = Vec::with_capacity(Piece::COUNT);
        for (index, (piece_table, expected)) in table.pieces.iter().zip(Piece::ALL).enumerate() {
            if piece_table.piece != expected {
                return Err(TableError::PieceOrder {
                    index,
                    expected,
                    actual: piece_table.piece,
                });
            }
            if piece_table.nodes.is_empty() {
                return Err(TableError::EmptyGraph(expected));
            }
            let len = piece_table.nodes.len();
            let nodes = piece_table
                .nodes
                .iter()
                .enumerate()
                .map(|(i, record)| record.to_node(&config, &spawns, expected, i, len))
                .collect::<Result<Vec<_>, _>>()?;
            let graph = PlacementGraph::from_nodes(expected, nodes);
            if graph.find(Placement::spawn(expected, &config)) != Some(PlacementGraph::SPAWN) {
                return Err(TableError::Record {
                    piece: expected,
                    node: 0,
                    reason: "first record is not the spawn placement",
                });
            }
            graphs.push(graph);
        }

        info!(
            width = config.width(),
            height = config.height(),
            nodes = graphs.iter().map(PlacementGraph::len).sum::<usize>(),
            "placement graphs loaded from table"
        );
        Ok(Self::from_graphs(config, graphs))
    }
}

//! Placement graph - every reachable (piece, orientation, x, y) and its 4 edges
//!
//! Built once per well configuration by a breadth-first worklist over the
//! append-only node list. Nodes are identified by dense indices, index 0 is the
//! spawn placement, and a blocked move is an edge back to the node itself.

use hatetris_core::{Mask, Piece, Row, WellConfig, BOX_SIZE};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Dense index of a node within its piece's graph.
pub type NodeId = u32;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Action {
    Rotate,
    Left,
    Right,
    Down,
}

impl Action {
    pub const COUNT: usize = 4;

    /// Edge order of every traversal.
    pub const ALL: [Action; Action::COUNT] =
        [Action::Rotate, Action::Left, Action::Right, Action::Down];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Extent of the filled cells inside an orientation's bounding box.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Extent {
    x_offset: i32,
    x_dim: i32,
    y_offset: i32,
    y_dim: i32,
}

impl Extent {
    fn of(mask: &Mask) -> Self {
        let y_offset = mask.iter().take_while(|&&row| row == 0).count();
        let y_dim = mask[y_offset..].iter().take_while(|&&row| row != 0).count();
        let all = mask.iter().fold(0u8, |acc, &row| acc | row);
        let x_offset = all.trailing_zeros();
        let x_dim = (all >> x_offset).trailing_ones();
        Self {
            x_offset: x_offset as i32,
            x_dim: x_dim as i32,
            y_offset: y_offset as i32,
            y_dim: y_dim as i32,
        }
    }
}

/// Identity of a node. Everything else a node carries derives from these four.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub piece: Piece,
    pub orientation: u8,
    /// Bounding box column of its rightmost box column.
    pub x: i32,
    /// Bounding box row of its top box row.
    pub y: i32,
}

impl Placement {
    pub fn spawn(piece: Piece, config: &WellConfig) -> Self {
        Self {
            piece,
            orientation: 0,
            x: piece.spawn_x(config.width()) + config.margin(),
            y: piece.spawn_y(config.spare_rows()),
        }
    }

    #[inline]
    fn mask(&self) -> &'static Mask {
        &self.piece.masks()[self.orientation as usize]
    }

    #[inline]
    fn extent(&self) -> Extent {
        Extent::of(self.mask())
    }

    pub(crate) fn fits(&self, config: &WellConfig) -> bool {
        let e = self.extent();
        self.x + e.x_offset >= 0
            && self.x + e.x_offset + e.x_dim <= config.width() as i32
            && self.y + e.y_offset >= 0
            && self.y + e.y_offset + e.y_dim <= config.full_height() as i32
    }

    /// Placement after `action`, or `self` when the well boundary forbids it.
    pub fn step(self, action: Action, config: &WellConfig) -> Placement {
        let e = self.extent();
        match action {
            Action::Rotate => {
                let turned = Placement {
                    orientation: ((self.orientation as usize + 1) % self.piece.orientation_count())
                        as u8,
                    ..self
                };
                if turned.fits(config) {
                    turned
                } else {
                    self
                }
            }
            Action::Left => {
                if self.x + e.x_offset + e.x_dim >= config.width() as i32 {
                    self
                } else {
                    Placement { x: self.x + 1, ..self }
                }
            }
            Action::Right => {
                if self.x + e.x_offset <= 0 {
                    self
                } else {
                    Placement { x: self.x - 1, ..self }
                }
            }
            Action::Down => {
                if self.y + e.y_offset + e.y_dim >= config.full_height() as i32 {
                    self
                } else {
                    Placement { y: self.y + 1, ..self }
                }
            }
        }
    }

    /// Occupied cells in well coordinates. The placement must fit the well.
    pub fn footprint(&self) -> Footprint {
        let e = self.extent();
        let mask = self.mask();
        debug_assert!(self.y + e.y_offset >= 0, "placement above the well: {self:?}");
        let mut rows = [0 as Row; BOX_SIZE];
        for (i, row) in rows.iter_mut().take(e.y_dim as usize).enumerate() {
            let bits = Row::from(mask[e.y_offset as usize + i]);
            *row = if self.x >= 0 {
                bits << self.x
            } else {
                bits >> -self.x
            };
        }
        Footprint {
            y_top: (self.y + e.y_offset) as usize,
            len: e.y_dim as u8,
            rows,
        }
    }
}

/// Row masks of a placement, starting at `y_top`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Footprint {
    y_top: usize,
    len: u8,
    rows: [Row; BOX_SIZE],
}

impl Footprint {
    #[inline(always)]
    pub fn y_top(&self) -> usize {
        self.y_top
    }

    /// One past the lowest occupied row.
    #[inline(always)]
    pub fn y_bottom(&self) -> usize {
        self.y_top + self.len as usize
    }

    /// Masks of the spanned rows, `y_top` first.
    #[inline(always)]
    pub fn rows(&self) -> &[Row] {
        &self.rows[..self.len as usize]
    }

    /// Mask for well row `y`, zero outside the span.
    pub fn row_at(&self, y: usize) -> Row {
        if y >= self.y_top && y < self.y_bottom() {
            self.rows[y - self.y_top]
        } else {
            0
        }
    }

    pub fn overlaps(&self, other: &Footprint) -> bool {
        (self.y_top..self.y_bottom()).any(|y| self.row_at(y) & other.row_at(y) != 0)
    }
}

/// A reachable placement with everything the search needs precomputed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PlacementNode {
    placement: Placement,
    footprint: Footprint,
    out_of_bounds: bool,
    overlaps_spawn: bool,
    next: [NodeId; Action::COUNT],
}

impl PlacementNode {
    /// Derive node data for `placement`. Edges start as self-loops at `id`.
    pub(crate) fn new(
        config: &WellConfig,
        placement: Placement,
        spawns: &[Footprint],
        id: NodeId,
    ) -> Self {
        let footprint = placement.footprint();
        Self {
            placement,
            footprint,
            out_of_bounds: footprint.y_bottom() <= config.spare_rows(),
            overlaps_spawn: spawns.iter().any(|spawn| footprint.overlaps(spawn)),
            next: [id; Action::COUNT],
        }
    }

    pub(crate) fn from_parts(
        placement: Placement,
        footprint: Footprint,
        out_of_bounds: bool,
        overlaps_spawn: bool,
        next: [NodeId; Action::COUNT],
    ) -> Self {
        Self {
            placement,
            footprint,
            out_of_bounds,
            overlaps_spawn,
            next,
        }
    }

    #[inline(always)]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[inline(always)]
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    #[inline(always)]
    pub fn y_top(&self) -> usize {
        self.footprint.y_top
    }

    #[inline(always)]
    pub fn y_bottom(&self) -> usize {
        self.footprint.y_bottom()
    }

    #[inline(always)]
    pub fn rows(&self) -> &[Row] {
        self.footprint.rows()
    }

    /// Entirely inside the hidden rows: landing here tops out.
    #[inline(always)]
    pub fn out_of_bounds(&self) -> bool {
        self.out_of_bounds
    }

    /// Shares a cell with some piece's spawn placement.
    #[inline(always)]
    pub fn overlaps_spawn(&self) -> bool {
        self.overlaps_spawn
    }

    #[inline(always)]
    pub fn next(&self, action: Action) -> NodeId {
        self.next[action.index()]
    }

    #[inline(always)]
    pub fn edges(&self) -> &[NodeId; Action::COUNT] {
        &self.next
    }
}

/// All placements of one piece kind, spawn first.
#[derive(Clone, Debug)]
pub struct PlacementGraph {
    piece: Piece,
    nodes: Vec<PlacementNode>,
}

impl PlacementGraph {
    pub const SPAWN: NodeId = 0;

    pub(crate) fn from_nodes(piece: Piece, nodes: Vec<PlacementNode>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { piece, nodes }
    }

    fn build(config: &WellConfig, piece: Piece, spawns: &[Footprint]) -> Self {
        let mut nodes: Vec<PlacementNode> = Vec::new();
        let mut index: FxHashMap<Placement, NodeId> = FxHashMap::default();

        let mut intern = |nodes: &mut Vec<PlacementNode>, placement: Placement| -> NodeId {
            *index.entry(placement).or_insert_with(|| {
                let id = nodes.len() as NodeId;
                nodes.push(PlacementNode::new(config, placement, spawns, id));
                id
            })
        };

        intern(&mut nodes, Placement::spawn(piece, config));

        // the node list doubles as the BFS queue
        let mut cursor = 0;
        while cursor < nodes.len() {
            let from = nodes[cursor].placement;
            for action in Action::ALL {
                let target = intern(&mut nodes, from.step(action, config));
                nodes[cursor].next[action.index()] = target;
            }
            cursor += 1;
        }

        debug!(piece = %piece, nodes = nodes.len(), "built placement graph");
        Self { piece, nodes }
    }

    #[inline(always)]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[inline(always)]
    pub fn node(&self, id: NodeId) -> &PlacementNode {
        &self.nodes[id as usize]
    }

    #[inline(always)]
    pub fn nodes(&self) -> &[PlacementNode] {
        &self.nodes
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline(always)]
    pub fn spawn(&self) -> &PlacementNode {
        self.node(Self::SPAWN)
    }

    /// Index of an existing placement, linear scan.
    pub fn find(&self, placement: Placement) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.placement == placement)
            .map(|i| i as NodeId)
    }
}

/// Spawn footprint of every piece kind, in evaluation order.
pub(crate) fn spawn_footprints(config: &WellConfig) -> Vec<Footprint> {
    Piece::ALL
        .iter()
        .map(|&piece| Placement::spawn(piece, config).footprint())
        .collect()
}

/// Placement graphs of all seven piece kinds for one well configuration.
#[derive(Clone, Debug)]
pub struct PlacementGraphs {
    config: WellConfig,
    graphs: Vec<PlacementGraph>,
}

impl PlacementGraphs {
    pub fn build(config: &WellConfig) -> Self {
        // every node's spawn overlap depends on all spawns, so place them first
        let spawns = spawn_footprints(config);

        let graphs: Vec<PlacementGraph> = Piece::ALL
            .iter()
            .map(|&piece| PlacementGraph::build(config, piece, &spawns))
            .collect();

        info!(
            width = config.width(),
            height = config.height(),
            nodes = graphs.iter().map(PlacementGraph::len).sum::<usize>(),
            "placement graphs ready"
        );
        Self {
            config: *config,
            graphs,
        }
    }

    pub(crate) fn from_graphs(config: WellConfig, graphs: Vec<PlacementGraph>) -> Self {
        debug_assert_eq!(graphs.len(), Piece::COUNT);
        Self { config, graphs }
    }

    #[inline(always)]
    pub fn config(&self) -> &WellConfig {
        &self.config
    }

    #[inline(always)]
    pub fn graph(&self, piece: Piece) -> &PlacementGraph {
        &self.graphs[piece.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacementGraph> {
        self.graphs.iter()
    }

    /// Largest node count over all piece kinds.
    pub fn max_nodes(&self) -> usize {
        self.graphs.iter().map(PlacementGraph::len).max().unwrap_or(0)
    }
}

//! Landing enumeration - where can the current piece come to rest?
//!
//! Depth-first over the board-legal part of a placement graph. The first
//! reachable landing that completes a row ends the search; otherwise every
//! landing that neither tops out nor blocks a spawn is collected in discovery
//! order.

use hatetris_core::Board;
use smallvec::SmallVec;
use tracing::trace;

use crate::collision::{collides, would_complete};
use crate::graph::{Action, NodeId, PlacementGraph};

/// Landing sites of one search, in discovery order.
pub type LandingList = SmallVec<[NodeId; 64]>;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Landings {
    /// Landing here completes a row.
    Line(NodeId),
    /// No row can be completed; every other legitimate landing.
    Sites(LandingList),
}

impl Landings {
    pub fn line(&self) -> Option<NodeId> {
        match self {
            Landings::Line(id) => Some(*id),
            Landings::Sites(_) => None,
        }
    }

    pub fn sites(&self) -> &[NodeId] {
        match self {
            Landings::Line(_) => &[],
            Landings::Sites(sites) => sites,
        }
    }
}

/// Per-search visited marks, one bit per node of a graph.
#[derive(Clone, Debug)]
pub struct VisitedSet {
    words: SmallVec<[u64; 64]>,
}

impl VisitedSet {
    pub fn new(len: usize) -> Self {
        Self {
            words: smallvec::smallvec![0; len.div_ceil(64)],
        }
    }

    /// Mark `id`, returning whether it was unmarked before.
    #[inline(always)]
    pub fn insert(&mut self, id: NodeId) -> bool {
        let (word, bit) = (id as usize / 64, id % 64);
        let fresh = self.words[word] & (1 << bit) == 0;
        self.words[word] |= 1 << bit;
        fresh
    }

    #[inline(always)]
    pub fn contains(&self, id: NodeId) -> bool {
        self.words[id as usize / 64] & (1 << (id % 64)) != 0
    }
}

#[derive(Clone, Copy)]
struct Frame {
    node: NodeId,
    action: u8,
}

/// Enumerate the landings of `graph`'s piece on `board`.
pub fn find_landings(board: &Board, graph: &PlacementGraph) -> Landings {
    let mut sites = LandingList::new();
    if collides(board, graph.spawn()) {
        // the piece cannot even enter the well
        return Landings::Sites(sites);
    }

    let mut visited = VisitedSet::new(graph.len());
    let mut stack: SmallVec<[Frame; 64]> = SmallVec::new();
    visited.insert(PlacementGraph::SPAWN);
    stack.push(Frame {
        node: PlacementGraph::SPAWN,
        action: 0,
    });

    while let Some(frame) = stack.last_mut() {
        let Some(&action) = Action::ALL.get(frame.action as usize) else {
            stack.pop();
            continue;
        };
        frame.action += 1;
        let id = frame.node;
        let node = graph.node(id);
        let next = node.next(action);
        debug_assert!((next as usize) < graph.len(), "edge leaves the graph");

        if action == Action::Down && (next == id || collides(board, graph.node(next))) {
            if node.out_of_bounds() {
                continue;
            }
            if would_complete(board, node) {
                trace!(piece = %graph.piece(), node = id, "line reachable");
                return Landings::Line(id);
            }
            if node.overlaps_spawn() {
                continue;
            }
            sites.push(id);
        } else {
            if visited.contains(next) || collides(board, graph.node(next)) {
                continue;
            }
            visited.insert(next);
            stack.push(Frame {
                node: next,
                action: 0,
            });
        }
    }

    Landings::Sites(sites)
}

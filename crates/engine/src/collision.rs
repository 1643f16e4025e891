//! collision and line-completion tests against settled rows

use hatetris_core::Board;

use crate::graph::PlacementNode;

/// does the node share a cell with the board?
#[inline(always)]
pub fn collides(board: &Board, node: &PlacementNode) -> bool {
    let rows = board.rows();
    node.rows()
        .iter()
        .zip(&rows[node.y_top()..])
        .any(|(&piece, &settled)| piece & settled != 0)
}

/// can we place here? (just !collides)
#[inline(always)]
pub fn can_place(board: &Board, node: &PlacementNode) -> bool {
    !collides(board, node)
}

/// would landing the node fill some row completely?
#[inline(always)]
pub fn would_complete(board: &Board, node: &PlacementNode) -> bool {
    let full = board.full_row();
    let rows = board.rows();
    node.rows()
        .iter()
        .zip(&rows[node.y_top()..])
        .any(|(&piece, &settled)| piece | settled == full)
}

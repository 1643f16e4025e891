use hatetris_core::Board;

use crate::graph::PlacementNode;

/// Settle a node into a copy of the board.
pub fn apply_placement(board: &Board, node: &PlacementNode) -> Board {
    let mut next = board.clone();
    apply_placement_mut(&mut next, node);
    next
}

/// Settle a node in place. The node must not collide with the board.
#[inline]
pub fn apply_placement_mut(board: &mut Board, node: &PlacementNode) {
    let top = node.y_top();
    for (settled, &piece) in board.rows_mut()[top..].iter_mut().zip(node.rows()) {
        debug_assert_eq!(*settled & piece, 0, "placing over settled cells");
        *settled |= piece;
    }
}

/// Undo `apply_placement_mut` - restores the board bit for bit
#[inline]
pub fn unapply_placement(board: &mut Board, node: &PlacementNode) {
    let top = node.y_top();
    for (settled, &piece) in board.rows_mut()[top..].iter_mut().zip(node.rows()) {
        *settled &= !piece;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::can_place;
    use crate::graph::PlacementGraphs;
    use hatetris_core::{Row, WellConfig};

    /// xorshift64 - fixed seed so the boards are the same every run
    fn random_boards(config: &WellConfig, count: usize) -> Vec<Board> {
        let mut state: u64 = 0xdeadbeefcafe1234;
        let mut boards = Vec::with_capacity(count);
        for _ in 0..count {
            let rows: Vec<Row> = (0..config.full_height())
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    // sparse rows so plenty of nodes still fit
                    (state & (state >> 17) & (state >> 31)) as Row & config.full_row()
                })
                .collect();
            boards.push(Board::from_rows(config, &rows).unwrap());
        }
        boards
    }

    #[test]
    fn test_apply_o_piece_empty() {
        let config = WellConfig::standard();
        let graphs = PlacementGraphs::build(&config);
        let spawn = graphs.graph(hatetris_core::Piece::O).spawn();
        let board = Board::empty(&config);
        let next = apply_placement(&board, spawn);
        assert_eq!(next.filled_cells(), 4);
        assert!(next.get(4, 0) && next.get(5, 0) && next.get(4, 1) && next.get(5, 1));
        assert!(board.is_empty());
    }

    #[test]
    fn test_apply_unapply_restores_board() {
        let config = WellConfig::new(7, 6).unwrap();
        let graphs = PlacementGraphs::build(&config);
        let mut checked = 0usize;
        for original in random_boards(&config, 16) {
            let mut board = original.clone();
            for graph in graphs.iter() {
                for node in graph.nodes().iter().filter(|n| can_place(&original, n)) {
                    apply_placement_mut(&mut board, node);
                    assert_eq!(
                        board.filled_cells(),
                        original.filled_cells() + 4,
                        "{:?}",
                        node.placement()
                    );
                    unapply_placement(&mut board, node);
                    assert_eq!(board, original);
                    checked += 1;
                }
            }
        }
        assert!(checked > 0);
    }
}

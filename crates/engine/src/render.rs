//! Text rendering of a well, optionally with a placement drawn over it.

use hatetris_core::{Board, WellConfig};

use crate::graph::PlacementNode;

fn bar(out: &mut String, width: usize) {
    out.push('+');
    out.extend(std::iter::repeat('-').take(width));
    out.push_str("+\n");
}

/// `#` settled, `@` placement, `.` empty; a bar separates the hidden rows.
pub fn render(config: &WellConfig, board: &Board, node: Option<&PlacementNode>) -> String {
    let width = config.width();
    let mut out = String::new();
    bar(&mut out, width);
    for y in 0..config.full_height() {
        if y == config.spare_rows() {
            bar(&mut out, width);
        }
        let piece = node.map_or(0, |n| n.footprint().row_at(y));
        out.push('|');
        for x in (0..width).rev() {
            let cell = if (piece >> x) & 1 == 1 {
                '@'
            } else if board.get(x, y) {
                '#'
            } else {
                '.'
            };
            out.push(cell);
        }
        out.push_str("|\n");
    }
    bar(&mut out, width);
    out
}

/// One-line description of a node for logs and strategy listings.
pub fn describe(node: &PlacementNode) -> String {
    let placement = node.placement();
    format!(
        "{} orientation {} at x={} y={} (rows {}..{})",
        placement.piece,
        placement.orientation,
        placement.x,
        placement.y,
        node.y_top(),
        node.y_bottom()
    )
}

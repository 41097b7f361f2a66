//! Removal of paragraphs that duplicate table cells.
//!
//! The layout service reports table cell text a second time as free
//! paragraphs. When that happens the paragraph and the cell share the same
//! geometry, so an edge match against the cell quads identifies the copies.

use crate::model::{Table, TextBlock};

/// Drop every block whose quad matches some table cell's edges.
///
/// With `tolerance == 0.0` only exact edge equality counts; a block that is
/// off by any amount is kept.
pub fn filter_table_collisions(
    blocks: Vec<TextBlock>,
    tables: &[Table],
    tolerance: f64,
) -> Vec<TextBlock> {
    if tables.is_empty() {
        return blocks;
    }

    let before = blocks.len();
    let kept: Vec<TextBlock> = blocks
        .into_iter()
        .filter(|block| !collides(block, tables, tolerance))
        .collect();

    if kept.len() < before {
        log::debug!(
            "Removed {} blocks duplicated inside table cells",
            before - kept.len()
        );
    }
    kept
}

fn collides(block: &TextBlock, tables: &[Table], tolerance: f64) -> bool {
    tables
        .iter()
        .flat_map(Table::cell_quads)
        .any(|cell| block.quad.edges_match(cell, tolerance))
}

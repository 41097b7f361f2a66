//! Column segmentation.
//!
//! Greedy left-to-right bucketing: blocks are sorted by their left edge and
//! a new column starts whenever a block begins to the right of the current
//! column's provisional right edge. This is correct as long as columns do
//! not interleave horizontally, which holds for typeset multi-column pages.

use crate::model::{BlockRole, PlacedBlock, TextBlock};

/// A left-to-right bucket of blocks, ordered top to bottom.
#[derive(Debug, Clone)]
pub struct Column<'a> {
    /// Column index (0 = leftmost)
    pub index: usize,

    /// Members sorted ascending by `top`
    pub blocks: Vec<&'a TextBlock>,
}

/// Partition blocks into columns.
///
/// Titles never open a column; they join whichever column is current.
/// Empty columns are not emitted.
pub fn segment_columns<'a>(blocks: &[&'a TextBlock]) -> Vec<Column<'a>> {
    let mut sorted: Vec<&'a TextBlock> = blocks.to_vec();
    sorted.sort_by(|a, b| a.left().total_cmp(&b.left()));

    let mut columns: Vec<Column<'a>> = Vec::new();
    let mut current: Vec<&'a TextBlock> = Vec::new();
    let mut column_right_edge = 0.0;

    for block in sorted {
        if block.role != BlockRole::Title && block.left() > column_right_edge {
            close_column(&mut columns, std::mem::take(&mut current));
            current.push(block);
            column_right_edge = block.quad.top_right_x();
        } else {
            current.push(block);
        }
    }
    close_column(&mut columns, current);

    log::trace!("Segmented {} blocks into {} columns", blocks.len(), columns.len());
    columns
}

fn close_column<'a>(columns: &mut Vec<Column<'a>>, mut members: Vec<&'a TextBlock>) {
    if members.is_empty() {
        return;
    }
    members.sort_by(|a, b| a.top().total_cmp(&b.top()));
    columns.push(Column {
        index: columns.len(),
        blocks: members,
    });
}

/// Segment blocks into columns and flatten them into reading order.
pub fn order_blocks<'a>(blocks: &[&'a TextBlock]) -> Vec<PlacedBlock<'a>> {
    segment_columns(blocks)
        .into_iter()
        .flat_map(|column| {
            let index = column.index;
            column
                .blocks
                .into_iter()
                .map(move |block| PlacedBlock::new(block, index))
        })
        .collect()
}

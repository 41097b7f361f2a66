//! Table types.

use super::BoundingQuad;
use serde::{Deserialize, Serialize};

/// A table detected by the layout service.
///
/// Only cell geometry matters to reading-order reconstruction: the service
/// re-emits cell text as free paragraphs, which are matched against the
/// cell quads and removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Cells with a usable bounding quad
    pub cells: Vec<TableCell>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell to the table.
    pub fn add_cell(&mut self, cell: TableCell) {
        self.cells.push(cell);
    }

    /// Check if the table has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over cell quads.
    pub fn cell_quads(&self) -> impl Iterator<Item = &BoundingQuad> {
        self.cells.iter().map(|c| &c.quad)
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Row position (0-indexed)
    pub row_index: usize,

    /// Column position (0-indexed)
    pub column_index: usize,

    /// Cell text
    pub content: String,

    /// Cell position on the page
    pub quad: BoundingQuad,
}

impl TableCell {
    /// Create a new cell.
    pub fn new(
        row_index: usize,
        column_index: usize,
        content: impl Into<String>,
        quad: BoundingQuad,
    ) -> Self {
        Self {
            row_index,
            column_index,
            content: content.into(),
            quad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_quads() {
        let q = BoundingQuad::from_edges(0.0, 0.0, 0.1, 0.1);
        let mut table = Table::new();
        table.add_cell(TableCell::new(0, 0, "a", q));
        table.add_cell(TableCell::new(0, 1, "b", q));

        assert!(!table.is_empty());
        assert_eq!(table.cell_quads().count(), 2);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.cell_quads().count(), 0);
    }
}

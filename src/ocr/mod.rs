//! Decoding of layout-service results into page content.
//!
//! The service itself is an external collaborator; this module only turns
//! its JSON into [`TextBlock`]s and [`Table`]s. Paragraphs and cells without
//! a usable polygon cannot be placed on the page and are dropped here, before
//! any geometry runs.

mod result;

pub use result::{
    AnalyzeResult, BoundingRegion, Polygon, RawPage, RawParagraph, RawTable, RawTableCell,
};

use serde::Deserialize;

use crate::error::Result;
use crate::model::{BlockRole, BoundingQuad, Table, TableCell, TextBlock};
use result::first_quad;

/// Blocks and tables of one page, ready for layout analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    /// Text blocks with usable geometry, in service order
    pub blocks: Vec<TextBlock>,

    /// Tables with at least one placed cell
    pub tables: Vec<Table>,

    /// Paragraphs dropped for lacking geometry
    pub malformed: usize,
}

impl PageContent {
    /// Decode a typed layout result.
    ///
    /// When the first page record carries dimensions, coordinates are
    /// normalized into `[0, 1]`; otherwise they are taken as already
    /// normalized.
    pub fn from_result(result: &AnalyzeResult) -> Self {
        let scale = result.pages.first().and_then(|p| p.dimensions());
        let place = |quad: BoundingQuad| match scale {
            Some((w, h)) => quad.normalized(w, h),
            None => quad,
        };

        let mut blocks = Vec::with_capacity(result.paragraphs.len());
        let mut malformed = 0;
        for paragraph in &result.paragraphs {
            match first_quad(paragraph.bounding_regions.as_deref()) {
                Some(quad) => blocks.push(TextBlock::new(
                    BlockRole::from_service(paragraph.role.as_deref()),
                    paragraph.content.clone(),
                    place(quad),
                )),
                None => malformed += 1,
            }
        }

        if malformed > 0 {
            log::debug!("Dropped {} paragraphs without a bounding polygon", malformed);
        }

        let tables = result
            .tables
            .iter()
            .map(|raw| {
                let mut table = Table::new();
                for cell in &raw.cells {
                    if let Some(quad) = first_quad(cell.bounding_regions.as_deref()) {
                        table.add_cell(TableCell::new(
                            cell.row_index,
                            cell.column_index,
                            cell.content.clone(),
                            place(quad),
                        ));
                    }
                }
                table
            })
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            blocks,
            tables,
            malformed,
        }
    }

    /// Decode an opaque JSON layout result, as stored in the page cache.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let result = AnalyzeResult::deserialize(value)?;
        Ok(Self::from_result(&result))
    }

    /// Check if the page has no placeable blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_drops_malformed() {
        let value = json!({
            "paragraphs": [
                {
                    "role": "sectionHeading",
                    "content": "Heading",
                    "boundingRegions": [{"pageNumber": 1, "polygon": [0.1, 0.1, 0.9, 0.1, 0.9, 0.15, 0.1, 0.15]}]
                },
                { "content": "No region" },
                { "content": "Empty regions", "boundingRegions": [] },
                { "content": "No polygon", "boundingRegions": [{"pageNumber": 1}] }
            ]
        });

        let page = PageContent::from_json(&value).unwrap();
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.malformed, 3);
        assert_eq!(page.blocks[0].role, BlockRole::SectionHeading);
        assert_eq!(page.blocks[0].content, "Heading");
    }

    #[test]
    fn test_from_json_normalizes_by_page_size() {
        let value = json!({
            "pages": [{"pageNumber": 1, "width": 8.5, "height": 11.0, "unit": "inch"}],
            "paragraphs": [{
                "content": "Body",
                "boundingRegions": [{"pageNumber": 1, "polygon": [
                    {"x": 0.85, "y": 1.1}, {"x": 4.25, "y": 1.1},
                    {"x": 4.25, "y": 5.5}, {"x": 0.85, "y": 5.5}
                ]}]
            }]
        });

        let page = PageContent::from_json(&value).unwrap();
        let quad = page.blocks[0].quad;
        assert!((quad.left() - 0.1).abs() < 1e-12);
        assert!((quad.top() - 0.1).abs() < 1e-12);
        assert_eq!(quad.right(), 0.5);
        assert_eq!(quad.bottom(), 0.5);
    }

    #[test]
    fn test_tables_keep_placed_cells() {
        let value = json!({
            "tables": [
                {
                    "rowCount": 1,
                    "columnCount": 2,
                    "cells": [
                        {"rowIndex": 0, "columnIndex": 0, "content": "a",
                         "boundingRegions": [{"pageNumber": 1, "polygon": [0.1, 0.5, 0.2, 0.5, 0.2, 0.55, 0.1, 0.55]}]},
                        {"rowIndex": 0, "columnIndex": 1, "content": "b"}
                    ]
                },
                { "rowCount": 1, "columnCount": 1, "cells": [{"content": "unplaced"}] }
            ]
        });

        let page = PageContent::from_json(&value).unwrap();
        assert_eq!(page.tables.len(), 1);
        assert_eq!(page.tables[0].cells.len(), 1);
        assert_eq!(page.tables[0].cells[0].content, "a");
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let value = json!("not a result");
        assert!(PageContent::from_json(&value).is_err());
    }
}

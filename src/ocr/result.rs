//! Raw layout-service result shapes.
//!
//! These mirror the JSON the service returns (camelCase keys). Everything is
//! optional or defaulted; a result that is missing pieces still decodes and
//! the missing parts are simply ignored downstream.

use serde::{Deserialize, Serialize};

use crate::model::{BoundingQuad, Point};

/// Result of analyzing a single-page document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    /// Page dimension records
    #[serde(default)]
    pub pages: Vec<RawPage>,

    /// Recognized paragraphs
    #[serde(default)]
    pub paragraphs: Vec<RawParagraph>,

    /// Detected tables
    #[serde(default)]
    pub tables: Vec<RawTable>,
}

/// Page dimensions as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPage {
    /// 1-indexed page number within the analyzed blob
    #[serde(default)]
    pub page_number: u32,

    /// Page width in `unit`
    #[serde(default)]
    pub width: Option<f64>,

    /// Page height in `unit`
    #[serde(default)]
    pub height: Option<f64>,

    /// Measurement unit (`inch`, `pixel`)
    #[serde(default)]
    pub unit: Option<String>,
}

impl RawPage {
    /// Width and height when both are positive.
    pub fn dimensions(&self) -> Option<(f64, f64)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some((w, h)),
            _ => None,
        }
    }
}

/// A recognized paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParagraph {
    /// Role string (`title`, `sectionHeading`, `pageNumber`, ...)
    #[serde(default)]
    pub role: Option<String>,

    /// Paragraph text
    #[serde(default)]
    pub content: String,

    /// Regions the paragraph occupies
    #[serde(default)]
    pub bounding_regions: Option<Vec<BoundingRegion>>,
}

/// A detected table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTable {
    /// Number of rows
    #[serde(default)]
    pub row_count: usize,

    /// Number of columns
    #[serde(default)]
    pub column_count: usize,

    /// Table cells
    #[serde(default)]
    pub cells: Vec<RawTableCell>,
}

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTableCell {
    /// Row position
    #[serde(default)]
    pub row_index: usize,

    /// Column position
    #[serde(default)]
    pub column_index: usize,

    /// Cell text
    #[serde(default)]
    pub content: String,

    /// Regions the cell occupies
    #[serde(default)]
    pub bounding_regions: Option<Vec<BoundingRegion>>,
}

/// A polygon on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingRegion {
    /// 1-indexed page number
    #[serde(default)]
    pub page_number: u32,

    /// Polygon corners
    #[serde(default)]
    pub polygon: Option<Polygon>,
}

/// Polygon encoding: either point objects or a flat `[x0, y0, x1, y1, ...]` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Polygon {
    /// `[{ "x": .., "y": .. }, ...]`
    Points(Vec<Point>),
    /// `[x0, y0, x1, y1, ...]`
    Flat(Vec<f64>),
}

impl Polygon {
    /// The first four corners as a quad, if the polygon has at least four.
    pub fn to_quad(&self) -> Option<BoundingQuad> {
        let points: Vec<Point> = match self {
            Polygon::Points(points) => points.iter().take(4).copied().collect(),
            Polygon::Flat(coords) => coords
                .chunks_exact(2)
                .take(4)
                .map(|c| Point::new(c[0], c[1]))
                .collect(),
        };
        let points: [Point; 4] = points.try_into().ok()?;
        Some(BoundingQuad::new(points))
    }
}

/// First usable quad of a region list.
pub(crate) fn first_quad(regions: Option<&[BoundingRegion]>) -> Option<BoundingQuad> {
    regions?.first()?.polygon.as_ref()?.to_quad()
}

//! Section and page types produced by reading-order reconstruction.

use super::{BlockRole, TextBlock};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A block placed in reading order.
///
/// Carries the transient column assignment from segmentation; the block
/// itself is borrowed from the page and never copied.
#[derive(Debug, Clone, Copy)]
pub struct PlacedBlock<'a> {
    /// The placed block
    pub block: &'a TextBlock,

    /// Column the block was assigned to (0 = leftmost in its band)
    pub column_index: usize,
}

impl<'a> PlacedBlock<'a> {
    /// Place a block in a column.
    pub fn new(block: &'a TextBlock, column_index: usize) -> Self {
        Self {
            block,
            column_index,
        }
    }

    /// Check whether this placement refers to the given block.
    pub fn is(&self, block: &TextBlock) -> bool {
        std::ptr::eq(self.block, block)
    }
}

impl Deref for PlacedBlock<'_> {
    type Target = TextBlock;

    fn deref(&self) -> &TextBlock {
        self.block
    }
}

/// A named run of paragraphs between two major headers.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    /// Content of the header that opened the section (empty if none)
    pub name: String,

    /// Whether the opening header was a confirmed document title
    pub is_title: bool,

    /// Paragraphs in reading order
    pub paragraphs: Vec<PlacedBlock<'a>>,

    /// `(min top, max bottom)` over the paragraphs
    pub vertical_bounds: (f64, f64),
}

impl<'a> Section<'a> {
    /// Create a section, computing its vertical bounds.
    pub fn new(name: impl Into<String>, is_title: bool, paragraphs: Vec<PlacedBlock<'a>>) -> Self {
        let vertical_bounds = vertical_bounds(&paragraphs);
        Self {
            name: name.into(),
            is_title,
            paragraphs,
            vertical_bounds,
        }
    }

    /// Number of paragraphs.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Check if the section has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Paragraph texts in reading order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.paragraphs.iter().map(|p| p.block.content.as_str())
    }

    /// Convert to an owned snapshot.
    pub fn to_snapshot(&self) -> SectionSnapshot {
        SectionSnapshot {
            name: self.name.clone(),
            is_title: self.is_title,
            paragraphs: self
                .paragraphs
                .iter()
                .map(|p| ParagraphSnapshot {
                    role: p.role,
                    content: p.content.clone(),
                    column_index: p.column_index,
                })
                .collect(),
            vertical_bounds: self.vertical_bounds,
        }
    }
}

fn vertical_bounds(paragraphs: &[PlacedBlock<'_>]) -> (f64, f64) {
    if paragraphs.is_empty() {
        return (0.0, 0.0);
    }
    paragraphs.iter().fold((f64::MAX, f64::MIN), |(top, bottom), p| {
        (top.min(p.top()), bottom.max(p.bottom()))
    })
}

/// The reconstructed structure of one page.
#[derive(Debug, Clone)]
pub struct ParsedPage<'a> {
    /// Position of the page in the source document
    pub source_page_index: u32,

    /// Number printed on the page, if one was recognized
    pub logical_page_number: Option<i64>,

    /// Confirmed document title
    pub title: Option<String>,

    /// Sections in reading order
    pub sections: Vec<Section<'a>>,
}

impl ParsedPage<'_> {
    /// The printed page number, falling back to the source index.
    pub fn page_number(&self) -> i64 {
        self.logical_page_number
            .unwrap_or(i64::from(self.source_page_index))
    }

    /// Total paragraphs across all sections.
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Convert to an owned snapshot.
    pub fn to_snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            source_page_index: self.source_page_index,
            page_number: self.page_number(),
            logical_page_number: self.logical_page_number,
            title: self.title.clone(),
            sections: self.sections.iter().map(Section::to_snapshot).collect(),
        }
    }
}

/// Owned, serializable form of a [`ParsedPage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Position of the page in the source document
    pub source_page_index: u32,

    /// Effective page number (printed number or source index)
    pub page_number: i64,

    /// Number printed on the page, if one was recognized
    pub logical_page_number: Option<i64>,

    /// Confirmed document title
    pub title: Option<String>,

    /// Sections in reading order
    pub sections: Vec<SectionSnapshot>,
}

impl PageSnapshot {
    /// Total paragraphs across all sections.
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }
}

/// Owned, serializable form of a [`Section`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSnapshot {
    /// Section name
    pub name: String,

    /// Whether the opening header was a confirmed title
    pub is_title: bool,

    /// Paragraphs in reading order
    pub paragraphs: Vec<ParagraphSnapshot>,

    /// `(min top, max bottom)` over the paragraphs
    pub vertical_bounds: (f64, f64),
}

/// Owned, serializable form of a placed paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphSnapshot {
    /// Role of the source block
    pub role: BlockRole,

    /// Paragraph text
    pub content: String,

    /// Column assignment
    pub column_index: usize,
}

//! Header, title, and page-number detection.
//!
//! Classifies a page's blocks into body text and major headers (the blocks
//! that delimit sections), recovers the printed page number, and confirms
//! the document title when the service reports it twice in a row.

use super::LayoutOptions;
use crate::model::{BlockRole, TextBlock};

/// A block that delimits sections.
#[derive(Debug, Clone, Copy)]
pub struct MajorHeader<'a> {
    /// The header block
    pub block: &'a TextBlock,

    /// Whether the header is a confirmed document title
    pub is_title: bool,
}

impl<'a> MajorHeader<'a> {
    /// Check whether this header is the given block.
    pub fn is(&self, block: &TextBlock) -> bool {
        std::ptr::eq(self.block, block)
    }
}

/// Classification of a page's blocks.
#[derive(Debug, Clone, Default)]
pub struct HeaderAnalysis<'a> {
    /// Every block that takes part in reading order, including major headers
    /// and suppressed headings, in input order
    pub body: Vec<&'a TextBlock>,

    /// Major headers sorted ascending by `top`
    pub major_headers: Vec<MajorHeader<'a>>,

    /// Confirmed document title
    pub title: Option<String>,

    /// Printed page number
    pub logical_page_number: Option<i64>,
}

impl<'a> HeaderAnalysis<'a> {
    /// Look up the major header for a block, if it is one.
    pub fn header_for(&self, block: &TextBlock) -> Option<&MajorHeader<'a>> {
        self.major_headers.iter().find(|h| h.is(block))
    }
}

/// Classify blocks into body text and major headers.
///
/// Section headings that share vertical extent with any non-heading block
/// are treated as mislabelled paragraph lines and stay in the body. The
/// check runs against a snapshot of the non-heading spans taken before any
/// heading is classified.
pub fn detect_headers<'a>(blocks: &'a [TextBlock], options: &LayoutOptions) -> HeaderAnalysis<'a> {
    let non_heading_spans: Vec<(f64, f64)> = blocks
        .iter()
        .filter(|b| b.role != BlockRole::SectionHeading)
        .map(|b| b.quad.vertical_span())
        .collect();

    let mut analysis = HeaderAnalysis {
        body: Vec::with_capacity(blocks.len()),
        ..HeaderAnalysis::default()
    };
    let mut previous_title: Option<&str> = None;

    for block in blocks {
        match block.role {
            BlockRole::PageNumber => match block.content.trim().parse::<i64>() {
                Ok(number) => analysis.logical_page_number = Some(number),
                Err(_) => log::debug!("Unparseable page number {:?}", block.content),
            },
            BlockRole::Title => {
                let text = block.content.trim();
                let confirmed = previous_title == Some(text);
                if confirmed {
                    analysis.title = Some(text.to_string());
                }
                previous_title = Some(text);

                if block.top() >= options.title_promotion_threshold {
                    analysis.body.push(block);
                    analysis.major_headers.push(MajorHeader {
                        block,
                        is_title: confirmed,
                    });
                } else {
                    log::debug!("Dropping running title {:?}", text);
                }
            }
            BlockRole::SectionHeading => {
                let (top, bottom) = block.quad.vertical_span();
                let overlapped = non_heading_spans
                    .iter()
                    .any(|&(other_top, other_bottom)| other_top <= bottom && other_bottom >= top);

                analysis.body.push(block);
                if overlapped {
                    log::debug!("Suppressing inline heading {:?}", block.content);
                } else {
                    analysis.major_headers.push(MajorHeader {
                        block,
                        is_title: false,
                    });
                }
            }
            BlockRole::Body | BlockRole::Other => analysis.body.push(block),
        }
    }

    analysis
        .major_headers
        .sort_by(|a, b| a.block.top().total_cmp(&b.block.top()));
    analysis
}

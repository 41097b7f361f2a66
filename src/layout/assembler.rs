//! Section assembly.
//!
//! Two strategies turn classified blocks into named sections:
//!
//! - [`BandedSplit`] slices the page into horizontal bands between
//!   consecutive major headers and orders each band by columns. It assumes
//!   headers span the full page width.
//! - [`LinearScan`] orders the whole page by columns once and cuts the
//!   sequence at every major header. It copes with headers embedded inside a
//!   column.
//!
//! [`SectionAssembler`] runs the banded split and falls back to the linear
//! scan when the split is degenerate.

use super::columns::order_blocks;
use super::headers::{HeaderAnalysis, MajorHeader};
use super::LayoutOptions;
use crate::model::{PlacedBlock, Section, TextBlock};

/// A way of turning classified blocks into sections.
pub trait SectionAssemblyStrategy: Send + Sync {
    /// Strategy name, used in logs.
    fn name(&self) -> &'static str;

    /// Assemble sections from the body blocks and the major headers
    /// (sorted ascending by `top`).
    fn assemble<'a>(
        &self,
        body: &[&'a TextBlock],
        headers: &[MajorHeader<'a>],
    ) -> Vec<Section<'a>>;
}

/// Name and title flag carried over from the header that opened a section.
#[derive(Debug, Clone, Default)]
struct OpenHeader {
    name: String,
    is_title: bool,
}

impl OpenHeader {
    fn from_header(header: &MajorHeader<'_>) -> Self {
        Self {
            name: header.block.content.clone(),
            is_title: header.is_title,
        }
    }

    fn section<'a>(&self, paragraphs: Vec<PlacedBlock<'a>>) -> Section<'a> {
        Section::new(self.name.clone(), self.is_title, paragraphs)
    }
}

fn is_major_header(block: &TextBlock, headers: &[MajorHeader<'_>]) -> bool {
    headers.iter().any(|h| h.is(block))
}

/// Band-by-band assembly between consecutive major headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BandedSplit;

impl SectionAssemblyStrategy for BandedSplit {
    fn name(&self) -> &'static str {
        "banded"
    }

    fn assemble<'a>(
        &self,
        body: &[&'a TextBlock],
        headers: &[MajorHeader<'a>],
    ) -> Vec<Section<'a>> {
        let content: Vec<&'a TextBlock> = body
            .iter()
            .copied()
            .filter(|b| !is_major_header(b, headers))
            .collect();

        let mut sections = Vec::with_capacity(headers.len() + 1);
        let mut open = OpenHeader::default();
        let mut last_bottom = 0.0;

        for header in headers {
            let band_end = header.block.top();
            let band: Vec<&'a TextBlock> = content
                .iter()
                .copied()
                .filter(|b| b.top() >= last_bottom && b.top() < band_end)
                .collect();

            sections.push(open.section(order_blocks(&band)));
            open = OpenHeader::from_header(header);
            last_bottom = header.block.bottom();
        }

        let trailing: Vec<&'a TextBlock> = content
            .iter()
            .copied()
            .filter(|b| b.top() >= last_bottom)
            .collect();
        sections.push(open.section(order_blocks(&trailing)));

        sections.retain(|s| !s.is_empty());
        sections
    }
}

/// Single pass over the column-ordered page, cut at each major header.
#[derive(Debug, Clone, Copy)]
pub struct LinearScan {
    /// Sections with fewer paragraphs are dropped
    pub min_paragraphs: usize,
}

impl Default for LinearScan {
    fn default() -> Self {
        Self { min_paragraphs: 2 }
    }
}

impl SectionAssemblyStrategy for LinearScan {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn assemble<'a>(
        &self,
        body: &[&'a TextBlock],
        headers: &[MajorHeader<'a>],
    ) -> Vec<Section<'a>> {
        let mut sections = Vec::new();
        let mut open = OpenHeader::default();
        let mut current: Vec<PlacedBlock<'a>> = Vec::new();

        for placed in order_blocks(body) {
            match headers.iter().find(|h| h.is(placed.block)) {
                Some(header) => {
                    sections.push(open.section(std::mem::take(&mut current)));
                    open = OpenHeader::from_header(header);
                }
                None => current.push(placed),
            }
        }
        sections.push(open.section(current));

        sections.retain(|s| s.len() >= self.min_paragraphs);
        sections
    }
}

/// Banded split with a linear-scan fallback.
#[derive(Debug, Clone)]
pub struct SectionAssembler {
    banded: BandedSplit,
    linear: LinearScan,
    min_banded_sections: usize,
}

impl SectionAssembler {
    /// Create an assembler from layout options.
    pub fn new(options: &LayoutOptions) -> Self {
        Self {
            banded: BandedSplit,
            linear: LinearScan {
                min_paragraphs: options.min_linear_paragraphs,
            },
            min_banded_sections: options.min_banded_sections,
        }
    }

    /// Assemble the sections of a classified page.
    ///
    /// The banded split is used unless it yields fewer than
    /// `min_banded_sections` sections, in which case its output is discarded
    /// and the linear scan's output is returned instead.
    pub fn assemble<'a>(&self, analysis: &HeaderAnalysis<'a>) -> Vec<Section<'a>> {
        let banded = self
            .banded
            .assemble(&analysis.body, &analysis.major_headers);
        if banded.len() >= self.min_banded_sections {
            return banded;
        }

        log::debug!(
            "{} strategy produced {} sections, falling back to {}",
            self.banded.name(),
            banded.len(),
            self.linear.name()
        );
        self.linear
            .assemble(&analysis.body, &analysis.major_headers)
    }
}

impl Default for SectionAssembler {
    fn default() -> Self {
        Self::new(&LayoutOptions::default())
    }
}

//! Per-page pipeline: table filter, header detection, section assembly.

use super::assembler::SectionAssembler;
use super::headers::detect_headers;
use super::table_filter::filter_table_collisions;
use super::LayoutOptions;
use crate::model::{ParsedPage, TextBlock};
use crate::ocr::PageContent;

/// Reconstructs the reading order of single pages.
///
/// Stateless apart from its options; one analyzer can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct PageAnalyzer {
    options: LayoutOptions,
    assembler: SectionAssembler,
}

impl PageAnalyzer {
    /// Create an analyzer with the given options.
    pub fn new(options: LayoutOptions) -> Self {
        let assembler = SectionAssembler::new(&options);
        Self { options, assembler }
    }

    /// Get the layout options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Drop blocks that duplicate table cells, yielding the blocks to analyze.
    pub fn prepare(&self, content: PageContent) -> Vec<TextBlock> {
        filter_table_collisions(
            content.blocks,
            &content.tables,
            self.options.table_match_tolerance,
        )
    }

    /// Build the parsed page for a set of blocks.
    ///
    /// Blocks are expected to be table-filtered already (see [`prepare`]).
    ///
    /// [`prepare`]: PageAnalyzer::prepare
    pub fn analyze<'a>(&self, source_page_index: u32, blocks: &'a [TextBlock]) -> ParsedPage<'a> {
        let analysis = detect_headers(blocks, &self.options);
        let sections = self.assembler.assemble(&analysis);

        log::debug!(
            "Page {}: {} blocks, {} major headers, {} sections",
            source_page_index,
            blocks.len(),
            analysis.major_headers.len(),
            sections.len()
        );

        ParsedPage {
            source_page_index,
            logical_page_number: analysis.logical_page_number,
            title: analysis.title,
            sections,
        }
    }
}

impl Default for PageAnalyzer {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockRole, BoundingQuad, Table, TableCell};

    fn block(role: BlockRole, content: &str, left: f64, top: f64, right: f64, bottom: f64) -> TextBlock {
        TextBlock::new(role, content, BoundingQuad::from_edges(left, top, right, bottom))
    }

    #[test]
    fn test_prepare_filters_table_copies() {
        let cell = BoundingQuad::from_edges(0.1, 0.6, 0.3, 0.65);
        let mut table = Table::new();
        table.add_cell(TableCell::new(0, 0, "42", cell));

        let content = PageContent {
            blocks: vec![
                TextBlock::body("42", cell),
                TextBlock::body("prose", BoundingQuad::from_edges(0.1, 0.1, 0.9, 0.2)),
            ],
            tables: vec![table],
            malformed: 0,
        };

        let blocks = PageAnalyzer::default().prepare(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "prose");
    }

    #[test]
    fn test_analyze_page() {
        let blocks = vec![
            block(BlockRole::Title, "Book", 0.1, 0.02, 0.9, 0.05),
            block(BlockRole::SectionHeading, "One", 0.05, 0.1, 0.95, 0.13),
            block(BlockRole::Body, "a", 0.05, 0.2, 0.45, 0.3),
            block(BlockRole::Body, "b", 0.55, 0.2, 0.95, 0.3),
            block(BlockRole::SectionHeading, "Two", 0.05, 0.5, 0.95, 0.53),
            block(BlockRole::Body, "c", 0.05, 0.6, 0.45, 0.7),
            block(BlockRole::PageNumber, "12", 0.45, 0.95, 0.55, 0.97),
        ];

        let page = PageAnalyzer::default().analyze(3, &blocks);
        assert_eq!(page.source_page_index, 3);
        assert_eq!(page.page_number(), 12);
        assert!(page.title.is_none());

        let names: Vec<&str> = page.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two"]);
        assert_eq!(page.paragraph_count(), 3);
    }

    #[test]
    fn test_analyze_empty_page() {
        let page = PageAnalyzer::default().analyze(0, &[]);
        assert!(page.sections.is_empty());
        assert_eq!(page.page_number(), 0);
    }
}

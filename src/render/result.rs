//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

use crate::model::PageSnapshot;

/// Result of rendering pages, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (Markdown, text, etc.)
    pub content: String,

    /// Rendering statistics
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: ExtractionStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Counts collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages rendered
    pub page_count: u32,

    /// Sections rendered
    pub section_count: u32,

    /// Named sections (rendered with a heading)
    pub heading_count: u32,

    /// Paragraphs rendered
    pub paragraph_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the structure of one page.
    pub fn add_page(&mut self, page: &PageSnapshot) {
        self.page_count += 1;
        for section in &page.sections {
            self.section_count += 1;
            if !section.name.is_empty() {
                self.heading_count += 1;
            }
            self.paragraph_count += section.paragraphs.len() as u32;
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.page_count += other.page_count;
        self.section_count += other.section_count;
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_stats_count_text() {
        let mut stats = ExtractionStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_extraction_stats_merge() {
        let mut stats1 = ExtractionStats {
            page_count: 2,
            paragraph_count: 5,
            ..Default::default()
        };
        let stats2 = ExtractionStats {
            page_count: 1,
            paragraph_count: 3,
            heading_count: 4,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.page_count, 3);
        assert_eq!(stats1.paragraph_count, 8);
        assert_eq!(stats1.heading_count, 4);
    }
}

//! Layout analysis options and configuration.

/// Options for reading-order reconstruction.
///
/// The defaults are tuned for dual-column typeset pages with running
/// headers; the two geometric thresholds are exposed because OCR
/// coordinates are noisy on other material.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Title candidates with `top` at or below this are promoted to section
    /// dividers; those above it are dropped as running headers
    pub title_promotion_threshold: f64,

    /// Maximum per-edge difference for a block to count as a table cell copy
    /// (0 = exact match)
    pub table_match_tolerance: f64,

    /// The banded split is kept only if it yields at least this many sections
    pub min_banded_sections: usize,

    /// Linear-scan sections with fewer paragraphs than this are dropped
    pub min_linear_paragraphs: usize,

    /// Whether to analyze multiple pages in parallel
    pub parallel: bool,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title promotion threshold.
    pub fn with_title_threshold(mut self, threshold: f64) -> Self {
        self.title_promotion_threshold = threshold;
        self
    }

    /// Set the table-collision tolerance.
    pub fn with_table_tolerance(mut self, tolerance: f64) -> Self {
        self.table_match_tolerance = tolerance.max(0.0);
        self
    }

    /// Set the minimum section count for the banded split.
    pub fn with_min_banded_sections(mut self, count: usize) -> Self {
        self.min_banded_sections = count;
        self
    }

    /// Set the minimum paragraph count for linear-scan sections.
    pub fn with_min_linear_paragraphs(mut self, count: usize) -> Self {
        self.min_linear_paragraphs = count;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            title_promotion_threshold: 0.5,
            table_match_tolerance: 0.0,
            min_banded_sections: 2,
            min_linear_paragraphs: 2,
            parallel: true,
        }
    }
}

//! # pageflow
//!
//! Reading-order reconstruction for OCR and layout-analysis output.
//!
//! A layout service reports a page as a flat list of text blocks, each with
//! a role (title, section heading, page number, body) and a bounding quad.
//! This library turns that list into the order a person would read it:
//! columns left to right, sections delimited by headings, running headers
//! and table-cell duplicates removed, and the printed page number recovered.
//! It also fetches page results in bounded-concurrency batches against an
//! on-disk cache.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pageflow::{analyze_json, render, LayoutOptions};
//!
//! fn main() -> pageflow::Result<()> {
//!     let raw: serde_json::Value =
//!         serde_json::from_str(&std::fs::read_to_string("page.json")?)?;
//!     let page = analyze_json(0, &raw, &LayoutOptions::default())?;
//!
//!     let text = render::to_text(&[page], &render::RenderOptions::default())?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Column segmentation**: greedy left-to-right bucketing of blocks
//! - **Header detection**: section headings, echoed titles, page numbers
//! - **Section assembly**: banded split with a linear-scan fallback
//! - **Batch fetching**: bounded concurrency, failure tolerance, JSON cache
//! - **Parallel processing**: uses Rayon for multi-page analysis
//! - **Output formats**: plain text, Markdown, JSON, per-page export

pub mod error;
pub mod fetch;
pub mod layout;
pub mod model;
pub mod ocr;
pub mod render;

pub use error::{Error, FetchError, Result};
pub use fetch::{BatchFetcher, BatchOutcome, PageCache};
pub use layout::{LayoutOptions, PageAnalyzer};
pub use model::{
    BlockRole, BoundingQuad, PageSnapshot, ParsedPage, Point, Section, Table, TableCell, TextBlock,
};
pub use ocr::{AnalyzeResult, PageContent};
pub use render::{
    CleanupOptions, CleanupPreset, JsonFormat, PageExport, PageSelection, RenderOptions,
};

use rayon::prelude::*;
use std::path::Path;

use fetch::CacheMap;

/// Reconstruct the reading order of one decoded layout result.
///
/// # Example
///
/// ```no_run
/// use pageflow::{analyze_result, AnalyzeResult, LayoutOptions};
///
/// let data = std::fs::read_to_string("page.json").unwrap();
/// let result: AnalyzeResult = serde_json::from_str(&data).unwrap();
/// let page = analyze_result(0, &result, &LayoutOptions::default());
/// println!("{} sections", page.sections.len());
/// ```
pub fn analyze_result(
    source_page_index: u32,
    result: &AnalyzeResult,
    options: &LayoutOptions,
) -> PageSnapshot {
    let analyzer = PageAnalyzer::new(options.clone());
    analyze_content(&analyzer, source_page_index, PageContent::from_result(result))
}

/// Reconstruct the reading order of a raw JSON layout result.
pub fn analyze_json(
    source_page_index: u32,
    value: &serde_json::Value,
    options: &LayoutOptions,
) -> Result<PageSnapshot> {
    let analyzer = PageAnalyzer::new(options.clone());
    let content = PageContent::from_json(value)?;
    Ok(analyze_content(&analyzer, source_page_index, content))
}

fn analyze_content(
    analyzer: &PageAnalyzer,
    source_page_index: u32,
    content: PageContent,
) -> PageSnapshot {
    let blocks = analyzer.prepare(content);
    analyzer.analyze(source_page_index, &blocks).to_snapshot()
}

/// Analyze many pages, in parallel unless `options.parallel` is off.
///
/// Returns pages sorted by source index.
pub fn analyze_pages(pages: &[(u32, AnalyzeResult)], options: &LayoutOptions) -> Vec<PageSnapshot> {
    let analyzer = PageAnalyzer::new(options.clone());
    let analyze = |(index, result): &(u32, AnalyzeResult)| {
        analyze_content(&analyzer, *index, PageContent::from_result(result))
    };

    let mut snapshots: Vec<PageSnapshot> = if options.parallel {
        pages.par_iter().map(analyze).collect()
    } else {
        pages.iter().map(analyze).collect()
    };
    snapshots.sort_by_key(|p| p.source_page_index);
    snapshots
}

/// Analyze every page of a cache file's contents.
///
/// Entries whose result cannot be decoded are logged and skipped.
pub fn analyze_cached(cache: &CacheMap, options: &LayoutOptions) -> Vec<PageSnapshot> {
    let analyzer = PageAnalyzer::new(options.clone());
    let entries: Vec<_> = cache.iter().collect();
    let analyze = |(index, entry): &(&u32, &fetch::CacheEntry)| {
        match PageContent::from_json(&entry.result) {
            Ok(content) => Some(analyze_content(&analyzer, **index, content)),
            Err(e) => {
                log::warn!("Skipping cached page {}: {}", index, e);
                None
            }
        }
    };

    // BTreeMap iteration is already ordered by index and collect keeps it
    if options.parallel {
        entries.par_iter().filter_map(analyze).collect()
    } else {
        entries.iter().filter_map(analyze).collect()
    }
}

/// Builder for analyzing and rendering cached documents.
///
/// # Example
///
/// ```no_run
/// use pageflow::{CleanupPreset, Pageflow};
///
/// let text = Pageflow::new()
///     .with_title_threshold(0.4)
///     .with_cleanup(CleanupPreset::Standard)
///     .open_cache("cache/report.json")?
///     .to_text()?;
/// # Ok::<(), pageflow::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pageflow {
    layout_options: LayoutOptions,
    render_options: RenderOptions,
}

impl Pageflow {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title promotion threshold.
    pub fn with_title_threshold(mut self, threshold: f64) -> Self {
        self.layout_options = self.layout_options.with_title_threshold(threshold);
        self
    }

    /// Set the table-collision tolerance.
    pub fn with_table_tolerance(mut self, tolerance: f64) -> Self {
        self.layout_options = self.layout_options.with_table_tolerance(tolerance);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.layout_options = self.layout_options.sequential();
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.render_options = self.render_options.with_cleanup_preset(preset);
        self
    }

    /// Set the page header label.
    pub fn with_page_label(mut self, label: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_page_label(label);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.render_options = self.render_options.with_pages(pages);
        self
    }

    /// Analyze every page of a cache file.
    pub fn open_cache<P: AsRef<Path>>(self, path: P) -> Result<PageflowResult> {
        let cache = fetch::read_cache_file(path)?;
        Ok(self.analyze_cache(&cache))
    }

    /// Analyze already-loaded cache contents.
    pub fn analyze_cache(self, cache: &CacheMap) -> PageflowResult {
        PageflowResult {
            pages: analyze_cached(cache, &self.layout_options),
            render_options: self.render_options,
        }
    }
}

/// Analyzed pages ready for rendering.
#[derive(Debug, Clone)]
pub struct PageflowResult {
    /// Parsed pages sorted by source index
    pub pages: Vec<PageSnapshot>,
    render_options: RenderOptions,
}

impl PageflowResult {
    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.pages, &self.render_options)
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.pages, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.pages, format)
    }

    /// Build the per-page export.
    pub fn export(&self) -> PageExport {
        PageExport::from_pages(&self.pages, &self.render_options)
    }

    /// Get the render options.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }
}

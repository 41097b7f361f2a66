//! Rendering options and configuration.

use super::{CleanupOptions, CleanupPreset};
use crate::error::{Error, Result};
use std::ops::RangeInclusive;

/// Options for rendering parsed pages.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Start each page with a `"<label> <n>:"` line
    pub include_page_header: bool,

    /// Label used in page headers
    pub page_label: String,

    /// Join words split by a hyphen and a space
    pub fix_hyphenation: bool,

    /// Text cleanup options
    pub cleanup: Option<CleanupOptions>,

    /// Page selection, by effective page number
    pub page_selection: PageSelection,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable page header lines.
    pub fn with_page_header(mut self, include: bool) -> Self {
        self.include_page_header = include;
        self
    }

    /// Set the page header label.
    pub fn with_page_label(mut self, label: impl Into<String>) -> Self {
        self.page_label = label.into();
        self
    }

    /// Enable or disable hyphenation repair.
    pub fn with_hyphenation_fix(mut self, fix: bool) -> Self {
        self.fix_hyphenation = fix;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = Some(CleanupOptions::from_preset(preset));
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_page_header: true,
            page_label: "Page".to_string(),
            fix_hyphenation: true,
            cleanup: None,
            page_selection: PageSelection::All,
        }
    }
}

/// Page selection for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Render all pages
    #[default]
    All,
    /// Render a range of pages (inclusive)
    Range(RangeInclusive<u32>),
    /// Render specific pages
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Check a signed page number; negative numbers only match `All`.
    pub fn includes_number(&self, page: i64) -> bool {
        match u32::try_from(page) {
            Ok(page) => self.includes(page),
            Err(_) => matches!(self, PageSelection::All),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start = parse_page(start)?;
                let end = parse_page(end)?;
                if start > end {
                    return Err(Error::InvalidPageRange(format!("{start}-{end} is empty")));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                pages.extend(parse_page(start)?..=parse_page(end)?);
            } else {
                pages.push(parse_page(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32> {
    let s = s.trim();
    s.parse()
        .map_err(|_| Error::InvalidPageRange(format!("{s:?} is not a page number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_page_label("Seite")
            .with_hyphenation_fix(false)
            .with_cleanup_preset(CleanupPreset::Minimal);

        assert_eq!(options.page_label, "Seite");
        assert!(!options.fix_hyphenation);
        assert_eq!(options.cleanup, Some(CleanupOptions::minimal()));
    }

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::default();
        assert!(options.include_page_header);
        assert_eq!(options.page_label, "Page");
        assert!(options.fix_hyphenation);
        assert!(options.cleanup.is_none());
    }

    #[test]
    fn test_page_selection_includes() {
        let all = PageSelection::All;
        assert!(all.includes(1));
        assert!(all.includes_number(-3));

        let range = PageSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes(11));
        assert!(!range.includes_number(-5));

        let pages = PageSelection::Pages(vec![1, 3, 5, 7]);
        assert!(pages.includes(1));
        assert!(!pages.includes(2));
        assert!(pages.includes_number(3));
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(PageSelection::parse("1-10").unwrap(), PageSelection::Range(1..=10));
        assert_eq!(
            PageSelection::parse("7-8,1,3,5-7").unwrap(),
            PageSelection::Pages(vec![1, 3, 5, 6, 7, 8])
        );
        assert!(PageSelection::parse("x").is_err());
        assert!(PageSelection::parse("9-2").is_err());
    }

    #[test]
    fn test_page_selection_parse_error() {
        let err = PageSelection::parse("3,x").unwrap_err();
        assert!(matches!(err, Error::InvalidPageRange(_)));
        assert_eq!(err.to_string(), "Invalid page range: \"x\" is not a page number");

        let err = PageSelection::parse("9-2").unwrap_err();
        assert_eq!(err.to_string(), "Invalid page range: 9-2 is empty");
    }
}

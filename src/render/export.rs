//! Per-page text export.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::model::PageSnapshot;

use super::text::render_page;
use super::RenderOptions;

/// File name of the page map written by [`PageExport::write_to`].
pub const PAGES_FILE: &str = "pages.json";

/// File name of the combined text written by [`PageExport::write_to`].
pub const COMBINED_FILE: &str = "combined.txt";

/// Rendered text keyed by page number, plus all pages concatenated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageExport {
    /// Page number to rendered page text
    pub pages: BTreeMap<i64, String>,

    /// Every page in page-number order
    pub combined: String,
}

impl PageExport {
    /// Render the selected pages.
    ///
    /// When two pages share a page number the later one wins.
    pub fn from_pages(pages: &[PageSnapshot], options: &RenderOptions) -> Self {
        let mut map = BTreeMap::new();
        for page in pages {
            if !options.page_selection.includes_number(page.page_number) {
                continue;
            }
            if map
                .insert(page.page_number, render_page(page, options))
                .is_some()
            {
                log::warn!("Page number {} appears more than once", page.page_number);
            }
        }

        let combined = map
            .values()
            .map(|text| text.trim_end())
            .collect::<Vec<_>>()
            .join("\n\n");

        Self {
            pages: map,
            combined,
        }
    }

    /// Number of exported pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if nothing was exported.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Write `pages.json` and `combined.txt` into `dir`, creating it if needed.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        std::fs::write(
            dir.join(PAGES_FILE),
            serde_json::to_string_pretty(&self.pages)?,
        )?;
        std::fs::write(dir.join(COMBINED_FILE), &self.combined)?;
        log::info!("Exported {} pages to {}", self.len(), dir.display());
        Ok(())
    }
}

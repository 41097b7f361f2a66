//! Rendering of parsed pages to text, Markdown, and JSON.

mod cleanup;
mod export;
mod json;
mod markdown;
mod options;
mod result;
mod text;

pub use cleanup::{repair_hyphenation, CleanupOptions, CleanupPipeline, CleanupPreset};
pub use export::{PageExport, COMBINED_FILE, PAGES_FILE};
pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::{PageSelection, RenderOptions};
pub use result::{ExtractionStats, RenderResult};
pub use text::{render_page, to_text};

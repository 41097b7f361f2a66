//! Plain text rendering of parsed pages.

use crate::error::Result;
use crate::model::PageSnapshot;

use super::cleanup::repair_hyphenation;
use super::{CleanupPipeline, RenderOptions};

/// Render one page as plain text.
///
/// Layout: an optional `"<label> <n>:"` header and a blank line, then for
/// each section a blank line and its name (unnamed sections have neither)
/// followed by one paragraph per line.
pub fn render_page(page: &PageSnapshot, options: &RenderOptions) -> String {
    let mut body = String::new();
    for section in &page.sections {
        if !section.name.is_empty() {
            body.push('\n');
            body.push_str(&section.name);
            body.push('\n');
        }
        for paragraph in &section.paragraphs {
            body.push_str(&paragraph.content);
            body.push('\n');
        }
    }

    if options.fix_hyphenation {
        body = repair_hyphenation(&body).into_owned();
    }

    if let Some(cleanup) = &options.cleanup {
        body = CleanupPipeline::new(cleanup.clone()).process(&body);
        body.push('\n');
    }

    if options.include_page_header {
        format!("{} {}:\n\n{}", options.page_label, page.page_number, body)
    } else {
        body
    }
}

/// Render the selected pages as plain text, separated by blank lines.
pub fn to_text(pages: &[PageSnapshot], options: &RenderOptions) -> Result<String> {
    let rendered: Vec<String> = pages
        .iter()
        .filter(|p| options.page_selection.includes_number(p.page_number))
        .map(|p| render_page(p, options).trim_end().to_string())
        .collect();

    Ok(rendered.join("\n\n"))
}

//! Markdown rendering of parsed pages.

use crate::error::Result;
use crate::model::{PageSnapshot, SectionSnapshot};

use super::cleanup::repair_hyphenation;
use super::{CleanupPipeline, ExtractionStats, RenderOptions, RenderResult};

/// Convert pages to Markdown.
pub fn to_markdown(pages: &[PageSnapshot], options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(pages)
}

/// Convert pages to Markdown with statistics.
pub fn to_markdown_with_stats(
    pages: &[PageSnapshot],
    options: &RenderOptions,
) -> Result<RenderResult> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render_with_stats(pages)
}

/// Markdown renderer.
///
/// A confirmed document title becomes a level-1 heading the first time it is
/// seen; named sections become level-2 headings, or level-3 when the section
/// was opened by the title itself.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: ExtractionStats,
    last_title: Option<String>,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: ExtractionStats::new(),
            last_title: None,
        }
    }

    /// Render pages to Markdown.
    pub fn render(mut self, pages: &[PageSnapshot]) -> Result<String> {
        self.render_internal(pages)
    }

    /// Render pages to Markdown with statistics.
    pub fn render_with_stats(mut self, pages: &[PageSnapshot]) -> Result<RenderResult> {
        let content = self.render_internal(pages)?;
        self.stats.count_text(&content);
        Ok(RenderResult::new(content, self.stats))
    }

    fn render_internal(&mut self, pages: &[PageSnapshot]) -> Result<String> {
        let mut output = String::new();

        for page in pages {
            if self.options.page_selection.includes_number(page.page_number) {
                self.stats.add_page(page);
                self.render_page(&mut output, page);
            }
        }

        if self.options.fix_hyphenation {
            output = repair_hyphenation(&output).into_owned();
        }

        if let Some(ref cleanup_options) = self.options.cleanup {
            let pipeline = CleanupPipeline::new(cleanup_options.clone());
            output = pipeline.process(&output);
        }

        Ok(output.trim().to_string())
    }

    fn render_page(&mut self, output: &mut String, page: &PageSnapshot) {
        if let Some(title) = &page.title {
            if self.last_title.as_ref() != Some(title) {
                output.push_str("# ");
                output.push_str(&escape_markdown(title));
                output.push_str("\n\n");
                self.last_title = Some(title.clone());
            }
        }

        if self.options.include_page_header {
            output.push_str(&format!(
                "<!-- {} {} -->\n\n",
                self.options.page_label, page.page_number
            ));
        }

        for section in &page.sections {
            self.render_section(output, section);
        }
    }

    fn render_section(&self, output: &mut String, section: &SectionSnapshot) {
        if !section.name.is_empty() {
            let prefix = if section.is_title { "###" } else { "##" };
            output.push_str(prefix);
            output.push(' ');
            output.push_str(&escape_markdown(&section.name));
            output.push_str("\n\n");
        }

        for paragraph in &section.paragraphs {
            output.push_str(&escape_markdown(&paragraph.content));
            output.push_str("\n\n");
        }
    }
}

fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

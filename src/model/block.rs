//! Text block types.

use super::BoundingQuad;
use serde::{Deserialize, Serialize};

/// Semantic role assigned to a block by the layout service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockRole {
    /// Regular paragraph text
    #[default]
    Body,
    /// Document or chapter title
    Title,
    /// Section heading
    SectionHeading,
    /// Printed page number
    PageNumber,
    /// Any other role (running headers, footnotes, ...)
    Other,
}

impl BlockRole {
    /// Map a layout-service role string to a block role.
    ///
    /// A missing role means plain body text.
    pub fn from_service(role: Option<&str>) -> Self {
        match role {
            None => BlockRole::Body,
            Some("title") => BlockRole::Title,
            Some("sectionHeading") => BlockRole::SectionHeading,
            Some("pageNumber") => BlockRole::PageNumber,
            Some(_) => BlockRole::Other,
        }
    }

    /// Check if this role can delimit sections.
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockRole::Title | BlockRole::SectionHeading)
    }
}

/// A unit of recognized text with a role and a bounding quad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Semantic role
    pub role: BlockRole,

    /// Recognized text
    pub content: String,

    /// Position on the page
    pub quad: BoundingQuad,
}

impl TextBlock {
    /// Create a new block.
    pub fn new(role: BlockRole, content: impl Into<String>, quad: BoundingQuad) -> Self {
        Self {
            role,
            content: content.into(),
            quad,
        }
    }

    /// Create a body text block.
    pub fn body(content: impl Into<String>, quad: BoundingQuad) -> Self {
        Self::new(BlockRole::Body, content, quad)
    }

    /// Left edge.
    pub fn left(&self) -> f64 {
        self.quad.left()
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.quad.top()
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.quad.bottom()
    }
}

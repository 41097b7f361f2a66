//! Page model types for reading-order reconstruction.
//!
//! Blocks and tables come from the layout service; sections and parsed pages
//! are produced by [`crate::layout`]. Sections borrow the page's blocks, and
//! owned snapshots exist for rendering and serialization.

mod block;
pub mod geometry;
mod section;
mod table;

pub use block::{BlockRole, TextBlock};
pub use geometry::{BoundingQuad, Point};
pub use section::{
    PageSnapshot, ParagraphSnapshot, ParsedPage, PlacedBlock, Section, SectionSnapshot,
};
pub use table::{Table, TableCell};

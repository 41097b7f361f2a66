//! Reading-order reconstruction.
//!
//! A page goes through four steps:
//!
//! 1. [`filter_table_collisions`] drops paragraphs that repeat table cells.
//! 2. [`detect_headers`] separates body text from section-delimiting headers
//!    and recovers the page number and document title.
//! 3. [`segment_columns`] groups blocks into left-to-right columns.
//! 4. [`SectionAssembler`] builds the named sections, choosing between a
//!    banded split and a linear scan.
//!
//! [`PageAnalyzer`] runs the whole pipeline for one page.

mod analyzer;
mod assembler;
mod columns;
mod headers;
mod options;
mod table_filter;

pub use analyzer::PageAnalyzer;
pub use assembler::{BandedSplit, LinearScan, SectionAssembler, SectionAssemblyStrategy};
pub use columns::{order_blocks, segment_columns, Column};
pub use headers::{detect_headers, HeaderAnalysis, MajorHeader};
pub use options::LayoutOptions;
pub use table_filter::filter_table_collisions;

//! Cursor-based PDF writer using the lopdf library.
//!
//! [`LopdfWriter`] implements `DocumentWriter`: it accumulates page content
//! in a `lopdf::Document`, embeds TrueType fonts and images on first use,
//! and serializes the whole document into its emission sink when ended.

mod fonts;
mod images;
mod writer;

pub use fonts::FontMetrics;
pub use writer::LopdfWriter;

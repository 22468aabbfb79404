use crate::error::WriterError;
use crate::types::{ImagePlacement, TextFlow, TextStyle};
use inkpage_types::{PageSetup, Point};
use std::sync::Arc;

/// A streaming document writer, abstracting the PDF-drawing primitives.
///
/// The writer owns the cursor: every draw call starts at the current
/// position (unless the style pins an absolute one) and leaves the cursor
/// below what it drew. Positions use a top-left origin in points.
pub trait DocumentWriter: Send {
    /// Closes the current page, if any, and opens a new one with the cursor
    /// at the top-left margin corner.
    fn add_page(&mut self, setup: &PageSetup) -> Result<(), WriterError>;

    fn page_count(&self) -> usize;

    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    fn has_font(&self, name: &str) -> bool;

    /// Registers font bytes under `name`. Registering a name twice keeps the
    /// first registration.
    fn register_font(&mut self, name: &str, data: Arc<Vec<u8>>) -> Result<(), WriterError>;

    /// Selects a registered font for subsequent text.
    fn use_font(&mut self, name: &str) -> Result<(), WriterError>;

    /// Selects the writer's built-in font for subsequent text.
    fn use_default_font(&mut self);

    /// Draws wrapped text. A paginating style stops before the first line
    /// that would cross the bottom margin and returns the rest; the first
    /// line on a page (cursor at the top margin) is always drawn.
    fn draw_text(&mut self, text: &str, style: &TextStyle) -> Result<TextFlow, WriterError>;

    /// Draws image bytes. `src` identifies the image so repeated draws can
    /// share one embedded copy.
    fn draw_image(
        &mut self,
        src: &str,
        data: &[u8],
        placement: &ImagePlacement,
    ) -> Result<(), WriterError>;

    /// Finishes the document and emits its bytes through the writer's sink.
    fn end(&mut self) -> Result<(), WriterError>;
}

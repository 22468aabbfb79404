use crate::drawing::DrawContext;
use crate::fixed::FixedElementTracker;
use crate::options::PageOptions;
use inkpage_render_core::DocumentWriter;
use inkpage_traits::ResourceFetcher;
use std::sync::Arc;

/// State owned by a single render: the fixed elements recorded so far and
/// everything the draw paths need. Created fresh for every render and never
/// shared.
pub struct RenderContext {
    pub tracker: FixedElementTracker,
    pub draw: DrawContext,
    /// Options of the page being drawn; text that overflows it continues on
    /// a page opened with the same options.
    pub page: PageOptions,
}

impl RenderContext {
    pub fn new(
        writer: Box<dyn DocumentWriter>,
        fetcher: Arc<dyn ResourceFetcher>,
        default_font_size: f32,
    ) -> Self {
        Self {
            tracker: FixedElementTracker::new(),
            draw: DrawContext::new(writer, fetcher, default_font_size),
            page: PageOptions::default(),
        }
    }
}

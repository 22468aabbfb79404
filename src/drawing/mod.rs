//! Draw paths shared by node handlers and fixed-element replay.

use crate::cache::ResourceCache;
use crate::fonts::FontRegistry;
use inkpage_render_core::DocumentWriter;
use inkpage_traits::ResourceFetcher;
use std::sync::Arc;

mod image;
mod text;

pub use self::image::draw_image;
pub use self::text::{FontSelector, draw_text};

/// Everything a draw call touches: the writer and the per-render caches.
pub struct DrawContext {
    pub writer: Box<dyn DocumentWriter>,
    pub fonts: FontRegistry,
    pub cache: ResourceCache,
    pub fetcher: Arc<dyn ResourceFetcher>,
    pub default_font_size: f32,
    /// The current page's font, used by text that selects none.
    pub page_font: Option<FontSelector>,
}

impl DrawContext {
    pub fn new(
        writer: Box<dyn DocumentWriter>,
        fetcher: Arc<dyn ResourceFetcher>,
        default_font_size: f32,
    ) -> Self {
        Self {
            writer,
            fonts: FontRegistry::new(),
            cache: ResourceCache::new(),
            fetcher,
            default_font_size,
            page_font: None,
        }
    }
}

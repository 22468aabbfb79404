//! inkpage renders annotated document markup into PDF.
//!
//! Markup nodes carrying a `data-svelte-pdf-kit-type` attribute (document,
//! page, text, image, font) are walked in document order and turned into
//! calls on a streaming [`DocumentWriter`]. Fonts and images are fetched
//! lazily through a [`ResourceFetcher`] and cached for the rest of the render.

pub mod cache;
pub mod dispatch;
pub mod drawing;
pub mod error;
pub mod fixed;
pub mod fonts;
pub mod markup;
pub mod options;
pub mod pipeline;

pub use error::{MissingAttribute, RenderError};
pub use fixed::{FixedElement, FixedElementTracker};
pub use fonts::{FontFamily, FontRegistry, FontVariant};
pub use options::{FontDefinition, ImageOptions, PageOptions, TextOptions};
pub use pipeline::{
    HandlebarsSource, MarkupSource, RenderConfig, RenderContext, Renderer, RendererBuilder,
};

pub use inkpage_render_core::{
    DocumentWriter, EmissionSink, ImagePlacement, TextFlow, TextStyle, WriterError,
};
pub use inkpage_render_lopdf::LopdfWriter;
pub use inkpage_style::{FontStyle, FontWeight, TextAlign};
pub use inkpage_traits::{InMemoryFetcher, ResourceError, ResourceFetcher};
pub use inkpage_types::{Color, Margins, Orientation, PageSetup, PageSize, Point};

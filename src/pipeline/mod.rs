//! Render orchestration.
//!
//! - [`RendererBuilder`]: fluent builder for a [`Renderer`]
//! - [`RenderConfig`]: timeouts, resource lookup and text defaults
//! - [`MarkupSource`]: where the markup comes from (a string, or a
//!   handlebars template rendered with JSON data)
//!
//! # Example
//!
//! ```ignore
//! use inkpage::RendererBuilder;
//!
//! let renderer = RendererBuilder::new().with_base_dir("assets").build()?;
//! let pdf = renderer.render(markup.as_str()).await?;
//! ```

mod builder;
pub mod config;
pub mod context;
mod orchestrator;
pub mod source;

pub use builder::{RendererBuilder, WriterFactory};
pub use config::RenderConfig;
pub use context::RenderContext;
pub use orchestrator::{RenderPhase, Renderer};
pub use source::{HandlebarsSource, MarkupSource};

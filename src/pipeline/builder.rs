// src/pipeline/builder.rs
use super::config::RenderConfig;
use super::orchestrator::Renderer;
use crate::error::RenderError;
use inkpage_render_core::{DocumentWriter, EmissionSink};
use inkpage_render_lopdf::LopdfWriter;
use inkpage_resource::FilesystemFetcher;
use inkpage_traits::ResourceFetcher;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Creates the document writer for one render, given the sink it must emit
/// through.
pub type WriterFactory = Arc<dyn Fn(EmissionSink) -> Box<dyn DocumentWriter> + Send + Sync>;

/// A builder for creating a [`Renderer`].
#[derive(Default)]
pub struct RendererBuilder {
    config: RenderConfig,
    fetcher: Option<Arc<dyn ResourceFetcher>>,
    writer_factory: Option<WriterFactory>,
}

impl RendererBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every setting at once, e.g. with one loaded by
    /// [`RenderConfig::from_file`].
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_emission_timeout(mut self, timeout: Duration) -> Self {
        self.config.emission_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Directory that relative image and font paths are resolved against.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.http_user_agent = user_agent.into();
        self
    }

    /// Disables the HTTP fallback when `false`; sources then resolve from
    /// the filesystem only.
    pub fn with_network(mut self, network: bool) -> Self {
        self.config.network = network;
        self
    }

    /// Refuses filesystem sources that resolve outside the base directory.
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    pub fn with_default_font_size(mut self, size: f32) -> Self {
        self.config.default_font_size = size;
        self
    }

    /// Resolves resources with `fetcher` instead of the filesystem/HTTP
    /// chain derived from the config.
    pub fn with_fetcher<F: ResourceFetcher + 'static>(mut self, fetcher: F) -> Self {
        let fetcher: Arc<dyn ResourceFetcher> = Arc::new(fetcher);
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_shared_fetcher(mut self, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Swaps the lopdf writer for another [`DocumentWriter`].
    pub fn with_writer_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(EmissionSink) -> Box<dyn DocumentWriter> + Send + Sync + 'static,
    {
        let factory: WriterFactory = Arc::new(factory);
        self.writer_factory = Some(factory);
        self
    }

    /// Consumes the builder and creates the `Renderer`.
    pub fn build(self) -> Result<Renderer, RenderError> {
        self.config.validate()?;

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let base_dir = self.config.base_dir.clone().unwrap_or_default();
                let filesystem = if self.config.sandbox {
                    FilesystemFetcher::sandboxed(base_dir)
                } else {
                    FilesystemFetcher::new(base_dir)
                };
                if self.config.network {
                    inkpage_resource::default_fetcher(filesystem, &self.config.http_user_agent)
                } else {
                    let fetcher: Arc<dyn ResourceFetcher> = Arc::new(filesystem);
                    fetcher
                }
            }
        };
        log::debug!("Resources resolve through {}", fetcher.name());

        let writer_factory = match self.writer_factory {
            Some(factory) => factory,
            None => {
                let factory: WriterFactory = Arc::new(|sink: EmissionSink| {
                    Box::new(LopdfWriter::new(sink)) as Box<dyn DocumentWriter>
                });
                factory
            }
        };

        Ok(Renderer::new(self.config, fetcher, writer_factory))
    }
}

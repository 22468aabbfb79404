// src/pipeline/orchestrator.rs
use super::builder::WriterFactory;
use super::config::RenderConfig;
use super::context::RenderContext;
use super::source::MarkupSource;
use crate::dispatch::dispatch;
use crate::error::RenderError;
use crate::markup::{MarkupElement, MarkupNode, MarkupTree, walk};
use inkpage_render_core::emission_channel;
use inkpage_traits::ResourceFetcher;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Stages of a single render, used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Init,
    TreeLocated,
    Rendering,
    Finalizing,
    Done,
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderPhase::Init => "init",
            RenderPhase::TreeLocated => "tree-located",
            RenderPhase::Rendering => "rendering",
            RenderPhase::Finalizing => "finalizing",
            RenderPhase::Done => "done",
        })
    }
}

/// Turns annotated markup into PDF bytes.
///
/// The renderer holds only configuration and shared, thread-safe handles;
/// each call to [`Renderer::render`] builds its own [`RenderContext`], so one
/// renderer can serve concurrent renders.
#[derive(Clone)]
pub struct Renderer {
    config: RenderConfig,
    pub(crate) fetcher: Arc<dyn ResourceFetcher>,
    writer_factory: WriterFactory,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("fetcher", &self.fetcher.name())
            .finish_non_exhaustive()
    }
}

/// Finds the single document node anywhere in the tree.
fn locate_document(tree: &MarkupTree) -> Result<MarkupNode<'_>, RenderError> {
    let mut documents = walk(tree.root()).filter(|node| node.node_type() == Some("document"));
    let first = documents.next();
    let extra = documents.count();
    match (first, extra) {
        (Some(document), 0) => Ok(document),
        (None, _) => Err(RenderError::DocumentCount { found: 0 }),
        (Some(_), extra) => Err(RenderError::DocumentCount { found: extra + 1 }),
    }
}

impl Renderer {
    pub(crate) fn new(
        config: RenderConfig,
        fetcher: Arc<dyn ResourceFetcher>,
        writer_factory: WriterFactory,
    ) -> Self {
        Self {
            config,
            fetcher,
            writer_factory,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn fetcher_name(&self) -> &'static str {
        self.fetcher.name()
    }

    /// Renders `source` to PDF bytes. The first failing node aborts the
    /// render and its error is returned.
    pub async fn render<S>(&self, source: &S) -> Result<Vec<u8>, RenderError>
    where
        S: MarkupSource + ?Sized,
    {
        let start = Instant::now();
        let mut phase = RenderPhase::Init;
        let result = self.run(source, &mut phase).await;
        match &result {
            Ok(bytes) => log::info!(
                "Rendered {} bytes in {:.2?}",
                bytes.len(),
                start.elapsed()
            ),
            Err(e) => log::warn!("Render failed during {}: {}", phase, e),
        }
        result
    }

    async fn run<S>(&self, source: &S, phase: &mut RenderPhase) -> Result<Vec<u8>, RenderError>
    where
        S: MarkupSource + ?Sized,
    {
        log::info!("Starting render");
        let markup = source.markup()?;
        let tree = MarkupTree::parse(&markup)?;
        let document = locate_document(&tree)?;
        *phase = RenderPhase::TreeLocated;

        let (sink, emission) = emission_channel();
        let writer = (self.writer_factory)(sink);
        let mut ctx = RenderContext::new(
            writer,
            Arc::clone(&self.fetcher),
            self.config.default_font_size,
        );

        *phase = RenderPhase::Rendering;
        let mut nodes = 0usize;
        for node in walk(document) {
            dispatch(node, &mut ctx).await?;
            nodes += 1;
        }
        log::debug!(
            "Dispatched {} node(s) onto {} page(s)",
            nodes,
            ctx.draw.writer.page_count()
        );

        *phase = RenderPhase::Finalizing;
        ctx.draw.writer.end()?;
        // The writer stays alive until the emission settles; dropping it
        // early would read as an abandoned render.
        let bytes = emission.collect(self.config.emission_timeout()).await;
        drop(ctx);
        let bytes = bytes?;

        *phase = RenderPhase::Done;
        Ok(bytes)
    }

    /// Renders `source` and writes the bytes to `path`, returning the path.
    pub async fn render_to_file<S, P>(&self, source: &S, path: P) -> Result<PathBuf, RenderError>
    where
        S: MarkupSource + ?Sized,
        P: AsRef<Path>,
    {
        let bytes = self.render(source).await?;
        let path = path.as_ref().to_path_buf();
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            RenderError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write '{}': {}", path.display(), e),
            ))
        })?;
        log::info!("Wrote {}", path.display());
        Ok(path)
    }
}

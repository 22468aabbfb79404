use super::DrawContext;
use crate::error::RenderError;
use crate::options::ImageOptions;

/// Fetches (or reuses) the image bytes and draws them at the cursor or at
/// the pinned position.
pub async fn draw_image(
    ctx: &mut DrawContext,
    source: &str,
    options: &ImageOptions,
) -> Result<(), RenderError> {
    let data = ctx.cache.resolve(source, ctx.fetcher.as_ref()).await?;
    ctx.writer.draw_image(source, &data, &options.placement())?;
    Ok(())
}

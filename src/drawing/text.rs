use super::DrawContext;
use crate::error::RenderError;
use crate::fonts::FontRegistry;
use crate::options::TextOptions;
use inkpage_render_core::TextFlow;
use inkpage_style::{FontStyle, FontWeight};

/// The font a text node asks for. Style and weight fall back to the registry
/// defaults when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSelector {
    pub family: String,
    pub style: Option<FontStyle>,
    pub weight: Option<FontWeight>,
}

impl FontSelector {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: None,
            weight: None,
        }
    }

    pub fn font_name(&self) -> String {
        FontRegistry::get_font_name(&self.family, self.style, self.weight)
    }
}

/// Selects the font, then draws `content` with the node's options. Returns
/// whatever did not fit above the bottom margin.
///
/// Without a selector the page font is used, and without that the writer's
/// built-in font. With one, the
/// variant is resolved through the registry and handed to the writer the
/// first time its name is seen. A variant whose source was replaced is
/// handed over again under a fresh name.
pub async fn draw_text(
    ctx: &mut DrawContext,
    content: &str,
    font: Option<&FontSelector>,
    options: &TextOptions,
) -> Result<TextFlow, RenderError> {
    let page_font = ctx.page_font.clone();
    match font.or(page_font.as_ref()) {
        None => ctx.writer.use_default_font(),
        Some(selector) => {
            let variant = ctx
                .fonts
                .get_font_file(
                    &selector.family,
                    selector.style,
                    selector.weight,
                    ctx.fetcher.as_ref(),
                )
                .await?;
            let name = variant.writer_name(&selector.font_name());
            if !ctx.writer.has_font(&name) {
                let data = variant.bytes().cloned().unwrap_or_default();
                ctx.writer.register_font(&name, data)?;
            }
            ctx.writer.use_font(&name)?;
        }
    }
    let flow = ctx
        .writer
        .draw_text(content, &options.style(ctx.default_font_size))?;
    Ok(flow)
}

//! Per-node handlers, selected by the node's type attribute.

use crate::drawing::{self, FontSelector};
use crate::error::{MissingAttribute, RenderError};
use crate::fixed::FixedElement;
use crate::markup::{
    FONT_ATTRIBUTE, FONT_FAMILY_ATTRIBUTE, FONT_STYLE_ATTRIBUTE, FONT_WEIGHT_ATTRIBUTE,
    FONTS_ATTRIBUTE, MarkupElement, MarkupNode, OPTIONS_ATTRIBUTE, SRC_ATTRIBUTE,
    decode_entities,
};
use crate::options::{
    ImageOptions, PageOptions, TextOptions, decode_font_definitions, decode_options,
};
use crate::pipeline::RenderContext;
use inkpage_render_core::TextFlow;
use inkpage_style::{FontStyle, FontWeight};
use inkpage_types::Point;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Page,
    Text,
    Image,
    Font,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Document => "document",
            NodeType::Page => "page",
            NodeType::Text => "text",
            NodeType::Image => "image",
            NodeType::Font => "font",
        }
    }

    /// Whether a node of this type may appear before any page exists
    /// without implicitly starting one.
    fn is_structural(self) -> bool {
        matches!(self, NodeType::Document | NodeType::Page | NodeType::Font)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(NodeType::Document),
            "page" => Ok(NodeType::Page),
            "text" => Ok(NodeType::Text),
            "image" => Ok(NodeType::Image),
            "font" => Ok(NodeType::Font),
            other => Err(RenderError::UnknownNodeType(other.to_string())),
        }
    }
}

/// Name of the writer's built-in font, accepted as a page font.
pub const BUILTIN_FONT: &str = "Helvetica";

/// Opens a page and replays the fixed elements onto it before anything else
/// is drawn. The page's font becomes the default for text that names none.
pub async fn start_page(ctx: &mut RenderContext, options: &PageOptions) -> Result<(), RenderError> {
    ctx.draw.writer.add_page(&options.setup())?;
    ctx.draw.page_font = options
        .font
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case(BUILTIN_FONT))
        .map(FontSelector::new);
    ctx.page = options.clone();
    ctx.tracker.replay(&mut ctx.draw).await
}

/// Handles one annotated node. The first node that is not structural starts
/// a default page when none exists yet.
pub async fn dispatch(node: MarkupNode<'_>, ctx: &mut RenderContext) -> Result<(), RenderError> {
    let raw_type = node.node_type().unwrap_or_default();
    let node_type = raw_type.parse::<NodeType>();

    let needs_page = !matches!(node_type, Ok(t) if t.is_structural());
    if needs_page && ctx.draw.writer.page_count() == 0 {
        log::debug!("Starting implicit first page for '{}' node", raw_type);
        start_page(ctx, &PageOptions::default()).await?;
    }

    let node_type = node_type?;
    log::debug!("Dispatching {} node", node_type);
    match node_type {
        NodeType::Document => Ok(()),
        NodeType::Page => handle_page(node, ctx).await,
        NodeType::Text => handle_text(node, ctx).await,
        NodeType::Image => handle_image(node, ctx).await,
        NodeType::Font => handle_font(node, ctx),
    }
}

fn non_empty<'a>(node: &MarkupNode<'a>, name: &str) -> Option<&'a str> {
    node.attribute(name).filter(|v| !v.trim().is_empty())
}

async fn handle_page(node: MarkupNode<'_>, ctx: &mut RenderContext) -> Result<(), RenderError> {
    let options: PageOptions = decode_options(node.attribute(OPTIONS_ATTRIBUTE))?;
    start_page(ctx, &options).await
}

fn font_selector(node: &MarkupNode<'_>) -> Result<Option<FontSelector>, RenderError> {
    let Some(family) = non_empty(node, FONT_ATTRIBUTE) else {
        return Ok(None);
    };
    let style = non_empty(node, FONT_STYLE_ATTRIBUTE)
        .map(FontStyle::from_str)
        .transpose()?;
    let weight = non_empty(node, FONT_WEIGHT_ATTRIBUTE)
        .map(FontWeight::from_str)
        .transpose()?;
    Ok(Some(FontSelector {
        family: family.to_string(),
        style,
        weight,
    }))
}

async fn handle_text(node: MarkupNode<'_>, ctx: &mut RenderContext) -> Result<(), RenderError> {
    let options: TextOptions = decode_options(node.attribute(OPTIONS_ATTRIBUTE))?;
    let font = font_selector(&node)?;
    let content = decode_entities(&node.text_content()).into_owned();

    let before = ctx.draw.writer.position();
    let mut flow = drawing::draw_text(&mut ctx.draw, &content, font.as_ref(), &options).await?;
    if matches!(flow, TextFlow::Overflow(_)) {
        // Continued lines start wherever the new page leaves the cursor.
        let continued = TextOptions {
            y: None,
            ..options.clone()
        };
        while let TextFlow::Overflow(rest) = flow {
            flow = continue_on_new_page(ctx, &rest, font.as_ref(), &continued).await?;
        }
    }
    let after = ctx.draw.writer.position();

    if options.fixed {
        ctx.tracker.register(FixedElement::Text {
            content,
            font,
            options,
            before,
            after,
        });
    }
    Ok(())
}

/// Opens a page like the current one and draws `rest` on it. When the
/// replayed fixed elements leave no room below the cursor, the text
/// restarts at the top-left margin corner.
async fn continue_on_new_page(
    ctx: &mut RenderContext,
    rest: &str,
    font: Option<&FontSelector>,
    options: &TextOptions,
) -> Result<TextFlow, RenderError> {
    let page = ctx.page.clone();
    log::debug!(
        "Text continues on page {}",
        ctx.draw.writer.page_count() + 1
    );
    start_page(ctx, &page).await?;
    match drawing::draw_text(&mut ctx.draw, rest, font, options).await? {
        TextFlow::Overflow(left) if left == rest => {
            let margins = page.setup().margins;
            ctx.draw
                .writer
                .set_position(Point::new(margins.left, margins.top));
            drawing::draw_text(&mut ctx.draw, rest, font, options).await
        }
        flow => Ok(flow),
    }
}

async fn handle_image(node: MarkupNode<'_>, ctx: &mut RenderContext) -> Result<(), RenderError> {
    let options: ImageOptions = decode_options(node.attribute(OPTIONS_ATTRIBUTE))?;
    let source = non_empty(&node, SRC_ATTRIBUTE)
        .map(|src| decode_entities(src).into_owned())
        .ok_or(RenderError::MissingAttribute(MissingAttribute::ImageSource))?;

    let before = ctx.draw.writer.position();
    drawing::draw_image(&mut ctx.draw, &source, &options).await?;
    let after = ctx.draw.writer.position();

    if options.fixed {
        ctx.tracker.register(FixedElement::Image {
            source,
            options,
            before,
            after,
        });
    }
    Ok(())
}

fn handle_font(node: MarkupNode<'_>, ctx: &mut RenderContext) -> Result<(), RenderError> {
    let family = non_empty(&node, FONT_FAMILY_ATTRIBUTE)
        .ok_or(RenderError::MissingAttribute(MissingAttribute::FontFamily))?;
    let fonts = non_empty(&node, FONTS_ATTRIBUTE)
        .ok_or(RenderError::MissingAttribute(MissingAttribute::FontList))?;
    let definitions = decode_font_definitions(fonts)?;
    ctx.draw.fonts.register_font(family, definitions);
    Ok(())
}

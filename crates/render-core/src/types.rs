use inkpage_style::{HorizontalAlign, TextAlign, VerticalAlign};
use inkpage_types::Color;

/// How a run of text is placed and painted.
///
/// `x`/`y` pin the text to an absolute position; when absent the writer's
/// cursor is used. `width` bounds line wrapping, defaulting to the space
/// left before the right margin. With `paginate` set, lines that would run
/// past the bottom margin are handed back as [`TextFlow::Overflow`] instead
/// of being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub size: f32,
    pub line_gap: f32,
    pub align: TextAlign,
    pub color: Color,
    pub paginate: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            width: None,
            size: 12.0,
            line_gap: 0.0,
            align: TextAlign::Left,
            color: Color::BLACK,
            paginate: true,
        }
    }
}

/// Outcome of a text draw.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextFlow {
    #[default]
    Complete,
    /// The words that did not fit above the bottom margin, to be continued
    /// on a new page.
    Overflow(String),
}

/// Position and size of an image. Unset dimensions follow the image's
/// intrinsic size (one pixel per point), keeping the aspect ratio when only
/// one side is given.
///
/// `fit` and `cover` name a `[width, height]` box the image is scaled into
/// (fully inside it, or filling it); they apply only when no explicit size
/// or scale is given. `align`/`valign` place the image within that box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImagePlacement {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale: Option<f32>,
    pub fit: Option<[f32; 2]>,
    pub cover: Option<[f32; 2]>,
    pub align: HorizontalAlign,
    pub valign: VerticalAlign,
}

impl ImagePlacement {
    /// Resolves the drawn size for an image of `px_width` x `px_height`.
    pub fn resolve_size(&self, px_width: f32, px_height: f32) -> (f32, f32) {
        let ratio = if px_width > 0.0 { px_height / px_width } else { 1.0 };
        match (self.width, self.height) {
            (Some(w), Some(h)) => return (w, h),
            (Some(w), None) => return (w, w * ratio),
            (None, Some(h)) if ratio > 0.0 => return (h / ratio, h),
            (None, Some(h)) => return (px_width, h),
            (None, None) => {}
        }
        if let Some(scale) = self.scale {
            return (px_width * scale, px_height * scale);
        }
        let aspect = if px_height > 0.0 { px_width / px_height } else { 1.0 };
        if let Some([bw, bh]) = self.fit {
            return if aspect > bw / bh { (bw, bw / aspect) } else { (bh * aspect, bh) };
        }
        if let Some([bw, bh]) = self.cover {
            return if aspect > bw / bh { (bh * aspect, bh) } else { (bw, bw / aspect) };
        }
        (px_width, px_height)
    }

    /// Offset of a `width` x `height` image from the placement origin,
    /// following `align`/`valign` inside the `fit` or `cover` box. Zero when
    /// neither box is set.
    pub fn box_offset(&self, width: f32, height: f32) -> (f32, f32) {
        let Some([bw, bh]) = self.fit.or(self.cover) else {
            return (0.0, 0.0);
        };
        let dx = match self.align {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Center => (bw - width) / 2.0,
            HorizontalAlign::Right => bw - width,
        };
        let dy = match self.valign {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Center => (bh - height) / 2.0,
            VerticalAlign::Bottom => bh - height,
        };
        (dx, dy)
    }
}

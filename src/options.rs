//! JSON option payloads carried by annotated nodes.
//!
//! Payloads arrive entity-encoded inside attributes. An absent or blank
//! attribute (or a literal `null`) means "all defaults"; anything else must
//! be valid JSON naming only known fields.

use crate::error::RenderError;
use crate::markup::decode_entities;
use inkpage_render_core::{ImagePlacement, TextStyle};
use inkpage_style::{FontStyle, FontWeight, HorizontalAlign, TextAlign, VerticalAlign};
use inkpage_types::{Color, Margins, Orientation, PageSetup, PageSize};
use serde::Deserialize;
use serde::de::DeserializeOwned;

const DEFAULT_MARGIN: f32 = 72.0;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PageOptions {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default)]
    pub layout: Orientation,
    /// Applied to every side not set in `margins`.
    pub margin: Option<f32>,
    pub margins: Option<MarginOptions>,
    /// Font family for text on this page that names none itself.
    pub font: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarginOptions {
    pub top: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
    pub right: Option<f32>,
}

impl PageOptions {
    pub fn setup(&self) -> PageSetup {
        let fallback = self.margin.unwrap_or(DEFAULT_MARGIN);
        let sides = self.margins.unwrap_or_default();
        let margins = Margins {
            top: sides.top.unwrap_or(fallback),
            right: sides.right.unwrap_or(fallback),
            bottom: sides.bottom.unwrap_or(fallback),
            left: sides.left.unwrap_or(fallback),
        };
        PageSetup::new(&self.size, self.layout, margins)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextOptions {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    #[serde(alias = "fontSize")]
    pub size: Option<f32>,
    pub line_gap: Option<f32>,
    #[serde(default)]
    pub align: TextAlign,
    pub color: Option<Color>,
    #[serde(default)]
    pub fixed: bool,
}

impl TextOptions {
    /// Fixed text stays where it was placed; everything else continues on
    /// a new page once it reaches the bottom margin.
    pub fn style(&self, default_size: f32) -> TextStyle {
        TextStyle {
            x: self.x,
            y: self.y,
            width: self.width,
            size: self.size.unwrap_or(default_size),
            line_gap: self.line_gap.unwrap_or(0.0),
            align: self.align,
            color: self.color.unwrap_or(Color::BLACK),
            paginate: !self.fixed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageOptions {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale: Option<f32>,
    pub fit: Option<[f32; 2]>,
    pub cover: Option<[f32; 2]>,
    #[serde(default)]
    pub align: HorizontalAlign,
    #[serde(default)]
    pub valign: VerticalAlign,
    #[serde(default)]
    pub fixed: bool,
}

impl ImageOptions {
    pub fn placement(&self) -> ImagePlacement {
        ImagePlacement {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            scale: self.scale,
            fit: self.fit,
            cover: self.cover,
            align: self.align,
            valign: self.valign,
        }
    }
}

/// One entry of a font node's definition list. Missing style and weight
/// default to normal and 400.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontDefinition {
    pub src: String,
    #[serde(default)]
    pub style: Option<FontStyle>,
    #[serde(default)]
    pub weight: Option<FontWeight>,
}

impl FontDefinition {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            style: None,
            weight: None,
        }
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = Some(weight);
        self
    }
}

fn parse_error(raw: &str, e: serde_json::Error) -> RenderError {
    RenderError::OptionParse {
        raw: raw.to_string(),
        reason: e.to_string(),
    }
}

/// Decodes an options attribute into `T`, falling back to `T::default()`
/// when the attribute is absent, blank or `null`.
pub fn decode_options<T>(raw: Option<&str>) -> Result<T, RenderError>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(T::default());
    };
    let decoded = decode_entities(raw);
    let parsed: Option<T> = serde_json::from_str(&decoded).map_err(|e| parse_error(&decoded, e))?;
    Ok(parsed.unwrap_or_default())
}

/// Decodes a font node's definition payload: a JSON array of definitions,
/// or a single definition object.
pub fn decode_font_definitions(raw: &str) -> Result<Vec<FontDefinition>, RenderError> {
    let decoded = decode_entities(raw);
    let value: serde_json::Value =
        serde_json::from_str(&decoded).map_err(|e| parse_error(&decoded, e))?;
    if value.is_array() {
        serde_json::from_value(value).map_err(|e| parse_error(&decoded, e))
    } else {
        serde_json::from_value(value)
            .map(|definition| vec![definition])
            .map_err(|e| parse_error(&decoded, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpage_types::Size;

    #[test]
    fn absent_or_blank_means_defaults() {
        let options: PageOptions = decode_options(None).unwrap();
        assert_eq!(options, PageOptions::default());
        let options: TextOptions = decode_options(Some("  ")).unwrap();
        assert!(!options.fixed);
        let options: ImageOptions = decode_options(Some("null")).unwrap();
        assert_eq!(options, ImageOptions::default());
    }

    #[test]
    fn default_page_is_letter_with_inch_margins() {
        let setup = PageOptions::default().setup();
        assert_eq!(setup.size, Size::new(612.0, 792.0));
        assert_eq!(setup.margins, Margins::all(72.0));
    }

    #[test]
    fn page_options_decode_from_encoded_attribute() {
        let options: PageOptions =
            decode_options(Some("{&quot;size&quot;:&quot;a4&quot;,&quot;layout&quot;:&quot;landscape&quot;,&quot;margin&quot;:40}"))
                .unwrap();
        let setup = options.setup();
        assert_eq!(setup.size, Size::new(841.89, 595.28));
        assert_eq!(setup.margins, Margins::all(40.0));
    }

    #[test]
    fn margins_win_over_margin() {
        let options: PageOptions =
            decode_options(Some(r#"{"margin":40,"margins":{"top":10,"left":20}}"#)).unwrap();
        let margins = options.setup().margins;
        assert_eq!((margins.top, margins.left), (10.0, 20.0));
        assert_eq!((margins.bottom, margins.right), (40.0, 40.0));
    }

    #[test]
    fn custom_page_size_array() {
        let options: PageOptions = decode_options(Some(r#"{"size":[300,400]}"#)).unwrap();
        assert_eq!(options.setup().size, Size::new(300.0, 400.0));
    }

    #[test]
    fn page_font_is_accepted() {
        let options: PageOptions =
            decode_options(Some(r#"{"font":"Sans","margin":20}"#)).unwrap();
        assert_eq!(options.font.as_deref(), Some("Sans"));
        assert_eq!(options.setup().margins, Margins::all(20.0));
    }

    #[test]
    fn image_box_options_map_to_placement() {
        let options: ImageOptions = decode_options(Some(
            r#"{"fit":[120,80],"align":"center","valign":"bottom"}"#,
        ))
        .unwrap();
        let placement = options.placement();
        assert_eq!(placement.fit, Some([120.0, 80.0]));
        assert_eq!(placement.cover, None);
        assert_eq!(placement.align, HorizontalAlign::Center);
        assert_eq!(placement.valign, VerticalAlign::Bottom);

        let cover: ImageOptions = decode_options(Some(r#"{"cover":[50,50]}"#)).unwrap();
        assert_eq!(cover.placement().cover, Some([50.0, 50.0]));
        assert_eq!(cover.placement().valign, VerticalAlign::Top);
    }

    #[test]
    fn only_flowing_text_paginates() {
        assert!(TextOptions::default().style(12.0).paginate);
        let fixed = TextOptions {
            fixed: true,
            ..Default::default()
        };
        assert!(!fixed.style(12.0).paginate);
    }

    #[test]
    fn text_options_map_to_style() {
        let options: TextOptions = decode_options(Some(
            r##"{"x":10,"y":20,"fontSize":18,"lineGap":2,"align":"center","color":"#ff0000","fixed":true}"##,
        ))
        .unwrap();
        assert!(options.fixed);
        let style = options.style(12.0);
        assert_eq!((style.x, style.y), (Some(10.0), Some(20.0)));
        assert_eq!(style.size, 18.0);
        assert_eq!(style.line_gap, 2.0);
        assert_eq!(style.align, TextAlign::Center);
        assert_eq!(style.color, Color::rgb(255, 0, 0));
        assert_eq!(TextOptions::default().style(11.0).size, 11.0);
    }

    #[test]
    fn invalid_json_keeps_the_raw_payload() {
        let result: Result<TextOptions, _> = decode_options(Some("{&quot;x&quot;:"));
        match result {
            Err(RenderError::OptionParse { raw, .. }) => assert_eq!(raw, "{\"x\":"),
            other => panic!("expected OptionParse, got {:?}", other),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<ImageOptions, _> = decode_options(Some(r#"{"opacity":0.5}"#));
        assert!(matches!(result, Err(RenderError::OptionParse { .. })));
    }

    #[test]
    fn font_definitions_accept_one_or_many() {
        let many = decode_font_definitions(
            r#"[{"src":"a.ttf"},{"src":"b.ttf","style":"italic","weight":"bold"}]"#,
        )
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].weight, Some(FontWeight::BOLD));
        assert_eq!(many[1].style, Some(FontStyle::Italic));

        let one = decode_font_definitions(r#"{"src":"a.ttf","weight":300}"#).unwrap();
        assert_eq!(one, vec![FontDefinition::new("a.ttf").with_weight(FontWeight::LIGHT)]);
    }

    #[test]
    fn unknown_weight_name_is_a_parse_error() {
        let result = decode_font_definitions(r#"[{"src":"a.ttf","weight":"heavy"}]"#);
        match result {
            Err(RenderError::OptionParse { reason, .. }) => assert!(reason.contains("heavy")),
            other => panic!("expected OptionParse, got {:?}", other),
        }
    }
}

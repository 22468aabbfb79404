use crate::fonts::{FontEncoding, LoadedFont, add_default_font, embed_truetype, points};
use crate::images::{EmbeddedImage, embed_image};
use inkpage_render_core::utils::flip_y;
use inkpage_render_core::{
    DocumentWriter, EmissionSink, ImagePlacement, TextFlow, TextStyle, WriterError,
};
use inkpage_style::TextAlign;
use inkpage_types::{PageSetup, Point};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::collections::HashMap;
use std::sync::Arc;

const CHUNK_SIZE: usize = 16 * 1024;

struct OpenPage {
    setup: PageSetup,
    operations: Vec<Operation>,
}

/// A [`DocumentWriter`] that builds the PDF object graph with `lopdf` and
/// emits the serialized document through an [`EmissionSink`] when ended.
pub struct LopdfWriter {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    page: Option<OpenPage>,
    cursor: Point,
    default_font: LoadedFont,
    fonts: HashMap<String, LoadedFont>,
    active_font: Option<String>,
    font_resources: Dictionary,
    images: HashMap<String, (String, EmbeddedImage)>,
    image_resources: Dictionary,
    sink: EmissionSink,
    ended: bool,
}

impl LopdfWriter {
    pub fn new(sink: EmissionSink) -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();
        let (default_font_id, default_font) = add_default_font(&mut document);

        let mut font_resources = Dictionary::new();
        font_resources.set(default_font.resource_key.as_bytes(), default_font_id);

        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            page: None,
            cursor: Point::default(),
            default_font,
            fonts: HashMap::new(),
            active_font: None,
            font_resources,
            images: HashMap::new(),
            image_resources: Dictionary::new(),
            sink,
            ended: false,
        }
    }

    fn ensure_open(&self) -> Result<(), WriterError> {
        if self.ended {
            Err(WriterError::Ended)
        } else {
            Ok(())
        }
    }

    fn current_font_mut(&mut self) -> &mut LoadedFont {
        match self.active_font.as_ref().and_then(|name| self.fonts.get_mut(name)) {
            Some(font) => font,
            None => &mut self.default_font,
        }
    }

    fn flush_page(&mut self) -> Result<(), WriterError> {
        let Some(page) = self.page.take() else {
            return Ok(());
        };
        let content = Content {
            operations: page.operations,
        };
        let encoded = content
            .encode()
            .map_err(|e| WriterError::Pdf(e.to_string()))?;
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), encoded));

        let size = page.setup.size;
        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), size.width.into(), size.height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    fn finish_document(&mut self) -> Result<Vec<u8>, WriterError> {
        for font in self.fonts.values() {
            if let FontEncoding::Identity(cid) = &font.encoding {
                cid.write_objects(&mut self.document);
            }
        }

        let mut resources = dictionary! {
            "Font" => Object::Dictionary(self.font_resources.clone()),
        };
        if !self.image_resources.is_empty() {
            resources.set("XObject", Object::Dictionary(self.image_resources.clone()));
        }
        self.document
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        self.document
            .save_to(&mut buffer)
            .map_err(|e| WriterError::Pdf(e.to_string()))?;
        Ok(buffer)
    }
}

#[derive(Debug, Default)]
struct WrappedLine {
    encoded: Vec<u8>,
    units: u32,
    words: String,
}

/// Greedy word wrap. Whitespace runs (newlines included) separate words;
/// a word wider than `max_width` gets a line of its own.
fn wrap_lines(text: &str, font: &mut LoadedFont, size: f32, max_width: f32) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let mut words = text.split_whitespace().peekable();
    if words.peek().is_none() {
        return lines;
    }
    let (space, space_units) = font.encode(" ");
    let mut line = WrappedLine::default();

    for word in words {
        let (encoded, units) = font.encode(word);
        if !line.words.is_empty() && points(line.units + space_units + units, size) > max_width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.words.is_empty() {
            line.encoded.extend_from_slice(&space);
            line.units += space_units;
            line.words.push(' ');
        }
        line.encoded.extend_from_slice(&encoded);
        line.units += units;
        line.words.push_str(word);
    }
    if !line.words.is_empty() {
        lines.push(line);
    }
    lines
}

impl DocumentWriter for LopdfWriter {
    fn add_page(&mut self, setup: &PageSetup) -> Result<(), WriterError> {
        self.ensure_open()?;
        self.flush_page()?;
        self.page = Some(OpenPage {
            setup: setup.clone(),
            operations: Vec::new(),
        });
        self.cursor = Point::new(setup.margins.left, setup.margins.top);
        log::debug!(
            "Started page {} ({}x{} pt)",
            self.page_count(),
            setup.size.width,
            setup.size.height
        );
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.page_ids.len() + usize::from(self.page.is_some())
    }

    fn position(&self) -> Point {
        self.cursor
    }

    fn set_position(&mut self, position: Point) {
        self.cursor = position;
    }

    fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    fn register_font(&mut self, name: &str, data: Arc<Vec<u8>>) -> Result<(), WriterError> {
        self.ensure_open()?;
        if self.fonts.contains_key(name) {
            return Ok(());
        }
        let resource_key = format!("F{}", self.fonts.len() + 1);
        let (font_id, loaded) = embed_truetype(&mut self.document, name, resource_key, &data)?;
        self.font_resources
            .set(loaded.resource_key.as_bytes(), font_id);
        log::debug!("Registered font '{}' as /{}", name, loaded.resource_key);
        self.fonts.insert(name.to_string(), loaded);
        Ok(())
    }

    fn use_font(&mut self, name: &str) -> Result<(), WriterError> {
        if !self.fonts.contains_key(name) {
            return Err(WriterError::UnknownFont(name.to_string()));
        }
        self.active_font = Some(name.to_string());
        Ok(())
    }

    fn use_default_font(&mut self) {
        self.active_font = None;
    }

    fn draw_text(&mut self, text: &str, style: &TextStyle) -> Result<TextFlow, WriterError> {
        self.ensure_open()?;
        let setup = match &self.page {
            Some(page) => page.setup.clone(),
            None => return Err(WriterError::NoPage),
        };
        let x = style.x.unwrap_or(self.cursor.x);
        let top = style.y.unwrap_or(self.cursor.y);
        let max_width = style
            .width
            .unwrap_or(setup.size.width - setup.margins.right - x)
            .max(0.0);

        let font = self.current_font_mut();
        let lines = wrap_lines(text, font, style.size, max_width);
        if lines.is_empty() {
            return Ok(TextFlow::Complete);
        }
        let resource_key = font.resource_key.clone();
        let metrics = font.metrics;
        let format = font.string_format();

        let line_advance = metrics.line_height(style.size) + style.line_gap;
        let bottom = setup.size.height - setup.margins.bottom;
        let [r, g, b] = style.color.to_unit();
        let mut operations = Vec::with_capacity(lines.len() * 6);
        let mut flow = TextFlow::Complete;
        let mut y = top;
        for (index, line) in lines.iter().enumerate() {
            // The first line at the top margin always goes down, so a
            // continuation page makes progress.
            if style.paginate && y > setup.margins.top && y + line_advance > bottom {
                let rest: Vec<&str> = lines[index..].iter().map(|l| l.words.as_str()).collect();
                log::debug!(
                    "Text reached the bottom margin after {} of {} line(s)",
                    index,
                    lines.len()
                );
                flow = TextFlow::Overflow(rest.join(" "));
                break;
            }
            let line_width = points(line.units, style.size);
            let line_x = match style.align {
                TextAlign::Center => x + (max_width - line_width) / 2.0,
                TextAlign::Right => x + max_width - line_width,
                TextAlign::Left | TextAlign::Justify => x,
            };
            let baseline = flip_y(y + metrics.baseline_offset(style.size), setup.size.height);
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![
                    Object::Name(resource_key.as_bytes().to_vec()),
                    style.size.into(),
                ],
            ));
            operations.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            operations.push(Operation::new("Td", vec![line_x.into(), baseline.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(line.encoded.clone(), format)],
            ));
            operations.push(Operation::new("ET", vec![]));
            y += line_advance;
        }

        if let Some(page) = self.page.as_mut() {
            page.operations.extend(operations);
        }
        self.cursor = Point::new(x, y);
        Ok(flow)
    }

    fn draw_image(
        &mut self,
        src: &str,
        data: &[u8],
        placement: &ImagePlacement,
    ) -> Result<(), WriterError> {
        self.ensure_open()?;
        let page_height = match &self.page {
            Some(page) => page.setup.size.height,
            None => return Err(WriterError::NoPage),
        };

        let (resource_name, embedded) = match self.images.get(src) {
            Some(existing) => existing.clone(),
            None => {
                let embedded = embed_image(&mut self.document, src, data)?;
                let name = format!("Im{}", self.images.len() + 1);
                self.image_resources.set(name.as_bytes(), embedded.id);
                self.images
                    .insert(src.to_string(), (name.clone(), embedded));
                (name, embedded)
            }
        };

        let (width, height) =
            placement.resolve_size(embedded.px_width as f32, embedded.px_height as f32);
        let (dx, dy) = placement.box_offset(width, height);
        let x = placement.x.unwrap_or(self.cursor.x) + dx;
        let y = placement.y.unwrap_or(self.cursor.y) + dy;
        let bottom = flip_y(y + height, page_height);

        if let Some(page) = self.page.as_mut() {
            page.operations.extend([
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0.0.into(),
                        0.0.into(),
                        height.into(),
                        x.into(),
                        bottom.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(resource_name.into_bytes())]),
                Operation::new("Q", vec![]),
            ]);
        }
        if placement.y.is_none() {
            self.cursor.y += height;
        }
        Ok(())
    }

    fn end(&mut self) -> Result<(), WriterError> {
        self.ensure_open()?;
        self.flush_page()?;
        let bytes = self.finish_document()?;
        self.ended = true;
        log::debug!(
            "Document finished: {} page(s), {} bytes",
            self.page_ids.len(),
            bytes.len()
        );
        for chunk in bytes.chunks(CHUNK_SIZE) {
            self.sink.data(chunk.to_vec());
        }
        self.sink.end();
        Ok(())
    }
}

use inkpage::{
    DocumentWriter, EmissionSink, ImagePlacement, PageSetup, Point, TextFlow, TextStyle, WriterError,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// One call made against a [`RecordingWriter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddPage,
    RegisterFont(String),
    UseFont(String),
    UseDefaultFont,
    Text { text: String, at: Point },
    Image { src: String, at: Point, bytes: usize },
    End,
}

/// Shared view of everything a [`RecordingWriter`] was asked to do.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Calls grouped by page; anything before the first page is dropped.
    pub fn pages(&self) -> Vec<Vec<Call>> {
        let mut pages: Vec<Vec<Call>> = Vec::new();
        for call in self.calls() {
            match call {
                Call::AddPage => pages.push(Vec::new()),
                other => {
                    if let Some(page) = pages.last_mut() {
                        page.push(other);
                    }
                }
            }
        }
        pages
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }
}

/// A writer that draws nothing. Text advances the cursor by one 10pt line,
/// images by 20pt, so positions stay predictable. Paginating text whose
/// line would cross the bottom margin is handed back whole.
pub struct RecordingWriter {
    sink: EmissionSink,
    log: CallLog,
    fonts: HashSet<String>,
    cursor: Point,
    margin: Point,
    bottom: f32,
    pages: usize,
    signal_end: bool,
}

impl RecordingWriter {
    pub fn new(sink: EmissionSink, log: CallLog) -> Self {
        Self {
            sink,
            log,
            fonts: HashSet::new(),
            cursor: Point::new(0.0, 0.0),
            margin: Point::new(0.0, 0.0),
            bottom: f32::MAX,
            pages: 0,
            signal_end: true,
        }
    }

    /// A writer that never signals completion of its emission.
    pub fn silent(sink: EmissionSink, log: CallLog) -> Self {
        Self {
            signal_end: false,
            ..Self::new(sink, log)
        }
    }
}

pub const TEXT_ADVANCE: f32 = 10.0;
pub const IMAGE_ADVANCE: f32 = 20.0;

impl DocumentWriter for RecordingWriter {
    fn add_page(&mut self, setup: &PageSetup) -> Result<(), WriterError> {
        self.pages += 1;
        self.margin = Point::new(setup.margins.left, setup.margins.top);
        self.bottom = setup.size.height - setup.margins.bottom;
        self.cursor = self.margin;
        self.log.push(Call::AddPage);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn position(&self) -> Point {
        self.cursor
    }

    fn set_position(&mut self, position: Point) {
        self.cursor = position;
    }

    fn has_font(&self, name: &str) -> bool {
        self.fonts.contains(name)
    }

    fn register_font(&mut self, name: &str, _data: Arc<Vec<u8>>) -> Result<(), WriterError> {
        if self.fonts.insert(name.to_string()) {
            self.log.push(Call::RegisterFont(name.to_string()));
        }
        Ok(())
    }

    fn use_font(&mut self, name: &str) -> Result<(), WriterError> {
        if !self.fonts.contains(name) {
            return Err(WriterError::UnknownFont(name.to_string()));
        }
        self.log.push(Call::UseFont(name.to_string()));
        Ok(())
    }

    fn use_default_font(&mut self) {
        self.log.push(Call::UseDefaultFont);
    }

    fn draw_text(&mut self, text: &str, style: &TextStyle) -> Result<TextFlow, WriterError> {
        if self.pages == 0 {
            return Err(WriterError::NoPage);
        }
        let at = Point::new(
            style.x.unwrap_or(self.cursor.x),
            style.y.unwrap_or(self.cursor.y),
        );
        if style.paginate && at.y > self.margin.y && at.y + TEXT_ADVANCE > self.bottom {
            self.cursor = at;
            return Ok(TextFlow::Overflow(text.to_string()));
        }
        self.log.push(Call::Text {
            text: text.to_string(),
            at,
        });
        self.cursor = Point::new(at.x, at.y + TEXT_ADVANCE);
        Ok(TextFlow::Complete)
    }

    fn draw_image(
        &mut self,
        src: &str,
        data: &[u8],
        placement: &ImagePlacement,
    ) -> Result<(), WriterError> {
        if self.pages == 0 {
            return Err(WriterError::NoPage);
        }
        let at = Point::new(
            placement.x.unwrap_or(self.cursor.x),
            placement.y.unwrap_or(self.cursor.y),
        );
        self.log.push(Call::Image {
            src: src.to_string(),
            at,
            bytes: data.len(),
        });
        if placement.y.is_none() {
            self.cursor.y += IMAGE_ADVANCE;
        }
        Ok(())
    }

    fn end(&mut self) -> Result<(), WriterError> {
        self.log.push(Call::End);
        self.sink.data(format!("pages={}", self.pages).into_bytes());
        if self.signal_end {
            self.sink.end();
        }
        Ok(())
    }
}

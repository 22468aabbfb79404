#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;
pub mod recording;

use image::{ImageFormat, Rgba, RgbaImage};
use inkpage::{DocumentWriter, InMemoryFetcher, Renderer, RendererBuilder};
use lopdf::Document as LopdfDocument;
use recording::{CallLog, RecordingWriter};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A rendered PDF alongside its parsed form.
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        assert!(bytes.starts_with(b"%PDF-"), "output is not a PDF");
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    pub fn shown_strings(&self, page: u32) -> Vec<String> {
        pdf_assertions::shown_strings(&self.doc, page)
    }

    pub fn text_offsets(&self, page: u32) -> Vec<(f32, f32)> {
        pdf_assertions::text_offsets(&self.doc, page)
    }
}

/// A renderer writing real PDFs, with resources served from `fetcher`.
pub fn pdf_renderer(fetcher: InMemoryFetcher) -> Renderer {
    RendererBuilder::new()
        .with_fetcher(fetcher)
        .with_emission_timeout(Duration::from_secs(2))
        .build()
        .expect("renderer")
}

/// A renderer whose writer records calls into the returned log. The fetcher
/// stays shared so tests can read its fetch count.
pub fn recording_renderer(fetcher: Arc<InMemoryFetcher>) -> (Renderer, CallLog) {
    let log = CallLog::default();
    let factory_log = log.clone();
    let renderer = RendererBuilder::new()
        .with_shared_fetcher(fetcher)
        .with_emission_timeout(Duration::from_secs(2))
        .with_writer_factory(move |sink| {
            Box::new(RecordingWriter::new(sink, factory_log.clone())) as Box<dyn DocumentWriter>
        })
        .build()
        .expect("renderer");
    (renderer, log)
}

/// Wraps `body` in a document node.
pub fn document(body: &str) -> String {
    format!(
        r#"<div data-svelte-pdf-kit-type="document">{}</div>"#,
        body
    )
}

/// A text node; `options` is placed into the attribute entity-encoded.
pub fn text_node(content: &str, options: Option<&str>) -> String {
    match options {
        Some(options) => format!(
            r#"<p data-svelte-pdf-kit-type="text" data-svelte-pdf-kit-options="{}">{}</p>"#,
            encode_attribute(options),
            content
        ),
        None => format!(r#"<p data-svelte-pdf-kit-type="text">{}</p>"#, content),
    }
}

pub fn page_node(options: Option<&str>) -> String {
    match options {
        Some(options) => format!(
            r#"<section data-svelte-pdf-kit-type="page" data-svelte-pdf-kit-options="{}"></section>"#,
            encode_attribute(options)
        ),
        None => r#"<section data-svelte-pdf-kit-type="page"></section>"#.to_string(),
    }
}

pub fn encode_attribute(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('"', "&quot;")
}

/// A small opaque PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([30, 60, 200, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("png encoding");
    out.into_inner()
}

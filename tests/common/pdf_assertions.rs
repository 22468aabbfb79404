use lopdf::Document as LopdfDocument;
use lopdf::content::{Content, Operation};
use std::collections::HashMap;

/// Decoded content-stream operations of a 1-based page.
pub fn page_operations(doc: &LopdfDocument, page: u32) -> Vec<Operation> {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page) else {
        panic!("page {} not found ({} pages)", page, pages.len());
    };
    let bytes = doc.get_page_content(*page_id).expect("page content");
    Content::decode(&bytes).expect("decodable content").operations
}

/// Every string shown with `Tj` on a page, in drawing order.
pub fn shown_strings(doc: &LopdfDocument, page: u32) -> Vec<String> {
    page_operations(doc, page)
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first())
        .filter_map(|operand| operand.as_str().ok())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .collect()
}

/// The `Td` offsets on a page, as (x, y) pairs in PDF coordinates.
pub fn text_offsets(doc: &LopdfDocument, page: u32) -> Vec<(f32, f32)> {
    page_operations(doc, page)
        .iter()
        .filter(|op| op.operator == "Td" && op.operands.len() == 2)
        .map(|op| {
            (
                op.operands[0].as_float().unwrap_or(f32::NAN),
                op.operands[1].as_float().unwrap_or(f32::NAN),
            )
        })
        .collect()
}

/// Width and height of a page's MediaBox.
pub fn media_box(doc: &LopdfDocument, page: u32) -> (f32, f32) {
    let pages = doc.get_pages();
    let page_id = pages[&page];
    let dict = doc.get_dictionary(page_id).expect("page dictionary");
    let media_box = dict.get(b"MediaBox").and_then(|b| b.as_array()).expect("MediaBox");
    let corners: Vec<f32> = media_box.iter().map(|v| v.as_float().unwrap_or(0.0)).collect();
    (corners[2] - corners[0], corners[3] - corners[1])
}

/// Number of image XObjects embedded anywhere in the file, soft masks excluded.
pub fn embedded_image_count(doc: &LopdfDocument) -> usize {
    doc.objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| {
            let dict = &stream.dict;
            let is_image = dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|name| name == b"Image")
                .unwrap_or(false);
            let is_mask = dict
                .get(b"ColorSpace")
                .and_then(|s| s.as_name())
                .map(|name| name == b"DeviceGray")
                .unwrap_or(false);
            is_image && !is_mask
        })
        .count()
}

/// The raw `Tj` operands of a page, for fonts whose strings are glyph ids.
pub fn shown_bytes(doc: &LopdfDocument, page: u32) -> Vec<Vec<u8>> {
    page_operations(doc, page)
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first())
        .filter_map(|operand| operand.as_str().ok())
        .map(|bytes| bytes.to_vec())
        .collect()
}

/// Glyph id to text, merged from every ToUnicode CMap in the file.
pub fn to_unicode_map(doc: &LopdfDocument) -> HashMap<u16, String> {
    let mut map = HashMap::new();
    for stream in doc.objects.values().filter_map(|obj| obj.as_stream().ok()) {
        let content = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let text = String::from_utf8_lossy(&content);
        if !text.starts_with("/CIDInit") {
            continue;
        }
        for line in text.lines() {
            let Some((gid, unicode)) = line.split_once("> <") else {
                continue;
            };
            let Ok(gid) = u16::from_str_radix(gid.trim_start_matches('<'), 16) else {
                continue;
            };
            let hex = unicode.trim_end_matches('>');
            let units: Vec<u16> = (0..hex.len())
                .step_by(4)
                .filter_map(|i| hex.get(i..i + 4))
                .filter_map(|unit| u16::from_str_radix(unit, 16).ok())
                .collect();
            map.insert(gid, String::from_utf16_lossy(&units));
        }
    }
    map
}

/// Decodes two-byte glyph ids through the document's ToUnicode maps.
pub fn decode_glyph_ids(doc: &LopdfDocument, bytes: &[u8]) -> String {
    let map = to_unicode_map(doc);
    bytes
        .chunks(2)
        .map(|pair| {
            let gid = u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]);
            map.get(&gid).cloned().unwrap_or_else(|| "\u{FFFD}".to_string())
        })
        .collect()
}

/// All text shown anywhere in the document, one line per `Tj`.
pub fn extract_text(doc: &LopdfDocument) -> String {
    let pages = doc.get_pages();
    let mut text = String::new();
    for page in pages.keys() {
        for shown in shown_strings(doc, *page) {
            text.push_str(&shown);
            text.push('\n');
        }
    }
    text
}

// ============================================================================
// Fluent Assertion Macros
// ============================================================================

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert exact page count
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {{
        let pdf = &$pdf;
        assert_eq!(
            pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            pdf.page_count()
        );
    }};
}

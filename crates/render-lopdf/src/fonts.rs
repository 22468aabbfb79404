use inkpage_render_core::WriterError;
use inkpage_render_core::utils::{encode_win_ansi, pdf_font_name};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::{BTreeMap, HashMap};

// Helvetica advance widths for 0x20..=0x7E, from the standard AFM.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

// Entries per bfchar block; the CMap format caps a block at 100.
const BFCHAR_BLOCK: usize = 100;

/// Vertical metrics in 1/1000 em, the unit PDF font programs use.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
}

impl FontMetrics {
    pub fn helvetica() -> Self {
        Self {
            ascent: 718.0,
            descent: -207.0,
            line_gap: 231.0,
        }
    }

    fn from_face(face: &ttf_parser::Face<'_>) -> Self {
        let scale = em_scale(face);
        Self {
            ascent: face.ascender() as f32 * scale,
            descent: face.descender() as f32 * scale,
            line_gap: face.line_gap() as f32 * scale,
        }
    }

    pub fn line_height(&self, size: f32) -> f32 {
        (self.ascent - self.descent + self.line_gap) * size / 1000.0
    }

    pub fn baseline_offset(&self, size: f32) -> f32 {
        self.ascent * size / 1000.0
    }
}

fn em_scale(face: &ttf_parser::Face<'_>) -> f32 {
    1000.0 / face.units_per_em().max(1) as f32
}

/// An embedded TrueType font addressed by glyph id through Identity-H.
///
/// The Type0 object id is reserved when the font is registered; the
/// descendant CIDFont, its widths and the ToUnicode map are written at the
/// end, once every glyph the document shows is known.
#[derive(Debug, Clone)]
pub(crate) struct CidFont {
    font_id: ObjectId,
    descriptor_id: ObjectId,
    base_font: String,
    // char -> (glyph id, advance in 1/1000 em)
    glyphs: HashMap<char, (u16, u16)>,
    notdef_width: u16,
    // glyph id -> (advance, first char shown with it)
    used: BTreeMap<u16, (u16, char)>,
}

impl CidFont {
    fn glyph(&self, c: char) -> (u16, u16) {
        self.glyphs.get(&c).copied().unwrap_or((0, self.notdef_width))
    }

    pub(crate) fn write_objects(&self, document: &mut Document) {
        let widths: Vec<Object> = self
            .used
            .iter()
            .flat_map(|(gid, (width, _))| {
                [
                    Object::Integer(*gid as i64),
                    Object::Array(vec![Object::Integer(*width as i64)]),
                ]
            })
            .collect();
        let cid_font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(self.base_font.clone().into_bytes()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0i64,
            },
            "FontDescriptor" => self.descriptor_id,
            "W" => widths,
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode = to_unicode_cmap(self.used.iter().map(|(gid, (_, c))| (*gid, *c)));
        let to_unicode_id = document.add_object(Stream::new(Dictionary::new(), to_unicode.into_bytes()));

        document.objects.insert(
            self.font_id,
            Object::Dictionary(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type0",
                "BaseFont" => Object::Name(self.base_font.clone().into_bytes()),
                "Encoding" => "Identity-H",
                "DescendantFonts" => vec![Object::from(cid_font_id)],
                "ToUnicode" => to_unicode_id,
            }),
        );
    }
}

/// How a font turns text into `Tj` operands.
#[derive(Debug, Clone)]
pub(crate) enum FontEncoding {
    /// One WinAnsi byte per character, with per-byte widths.
    WinAnsi(Box<[u16; 256]>),
    /// Two big-endian bytes per glyph id.
    Identity(CidFont),
}

/// A font available to the page content streams.
#[derive(Debug, Clone)]
pub(crate) struct LoadedFont {
    pub resource_key: String,
    pub metrics: FontMetrics,
    pub encoding: FontEncoding,
}

impl LoadedFont {
    /// Encodes `text` for a `Tj` operand and returns it with its advance in
    /// 1/1000 em. Line breaks are dropped and tabs become spaces.
    pub fn encode(&mut self, text: &str) -> (Vec<u8>, u32) {
        match &mut self.encoding {
            FontEncoding::WinAnsi(widths) => {
                let bytes = encode_win_ansi(text);
                let units = bytes.iter().map(|b| widths[*b as usize] as u32).sum();
                (bytes, units)
            }
            FontEncoding::Identity(font) => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                let mut units = 0u32;
                for c in text.chars().filter(|c| *c != '\r' && *c != '\n') {
                    let c = if c == '\t' { ' ' } else { c };
                    let (gid, width) = font.glyph(c);
                    bytes.extend_from_slice(&gid.to_be_bytes());
                    font.used.entry(gid).or_insert((width, c));
                    units += width as u32;
                }
                (bytes, units)
            }
        }
    }

    pub fn string_format(&self) -> StringFormat {
        match self.encoding {
            FontEncoding::WinAnsi(_) => StringFormat::Literal,
            FontEncoding::Identity(_) => StringFormat::Hexadecimal,
        }
    }
}

/// Converts an advance in 1/1000 em to points at `size`.
pub(crate) fn points(units: u32, size: f32) -> f32 {
    units as f32 * size / 1000.0
}

/// The built-in font used when no registered font is selected.
pub(crate) fn add_default_font(document: &mut Document) -> (ObjectId, LoadedFont) {
    let id = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let mut widths = Box::new([556u16; 256]);
    widths[0x20..=0x7E].copy_from_slice(&HELVETICA_ASCII);
    widths[0xA0] = 278;
    (
        id,
        LoadedFont {
            resource_key: "F0".to_string(),
            metrics: FontMetrics::helvetica(),
            encoding: FontEncoding::WinAnsi(widths),
        },
    )
}

/// Embeds a TrueType/OpenType font as a Type0 font with a CIDFontType2
/// descendant, so every glyph in the font can be shown. Returns the
/// reserved Type0 object id.
pub(crate) fn embed_truetype(
    document: &mut Document,
    name: &str,
    resource_key: String,
    data: &[u8],
) -> Result<(ObjectId, LoadedFont), WriterError> {
    let face = ttf_parser::Face::parse(data, 0).map_err(|e| WriterError::InvalidFont {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    let metrics = FontMetrics::from_face(&face);
    let scale = em_scale(&face);
    let bbox = face.global_bounding_box();
    let italic_angle = face.italic_angle();
    let base_font = pdf_font_name(name);

    let font_file = Stream::new(
        dictionary! { "Length1" => data.len() as i64 },
        data.to_vec(),
    );
    let font_file_id = document.add_object(font_file);

    let mut flags: i64 = 32;
    if italic_angle != 0.0 || face.is_italic() {
        flags |= 64;
    }
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 * scale)
        .unwrap_or(metrics.ascent);

    let descriptor: Dictionary = dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(base_font.clone().into_bytes()),
        "Flags" => flags,
        "FontBBox" => vec![
            (bbox.x_min as f32 * scale).into(),
            (bbox.y_min as f32 * scale).into(),
            (bbox.x_max as f32 * scale).into(),
            (bbox.y_max as f32 * scale).into(),
        ],
        "ItalicAngle" => italic_angle,
        "Ascent" => metrics.ascent,
        "Descent" => metrics.descent,
        "CapHeight" => cap_height,
        "StemV" => 80i64,
        "FontFile2" => font_file_id,
    };
    let descriptor_id = document.add_object(descriptor);

    let advance = |gid: ttf_parser::GlyphId| {
        (face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale).round() as u16
    };
    let mut glyphs = HashMap::new();
    if let Some(cmap) = face.tables().cmap {
        for subtable in cmap.subtables {
            if !subtable.is_unicode() {
                continue;
            }
            subtable.codepoints(|code_point| {
                let Some(c) = char::from_u32(code_point) else {
                    return;
                };
                if glyphs.contains_key(&c) {
                    return;
                }
                if let Some(gid) = subtable.glyph_index(code_point) {
                    glyphs.insert(c, (gid.0, advance(gid)));
                }
            });
        }
    }
    log::debug!("Font '{}' maps {} characters", name, glyphs.len());

    let font = CidFont {
        font_id: document.new_object_id(),
        descriptor_id,
        base_font,
        glyphs,
        notdef_width: advance(ttf_parser::GlyphId(0)),
        used: BTreeMap::new(),
    };
    Ok((
        font.font_id,
        LoadedFont {
            resource_key,
            metrics,
            encoding: FontEncoding::Identity(font),
        },
    ))
}

/// A ToUnicode CMap for two-byte glyph ids, so shown text can be copied
/// and searched. Characters outside the BMP are written as surrogate pairs.
fn to_unicode_cmap(entries: impl Iterator<Item = (u16, char)>) -> String {
    let entries: Vec<(u16, char)> = entries.collect();
    let mut out = String::new();
    out.push_str("/CIDInit /ProcSet findresource begin\n");
    out.push_str("12 dict begin\n");
    out.push_str("begincmap\n");
    out.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> def\n");
    out.push_str("/CMapName /Adobe-Identity-UCS def\n");
    out.push_str("/CMapType 2 def\n");
    out.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    for block in entries.chunks(BFCHAR_BLOCK) {
        out.push_str(&format!("{} beginbfchar\n", block.len()));
        for (gid, c) in block {
            let mut units = [0u16; 2];
            let hex: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            out.push_str(&format!("<{:04X}> <{}>\n", gid, hex));
        }
        out.push_str("endbfchar\n");
    }

    out.push_str("endcmap\n");
    out.push_str("CMapName currentdict /CMap defineresource pop\n");
    out.push_str("end\nend\n");
    out
}

//! Font set and per-document font resources
//!
//! A [`FontSet`] is the two-face capability (regular + bold) the renderer is
//! handed. It is loaded once per process through [`init`]; when the Unicode
//! TrueType pair cannot be loaded it falls back to Helvetica and never fails.
//!
//! [`DocumentFonts`] tracks which glyphs one document shows and writes the
//! font objects when the document is finished.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::OnceLock;

use log::{debug, info, warn};
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo};
use pdf_writer::{Name, Pdf, Rect, Ref, Str};
use ttf_parser::{Face, GlyphId};

use crate::config::FontConfig;
use crate::error::{LabelError, LabelResult};
use crate::font_utils::{
    find_dejavu_sans, find_dejavu_sans_bold, font_name_from_face, load_font_file,
};
use crate::renderer::RefAllocator;
use crate::standard_fonts::StandardFont;
use crate::unicode_utils::{base_letter, unicode_to_winansi};

/// Resource name of the regular face on every page
pub const REGULAR_RESOURCE: Name<'static> = Name(b"F1");

/// Resource name of the bold face on every page
pub const BOLD_RESOURCE: Name<'static> = Name(b"F2");

/// Subset tag prefixed to embedded subset font names
const SUBSET_TAG: &str = "PHLABL";

static FONT_SET: OnceLock<FontSet> = OnceLock::new();

/// Load the process-wide font set on first call and return it.
///
/// Later calls return the cached outcome, whatever `config` they pass.
pub fn init(config: &FontConfig) -> &'static FontSet {
    FONT_SET.get_or_init(|| FontSet::load(config))
}

/// Which of the two faces to draw with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

impl FontStyle {
    pub fn resource_name(self) -> Name<'static> {
        match self {
            FontStyle::Regular => REGULAR_RESOURCE,
            FontStyle::Bold => BOLD_RESOURCE,
        }
    }
}

/// A parsed TrueType program ready for embedding
#[derive(Debug)]
pub struct EmbeddedFace {
    data: Vec<u8>,
    name: String,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    cap_height: i16,
    bbox: [i16; 4],
    // character -> glyph id
    glyphs: HashMap<char, u16>,
    // glyph id -> horizontal advance
    advances: Vec<u16>,
}

impl EmbeddedFace {
    pub fn from_file(path: &std::path::Path) -> LabelResult<Self> {
        let data = load_font_file(path)?;
        Self::from_data(data)
    }

    pub fn from_data(data: Vec<u8>) -> LabelResult<Self> {
        let face = Face::parse(&data, 0)
            .map_err(|e| LabelError::FontError(format!("Invalid font file: {}", e)))?;

        // Unicode -> glyph over the BMP, which covers every Latin script
        let mut glyphs = HashMap::new();
        for code_point in 0x0020u32..=0xFFFFu32 {
            if let Some(ch) = char::from_u32(code_point) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    glyphs.insert(ch, glyph_id.0);
                }
            }
        }
        if glyphs.is_empty() {
            return Err(LabelError::FontError(
                "Font does not provide any Unicode glyphs in BMP range".to_string(),
            ));
        }

        let advances = (0..face.number_of_glyphs())
            .map(|gid| {
                face.glyph_hor_advance(GlyphId(gid))
                    .unwrap_or(face.units_per_em() / 2)
            })
            .collect();

        let bbox = face.global_bounding_box();
        let name = font_name_from_face(&face, "LabelFont").replace(' ', "");
        Ok(Self {
            name,
            units_per_em: face.units_per_em(),
            ascent: face.ascender(),
            descent: face.descender(),
            cap_height: face.capital_height().unwrap_or(face.ascender()),
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            glyphs,
            advances,
            data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Glyph for `ch`, or for its base letter when the face lacks it
    fn glyph(&self, ch: char) -> Option<u16> {
        self.glyphs
            .get(&ch)
            .or_else(|| self.glyphs.get(&base_letter(ch)))
            .copied()
    }

    fn default_advance(&self) -> u16 {
        self.units_per_em / 2
    }

    fn advance(&self, gid: u16) -> u16 {
        self.advances
            .get(gid as usize)
            .copied()
            .unwrap_or(self.default_advance())
    }

    pub fn text_width(&self, text: &str, font_size: f64) -> f64 {
        let units: u32 = text
            .chars()
            .map(|ch| self.glyph(ch).map_or(self.default_advance(), |gid| self.advance(gid)) as u32)
            .sum();
        units as f64 * font_size / self.units_per_em as f64
    }

    /// Scale font units to the 1000-unit PDF glyph space
    fn to_pdf_units(&self, value: f64) -> f32 {
        (value * 1000.0 / self.units_per_em as f64) as f32
    }
}

/// One face of a [`FontSet`]
#[derive(Debug)]
pub enum FontFace {
    Embedded(EmbeddedFace),
    Standard(StandardFont),
}

impl FontFace {
    /// Width of `text` at `font_size`, in points
    pub fn text_width(&self, text: &str, font_size: f64) -> f64 {
        match self {
            FontFace::Embedded(face) => face.text_width(text, font_size),
            FontFace::Standard(font) => font.text_width(text, font_size),
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, FontFace::Embedded(_))
    }
}

/// The regular + bold pair a document is drawn with
#[derive(Debug)]
pub struct FontSet {
    regular: FontFace,
    bold: FontFace,
    subset: bool,
}

impl FontSet {
    /// Helvetica / Helvetica-Bold, no embedding
    pub fn builtin() -> Self {
        Self {
            regular: FontFace::Standard(StandardFont::Helvetica),
            bold: FontFace::Standard(StandardFont::HelveticaBold),
            subset: false,
        }
    }

    /// Load the Unicode TrueType pair, falling back to [`FontSet::builtin`].
    pub fn load(config: &FontConfig) -> Self {
        match Self::load_truetype(config) {
            Ok(set) => {
                info!("Unicode fonts registered for accented character support");
                set
            }
            Err(e) => {
                warn!("Could not register Unicode fonts: {}. Using Helvetica fallback.", e);
                Self::builtin()
            }
        }
    }

    fn load_truetype(config: &FontConfig) -> LabelResult<Self> {
        let regular_path = resolve_path(config.regular_path.as_ref(), find_dejavu_sans, "regular")?;
        let bold_path = resolve_path(config.bold_path.as_ref(), find_dejavu_sans_bold, "bold")?;
        debug!(
            "Loading fonts: regular={}, bold={}",
            regular_path.display(),
            bold_path.display()
        );
        Ok(Self {
            regular: FontFace::Embedded(EmbeddedFace::from_file(&regular_path)?),
            bold: FontFace::Embedded(EmbeddedFace::from_file(&bold_path)?),
            subset: config.subset,
        })
    }

    pub fn face(&self, style: FontStyle) -> &FontFace {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }

    pub fn is_embedded(&self) -> bool {
        self.regular.is_embedded() && self.bold.is_embedded()
    }
}

fn resolve_path(
    explicit: Option<&PathBuf>,
    search: fn() -> Option<PathBuf>,
    which: &str,
) -> LabelResult<PathBuf> {
    explicit
        .cloned()
        .or_else(search)
        .ok_or_else(|| LabelError::FontError(format!("no {} font file found", which)))
}

/// Glyphs one face has shown in the current document
struct FontSlot {
    font_ref: Ref,
    // glyph id -> first character drawn with it
    used: BTreeMap<u16, char>,
}

/// Font resources of one document
pub struct DocumentFonts<'a> {
    set: &'a FontSet,
    regular: FontSlot,
    bold: FontSlot,
}

impl<'a> DocumentFonts<'a> {
    pub fn new(set: &'a FontSet, refs: &mut RefAllocator) -> Self {
        Self {
            set,
            regular: FontSlot { font_ref: refs.bump(), used: BTreeMap::new() },
            bold: FontSlot { font_ref: refs.bump(), used: BTreeMap::new() },
        }
    }

    pub fn text_width(&self, style: FontStyle, text: &str, font_size: f64) -> f64 {
        self.set.face(style).text_width(text, font_size)
    }

    /// Encode `text` for a show-text operator and remember the glyphs used.
    pub fn encode(&mut self, style: FontStyle, text: &str) -> Vec<u8> {
        let (face, slot) = match style {
            FontStyle::Regular => (&self.set.regular, &mut self.regular),
            FontStyle::Bold => (&self.set.bold, &mut self.bold),
        };
        match face {
            FontFace::Standard(_) => unicode_to_winansi(text),
            FontFace::Embedded(embedded) => {
                // Identity-H: two big-endian bytes of glyph id per character
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let gid = embedded.glyph(ch).unwrap_or(0);
                    if gid != 0 {
                        slot.used.entry(gid).or_insert(ch);
                    }
                    bytes.extend_from_slice(&gid.to_be_bytes());
                }
                bytes
            }
        }
    }

    /// Pair resource names with font objects in a page's resources.
    pub fn write_resources(&self, resources: &mut pdf_writer::writers::Resources<'_>) {
        let mut dict = resources.fonts();
        dict.pair(REGULAR_RESOURCE, self.regular.font_ref);
        dict.pair(BOLD_RESOURCE, self.bold.font_ref);
    }

    /// Write both font objects into `pdf`.
    pub fn finish(self, pdf: &mut Pdf, refs: &mut RefAllocator) {
        let subset = self.set.subset;
        write_face(pdf, refs, &self.set.regular, &self.regular, subset);
        write_face(pdf, refs, &self.set.bold, &self.bold, subset);
    }
}

fn write_face(
    pdf: &mut Pdf,
    refs: &mut RefAllocator,
    face: &FontFace,
    slot: &FontSlot,
    subset: bool,
) {
    match face {
        FontFace::Standard(font) => {
            pdf.type1_font(slot.font_ref)
                .base_font(Name(font.base_name().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }
        FontFace::Embedded(embedded) => write_type0_font(pdf, refs, embedded, slot, subset),
    }
}

/// Embed a TrueType face as Type0 font (CIDFontType2, Identity-H, CID == GID)
fn write_type0_font(
    pdf: &mut Pdf,
    refs: &mut RefAllocator,
    face: &EmbeddedFace,
    slot: &FontSlot,
    subset: bool,
) {
    let cid_font_id = refs.bump();
    let descriptor_id = refs.bump();
    let font_file_id = refs.bump();
    let to_unicode_id = refs.bump();

    let mut program = None;
    if subset {
        let mut glyph_ids: Vec<u16> = std::iter::once(0).chain(slot.used.keys().copied()).collect();
        glyph_ids.dedup();
        match subsetter::subset(&face.data, 0, subsetter::Profile::pdf(&glyph_ids)) {
            Ok(data) => program = Some(data),
            Err(e) => warn!(
                "Font subsetting failed for {}: {:?}, embedding full font",
                face.name, e
            ),
        }
    }
    let (font_data, base_font) = match &program {
        Some(data) => (data.as_slice(), format!("{}+{}", SUBSET_TAG, face.name)),
        None => (face.data.as_slice(), face.name.clone()),
    };
    let base_font_name = Name(base_font.as_bytes());

    pdf.stream(font_file_id, font_data)
        .pair(Name(b"Length1"), font_data.len() as i32);

    pdf.font_descriptor(descriptor_id)
        .name(base_font_name)
        .flags(FontFlags::SYMBOLIC)
        .bbox(Rect::new(
            face.to_pdf_units(face.bbox[0] as f64),
            face.to_pdf_units(face.bbox[1] as f64),
            face.to_pdf_units(face.bbox[2] as f64),
            face.to_pdf_units(face.bbox[3] as f64),
        ))
        .italic_angle(0.0)
        .ascent(face.to_pdf_units(face.ascent as f64))
        .descent(face.to_pdf_units(face.descent as f64))
        .cap_height(face.to_pdf_units(face.cap_height as f64))
        .stem_v(80.0)
        .font_file2(font_file_id);

    {
        let mut cid_font = pdf.cid_font(cid_font_id);
        cid_font
            .subtype(CidFontType::Type2)
            .base_font(base_font_name)
            .system_info(SystemInfo {
                registry: Str(b"Adobe"),
                ordering: Str(b"Identity"),
                supplement: 0,
            })
            .font_descriptor(descriptor_id)
            .default_width(face.to_pdf_units(face.default_advance() as f64))
            .cid_to_gid_map_predefined(Name(b"Identity"));

        // Runs of consecutive glyph ids share one /W entry
        let mut widths_writer = cid_font.widths();
        let mut used = slot.used.keys().copied().peekable();
        while let Some(start) = used.next() {
            let mut run = vec![glyph_width(face, start)];
            let mut last = start;
            while let Some(&next) = used.peek() {
                if next != last + 1 {
                    break;
                }
                run.push(glyph_width(face, next));
                last = next;
                used.next();
            }
            widths_writer.consecutive(start, run);
        }
    }

    pdf.type0_font(slot.font_ref)
        .base_font(base_font_name)
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_id)
        .to_unicode(to_unicode_id);

    let cmap = to_unicode_cmap(&slot.used);
    pdf.stream(to_unicode_id, cmap.as_bytes());
}

fn glyph_width(face: &EmbeddedFace, gid: u16) -> f32 {
    face.to_pdf_units(face.advance(gid) as f64)
}

/// ToUnicode CMap mapping each used glyph id back to its character
fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> String {
    let mut sections = String::new();
    let pairs: Vec<(&u16, &char)> = used.iter().collect();
    // At most 100 entries per bfchar block
    for chunk in pairs.chunks(100) {
        let _ = writeln!(sections, "{} beginbfchar", chunk.len());
        for (gid, ch) in chunk {
            let mut units = [0u16; 2];
            let utf16: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            let _ = writeln!(sections, "<{:04X}> <{}>", gid, utf16);
        }
        sections.push_str("endbfchar\n");
    }

    format!(
        "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
   /Ordering (UCS)
   /Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
{}endcmap
CMapName currentdict /CMap defineresource pop
end
end",
        sections
    )
}

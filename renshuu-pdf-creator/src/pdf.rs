//! PDF encoding of laid-out pages.
//!
//! Turns the positioned text fragments of [`crate::layout::Page`] into a PDF
//! byte buffer, fully materialized in memory. The embedded font path builds a
//! Type0/CIDFontType2 chain with Identity-H encoding so the full BMP of the
//! bundled font is addressable; the fallback path uses the built-in Helvetica
//! Type1 font and silently drops characters outside its repertoire.

use anyhow::Result;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use fontdue::Font;
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::BTreeSet;
use std::io::Write;

use crate::fonts::ResolvedFont;
use crate::layout::{Page, PageGeometry};

/// Resource name the content streams select the document font under.
const FONT_RESOURCE: &[u8] = b"F1";

/// Encode laid-out pages into PDF bytes.
pub fn encode_pdf(pages: &[Page], font: &ResolvedFont, geometry: &PageGeometry) -> Result<Vec<u8>> {
    let mut document = Document::with_version("1.5");

    let font_id = match font {
        ResolvedFont::Embedded { font, data } => {
            add_embedded_font(&mut document, font, data, pages)?
        }
        ResolvedFont::Builtin => add_builtin_font(&mut document),
    };

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Kids", Object::Array(vec![]));
    pages_dict.set("Count", Object::Integer(0));
    let pages_id = document.add_object(Object::Dictionary(pages_dict));

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let page_id = create_page(&mut document, page, font, geometry, font_id, pages_id)?;
        kids.push(Object::Reference(page_id));
    }

    let kid_count = kids.len() as i64;
    if let Ok(Object::Dictionary(pages_dict)) = document.get_object_mut(pages_id) {
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", Object::Integer(kid_count));
    }

    let mut info_dict = Dictionary::new();
    info_dict.set("Producer", Object::string_literal("renshuu-pdf-creator"));
    let info_id = document.add_object(Object::Dictionary(info_dict));

    let mut catalog_dict = Dictionary::new();
    catalog_dict.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog_dict.set("Pages", Object::Reference(pages_id));
    let catalog_id = document.add_object(Object::Dictionary(catalog_dict));

    document.trailer.set(b"Root", Object::Reference(catalog_id));
    document.trailer.set(b"Info", Object::Reference(info_id));

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Create one page object with its compressed content stream.
fn create_page(
    document: &mut Document,
    page: &Page,
    font: &ResolvedFont,
    geometry: &PageGeometry,
    font_id: ObjectId,
    pages_id: ObjectId,
) -> Result<ObjectId> {
    let mut content = Content {
        operations: Vec::new(),
    };

    // Font selection does not persist across pages; every content stream
    // re-issues Tf before any text is shown.
    content.operations.push(Operation::new("BT", vec![]));
    content.operations.push(Operation::new(
        "Tf",
        vec![
            Object::Name(FONT_RESOURCE.to_vec()),
            Object::Real(geometry.font_size),
        ],
    ));

    for line in &page.lines {
        content.operations.push(Operation::new(
            "Tm",
            vec![
                Object::Real(1.0),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(1.0),
                Object::Real(line.x),
                Object::Real(line.y),
            ],
        ));
        content
            .operations
            .push(Operation::new("Tj", vec![show_text(font, &line.text)]));
    }

    content.operations.push(Operation::new("ET", vec![]));

    let content_stream = flate_stream(Dictionary::new(), content.encode()?)?;
    let content_id = document.add_object(content_stream);

    let mut resources = Dictionary::new();
    let mut font_dict = Dictionary::new();
    font_dict.set(FONT_RESOURCE, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(font_dict));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(pages_id));
    page_dict.set("Resources", Object::Dictionary(resources));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(geometry.page_width),
            Object::Real(geometry.page_height),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));

    Ok(document.add_object(Object::Dictionary(page_dict)))
}

/// Build the shown-text operand for one fragment under the active font.
fn show_text(font: &ResolvedFont, text: &str) -> Object {
    match font {
        ResolvedFont::Embedded { .. } => {
            // Identity-H: CID codes are UTF-16BE code units.
            let mut utf16be = Vec::with_capacity(text.len() * 2);
            for unit in text.encode_utf16() {
                utf16be.extend_from_slice(&unit.to_be_bytes());
            }
            Object::String(utf16be, StringFormat::Hexadecimal)
        }
        ResolvedFont::Builtin => {
            let mut bytes = Vec::with_capacity(text.len());
            for ch in text.chars() {
                match winansi_byte(ch) {
                    Some(byte) => bytes.push(byte),
                    None => debug!("dropping unencodable character {:?}", ch),
                }
            }
            Object::String(bytes, StringFormat::Literal)
        }
    }
}

/// Map a character into the fallback font's repertoire.
fn winansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        Some(code as u8)
    } else {
        None
    }
}

/// Type0 / CIDFontType2 chain embedding the bundled TrueType font.
fn add_embedded_font(
    document: &mut Document,
    font: &Font,
    data: &[u8],
    pages: &[Page],
) -> Result<ObjectId> {
    let base_name = crate::fonts::EMBEDDED_BASE_FONT;

    let mut font_file_dict = Dictionary::new();
    font_file_dict.set("Length1", Object::Integer(data.len() as i64));
    let font_file_id = document.add_object(flate_stream(font_file_dict, data.to_vec())?);

    let mut font_descriptor = Dictionary::new();
    font_descriptor.set("Type", Object::Name(b"FontDescriptor".to_vec()));
    font_descriptor.set("FontName", Object::Name(base_name.as_bytes().to_vec()));
    font_descriptor.set("Flags", Object::Integer(4));
    font_descriptor.set(
        "FontBBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(-300),
            Object::Integer(1000),
            Object::Integer(1000),
        ]),
    );
    font_descriptor.set("ItalicAngle", Object::Integer(0));
    font_descriptor.set("Ascent", Object::Integer(880));
    font_descriptor.set("Descent", Object::Integer(-120));
    font_descriptor.set("CapHeight", Object::Integer(700));
    font_descriptor.set("StemV", Object::Integer(80));
    font_descriptor.set("FontFile2", Object::Reference(font_file_id));
    let font_descriptor_id = document.add_object(Object::Dictionary(font_descriptor));

    let cid_to_gid_id = document.add_object(create_cid_to_gid_map_stream(font)?);

    let mut cidfont = Dictionary::new();
    cidfont.set("Type", Object::Name(b"Font".to_vec()));
    cidfont.set("Subtype", Object::Name(b"CIDFontType2".to_vec()));
    cidfont.set("BaseFont", Object::Name(base_name.as_bytes().to_vec()));
    cidfont.set(
        "CIDSystemInfo",
        Object::Dictionary({
            let mut d = Dictionary::new();
            d.set("Registry", Object::string_literal("Adobe"));
            d.set("Ordering", Object::string_literal("Identity"));
            d.set("Supplement", Object::Integer(0));
            d
        }),
    );
    cidfont.set("FontDescriptor", Object::Reference(font_descriptor_id));
    cidfont.set("DW", Object::Integer(1000));
    cidfont.set("W", Object::Array(build_width_array(font, pages)));
    cidfont.set("CIDToGIDMap", Object::Reference(cid_to_gid_id));
    let cidfont_id = document.add_object(Object::Dictionary(cidfont));

    let tounicode_id = document.add_object(create_identity_tounicode_cmap_stream());

    let mut type0 = Dictionary::new();
    type0.set("Type", Object::Name(b"Font".to_vec()));
    type0.set("Subtype", Object::Name(b"Type0".to_vec()));
    type0.set("BaseFont", Object::Name(base_name.as_bytes().to_vec()));
    type0.set("Encoding", Object::Name(b"Identity-H".to_vec()));
    type0.set("DescendantFonts", Object::Array(vec![Object::Reference(cidfont_id)]));
    type0.set("ToUnicode", Object::Reference(tounicode_id));

    Ok(document.add_object(Object::Dictionary(type0)))
}

/// Built-in Helvetica, WinAnsi-encoded.
fn add_builtin_font(document: &mut Document) -> ObjectId {
    let mut font_dict = Dictionary::new();
    font_dict.set("Type", Object::Name(b"Font".to_vec()));
    font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    font_dict.set(
        "BaseFont",
        Object::Name(crate::fonts::BUILTIN_BASE_FONT.as_bytes().to_vec()),
    );
    font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    document.add_object(Object::Dictionary(font_dict))
}

/// Per-CID widths in 1/1000 em for the characters the document actually uses.
/// DW covers everything else.
fn build_width_array(font: &Font, pages: &[Page]) -> Vec<Object> {
    let mut used: BTreeSet<u16> = BTreeSet::new();
    for page in pages {
        for line in &page.lines {
            for ch in line.text.chars() {
                let mut buf = [0u16; 2];
                let units = ch.encode_utf16(&mut buf);
                // Surrogate pairs fall back to DW.
                if units.len() == 1 {
                    used.insert(units[0]);
                }
            }
        }
    }

    let mut w = Vec::with_capacity(used.len() * 2);
    for cid in used {
        let Some(ch) = char::from_u32(cid as u32) else {
            continue;
        };
        // Advance at size 1000 equals the advance in 1/1000 em.
        let advance = font.metrics(ch, 1000.0).advance_width;
        w.push(Object::Integer(cid as i64));
        w.push(Object::Array(vec![Object::Real(advance)]));
    }
    w
}

/// Full BMP CID -> glyph index map, 2 bytes per CID. CID codes equal UTF-16
/// BMP code units in our content streams.
fn create_cid_to_gid_map_stream(font: &Font) -> Result<Object> {
    let mut map = vec![0u8; 65536 * 2];
    for cid in 0u32..=0xFFFF {
        if let Some(ch) = char::from_u32(cid) {
            let gid = font.lookup_glyph_index(ch);
            let offset = (cid as usize) * 2;
            map[offset] = (gid >> 8) as u8;
            map[offset + 1] = (gid & 0xFF) as u8;
        }
    }
    flate_stream(Dictionary::new(), map)
}

fn create_identity_tounicode_cmap_stream() -> Object {
    let cmap = b"/CIDInit /ProcSet findresource begin
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
1 beginbfrange
<0000> <FFFF> <0000>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end"
    .to_vec();
    Object::Stream(Stream::new(Dictionary::new(), cmap))
}

/// FlateDecode-compressed stream; Length is set by lopdf, Length1 and other
/// entries come in through `dict`.
fn flate_stream(mut dict: Dictionary, data: Vec<u8>) -> Result<Object> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&data)?;
    let compressed = encoder.finish()?;
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    Ok(Object::Stream(Stream::new(dict, compressed)))
}

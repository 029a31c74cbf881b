//! C source output for firmware builds.
//!
//! Fonts are written as `GFXfont` (Adafruit GFX) or `UnicodeFont` (tcUnicode) declarations,
//! bitmaps as plain `uint8_t` arrays. All arrays are marked `PROGMEM`.
use std::io::Write;

use crate::{
    block::FontBlock,
    error::{BitmapError, Result},
    export::{AdafruitPlan, FontFormat, GlyphRecord, UnicodePlan},
    indexed::IndexedRaster,
    palette::Palette,
};

const BYTES_PER_LINE: usize = 16;

/// Turns an arbitrary name into a valid C identifier.
pub fn c_identifier(name: &str) -> String {
    let mut id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, '_');
    }
    id
}

fn write_prelude<W: Write>(sink: &mut W, include: Option<&str>) -> Result<()> {
    writeln!(sink, "// Generated by bitfont {}", env!("CARGO_PKG_VERSION"))?;
    if let Some(include) = include {
        writeln!(sink, "#include <{include}>")?;
    }
    writeln!(sink, "#ifndef PROGMEM")?;
    writeln!(sink, "#define PROGMEM")?;
    writeln!(sink, "#endif")?;
    writeln!(sink)?;
    Ok(())
}

fn write_byte_array<W: Write>(sink: &mut W, name: &str, data: &[u8]) -> Result<()> {
    writeln!(sink, "const uint8_t {name}[] PROGMEM = {{")?;
    if data.is_empty() {
        // C has no zero-length arrays
        writeln!(sink, "    0x00,")?;
    }
    for line in data.chunks(BYTES_PER_LINE) {
        let hex: Vec<String> = line.iter().map(|b| format!("0x{b:02x}")).collect();
        writeln!(sink, "    {},", hex.join(", "))?;
    }
    writeln!(sink, "}};")?;
    Ok(())
}

fn describe(code_point: u32) -> String {
    match char::from_u32(code_point) {
        Some(c) if !c.is_control() && c != '\\' => format!("U+{code_point:04X} '{c}'"),
        _ => format!("U+{code_point:04X}"),
    }
}

fn record_fields(r: &GlyphRecord) -> String {
    format!(
        "{}, {}, {}, {}, {}",
        r.width, r.height, r.x_advance, r.x_offset, r.y_offset
    )
}

/// Writes the font as C declarations named after `name`.
pub fn write_font_source<W: Write>(
    blocks: &[FontBlock],
    format: FontFormat,
    name: &str,
    y_advance: Option<u8>,
    sink: &mut W,
) -> Result<()> {
    let id = c_identifier(name);
    match format {
        FontFormat::Adafruit => {
            let plan = AdafruitPlan::new(blocks, y_advance)?;
            write_adafruit(&plan, &id, sink)
        }
        FontFormat::TcUnicode => {
            let plan = UnicodePlan::new(blocks, y_advance)?;
            write_unicode(&plan, &id, sink)
        }
    }
}

fn write_adafruit<W: Write>(plan: &AdafruitPlan<'_>, id: &str, sink: &mut W) -> Result<()> {
    let bitmap: Vec<u8> = plan
        .glyphs
        .iter()
        .flat_map(|g| g.bitmap.iter().copied())
        .collect();
    // GFXglyph::bitmapOffset is a uint16_t.
    let last_offset = bitmap.len() - plan.glyphs.last().map_or(0, |g| g.bitmap.len());
    if last_offset > u16::MAX as usize {
        return Err(BitmapError::InvalidArgument(format!(
            "bitmap offset {last_offset} exceeds the 16 bit GFXglyph field"
        )));
    }

    write_prelude(sink, Some("gfxfont.h"))?;
    write_byte_array(sink, &format!("{id}Bitmaps"), &bitmap)?;
    writeln!(sink)?;

    // GFXfont requires one glyph per code point between first and last. An empty
    // font still gets the single U+0000 entry of its (0, 0) range.
    let (first, last) = plan.range();
    writeln!(sink, "const GFXglyph {id}Glyphs[] PROGMEM = {{")?;
    let mut offset = 0usize;
    let mut next = plan.glyphs.iter().peekable();
    for code_point in first as u32..=last as u32 {
        match next.peek() {
            Some(g) if g.glyph.code_point == code_point => {
                writeln!(
                    sink,
                    "    {{ {offset}, {} }}, // {}",
                    record_fields(&g.record),
                    describe(code_point)
                )?;
                offset += g.bitmap.len();
                next.next();
            }
            _ => writeln!(
                sink,
                "    {{ {offset}, 0, 0, 0, 0, 0 }}, // {}",
                describe(code_point)
            )?,
        }
    }
    writeln!(sink, "}};")?;
    writeln!(sink)?;
    writeln!(
        sink,
        "const GFXfont {id} PROGMEM = {{ (uint8_t *){id}Bitmaps, (GFXglyph *){id}Glyphs, 0x{first:04x}, 0x{last:04x}, {} }};",
        plan.y_advance
    )?;
    Ok(())
}

fn write_unicode<W: Write>(plan: &UnicodePlan<'_>, id: &str, sink: &mut W) -> Result<()> {
    write_prelude(sink, Some("UnicodeFontDefs.h"))?;

    for (i, b) in plan.blocks.iter().enumerate() {
        writeln!(
            sink,
            "// {} (U+{:04X}..U+{:04X})",
            b.block.name, b.block.start, b.block.end
        )?;
        let bitmap: Vec<u8> = b
            .glyphs
            .iter()
            .flat_map(|g| g.bitmap.iter().copied())
            .collect();
        write_byte_array(sink, &format!("{id}Bitmaps_{i}"), &bitmap)?;
        writeln!(sink, "const UnicodeFontGlyph {id}Glyphs_{i}[] PROGMEM = {{")?;
        if b.glyphs.is_empty() {
            writeln!(sink, "    {{ 0, 0, 0, 0, 0, 0, 0 }}, // empty block")?;
        }
        for (g, offset) in b.glyphs.iter().zip(&b.offsets) {
            writeln!(
                sink,
                "    {{ {}, {offset}, {} }}, // {}",
                g.glyph.code_point - b.block.start,
                record_fields(&g.record),
                describe(g.glyph.code_point)
            )?;
        }
        writeln!(sink, "}};")?;
        writeln!(sink)?;
    }

    writeln!(sink, "const UnicodeFontBlock {id}Blocks[] PROGMEM = {{")?;
    if plan.blocks.is_empty() {
        writeln!(sink, "    {{ 0, NULL, NULL, 0 }}, // empty font")?;
    }
    for (i, b) in plan.blocks.iter().enumerate() {
        writeln!(
            sink,
            "    {{ {}, {id}Bitmaps_{i}, {id}Glyphs_{i}, {} }},",
            b.block.start,
            b.glyphs.len()
        )?;
    }
    writeln!(sink, "}};")?;
    writeln!(
        sink,
        "const UnicodeFont {id}[] PROGMEM = {{ {{ {id}Blocks, {}, {} }} }};",
        plan.blocks.len(),
        plan.y_advance
    )?;
    Ok(())
}

/// Writes an indexed bitmap as a byte array, plus its palette for 2 and 4 bpp formats.
pub fn write_bitmap_source<W: Write>(
    raster: &IndexedRaster,
    palette: &Palette,
    name: &str,
    sink: &mut W,
) -> Result<()> {
    let id = c_identifier(name);
    write_prelude(sink, None)?;
    writeln!(
        sink,
        "// {}x{} {:?}",
        raster.width(),
        raster.height(),
        raster.format()
    )?;
    write_byte_array(sink, &format!("{id}Data"), &raster.native_bytes())?;
    if raster.format().has_palette() {
        writeln!(sink)?;
        let colors: Vec<String> = palette
            .colors()
            .iter()
            .map(|c| format!("0x{:02x}{:02x}{:02x}", c.r, c.g, c.b))
            .collect();
        writeln!(sink, "const uint32_t {id}Palette[] = {{ {} }};", colors.join(", "))?;
    }
    Ok(())
}

use bitfont::{
    render::{render_text, to_text_art},
    source::write_font_source,
    test_support::{glyph_from_rows, MapGlyphSource},
    BitRaster, BitmapError, FontBlock, FontFormat, Glyph, PackMode, UnicodeBlock, UNICODE_BLOCKS,
};
use pretty_assertions::assert_eq;

fn source() -> MapGlyphSource {
    let mut s = MapGlyphSource::new();
    s.insert(glyph_from_rows('H' as u32, &["#.#", "###", "#.#"], 4));
    s.insert(glyph_from_rows('i' as u32, &["#", ".", "#"], 2));
    s.insert(Glyph::blank(' ' as u32, 2));
    s.insert(glyph_from_rows(0x0394, &[".#.", "###"], 4));
    s
}

#[test]
fn block_lookup_by_name() {
    let latin = UnicodeBlock::find("Basic Latin").unwrap();
    assert_eq!(latin.range(), 0x20..=0x7E);
    assert_eq!(UnicodeBlock::find("BASIC_LATIN"), Some(latin));
    assert_eq!(UnicodeBlock::find("latin-1 supplement").unwrap().start, 0xA0);
    assert!(UnicodeBlock::find("klingon").is_none());
    assert!(UNICODE_BLOCKS.iter().all(|b| b.start <= b.end));
}

#[test]
fn collect_picks_displayable_code_points() {
    let latin = FontBlock::collect(&source(), &UnicodeBlock::find("basic-latin").unwrap());
    let codes: Vec<u32> = latin.glyphs().iter().map(|g| g.code_point).collect();
    assert_eq!(codes, vec![' ' as u32, 'H' as u32, 'i' as u32]);

    let greek = FontBlock::collect(&source(), &UnicodeBlock::find("greek and coptic").unwrap());
    assert_eq!(greek.glyph_count(), 1);
    assert!(greek.glyph(0x0394).is_some());
}

#[test]
fn add_glyph_rejects_foreign_code_points() {
    let mut block = FontBlock::new("Digits", '0' as u32, '9' as u32);
    let rejected = block.add_glyph(Glyph::blank('A' as u32, 1));
    assert!(rejected.is_some());
    assert!(block.is_empty());

    block.add_glyph(Glyph::blank('1' as u32, 1));
    block.add_glyph(Glyph::blank('1' as u32, 5));
    assert_eq!(block.glyph_count(), 1);
    assert_eq!(block.glyph('1' as u32).unwrap().total_advance_width, 5);
}

#[test]
fn calculated_width_covers_overhang() {
    let mut g = glyph_from_rows('H' as u32, &["#.#"], 2);
    assert_eq!(g.calculated_width(), 3);
    g.start_x = 1;
    assert_eq!(g.calculated_width(), 4);
    g.total_advance_width = 6;
    assert_eq!(g.calculated_width(), 6);
}

#[test]
fn render_line_on_common_baseline() {
    let raster = render_text(&source(), "Hi H").unwrap();
    assert_eq!(raster.mode(), PackMode::BitPacked);
    assert_eq!(
        to_text_art(&raster, '#', '.'),
        "#.#.#...#.#.\n###.....###.\n#.#.#...#.#."
    );
}

#[test]
fn render_clips_ink_outside_the_line() {
    let mut s = MapGlyphSource::new();
    let mut g = glyph_from_rows('L' as u32, &["##", "#."], 2);
    g.start_x = -1;
    s.insert(g);
    let raster = render_text(&s, "L").unwrap();
    assert_eq!(to_text_art(&raster, '#', '.'), "#.\n..");
}

#[test]
fn adafruit_source_fills_holes() {
    let latin = FontBlock::collect(&source(), &UnicodeBlock::find("basic-latin").unwrap());
    let mut out = Vec::new();
    write_font_source(&[latin], FontFormat::Adafruit, "tiny font", None, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("#include <gfxfont.h>"));
    assert!(text.contains("const uint8_t tiny_fontBitmaps[] PROGMEM = {"));
    assert!(text.contains("    { 0, 0, 0, 2, 0, 0 }, // U+0020 ' '"));
    assert!(text.contains("    { 0, 0, 0, 0, 0, 0 }, // U+0021 '!'"));
    assert!(text.contains("    { 0, 3, 3, 4, 0, -3 }, // U+0048 'H'"));
    assert!(text.contains("    { 2, 1, 3, 2, 0, -3 }, // U+0069 'i'"));
    assert!(text.contains(
        "const GFXfont tiny_font PROGMEM = { (uint8_t *)tiny_fontBitmaps, (GFXglyph *)tiny_fontGlyphs, 0x0020, 0x0069, 3 };"
    ));
}

#[test]
fn unicode_source_lists_blocks() {
    let s = source();
    let blocks: Vec<FontBlock> = ["basic-latin", "greek-and-coptic"]
        .iter()
        .map(|name| FontBlock::collect(&s, &UnicodeBlock::find(name).unwrap()))
        .collect();
    let mut out = Vec::new();
    write_font_source(&blocks, FontFormat::TcUnicode, "tiny", Some(10), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("#include <UnicodeFontDefs.h>"));
    assert!(text.contains("    { 40, 0, 3, 3, 4, 0, -3 }, // U+0048 'H'"));
    assert!(text.contains("    { 36, 0, 3, 2, 4, 0, -2 }, // U+0394 'Δ'"));
    assert!(text.contains("    { 32, tinyBitmaps_0, tinyGlyphs_0, 3 },"));
    assert!(text.contains("    { 880, tinyBitmaps_1, tinyGlyphs_1, 1 },"));
    assert!(text.contains("const UnicodeFont tiny[] PROGMEM = { { tinyBlocks, 2, 10 } };"));
}

/// Basic Latin filled from 'A' with `count` glyphs of 255x100 pixels (3188 bytes each).
fn wide_glyphs(count: u32) -> FontBlock {
    let mut block = FontBlock::from_unicode(&UnicodeBlock::find("basic-latin").unwrap());
    for cp in 'A' as u32..'A' as u32 + count {
        let mut raster = BitRaster::new(255, 100, PackMode::BitPacked).unwrap();
        raster.convert_from_predicate(|x, y| (x + y) % 3 == 0);
        block.add_glyph(Glyph::new(cp, raster, 0, 100, 255));
    }
    block
}

#[test]
fn adafruit_source_offsets_fit_sixteen_bits() {
    let mut out = Vec::new();
    write_font_source(&[wide_glyphs(20)], FontFormat::Adafruit, "big", None, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("    { 60572, 255, 100, 255, 0, -100 }, // U+0054 'T'"));

    let mut out = Vec::new();
    let err = write_font_source(&[wide_glyphs(22)], FontFormat::Adafruit, "big", None, &mut out)
        .unwrap_err();
    assert!(matches!(err, BitmapError::InvalidArgument(_)));
    assert!(out.is_empty());
}

#[test]
fn empty_fonts_produce_non_empty_arrays() {
    let mut out = Vec::new();
    write_font_source(&[], FontFormat::Adafruit, "none", None, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("= {\n};"));
    assert!(text.contains("const uint8_t noneBitmaps[] PROGMEM = {\n    0x00,\n};"));
    assert!(text.contains("    { 0, 0, 0, 0, 0, 0 }, // U+0000"));
    assert!(text.contains("0x0000, 0x0000, 0 };"));

    let mut out = Vec::new();
    write_font_source(&[], FontFormat::TcUnicode, "none", None, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("    { 0, NULL, NULL, 0 }, // empty font"));
    assert!(text.contains("{ { noneBlocks, 0, 0 } }"));

    let empty = FontBlock::new("Empty", 0x20, 0x7E);
    let mut out = Vec::new();
    write_font_source(&[empty], FontFormat::TcUnicode, "none", Some(8), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("= {\n};"));
    assert!(text.contains("    { 0, 0, 0, 0, 0, 0, 0 }, // empty block"));
    assert!(text.contains("    { 32, noneBitmaps_0, noneGlyphs_0, 0 },"));
}

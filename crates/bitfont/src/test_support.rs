//! Test support utilities for bitfont.
//!
//! This module provides helper types and functions that are useful for testing
//! raster and font export code, but are not part of the public API.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::{BitRaster, Glyph, GlyphSource, PackMode};

/// Builds a raster from rows of text, `#` marking set pixels.
///
/// Panics on empty or ragged input.
pub fn raster_from_rows(rows: &[&str], mode: PackMode) -> BitRaster {
    let width = rows.first().map_or(0, |r| r.chars().count());
    let mut raster = BitRaster::new(width, rows.len(), mode).expect("non-empty rows");
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.chars().count(), width, "ragged row {y}");
        for (x, c) in row.chars().enumerate() {
            raster.set_bit(x, y, c == '#').expect("in range");
        }
    }
    raster
}

/// A glyph drawn from text rows whose last row sits on the baseline.
pub fn glyph_from_rows(code_point: u32, rows: &[&str], advance: u32) -> Glyph {
    let raster = raster_from_rows(rows, PackMode::BitPacked);
    let height = raster.height() as u32;
    Glyph::new(code_point, raster, 0, height, advance)
}

/// An in-memory glyph source.
#[derive(Default)]
pub struct MapGlyphSource {
    pub glyphs: BTreeMap<u32, Glyph>,
}

impl MapGlyphSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, glyph: Glyph) {
        self.glyphs.insert(glyph.code_point, glyph);
    }
}

impl GlyphSource for MapGlyphSource {
    fn glyph(&self, code_point: u32) -> Option<Glyph> {
        self.glyphs.get(&code_point).cloned()
    }
}

/// A sink that fails every write.
pub struct FailingSink;

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

//! Unicode ranges and the glyphs selected from them.
use log::{debug, warn};
use once_cell::sync::Lazy;
use std::{collections::HashMap, ops::RangeInclusive};

use crate::glyph::{Glyph, GlyphSource};

/// A well-known named Unicode range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnicodeBlock {
    pub name: &'static str,
    pub start: u32,
    pub end: u32,
}

impl UnicodeBlock {
    pub const fn new(name: &'static str, start: u32, end: u32) -> Self {
        Self { name, start, end }
    }

    pub fn range(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Lower-case, dash separated form of the name, e.g. `basic-latin`.
    pub fn slug(&self) -> String {
        slugify(self.name)
    }

    pub fn find(name: &str) -> Option<UnicodeBlock> {
        BLOCKS_BY_SLUG.get(slugify(name).as_str()).copied()
    }
}

pub const UNICODE_BLOCKS: &[UnicodeBlock] = &[
    UnicodeBlock::new("Basic Latin", 0x0020, 0x007E),
    UnicodeBlock::new("Latin-1 Supplement", 0x00A0, 0x00FF),
    UnicodeBlock::new("Latin Extended-A", 0x0100, 0x017F),
    UnicodeBlock::new("Latin Extended-B", 0x0180, 0x024F),
    UnicodeBlock::new("Greek and Coptic", 0x0370, 0x03FF),
    UnicodeBlock::new("Cyrillic", 0x0400, 0x04FF),
    UnicodeBlock::new("Armenian", 0x0530, 0x058F),
    UnicodeBlock::new("Hebrew", 0x0590, 0x05FF),
    UnicodeBlock::new("Arabic", 0x0600, 0x06FF),
    UnicodeBlock::new("Devanagari", 0x0900, 0x097F),
    UnicodeBlock::new("Thai", 0x0E00, 0x0E7F),
    UnicodeBlock::new("General Punctuation", 0x2000, 0x206F),
    UnicodeBlock::new("Currency Symbols", 0x20A0, 0x20CF),
    UnicodeBlock::new("Arrows", 0x2190, 0x21FF),
    UnicodeBlock::new("Mathematical Operators", 0x2200, 0x22FF),
    UnicodeBlock::new("Box Drawing", 0x2500, 0x257F),
    UnicodeBlock::new("Block Elements", 0x2580, 0x259F),
    UnicodeBlock::new("Geometric Shapes", 0x25A0, 0x25FF),
    UnicodeBlock::new("Hiragana", 0x3040, 0x309F),
    UnicodeBlock::new("Katakana", 0x30A0, 0x30FF),
    UnicodeBlock::new("CJK Unified Ideographs", 0x4E00, 0x9FFF),
    UnicodeBlock::new("Hangul Syllables", 0xAC00, 0xD7AF),
];

static BLOCKS_BY_SLUG: Lazy<HashMap<String, UnicodeBlock>> = Lazy::new(|| {
    UNICODE_BLOCKS
        .iter()
        .map(|b| (b.slug(), *b))
        .collect()
});

fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// A named code point range and the glyphs chosen for export from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontBlock {
    pub name: String,
    pub start: u32,
    pub end: u32,
    glyphs: Vec<Glyph>,
}

impl FontBlock {
    pub fn new(name: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            glyphs: Vec::new(),
        }
    }

    pub fn from_unicode(block: &UnicodeBlock) -> Self {
        Self::new(block.name, block.start, block.end)
    }

    /// Rasterizes every displayable code point of `block`.
    pub fn collect<S: GlyphSource + ?Sized>(source: &S, block: &UnicodeBlock) -> Self {
        let mut out = Self::from_unicode(block);
        for code_point in block.range() {
            if !source.can_display(code_point) {
                continue;
            }
            match source.glyph(code_point) {
                Some(glyph) => out.glyphs.push(glyph),
                None => warn!("no glyph for U+{code_point:04X} although the font maps it"),
            }
        }
        debug!("{}: collected {} glyphs", out.name, out.glyphs.len());
        out
    }

    pub fn contains(&self, code_point: u32) -> bool {
        (self.start..=self.end).contains(&code_point)
    }

    /// Adds or replaces the glyph for its code point, keeping glyphs sorted.
    /// Glyphs outside the block's range are rejected and returned.
    pub fn add_glyph(&mut self, glyph: Glyph) -> Option<Glyph> {
        if !self.contains(glyph.code_point) {
            return Some(glyph);
        }
        match self
            .glyphs
            .binary_search_by_key(&glyph.code_point, |g| g.code_point)
        {
            Ok(i) => self.glyphs[i] = glyph,
            Err(i) => self.glyphs.insert(i, glyph),
        }
        None
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn glyph(&self, code_point: u32) -> Option<&Glyph> {
        self.glyphs
            .binary_search_by_key(&code_point, |g| g.code_point)
            .ok()
            .map(|i| &self.glyphs[i])
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

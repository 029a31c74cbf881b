//! Reads exported font tables back for inspection and validation.
use crate::{
    error::{BitmapError, Result},
    export::{
        FontFormat, GlyphRecord, ADAFRUIT_DESCRIPTOR_SIZE, GLYPH_RECORD_SIZE, INDEX_HOLE,
        TC_UNICODE_BLOCK_HEADER_SIZE, TC_UNICODE_GLYPH_ENTRY_SIZE, TC_UNICODE_TRAILER_SIZE,
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphEntry {
    pub code_point: u32,
    pub record: GlyphRecord,
    /// Absolute offset of the glyph bitmap in the table
    pub bitmap_offset: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockSummary {
    pub start: u32,
    pub end: u32,
    pub glyph_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSummary {
    pub format: FontFormat,
    pub y_advance: u8,
    /// Code point span of the Adafruit index, empty for TcUnicode tables
    pub index_range: Option<(u32, u32)>,
    pub blocks: Vec<BlockSummary>,
    pub glyphs: Vec<GlyphEntry>,
}

impl FontSummary {
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyph(&self, code_point: u32) -> Option<&GlyphEntry> {
        self.glyphs.iter().find(|g| g.code_point == code_point)
    }

    /// Packed bitmap bytes of a glyph.
    pub fn bitmap<'a>(&self, table: &'a [u8], code_point: u32) -> Option<&'a [u8]> {
        let g = self.glyph(code_point)?;
        table.get(g.bitmap_offset..g.bitmap_offset + g.record.bitmap_len())
    }
}

pub fn inspect(bytes: &[u8], format: FontFormat) -> Result<FontSummary> {
    match format {
        FontFormat::Adafruit => inspect_adafruit(bytes),
        FontFormat::TcUnicode => inspect_unicode(bytes),
    }
}

fn u16_at(bytes: &[u8], offset: usize) -> Result<u16> {
    bytes
        .get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| BitmapError::Parse(format!("truncated u16 at {offset}")))
}

fn u32_at(bytes: &[u8], offset: usize) -> Result<u32> {
    bytes
        .get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| BitmapError::Parse(format!("truncated u32 at {offset}")))
}

fn record_at(bytes: &[u8], offset: usize) -> Result<GlyphRecord> {
    let slice = bytes
        .get(offset..offset + GLYPH_RECORD_SIZE)
        .ok_or_else(|| BitmapError::Parse(format!("truncated glyph record at {offset}")))?;
    let mut raw = [0u8; GLYPH_RECORD_SIZE];
    raw.copy_from_slice(slice);
    Ok(GlyphRecord::from_bytes(raw))
}

fn inspect_adafruit(bytes: &[u8]) -> Result<FontSummary> {
    if bytes.len() < ADAFRUIT_DESCRIPTOR_SIZE {
        return Err(BitmapError::Parse("adafruit: missing descriptor".into()));
    }
    let d = bytes.len() - ADAFRUIT_DESCRIPTOR_SIZE;
    let first = u16_at(bytes, d)? as u32;
    let last = u16_at(bytes, d + 2)? as u32;
    let y_advance = bytes[d + 4];
    let index_offset = u32_at(bytes, d + 5)? as usize;
    let entries = u32_at(bytes, d + 9)? as usize;

    if entries == 0 {
        return Ok(FontSummary {
            format: FontFormat::Adafruit,
            y_advance,
            index_range: None,
            blocks: Vec::new(),
            glyphs: Vec::new(),
        });
    }
    if last < first || entries != (last - first + 1) as usize {
        return Err(BitmapError::Parse(format!(
            "adafruit: {entries} index entries do not cover {first}..={last}"
        )));
    }
    if index_offset + entries * 4 != d {
        return Err(BitmapError::Parse(
            "adafruit: index does not end at the descriptor".into(),
        ));
    }

    let mut records = Vec::new();
    for i in 0..entries {
        let offset = u32_at(bytes, index_offset + i * 4)?;
        if offset != INDEX_HOLE {
            records.push((first + i as u32, offset as usize));
        }
    }

    // A record runs up to the next record, or the index for the last one.
    let mut starts: Vec<usize> = records.iter().map(|(_, o)| *o).collect();
    starts.sort_unstable();
    let mut glyphs = Vec::with_capacity(records.len());
    for (code_point, start) in records {
        let end = starts
            .iter()
            .copied()
            .find(|s| *s > start)
            .unwrap_or(index_offset);
        if end < start + GLYPH_RECORD_SIZE {
            return Err(BitmapError::Parse(format!(
                "adafruit: record for U+{code_point:04X} is truncated"
            )));
        }
        let record = record_at(bytes, end - GLYPH_RECORD_SIZE)?;
        if record.bitmap_len() != end - start - GLYPH_RECORD_SIZE {
            return Err(BitmapError::Parse(format!(
                "adafruit: bitmap size mismatch for U+{code_point:04X}"
            )));
        }
        glyphs.push(GlyphEntry {
            code_point,
            record,
            bitmap_offset: start,
        });
    }

    Ok(FontSummary {
        format: FontFormat::Adafruit,
        y_advance,
        index_range: Some((first, last)),
        blocks: Vec::new(),
        glyphs,
    })
}

fn inspect_unicode(bytes: &[u8]) -> Result<FontSummary> {
    if bytes.len() < TC_UNICODE_TRAILER_SIZE {
        return Err(BitmapError::Parse("tc-unicode: missing trailer".into()));
    }
    let t = bytes.len() - TC_UNICODE_TRAILER_SIZE;
    let block_count = u16_at(bytes, t)? as usize;
    let y_advance = bytes[t + 2];
    let table_start = t
        .checked_sub(block_count * 4)
        .ok_or_else(|| BitmapError::Parse("tc-unicode: font table truncated".into()))?;

    let offsets = (0..block_count)
        .map(|i| u32_at(bytes, table_start + i * 4).map(|o| o as usize))
        .collect::<Result<Vec<_>>>()?;

    let mut blocks = Vec::with_capacity(block_count);
    let mut glyphs = Vec::new();
    for (i, &offset) in offsets.iter().enumerate() {
        let region_end = offsets.get(i + 1).copied().unwrap_or(table_start);
        let start = u32_at(bytes, offset)?;
        let end = u32_at(bytes, offset + 4)?;
        let count = u16_at(bytes, offset + 8)? as usize;
        let entries_start = region_end
            .checked_sub(count * TC_UNICODE_GLYPH_ENTRY_SIZE)
            .filter(|e| *e >= offset + TC_UNICODE_BLOCK_HEADER_SIZE)
            .ok_or_else(|| {
                BitmapError::Parse(format!("tc-unicode: block at {offset} is truncated"))
            })?;
        let bitmaps_start = offset + TC_UNICODE_BLOCK_HEADER_SIZE;

        let mut bitmap_total = 0;
        for g in 0..count {
            let e = entries_start + g * TC_UNICODE_GLYPH_ENTRY_SIZE;
            let relative = u16_at(bytes, e)? as u32;
            let bitmap_offset = u32_at(bytes, e + 2)? as usize;
            let record = record_at(bytes, e + 6)?;
            if bitmaps_start + bitmap_offset + record.bitmap_len() > entries_start {
                return Err(BitmapError::Parse(format!(
                    "tc-unicode: glyph {g} of block at {offset} points past its bitmaps"
                )));
            }
            let code_point = start
                .checked_add(relative)
                .filter(|cp| *cp <= end)
                .ok_or_else(|| {
                    BitmapError::Parse(format!(
                        "tc-unicode: glyph {g} of block at {offset} lies outside U+{start:04X}..U+{end:04X}"
                    ))
                })?;
            bitmap_total += record.bitmap_len();
            glyphs.push(GlyphEntry {
                code_point,
                record,
                bitmap_offset: bitmaps_start + bitmap_offset,
            });
        }
        if bitmaps_start + bitmap_total != entries_start {
            return Err(BitmapError::Parse(format!(
                "tc-unicode: block at {offset} has {} unaccounted bitmap bytes",
                (entries_start - bitmaps_start).abs_diff(bitmap_total)
            )));
        }
        blocks.push(BlockSummary {
            start,
            end,
            glyph_count: count,
        });
    }

    Ok(FontSummary {
        format: FontFormat::TcUnicode,
        y_advance,
        index_range: None,
        blocks,
        glyphs,
    })
}

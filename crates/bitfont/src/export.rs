//! Binary font table export.
//!
//! All integers are little-endian. Glyph bitmaps are bit-packed without row padding,
//! most significant bit first, and every bitmap starts on a byte boundary.
//!
//! `Adafruit` layout:
//! ```text
//! per glyph, ascending code point:  bitmap bytes | GlyphRecord (5 bytes)
//! index, one u32 per code point first..=last:  record offset or INDEX_HOLE
//! descriptor (13 bytes):  first u16 | last u16 | y_advance u8 | index_offset u32 | index_entries u32
//! ```
//!
//! `TcUnicode` layout:
//! ```text
//! per block:  start u32 | end u32 | glyph_count u16
//!             bitmaps of all glyphs
//!             per glyph: relative_code u16 | bitmap_offset u32 | GlyphRecord
//! font table: one u32 offset per block descriptor
//! trailer (3 bytes): block_count u16 | y_advance u8
//! ```
use log::{debug, warn};
use std::io::Write;

use crate::{
    block::FontBlock,
    error::{BitmapError, Result},
    glyph::Glyph,
};

pub const GLYPH_RECORD_SIZE: usize = 5;
pub const ADAFRUIT_DESCRIPTOR_SIZE: usize = 13;
pub const TC_UNICODE_BLOCK_HEADER_SIZE: usize = 10;
pub const TC_UNICODE_GLYPH_ENTRY_SIZE: usize = 6 + GLYPH_RECORD_SIZE;
pub const TC_UNICODE_TRAILER_SIZE: usize = 3;
pub const INDEX_HOLE: u32 = u32::MAX;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontFormat {
    /// Flat table indexed by code point, limited to the Basic Multilingual Plane.
    #[default]
    Adafruit,
    /// Table of Unicode blocks, each with its own glyph list.
    TcUnicode,
}

/// Fixed-size per-glyph metrics as stored in both layouts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphRecord {
    pub width: u8,
    pub height: u8,
    pub x_advance: u8,
    pub x_offset: i8,
    pub y_offset: i8,
}

impl GlyphRecord {
    pub fn from_glyph(glyph: &Glyph) -> Result<Self> {
        let cp = glyph.code_point;
        Ok(Self {
            width: fit(glyph.width(), "width", cp)?,
            height: fit(glyph.height(), "height", cp)?,
            x_advance: fit(glyph.total_advance_width, "advance", cp)?,
            x_offset: fit(glyph.start_x, "x offset", cp)?,
            y_offset: fit(glyph.baseline_offset, "y offset", cp)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; GLYPH_RECORD_SIZE] {
        [
            self.width,
            self.height,
            self.x_advance,
            self.x_offset as u8,
            self.y_offset as u8,
        ]
    }

    pub fn from_bytes(bytes: [u8; GLYPH_RECORD_SIZE]) -> Self {
        Self {
            width: bytes[0],
            height: bytes[1],
            x_advance: bytes[2],
            x_offset: bytes[3] as i8,
            y_offset: bytes[4] as i8,
        }
    }

    pub fn bitmap_len(&self) -> usize {
        (self.width as usize * self.height as usize).div_ceil(8)
    }
}

fn fit<S, T>(value: S, what: &str, code_point: u32) -> Result<T>
where
    S: Copy + std::fmt::Display,
    T: TryFrom<S>,
{
    T::try_from(value).map_err(|_| {
        BitmapError::InvalidArgument(format!(
            "glyph U+{code_point:04X}: {what} {value} does not fit the table"
        ))
    })
}

/// A glyph with its validated record and packed bitmap.
pub(crate) struct PlannedGlyph<'a> {
    pub glyph: &'a Glyph,
    pub record: GlyphRecord,
    pub bitmap: Vec<u8>,
}

impl<'a> PlannedGlyph<'a> {
    fn new(glyph: &'a Glyph) -> Result<Self> {
        Ok(Self {
            glyph,
            record: GlyphRecord::from_glyph(glyph)?,
            bitmap: glyph.packed_bytes(),
        })
    }
}

/// Glyphs of all blocks flattened into ascending code point order.
pub(crate) struct AdafruitPlan<'a> {
    pub glyphs: Vec<PlannedGlyph<'a>>,
    pub y_advance: u8,
}

impl<'a> AdafruitPlan<'a> {
    pub fn new(blocks: &'a [FontBlock], y_advance: Option<u8>) -> Result<Self> {
        let mut glyphs: Vec<&Glyph> = blocks.iter().flat_map(|b| b.glyphs()).collect();
        glyphs.sort_by_key(|g| g.code_point);
        let before = glyphs.len();
        glyphs.dedup_by_key(|g| g.code_point);
        if glyphs.len() != before {
            warn!(
                "{} glyphs appear in more than one block; keeping the first",
                before - glyphs.len()
            );
        }
        if let Some(g) = glyphs.iter().find(|g| g.code_point > 0xFFFF) {
            return Err(BitmapError::InvalidArgument(format!(
                "U+{:04X} is outside the range of an Adafruit font",
                g.code_point
            )));
        }
        let y_advance = resolve_y_advance(glyphs.iter().copied(), y_advance)?;
        let glyphs = glyphs
            .into_iter()
            .map(PlannedGlyph::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { glyphs, y_advance })
    }

    /// First and last code point, `(0, 0)` for an empty font.
    pub fn range(&self) -> (u16, u16) {
        match (self.glyphs.first(), self.glyphs.last()) {
            (Some(first), Some(last)) => (
                first.glyph.code_point as u16,
                last.glyph.code_point as u16,
            ),
            _ => (0, 0),
        }
    }
}

pub(crate) struct PlannedBlock<'a> {
    pub block: &'a FontBlock,
    pub glyphs: Vec<PlannedGlyph<'a>>,
    /// Offset of each glyph's bitmap relative to the block's bitmap start
    pub offsets: Vec<u32>,
}

pub(crate) struct UnicodePlan<'a> {
    pub blocks: Vec<PlannedBlock<'a>>,
    pub y_advance: u8,
}

impl<'a> UnicodePlan<'a> {
    pub fn new(blocks: &'a [FontBlock], y_advance: Option<u8>) -> Result<Self> {
        if blocks.len() > u16::MAX as usize {
            return Err(BitmapError::InvalidArgument(format!(
                "{} blocks exceed the font table",
                blocks.len()
            )));
        }
        let y_advance = resolve_y_advance(blocks.iter().flat_map(|b| b.glyphs()), y_advance)?;
        let mut planned = Vec::with_capacity(blocks.len());
        for block in blocks {
            if block.glyph_count() > u16::MAX as usize {
                return Err(BitmapError::InvalidArgument(format!(
                    "block {} has too many glyphs ({})",
                    block.name,
                    block.glyph_count()
                )));
            }
            let mut glyphs = Vec::with_capacity(block.glyph_count());
            let mut offsets = Vec::with_capacity(block.glyph_count());
            let mut offset = 0u32;
            for glyph in block.glyphs() {
                if !block.contains(glyph.code_point)
                    || glyph.code_point - block.start > u16::MAX as u32
                {
                    return Err(BitmapError::InvalidArgument(format!(
                        "U+{:04X} cannot be addressed from block {}",
                        glyph.code_point, block.name
                    )));
                }
                let g = PlannedGlyph::new(glyph)?;
                offsets.push(offset);
                offset += g.bitmap.len() as u32;
                glyphs.push(g);
            }
            planned.push(PlannedBlock {
                block,
                glyphs,
                offsets,
            });
        }
        Ok(Self {
            blocks: planned,
            y_advance,
        })
    }
}

fn resolve_y_advance<'a>(
    glyphs: impl Iterator<Item = &'a Glyph>,
    requested: Option<u8>,
) -> Result<u8> {
    if let Some(y) = requested {
        return Ok(y);
    }
    let (above, below) = glyphs.fold((0u32, 0u32), |(a, b), g| {
        (a.max(g.above_baseline), b.max(g.below_baseline))
    });
    u8::try_from(above + below).map_err(|_| {
        BitmapError::InvalidArgument(format!("line height {} exceeds 255", above + below))
    })
}

/// Serializes font blocks into one of the binary table layouts.
#[derive(Clone, Debug, Default)]
pub struct FontExporter {
    format: FontFormat,
    y_advance: Option<u8>,
}

impl FontExporter {
    pub fn new(format: FontFormat) -> Self {
        Self {
            format,
            y_advance: None,
        }
    }

    /// Overrides the line height otherwise derived from the glyph extents.
    pub fn with_y_advance(mut self, y_advance: u8) -> Self {
        self.y_advance = Some(y_advance);
        self
    }

    pub fn format(&self) -> FontFormat {
        self.format
    }

    /// Builds the whole table in memory. Nothing is produced when validation fails.
    pub fn to_bytes(&self, blocks: &[FontBlock]) -> Result<Vec<u8>> {
        match self.format {
            FontFormat::Adafruit => adafruit_bytes(&AdafruitPlan::new(blocks, self.y_advance)?),
            FontFormat::TcUnicode => unicode_bytes(&UnicodePlan::new(blocks, self.y_advance)?),
        }
    }

    pub fn export<W: Write>(&self, blocks: &[FontBlock], sink: &mut W) -> Result<()> {
        let bytes = self.to_bytes(blocks)?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        debug!(
            "exported {} blocks as {:?}, {} bytes",
            blocks.len(),
            self.format,
            bytes.len()
        );
        Ok(())
    }
}

pub fn export_font<W: Write>(
    blocks: &[FontBlock],
    format: FontFormat,
    sink: &mut W,
) -> Result<()> {
    FontExporter::new(format).export(blocks, sink)
}

fn offset_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        BitmapError::InvalidArgument(format!("font table of {len} bytes is too large"))
    })
}

fn adafruit_bytes(plan: &AdafruitPlan<'_>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut offsets = Vec::with_capacity(plan.glyphs.len());
    for g in &plan.glyphs {
        offsets.push((g.glyph.code_point, offset_u32(out.len())?));
        out.extend_from_slice(&g.bitmap);
        out.extend_from_slice(&g.record.to_bytes());
    }

    let (first, last) = plan.range();
    let index_offset = offset_u32(out.len())?;
    let mut index_entries = 0u32;
    if !offsets.is_empty() {
        let mut next = offsets.iter().peekable();
        for code_point in first as u32..=last as u32 {
            let entry = match next.peek() {
                Some(&&(cp, offset)) if cp == code_point => {
                    next.next();
                    offset
                }
                _ => INDEX_HOLE,
            };
            out.extend(entry.to_le_bytes());
            index_entries += 1;
        }
    }

    out.extend(first.to_le_bytes());
    out.extend(last.to_le_bytes());
    out.push(plan.y_advance);
    out.extend(index_offset.to_le_bytes());
    out.extend(index_entries.to_le_bytes());
    Ok(out)
}

fn unicode_bytes(plan: &UnicodePlan<'_>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut table = Vec::with_capacity(plan.blocks.len());
    for b in &plan.blocks {
        table.push(offset_u32(out.len())?);
        out.extend(b.block.start.to_le_bytes());
        out.extend(b.block.end.to_le_bytes());
        out.extend((b.glyphs.len() as u16).to_le_bytes());
        for g in &b.glyphs {
            out.extend_from_slice(&g.bitmap);
        }
        for (g, offset) in b.glyphs.iter().zip(&b.offsets) {
            out.extend(((g.glyph.code_point - b.block.start) as u16).to_le_bytes());
            out.extend(offset.to_le_bytes());
            out.extend_from_slice(&g.record.to_bytes());
        }
        debug!(
            "block {} (U+{:04X}..U+{:04X}): {} glyphs",
            b.block.name,
            b.block.start,
            b.block.end,
            b.glyphs.len()
        );
    }
    for offset in table {
        out.extend(offset.to_le_bytes());
    }
    out.extend((plan.blocks.len() as u16).to_le_bytes());
    out.push(plan.y_advance);
    Ok(out)
}

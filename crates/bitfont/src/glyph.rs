use crate::raster::{BitRaster, PackMode};

/// One rasterized font character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub code_point: u32,
    /// Pixel data; `None` for glyphs without ink such as a space
    pub bitmap: Option<BitRaster>,
    /// Horizontal offset from the pen position to the first column
    pub start_x: i32,
    /// Vertical offset from the baseline to the top row, negative above the baseline
    pub baseline_offset: i32,
    pub total_advance_width: u32,
    /// Pixels the glyph reaches above the baseline
    pub above_baseline: u32,
    /// Pixels the glyph reaches below the baseline
    pub below_baseline: u32,
}

impl Glyph {
    /// A glyph with no ink that only advances the pen.
    pub fn blank(code_point: u32, total_advance_width: u32) -> Self {
        Self {
            code_point,
            bitmap: None,
            start_x: 0,
            baseline_offset: 0,
            total_advance_width,
            above_baseline: 0,
            below_baseline: 0,
        }
    }

    /// Builds a glyph whose top row sits `above_baseline` pixels over the baseline.
    pub fn new(
        code_point: u32,
        bitmap: BitRaster,
        start_x: i32,
        above_baseline: u32,
        total_advance_width: u32,
    ) -> Self {
        let height = bitmap.height() as u32;
        Self {
            code_point,
            bitmap: Some(bitmap),
            start_x,
            baseline_offset: -(above_baseline as i32),
            total_advance_width,
            above_baseline,
            below_baseline: height.saturating_sub(above_baseline),
        }
    }

    pub fn width(&self) -> usize {
        self.bitmap.as_ref().map_or(0, BitRaster::width)
    }

    pub fn height(&self) -> usize {
        self.bitmap.as_ref().map_or(0, BitRaster::height)
    }

    pub fn calculated_width(&self) -> i64 {
        (self.start_x as i64 + self.width() as i64).max(self.total_advance_width as i64)
    }

    /// Bitmap bytes without row padding, as stored in the font tables.
    pub fn packed_bytes(&self) -> Vec<u8> {
        self.bitmap
            .as_ref()
            .map(|b| b.packed_bytes())
            .unwrap_or_default()
    }

    pub fn packed_len(&self) -> usize {
        PackMode::BitPacked.buffer_len(self.width(), self.height())
    }

    pub fn as_char(&self) -> Option<char> {
        char::from_u32(self.code_point)
    }
}

/// A rasterizer that produces glyphs on demand.
pub trait GlyphSource {
    fn glyph(&self, code_point: u32) -> Option<Glyph>;

    fn can_display(&self, code_point: u32) -> bool {
        self.glyph(code_point).is_some()
    }
}

//! Bit-level monochrome raster storage.
use crate::{
    error::{BitmapError, Result},
    palette::{Palette, Rgba},
};

/// Row layout of a [`BitRaster`].
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PackMode {
    /// Rows follow each other without padding. Used by the font tables.
    #[default]
    BitPacked,
    /// Every row starts on a byte boundary (XBM and Adafruit `drawBitmap` style).
    ByteAligned,
}

impl PackMode {
    // Both helpers assume dimensions accepted by `check_dimensions`.
    pub(crate) fn line_size_in_bits(self, width: usize) -> usize {
        match self {
            PackMode::BitPacked => width,
            PackMode::ByteAligned => width.div_ceil(8) * 8,
        }
    }

    pub(crate) fn buffer_len(self, width: usize, height: usize) -> usize {
        match self {
            PackMode::BitPacked => (width * height).div_ceil(8),
            PackMode::ByteAligned => width.div_ceil(8) * height,
        }
    }
}

/// A monochrome bitmap stored as packed bits, most significant bit first.
///
/// Pixel `(x, y)` lives at bit offset `y * line_size_in_bits + x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitRaster {
    data: Vec<u8>,
    width: usize,
    height: usize,
    line_size_in_bits: usize,
    mode: PackMode,
    cursor: usize,
}

impl BitRaster {
    pub fn new(width: usize, height: usize, mode: PackMode) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            data: vec![0; mode.buffer_len(width, height)],
            width,
            height,
            line_size_in_bits: mode.line_size_in_bits(width),
            mode,
            cursor: 0,
        })
    }

    /// Wraps existing storage. The buffer may be longer than needed; extra bytes are kept as is.
    pub fn from_bytes(data: Vec<u8>, width: usize, height: usize, mode: PackMode) -> Result<Self> {
        check_dimensions(width, height)?;
        let required = mode.buffer_len(width, height);
        if data.len() < required {
            return Err(BitmapError::InvalidArgument(format!(
                "buffer of {} bytes is too small for {width}x{height} ({required} bytes needed)",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            line_size_in_bits: mode.line_size_in_bits(width),
            mode,
            cursor: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn line_size_in_bits(&self) -> usize {
        self.line_size_in_bits
    }

    pub fn mode(&self) -> PackMode {
        self.mode
    }

    /// Number of pixels, which is also the number of bits `push_bit` accepts.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn get_bit(&self, x: usize, y: usize) -> Result<bool> {
        let offset = self.bit_offset(x, y)?;
        Ok(self.data[offset / 8] & (0x80 >> (offset % 8)) != 0)
    }

    pub fn set_bit(&mut self, x: usize, y: usize, value: bool) -> Result<()> {
        let offset = self.bit_offset(x, y)?;
        self.write_offset(offset, value);
        Ok(())
    }

    /// Writes the next pixel in row-major order. Row padding is skipped in byte-aligned mode.
    pub fn push_bit(&mut self, value: bool) -> Result<()> {
        if self.cursor >= self.pixel_count() {
            return Err(BitmapError::OutOfRange(format!(
                "raster of {} pixels is full",
                self.pixel_count()
            )));
        }
        let (x, y) = (self.cursor % self.width, self.cursor / self.width);
        self.write_offset(y * self.line_size_in_bits + x, value);
        self.cursor += 1;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.data.fill(0);
        self.cursor = 0;
    }

    /// Evaluates `predicate` for every pixel in row-major order and stores the result.
    pub fn convert_from_predicate<F>(&mut self, mut predicate: F)
    where
        F: FnMut(usize, usize) -> bool,
    {
        for y in 0..self.height {
            for x in 0..self.width {
                let value = predicate(x, y);
                self.write_offset(y * self.line_size_in_bits + x, value);
            }
        }
    }

    /// Row-major pixels, `palette[1]` for set bits and `palette[0]` for clear ones.
    pub fn to_rgba_image(&self, palette: &Palette) -> Vec<Rgba> {
        let background = palette.color(0);
        let foreground = palette.color(1);
        self.pixels()
            .map(|(_, _, set)| if set { foreground } else { background })
            .collect()
    }

    /// Copy of this raster using a different row layout.
    pub fn repacked(&self, mode: PackMode) -> BitRaster {
        if mode == self.mode {
            return self.clone();
        }
        let mut out = BitRaster {
            data: vec![0; mode.buffer_len(self.width, self.height)],
            width: self.width,
            height: self.height,
            line_size_in_bits: mode.line_size_in_bits(self.width),
            mode,
            cursor: 0,
        };
        for (x, y, set) in self.pixels() {
            if set {
                out.write_offset(y * out.line_size_in_bits + x, true);
            }
        }
        out
    }

    /// Bytes of the raster in bit-packed layout, regardless of the stored mode.
    pub fn packed_bytes(&self) -> Vec<u8> {
        match self.mode {
            PackMode::BitPacked => {
                let len = PackMode::BitPacked.buffer_len(self.width, self.height);
                self.data[..len].to_vec()
            }
            PackMode::ByteAligned => self.repacked(PackMode::BitPacked).into_bytes(),
        }
    }

    pub fn count_set(&self) -> usize {
        self.pixels().filter(|(_, _, set)| *set).count()
    }

    /// Iterates `(x, y, set)` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| {
                let offset = y * self.line_size_in_bits + x;
                (x, y, self.data[offset / 8] & (0x80 >> (offset % 8)) != 0)
            })
        })
    }

    fn bit_offset(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(BitmapError::OutOfRange(format!(
                "({x}, {y}) outside {}x{} raster",
                self.width, self.height
            )));
        }
        Ok(y * self.line_size_in_bits + x)
    }

    fn write_offset(&mut self, offset: usize, value: bool) {
        let mask = 0x80 >> (offset % 8);
        if value {
            self.data[offset / 8] |= mask;
        } else {
            self.data[offset / 8] &= !mask;
        }
    }
}

/// Rejects empty rasters and sizes whose bit count overflows `usize`.
///
/// The byte-aligned layout is the larger one, so a raster passing this check can be
/// repacked either way.
fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidArgument(format!(
            "raster dimensions must be positive, got {width}x{height}"
        )));
    }
    width
        .div_ceil(8)
        .checked_mul(8)
        .and_then(|line| line.checked_mul(height))
        .ok_or_else(|| {
            BitmapError::InvalidArgument(format!("raster of {width}x{height} is too large"))
        })?;
    Ok(())
}

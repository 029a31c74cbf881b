//! Indexed (1, 2 and 4 bpp) bitmaps for embedded displays.
use log::debug;

use crate::{
    error::{BitmapError, Result},
    palette::{BitDepth, Palette, Rgba},
    pixels::PixelSource,
    raster::{BitRaster, PackMode},
};

/// Pixel layouts understood by the embedded renderer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NativePixelFormat {
    /// XBM: 1 bpp, rows byte aligned, least significant bit is the leftmost pixel.
    XbmLsbFirst,
    /// Adafruit style `drawBitmap`: 1 bpp, rows byte aligned, most significant bit first.
    #[default]
    MonoBitmap,
    /// 2 bpp palette image, four pixels per byte.
    Palette2Bpp,
    /// 4 bpp palette image, two pixels per byte.
    Palette4Bpp,
}

impl NativePixelFormat {
    pub fn depth(self) -> BitDepth {
        match self {
            NativePixelFormat::XbmLsbFirst | NativePixelFormat::MonoBitmap => BitDepth::One,
            NativePixelFormat::Palette2Bpp => BitDepth::Two,
            NativePixelFormat::Palette4Bpp => BitDepth::Four,
        }
    }

    pub fn has_palette(self) -> bool {
        matches!(
            self,
            NativePixelFormat::Palette2Bpp | NativePixelFormat::Palette4Bpp
        )
    }
}

/// A palette-index image stored in a [`BitRaster`] whose rows hold `width * bits` bits.
///
/// Rows are always byte aligned, every index is stored most significant bit first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedRaster {
    width: usize,
    format: NativePixelFormat,
    bits: BitRaster,
}

impl IndexedRaster {
    pub fn new(width: usize, height: usize, format: NativePixelFormat) -> Result<Self> {
        let line_bits = width.checked_mul(format.depth().bits()).ok_or_else(|| {
            BitmapError::InvalidArgument(format!("image of {width}x{height} is too large"))
        })?;
        let bits = BitRaster::new(line_bits, height, PackMode::ByteAligned)?;
        Ok(Self {
            width,
            format,
            bits,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.bits.height()
    }

    pub fn format(&self) -> NativePixelFormat {
        self.format
    }

    pub fn index(&self, x: usize, y: usize) -> Result<usize> {
        self.check(x, y)?;
        let bpp = self.format.depth().bits();
        let mut value = 0;
        for i in 0..bpp {
            value = (value << 1) | self.bits.get_bit(x * bpp + i, y)? as usize;
        }
        Ok(value)
    }

    pub fn set_index(&mut self, x: usize, y: usize, index: usize) -> Result<()> {
        self.check(x, y)?;
        let depth = self.format.depth();
        if index >= depth.palette_size() {
            return Err(BitmapError::OutOfRange(format!(
                "index {index} does not fit {} bits",
                depth.bits()
            )));
        }
        let bpp = depth.bits();
        for i in 0..bpp {
            let bit = (index >> (bpp - 1 - i)) & 1 == 1;
            self.bits.set_bit(x * bpp + i, y, bit)?;
        }
        Ok(())
    }

    /// Bytes in the layout the target renderer expects.
    pub fn native_bytes(&self) -> Vec<u8> {
        match self.format {
            NativePixelFormat::XbmLsbFirst => self
                .bits
                .as_bytes()
                .iter()
                .map(|b| b.reverse_bits())
                .collect(),
            _ => self.bits.as_bytes().to_vec(),
        }
    }

    /// The underlying 1 bpp raster, when the format is monochrome.
    pub fn as_mono(&self) -> Option<&BitRaster> {
        (self.format.depth() == BitDepth::One).then_some(&self.bits)
    }

    pub fn to_rgba_image(&self, palette: &Palette) -> Result<Vec<Rgba>> {
        let mut out = Vec::with_capacity(self.width * self.height());
        for y in 0..self.height() {
            for x in 0..self.width {
                out.push(palette.color(self.index(x, y)?));
            }
        }
        Ok(out)
    }

    fn check(&self, x: usize, y: usize) -> Result<()> {
        if x >= self.width || y >= self.height() {
            return Err(BitmapError::OutOfRange(format!(
                "({x}, {y}) outside {}x{} bitmap",
                self.width,
                self.height()
            )));
        }
        Ok(())
    }
}

/// Maps every pixel of `source` onto `palette`, row by row.
pub fn quantize<S: PixelSource + ?Sized>(
    source: &S,
    format: NativePixelFormat,
    palette: &Palette,
    tolerance_percent: f64,
    apply_alpha: bool,
) -> Result<IndexedRaster> {
    if palette.depth() != format.depth() {
        return Err(BitmapError::InvalidArgument(format!(
            "{format:?} needs a {:?} palette, got {:?}",
            format.depth(),
            palette.depth()
        )));
    }
    let mut raster = IndexedRaster::new(source.width(), source.height(), format)?;
    for y in 0..source.height() {
        for x in 0..source.width() {
            let index = palette.closest_index(source.pixel(x, y), tolerance_percent, apply_alpha);
            raster.set_index(x, y, index)?;
        }
    }
    debug!(
        "quantized {}x{} image to {format:?}",
        raster.width(),
        raster.height()
    );
    Ok(raster)
}

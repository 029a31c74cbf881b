//! bitfont: bit-packed bitmap and font tables for embedded displays.
//! Features: bit rasters, palette quantization, Adafruit/tcUnicode font export, C source output.

pub mod block;
mod error;
pub mod export;
mod glyph;
pub mod indexed;
pub mod inspect;
mod palette;
mod pixels;
mod raster;
pub mod render;
pub mod source;
#[cfg(feature = "truetype")]
pub mod truetype;

pub use block::{FontBlock, UnicodeBlock, UNICODE_BLOCKS};
pub use error::{BitmapError, Result};
pub use export::{export_font, FontExporter, FontFormat, GlyphRecord};
pub use glyph::{Glyph, GlyphSource};
pub use indexed::{quantize, IndexedRaster, NativePixelFormat};
pub use palette::{BitDepth, Palette, Rgba, ALPHA_THRESHOLD};
pub use pixels::{PixelSource, RgbaBuffer};
pub use raster::{BitRaster, PackMode};

// Test utilities
pub mod test_support;

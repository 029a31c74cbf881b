//! Glyph rasterization for TrueType/OpenType fonts via `ab_glyph`.
use ab_glyph::{Font as _, FontVec, PxScale, ScaleFont};
use log::debug;
use std::{fs, path::Path};

use crate::{
    error::{BitmapError, Result},
    glyph::{Glyph, GlyphSource},
    raster::{BitRaster, PackMode},
};

#[derive(Clone, Debug, PartialEq)]
pub struct RasterizeOptions {
    /// Font size in pixels
    pub pixel_size: f32,
    /// Minimum coverage (0.0..=1.0) for a pixel to be set
    pub coverage_threshold: f32,
}

impl Default for RasterizeOptions {
    fn default() -> Self {
        Self {
            pixel_size: 12.0,
            coverage_threshold: 0.5,
        }
    }
}

pub struct TrueTypeSource {
    font: FontVec,
    options: RasterizeOptions,
}

impl TrueTypeSource {
    pub fn from_bytes(data: Vec<u8>, options: RasterizeOptions) -> Result<Self> {
        if options.pixel_size.is_nan() || options.pixel_size <= 0.0 {
            return Err(BitmapError::InvalidArgument(format!(
                "pixel size must be positive, got {}",
                options.pixel_size
            )));
        }
        let font =
            FontVec::try_from_vec(data).map_err(|e| BitmapError::FontLoad(e.to_string()))?;
        Ok(Self { font, options })
    }

    pub fn load(path: &Path, options: RasterizeOptions) -> Result<Self> {
        let data = fs::read(path)?;
        debug!("loaded {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(data, options)
    }

    pub fn options(&self) -> &RasterizeOptions {
        &self.options
    }

    fn scale(&self) -> PxScale {
        PxScale::from(self.options.pixel_size)
    }

    /// Line height suggested by the font's vertical metrics.
    pub fn line_height(&self) -> u32 {
        let scaled = self.font.as_scaled(self.scale());
        (scaled.ascent() - scaled.descent() + scaled.line_gap())
            .ceil()
            .max(0.0) as u32
    }
}

impl GlyphSource for TrueTypeSource {
    fn can_display(&self, code_point: u32) -> bool {
        char::from_u32(code_point).is_some_and(|c| self.font.glyph_id(c).0 != 0)
    }

    fn glyph(&self, code_point: u32) -> Option<Glyph> {
        let ch = char::from_u32(code_point)?;
        let id = self.font.glyph_id(ch);
        if id.0 == 0 {
            return None;
        }
        let scale = self.scale();
        let scaled = self.font.as_scaled(scale);
        let advance = scaled.h_advance(id).round().max(0.0) as u32;

        // Pen at the origin on the baseline; bounds are then baseline relative.
        let positioned = id.with_scale_and_position(scale, ab_glyph::point(0.0, 0.0));
        let Some(outlined) = self.font.outline_glyph(positioned) else {
            return Some(Glyph::blank(code_point, advance));
        };
        let bounds = outlined.px_bounds();
        let width = bounds.width() as usize;
        let height = bounds.height() as usize;
        let Ok(mut bitmap) = BitRaster::new(width, height, PackMode::BitPacked) else {
            return Some(Glyph::blank(code_point, advance));
        };

        let mut coverage = vec![0.0f32; width * height];
        outlined.draw(|x, y, c| {
            if let Some(v) = coverage.get_mut(y as usize * width + x as usize) {
                *v = c;
            }
        });
        let threshold = self.options.coverage_threshold;
        bitmap.convert_from_predicate(|x, y| coverage[y * width + x] >= threshold);

        let top = bounds.min.y.round() as i32;
        Some(Glyph {
            code_point,
            bitmap: Some(bitmap),
            start_x: bounds.min.x.round() as i32,
            baseline_offset: top,
            total_advance_width: advance,
            above_baseline: (-top).max(0) as u32,
            below_baseline: (top + height as i32).max(0) as u32,
        })
    }
}

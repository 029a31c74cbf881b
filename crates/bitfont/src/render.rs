//! Composes glyphs into a single line of text, mainly for previews.
use log::warn;

use crate::{
    error::{BitmapError, Result},
    glyph::{Glyph, GlyphSource},
    raster::{BitRaster, PackMode},
};

/// Renders `text` on one baseline. Characters the source cannot display are skipped.
pub fn render_text<S: GlyphSource + ?Sized>(source: &S, text: &str) -> Result<BitRaster> {
    let glyphs: Vec<Glyph> = text
        .chars()
        .filter_map(|c| {
            let glyph = source.glyph(c as u32);
            if glyph.is_none() {
                warn!("no glyph for {c:?}, skipping");
            }
            glyph
        })
        .collect();

    let width: i64 = glyphs.iter().map(|g| g.total_advance_width as i64).sum::<i64>()
        + glyphs
            .last()
            .map_or(0, |g| (g.calculated_width() - g.total_advance_width as i64).max(0));
    let ascent = glyphs.iter().map(|g| g.above_baseline).max().unwrap_or(0) as i64;
    let descent = glyphs.iter().map(|g| g.below_baseline).max().unwrap_or(0) as i64;
    if width <= 0 || ascent + descent <= 0 {
        return Err(BitmapError::InvalidArgument(format!("nothing to render for {text:?}")));
    }

    let height = (ascent + descent) as usize;
    let mut out = BitRaster::new(width as usize, height, PackMode::BitPacked)?;
    let mut pen = 0i64;
    for glyph in &glyphs {
        if let Some(bitmap) = &glyph.bitmap {
            let left = pen + glyph.start_x as i64;
            let top = ascent + glyph.baseline_offset as i64;
            for (x, y, set) in bitmap.pixels() {
                let (tx, ty) = (left + x as i64, top + y as i64);
                // Ink outside the line box is clipped.
                let inside = (0..width).contains(&tx) && (0..ascent + descent).contains(&ty);
                if set && inside {
                    out.set_bit(tx as usize, ty as usize, true)?;
                }
            }
        }
        pen += glyph.total_advance_width as i64;
    }
    Ok(out)
}

/// Text art of a raster, one line per row.
pub fn to_text_art(raster: &BitRaster, set: char, clear: char) -> String {
    let mut out = String::with_capacity((raster.width() + 1) * raster.height());
    for (x, y, bit) in raster.pixels() {
        if x == 0 && y > 0 {
            out.push('\n');
        }
        out.push(if bit { set } else { clear });
    }
    out
}

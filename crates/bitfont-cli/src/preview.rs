use bitfont::{render::to_text_art, BitRaster};

const SET: char = '█';
const CLEAR: char = '·';

/// Text art of a raster framed with its dimensions.
pub fn render_preview(raster: &BitRaster, label: &str) -> String {
    let mut out = format!("{label} ({}x{})\n", raster.width(), raster.height());
    out.push_str(&to_text_art(raster, SET, CLEAR));
    out
}

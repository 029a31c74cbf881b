//! Palettes and nearest-color quantization.
use crate::error::{BitmapError, Result};

/// Colors with alpha below this are treated as transparent background when alpha is applied.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Largest Euclidean RGB distance, between black and white.
const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7; // 255 * sqrt(3)

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Composites this color over `background` using this color's alpha.
    pub fn over(self, background: Rgba) -> Rgba {
        let a = self.a as u32;
        let mix = |fg: u8, bg: u8| ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
        Rgba::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    fn distance(self, other: Rgba) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

/// Bits per pixel of an indexed image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitDepth {
    #[default]
    One,
    Two,
    Four,
}

impl BitDepth {
    pub fn bits(self) -> usize {
        match self {
            BitDepth::One => 1,
            BitDepth::Two => 2,
            BitDepth::Four => 4,
        }
    }

    pub fn palette_size(self) -> usize {
        1 << self.bits()
    }
}

/// An ordered set of colors. Entry 0 is the background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    depth: BitDepth,
    colors: Vec<Rgba>,
}

impl Palette {
    pub fn new(depth: BitDepth, colors: Vec<Rgba>) -> Result<Self> {
        if colors.len() != depth.palette_size() {
            return Err(BitmapError::InvalidArgument(format!(
                "{depth:?} palette needs {} entries, got {}",
                depth.palette_size(),
                colors.len()
            )));
        }
        Ok(Self { depth, colors })
    }

    /// Black background, white foreground.
    pub fn mono() -> Self {
        Self {
            depth: BitDepth::One,
            colors: vec![Rgba::BLACK, Rgba::WHITE],
        }
    }

    /// Evenly spaced grey ramp from black to white.
    pub fn grey(depth: BitDepth) -> Self {
        let steps = depth.palette_size() - 1;
        let colors = (0..=steps)
            .map(|i| {
                let v = (i * 255 / steps) as u8;
                Rgba::rgb(v, v, v)
            })
            .collect();
        Self { depth, colors }
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Color at `index`, wrapping around for out-of-range indices.
    pub fn color(&self, index: usize) -> Rgba {
        self.colors[index % self.colors.len()]
    }

    /// Index of the palette entry closest to `color`.
    ///
    /// Colors within `tolerance_percent` of the background snap to index 0, which keeps
    /// anti-aliased edges from turning into speckles. With `apply_alpha`, colors below
    /// [`ALPHA_THRESHOLD`] are background and the rest are composited over entry 0 first.
    pub fn closest_index(&self, color: Rgba, tolerance_percent: f64, apply_alpha: bool) -> usize {
        let background = self.colors[0];
        let color = if apply_alpha {
            if color.a < ALPHA_THRESHOLD {
                return 0;
            }
            color.over(background)
        } else {
            color
        };

        let tolerance = if tolerance_percent.is_nan() {
            0.0
        } else {
            tolerance_percent.clamp(0.0, 100.0)
        };
        if color.distance(background) <= MAX_RGB_DISTANCE * tolerance / 100.0 {
            return 0;
        }

        let mut best = 0;
        let mut best_distance = f64::MAX;
        for (i, entry) in self.colors.iter().enumerate() {
            let d = color.distance(*entry);
            if d < best_distance {
                best = i;
                best_distance = d;
            }
        }
        best
    }
}

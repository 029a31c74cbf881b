use crate::{
    error::{BitmapError, Result},
    palette::Rgba,
};

/// Anything that can be sampled as a 2D grid of RGBA pixels.
pub trait PixelSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn pixel(&self, x: usize, y: usize) -> Rgba;
}

/// Row-major in-memory pixel grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl RgbaBuffer {
    pub fn new(width: usize, height: usize, pixels: Vec<Rgba>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(BitmapError::InvalidArgument(format!(
                "{} pixels do not fill a {width}x{height} buffer",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    pub fn set(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }
}

impl PixelSource for RgbaBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }
}

#[cfg(feature = "image")]
impl PixelSource for image::RgbaImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn pixel(&self, x: usize, y: usize) -> Rgba {
        let image::Rgba([r, g, b, a]) = *self.get_pixel(x as u32, y as u32);
        Rgba::new(r, g, b, a)
    }
}

//! Painting tile textures into the landscape canvases.
//!
//! Tile textures pack several maps into one RGBA image: red holds the height,
//! blue and alpha hold the two stored normal components. The canvases
//! unpack them into a heightmap and a normal map.

use image::{GrayImage, ImageBuffer, Luma, Rgba, RgbaImage};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompositeError {
    #[error(
        "tile {tile} ({width}x{height} at {x},{y}) does not fit a {canvas_width}x{canvas_height} canvas"
    )]
    Overrun {
        tile: String,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },
}

/// Tally of one compositing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeStats {
    pub painted: usize,
    /// Tiles whose texture could not be loaded.
    pub missing: usize,
    /// Tiles that did not fit the canvas.
    pub overrun: usize,
}

impl CompositeStats {
    pub fn is_complete(&self) -> bool {
        self.missing == 0 && self.overrun == 0
    }
}

/// Height channel of a tile texel.
pub fn height_value(texel: &Rgba<u8>) -> u8 {
    texel[0]
}

/// Normal-map texel: blue and alpha carry the stored components, the
/// remaining channels are saturated.
pub fn normal_texel(texel: &Rgba<u8>) -> Rgba<u8> {
    Rgba([texel[2], texel[3], 255, 255])
}

/// Heightmap and normal map being assembled for one landscape.
pub struct Canvas {
    heightmap: GrayImage,
    normalmap: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            heightmap: ImageBuffer::new(width, height),
            normalmap: ImageBuffer::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.heightmap.width()
    }

    pub fn height(&self) -> u32 {
        self.heightmap.height()
    }

    /// Paint one tile with its top-left corner at `(x, y)`.
    ///
    /// Nothing is painted when the tile would overrun the canvas.
    pub fn paste(&mut self, tile: &str, x: i64, y: i64, texels: &RgbaImage) -> Result<(), CompositeError> {
        let fits = x >= 0
            && y >= 0
            && x + texels.width() as i64 <= self.width() as i64
            && y + texels.height() as i64 <= self.height() as i64;
        if !fits {
            return Err(CompositeError::Overrun {
                tile: tile.to_string(),
                x,
                y,
                width: texels.width(),
                height: texels.height(),
                canvas_width: self.width(),
                canvas_height: self.height(),
            });
        }

        let (x, y) = (x as u32, y as u32);
        for (tx, ty, texel) in texels.enumerate_pixels() {
            self.heightmap.put_pixel(x + tx, y + ty, Luma([height_value(texel)]));
            self.normalmap.put_pixel(x + tx, y + ty, normal_texel(texel));
        }
        Ok(())
    }

    /// Final RGBA heightmap and normal map.
    ///
    /// The heightmap's alpha is copied from the normal map so regions no tile
    /// covered stay transparent.
    pub fn finish(self) -> (RgbaImage, RgbaImage) {
        let Canvas { heightmap, normalmap } = self;
        let heightmap = ImageBuffer::from_fn(heightmap.width(), heightmap.height(), |x, y| {
            let h = heightmap.get_pixel(x, y)[0];
            let mask = normalmap.get_pixel(x, y)[3];
            Rgba([h, h, h, mask])
        });
        (heightmap, normalmap)
    }
}

//! Expand-to-fit rotation of finished landscape canvases.
//!
//! Positive angles turn the image counter-clockwise as displayed. The output
//! is grown so no corner is clipped, and the area outside the source is
//! transparent.

use image::{ImageBuffer, Rgba, RgbaImage};

/// Canvas size that holds a `width` x `height` image rotated by `degrees`.
pub fn expanded_size(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (w, h) = (width as f64, height as f64);
    let new_width = (h * sin.abs() + w * cos.abs()).round().max(1.0) as u32;
    let new_height = (h * cos.abs() + w * sin.abs()).round().max(1.0) as u32;
    (new_width, new_height)
}

/// Rotate `img` by `degrees` around its center with bilinear resampling.
pub fn rotate_expand(img: &RgbaImage, degrees: f64) -> RgbaImage {
    if degrees.rem_euclid(360.0) == 0.0 || img.width() == 0 || img.height() == 0 {
        return img.clone();
    }

    let (sin, cos) = degrees.to_radians().sin_cos();
    let (new_width, new_height) = expanded_size(img.width(), img.height(), degrees);

    let src_cx = img.width() as f64 / 2.0;
    let src_cy = img.height() as f64 / 2.0;
    let dst_cx = new_width as f64 / 2.0;
    let dst_cy = new_height as f64 / 2.0;

    // Inverse mapping: for each output pixel center, find where it came from.
    // The forward linear part is [[cos, sin], [-sin, cos]]; its inverse is the
    // transpose.
    ImageBuffer::from_fn(new_width, new_height, |x, y| {
        let dx = x as f64 + 0.5 - dst_cx;
        let dy = y as f64 + 0.5 - dst_cy;
        let sx = cos * dx - sin * dy + src_cx - 0.5;
        let sy = sin * dx + cos * dy + src_cy - 0.5;
        sample_bilinear(img, sx, sy)
    })
}

/// Bilinear sample at a fractional pixel index. Outside texels are zero.
fn sample_bilinear(img: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (width, height) = (img.width() as i64, img.height() as i64);
    if x <= -1.0 || y <= -1.0 || x >= width as f64 || y >= height as f64 {
        return Rgba([0, 0, 0, 0]);
    }

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let texel = |px: i64, py: i64| -> [f64; 4] {
        if px < 0 || py < 0 || px >= width || py >= height {
            return [0.0; 4];
        }
        let p = img.get_pixel(px as u32, py as u32);
        [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
    };

    let v00 = texel(x0, y0);
    let v10 = texel(x0 + 1, y0);
    let v01 = texel(x0, y0 + 1);
    let v11 = texel(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let v0 = v00[c] * (1.0 - fx) + v10[c] * fx;
        let v1 = v01[c] * (1.0 - fx) + v11[c] * fx;
        out[c] = (v0 * (1.0 - fy) + v1 * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

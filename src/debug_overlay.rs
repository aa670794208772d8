//! Annotated tile layout image for checking placements by eye.
//!
//! Every painted tile gets an outline, a dot on its origin and its number.
//! Superseded duplicates are outlined in grey.

use image::{ImageBuffer, Rgb, RgbImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::geometry::Size;

/// Extra room right and below the canvas so labels of edge tiles stay visible.
pub const OVERLAY_MARGIN: u32 = 500;

const FRAME_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const SUPERSEDED_COLOR: Rgb<u8> = Rgb([110, 110, 110]);
const LABEL_SCALE: i64 = 2;

/// 5x7 digit glyphs
const DIGITS_5X7: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

/// Stable bright color for a tile number.
pub fn tile_color(number: u64) -> Rgb<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(number);
    Rgb([
        rng.gen_range(150..=255),
        rng.gen_range(150..=255),
        rng.gen_range(150..=255),
    ])
}

pub struct DebugOverlay {
    img: RgbImage,
}

impl DebugOverlay {
    /// Blank overlay for a `width` x `height` canvas, with the canvas framed.
    pub fn new(width: u32, height: u32) -> Self {
        let mut img: RgbImage =
            ImageBuffer::new(width + OVERLAY_MARGIN, height + OVERLAY_MARGIN);
        draw_rect(&mut img, 0, 0, width as i64, height as i64, 3, FRAME_COLOR);
        Self { img }
    }

    pub fn mark_tile(&mut self, number: u64, x: i64, y: i64, size: Size) {
        let color = tile_color(number);
        let (w, h) = (size.width as i64, size.height as i64);
        draw_rect(&mut self.img, x, y, x + w, y + h, 3, color);
        draw_dot(&mut self.img, x, y, 4, color);
        draw_number(&mut self.img, x + w / 4, y + h / 2, number, color);
    }

    pub fn mark_superseded(&mut self, x: i64, y: i64, size: Size) {
        let (w, h) = (size.width as i64, size.height as i64);
        draw_rect(&mut self.img, x, y, x + w, y + h, 1, SUPERSEDED_COLOR);
    }

    pub fn into_image(self) -> RgbImage {
        self.img
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Outline from `(x0, y0)` to `(x1, y1)`, growing inward by `thickness`.
fn draw_rect(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, thickness: i64, color: Rgb<u8>) {
    for t in 0..thickness {
        for x in x0..=x1 {
            put(img, x, y0 + t, color);
            put(img, x, y1 - t, color);
        }
        for y in y0..=y1 {
            put(img, x0 + t, y, color);
            put(img, x1 - t, y, color);
        }
    }
}

fn draw_dot(img: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn draw_digit(img: &mut RgbImage, x: i64, y: i64, digit: usize, color: Rgb<u8>) {
    for (row, bits) in DIGITS_5X7[digit].iter().enumerate() {
        for col in 0..5 {
            if bits & (0b10000 >> col) == 0 {
                continue;
            }
            for sy in 0..LABEL_SCALE {
                for sx in 0..LABEL_SCALE {
                    put(
                        img,
                        x + col as i64 * LABEL_SCALE + sx,
                        y + row as i64 * LABEL_SCALE + sy,
                        color,
                    );
                }
            }
        }
    }
}

fn draw_number(img: &mut RgbImage, x: i64, y: i64, number: u64, color: Rgb<u8>) {
    let mut cx = x;
    for ch in number.to_string().chars() {
        if let Some(digit) = ch.to_digit(10) {
            draw_digit(img, cx, y, digit as usize, color);
        }
        cx += 6 * LABEL_SCALE; // 5 pixels + 1 spacing
    }
}

//! Per-pixel colour transforms: grayscale and negative.

use crate::types::{Grid, Pixel};

const MAX_CHANNEL: f32 = 255.0;

// BT.601 luma weights.
const RED_WEIGHT: f32 = 0.299;
const GREEN_WEIGHT: f32 = 0.587;
const BLUE_WEIGHT: f32 = 0.114;

/// Luma of a pixel as an 8-bit value.
pub fn luma(pixel: Pixel) -> u8 {
    let red = pixel.red as f32 / MAX_CHANNEL;
    let green = pixel.green as f32 / MAX_CHANNEL;
    let blue = pixel.blue as f32 / MAX_CHANNEL;
    let gray = RED_WEIGHT * red + GREEN_WEIGHT * green + BLUE_WEIGHT * blue;
    (gray.clamp(0.0, 1.0) * MAX_CHANNEL).round() as u8
}

/// Replace every pixel with its luma on all three channels.
pub fn grayscale(input: &Grid) -> Grid {
    input.map_pixels(|p| Pixel::gray(luma(p)))
}

/// Invert every channel.
pub fn negative(input: &Grid) -> Grid {
    input.map_pixels(|p| Pixel::rgb(255 - p.red, 255 - p.green, 255 - p.blue))
}

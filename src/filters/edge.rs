//! Fixed-kernel filters: sharpen and Laplacian edge detection.

use super::color::grayscale;
use super::convolution::{Kernel, convolve};
use crate::types::{Grid, Pixel};

pub const SHARPEN_KERNEL: [[f32; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];

pub const EDGE_KERNEL: [[f32; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 0.0]];

pub fn sharpen(input: &Grid) -> Grid {
    convolve(input, &Kernel::from_array(&SHARPEN_KERNEL))
}

/// Binary edge map: white where the Laplacian response of the grayscale
/// image, scaled to `[0, 1]`, exceeds `threshold`; black elsewhere.
pub fn edge_detection(input: &Grid, threshold: f32) -> Grid {
    let response = convolve(&grayscale(input), &Kernel::from_array(&EDGE_KERNEL));
    // All channels are equal after grayscale, red stands for the pixel.
    response.map_pixels(|p| {
        if p.red as f32 / 255.0 > threshold {
            Pixel::WHITE
        } else {
            Pixel::BLACK
        }
    })
}

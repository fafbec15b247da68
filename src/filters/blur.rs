//! Separable Gaussian blur.
//!
//! The 1D kernel is applied as a horizontal (`1 × n`) pass followed by a
//! vertical (`n × 1`) pass, both through the shared [`convolve`]. The
//! intermediate result is rounded to 8 bits between passes, so this is not
//! bit-identical to a single 2D pass; the order is part of the contract.

use super::convolution::{Kernel, convolve};
use crate::types::Grid;
use std::f32::consts::PI;

/// Normalized Gaussian weights for offsets `-radius..=radius`, where
/// `radius = ceil(3 * sigma)`.
///
/// A non-positive sigma yields the identity kernel `[1.0]`.
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (3.0 * sigma).ceil() as i32;
    let two_sigma_squared = 2.0 * sigma * sigma;
    let norm = (2.0 * PI).sqrt() * sigma;

    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / two_sigma_squared).exp() / norm)
        .collect();

    let sum: f32 = kernel.iter().sum();
    for weight in kernel.iter_mut() {
        *weight /= sum;
    }
    kernel
}

pub fn gaussian_blur(input: &Grid, sigma: f32) -> Grid {
    let weights = gaussian_kernel_1d(sigma);
    let horizontal = convolve(input, &Kernel::horizontal(&weights));
    convolve(&horizontal, &Kernel::vertical(&weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient_grid;
    use crate::types::Pixel;

    #[test]
    fn kernel_size_follows_three_sigma() {
        assert_eq!(gaussian_kernel_1d(1.0).len(), 7);
        assert_eq!(gaussian_kernel_1d(0.5).len(), 5);
        assert_eq!(gaussian_kernel_1d(1.1).len(), 9);
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel_1d(2.0);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for (a, b) in kernel.iter().zip(kernel.iter().rev()) {
            assert!((a - b).abs() < 1e-7);
        }
        let peak = kernel.len() / 2;
        assert!(kernel.iter().all(|&w| w <= kernel[peak]));
    }

    #[test]
    fn tiny_sigma_concentrates_weight_at_centre() {
        let kernel = gaussian_kernel_1d(0.0001);
        assert_eq!(kernel.len(), 3);
        assert_eq!(kernel[1], 1.0);
        assert_eq!(kernel[0], 0.0);
    }

    #[test]
    fn tiny_sigma_blur_is_identity() {
        let grid = gradient_grid(12, 9);
        assert_eq!(gaussian_blur(&grid, 0.0001), grid);
    }

    #[test]
    fn non_positive_sigma_is_identity_kernel() {
        assert_eq!(gaussian_kernel_1d(0.0), vec![1.0]);
        assert_eq!(gaussian_kernel_1d(-3.0), vec![1.0]);
    }

    #[test]
    fn blur_keeps_uniform_image() {
        let grid = Grid::filled(6, 4, Pixel::rgb(90, 120, 200));
        assert_eq!(gaussian_blur(&grid, 1.5), grid);
    }

    #[test]
    fn horizontal_pass_runs_before_vertical() {
        // Irregular content so rounding between passes shows up.
        let grid = Grid::from_fn(16, 12, |x, y| {
            Pixel::rgb(
                ((x * 37 + y * 91 + x * y * 13) % 256) as u8,
                ((x * x * 17 + y * 53) % 256) as u8,
                ((y * y * 29 + x * 71 + 5) % 256) as u8,
            )
        });
        let weights = gaussian_kernel_1d(1.3);
        let horizontal_first = convolve(
            &convolve(&grid, &Kernel::horizontal(&weights)),
            &Kernel::vertical(&weights),
        );
        let vertical_first = convolve(
            &convolve(&grid, &Kernel::vertical(&weights)),
            &Kernel::horizontal(&weights),
        );
        assert_ne!(horizontal_first, vertical_first);
        assert_eq!(gaussian_blur(&grid, 1.3), horizontal_first);
    }

    #[test]
    fn blur_spreads_a_bright_spot() {
        let grid = Grid::from_fn(9, 9, |x, y| {
            if (x, y) == (4, 4) {
                Pixel::WHITE
            } else {
                Pixel::BLACK
            }
        });
        let out = gaussian_blur(&grid, 1.0);
        assert!(out.get(4, 4).red < 255);
        assert!(out.get(5, 4).red > 0);
        assert!(out.get(4, 5).red > 0);
        assert_eq!(out.get(0, 0), Pixel::BLACK);
    }
}

//! Generic 2D convolution with edge-clamped sampling.
//!
//! Sharpen, edge detection and both passes of the Gaussian blur go through
//! [`convolve`], so its centring, clamping and rounding rules hold for all of
//! them:
//!
//! - the kernel centre is `(height / 2, width / 2)` with floor division, which
//!   fixes the tie-break for even-sized kernels;
//! - neighbours outside the grid are clamped to the nearest edge row/column;
//! - each channel sum is clamped to `[0, 255]` and rounded half away from zero.

use crate::types::{Grid, Pixel};

/// A rectangular matrix of `f32` weights, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build from explicit rows. Returns `None` if the rows are ragged.
    pub fn from_rows(rows: &[Vec<f32>]) -> Option<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height: rows.len(),
            weights: rows.concat(),
        })
    }

    /// Build from a fixed-size matrix constant.
    pub fn from_array<const W: usize, const H: usize>(rows: &[[f32; W]; H]) -> Self {
        Self {
            width: W,
            height: H,
            weights: rows.iter().flatten().copied().collect(),
        }
    }

    /// A `1 × n` kernel (horizontal pass).
    pub fn horizontal(weights: &[f32]) -> Self {
        Self {
            width: weights.len(),
            height: 1,
            weights: weights.to_vec(),
        }
    }

    /// An `n × 1` kernel (vertical pass).
    pub fn vertical(weights: &[f32]) -> Self {
        Self {
            width: 1,
            height: weights.len(),
            weights: weights.to_vec(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn row(&self, z: usize) -> &[f32] {
        &self.weights[z * self.width..(z + 1) * self.width]
    }
}

/// Convert an accumulated channel sum to an 8-bit value.
pub(crate) fn to_channel(sum: f32) -> u8 {
    sum.clamp(0.0, 255.0).round() as u8
}

/// Convolve `input` with `kernel`, returning a new grid of the same size.
///
/// Per pixel, kernel rows are summed outer and kernel columns inner. That
/// order is fixed so results do not depend on how rows are scheduled.
pub fn convolve(input: &Grid, kernel: &Kernel) -> Grid {
    if input.is_empty() {
        return input.clone();
    }
    let max_x = input.width() as isize - 1;
    let max_y = input.height() as isize - 1;
    let center_x = (kernel.width() / 2) as isize;
    let center_y = (kernel.height() / 2) as isize;

    Grid::from_fn(input.width(), input.height(), |x, y| {
        let (mut red, mut green, mut blue) = (0.0f32, 0.0f32, 0.0f32);
        for z in 0..kernel.height() {
            let yy = (y as isize + z as isize - center_y).clamp(0, max_y) as usize;
            let source_row = input.row(yy);
            for (w, &weight) in kernel.row(z).iter().enumerate() {
                let xx = (x as isize + w as isize - center_x).clamp(0, max_x) as usize;
                let pixel = source_row[xx];
                red += pixel.red as f32 * weight;
                green += pixel.green as f32 * weight;
                blue += pixel.blue as f32 * weight;
            }
        }
        Pixel::rgb(to_channel(red), to_channel(green), to_channel(blue))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient_grid;

    #[test]
    fn identity_kernel_is_noop() {
        let grid = gradient_grid(6, 5);
        let identity = Kernel::from_array(&[[1.0]]);
        assert_eq!(convolve(&grid, &identity), grid);
    }

    #[test]
    fn from_rows_rejects_ragged() {
        assert!(Kernel::from_rows(&[vec![1.0, 2.0], vec![1.0]]).is_none());
        let k = Kernel::from_rows(&[vec![1.0, 2.0, 3.0]]).unwrap();
        assert_eq!((k.width(), k.height()), (3, 1));
    }

    #[test]
    fn edges_are_clamped_not_zero_padded() {
        // A 3x3 box of ones over a uniform image keeps the value everywhere,
        // including corners, only if out-of-bounds samples repeat the edge.
        let grid = Grid::filled(3, 3, Pixel::gray(20));
        let ones = Kernel::from_array(&[[1.0 / 9.0; 3]; 3]);
        assert_eq!(convolve(&grid, &ones), grid);
    }

    #[test]
    fn results_are_clamped_to_byte_range() {
        let grid = Grid::filled(2, 2, Pixel::gray(200));
        let double = Kernel::from_array(&[[2.0]]);
        let negate = Kernel::from_array(&[[-1.0]]);
        assert_eq!(convolve(&grid, &double), Grid::filled(2, 2, Pixel::WHITE));
        assert_eq!(convolve(&grid, &negate), Grid::filled(2, 2, Pixel::BLACK));
    }

    #[test]
    fn results_round_half_away_from_zero() {
        let grid = Grid::filled(1, 1, Pixel::rgb(1, 3, 5));
        let half = Kernel::from_array(&[[0.5]]);
        assert_eq!(convolve(&grid, &half).get(0, 0), Pixel::rgb(1, 2, 3));
    }

    #[test]
    fn even_kernel_centre_uses_floor_division() {
        // Width-2 kernel has centre column 1, so [1, 0] samples the left
        // neighbour (x - 1), clamped at the left edge.
        let grid = Grid::from_fn(3, 1, |x, _| Pixel::gray(10 * (x as u8 + 1)));
        let left = Kernel::from_array(&[[1.0, 0.0]]);
        let out = convolve(&grid, &left);
        let values: Vec<u8> = out.row(0).iter().map(|p| p.red).collect();
        assert_eq!(values, vec![10, 10, 20]);
    }

    #[test]
    fn vertical_kernel_samples_rows() {
        let grid = Grid::from_fn(1, 3, |_, y| Pixel::gray(10 * (y as u8 + 1)));
        let below = Kernel::vertical(&[0.0, 0.0, 1.0]);
        let out = convolve(&grid, &below);
        let values: Vec<u8> = out.rows().map(|row| row[0].red).collect();
        assert_eq!(values, vec![20, 30, 30]);
    }

    #[test]
    fn channels_are_independent() {
        let grid = Grid::filled(2, 2, Pixel::rgb(10, 100, 250));
        let boost = Kernel::from_array(&[[1.1]]);
        assert_eq!(convolve(&grid, &boost).get(1, 1), Pixel::rgb(11, 110, 255));
    }

    #[test]
    fn empty_grid_passes_through() {
        let kernel = Kernel::from_array(&[[0.0, -1.0, 0.0]]);
        assert_eq!(convolve(&Grid::empty(), &kernel), Grid::empty());
    }
}

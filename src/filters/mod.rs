//! Pixel filters.
//!
//! Every filter is a pure `&Grid → Grid` transform; none mutate their input.
//! [`Filter`] is the closed set the pipeline dispatches over.
//!
//! | Filter | Token | Module |
//! |---|---|---|
//! | Crop | `-crop <w> <h>` | [`geometry`] |
//! | Grayscale | `-gs` | [`color`] |
//! | Negative | `-neg` | [`color`] |
//! | Sharpen | `-sharp` | [`edge`] (3×3 convolution) |
//! | Edge detection | `-edge <threshold>` | [`edge`] (grayscale + Laplacian) |
//! | Gaussian blur | `-blur <sigma>` | [`blur`] (two separable passes) |
//! | Drop | `-drop <strength> [cx cy]` | [`geometry`] (radial warp) |
//!
//! Sharpen, edge detection and blur all use [`convolution::convolve`].
//! Pixel loops run one rayon task per output row; each output pixel is
//! computed from the input alone, so results match a serial run exactly.

pub mod blur;
pub mod color;
pub mod convolution;
pub mod edge;
pub mod geometry;

use crate::types::Grid;
use std::fmt;

pub use convolution::{Kernel, convolve};

/// A filter with validated parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    Crop {
        width: usize,
        height: usize,
    },
    Grayscale,
    Negative,
    Sharpen,
    EdgeDetection {
        threshold: f32,
    },
    GaussianBlur {
        sigma: f32,
    },
    /// `None` centre coordinates default to the grid's centre on that axis.
    Drop {
        strength: f32,
        center_x: Option<f32>,
        center_y: Option<f32>,
    },
}

impl Filter {
    /// Apply to `input`, returning a newly allocated grid.
    pub fn apply(&self, input: &Grid) -> Grid {
        match *self {
            Filter::Crop { width, height } => geometry::crop(input, width, height),
            Filter::Grayscale => color::grayscale(input),
            Filter::Negative => color::negative(input),
            Filter::Sharpen => edge::sharpen(input),
            Filter::EdgeDetection { threshold } => edge::edge_detection(input, threshold),
            Filter::GaussianBlur { sigma } => blur::gaussian_blur(input, sigma),
            Filter::Drop {
                strength,
                center_x,
                center_y,
            } => geometry::drop_effect(input, strength, center_x, center_y),
        }
    }

    /// Short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Crop { .. } => "crop",
            Filter::Grayscale => "grayscale",
            Filter::Negative => "negative",
            Filter::Sharpen => "sharpen",
            Filter::EdgeDetection { .. } => "edge",
            Filter::GaussianBlur { .. } => "blur",
            Filter::Drop { .. } => "drop",
        }
    }

    /// True for filters that can change the grid's dimensions.
    pub fn changes_dimensions(&self) -> bool {
        matches!(self, Filter::Crop { .. })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Crop { width, height } => write!(f, "crop {width}x{height}"),
            Filter::EdgeDetection { threshold } => write!(f, "edge threshold={threshold}"),
            Filter::GaussianBlur { sigma } => write!(f, "blur sigma={sigma}"),
            Filter::Drop {
                strength,
                center_x,
                center_y,
            } => {
                write!(f, "drop strength={strength}")?;
                match (center_x, center_y) {
                    (None, None) => Ok(()),
                    (cx, cy) => write!(f, " center=({}, {})", axis(*cx), axis(*cy)),
                }
            }
            other => f.write_str(other.name()),
        }
    }
}

fn axis(value: Option<f32>) -> String {
    value.map_or_else(|| "auto".to_string(), |v| v.to_string())
}

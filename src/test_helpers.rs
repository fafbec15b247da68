//! Shared builders for unit tests.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let bitmap = Bitmap::from_grid(gradient_grid(4, 3)).unwrap();
//! let path = write_bitmap(tmp.path(), "in.bmp", &bitmap);
//! ```

use std::path::{Path, PathBuf};

use crate::bmp::Bitmap;
use crate::types::{Grid, Pixel};

/// A grid where every pixel differs from its neighbours on each channel,
/// so misplaced or flipped rows show up in comparisons.
pub fn gradient_grid(width: usize, height: usize) -> Grid {
    Grid::from_fn(width, height, |x, y| {
        Pixel::rgb(
            ((x * 7) % 256) as u8,
            ((y * 11) % 256) as u8,
            ((x * y) % 256) as u8,
        )
    })
}

pub fn solid_grid(width: usize, height: usize, pixel: Pixel) -> Grid {
    Grid::filled(width, height, pixel)
}

/// Encode `bitmap` to `dir/name` and return the path. Panics on failure.
pub fn write_bitmap(dir: &Path, name: &str, bitmap: &Bitmap) -> PathBuf {
    let path = dir.join(name);
    bitmap
        .save(&path)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    path
}

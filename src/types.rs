//! Shared pixel types used by the codec, the filters and the pipeline.
//!
//! The [`Grid`] is always top-to-bottom in memory. Whether the file stores
//! rows bottom-up is a codec concern handled in [`crate::bmp`]; nothing past
//! decode ever sees on-disk row order.

use rayon::prelude::*;

/// One 24-bit pixel, fields in wire order (blue, green, red).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Pixel {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::rgb(0, 0, 0);
    pub const WHITE: Pixel = Pixel::rgb(255, 255, 255);

    /// Build a pixel from channels in the usual r, g, b reading order.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { blue, green, red }
    }

    /// All three channels set to `value`.
    pub const fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// Decode from the 3-byte BGR wire layout.
    pub const fn from_bgr([blue, green, red]: [u8; 3]) -> Self {
        Self { blue, green, red }
    }

    /// Encode to the 3-byte BGR wire layout.
    pub const fn to_bgr(self) -> [u8; 3] {
        [self.blue, self.green, self.red]
    }
}

/// Row-major, top-to-bottom pixel grid.
///
/// Every row has exactly `width` pixels and there are exactly `height`
/// rows. A grid may have zero rows (or zero columns) after a crop to zero or
/// when a filter short-circuits on empty input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Grid {
    /// A `width × height` grid filled with `fill`.
    pub fn filled(width: usize, height: usize, fill: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    /// A grid with no rows and no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a grid from explicit rows. Returns `None` if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<Pixel>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a grid by evaluating `f(x, y)` for every position, one rayon
    /// task per row. Each pixel is computed independently, so the result is
    /// identical to a serial evaluation.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> Pixel + Sync,
    {
        let mut pixels = vec![Pixel::BLACK; width * height];
        if width > 0 {
            pixels
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, pixel) in row.iter_mut().enumerate() {
                        *pixel = f(x, y);
                    }
                });
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True when the grid holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at column `x`, row `y`. Panics when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Pixel {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y * self.width + x]
    }

    /// Row `y`, left to right.
    pub fn row(&self, y: usize) -> &[Pixel] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// Rows top to bottom. Yields `height` rows even when `width` is zero.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Pixel]> + ExactSizeIterator {
        (0..self.height).map(move |y| self.row(y))
    }

    /// Apply `f` to every pixel independently.
    pub fn map_pixels<F>(&self, f: F) -> Self
    where
        F: Fn(Pixel) -> Pixel + Sync,
    {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.par_iter().map(|&p| f(p)).collect(),
        }
    }

    /// Copy of the top-left `width × height` region. Both sizes must fit.
    pub(crate) fn sub_grid(&self, width: usize, height: usize) -> Self {
        debug_assert!(width <= self.width && height <= self.height);
        let mut pixels = Vec::with_capacity(width * height);
        for row in self.rows().take(height) {
            pixels.extend_from_slice(&row[..width]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// An empty grid of known width, filled row by row with [`Grid::push_row`].
    pub(crate) fn with_width(width: usize) -> Self {
        Self {
            width,
            height: 0,
            pixels: Vec::new(),
        }
    }

    /// Append one full row at the bottom.
    pub(crate) fn push_row(&mut self, row: impl IntoIterator<Item = Pixel>) {
        let before = self.pixels.len();
        self.pixels.extend(row);
        debug_assert_eq!(self.pixels.len() - before, self.width);
        self.height += 1;
    }

    /// Reverse the row order in place.
    pub(crate) fn flip_vertical(&mut self) {
        if self.width == 0 {
            return;
        }
        let (width, height) = (self.width, self.height);
        for y in 0..height / 2 {
            let (top, bottom) = self.pixels.split_at_mut((height - 1 - y) * width);
            top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
        }
    }
}

//! Decode and encode 24-bit BMP files to and from a [`Bitmap`].
//!
//! ## Row order
//!
//! A positive info-header height means the file stores the bottom row first.
//! Decode flips such files so `grid.row(0)` is always the top of the image,
//! and encode writes the rows back in reverse. Files with a negative height
//! are already top-down and are read and written in order.
//!
//! ## Header values are written verbatim
//!
//! Encode never recomputes `file_size`, `image_size` or the dimensions. A
//! caller that changes the grid's shape must update the info header first;
//! [`Bitmap::reconcile_sizes`] is available for callers that also want the
//! size fields refreshed. Encoding a grid whose shape disagrees with the
//! stored width/height is refused rather than producing a corrupt file.

use super::header::{FileHeader, InfoHeader, row_padding, row_size, row_stride};
use super::validate::{FormatError, validate};
use crate::types::{Grid, Pixel};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BmpError {
    #[error("Cannot open file {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("Cannot write to file {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(
        "Grid is {grid_width}x{grid_height} but the info header declares {header_width}x{header_height}"
    )]
    DimensionMismatch {
        grid_width: usize,
        grid_height: usize,
        header_width: i32,
        header_height: i32,
    },
    #[error("Image of {width}x{height} pixels does not fit in a BMP header")]
    TooLarge { width: usize, height: usize },
}

/// A decoded image: both headers plus the top-down pixel grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub file_header: FileHeader,
    pub info_header: InfoHeader,
    pub grid: Grid,
}

impl Bitmap {
    /// Wrap a grid in fresh, self-consistent 24-bit headers (bottom-up rows).
    pub fn from_grid(grid: Grid) -> Result<Self, BmpError> {
        let too_large = || BmpError::TooLarge {
            width: grid.width(),
            height: grid.height(),
        };
        let width = i32::try_from(grid.width()).map_err(|_| too_large())?;
        let height = i32::try_from(grid.height()).map_err(|_| too_large())?;
        let mut bitmap = Self {
            file_header: FileHeader::default(),
            info_header: InfoHeader {
                width,
                height,
                ..InfoHeader::default()
            },
            grid,
        };
        bitmap.reconcile_sizes()?;
        Ok(bitmap)
    }

    /// Decode the file at `path`.
    pub fn open(path: &Path) -> Result<Self, BmpError> {
        let file = File::open(path).map_err(|source| BmpError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read_from(&mut BufReader::new(file))
    }

    /// Decode from any byte source positioned at the start of the file.
    pub fn read_from(reader: &mut impl Read) -> Result<Self, BmpError> {
        let file_header = FileHeader::read_from(reader)?;
        let info_header = InfoHeader::read_from(reader)?;
        validate(&file_header, &info_header)?;
        if info_header.width < 0 {
            return Err(FormatError::InvalidWidth(info_header.width).into());
        }

        let width = info_header.width as usize;
        let height = info_header.row_count();
        if pixel_data_len(width, height).is_none() {
            return Err(BmpError::TooLarge { width, height });
        }

        // Buffers grow with the bytes actually read, never with the header's claim.
        let row_len = row_size(width) as u64;
        let padding = row_padding(width) as u64;
        let mut row_bytes = Vec::new();
        let mut grid = Grid::with_width(width);

        for _ in 0..height {
            row_bytes.clear();
            reader.by_ref().take(row_len).read_to_end(&mut row_bytes)?;
            if row_bytes.len() as u64 != row_len {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
            io::copy(&mut reader.by_ref().take(padding), &mut io::sink())?;
            grid.push_row(
                row_bytes
                    .chunks_exact(3)
                    .map(|bgr| Pixel::from_bgr([bgr[0], bgr[1], bgr[2]])),
            );
        }

        if info_header.is_bottom_up() {
            grid.flip_vertical();
        }

        Ok(Self {
            file_header,
            info_header,
            grid,
        })
    }

    /// Encode to a new file at `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), BmpError> {
        let file = File::create(path).map_err(|source| BmpError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Encode headers verbatim followed by the padded pixel rows.
    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), BmpError> {
        self.check_dimensions()?;
        self.file_header.write_to(writer)?;
        self.info_header.write_to(writer)?;

        let width = self.grid.width();
        let mut row_bytes = Vec::with_capacity(row_stride(width));
        let mut write_row = |row: &[Pixel]| -> io::Result<()> {
            row_bytes.clear();
            row_bytes.extend(row.iter().flat_map(|p| p.to_bgr()));
            row_bytes.resize(row_stride(width), 0);
            writer.write_all(&row_bytes)
        };

        if self.info_header.is_bottom_up() {
            self.grid.rows().rev().try_for_each(&mut write_row)?;
        } else {
            self.grid.rows().try_for_each(&mut write_row)?;
        }
        Ok(())
    }

    /// Recompute `image_size` and `file_size` from the stored dimensions.
    pub fn reconcile_sizes(&mut self) -> Result<(), BmpError> {
        let width = self.info_header.width.max(0) as usize;
        let height = self.info_header.row_count();
        let too_large = BmpError::TooLarge { width, height };
        let image_size = pixel_data_len(width, height).ok_or(too_large)?;
        let file_size = image_size
            .checked_add(self.file_header.offset)
            .ok_or(BmpError::TooLarge { width, height })?;
        self.info_header.image_size = image_size;
        self.file_header.file_size = file_size;
        Ok(())
    }

    fn check_dimensions(&self) -> Result<(), BmpError> {
        let header_width = self.info_header.width;
        let header_height = self.info_header.height;
        let matches = header_width >= 0
            && header_width as usize == self.grid.width()
            && self.info_header.row_count() == self.grid.height();
        if matches {
            Ok(())
        } else {
            Err(BmpError::DimensionMismatch {
                grid_width: self.grid.width(),
                grid_height: self.grid.height(),
                header_width,
                header_height,
            })
        }
    }
}

/// Padded pixel bytes for `width × height`, or `None` when that cannot be
/// described by the 32-bit size fields of a BMP header.
fn pixel_data_len(width: usize, height: usize) -> Option<u32> {
    width
        .checked_mul(3)
        .and_then(|size| size.checked_next_multiple_of(4))
        .and_then(|stride| stride.checked_mul(height))
        .and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmp::header::{FILE_HEADER_LEN, INFO_HEADER_LEN};
    use crate::test_helpers::{gradient_grid, solid_grid};

    fn encode(bitmap: &Bitmap) -> Vec<u8> {
        let mut bytes = Vec::new();
        bitmap.write_to(&mut bytes).unwrap();
        bytes
    }

    fn decode(bytes: &[u8]) -> Result<Bitmap, BmpError> {
        Bitmap::read_from(&mut &bytes[..])
    }

    #[test]
    fn from_grid_sets_consistent_sizes() {
        let bitmap = Bitmap::from_grid(solid_grid(3, 2, Pixel::WHITE)).unwrap();
        // 3 px * 3 bytes = 9, padded to 12; two rows.
        assert_eq!(bitmap.info_header.image_size, 24);
        assert_eq!(bitmap.file_header.file_size, 54 + 24);
        assert_eq!(bitmap.info_header.width, 3);
        assert_eq!(bitmap.info_header.height, 2);
        assert_eq!(encode(&bitmap).len(), 78);
    }

    #[test]
    fn roundtrip_bottom_up() {
        let bitmap = Bitmap::from_grid(gradient_grid(5, 3)).unwrap();
        assert_eq!(decode(&encode(&bitmap)).unwrap(), bitmap);
    }

    #[test]
    fn roundtrip_top_down() {
        let mut bitmap = Bitmap::from_grid(gradient_grid(2, 4)).unwrap();
        bitmap.info_header.height = -4;
        assert_eq!(decode(&encode(&bitmap)).unwrap(), bitmap);
    }

    #[test]
    fn bottom_up_file_stores_last_row_first() {
        let grid = Grid::from_fn(1, 2, |_, y| Pixel::gray(if y == 0 { 10 } else { 200 }));
        let bytes = encode(&Bitmap::from_grid(grid).unwrap());
        let pixels = &bytes[FILE_HEADER_LEN + INFO_HEADER_LEN..];
        // Row stride for width 1 is 4 bytes; first stored row is the bottom one.
        assert_eq!(&pixels[0..4], &[200, 200, 200, 0]);
        assert_eq!(&pixels[4..8], &[10, 10, 10, 0]);
    }

    #[test]
    fn top_down_file_is_not_flipped() {
        let grid = Grid::from_fn(1, 2, |_, y| Pixel::gray(if y == 0 { 10 } else { 200 }));
        let mut bitmap = Bitmap::from_grid(grid).unwrap();
        bitmap.info_header.height = -2;
        let bytes = encode(&bitmap);
        let pixels = &bytes[FILE_HEADER_LEN + INFO_HEADER_LEN..];
        assert_eq!(&pixels[0..4], &[10, 10, 10, 0]);
    }

    #[test]
    fn pixel_bytes_are_bgr_with_zero_padding() {
        let grid = Grid::from_fn(1, 1, |_, _| Pixel::rgb(1, 2, 3));
        let bytes = encode(&Bitmap::from_grid(grid).unwrap());
        assert_eq!(&bytes[54..], &[3, 2, 1, 0]);
    }

    #[test]
    fn padding_bytes_are_skipped_on_decode() {
        let bitmap = Bitmap::from_grid(gradient_grid(3, 3)).unwrap();
        let mut bytes = encode(&bitmap);
        // Garbage in padding must not leak into pixels.
        for row in 0..3 {
            bytes[54 + row * 12 + 9..54 + row * 12 + 12].fill(0xAB);
        }
        assert_eq!(decode(&bytes).unwrap().grid, bitmap.grid);
    }

    #[test]
    fn encode_writes_headers_verbatim() {
        let mut bitmap = Bitmap::from_grid(solid_grid(2, 2, Pixel::BLACK)).unwrap();
        bitmap.file_header.file_size = 12345;
        bitmap.info_header.image_size = 7;
        let decoded = decode(&encode(&bitmap)).unwrap();
        assert_eq!(decoded.file_header.file_size, 12345);
        assert_eq!(decoded.info_header.image_size, 7);
    }

    #[test]
    fn encode_refuses_mismatched_grid() {
        let mut bitmap = Bitmap::from_grid(solid_grid(4, 4, Pixel::BLACK)).unwrap();
        bitmap.grid = solid_grid(2, 2, Pixel::BLACK);
        let err = bitmap.write_to(&mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            BmpError::DimensionMismatch {
                grid_width: 2,
                header_width: 4,
                ..
            }
        ));
    }

    #[test]
    fn decode_rejects_bad_magic_before_reading_pixels() {
        let mut bytes = encode(&Bitmap::from_grid(solid_grid(2, 2, Pixel::WHITE)).unwrap());
        bytes[0] = b'X';
        bytes[1] = b'X';
        bytes.truncate(54);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            BmpError::Format(FormatError::InvalidType { .. })
        ));
    }

    #[test]
    fn decode_rejects_negative_width() {
        let mut bitmap = Bitmap::from_grid(Grid::empty()).unwrap();
        bitmap.info_header.width = -2;
        let mut bytes = Vec::new();
        bitmap.file_header.write_to(&mut bytes).unwrap();
        bitmap.info_header.write_to(&mut bytes).unwrap();
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            BmpError::Format(FormatError::InvalidWidth(-2))
        ));
    }

    #[test]
    fn truncated_pixel_data_is_io_error() {
        let bytes = encode(&Bitmap::from_grid(solid_grid(4, 4, Pixel::WHITE)).unwrap());
        assert!(matches!(decode(&bytes[..60]).unwrap_err(), BmpError::Io(_)));
    }

    /// Valid headers declaring `width × height`, followed by `pixel_bytes` bytes.
    fn claimed_size(width: i32, height: i32, pixel_bytes: usize) -> Vec<u8> {
        let info_header = InfoHeader {
            width,
            height,
            ..InfoHeader::default()
        };
        let mut bytes = Vec::new();
        FileHeader::default().write_to(&mut bytes).unwrap();
        info_header.write_to(&mut bytes).unwrap();
        bytes.resize(bytes.len() + pixel_bytes, 0x7F);
        bytes
    }

    #[test]
    fn oversized_header_is_too_large() {
        let bytes = claimed_size(i32::MAX, i32::MAX, 16);
        assert!(matches!(decode(&bytes).unwrap_err(), BmpError::TooLarge { .. }));
        let bytes = claimed_size(1, i32::MIN + 1, 16);
        assert!(matches!(decode(&bytes).unwrap_err(), BmpError::TooLarge { .. }));
    }

    #[test]
    fn huge_claim_with_little_data_is_io_error() {
        // 300 MB of pixels declared, 16 bytes present.
        let bytes = claimed_size(100_000_000, 1, 16);
        match decode(&bytes).unwrap_err() {
            BmpError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn truncated_header_is_io_error() {
        assert!(matches!(decode(b"BM").unwrap_err(), BmpError::Io(_)));
    }

    #[test]
    fn missing_trailing_padding_is_tolerated() {
        let bitmap = Bitmap::from_grid(solid_grid(1, 1, Pixel::WHITE)).unwrap();
        let bytes = encode(&bitmap);
        assert_eq!(decode(&bytes[..bytes.len() - 1]).unwrap().grid, bitmap.grid);
    }

    #[test]
    fn reconcile_sizes_after_shrinking() {
        let mut bitmap = Bitmap::from_grid(solid_grid(4, 4, Pixel::WHITE)).unwrap();
        bitmap.info_header.width = 2;
        bitmap.info_header.height = 2;
        bitmap.reconcile_sizes().unwrap();
        assert_eq!(bitmap.info_header.image_size, 16);
        assert_eq!(bitmap.file_header.file_size, 70);
    }

    #[test]
    fn open_missing_file_reports_path() {
        let err = Bitmap::open(Path::new("/nonexistent/input.bmp")).unwrap_err();
        assert!(matches!(err, BmpError::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/input.bmp"));
    }

    #[test]
    fn save_and_open_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.bmp");
        let bitmap = Bitmap::from_grid(gradient_grid(7, 5)).unwrap();
        bitmap.save(&path).unwrap();
        assert_eq!(Bitmap::open(&path).unwrap(), bitmap);
    }
}

//! Header checks for the single supported BMP profile.
//!
//! Checks run in a fixed order and stop at the first violation, so a file
//! with several problems always reports the same one.

use super::header::{
    BITS_PER_PIXEL, FileHeader, INFO_HEADER_SIZE, InfoHeader, MAGIC, PIXEL_DATA_OFFSET,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid BMP type '{}'. Expected 'BM'.", String::from_utf8_lossy(.found))]
    InvalidType { found: [u8; 2] },
    #[error("Invalid reserved_first in file header: {0}. Expected 0.")]
    ReservedFirst(u16),
    #[error("Invalid reserved_second in file header: {0}. Expected 0.")]
    ReservedSecond(u16),
    #[error("Invalid pixel data offset in file header: {0}. Expected 54.")]
    InvalidOffset(u32),
    #[error("Invalid header_size in info header: {0}. Expected 40.")]
    InvalidHeaderSize(u32),
    #[error("Unsupported bits per pixel in info header: {0}. Expected 24.")]
    UnsupportedBitCount(u16),
    #[error("Invalid width in info header: {0}. Expected a non-negative value.")]
    InvalidWidth(i32),
}

/// Validate both headers against the 24-bit uncompressed profile.
pub fn validate(file: &FileHeader, info: &InfoHeader) -> Result<(), FormatError> {
    if file.magic != MAGIC {
        return Err(FormatError::InvalidType { found: file.magic });
    }
    if file.reserved_first != 0 {
        return Err(FormatError::ReservedFirst(file.reserved_first));
    }
    if file.reserved_second != 0 {
        return Err(FormatError::ReservedSecond(file.reserved_second));
    }
    if file.offset != PIXEL_DATA_OFFSET {
        return Err(FormatError::InvalidOffset(file.offset));
    }
    if info.header_size != INFO_HEADER_SIZE {
        return Err(FormatError::InvalidHeaderSize(info.header_size));
    }
    if info.bits_per_pixel != BITS_PER_PIXEL {
        return Err(FormatError::UnsupportedBitCount(info.bits_per_pixel));
    }
    Ok(())
}

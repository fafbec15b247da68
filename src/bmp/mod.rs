//! Uncompressed 24-bit BMP support.
//!
//! Exactly one profile is accepted: `BITMAPINFOHEADER` (40 bytes), 24 bits per
//! pixel, pixel data at offset 54. Anything else fails validation with a
//! [`FormatError`] naming the offending field.
//!
//! The module is split into:
//! - **Header**: [`FileHeader`] / [`InfoHeader`] and their byte-exact wire codec
//! - **Validate**: the ordered header checks
//! - **Codec**: [`Bitmap`] decode/encode, row padding and row order

mod codec;
pub mod header;
mod validate;

pub use codec::{Bitmap, BmpError};
pub use header::{FileHeader, InfoHeader};
pub use validate::{FormatError, validate};

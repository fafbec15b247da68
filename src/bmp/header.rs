//! Fixed-layout BMP headers and their little-endian wire encoding.
//!
//! Both headers are (de)serialized field by field. Nothing here depends on
//! in-memory struct layout, so the 14 + 40 byte wire format is exact on every
//! platform.
//!
//! ```text
//! offset  size  field
//! ------  ----  ------------------------------
//!      0     2  magic "BM"
//!      2     4  file size
//!      6     2  reserved (0)
//!      8     2  reserved (0)
//!     10     4  pixel data offset (54)
//!     14     4  info header size (40)
//!     18     4  width  (i32)
//!     22     4  height (i32, > 0 means bottom-up rows)
//!     26     2  planes (1)
//!     28     2  bits per pixel (24)
//!     30     4  compression (0)
//!     34     4  image data size
//!     38     4  x pixels per metre
//!     42     4  y pixels per metre
//!     46     4  colours used
//!     50     4  important colours
//! ```

use std::io::{self, Read, Write};

pub const FILE_HEADER_LEN: usize = 14;
pub const INFO_HEADER_LEN: usize = 40;
pub const MAGIC: [u8; 2] = *b"BM";
pub const PIXEL_DATA_OFFSET: u32 = 54;
pub const INFO_HEADER_SIZE: u32 = 40;
pub const BITS_PER_PIXEL: u16 = 24;
/// 300 DPI.
pub const PIXELS_PER_METER: i32 = 11811;

const BYTES_PER_PIXEL: usize = 3;
const ROW_ALIGNMENT: usize = 4;

/// Pixel bytes in one row, without padding.
pub fn row_size(width: usize) -> usize {
    width * BYTES_PER_PIXEL
}

/// Zero bytes appended to a row to reach the next 4-byte boundary.
pub fn row_padding(width: usize) -> usize {
    (ROW_ALIGNMENT - row_size(width) % ROW_ALIGNMENT) % ROW_ALIGNMENT
}

/// Bytes one row occupies on disk.
pub fn row_stride(width: usize) -> usize {
    row_size(width) + row_padding(width)
}

/// The 14-byte `BITMAPFILEHEADER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub magic: [u8; 2],
    pub file_size: u32,
    pub reserved_first: u16,
    pub reserved_second: u16,
    pub offset: u32,
}

impl Default for FileHeader {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            file_size: 0,
            reserved_first: 0,
            reserved_second: 0,
            offset: PIXEL_DATA_OFFSET,
        }
    }
}

impl FileHeader {
    pub fn from_bytes(bytes: &[u8; FILE_HEADER_LEN]) -> Self {
        let mut fields = FieldReader::new(bytes);
        Self {
            magic: [fields.u8(), fields.u8()],
            file_size: fields.u32(),
            reserved_first: fields.u16(),
            reserved_second: fields.u16(),
            offset: fields.u32(),
        }
    }

    pub fn to_bytes(&self) -> [u8; FILE_HEADER_LEN] {
        let mut bytes = [0u8; FILE_HEADER_LEN];
        FieldWriter::new(&mut bytes)
            .put(&self.magic)
            .put(&self.file_size.to_le_bytes())
            .put(&self.reserved_first.to_le_bytes())
            .put(&self.reserved_second.to_le_bytes())
            .put(&self.offset.to_le_bytes());
        bytes
    }

    /// Read exactly 14 bytes.
    pub fn read_from(reader: &mut impl Read) -> io::Result<Self> {
        let mut bytes = [0u8; FILE_HEADER_LEN];
        reader.read_exact(&mut bytes)?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

/// The 40-byte `BITMAPINFOHEADER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoHeader {
    pub header_size: u32,
    pub width: i32,
    /// Positive: rows are stored bottom-up on disk. Negative: top-down.
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub important_colors: u32,
}

impl Default for InfoHeader {
    fn default() -> Self {
        Self {
            header_size: INFO_HEADER_SIZE,
            width: 0,
            height: 0,
            planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            compression: 0,
            image_size: 0,
            x_pixels_per_meter: PIXELS_PER_METER,
            y_pixels_per_meter: PIXELS_PER_METER,
            colors_used: 0,
            important_colors: 0,
        }
    }
}

impl InfoHeader {
    pub fn from_bytes(bytes: &[u8; INFO_HEADER_LEN]) -> Self {
        let mut fields = FieldReader::new(bytes);
        Self {
            header_size: fields.u32(),
            width: fields.i32(),
            height: fields.i32(),
            planes: fields.u16(),
            bits_per_pixel: fields.u16(),
            compression: fields.u32(),
            image_size: fields.u32(),
            x_pixels_per_meter: fields.i32(),
            y_pixels_per_meter: fields.i32(),
            colors_used: fields.u32(),
            important_colors: fields.u32(),
        }
    }

    pub fn to_bytes(&self) -> [u8; INFO_HEADER_LEN] {
        let mut bytes = [0u8; INFO_HEADER_LEN];
        FieldWriter::new(&mut bytes)
            .put(&self.header_size.to_le_bytes())
            .put(&self.width.to_le_bytes())
            .put(&self.height.to_le_bytes())
            .put(&self.planes.to_le_bytes())
            .put(&self.bits_per_pixel.to_le_bytes())
            .put(&self.compression.to_le_bytes())
            .put(&self.image_size.to_le_bytes())
            .put(&self.x_pixels_per_meter.to_le_bytes())
            .put(&self.y_pixels_per_meter.to_le_bytes())
            .put(&self.colors_used.to_le_bytes())
            .put(&self.important_colors.to_le_bytes());
        bytes
    }

    /// Read exactly 40 bytes.
    pub fn read_from(reader: &mut impl Read) -> io::Result<Self> {
        let mut bytes = [0u8; INFO_HEADER_LEN];
        reader.read_exact(&mut bytes)?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Rows are stored bottom-up on disk.
    pub fn is_bottom_up(&self) -> bool {
        self.height > 0
    }

    /// Row count regardless of storage direction.
    pub fn row_count(&self) -> usize {
        self.height.unsigned_abs() as usize
    }
}

/// Sequential little-endian reader over a fixed header buffer.
///
/// Callers size the buffer to the header they decode, so reads never run
/// past the end.
struct FieldReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take())
    }
}

struct FieldWriter<'a> {
    bytes: &'a mut [u8],
    pos: usize,
}

impl<'a> FieldWriter<'a> {
    fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn put(&mut self, field: &[u8]) -> &mut Self {
        self.bytes[self.pos..self.pos + field.len()].copy_from_slice(field);
        self.pos += field.len();
        self
    }
}

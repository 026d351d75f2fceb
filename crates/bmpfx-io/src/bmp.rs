use std::{io::Write, path::Path};

use bmpfx_image::{Image, ImageSize};

use crate::error::IoError;

/// The Windows bitmap type tag, "BM" in little-endian.
pub const BMP_MAGIC: u16 = 0x4D42;

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;
const PIXEL_DATA_OFFSET: usize = FILE_HEADER_LEN + INFO_HEADER_LEN;

const BYTES_PER_PIXEL: usize = 3;

/// Pixels-per-meter written into synthesized headers (72 DPI).
const DEFAULT_PPM: i32 = 2835;

fn read_u16(src: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([src[offset], src[offset + 1]])
}

fn read_u32(src: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        src[offset],
        src[offset + 1],
        src[offset + 2],
        src[offset + 3],
    ])
}

fn read_i32(src: &[u8], offset: usize) -> i32 {
    read_u32(src, offset) as i32
}

/// Zero padding bytes appended to each encoded pixel row.
///
/// Rows are aligned to a four-byte boundary in the byte stream.
pub fn row_padding(width: usize) -> usize {
    (4 - (width * BYTES_PER_PIXEL) % 4) % 4
}

/// The 14-byte bitmap file header.
///
/// The leading "BM" type tag is implicit; every other field is kept verbatim
/// so an encoded stream reproduces its source byte for byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpFileHeader {
    /// Total file size in bytes.
    pub file_size: u32,
    /// First reserved field, unused.
    pub reserved1: u16,
    /// Second reserved field, unused.
    pub reserved2: u16,
    /// Byte offset of the pixel data from the start of the file.
    pub data_offset: u32,
}

impl BmpFileHeader {
    fn decode(src: &[u8]) -> Result<Self, IoError> {
        let magic = read_u16(src, 0);
        if magic != BMP_MAGIC {
            return Err(IoError::InvalidMagic(magic));
        }

        Ok(Self {
            file_size: read_u32(src, 2),
            reserved1: read_u16(src, 6),
            reserved2: read_u16(src, 8),
            data_offset: read_u32(src, 10),
        })
    }

    fn encode_into(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&BMP_MAGIC.to_le_bytes());
        dst.extend_from_slice(&self.file_size.to_le_bytes());
        dst.extend_from_slice(&self.reserved1.to_le_bytes());
        dst.extend_from_slice(&self.reserved2.to_le_bytes());
        dst.extend_from_slice(&self.data_offset.to_le_bytes());
    }
}

/// The 40-byte BITMAPINFOHEADER.
///
/// All fields are kept verbatim through a decode so that encoding reproduces
/// the source stream, including resolution and palette fields this crate
/// never interprets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpInfoHeader {
    /// Size of this header in bytes, 40 for the supported format.
    pub header_size: u32,
    /// Image width in pixels.
    pub width: i32,
    /// Image height in pixels; negative means top-down row order.
    pub height: i32,
    /// Number of color planes.
    pub planes: u16,
    /// Bits per pixel, 24 for the supported format.
    pub bit_count: u16,
    /// Compression code, 0 for the supported format.
    pub compression: u32,
    /// Size of the pixel data in bytes, may be zero for uncompressed data.
    pub image_size: u32,
    /// Horizontal resolution in pixels per meter.
    pub x_pixels_per_meter: i32,
    /// Vertical resolution in pixels per meter.
    pub y_pixels_per_meter: i32,
    /// Number of palette colors used.
    pub colors_used: u32,
    /// Number of important palette colors.
    pub colors_important: u32,
}

impl BmpInfoHeader {
    fn decode(src: &[u8]) -> Result<Self, IoError> {
        Ok(Self {
            header_size: read_u32(src, 0),
            width: read_i32(src, 4),
            height: read_i32(src, 8),
            planes: read_u16(src, 12),
            bit_count: read_u16(src, 14),
            compression: read_u32(src, 16),
            image_size: read_u32(src, 20),
            x_pixels_per_meter: read_i32(src, 24),
            y_pixels_per_meter: read_i32(src, 28),
            colors_used: read_u32(src, 32),
            colors_important: read_u32(src, 36),
        })
    }

    fn encode_into(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&self.header_size.to_le_bytes());
        dst.extend_from_slice(&self.width.to_le_bytes());
        dst.extend_from_slice(&self.height.to_le_bytes());
        dst.extend_from_slice(&self.planes.to_le_bytes());
        dst.extend_from_slice(&self.bit_count.to_le_bytes());
        dst.extend_from_slice(&self.compression.to_le_bytes());
        dst.extend_from_slice(&self.image_size.to_le_bytes());
        dst.extend_from_slice(&self.x_pixels_per_meter.to_le_bytes());
        dst.extend_from_slice(&self.y_pixels_per_meter.to_le_bytes());
        dst.extend_from_slice(&self.colors_used.to_le_bytes());
        dst.extend_from_slice(&self.colors_important.to_le_bytes());
    }
}

/// A decoded Windows bitmap: both headers plus the pixel grid.
///
/// Pixels are stored in file row order with (blue, green, red) channel order,
/// without the per-row padding of the byte stream.
#[derive(Clone)]
pub struct Bmp {
    /// The bitmap file header.
    pub file_header: BmpFileHeader,
    /// The bitmap info header.
    pub info_header: BmpInfoHeader,
    /// The pixel grid.
    pub image: Image<u8, 3>,
}

impl Bmp {
    /// Wrap a pixel grid with freshly synthesized headers.
    pub fn from_image(image: Image<u8, 3>) -> Self {
        let width = image.width();
        let height = image.height();
        let row_len = width * BYTES_PER_PIXEL + row_padding(width);
        let image_size = (height * row_len) as u32;

        Self {
            file_header: BmpFileHeader {
                file_size: PIXEL_DATA_OFFSET as u32 + image_size,
                reserved1: 0,
                reserved2: 0,
                data_offset: PIXEL_DATA_OFFSET as u32,
            },
            info_header: BmpInfoHeader {
                header_size: INFO_HEADER_LEN as u32,
                width: width as i32,
                height: height as i32,
                planes: 1,
                bit_count: 24,
                compression: 0,
                image_size,
                x_pixels_per_meter: DEFAULT_PPM,
                y_pixels_per_meter: DEFAULT_PPM,
                colors_used: 0,
                colors_important: 0,
            },
            image,
        }
    }

    /// Decode a bitmap from a byte stream.
    ///
    /// Accepts only the plain 54-byte-header form: a "BM" type tag, a 40-byte
    /// info header, 24 bits per pixel and no compression. Each rejection has
    /// its own [`IoError`] variant. Per-row padding bytes are consumed and
    /// dropped; rows are kept in their stored order.
    pub fn decode(src: &[u8]) -> Result<Self, IoError> {
        if src.len() < PIXEL_DATA_OFFSET {
            return Err(IoError::TruncatedHeader(src.len()));
        }

        let file_header = BmpFileHeader::decode(&src[..FILE_HEADER_LEN])?;
        let info_header = BmpInfoHeader::decode(&src[FILE_HEADER_LEN..PIXEL_DATA_OFFSET])?;

        if file_header.data_offset != PIXEL_DATA_OFFSET as u32 {
            return Err(IoError::InvalidDataOffset(
                file_header.data_offset,
                PIXEL_DATA_OFFSET as u32,
            ));
        }
        if info_header.header_size != INFO_HEADER_LEN as u32 {
            return Err(IoError::InvalidInfoHeaderSize(
                info_header.header_size,
                INFO_HEADER_LEN as u32,
            ));
        }
        if info_header.bit_count != 24 {
            return Err(IoError::InvalidBitCount(info_header.bit_count));
        }
        if info_header.compression != 0 {
            return Err(IoError::InvalidCompression(info_header.compression));
        }
        if info_header.width <= 0 || info_header.height == 0 {
            return Err(IoError::InvalidDimensions(
                info_header.width,
                info_header.height,
            ));
        }

        let width = info_header.width as usize;
        let height = info_header.height.unsigned_abs() as usize;
        let padding = row_padding(width);
        let row_len = width * BYTES_PER_PIXEL + padding;

        let needed = height * row_len;
        let available = src.len() - PIXEL_DATA_OFFSET;
        if available < needed {
            return Err(IoError::TruncatedPixelData(needed, available));
        }

        let mut data = Vec::with_capacity(height * width * BYTES_PER_PIXEL);
        for row in 0..height {
            let start = PIXEL_DATA_OFFSET + row * row_len;
            data.extend_from_slice(&src[start..start + width * BYTES_PER_PIXEL]);
        }

        let image = Image::new(ImageSize { width, height }, data)?;

        Ok(Self {
            file_header,
            info_header,
            image,
        })
    }

    /// Encode the bitmap into a byte stream.
    ///
    /// Headers are written back verbatim, followed by the pixel rows with
    /// zero padding to the four-byte row boundary. Decoding a stream and
    /// encoding it again reproduces the input exactly.
    pub fn encode(&self) -> Result<Vec<u8>, IoError> {
        let width = self.image.width();
        let height = self.image.height();
        if self.info_header.width as usize != width
            || self.info_header.height.unsigned_abs() as usize != height
        {
            return Err(IoError::HeaderImageMismatch(
                self.info_header.width,
                self.info_header.height,
                width,
                height,
            ));
        }

        let padding = row_padding(width);
        let row_len = width * BYTES_PER_PIXEL;

        let mut dst = Vec::with_capacity(PIXEL_DATA_OFFSET + height * (row_len + padding));
        self.file_header.encode_into(&mut dst);
        self.info_header.encode_into(&mut dst);

        let data = self.image.as_slice();
        for row in 0..height {
            dst.extend_from_slice(&data[row * row_len..(row + 1) * row_len]);
            dst.extend(std::iter::repeat(0u8).take(padding));
        }

        Ok(dst)
    }
}

/// Read a 24-bit Windows bitmap from the given file path.
///
/// # Arguments
///
/// * `file_path` - The path to the BMP file.
///
/// # Returns
///
/// The decoded bitmap with its headers preserved.
pub fn read_image_bmp(file_path: impl AsRef<Path>) -> Result<Bmp, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let data = std::fs::read(file_path)?;
    Bmp::decode(&data)
}

/// Write a bitmap to the given file path.
///
/// The stream is encoded fully in memory and moved into place through a
/// temporary file in the same directory, so a failed write never leaves a
/// partial output file behind.
pub fn write_image_bmp(file_path: impl AsRef<Path>, bmp: &Bmp) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let encoded = bmp.encode()?;

    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&encoded)?;
    tmp.persist(file_path).map_err(|e| IoError::FileError(e.error))?;

    Ok(())
}

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to manipulate the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] bmpfx_image::ImageError),

    /// Error when the data ends before the bitmap headers do.
    #[error("Data is too short for the bitmap headers ({0} bytes)")]
    TruncatedHeader(usize),

    /// Error when the file type tag is not a Windows bitmap.
    #[error("Not a Windows bitmap (type tag 0x{0:04x})")]
    InvalidMagic(u16),

    /// Error when the pixel data offset is not the plain two-header layout.
    #[error("Unsupported pixel data offset {0}, expected {1}")]
    InvalidDataOffset(u32, u32),

    /// Error when the info header is not the 40-byte BITMAPINFOHEADER.
    #[error("Unsupported info header size {0}, expected {1}")]
    InvalidInfoHeaderSize(u32, u32),

    /// Error when the bit depth is not 24 bits per pixel.
    #[error("Unsupported bit depth {0}, expected 24")]
    InvalidBitCount(u16),

    /// Error when the pixel data is compressed.
    #[error("Unsupported compression {0}, expected 0 (uncompressed)")]
    InvalidCompression(u32),

    /// Error when the header dimensions are not positive.
    #[error("Invalid image dimensions {0}x{1}")]
    InvalidDimensions(i32, i32),

    /// Error when the pixel data ends early.
    #[error("Pixel data is truncated (need {0} bytes, got {1})")]
    TruncatedPixelData(usize, usize),

    /// Error when the header dimensions disagree with the held image.
    #[error("Header dimensions {0}x{1} do not match the image {2}x{3}")]
    HeaderImageMismatch(i32, i32, usize, usize),
}

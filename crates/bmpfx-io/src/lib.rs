#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Windows bitmap encoding and decoding.
///
/// Read and write uncompressed 24-bit bitmaps with the plain 54-byte header
/// layout. See [`bmp::Bmp`] for the decoded form.
pub mod bmp;

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access and per-cause container
/// rejections.
pub mod error;

pub use crate::error::IoError;

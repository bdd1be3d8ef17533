//! Image decoding for the local processing path.
//!
//! This module provides:
//! - Decoding JPEG/PNG bytes to RGB with EXIF orientation applied
//! - Reading the oriented pixel size without a full decode
//!
//! Natural sizes reported to the crop engine are always the oriented size, so
//! a crop rectangle computed on screen maps onto the pixels that
//! [`decode_image`] returns.

mod reader;
mod types;

pub use reader::{decode_image, get_orientation, read_natural_size};
pub use types::{DecodeError, DecodedImage, Orientation};

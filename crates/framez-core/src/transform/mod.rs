//! Pixel-level image transforms used by the local processing path.
//!
//! # Coordinate System
//!
//! - Crop rectangles are in pixels of the oriented image, origin top-left
//! - Rotations are quarter turns, clockwise

mod crop;
mod rotation;

pub use crop::crop_pixels;
pub use rotation::{rotate_quarter, QuarterTurn};

//! Lossless quarter-turn rotation.
//!
//! Quarter turns only move pixels, so no interpolation is involved. For each
//! output pixel the source is found by the inverse mapping:
//!
//! ```text
//! 90 CW:  src = (dst_y,         h - 1 - dst_x)
//! 180:    src = (w - 1 - dst_x, h - 1 - dst_y)
//! 270 CW: src = (w - 1 - dst_y, dst_x)
//! ```

use crate::decode::DecodedImage;

/// Clockwise rotation by a multiple of 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarterTurn {
    Identity,
    Cw90,
    Cw180,
    Cw270,
}

impl QuarterTurn {
    /// Normalize any multiple of 90 degrees (negative = counter-clockwise).
    /// Returns `None` for angles that are not quarter turns.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(match degrees.rem_euclid(360) {
            0 => QuarterTurn::Identity,
            90 => QuarterTurn::Cw90,
            180 => QuarterTurn::Cw180,
            _ => QuarterTurn::Cw270,
        })
    }

    pub fn swaps_dimensions(self) -> bool {
        matches!(self, QuarterTurn::Cw90 | QuarterTurn::Cw270)
    }
}

/// Rotate an image clockwise by `turn`.
pub fn rotate_quarter(image: &DecodedImage, turn: QuarterTurn) -> DecodedImage {
    if turn == QuarterTurn::Identity || image.is_empty() {
        return image.clone();
    }

    let (w, h) = (image.width, image.height);
    let (dst_w, dst_h) = if turn.swaps_dimensions() { (h, w) } else { (w, h) };
    let mut output = Vec::with_capacity(DecodedImage::expected_len(dst_w, dst_h));

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let (src_x, src_y) = match turn {
                QuarterTurn::Cw90 => (dst_y, h - 1 - dst_x),
                QuarterTurn::Cw180 => (w - 1 - dst_x, h - 1 - dst_y),
                QuarterTurn::Cw270 => (w - 1 - dst_y, dst_x),
                QuarterTurn::Identity => (dst_x, dst_y),
            };
            output.extend_from_slice(&image.pixel(src_x, src_y));
        }
    }

    DecodedImage::new(dst_w, dst_h, output)
}

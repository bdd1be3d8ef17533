//! WASM bindings for executing a crop request and quarter-turn rotation
//! locally in the browser.

use crate::types::JsDecodedImage;
use framez_core::geometry::CropRequest;
use framez_core::transform::{crop_pixels, rotate_quarter as core_rotate, QuarterTurn};
use wasm_bindgen::prelude::*;

/// Crop `image` to the pixel rectangle produced by `JsCropSession.crop_request()`.
///
/// Out-of-range rectangles are clamped to the image, never below 1x1.
///
/// ```typescript
/// const { originX, originY, width, height } = session.crop_request();
/// const cropped = apply_crop_request(image, originX, originY, width, height);
/// ```
#[wasm_bindgen]
pub fn apply_crop_request(
    image: &JsDecodedImage,
    origin_x: u32,
    origin_y: u32,
    width: u32,
    height: u32,
) -> JsDecodedImage {
    let rect = CropRequest {
        origin_x,
        origin_y,
        width,
        height,
    };
    JsDecodedImage::from_decoded(crop_pixels(&image.to_decoded(), rect))
}

/// Rotate `image` clockwise by `turns` quarter turns (negative turns rotate
/// counter-clockwise).
#[wasm_bindgen]
pub fn rotate_quarter(image: &JsDecodedImage, turns: i32) -> JsDecodedImage {
    let turn = QuarterTurn::from_degrees(turns.wrapping_rem(4) * 90).unwrap_or(QuarterTurn::Identity);
    JsDecodedImage::from_decoded(core_rotate(&image.to_decoded(), turn))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> JsDecodedImage {
        let pixels: Vec<u8> = (0..(width * height * 3) as usize)
            .map(|i| (i % 256) as u8)
            .collect();
        JsDecodedImage::from_parts(width, height, pixels).unwrap()
    }

    #[test]
    fn test_crop_request_region() {
        let img = test_image(100, 200);
        let result = apply_crop_request(&img, 10, 40, 80, 100);
        assert_eq!(result.width(), 80);
        assert_eq!(result.height(), 100);
    }

    #[test]
    fn test_crop_request_clamped() {
        let img = test_image(100, 100);
        let result = apply_crop_request(&img, 90, 90, 50, 50);
        assert_eq!(result.width(), 10);
        assert_eq!(result.height(), 10);
    }

    #[test]
    fn test_short_buffer_never_reaches_transforms() {
        // a mis-sized buffer is rejected at construction
        assert!(JsDecodedImage::from_parts(10, 10, vec![0u8; 12]).is_err());

        let empty = JsDecodedImage::from_parts(0, 0, Vec::new()).unwrap();
        assert_eq!(apply_crop_request(&empty, 2, 2, 5, 5).byte_length(), 0);
        assert_eq!(rotate_quarter(&empty, 1).byte_length(), 0);
    }

    #[test]
    fn test_rotate_quarter_turns() {
        let img = test_image(100, 50);

        let once = rotate_quarter(&img, 1);
        assert_eq!((once.width(), once.height()), (50, 100));

        let twice = rotate_quarter(&img, 2);
        assert_eq!((twice.width(), twice.height()), (100, 50));

        let back = rotate_quarter(&img, -1);
        assert_eq!((back.width(), back.height()), (50, 100));

        let full = rotate_quarter(&img, 4);
        assert_eq!(full.pixels(), img.pixels());
    }
}

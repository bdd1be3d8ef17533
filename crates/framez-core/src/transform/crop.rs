//! Pixel-rectangle cropping.
//!
//! The crop engine already guarantees its rectangles fit the image; the
//! clamping here keeps the operation total for any caller.

use crate::decode::DecodedImage;
use crate::geometry::CropRequest;

/// Copy the pixels inside `rect` into a new image.
///
/// # Behavior
///
/// - The origin is clamped to the last pixel of each axis
/// - The size is clamped so the rectangle ends at the image edge
/// - Minimum output dimension is 1x1 pixels
/// - A rectangle covering the whole image returns a copy of the original
///
/// # Example
///
/// ```
/// use framez_core::decode::DecodedImage;
/// use framez_core::geometry::CropRequest;
/// use framez_core::transform::crop_pixels;
///
/// let image = DecodedImage::new(100, 100, vec![128u8; 100 * 100 * 3]);
/// let rect = CropRequest { origin_x: 25, origin_y: 25, width: 50, height: 50 };
/// let cropped = crop_pixels(&image, rect);
/// assert_eq!((cropped.width, cropped.height), (50, 50));
/// ```
pub fn crop_pixels(image: &DecodedImage, rect: CropRequest) -> DecodedImage {
    if image.is_empty() {
        return image.clone();
    }

    let left = rect.origin_x.min(image.width - 1);
    let top = rect.origin_y.min(image.height - 1);
    let out_width = rect.width.clamp(1, image.width - left);
    let out_height = rect.height.clamp(1, image.height - top);

    // Fast path: the whole image
    if left == 0 && top == 0 && out_width == image.width && out_height == image.height {
        return image.clone();
    }

    let stride = image.stride();
    let row_bytes = out_width as usize * 3;
    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    for y in top..top + out_height {
        let start = y as usize * stride + left as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    DecodedImage::new(out_width, out_height, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test image where each pixel's value encodes its position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn rect(origin_x: u32, origin_y: u32, width: u32, height: u32) -> CropRequest {
        CropRequest {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    #[test]
    fn test_full_crop_is_identity() {
        let img = test_image(50, 40);
        let result = crop_pixels(&img, rect(0, 0, 50, 40));
        assert_eq!(result, img);
    }

    #[test]
    fn test_inner_crop_pixels() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, rect(3, 2, 4, 5));

        assert_eq!((result.width, result.height), (4, 5));
        // first pixel comes from (3, 2) = 2 * 10 + 3
        assert_eq!(result.pixel(0, 0), [23, 23, 23]);
        // last pixel comes from (6, 6) = 66
        assert_eq!(result.pixel(3, 4), [66, 66, 66]);
    }

    #[test]
    fn test_crop_clamps_to_edges() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, rect(8, 8, 5, 5));
        assert_eq!((result.width, result.height), (2, 2));

        let result = crop_pixels(&img, rect(50, 50, 5, 5));
        assert_eq!((result.width, result.height), (1, 1));
        assert_eq!(result.pixel(0, 0), [99, 99, 99]);
    }

    #[test]
    fn test_zero_size_becomes_one_pixel() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, rect(4, 4, 0, 0));
        assert_eq!((result.width, result.height), (1, 1));
    }

    #[test]
    fn test_tall_strip() {
        let img = test_image(200, 100);
        let result = crop_pixels(&img, rect(150, 0, 50, 100));
        assert_eq!((result.width, result.height), (50, 100));
        assert_eq!(result.pixels.len(), 50 * 100 * 3);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

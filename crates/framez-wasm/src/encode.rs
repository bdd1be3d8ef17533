//! JPEG encoding binding for cropped or rotated images.

use crate::types::JsDecodedImage;
use framez_core::encode;
use wasm_bindgen::prelude::*;

/// Encode an image to JPEG bytes at `quality` (1-100).
///
/// ```typescript
/// const jpeg = encode_jpeg(cropped, 85);
/// const blob = new Blob([jpeg], { type: 'image/jpeg' });
/// ```
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsDecodedImage, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(&image.to_decoded(), quality).map_err(|e| JsValue::from_str(&e.to_string()))
}

//! Image decoding bindings.
//!
//! A web host decodes the picked file once, then crops and re-encodes it in
//! WASM memory:
//!
//! ```typescript
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const [width, height] = natural_size(bytes);
//! const session = new JsCropSession(width, height, 0.8, undefined);
//! const image = decode_image(bytes);
//! ```

use crate::types::JsDecodedImage;
use framez_core::decode;
use wasm_bindgen::prelude::*;

/// Decode JPEG or PNG bytes to RGB, applying EXIF orientation.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Oriented `[width, height]` from the image header, without decoding pixels.
#[wasm_bindgen]
pub fn natural_size(bytes: &[u8]) -> Result<Vec<u32>, JsValue> {
    decode::read_natural_size(bytes)
        .map(|(width, height)| vec![width, height])
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

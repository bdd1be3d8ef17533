//! WASM-compatible wrapper for decoded image data.

use framez_core::decode::DecodedImage;
use wasm_bindgen::prelude::*;

/// An RGB image held in WASM memory.
///
/// `pixels()` copies the buffer out to a JavaScript `Uint8Array`; keep the
/// image in WASM between crop, rotate and encode calls to avoid extra copies.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Wrap RGB pixel data (3 bytes per pixel, row-major).
    ///
    /// Fails unless `pixels.length == width * height * 3`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsDecodedImage, JsValue> {
        Self::from_parts(width, height, pixels).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Release WASM memory now instead of waiting for the finalizer.
    pub fn free(self) {}
}

impl JsDecodedImage {
    /// Checked constructor; every image reaching the pixel bindings has a
    /// buffer that matches its dimensions.
    pub(crate) fn from_parts(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, String> {
        let expected = DecodedImage::expected_len(width, height);
        if pixels.len() != expected {
            return Err(format!(
                "Invalid pixel data: expected {} bytes for {}x{} RGB, got {}",
                expected,
                width,
                height,
                pixels.len()
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Copy into a core image for the transform and encode functions.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

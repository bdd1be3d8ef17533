//! Framez WASM - WebAssembly bindings for the Framez crop engine
//!
//! # Module Structure
//!
//! - `session` - crop session driven by drag/pinch events
//! - `types` - WASM-compatible wrapper for image data
//! - `decode` - decoding and natural size probing
//! - `transform` - executing a crop request, quarter-turn rotation
//! - `encode` - JPEG re-encoding
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession, natural_size } from '@framez/wasm';
//!
//! await init();
//! const [w, h] = natural_size(bytes);
//! const session = new JsCropSession(w, h, 4 / 5, undefined);
//! session.drag_begin();
//! session.drag_move(0, -40);
//! session.drag_release(0, -40);
//! const rect = session.crop_request();
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod session;
mod transform;
mod types;

pub use decode::{decode_image, natural_size};
pub use encode::encode_jpeg;
pub use session::JsCropSession;
pub use transform::{apply_crop_request, rotate_quarter};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

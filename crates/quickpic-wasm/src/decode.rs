//! Image decoding WASM bindings.

use crate::types::JsSourceImage;
use quickpic_core::source;
use wasm_bindgen::prelude::*;

/// Decode JPEG or PNG file bytes into a source image.
///
/// EXIF orientation is applied, so the result is upright. Alpha is kept when
/// the file has it.
///
/// # Errors
///
/// Returns an error if the format isn't recognized or the file is corrupted.
///
/// # Example
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const image = decode_image(bytes);
/// console.log(`Decoded ${image.width}x${image.height}`);
/// ```
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
    source::decode_image(bytes)
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

//! QuickPic WASM - WebAssembly bindings for QuickPic
//!
//! Exposes the quickpic-core size search to the browser so an uploaded image
//! can be recompressed to a requested file size without leaving the page.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for source images
//! - `decode` - Image decoding bindings (JPEG, PNG)
//! - `search` - Size-targeted compression and its result type
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, compress_to_size, reduced_filename } from '@quickpic/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const result = compress_to_size(image, 200, 'KB');
//! const blob = new Blob([result.bytes()], { type: 'image/jpeg' });
//! download(blob, reduced_filename(file.name, 200));
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod search;
mod types;

pub use decode::decode_image;
pub use search::{
    compress_to_size, compress_to_target, compress_to_target_cancellable, JsSearchResult,
};
pub use types::JsSourceImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Download name for a reduced image, e.g. `QuickPic_200kb_holiday.jpg`.
#[wasm_bindgen]
pub fn reduced_filename(original: &str, target_kb: u32) -> String {
    quickpic_core::reduced_filename(original, u64::from(target_kb))
}

//! WASM-compatible wrapper for source images.

use quickpic_core::{ColorModel, SourceImage};
use wasm_bindgen::prelude::*;

/// A source image held in WASM memory.
///
/// Pixels are copied in once at construction; searches read them in place.
/// Call `pixels()` only when JavaScript really needs a copy back.
#[wasm_bindgen]
pub struct JsSourceImage {
    inner: SourceImage,
}

#[wasm_bindgen]
impl JsSourceImage {
    /// Create an image from raw pixels.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - Row-major pixel data
    /// * `channels` - 3 for RGB, 4 for RGBA (e.g. `ImageData.data` from a canvas)
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported channel count, zero dimensions, or a
    /// buffer whose length doesn't match `width * height * channels`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        channels: u8,
    ) -> Result<JsSourceImage, JsValue> {
        let color = color_from_channels(channels)
            .ok_or_else(|| JsValue::from_str(&format!("Unsupported channel count: {}", channels)))?;
        SourceImage::new(width, height, color, pixels)
            .map(Self::from_source)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// 3 for RGB, 4 for RGBA
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.inner.color().channels() as u8
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels().len()
    }

    /// Copy of the pixel buffer as a Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }
}

impl JsSourceImage {
    pub(crate) fn from_source(inner: SourceImage) -> Self {
        Self { inner }
    }

    pub(crate) fn source(&self) -> &SourceImage {
        &self.inner
    }
}

pub(crate) fn color_from_channels(channels: u8) -> Option<ColorModel> {
    match channels {
        3 => Some(ColorModel::Rgb),
        4 => Some(ColorModel::Rgba),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_source_getters() {
        let source = SourceImage::new(40, 20, ColorModel::Rgba, vec![7u8; 40 * 20 * 4]).unwrap();
        let img = JsSourceImage::from_source(source);

        assert_eq!(img.width(), 40);
        assert_eq!(img.height(), 20);
        assert_eq!(img.channels(), 4);
        assert_eq!(img.byte_length(), 3200);
        assert_eq!(img.pixels()[0], 7);
    }

    #[test]
    fn test_color_from_channels() {
        assert_eq!(color_from_channels(3), Some(ColorModel::Rgb));
        assert_eq!(color_from_channels(4), Some(ColorModel::Rgba));
        assert_eq!(color_from_channels(1), None);
        assert_eq!(color_from_channels(0), None);
    }
}

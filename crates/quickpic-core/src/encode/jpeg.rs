//! JPEG encoding.
//!
//! This module provides JPEG encoding using the `image` crate's JPEG encoder.
//! The encoder is deterministic: identical pixels and quality always yield
//! byte-identical output, which the size search relies on.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::EncodeError;
use crate::source::ColorModel;

/// Map a normalized quality in `[0, 1]` to the codec's `1..=100` scale.
#[inline]
pub fn jpeg_quality(quality: f64) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - Pixel data in row-major order, laid out per `color`
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `color` - Channel layout; RGBA is flattened onto black first
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 60-90: Medium quality, acceptable for web/social media
/// * Below 30: Visible blocking; the size floor of most photos sits here
///
/// # Example
///
/// ```
/// use quickpic_core::encode::encode_jpeg;
/// use quickpic_core::ColorModel;
///
/// let pixels = vec![128u8; 100 * 100 * 4]; // Gray RGBA canvas
/// let jpeg = encode_jpeg(&pixels, 100, 100, ColorModel::Rgba, 80).unwrap();
///
/// // Verify JPEG magic bytes
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    color: ColorModel,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * color.channels();
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);

    let flattened;
    let rgb = match color {
        ColorModel::Rgb => pixels,
        ColorModel::Rgba => {
            flattened = flatten_alpha(pixels);
            &flattened
        }
    };

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Composite straight-alpha RGBA onto black, as canvas JPEG export does.
fn flatten_alpha(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = px[3] as u16;
        for &c in &px[..3] {
            rgb.push(((c as u16 * alpha + 127) / 255) as u8);
        }
    }
    rgb
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Same input always produces same output (deterministic).
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=24, 1u32..=24),
            quality in 1u8..=100,
            seed in any::<u8>(),
        ) {
            let size = (width as usize) * (height as usize) * 3;
            let pixels: Vec<u8> = (0..size).map(|i| (i as u8).wrapping_mul(31) ^ seed).collect();

            let first = encode_jpeg(&pixels, width, height, ColorModel::Rgb, quality).unwrap();
            let second = encode_jpeg(&pixels, width, height, ColorModel::Rgb, quality).unwrap();

            prop_assert_eq!(first, second, "Same input should produce same output");
        }

        /// Property: Valid input always produces a framed JPEG.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            (width, height) in (1u32..=40, 1u32..=40),
            quality in 1u8..=100,
            rgba in any::<bool>(),
        ) {
            let color = if rgba { ColorModel::Rgba } else { ColorModel::Rgb };
            let pixels = vec![128u8; (width as usize) * (height as usize) * color.channels()];

            let jpeg = encode_jpeg(&pixels, width, height, color, quality).unwrap();
            let len = jpeg.len();
            prop_assert!(len >= 4);
            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[len - 2..], &[0xFF, 0xD9]);
        }

        /// Property: normalized quality always lands in the codec range.
        #[test]
        fn prop_jpeg_quality_in_range(quality in -1.0f64..=2.0) {
            let q = jpeg_quality(quality);
            prop_assert!((1..=100).contains(&q));
        }
    }
}

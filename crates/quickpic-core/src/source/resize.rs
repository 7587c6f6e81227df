//! Uniform downscaling ahead of encoding.
//!
//! Every probe of the search resamples from the untouched source, never from
//! a previous probe's output, so errors do not accumulate across iterations.

use std::borrow::Cow;

use image::imageops;

use super::{ColorModel, FilterType, SourceError, SourceImage};

/// Compute the output dimensions for a uniform scale factor.
///
/// Each axis is `round(dim * scale)`, clamped to at least one pixel so that
/// no scale factor can produce a zero-area image.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let scale_axis = |dim: u32| -> u32 {
        let scaled = (dim as f64 * scale).round();
        if scaled.is_finite() && scaled >= 1.0 {
            scaled.min(dim as f64) as u32
        } else {
            1
        }
    };
    (scale_axis(width), scale_axis(height))
}

/// Resample an image to exact dimensions.
///
/// Returns the source borrowed when the dimensions already match, so the
/// common `scale = 1.0` probe costs no copy.
///
/// # Errors
///
/// Returns `SourceError::InvalidDimensions` if either target side is zero.
pub fn resample(
    image: &SourceImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Cow<'_, SourceImage>, SourceError> {
    if width == 0 || height == 0 {
        return Err(SourceError::InvalidDimensions { width, height });
    }

    if image.width() == width && image.height() == height {
        return Ok(Cow::Borrowed(image));
    }

    let filter = filter.to_image_filter();
    let resized = match image.color() {
        ColorModel::Rgb => {
            let view = image::ImageBuffer::<image::Rgb<u8>, &[u8]>::from_raw(
                image.width(),
                image.height(),
                image.pixels(),
            )
            .ok_or_else(|| SourceError::CorruptedFile("RGB buffer size mismatch".to_string()))?;
            SourceImage::from_rgb_image(imageops::resize(&view, width, height, filter))?
        }
        ColorModel::Rgba => {
            let view = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
                image.width(),
                image.height(),
                image.pixels(),
            )
            .ok_or_else(|| SourceError::CorruptedFile("RGBA buffer size mismatch".to_string()))?;
            SourceImage::from_rgba_image(imageops::resize(&view, width, height, filter))?
        }
    };

    Ok(Cow::Owned(resized))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

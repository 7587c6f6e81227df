//! Core types for source images.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for source image construction, decoding and resampling.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the dimensions and color model.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// The bytes are not a recognized or supported image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Channel layout of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorModel {
    /// 3 bytes per pixel.
    #[default]
    Rgb,
    /// 4 bytes per pixel, straight (non-premultiplied) alpha.
    Rgba,
}

impl ColorModel {
    /// Bytes per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ColorModel::Rgb => 3,
            ColorModel::Rgba => 4,
        }
    }
}

/// Filter type for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// An immutable, non-empty pixel buffer handed to the search.
///
/// Construction validates the buffer against the dimensions, so every
/// `SourceImage` in circulation is encodable. There is no way to mutate
/// the pixels afterwards; concurrent searches may share one by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    color: ColorModel,
    pixels: Vec<u8>,
}

impl SourceImage {
    /// Create a SourceImage from dimensions and row-major pixel data.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidDimensions` if either side is zero and
    /// `SourceError::InvalidPixelData` if the buffer length is not
    /// `width * height * channels`.
    pub fn new(
        width: u32,
        height: u32,
        color: ColorModel,
        pixels: Vec<u8>,
    ) -> Result<Self, SourceError> {
        if width == 0 || height == 0 {
            return Err(SourceError::InvalidDimensions { width, height });
        }

        let expected = (width as usize) * (height as usize) * color.channels();
        if pixels.len() != expected {
            return Err(SourceError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            color,
            pixels,
        })
    }

    /// Create a SourceImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Result<Self, SourceError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, ColorModel::Rgb, img.into_raw())
    }

    /// Create a SourceImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Result<Self, SourceError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, ColorModel::Rgba, img.into_raw())
    }

    /// Convert a decoded DynamicImage, keeping alpha only when present.
    pub fn from_dynamic(img: image::DynamicImage) -> Result<Self, SourceError> {
        if img.color().has_alpha() {
            Self::from_rgba_image(img.into_rgba8())
        } else {
            Self::from_rgb_image(img.into_rgb8())
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn color(&self) -> ColorModel {
        self.color
    }

    /// Row-major pixel data laid out per `color()`.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Consume the image and return its pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal); // Invalid defaults to Normal
    }

    #[test]
    fn test_color_model_channels() {
        assert_eq!(ColorModel::Rgb.channels(), 3);
        assert_eq!(ColorModel::Rgba.channels(), 4);
    }

    #[test]
    fn test_source_image_creation() {
        let img = SourceImage::new(100, 50, ColorModel::Rgb, vec![0u8; 100 * 50 * 3]).unwrap();

        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.pixel_count(), 5000);
        assert_eq!(img.pixels().len(), 15000);
    }

    #[test]
    fn test_source_image_rgba() {
        let img = SourceImage::new(2, 2, ColorModel::Rgba, vec![255u8; 16]).unwrap();
        assert_eq!(img.color(), ColorModel::Rgba);
    }

    #[test]
    fn test_source_image_zero_dimensions() {
        let result = SourceImage::new(0, 10, ColorModel::Rgb, vec![]);
        assert!(matches!(result, Err(SourceError::InvalidDimensions { .. })));

        let result = SourceImage::new(10, 0, ColorModel::Rgb, vec![]);
        assert!(matches!(result, Err(SourceError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_source_image_wrong_buffer_length() {
        // RGB-sized buffer declared as RGBA
        let result = SourceImage::new(10, 10, ColorModel::Rgba, vec![0u8; 300]);
        match result {
            Err(SourceError::InvalidPixelData { expected, actual }) => {
                assert_eq!(expected, 400);
                assert_eq!(actual, 300);
            }
            other => panic!("Expected InvalidPixelData, got {:?}", other),
        }
    }

    #[test]
    fn test_from_dynamic_keeps_alpha_only_when_present() {
        let rgb = image::DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
        assert_eq!(SourceImage::from_dynamic(rgb).unwrap().color(), ColorModel::Rgb);

        let rgba = image::DynamicImage::ImageRgba8(image::RgbaImage::new(4, 4));
        assert_eq!(SourceImage::from_dynamic(rgba).unwrap().color(), ColorModel::Rgba);
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::InvalidDimensions {
            width: 0,
            height: 5,
        };
        assert_eq!(
            err.to_string(),
            "Invalid dimensions: width (0) and height (5) must be non-zero"
        );

        let err = SourceError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}

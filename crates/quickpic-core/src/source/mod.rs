//! Source images for the size search.
//!
//! This module provides functionality for:
//! - Validated, read-only pixel buffers (`SourceImage`)
//! - Decoding JPEG/PNG bytes with EXIF orientation applied
//! - Deterministic uniform downscaling for encode probes
//!
//! # Examples
//!
//! ```
//! use quickpic_core::encode::encode_jpeg;
//! use quickpic_core::source::{decode_image, scaled_dimensions};
//! use quickpic_core::ColorModel;
//!
//! let bytes = encode_jpeg(&[60u8; 16 * 8 * 3], 16, 8, ColorModel::Rgb, 90).unwrap();
//! let image = decode_image(&bytes).unwrap();
//! assert_eq!(scaled_dimensions(image.width(), image.height(), 0.5), (8, 4));
//! ```

mod decode;
mod resize;
mod types;

pub use decode::{decode_image, read_orientation};
pub use resize::{resample, scaled_dimensions};
pub use types::{ColorModel, FilterType, Orientation, SourceError, SourceImage};

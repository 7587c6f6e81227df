//! Image encoding for size-targeted export.
//!
//! This module provides functionality for:
//! - Encoding pixel buffers to JPEG with a configurable quality
//! - The `ReEncoder` seam the size search probes through
//! - Immutable `EncodedArtifact` results tagged with their parameters
//!
//! # Examples
//!
//! ```
//! use quickpic_core::encode::{EncodeParams, JpegReEncoder, ReEncoder};
//! use quickpic_core::{ColorModel, SourceImage};
//!
//! let image = SourceImage::new(40, 30, ColorModel::Rgb, vec![200u8; 40 * 30 * 3]).unwrap();
//! let artifact = JpegReEncoder::new()
//!     .encode(&image, EncodeParams::new(0.8, 0.5))
//!     .unwrap();
//! assert_eq!(artifact.dimensions(), (20, 15));
//! ```

mod artifact;
mod error;
mod jpeg;
mod reencoder;

pub use artifact::{EncodeParams, EncodedArtifact};
pub use error::EncodeError;
pub use jpeg::{encode_jpeg, jpeg_quality};
pub use reencoder::{JpegReEncoder, ReEncoder};

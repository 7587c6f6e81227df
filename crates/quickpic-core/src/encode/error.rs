use thiserror::Error;

use crate::source::SourceError;

/// Errors that can occur while producing one encoded candidate.
///
/// The search treats all of these as recoverable: the candidate is skipped
/// and the next probe avoids the failing parameters.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Quality or scale outside the codec's accepted range
    #[error("Invalid encode parameters: quality {quality} must be in [0, 1], scale {scale} in (0, 1]")]
    InvalidParams { quality: f64, scale: f64 },

    /// Resampling to the probe dimensions failed
    #[error("Resampling failed: {0}")]
    Resample(#[from] SourceError),

    /// The codec refused the parameters for its own reasons
    #[error("Codec rejected parameters: {0}")]
    Rejected(String),

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

//! The codec seam of the size search.

use super::{encode_jpeg, jpeg_quality, EncodeError, EncodeParams, EncodedArtifact};
use crate::source::{resample, scaled_dimensions, FilterType, SourceImage};

/// Deterministic mapping from `(SourceImage, EncodeParams)` to an artifact.
///
/// Implementations must be pure: no I/O, no shared mutable state, and
/// byte-identical output for identical inputs. Output size is expected to
/// grow with both quality and scale, but the search does not depend on that
/// holding exactly.
pub trait ReEncoder {
    fn encode(
        &self,
        image: &SourceImage,
        params: EncodeParams,
    ) -> Result<EncodedArtifact, EncodeError>;
}

impl<F> ReEncoder for F
where
    F: Fn(&SourceImage, EncodeParams) -> Result<EncodedArtifact, EncodeError>,
{
    fn encode(
        &self,
        image: &SourceImage,
        params: EncodeParams,
    ) -> Result<EncodedArtifact, EncodeError> {
        self(image, params)
    }
}

/// Re-encoder producing baseline JPEG via the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegReEncoder {
    filter: FilterType,
}

impl JpegReEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different resampling filter for scaled probes.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }
}

impl ReEncoder for JpegReEncoder {
    fn encode(
        &self,
        image: &SourceImage,
        params: EncodeParams,
    ) -> Result<EncodedArtifact, EncodeError> {
        if !params.is_valid() {
            return Err(EncodeError::InvalidParams {
                quality: params.quality,
                scale: params.scale,
            });
        }

        let (width, height) = scaled_dimensions(image.width(), image.height(), params.scale);
        let scaled = resample(image, width, height, self.filter)?;

        let bytes = encode_jpeg(
            scaled.pixels(),
            width,
            height,
            scaled.color(),
            jpeg_quality(params.quality),
        )?;

        Ok(EncodedArtifact::new(bytes, params, width, height))
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// One point in the (quality, scale) search space.
///
/// `quality` is normalized to `[0, 1]`, higher meaning larger and more
/// faithful output. `scale` is a uniform factor in `(0, 1]` applied to both
/// axes before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodeParams {
    pub quality: f64,
    pub scale: f64,
}

impl EncodeParams {
    pub fn new(quality: f64, scale: f64) -> Self {
        Self { quality, scale }
    }

    /// Whether both knobs are inside the ranges every encoder accepts.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.quality) && self.scale > 0.0 && self.scale <= 1.0
    }
}

/// The output of a single encode call.
///
/// Created once per probe and never mutated; the search hands ownership of
/// the winning artifact to the caller.
#[derive(Clone, PartialEq)]
pub struct EncodedArtifact {
    bytes: Vec<u8>,
    params: EncodeParams,
    width: u32,
    height: u32,
}

impl EncodedArtifact {
    /// Wrap encoded bytes together with the parameters and output
    /// dimensions that produced them.
    pub fn new(bytes: Vec<u8>, params: EncodeParams, width: u32, height: u32) -> Self {
        Self {
            bytes,
            params,
            width,
            height,
        }
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encoded size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    #[inline]
    pub fn params(&self) -> EncodeParams {
        self.params
    }

    /// Pixel dimensions of the encoded image after scaling.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

// Printing the payload would flood logs with megabytes of hex.
impl fmt::Debug for EncodedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedArtifact")
            .field("size", &self.size())
            .field("params", &self.params)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

//! QuickPic Core - size-targeted image compression
//!
//! This crate re-encodes a raster image until its encoded size lands near a
//! requested byte budget, trading JPEG quality first and pixel dimensions
//! second. Loading files from the user, previews and downloads belong to
//! the embedding application.

pub mod encode;
pub mod search;
pub mod source;
pub mod units;

pub use encode::{EncodeError, EncodeParams, EncodedArtifact, JpegReEncoder, ReEncoder};
pub use search::{find, SearchError, SearchLimits, SearchReport, SizeSearch, TargetSpec};
pub use source::{decode_image, ColorModel, FilterType, SourceError, SourceImage};
pub use units::{reduced_filename, target_bytes, SizeUnit, UnknownUnit};

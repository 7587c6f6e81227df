//! Size-targeted re-encoding search.
//!
//! Finds `(quality, scale)` parameters whose encoded output lands within a
//! tolerance of a byte budget. Quality is bisected first; the canvas only
//! shrinks once quality alone cannot reach the target, since resampling
//! discards detail for good.
//!
//! # Guarantees
//!
//! - At most `max_iterations` encode calls per search, whatever the codec does
//! - A successful search always returns an artifact; missing the band is an
//!   `Exhausted` outcome, not an error
//! - Searches share no mutable state and can run on separate threads
//!
//! # Examples
//!
//! ```
//! use quickpic_core::search::{SizeSearch, TargetSpec};
//! use quickpic_core::{ColorModel, JpegReEncoder, SourceImage};
//!
//! let image = SourceImage::new(32, 32, ColorModel::Rgb, vec![90u8; 32 * 32 * 3]).unwrap();
//! let encoder = JpegReEncoder::new();
//!
//! let report = SizeSearch::new(&encoder)
//!     .run(&image, TargetSpec::new(2048, 1536).unwrap())
//!     .unwrap();
//! assert!(report.iterations() >= 1);
//! for probe in &report.probes {
//!     println!("#{} q={:.3} size={:?}", probe.iteration, probe.params.quality, probe.size());
//! }
//! ```

mod cancel;
mod controller;
mod error;
mod limits;
mod report;
mod target;

pub use cancel::{CancelSignal, CancelToken};
pub use controller::{find, SizeSearch, MAX_CONSECUTIVE_FAILURES};
pub use error::SearchError;
pub use limits::{SearchLimits, MAX_ITERATIONS_CAP};
pub use report::{ProbeOutcome, ProbeRecord, SearchReport, Termination};
pub use target::{SizeVerdict, TargetSpec};

//! The size-search state machine.
//!
//! Each probe encodes at the midpoint of the current quality bracket. A
//! probe inside the acceptance band ends the search immediately. Otherwise
//! the bracket is bisected toward the target; once it is narrower than the
//! quality granularity the scale ladder moves instead and the bracket is
//! reopened. The first downward scale step aims at the target from the last
//! encoded size, and the first probe at a new scale reuses the quality that
//! just settled. The iteration budget bounds the whole thing regardless of
//! how the codec behaves.

use tracing::{debug, warn};

use super::{
    CancelSignal, ProbeOutcome, ProbeRecord, SearchError, SearchLimits, SearchReport, SizeVerdict,
    TargetSpec, Termination,
};
use crate::encode::{EncodeError, EncodeParams, EncodedArtifact, JpegReEncoder, ReEncoder};
use crate::source::SourceImage;

/// Consecutive encode failures tolerated before the search gives up.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Search for a JPEG of `target_bytes ± tolerance` with the default encoder.
///
/// Returns the first candidate inside the band, or the closest candidate
/// produced once the budget runs out.
///
/// # Errors
///
/// `InvalidTarget` / `InvalidLimits` before any encoding, or
/// `EncoderUnavailable` after three consecutive encode failures.
///
/// # Example
///
/// ```
/// use quickpic_core::{find, ColorModel, SearchLimits, SourceImage};
///
/// let pixels: Vec<u8> = (0..64 * 64 * 3).map(|i| (i % 251) as u8).collect();
/// let image = SourceImage::new(64, 64, ColorModel::Rgb, pixels).unwrap();
///
/// let artifact = find(&image, 4 * 1024, 1024, SearchLimits::default()).unwrap();
/// assert_eq!(&artifact.bytes()[0..2], &[0xFF, 0xD8]);
/// assert!(artifact.params().scale <= 1.0);
/// ```
pub fn find(
    image: &SourceImage,
    target_bytes: u64,
    tolerance: u64,
    limits: SearchLimits,
) -> Result<EncodedArtifact, SearchError> {
    SizeSearch::new(&JpegReEncoder::default())
        .with_limits(limits)
        .find(image, target_bytes, tolerance)
}

/// Drives a `ReEncoder` toward a target size.
///
/// Holds only configuration; every `run` builds and discards its own state,
/// so one `SizeSearch` can serve many images, including from several
/// threads when the encoder is `Sync`.
pub struct SizeSearch<'a, E: ReEncoder + ?Sized> {
    encoder: &'a E,
    limits: SearchLimits,
    cancel: Option<&'a dyn CancelSignal>,
}

impl<'a, E: ReEncoder + ?Sized> SizeSearch<'a, E> {
    pub fn new(encoder: &'a E) -> Self {
        Self {
            encoder,
            limits: SearchLimits::default(),
            cancel: None,
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Check `cancel` before every probe.
    pub fn with_cancel(mut self, cancel: &'a dyn CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Run a search and return only the chosen artifact.
    pub fn find(
        &self,
        image: &SourceImage,
        target_bytes: u64,
        tolerance: u64,
    ) -> Result<EncodedArtifact, SearchError> {
        let target = TargetSpec::new(target_bytes, tolerance)?;
        self.run(image, target).map(|report| report.artifact)
    }

    /// Run a search and return the chosen artifact with its probe trail.
    pub fn run(
        &self,
        image: &SourceImage,
        target: TargetSpec,
    ) -> Result<SearchReport, SearchError> {
        self.limits.validate()?;

        let mut state = SearchState::new(self.limits, target.target_bytes());
        let mut probes: Vec<ProbeRecord> = Vec::with_capacity(self.limits.max_iterations as usize);
        let mut consecutive_failures = 0u32;
        let mut last_error: Option<EncodeError> = None;

        debug!(
            target_bytes = target.target_bytes(),
            tolerance = target.tolerance(),
            width = image.width(),
            height = image.height(),
            "starting size search"
        );

        while (probes.len() as u32) < self.limits.max_iterations {
            if self.cancel.is_some_and(|signal| signal.is_cancelled()) {
                debug!(iterations = probes.len(), "size search cancelled");
                return Err(SearchError::Cancelled {
                    iterations: probes.len() as u32,
                    best: state.best.map(Box::new),
                    probes,
                });
            }

            let iteration = probes.len() as u32 + 1;
            let params = state.next_params();

            let step = match self.encoder.encode(image, params) {
                Ok(artifact) => {
                    consecutive_failures = 0;
                    let size = artifact.size();
                    let verdict = target.classify(size);
                    debug!(
                        iteration,
                        quality = params.quality,
                        scale = params.scale,
                        size,
                        verdict = ?verdict,
                        "probe encoded"
                    );

                    let distance = target.distance(size);
                    probes.push(ProbeRecord {
                        iteration,
                        params,
                        outcome: ProbeOutcome::Encoded { size, verdict },
                        best_distance: Some(state.best_distance().map_or(distance, |d| d.min(distance))),
                    });

                    if verdict == SizeVerdict::InBand {
                        debug!(iteration, size, "size search accepted");
                        return Ok(SearchReport {
                            artifact,
                            termination: Termination::Accepted,
                            probes,
                        });
                    }

                    state.consider(artifact, distance);
                    state.settle(params.quality, verdict, size)
                }
                Err(err) => {
                    consecutive_failures += 1;
                    warn!(
                        iteration,
                        quality = params.quality,
                        scale = params.scale,
                        consecutive_failures,
                        error = %err,
                        "probe failed, skipping candidate"
                    );
                    probes.push(ProbeRecord {
                        iteration,
                        params,
                        outcome: ProbeOutcome::Failed {
                            reason: err.to_string(),
                        },
                        best_distance: state.best_distance(),
                    });

                    if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                        return Err(SearchError::EncoderUnavailable {
                            failures: consecutive_failures,
                            last: err,
                        });
                    }
                    last_error = Some(err);
                    state.avoid(params.quality)
                }
            };

            if step == Step::Stop {
                break;
            }
        }

        // Only reachable without a candidate when a budget under three
        // probes was spent entirely on failures.
        let Some(artifact) = state.best else {
            return Err(match last_error {
                Some(last) => SearchError::EncoderUnavailable {
                    failures: consecutive_failures,
                    last,
                },
                None => SearchError::InvalidLimits("no probes were run".to_string()),
            });
        };

        debug!(
            iterations = probes.len(),
            size = artifact.size(),
            quality = artifact.params().quality,
            scale = artifact.params().scale,
            "size search exhausted, returning closest candidate"
        );

        Ok(SearchReport {
            artifact,
            termination: Termination::Exhausted,
            probes,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Stop,
}

/// A successful probe at the current scale.
#[derive(Debug, Clone, Copy)]
struct Landmark {
    quality: f64,
    verdict: SizeVerdict,
    size: u64,
}

/// Working state of one `run`.
struct SearchState {
    limits: SearchLimits,
    target_bytes: u64,
    q_low: f64,
    q_high: f64,
    /// Bounds the bracket reopens to after a scale move. Encode failures
    /// tighten them so a failing region is never probed again.
    q_floor: f64,
    q_ceiling: f64,
    scale: f64,
    /// Largest scale known to come out too small once quality settled.
    scale_too_small: Option<f64>,
    /// Smallest scale known to come out too large once quality settled.
    scale_too_large: Option<f64>,
    /// Most recent successful probe at the current scale.
    last_success: Option<Landmark>,
    /// Failed quality not yet explained by a success at this scale.
    unexplained_failure: Option<f64>,
    /// Quality for the first probe after a scale move.
    seed: Option<f64>,
    best: Option<EncodedArtifact>,
    best_distance: Option<u64>,
}

impl SearchState {
    fn new(limits: SearchLimits, target_bytes: u64) -> Self {
        Self {
            limits,
            target_bytes,
            q_low: limits.q_min,
            q_high: limits.q_max,
            q_floor: limits.q_min,
            q_ceiling: limits.q_max,
            scale: 1.0,
            scale_too_small: None,
            scale_too_large: None,
            last_success: None,
            unexplained_failure: None,
            seed: None,
            best: None,
            best_distance: None,
        }
    }

    /// Midpoint of the bracket, or the seeded quality right after a scale move.
    fn next_params(&mut self) -> EncodeParams {
        let quality = match self.seed.take() {
            Some(seed) => seed.clamp(self.q_low, self.q_high),
            None => (self.q_low + self.q_high) / 2.0,
        };
        EncodeParams::new(quality, self.scale)
    }

    fn quality_settled(&self) -> bool {
        self.q_high - self.q_low <= self.limits.quality_granularity
    }

    fn best_distance(&self) -> Option<u64> {
        self.best_distance
    }

    /// Keep `artifact` if it is strictly closer than the running best.
    fn consider(&mut self, artifact: EncodedArtifact, distance: u64) {
        if self.best_distance.map_or(true, |best| distance < best) {
            self.best = Some(artifact);
            self.best_distance = Some(distance);
        }
    }

    /// Narrow the bracket after an out-of-band probe at `quality`, or move
    /// the scale once quality has nothing left to give.
    fn settle(&mut self, quality: f64, verdict: SizeVerdict, size: u64) -> Step {
        // A success below an earlier failure puts that failure above the
        // usable range.
        if let Some(failed) = self.unexplained_failure.take() {
            if quality < failed {
                self.q_ceiling = self.q_ceiling.min(failed).max(self.q_floor);
            }
        }
        self.last_success = Some(Landmark {
            quality,
            verdict,
            size,
        });

        match verdict {
            SizeVerdict::InBand => Step::Stop,
            SizeVerdict::TooLarge if !self.quality_settled() => {
                self.q_high = quality;
                Step::Continue
            }
            SizeVerdict::TooSmall if !self.quality_settled() => {
                self.q_low = quality;
                Step::Continue
            }
            SizeVerdict::TooLarge => self.shrink_scale(),
            SizeVerdict::TooSmall => self.grow_scale(),
        }
    }

    /// Fence off a failed probe at `quality`, keeping every quality between
    /// it and the last success searchable.
    fn avoid(&mut self, quality: f64) -> Step {
        let Some(last) = self.last_success else {
            match self.unexplained_failure.take() {
                // First failure with nothing to compare against: look below it.
                None => {
                    self.unexplained_failure = Some(quality);
                    self.q_high = quality;
                }
                // Below failed as well: give up on everything up to the
                // first failure and look above it.
                Some(first) => {
                    self.q_floor = self.q_floor.max(first).min(self.q_ceiling);
                    self.q_low = self.q_floor;
                    self.q_high = self.q_ceiling;
                }
            }
            return Step::Continue;
        };

        if quality < last.quality {
            self.q_floor = self.q_floor.max(quality).min(self.q_ceiling);
            self.q_low = self.q_low.max(quality);
        } else {
            self.q_ceiling = self.q_ceiling.min(quality).max(self.q_floor);
            self.q_high = self.q_high.min(quality);
        }

        if !self.quality_settled() {
            return Step::Continue;
        }
        match last.verdict {
            SizeVerdict::TooLarge => self.shrink_scale(),
            SizeVerdict::TooSmall => self.grow_scale(),
            SizeVerdict::InBand => Step::Stop,
        }
    }

    fn shrink_scale(&mut self) -> Step {
        let scale_min = self.limits.scale_min;
        if self.scale <= scale_min {
            return Step::Stop;
        }

        let next = match self.scale_too_small {
            Some(low) if self.scale - low <= self.limits.scale_granularity => return Step::Stop,
            Some(low) => (low + self.scale) / 2.0,
            None => self.aimed_scale(),
        };

        self.scale_too_large = Some(self.scale);
        self.move_scale(next.max(scale_min));
        Step::Continue
    }

    /// Scale expected to bring the last size onto the target, taking the
    /// encoded size as proportional to pixel count. Always a real step down.
    fn aimed_scale(&self) -> f64 {
        let aimed = match self.last_success {
            Some(last) if last.size > 0 => {
                self.scale * (self.target_bytes as f64 / last.size as f64).sqrt()
            }
            _ => self.scale / 2.0,
        };
        aimed.min(self.scale - self.limits.scale_granularity)
    }

    fn grow_scale(&mut self) -> Step {
        if self.scale >= 1.0 {
            return Step::Stop;
        }

        let high = self.scale_too_large.unwrap_or(1.0);
        if high - self.scale <= self.limits.scale_granularity {
            return Step::Stop;
        }

        self.scale_too_small = Some(self.scale);
        self.move_scale(((self.scale + high) / 2.0).min(1.0));
        Step::Continue
    }

    /// Reopen the bracket at `scale`, starting from the quality that just
    /// settled.
    fn move_scale(&mut self, scale: f64) {
        debug!(from = self.scale, to = scale, "quality settled, moving scale");
        self.scale = scale;
        self.q_low = self.q_floor;
        self.q_high = self.q_ceiling;
        self.seed = self.last_success.map(|last| last.quality);
        self.last_success = None;
        self.unexplained_failure = None;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::source::{scaled_dimensions, ColorModel};
    use proptest::prelude::*;

    /// Monotone model with a content-dependent slope.
    struct SlopedEncoder {
        width: u32,
        height: u32,
        detail: f64,
    }

    impl ReEncoder for SlopedEncoder {
        fn encode(
            &self,
            _image: &SourceImage,
            params: EncodeParams,
        ) -> Result<EncodedArtifact, EncodeError> {
            let (w, h) = scaled_dimensions(self.width, self.height, params.scale);
            let bpp = 0.05 + self.detail * params.quality.powf(1.5);
            let size = 400 + (w as f64 * h as f64 * bpp / 8.0) as u64;
            Ok(EncodedArtifact::new(vec![0u8; size as usize], params, w, h))
        }
    }

    fn placeholder() -> SourceImage {
        SourceImage::new(1, 1, ColorModel::Rgb, vec![0, 0, 0]).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: every search terminates within budget, lands in band
        /// when it says so, and never lets its best distance regress.
        #[test]
        fn prop_search_is_bounded_and_consistent(
            width in 1u32..=4000,
            height in 1u32..=3000,
            detail in 0.5f64..=4.0,
            target_bytes in 1024u64..=50 * 1024 * 1024,
            tolerance_pct in 0u64..=5,
        ) {
            let encoder = SlopedEncoder { width, height, detail };
            let limits = SearchLimits::default();
            let target = TargetSpec::new(target_bytes, target_bytes * tolerance_pct / 100).unwrap();

            let report = SizeSearch::new(&encoder)
                .with_limits(limits)
                .run(&placeholder(), target)
                .unwrap();

            prop_assert!(report.iterations() >= 1);
            prop_assert!(report.iterations() <= limits.max_iterations);

            if report.is_accepted() {
                prop_assert!(report.artifact.size().abs_diff(target_bytes) <= target.tolerance());
            }

            let distances: Vec<u64> = report.probes.iter().filter_map(|p| p.best_distance).collect();
            prop_assert!(distances.windows(2).all(|w| w[1] <= w[0]));

            for probe in &report.probes {
                prop_assert!(probe.params.quality >= limits.q_min && probe.params.quality <= limits.q_max);
                prop_assert!(probe.params.scale >= limits.scale_min && probe.params.scale <= 1.0);
            }

            if !report.is_accepted() {
                let closest = report
                    .probes
                    .iter()
                    .filter_map(|p| p.size())
                    .map(|s| s.abs_diff(target_bytes))
                    .min()
                    .unwrap();
                prop_assert_eq!(report.artifact.size().abs_diff(target_bytes), closest);
            }
        }

        /// Property: any iteration budget is honored, however small.
        #[test]
        fn prop_budget_is_hard_limit(
            max_iterations in 1u32..=40,
            target_bytes in 1u64..=10_000_000,
        ) {
            let encoder = SlopedEncoder { width: 2000, height: 2000, detail: 2.0 };
            let limits = SearchLimits { max_iterations, ..SearchLimits::default() };
            let target = TargetSpec::new(target_bytes, 0).unwrap();

            let report = SizeSearch::new(&encoder)
                .with_limits(limits)
                .run(&placeholder(), target)
                .unwrap();
            prop_assert!(report.iterations() <= max_iterations);
        }
    }
}

use serde::{Deserialize, Serialize};

use super::SearchError;

/// Hard ceiling on `max_iterations`; a search must stay cheap to bound.
pub const MAX_ITERATIONS_CAP: u32 = 256;

/// Bounds and step sizes for one search.
///
/// Deserializes from partial input: any omitted field keeps its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Lowest quality probed (0.0 to 1.0)
    pub q_min: f64,
    /// Highest quality probed (0.0 to 1.0)
    pub q_max: f64,
    /// Smallest scale factor the ladder may reach (0.0 exclusive to 1.0)
    pub scale_min: f64,
    /// Total encode budget, failed probes included
    pub max_iterations: u32,
    /// Quality bracket width below which quality is considered settled
    pub quality_granularity: f64,
    /// Scale bracket width below which the ladder stops
    pub scale_granularity: f64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            q_min: 0.05,
            q_max: 0.95,
            scale_min: 0.1,
            max_iterations: 24,
            quality_granularity: 0.01,
            scale_granularity: 0.01,
        }
    }
}

impl SearchLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every bound is finite and ordered.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidLimits` naming the first offending field.
    pub fn validate(&self) -> Result<(), SearchError> {
        let invalid = |msg: String| Err(SearchError::InvalidLimits(msg));

        if !(self.q_min.is_finite() && self.q_max.is_finite())
            || self.q_min < 0.0
            || self.q_max > 1.0
            || self.q_min >= self.q_max
        {
            return invalid(format!(
                "quality range [{}, {}] must satisfy 0 <= q_min < q_max <= 1",
                self.q_min, self.q_max
            ));
        }
        if !(self.scale_min > 0.0 && self.scale_min <= 1.0) {
            return invalid(format!("scale_min {} must be in (0, 1]", self.scale_min));
        }
        if self.max_iterations == 0 || self.max_iterations > MAX_ITERATIONS_CAP {
            return invalid(format!(
                "max_iterations {} must be in 1..={}",
                self.max_iterations, MAX_ITERATIONS_CAP
            ));
        }
        if !(self.quality_granularity > 0.0 && self.quality_granularity.is_finite()) {
            return invalid(format!(
                "quality_granularity {} must be positive",
                self.quality_granularity
            ));
        }
        if !(self.scale_granularity > 0.0 && self.scale_granularity.is_finite()) {
            return invalid(format!(
                "scale_granularity {} must be positive",
                self.scale_granularity
            ));
        }
        Ok(())
    }
}

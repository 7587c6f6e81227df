use serde::{Deserialize, Serialize};

use super::SearchError;

/// Where an encoded size falls relative to the acceptance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeVerdict {
    TooSmall,
    InBand,
    TooLarge,
}

/// A target size with a symmetric tolerance.
///
/// Accepts sizes in `[target_bytes - tolerance, target_bytes + tolerance]`,
/// both ends inclusive. The lower end saturates at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    target_bytes: u64,
    tolerance: u64,
}

impl TargetSpec {
    /// # Errors
    ///
    /// Returns `SearchError::InvalidTarget` when `target_bytes` is zero.
    pub fn new(target_bytes: u64, tolerance: u64) -> Result<Self, SearchError> {
        if target_bytes == 0 {
            return Err(SearchError::InvalidTarget(
                "target size must be at least 1 byte".to_string(),
            ));
        }
        Ok(Self {
            target_bytes,
            tolerance,
        })
    }

    /// Target with a tolerance a real codec can usually hit: 2% of the
    /// target, at least 1 KiB, but never more than a quarter of the target.
    pub fn with_default_tolerance(target_bytes: u64) -> Result<Self, SearchError> {
        let tolerance = (target_bytes / 50).max(1024).min(target_bytes / 4);
        Self::new(target_bytes, tolerance)
    }

    #[inline]
    pub fn target_bytes(&self) -> u64 {
        self.target_bytes
    }

    #[inline]
    pub fn tolerance(&self) -> u64 {
        self.tolerance
    }

    /// Inclusive `(low, high)` acceptance range.
    pub fn band(&self) -> (u64, u64) {
        (
            self.target_bytes.saturating_sub(self.tolerance),
            self.target_bytes.saturating_add(self.tolerance),
        )
    }

    pub fn contains(&self, size: u64) -> bool {
        let (low, high) = self.band();
        (low..=high).contains(&size)
    }

    /// Absolute distance from the target, ignoring the tolerance.
    pub fn distance(&self, size: u64) -> u64 {
        size.abs_diff(self.target_bytes)
    }

    pub fn classify(&self, size: u64) -> SizeVerdict {
        let (low, high) = self.band();
        if size > high {
            SizeVerdict::TooLarge
        } else if size < low {
            SizeVerdict::TooSmall
        } else {
            SizeVerdict::InBand
        }
    }
}

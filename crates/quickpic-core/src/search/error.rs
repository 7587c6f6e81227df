use thiserror::Error;

use super::ProbeRecord;
use crate::encode::{EncodeError, EncodedArtifact};

/// Conditions that end a search without a result.
///
/// Missing the acceptance band is not an error: an exhausted search still
/// returns its closest candidate.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Target size is zero or otherwise unusable.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Search limits are inverted, non-finite or unbounded.
    #[error("Invalid search limits: {0}")]
    InvalidLimits(String),

    /// The encoder failed on several consecutive probes.
    #[error("Encoder unavailable after {failures} consecutive failures")]
    EncoderUnavailable {
        failures: u32,
        #[source]
        last: EncodeError,
    },

    /// The cancellation signal fired between iterations.
    #[error("Search cancelled after {iterations} iterations")]
    Cancelled {
        iterations: u32,
        best: Option<Box<EncodedArtifact>>,
        /// Probes made before the signal fired
        probes: Vec<ProbeRecord>,
    },
}

impl SearchError {
    /// Take the best candidate out of a cancelled search, if there was one.
    pub fn into_best(self) -> Option<EncodedArtifact> {
        match self {
            SearchError::Cancelled { best, .. } => best.map(|b| *b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::EncodeParams;
    use std::error::Error as _;

    #[test]
    fn test_search_error_display() {
        let err = SearchError::InvalidTarget("target must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid target: target must be positive");

        let err = SearchError::Cancelled {
            iterations: 4,
            best: None,
            probes: Vec::new(),
        };
        assert_eq!(err.to_string(), "Search cancelled after 4 iterations");
    }

    #[test]
    fn test_encoder_unavailable_keeps_source() {
        let err = SearchError::EncoderUnavailable {
            failures: 3,
            last: EncodeError::Rejected("quality too low".to_string()),
        };

        let source = err.source().expect("source should be attached");
        assert_eq!(source.to_string(), "Codec rejected parameters: quality too low");
    }

    #[test]
    fn test_into_best() {
        let artifact = EncodedArtifact::new(vec![1, 2], EncodeParams::new(0.5, 1.0), 1, 1);
        let err = SearchError::Cancelled {
            iterations: 1,
            best: Some(Box::new(artifact)),
            probes: Vec::new(),
        };
        assert_eq!(err.into_best().map(|a| a.size()), Some(2));

        let err = SearchError::InvalidLimits("x".to_string());
        assert!(err.into_best().is_none());
    }
}

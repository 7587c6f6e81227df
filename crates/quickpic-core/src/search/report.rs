//! Telemetry collected while a search runs.

use serde::Serialize;

use super::SizeVerdict;
use crate::encode::{EncodeParams, EncodedArtifact};

/// How a successful search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A probe landed inside the acceptance band.
    Accepted,
    /// The budget or the scale ladder ran out; the closest candidate wins.
    Exhausted,
}

/// Result of a single probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Encoded { size: u64, verdict: SizeVerdict },
    Failed { reason: String },
}

/// One encode attempt, in the order it was made.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeRecord {
    /// 1-based probe number
    pub iteration: u32,
    pub params: EncodeParams,
    pub outcome: ProbeOutcome,
    /// Best distance to the target after this probe, if any probe succeeded
    pub best_distance: Option<u64>,
}

impl ProbeRecord {
    /// Encoded size, or `None` for a failed probe.
    pub fn size(&self) -> Option<u64> {
        match self.outcome {
            ProbeOutcome::Encoded { size, .. } => Some(size),
            ProbeOutcome::Failed { .. } => None,
        }
    }
}

/// The artifact a search settled on, with the trail that led to it.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub artifact: EncodedArtifact,
    pub termination: Termination,
    pub probes: Vec<ProbeRecord>,
}

impl SearchReport {
    /// Number of encode calls made, failed ones included.
    pub fn iterations(&self) -> u32 {
        self.probes.len() as u32
    }

    pub fn is_accepted(&self) -> bool {
        self.termination == Termination::Accepted
    }
}

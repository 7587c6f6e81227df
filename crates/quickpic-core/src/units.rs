//! User-facing size units and output file naming.
//!
//! Target sizes arrive as a number plus a unit picked in the UI; kilobytes
//! and megabytes are binary (1 KB = 1024 bytes).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::SearchError;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown size unit: {0:?} (expected B, KB or MB)")]
pub struct UnknownUnit(pub String);

/// Unit of a user-entered target size.
///
/// Parsing is case-insensitive and ignores surrounding whitespace. Besides
/// `B`, `KB` and `MB` it accepts the short forms `K`/`M` and the IEC names
/// `KiB`/`MiB`, which mean the same binary multiples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeUnit {
    Bytes,
    #[default]
    Kilobytes,
    Megabytes,
}

impl SizeUnit {
    pub fn bytes_per_unit(self) -> u64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilobytes => 1024,
            SizeUnit::Megabytes => 1024 * 1024,
        }
    }
}

impl FromStr for SizeUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B" => Ok(SizeUnit::Bytes),
            "KB" | "K" | "KIB" => Ok(SizeUnit::Kilobytes),
            "MB" | "M" | "MIB" => Ok(SizeUnit::Megabytes),
            _ => Err(UnknownUnit(s.to_string())),
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SizeUnit::Bytes => "B",
            SizeUnit::Kilobytes => "KB",
            SizeUnit::Megabytes => "MB",
        })
    }
}

/// Convert a user-entered amount to whole bytes.
///
/// Fractional amounts are allowed ("1.5 MB") and rounded to the nearest byte.
///
/// # Errors
///
/// Returns `SearchError::InvalidTarget` for non-finite amounts or anything
/// that rounds to zero bytes.
pub fn target_bytes(value: f64, unit: SizeUnit) -> Result<u64, SearchError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SearchError::InvalidTarget(format!(
            "size must be a positive number, got {} {}",
            value, unit
        )));
    }

    let bytes = (value * unit.bytes_per_unit() as f64).round();
    if bytes < 1.0 || bytes >= u64::MAX as f64 {
        return Err(SearchError::InvalidTarget(format!(
            "{} {} is out of range",
            value, unit
        )));
    }
    Ok(bytes as u64)
}

/// Download name for a size-reduced image, e.g. `QuickPic_200kb_holiday.jpg`.
pub fn reduced_filename(original: &str, target_kb: u64) -> String {
    let stem = original.split('.').next().unwrap_or_default();
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("QuickPic_{}kb_{}.jpg", target_kb, stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!("KB".parse::<SizeUnit>(), Ok(SizeUnit::Kilobytes));
        assert_eq!("kb".parse::<SizeUnit>(), Ok(SizeUnit::Kilobytes));
        assert_eq!(" MB ".parse::<SizeUnit>(), Ok(SizeUnit::Megabytes));
        assert_eq!("b".parse::<SizeUnit>(), Ok(SizeUnit::Bytes));
        assert!("GB".parse::<SizeUnit>().is_err());
    }

    #[test]
    fn test_parse_unit_aliases() {
        assert_eq!("k".parse::<SizeUnit>(), Ok(SizeUnit::Kilobytes));
        assert_eq!("KiB".parse::<SizeUnit>(), Ok(SizeUnit::Kilobytes));
        assert_eq!("M".parse::<SizeUnit>(), Ok(SizeUnit::Megabytes));
        assert_eq!("mib".parse::<SizeUnit>(), Ok(SizeUnit::Megabytes));
        assert!("kbit".parse::<SizeUnit>().is_err());
    }

    #[test]
    fn test_unit_display_round_trips() {
        for unit in [SizeUnit::Bytes, SizeUnit::Kilobytes, SizeUnit::Megabytes] {
            assert_eq!(unit.to_string().parse::<SizeUnit>(), Ok(unit));
        }
    }

    #[test]
    fn test_target_bytes_binary_units() {
        assert_eq!(target_bytes(200.0, SizeUnit::Kilobytes).unwrap(), 204_800);
        assert_eq!(target_bytes(2.0, SizeUnit::Megabytes).unwrap(), 2_097_152);
        assert_eq!(target_bytes(1.5, SizeUnit::Megabytes).unwrap(), 1_572_864);
        assert_eq!(target_bytes(512.0, SizeUnit::Bytes).unwrap(), 512);
    }

    #[test]
    fn test_target_bytes_rejects_nonsense() {
        for value in [0.0, -5.0, f64::NAN, f64::INFINITY, 0.2] {
            let result = target_bytes(value, SizeUnit::Bytes);
            assert!(
                matches!(result, Err(SearchError::InvalidTarget(_))),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_reduced_filename() {
        assert_eq!(
            reduced_filename("holiday.png", 200),
            "QuickPic_200kb_holiday.jpg"
        );
        assert_eq!(
            reduced_filename("scan.final.jpeg", 50),
            "QuickPic_50kb_scan.jpg"
        );
        assert_eq!(reduced_filename("noext", 10), "QuickPic_10kb_noext.jpg");
        assert_eq!(reduced_filename(".hidden", 10), "QuickPic_10kb_image.jpg");
    }
}

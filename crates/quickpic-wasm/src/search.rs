//! Size-targeted compression WASM bindings.
//!
//! # Functions
//!
//! - [`compress_to_target`] - Compress to an exact byte target and tolerance
//! - [`compress_to_size`] - Compress to a size typed by the user ("200", "KB")
//! - [`compress_to_target_cancellable`] - Same as `compress_to_target`, polling a callback
//!
//! Every function takes an optional `limits` object. Missing fields keep their
//! defaults, so `{ max_iterations: 12 }` is a valid override.
//!
//! # Example
//!
//! ```typescript
//! const result = compress_to_target(image, 200 * 1024, 4096, { scale_min: 0.25 });
//! console.log(`${result.size} bytes at q=${result.quality}, ${result.width}x${result.height}`);
//! for (const probe of result.telemetry()) {
//!   console.log(probe.iteration, probe.params.quality, probe.outcome.kind);
//! }
//! ```

use crate::types::JsSourceImage;
use quickpic_core::search::{CancelSignal, ProbeRecord, Termination};
use quickpic_core::{
    EncodeParams, EncodedArtifact, JpegReEncoder, SearchError, SearchLimits, SearchReport,
    SizeSearch, SizeUnit, SourceImage, TargetSpec,
};
use wasm_bindgen::prelude::*;

/// Outcome of a size search.
///
/// `accepted` is false when no probe landed inside the band; the bytes are
/// then the closest candidate found. `cancelled` marks a search stopped by
/// its callback, in which case the bytes are the best candidate so far.
#[wasm_bindgen]
pub struct JsSearchResult {
    bytes: Vec<u8>,
    params: EncodeParams,
    width: u32,
    height: u32,
    termination: Termination,
    cancelled: bool,
    probes: Vec<ProbeRecord>,
}

#[wasm_bindgen]
impl JsSearchResult {
    /// Encoded JPEG bytes as a Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f64 {
        self.params.quality
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.params.scale
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn accepted(&self) -> bool {
        self.termination == Termination::Accepted
    }

    #[wasm_bindgen(getter)]
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> u32 {
        self.probes.len() as u32
    }

    /// Every probe in order, as plain objects:
    /// `{ iteration, params: { quality, scale }, outcome: { kind, ... }, best_distance }`.
    pub fn telemetry(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.probes)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize telemetry: {}", e)))
    }
}

impl JsSearchResult {
    fn new(
        artifact: EncodedArtifact,
        termination: Termination,
        cancelled: bool,
        probes: Vec<ProbeRecord>,
    ) -> Self {
        let params = artifact.params();
        let (width, height) = artifact.dimensions();
        Self {
            bytes: artifact.into_bytes(),
            params,
            width,
            height,
            termination,
            cancelled,
            probes,
        }
    }
}

impl From<SearchReport> for JsSearchResult {
    fn from(report: SearchReport) -> Self {
        Self::new(report.artifact, report.termination, false, report.probes)
    }
}

/// Compress `image` to `target_bytes ± tolerance`.
///
/// # Errors
///
/// Returns an error for a non-positive target, a negative tolerance, invalid
/// limits, or an encoder that keeps failing.
#[wasm_bindgen]
pub fn compress_to_target(
    image: &JsSourceImage,
    target_bytes: f64,
    tolerance: f64,
    limits: JsValue,
) -> Result<JsSearchResult, JsValue> {
    let limits = limits_from_js(limits)?;
    let target = target_from_f64(target_bytes, tolerance).map_err(js_error)?;
    run_search(image.source(), target, limits, None).map_err(js_error)
}

/// Compress `image` to a user-entered size such as `200 KB` or `1.5 MB`.
///
/// The tolerance is derived from the target (2%, at least 1 KB).
#[wasm_bindgen]
pub fn compress_to_size(
    image: &JsSourceImage,
    value: f64,
    unit: &str,
    limits: JsValue,
) -> Result<JsSearchResult, JsValue> {
    let limits = limits_from_js(limits)?;
    let target = target_from_size(value, unit).map_err(|e| JsValue::from_str(&e))?;
    run_search(image.source(), target, limits, None).map_err(js_error)
}

/// Like [`compress_to_target`], calling `should_cancel()` before every probe.
///
/// A truthy return stops the search. The best candidate so far comes back
/// with `cancelled` set; cancelling before the first probe is an error. A
/// throwing callback counts as "keep going".
#[wasm_bindgen]
pub fn compress_to_target_cancellable(
    image: &JsSourceImage,
    target_bytes: f64,
    tolerance: f64,
    limits: JsValue,
    should_cancel: &js_sys::Function,
) -> Result<JsSearchResult, JsValue> {
    let limits = limits_from_js(limits)?;
    let target = target_from_f64(target_bytes, tolerance).map_err(js_error)?;
    let signal = || {
        should_cancel
            .call0(&JsValue::NULL)
            .map(|v| v.is_truthy())
            .unwrap_or(false)
    };
    run_search(image.source(), target, limits, Some(&signal)).map_err(js_error)
}

fn run_search(
    image: &SourceImage,
    target: TargetSpec,
    limits: SearchLimits,
    cancel: Option<&dyn CancelSignal>,
) -> Result<JsSearchResult, SearchError> {
    let encoder = JpegReEncoder::default();
    let mut search = SizeSearch::new(&encoder).with_limits(limits);
    if let Some(cancel) = cancel {
        search = search.with_cancel(cancel);
    }

    let report = match search.run(image, target) {
        Ok(report) => report,
        Err(SearchError::Cancelled {
            best: Some(best),
            probes,
            ..
        }) => {
            return Ok(JsSearchResult::new(
                *best,
                Termination::Exhausted,
                true,
                probes,
            ));
        }
        Err(err) => return Err(err),
    };
    log_summary(&report, target);
    Ok(report.into())
}

fn target_from_f64(target_bytes: f64, tolerance: f64) -> Result<TargetSpec, SearchError> {
    if !target_bytes.is_finite() || target_bytes < 1.0 {
        return Err(SearchError::InvalidTarget(format!(
            "target must be at least 1 byte, got {}",
            target_bytes
        )));
    }
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(SearchError::InvalidTarget(format!(
            "tolerance must be non-negative, got {}",
            tolerance
        )));
    }
    TargetSpec::new(target_bytes.round() as u64, tolerance.round() as u64)
}

fn target_from_size(value: f64, unit: &str) -> Result<TargetSpec, String> {
    let unit: SizeUnit = unit.parse().map_err(|e: quickpic_core::UnknownUnit| e.to_string())?;
    let bytes = quickpic_core::target_bytes(value, unit).map_err(|e| e.to_string())?;
    TargetSpec::with_default_tolerance(bytes).map_err(|e| e.to_string())
}

fn limits_from_js(value: JsValue) -> Result<SearchLimits, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(SearchLimits::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid search limits: {}", e)))
}

fn js_error(e: SearchError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[cfg(target_arch = "wasm32")]
fn log_summary(report: &SearchReport, target: TargetSpec) {
    let params = report.artifact.params();
    let line = format!(
        "quickpic: {} bytes (target {} ± {}) at q={:.2} scale={:.2} after {} probes{}",
        report.artifact.size(),
        target.target_bytes(),
        target.tolerance(),
        params.quality,
        params.scale,
        report.iterations(),
        if report.is_accepted() { "" } else { ", closest match" }
    );
    web_sys::console::log_1(&JsValue::from_str(&line));
}

#[cfg(not(target_arch = "wasm32"))]
fn log_summary(_report: &SearchReport, _target: TargetSpec) {}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Serialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct PartialLimits {
        max_iterations: u32,
    }

    fn gray_image() -> JsSourceImage {
        JsSourceImage::new(32, 32, vec![128u8; 32 * 32 * 4], 4).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_compress_with_default_limits() {
        let result = compress_to_target(&gray_image(), 800.0, 400.0, JsValue::UNDEFINED).unwrap();
        assert!(result.iterations() >= 1);
    }

    #[wasm_bindgen_test]
    fn test_partial_limits_override() {
        let limits = serde_wasm_bindgen::to_value(&PartialLimits { max_iterations: 2 }).unwrap();
        let result = compress_to_target(&gray_image(), 1_000_000.0, 10.0, limits).unwrap();
        assert!(result.iterations() <= 2);
        assert!(!result.accepted());
    }

    #[wasm_bindgen_test]
    fn test_invalid_limits_rejected() {
        let limits = serde_wasm_bindgen::to_value(&"nope").unwrap();
        assert!(compress_to_target(&gray_image(), 800.0, 100.0, limits).is_err());
    }

    #[wasm_bindgen_test]
    fn test_compress_to_size_units() {
        let result = compress_to_size(&gray_image(), 1.0, "KB", JsValue::NULL).unwrap();
        assert!(result.size() > 0);
        assert!(compress_to_size(&gray_image(), 1.0, "parsecs", JsValue::NULL).is_err());
    }

    #[wasm_bindgen_test]
    fn test_cancel_callback() {
        let cancel = js_sys::Function::new_no_args("return true;");
        let result =
            compress_to_target_cancellable(&gray_image(), 800.0, 100.0, JsValue::NULL, &cancel);
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_telemetry_matches_iterations() {
        let result = compress_to_target(&gray_image(), 800.0, 100.0, JsValue::NULL).unwrap();
        let telemetry = js_sys::Array::from(&result.telemetry().unwrap());
        assert_eq!(telemetry.length(), result.iterations());
    }
}

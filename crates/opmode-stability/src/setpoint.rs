//! Setpoint (Phase-1) stability detection
//!
//! A setpoint is considered flat where the least-squares slope of its
//! standardized values, taken over a centered rolling window, stays below a
//! fixed threshold. Standardizing first makes the threshold independent of
//! engineering units.

use crate::types::{StabilityParameters, MIN_WINDOW_POINTS};
use opmode_core::{extract_contiguous_regions, stats, Segment};
use tracing::trace;

/// Z-score a series against the mean/std of its finite samples
///
/// A series with zero spread maps to all zeros. Non-finite samples stay NaN.
pub fn standardize(values: &[f64]) -> Vec<f64> {
    let valid = stats::finite_values(values);
    let mean = stats::mean(&valid);
    let std = stats::population_std(&valid);

    values
        .iter()
        .map(|&x| {
            if !x.is_finite() {
                f64::NAN
            } else if std == 0.0 {
                0.0
            } else {
                (x - mean) / std
            }
        })
        .collect()
}

/// Slope of a centered window around every sample
///
/// The window spans `half_window` samples on either side, clipped at the
/// series boundaries. Windows with fewer than three points get slope 0.
pub fn rolling_slopes(values: &[f64], half_window: usize) -> Vec<f64> {
    let n = values.len();
    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half_window);
            let end = (i + half_window + 1).min(n);
            if end - start >= MIN_WINDOW_POINTS {
                stats::linear_slope(&values[start..end])
            } else {
                0.0
            }
        })
        .collect()
}

/// Stretches where the setpoint is flat
///
/// Returns an empty list for series shorter than the window.
pub fn detect_sp_stable_segments(sp: &[f64], params: &StabilityParameters) -> Vec<Segment> {
    if sp.len() < params.window_size {
        return Vec::new();
    }

    let standardized = standardize(sp);
    let slopes = rolling_slopes(&standardized, params.half_window());

    // NaN slopes (windows touching invalid samples) compare false
    let stable: Vec<bool> = slopes
        .iter()
        .map(|s| s.abs() < params.slope_threshold)
        .collect();

    let regions = extract_contiguous_regions(&stable, params.min_segment_length);
    trace!(samples = sp.len(), regions = regions.len(), "setpoint stability");
    regions
}

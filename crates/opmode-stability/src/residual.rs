//! Residual (Phase-2) stability detection
//!
//! Within the flat-setpoint regions found by Phase-1 the PV − SP residual
//! is checked against statistical control limits. Two passes are made: a
//! fixed-width pass that only serves to clean spikes, then a pass whose width
//! adapts to how noisy the cleaned residual is. Each region is finally split
//! wherever the residual leaves the adaptive limits.

use crate::adaptive::adaptive_k;
use crate::outliers::{replace_isolated_outliers, replace_short_outliers};
use crate::types::{ControlLimits, PvStabilityResult, StabilityParameters};
use opmode_core::{split_at_flags, stats, Error, Result, Segment};
use tracing::trace;

/// PV − SP for every sample
pub fn residuals(pv: &[f64], sp: &[f64]) -> Result<Vec<f64>> {
    if pv.len() != sp.len() {
        return Err(Error::size_mismatch(sp.len(), pv.len(), "PV/SP series"));
    }
    Ok(pv.iter().zip(sp).map(|(p, s)| p - s).collect())
}

/// Finite residuals covered by `regions`, in region order
fn pool(residuals: &[f64], regions: &[Segment]) -> Vec<f64> {
    regions
        .iter()
        .flat_map(|seg| seg.slice(residuals).iter().copied())
        .filter(|r| r.is_finite())
        .collect()
}

/// Refine Phase-1 regions into segments where the residual is in control
///
/// Returns the default no-op result when `phase1` is empty. Fails when the
/// series lengths differ or a region lies outside the series.
pub fn detect_pv_stability(
    phase1: &[Segment],
    pv: &[f64],
    sp: &[f64],
    params: &StabilityParameters,
) -> Result<PvStabilityResult> {
    if phase1.is_empty() {
        return Ok(PvStabilityResult::empty(params));
    }

    let residuals = residuals(pv, sp)?;
    if let Some(seg) = phase1.iter().find(|seg| !seg.fits(residuals.len())) {
        return Err(Error::segment_out_of_bounds(seg.start, seg.end, residuals.len()));
    }

    // Pass 1: fixed limits, used only to clean spikes series-wide
    let initial = ControlLimits::from_pool(&pool(&residuals, phase1), params.initial_sigma);
    let ooc = initial.flag(&residuals);
    let cleaned = replace_short_outliers(&residuals, &ooc, params.neighbor_reach);

    // Pass 2: width adapted to the noise of the cleaned pool
    let cleaned_pool = pool(&cleaned, phase1);
    let noise_ratio = stats::noise_ratio(&cleaned_pool);
    let k = adaptive_k(noise_ratio, &params.adaptive);
    let limits = ControlLimits::from_pool(&cleaned_pool, k);

    let mut segments = Vec::new();
    for &region in phase1 {
        let slice = region.slice(&cleaned);
        let region_ooc = limits.flag(slice);
        let twice_cleaned = replace_isolated_outliers(slice, &region_ooc, params.neighbor_reach);
        let final_ooc = limits.flag(&twice_cleaned);

        let pieces = split_at_flags(region, &final_ooc, params.min_segment_length);
        trace!(
            region = %region,
            flagged = final_ooc.iter().filter(|&&f| f).count(),
            pieces = pieces.len(),
            "residual split"
        );
        segments.extend(pieces);
    }

    Ok(PvStabilityResult {
        segments,
        adaptive_k: k,
        noise_ratio: Some(noise_ratio),
        control_limits: limits,
    })
}

//! Per-segment setpoint and output statistics

use crate::types::{NamedSeries, OutputStats, SegmentRecord};
use opmode_core::{stats, Error, Result, Segment};
use std::collections::BTreeMap;

impl OutputStats {
    /// Statistics over the finite values of a slice
    ///
    /// A slice without any finite value reports all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        let valid = stats::finite_values(values);
        let mean = stats::mean(&valid);
        let std = stats::population_std(&valid);
        Self {
            mean,
            std,
            cv: stats::coefficient_of_variation(mean, std),
        }
    }
}

/// Build one record per common segment
///
/// Setpoints are reduced to the mean of their valid samples; outputs to
/// mean, std and coefficient of variation. Records are numbered from 1 in
/// the order of `segments`.
pub fn build_segment_records(
    segments: &[Segment],
    setpoints: &[NamedSeries<'_>],
    outputs: &[NamedSeries<'_>],
) -> Result<Vec<SegmentRecord>> {
    for series in setpoints.iter().chain(outputs) {
        if let Some(seg) = segments.iter().find(|seg| !seg.fits(series.values.len())) {
            return Err(Error::InvalidInput(format!(
                "segment {seg} is outside series '{}' of length {}",
                series.name,
                series.values.len()
            )));
        }
    }

    let records = segments
        .iter()
        .enumerate()
        .map(|(idx, &seg)| {
            let sp_values = setpoints
                .iter()
                .map(|sp| {
                    let valid = stats::finite_values(seg.slice(sp.values));
                    (sp.name.to_string(), stats::mean(&valid))
                })
                .collect::<BTreeMap<_, _>>();

            let output_stats = outputs
                .iter()
                .map(|out| (out.name.to_string(), OutputStats::from_values(seg.slice(out.values))))
                .collect::<BTreeMap<_, _>>();

            SegmentRecord {
                index: idx + 1,
                start: seg.start,
                end: seg.end,
                length: seg.len(),
                sp_values,
                output_stats,
            }
        })
        .collect();

    Ok(records)
}

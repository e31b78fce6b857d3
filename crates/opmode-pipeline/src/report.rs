//! Report schema handed to rendering and export layers

use crate::dataset::Dataset;
use crate::detector::{ModeDetectionRun, RunSummary};
use crate::timestamps::{format_duration, segment_duration_ms};
use opmode_modes::{Insights, OutputStats};
use opmode_stability::{ControlLimits, ResidualSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One occurrence of a mode on the time axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSegmentEntry {
    pub mode: usize,
    pub start_idx: usize,
    pub end_idx: usize,
    /// Length in samples
    pub duration: usize,
    /// Elapsed time between first and last sample, when timestamps allow
    pub duration_ms: Option<i64>,
}

/// Aggregate occupancy of one mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeStatistics {
    /// Samples spent in the mode
    pub total_duration: usize,
    /// Sum of the known segment durations
    pub total_duration_ms: Option<i64>,
    /// Share of all samples, in percent
    pub percentage: f64,
    pub occurrences: usize,
    /// Mean samples per occurrence
    pub avg_duration: f64,
    /// Mean of the strictly positive known segment durations
    pub avg_duration_ms: Option<f64>,
}

/// Representative setpoints and output statistics of a mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeDetails {
    pub setpoint_values: BTreeMap<String, f64>,
    pub output_stats: BTreeMap<String, OutputStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableStabilityMetrics {
    pub stability: f64,
    pub stable_points: usize,
    pub transient_points: usize,
}

/// Share of time spent in stable operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityMetrics {
    /// Percentage of samples inside any mode
    pub overall_stability: f64,
    pub stable_points: usize,
    pub transient_points: usize,
    pub by_variable: BTreeMap<String, VariableStabilityMetrics>,
}

/// Output statistics of a mode with the observed range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputRange {
    pub mean: f64,
    pub std: f64,
    /// Smallest valid sample over all occurrences, `None` without any
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Fitted detector state for one pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDiagnostics {
    pub adaptive_k: f64,
    pub noise_ratio: Option<f64>,
    pub control_limits: ControlLimits,
    pub phase1_segments: usize,
    pub phase2_segments: usize,
    pub residual: ResidualSummary,
}

/// Complete result of a mode-detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeReport {
    /// All mode occurrences, ascending by start index
    pub mode_segments: Vec<ModeSegmentEntry>,
    pub mode_statistics: BTreeMap<usize, ModeStatistics>,
    pub mode_details: BTreeMap<usize, ModeDetails>,
    pub stability_metrics: StabilityMetrics,
    pub output_stats_by_mode: BTreeMap<usize, BTreeMap<String, OutputRange>>,
    pub insights: Insights,
    pub summary: RunSummary,
    pub variable_diagnostics: BTreeMap<String, VariableDiagnostics>,
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl ModeReport {
    /// Reshape a run into the report schema
    ///
    /// `data` must be the dataset the run was computed from. Durations come
    /// from `timestamp_column` when given.
    pub fn from_run<S: AsRef<str>>(
        run: &ModeDetectionRun,
        data: &Dataset,
        outputs: &[S],
        timestamp_column: Option<&str>,
    ) -> Self {
        let n = data.n_rows();
        let timestamps = timestamp_column.map(|col| data.timestamp_column(col));

        let mut mode_segments = Vec::new();
        let mut mode_statistics = BTreeMap::new();
        let mut mode_details = BTreeMap::new();

        for mode in &run.modes {
            let mut durations = Vec::with_capacity(mode.segments.len());
            for seg in &mode.segments {
                let duration_ms = timestamps
                    .as_deref()
                    .and_then(|ts| segment_duration_ms(ts, seg.segment()));
                durations.push(duration_ms);
                mode_segments.push(ModeSegmentEntry {
                    mode: mode.id,
                    start_idx: seg.start,
                    end_idx: seg.end,
                    duration: seg.length,
                    duration_ms,
                });
            }

            let known: Vec<i64> = durations.iter().flatten().copied().collect();
            let positive: Vec<i64> = known.iter().copied().filter(|&d| d > 0).collect();

            mode_statistics.insert(
                mode.id,
                ModeStatistics {
                    total_duration: mode.total_length,
                    total_duration_ms: (!known.is_empty()).then(|| known.iter().sum()),
                    percentage: percentage(mode.total_length, n),
                    occurrences: mode.occurrences(),
                    avg_duration: mode.total_length as f64 / mode.occurrences().max(1) as f64,
                    avg_duration_ms: (!positive.is_empty())
                        .then(|| positive.iter().sum::<i64>() as f64 / positive.len() as f64),
                },
            );

            mode_details.insert(
                mode.id,
                ModeDetails {
                    setpoint_values: mode.sp_values.clone(),
                    output_stats: mode.output_stats.clone(),
                },
            );
        }
        mode_segments.sort_by_key(|entry| entry.start_idx);

        let stable_points: usize = mode_segments.iter().map(|entry| entry.duration).sum();
        let by_variable = run
            .variable_analysis
            .iter()
            .map(|(name, analysis)| {
                let stable = analysis.stable_points();
                (
                    name.clone(),
                    VariableStabilityMetrics {
                        stability: percentage(stable, n),
                        stable_points: stable,
                        transient_points: n.saturating_sub(stable),
                    },
                )
            })
            .collect();

        let stability_metrics = StabilityMetrics {
            overall_stability: percentage(stable_points, n),
            stable_points,
            transient_points: n.saturating_sub(stable_points),
            by_variable,
        };

        let output_stats_by_mode = output_ranges(run, data, outputs);

        let variable_diagnostics = run
            .variable_analysis
            .iter()
            .map(|(name, analysis)| {
                (
                    name.clone(),
                    VariableDiagnostics {
                        adaptive_k: analysis.adaptive_k,
                        noise_ratio: analysis.noise_ratio,
                        control_limits: analysis.control_limits,
                        phase1_segments: analysis.phase1_segments.len(),
                        phase2_segments: analysis.phase2_segments.len(),
                        residual: analysis.residual_summary,
                    },
                )
            })
            .collect();

        Self {
            mode_segments,
            mode_statistics,
            mode_details,
            stability_metrics,
            output_stats_by_mode,
            insights: run.insights.clone(),
            summary: run.summary,
            variable_diagnostics,
        }
    }

    /// Serialize to a JSON value
    pub fn to_json(&self) -> opmode_core::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Mean/std from each mode's representative segment, min/max from every
/// raw sample the mode covers
fn output_ranges<S: AsRef<str>>(
    run: &ModeDetectionRun,
    data: &Dataset,
    outputs: &[S],
) -> BTreeMap<usize, BTreeMap<String, OutputRange>> {
    let columns: Vec<(&str, Vec<f64>)> = outputs
        .iter()
        .map(|name| (name.as_ref(), data.numeric_column(name.as_ref())))
        .collect();

    run.modes
        .iter()
        .map(|mode| {
            let mut ranges: BTreeMap<String, OutputRange> = mode
                .output_stats
                .iter()
                .map(|(name, stats)| {
                    (
                        name.clone(),
                        OutputRange {
                            mean: stats.mean,
                            std: stats.std,
                            min: None,
                            max: None,
                        },
                    )
                })
                .collect();

            for (name, values) in &columns {
                let range = ranges.entry(name.to_string()).or_insert(OutputRange {
                    mean: 0.0,
                    std: 0.0,
                    min: None,
                    max: None,
                });
                let samples = mode
                    .segments
                    .iter()
                    .filter(|seg| seg.segment().fits(values.len()))
                    .flat_map(|seg| seg.segment().slice(values).iter().copied())
                    .filter(|v| v.is_finite());
                for v in samples {
                    range.min = Some(range.min.map_or(v, |m| m.min(v)));
                    range.max = Some(range.max.map_or(v, |m| m.max(v)));
                }
            }

            (mode.id, ranges)
        })
        .collect()
}

impl fmt::Display for ModeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} modes from {} segments over {} samples ({:.1}% stable)",
            self.summary.total_modes,
            self.summary.total_segments,
            self.summary.total_data_points,
            self.stability_metrics.overall_stability
        )?;
        for (id, stats) in &self.mode_statistics {
            write!(
                f,
                "  mode {id}: {} occurrence(s), {} samples ({:.1}%)",
                stats.occurrences, stats.total_duration, stats.percentage
            )?;
            match stats.total_duration_ms {
                Some(ms) => writeln!(f, ", {}", format_duration(ms))?,
                None => writeln!(f)?,
            }
        }
        Ok(())
    }
}

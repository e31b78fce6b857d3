//! Mode-detection orchestrator

use crate::config::{ModeDetectionConfig, PairSelection};
use crate::dataset::Dataset;
use crate::report::ModeReport;
use opmode_core::{Error, Result, Segment};
use opmode_modes::{
    build_segment_records, calculate_insights, find_common_segments, Insights, Mode, ModeMerger,
    NamedSeries, SegmentRecord,
};
use opmode_stability::{
    AdaptiveKParameters, PairStabilityAnalyzer, StabilityParameters, VariableStability,
    VariableStabilityAnalyzer,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Counts describing a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_data_points: usize,
    pub total_segments: usize,
    pub total_modes: usize,
    pub input_variables: usize,
    pub output_variables: usize,
}

/// Every intermediate result of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeDetectionRun {
    /// Stability analysis per pair, keyed by base name
    pub variable_analysis: BTreeMap<String, VariableStability>,
    /// Stretches where every pair was stable
    pub common_segments: Vec<Segment>,
    pub segment_records: Vec<SegmentRecord>,
    pub modes: Vec<Mode>,
    /// Positions into `segment_records`, one group per mode
    pub merge_groups: Vec<Vec<usize>>,
    pub insights: Insights,
    pub summary: RunSummary,
}

/// Discovers operating modes in tabular SP/PV data
#[derive(Debug, Clone)]
pub struct ModeDetector {
    config: ModeDetectionConfig,
    analyzer: VariableStabilityAnalyzer,
    merger: ModeMerger,
}

impl Default for ModeDetector {
    fn default() -> Self {
        Self {
            config: ModeDetectionConfig::default(),
            analyzer: VariableStabilityAnalyzer::default(),
            merger: ModeMerger::default(),
        }
    }
}

impl ModeDetector {
    /// Create a detector from a validated configuration
    pub fn new(config: ModeDetectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            analyzer: VariableStabilityAnalyzer::new(config.stability)?,
            merger: ModeMerger::new(config.tolerance)?,
            config,
        })
    }

    pub fn builder() -> ModeDetectorBuilder {
        ModeDetectorBuilder::new()
    }

    pub fn config(&self) -> &ModeDetectionConfig {
        &self.config
    }

    /// Stability analysis of one pair
    ///
    /// A pair with fewer valid samples than the minimum segment length gets
    /// an empty analysis instead of an error.
    fn analyze_pair(&self, data: &Dataset, pair: &PairSelection) -> Result<VariableStability> {
        let pv = data.numeric_column(&pair.pv_column);
        let sp = data.numeric_column(&pair.sp_column);

        let analysis = match self.analyzer.analyze_pair(&pv, &sp) {
            Err(Error::InsufficientData { expected, actual }) => {
                warn!(
                    pair = %pair.base_name,
                    valid = actual,
                    required = expected,
                    "too few valid samples, pair excluded"
                );
                return Ok(VariableStability::insufficient(self.analyzer.params()));
            }
            other => other?,
        };
        debug!(
            pair = %pair.base_name,
            phase1 = analysis.phase1_segments.len(),
            phase2 = analysis.phase2_segments.len(),
            adaptive_k = analysis.adaptive_k,
            "pair analyzed"
        );
        Ok(analysis)
    }

    #[cfg(feature = "parallel")]
    fn analyze_pairs(
        &self,
        data: &Dataset,
        pairs: &[PairSelection],
    ) -> Result<Vec<(String, VariableStability)>> {
        pairs
            .par_iter()
            .map(|pair| {
                self.analyze_pair(data, pair)
                    .map(|analysis| (pair.base_name.clone(), analysis))
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn analyze_pairs(
        &self,
        data: &Dataset,
        pairs: &[PairSelection],
    ) -> Result<Vec<(String, VariableStability)>> {
        pairs
            .iter()
            .map(|pair| {
                self.analyze_pair(data, pair)
                    .map(|analysis| (pair.base_name.clone(), analysis))
            })
            .collect()
    }

    /// Run every stage and keep the intermediate results
    ///
    /// Fails only for an empty dataset or an empty pair selection.
    #[instrument(
        skip(self, data, pairs, outputs),
        fields(rows = data.n_rows(), pairs = pairs.len(), outputs = outputs.len())
    )]
    pub fn run<S: AsRef<str>>(
        &self,
        data: &Dataset,
        pairs: &[PairSelection],
        outputs: &[S],
    ) -> Result<ModeDetectionRun> {
        if data.is_empty() {
            return Err(Error::EmptyDataset);
        }
        if pairs.is_empty() {
            return Err(Error::NoPairsSelected);
        }
        let n = data.n_rows();
        let params = self.analyzer.params();

        let variable_analysis: BTreeMap<String, VariableStability> =
            self.analyze_pairs(data, pairs)?.into_iter().collect();

        let common_segments = find_common_segments(
            variable_analysis.values().map(|a| &a.phase2_segments),
            n,
            params.min_segment_length,
        );

        let sp_columns: Vec<(&str, Vec<f64>)> = pairs
            .iter()
            .map(|p| (p.base_name.as_str(), data.numeric_column(&p.sp_column)))
            .collect();
        let output_columns: Vec<(&str, Vec<f64>)> = outputs
            .iter()
            .map(|name| (name.as_ref(), data.numeric_column(name.as_ref())))
            .collect();
        let setpoints: Vec<NamedSeries<'_>> = sp_columns
            .iter()
            .map(|(name, values)| NamedSeries::new(name, values))
            .collect();
        let output_series: Vec<NamedSeries<'_>> = output_columns
            .iter()
            .map(|(name, values)| NamedSeries::new(name, values))
            .collect();

        let segment_records = build_segment_records(&common_segments, &setpoints, &output_series)?;

        let setpoint_names: Vec<&str> = pairs.iter().map(|p| p.base_name.as_str()).collect();
        let outcome = self.merger.merge(&segment_records, &setpoint_names, outputs);
        let insights = calculate_insights(&outcome.modes, outputs, &setpoint_names);

        let summary = RunSummary {
            total_data_points: n,
            total_segments: common_segments.len(),
            total_modes: outcome.modes.len(),
            input_variables: pairs.len(),
            output_variables: outputs.len(),
        };
        debug!(
            segments = summary.total_segments,
            modes = summary.total_modes,
            "mode detection finished"
        );

        Ok(ModeDetectionRun {
            variable_analysis,
            common_segments,
            segment_records,
            modes: outcome.modes,
            merge_groups: outcome.groups,
            insights,
            summary,
        })
    }

    /// Run every stage and reshape the result into a [`ModeReport`]
    pub fn detect<S: AsRef<str>>(
        &self,
        data: &Dataset,
        pairs: &[PairSelection],
        outputs: &[S],
    ) -> Result<ModeReport> {
        let run = self.run(data, pairs, outputs)?;
        Ok(ModeReport::from_run(
            &run,
            data,
            outputs,
            self.config.timestamp_column.as_deref(),
        ))
    }
}

/// Builder for configuring and creating mode detectors
///
/// Invalid values are reported by [`build`](Self::build), not clamped.
#[derive(Debug, Clone, Default)]
pub struct ModeDetectorBuilder {
    config: ModeDetectionConfig,
}

impl ModeDetectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: ModeDetectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the relative merge tolerance (0.02 = 2%)
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Sets the column durations are computed from
    pub fn timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.config.timestamp_column = Some(column.into());
        self
    }

    pub fn stability(mut self, params: StabilityParameters) -> Self {
        self.config.stability = params;
        self
    }

    /// Sets the rolling slope window, in samples
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.config.stability.window_size = window_size;
        self
    }

    /// Sets the standardized slope below which the setpoint counts as flat
    pub fn slope_threshold(mut self, threshold: f64) -> Self {
        self.config.stability.slope_threshold = threshold;
        self
    }

    /// Sets the minimum length of every stable and common segment
    pub fn min_segment_length(mut self, length: usize) -> Self {
        self.config.stability.min_segment_length = length;
        self
    }

    pub fn adaptive_k(mut self, params: AdaptiveKParameters) -> Self {
        self.config.stability.adaptive = params;
        self
    }

    /// Builds the configured detector
    pub fn build(self) -> Result<ModeDetector> {
        ModeDetector::new(self.config)
    }
}

/// Detect operating modes with default stability parameters
///
/// Convenience wrapper over [`ModeDetector`] for one-off calls.
pub fn detect_operating_modes<S: AsRef<str>>(
    data: &Dataset,
    pairs: &[PairSelection],
    outputs: &[S],
    timestamp_column: Option<&str>,
    tolerance: f64,
) -> Result<ModeReport> {
    let mut builder = ModeDetector::builder().tolerance(tolerance);
    if let Some(column) = timestamp_column {
        builder = builder.timestamp_column(column);
    }
    builder.build()?.detect(data, pairs, outputs)
}

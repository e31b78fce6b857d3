//! Core types for segment statistics and merged operating modes

use opmode_core::Segment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named, index-aligned numeric series; invalid samples are NaN
#[derive(Debug, Clone, Copy)]
pub struct NamedSeries<'a> {
    pub name: &'a str,
    pub values: &'a [f64],
}

impl<'a> NamedSeries<'a> {
    pub fn new(name: &'a str, values: &'a [f64]) -> Self {
        Self { name, values }
    }
}

/// Mean, population standard deviation and coefficient of variation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputStats {
    pub mean: f64,
    pub std: f64,
    pub cv: f64,
}

/// Statistics of one common segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    /// 1-based segment id, in ascending start order
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub length: usize,

    /// Mean setpoint per pair, keyed by pair base name
    pub sp_values: BTreeMap<String, f64>,

    /// Statistics per output variable
    pub output_stats: BTreeMap<String, OutputStats>,
}

impl SegmentRecord {
    /// The covered sample range
    pub fn segment(&self) -> Segment {
        Segment::new(self.start, self.end)
    }

    /// Mean of an output variable, 0.0 when it was not recorded
    pub fn output_mean(&self, name: &str) -> f64 {
        output_mean(&self.output_stats, name)
    }
}

/// Position of one constituent segment inside a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSegment {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub length: usize,
}

impl ModeSegment {
    pub fn segment(&self) -> Segment {
        Segment::new(self.start, self.end)
    }
}

impl From<&SegmentRecord> for ModeSegment {
    fn from(record: &SegmentRecord) -> Self {
        Self {
            index: record.index,
            start: record.start,
            end: record.end,
            length: record.length,
        }
    }
}

/// A merged operating mode
///
/// Representative setpoint and output statistics are those of the first
/// constituent segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    /// 1-based mode id
    pub id: usize,

    /// Ids of the merged segments, ascending
    pub merged_from: Vec<usize>,

    /// Total number of samples over all constituent segments
    pub total_length: usize,

    pub segments: Vec<ModeSegment>,
    pub sp_values: BTreeMap<String, f64>,
    pub output_stats: BTreeMap<String, OutputStats>,
}

impl Mode {
    /// Number of separate occurrences of this mode
    pub fn occurrences(&self) -> usize {
        self.segments.len()
    }

    /// Mean of an output variable, 0.0 when it was not recorded
    pub fn output_mean(&self, name: &str) -> f64 {
        output_mean(&self.output_stats, name)
    }

    /// Representative setpoint of a pair, 0.0 when it was not recorded
    pub fn sp_value(&self, name: &str) -> f64 {
        non_nan_or_zero(self.sp_values.get(name).copied())
    }
}

fn output_mean(stats: &BTreeMap<String, OutputStats>, name: &str) -> f64 {
    non_nan_or_zero(stats.get(name).map(|s| s.mean))
}

fn non_nan_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}

/// Which modes give the highest and lowest mean of one output variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputInsight {
    pub max_mode: usize,
    pub max_value: f64,
    pub min_mode: usize,
    pub min_value: f64,
}

/// Mode with the largest summed setpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThroughputInsight {
    pub max_mode: usize,
    pub max_value: f64,
}

/// Optimization insights across all modes
///
/// Serializes flat: one entry per output variable plus `throughput`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Insights {
    #[serde(flatten)]
    pub per_output: BTreeMap<String, OutputInsight>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput: Option<ThroughputInsight>,
}

impl Insights {
    pub fn is_empty(&self) -> bool {
        self.per_output.is_empty() && self.throughput.is_none()
    }
}

//! # Operating-Mode Detection Pipeline
//!
//! Turns a table of process-historian samples into a set of operating
//! modes: recurring stretches where every selected control loop held a
//! steady setpoint and tracked it, grouped by similar setpoints and output
//! levels.
//!
//! ## Stages
//!
//! 1. Coerce the selected columns to numbers ([`Dataset`])
//! 2. Two-phase stability analysis per SP/PV pair
//! 3. Intersection of the per-pair stable segments
//! 4. Per-segment statistics and tolerance-based merging into modes
//! 5. Insights and the [`ModeReport`] schema, with elapsed times when a
//!    timestamp column is configured
//!
//! ## Example
//!
//! ```rust
//! use opmode_pipeline::{Dataset, ModeDetector, PairSelection};
//!
//! let sp: Vec<f64> = (0..60).map(|i| if i < 30 { 40.0 } else { 55.0 }).collect();
//! let pv: Vec<f64> = sp
//!     .iter()
//!     .enumerate()
//!     .map(|(i, s)| if i % 2 == 0 { s + 0.1 } else { s - 0.1 })
//!     .collect();
//! let data = Dataset::from_numeric_columns([("TIC1.SP", sp), ("TIC1.PV", pv)]).unwrap();
//!
//! let detector = ModeDetector::builder().tolerance(0.02).build().unwrap();
//! let pairs = [PairSelection::new("TIC1", "TIC1.SP", "TIC1.PV")];
//! let outputs: [&str; 0] = [];
//!
//! let report = detector.detect(&data, &pairs, &outputs).unwrap();
//! assert_eq!(report.summary.total_modes, 2);
//! ```

pub mod config;
pub mod dataset;
pub mod detector;
pub mod report;
pub mod timestamps;

// Re-exports
pub use config::{ModeDetectionConfig, PairSelection};
pub use dataset::{parse_float_prefix, CellValue, Dataset};
pub use detector::{
    detect_operating_modes, ModeDetectionRun, ModeDetector, ModeDetectorBuilder, RunSummary,
};
pub use report::{
    ModeDetails, ModeReport, ModeSegmentEntry, ModeStatistics, OutputRange, StabilityMetrics,
    VariableDiagnostics, VariableStabilityMetrics,
};
pub use timestamps::{
    duration_ms, format_duration, format_duration_compact, parse_timestamp, segment_duration_ms,
};

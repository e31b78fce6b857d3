//! Operating-mode discovery from per-variable stable segments
//!
//! Once every setpoint/process-value pair has its stable segments, the
//! remaining stages are:
//!
//! 1. [`find_common_segments`]: intersect the per-pair segments so only
//!    time where every loop was steady survives
//! 2. [`build_segment_records`]: reduce each common segment to setpoint
//!    means and output statistics
//! 3. [`ModeMerger`]: cluster similar segments into modes
//! 4. [`calculate_insights`]: rank modes per output variable and by
//!    throughput
//!
//! # Example
//!
//! ```rust
//! use opmode_core::Segment;
//! use opmode_modes::{build_segment_records, find_common_segments, ModeMerger, NamedSeries};
//!
//! let sp: Vec<f64> = (0..90).map(|i| if (30..60).contains(&i) { 20.0 } else { 10.0 }).collect();
//! let stable = vec![Segment::new(0, 24), Segment::new(33, 55), Segment::new(64, 89)];
//!
//! let common = find_common_segments([stable], sp.len(), 20);
//! let records = build_segment_records(&common, &[NamedSeries::new("feed", &sp)], &[]).unwrap();
//!
//! let none: &[&str] = &[];
//! let outcome = ModeMerger::default().merge(&records, &["feed"], none);
//! assert_eq!(outcome.modes.len(), 2);
//! assert_eq!(outcome.modes[0].merged_from, vec![1, 3]);
//! ```

pub mod common;
pub mod insights;
pub mod merge;
pub mod statistics;
pub mod types;

// Re-exports
pub use common::find_common_segments;
pub use insights::calculate_insights;
pub use merge::{relative_difference, MergeOutcome, ModeMerger, DEFAULT_TOLERANCE};
pub use statistics::build_segment_records;
pub use types::{
    Insights, Mode, ModeSegment, NamedSeries, OutputInsight, OutputStats, SegmentRecord,
    ThroughputInsight,
};

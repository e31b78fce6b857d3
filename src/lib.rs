//! Operating-mode discovery for setpoint/process-value data
//!
//! This crate re-exports the workspace crates under one name:
//!
//! - [`opmode_core`]: segments, region extraction and the shared error type
//! - [`opmode_stability`]: two-phase SP/PV stability detection
//! - [`opmode_modes`]: common segments, segment statistics, merging and insights
//! - [`opmode_pipeline`]: tabular input, the orchestrator and the report schema
//!
//! # Example
//!
//! ```rust
//! use opmode::prelude::*;
//!
//! let sp: Vec<f64> = (0..60).map(|i| if i < 30 { 40.0 } else { 55.0 }).collect();
//! let pv: Vec<f64> = sp
//!     .iter()
//!     .enumerate()
//!     .map(|(i, s)| if i % 2 == 0 { s + 0.1 } else { s - 0.1 })
//!     .collect();
//! let data = Dataset::from_numeric_columns([("tic.sp", sp), ("tic.pv", pv)])?;
//!
//! let pairs = [PairSelection::new("tic", "tic.sp", "tic.pv")];
//! let report = ModeDetector::default().detect(&data, &pairs, &[] as &[&str])?;
//! assert_eq!(report.summary.total_modes, 2);
//! # Ok::<(), opmode::prelude::Error>(())
//! ```

pub use opmode_core;
pub use opmode_modes;
pub use opmode_pipeline;
pub use opmode_stability;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use opmode_core::{Error, Result, Segment};

    pub use opmode_stability::{
        AdaptiveKParameters, PairStabilityAnalyzer, StabilityParameters, VariableStability,
        VariableStabilityAnalyzer,
    };

    pub use opmode_modes::{Insights, Mode, ModeMerger, SegmentRecord};

    pub use opmode_pipeline::{
        detect_operating_modes, CellValue, Dataset, ModeDetectionConfig, ModeDetector,
        ModeReport, PairSelection,
    };
}

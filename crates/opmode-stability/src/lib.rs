//! # Two-Phase Stability Detection
//!
//! Finds the stretches of a setpoint/process-value pair where the loop ran
//! steadily:
//!
//! - **Phase 1** ([`detect_sp_stable_segments`]): the standardized setpoint
//!   has a near-zero rolling slope
//! - **Phase 2** ([`detect_pv_stability`]): inside those stretches, the
//!   PV − SP residual stays within control limits whose width adapts to the
//!   residual's noise ([`adaptive_k`])
//!
//! [`VariableStabilityAnalyzer`] runs both phases for one pair.
//!
//! ```rust
//! use opmode_stability::{PairStabilityAnalyzer, VariableStabilityAnalyzer};
//! use opmode_core::Segment;
//!
//! let sp = vec![50.0; 40];
//! let pv: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 50.2 } else { 49.8 }).collect();
//!
//! let analysis = VariableStabilityAnalyzer::default().analyze_pair(&pv, &sp).unwrap();
//! assert_eq!(analysis.phase1_segments, vec![Segment::new(0, 39)]);
//! assert_eq!(analysis.phase2_segments, vec![Segment::new(0, 39)]);
//! ```

pub mod adaptive;
pub mod analyzer;
pub mod outliers;
pub mod residual;
pub mod setpoint;
pub mod traits;
pub mod types;

// Re-exports
pub use adaptive::adaptive_k;
pub use analyzer::VariableStabilityAnalyzer;
pub use outliers::{replace_isolated_outliers, replace_short_outliers};
pub use residual::{detect_pv_stability, residuals};
pub use setpoint::{detect_sp_stable_segments, rolling_slopes, standardize};
pub use traits::{PairStabilityAnalyzer, StabilityAnalyzerProperties};
pub use types::{
    AdaptiveKParameters, ControlLimits, PvStabilityResult, ResidualSummary, StabilityParameters,
    VariableStability,
};

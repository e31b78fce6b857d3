//! Core traits for pair stability analysis

use crate::types::VariableStability;
use opmode_core::Result;

/// Intrinsic properties of a stability analyzer
pub trait StabilityAnalyzerProperties {
    /// Get the minimum number of valid samples required for analysis
    fn minimum_samples(&self) -> usize;

    /// Get the name of the analysis method
    fn method_name(&self) -> &str;

    /// Check if the analyzer can handle the given number of valid samples
    fn can_handle_size(&self, size: usize) -> bool {
        size >= self.minimum_samples()
    }
}

/// Stability analysis of one setpoint/process-value pair
///
/// Both series are full length and index-aligned; invalid samples are NaN.
pub trait PairStabilityAnalyzer: StabilityAnalyzerProperties {
    /// Analyze a PV/SP pair for stable operation
    fn analyze_pair(&self, pv: &[f64], sp: &[f64]) -> Result<VariableStability>;
}

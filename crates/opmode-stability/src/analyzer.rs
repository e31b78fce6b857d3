//! Two-phase analyzer combining the setpoint and residual detectors

use crate::residual::{detect_pv_stability, residuals};
use crate::setpoint::detect_sp_stable_segments;
use crate::traits::{PairStabilityAnalyzer, StabilityAnalyzerProperties};
use crate::types::{ResidualSummary, StabilityParameters, VariableStability};
use opmode_core::{Error, Result};

/// Setpoint-then-residual stability analyzer
#[derive(Debug, Clone, Default)]
pub struct VariableStabilityAnalyzer {
    params: StabilityParameters,
}

impl VariableStabilityAnalyzer {
    /// Create an analyzer with validated parameters
    pub fn new(params: StabilityParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Get the parameters
    pub fn params(&self) -> &StabilityParameters {
        &self.params
    }
}

impl StabilityAnalyzerProperties for VariableStabilityAnalyzer {
    fn minimum_samples(&self) -> usize {
        self.params.min_segment_length
    }

    fn method_name(&self) -> &str {
        "Two-Phase SP/PV Stability"
    }
}

impl PairStabilityAnalyzer for VariableStabilityAnalyzer {
    /// Fails with `InsufficientData` when fewer samples than the minimum
    /// segment length have both PV and SP valid.
    fn analyze_pair(&self, pv: &[f64], sp: &[f64]) -> Result<VariableStability> {
        let residual = residuals(pv, sp)?;

        let valid = residual.iter().filter(|r| r.is_finite()).count();
        if !self.can_handle_size(valid) {
            return Err(Error::InsufficientData {
                expected: self.minimum_samples(),
                actual: valid,
            });
        }

        let phase1_segments = detect_sp_stable_segments(sp, &self.params);
        let phase2 = detect_pv_stability(&phase1_segments, pv, sp, &self.params)?;

        Ok(VariableStability {
            phase1_segments,
            phase2_segments: phase2.segments,
            adaptive_k: phase2.adaptive_k,
            noise_ratio: phase2.noise_ratio,
            control_limits: phase2.control_limits,
            residual_summary: ResidualSummary::from_residuals(&residual),
        })
    }
}

//! Common types used in stability analysis

use opmode_core::{stats, total_length, Error, Result, Segment};
use serde::{Deserialize, Serialize};

/// Smallest window the rolling slope is evaluated on
pub const MIN_WINDOW_POINTS: usize = 3;

/// Parameters of the noise-ratio to control-limit-width mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdaptiveKParameters {
    /// Width multiplier used for low-noise residuals
    pub k_min: f64,

    /// Width multiplier used for high-noise residuals
    pub k_max: f64,

    /// Saturation rate of the exponential transition
    pub alpha: f64,

    /// Noise ratio at or below which `k_min` applies
    pub noise_ratio_low: f64,

    /// Noise ratio at or above which `k_max` applies
    pub noise_ratio_high: f64,
}

impl Default for AdaptiveKParameters {
    fn default() -> Self {
        Self {
            k_min: 2.0,
            k_max: 3.5,
            alpha: 5.0,
            noise_ratio_low: 0.05,
            noise_ratio_high: 0.9,
        }
    }
}

impl AdaptiveKParameters {
    /// Check the mapping is well formed
    pub fn validate(&self) -> Result<()> {
        if !(self.k_min.is_finite() && self.k_max.is_finite()) || self.k_min <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "k bounds must be finite and positive, got [{}, {}]",
                self.k_min, self.k_max
            )));
        }
        if self.k_min > self.k_max {
            return Err(Error::InvalidParameter(format!(
                "k_min ({}) must not exceed k_max ({})",
                self.k_min, self.k_max
            )));
        }
        if !(self.noise_ratio_low < self.noise_ratio_high) {
            return Err(Error::InvalidParameter(format!(
                "noise ratio band must be increasing, got [{}, {}]",
                self.noise_ratio_low, self.noise_ratio_high
            )));
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "alpha must be finite and positive, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Parameters for the two-phase stability detectors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StabilityParameters {
    /// Rolling regression window, in samples
    pub window_size: usize,

    /// Maximum |slope| of the standardized setpoint for a stable sample
    pub slope_threshold: f64,

    /// Minimum length of any stable segment
    pub min_segment_length: usize,

    /// Sigma multiplier of the first, fixed-width control limits
    pub initial_sigma: f64,

    /// k reported when there is nothing to fit
    pub default_k: f64,

    /// Neighbors on each side used to replace an out-of-control residual
    pub neighbor_reach: usize,

    /// Adaptive control-limit width
    pub adaptive: AdaptiveKParameters,
}

impl Default for StabilityParameters {
    fn default() -> Self {
        Self {
            window_size: 20,
            slope_threshold: 0.01,
            min_segment_length: 20,
            initial_sigma: 2.0,
            default_k: 2.5,
            neighbor_reach: 2,
            adaptive: AdaptiveKParameters::default(),
        }
    }
}

impl StabilityParameters {
    /// Check all parameters are usable
    pub fn validate(&self) -> Result<()> {
        if self.window_size < MIN_WINDOW_POINTS {
            return Err(Error::InvalidParameter(format!(
                "window size must be at least {MIN_WINDOW_POINTS}, got {}",
                self.window_size
            )));
        }
        if self.min_segment_length == 0 {
            return Err(Error::InvalidParameter(
                "minimum segment length must be positive".to_string(),
            ));
        }
        if !self.slope_threshold.is_finite() || self.slope_threshold <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "slope threshold must be finite and positive, got {}",
                self.slope_threshold
            )));
        }
        if !self.initial_sigma.is_finite() || self.initial_sigma <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "initial sigma must be finite and positive, got {}",
                self.initial_sigma
            )));
        }
        if !self.default_k.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "default k must be finite, got {}",
                self.default_k
            )));
        }
        self.adaptive.validate()
    }

    /// Half-width of the rolling regression window
    pub fn half_window(&self) -> usize {
        self.window_size / 2
    }
}

/// Upper/lower control limits around a center line
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlLimits {
    pub ucl: f64,
    pub lcl: f64,
    pub mean: f64,
}

impl ControlLimits {
    /// `mean ± k·std` of a pooled residual sample
    pub fn from_pool(pool: &[f64], k: f64) -> Self {
        let mean = stats::mean(pool);
        let std = stats::population_std(pool);
        Self {
            ucl: mean + k * std,
            lcl: mean - k * std,
            mean,
        }
    }

    /// Check if a residual is out of control
    ///
    /// Non-finite residuals are always out of control.
    pub fn is_out_of_control(&self, residual: f64) -> bool {
        !residual.is_finite() || residual > self.ucl || residual < self.lcl
    }

    /// Out-of-control flag for every residual
    pub fn flag(&self, residuals: &[f64]) -> Vec<bool> {
        residuals.iter().map(|&r| self.is_out_of_control(r)).collect()
    }
}

/// Output of the residual (Phase-2) detector
#[derive(Debug, Clone, PartialEq)]
pub struct PvStabilityResult {
    /// Refined stable sub-segments, in ascending order
    pub segments: Vec<Segment>,

    /// Width multiplier of the final control limits
    pub adaptive_k: f64,

    /// Noise ratio the multiplier was derived from (`None` when nothing was fitted)
    pub noise_ratio: Option<f64>,

    /// Final control limits
    pub control_limits: ControlLimits,
}

impl PvStabilityResult {
    /// Result for a pair without any Phase-1 segment
    pub fn empty(params: &StabilityParameters) -> Self {
        Self {
            segments: Vec::new(),
            adaptive_k: params.default_k,
            noise_ratio: None,
            control_limits: ControlLimits::default(),
        }
    }
}

/// Summary of the PV − SP residual over all valid samples
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidualSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ResidualSummary {
    /// Summarize the finite entries of a residual series
    pub fn from_residuals(residuals: &[f64]) -> Self {
        let valid = stats::finite_values(residuals);
        Self {
            count: valid.len(),
            mean: stats::mean(&valid),
            std: stats::population_std(&valid),
            min: valid.iter().copied().reduce(f64::min),
            max: valid.iter().copied().reduce(f64::max),
        }
    }
}

/// Full stability analysis of one SP/PV pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableStability {
    /// Stretches where the setpoint was flat
    pub phase1_segments: Vec<Segment>,

    /// Stretches where the residual also stayed in control
    pub phase2_segments: Vec<Segment>,

    pub adaptive_k: f64,

    pub noise_ratio: Option<f64>,

    pub control_limits: ControlLimits,

    pub residual_summary: ResidualSummary,
}

impl VariableStability {
    /// Empty analysis for a pair with too little valid data
    pub fn insufficient(params: &StabilityParameters) -> Self {
        Self {
            phase1_segments: Vec::new(),
            phase2_segments: Vec::new(),
            adaptive_k: params.default_k,
            noise_ratio: None,
            control_limits: ControlLimits::default(),
            residual_summary: ResidualSummary::default(),
        }
    }

    /// Number of samples inside refined stable segments
    pub fn stable_points(&self) -> usize {
        total_length(&self.phase2_segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_parameters_are_the_literal_constants() {
        let params = StabilityParameters::default();
        assert_eq!(params.window_size, 20);
        assert_eq!(params.slope_threshold, 0.01);
        assert_eq!(params.min_segment_length, 20);
        assert_eq!(params.default_k, 2.5);
        assert_eq!(params.half_window(), 10);
        assert_eq!(params.adaptive.k_min, 2.0);
        assert_eq!(params.adaptive.k_max, 3.5);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_parameter_validation() {
        let params = StabilityParameters {
            window_size: 2,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(Error::InvalidParameter(_))));

        let params = StabilityParameters {
            adaptive: AdaptiveKParameters {
                k_min: 4.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = StabilityParameters {
            adaptive: AdaptiveKParameters {
                noise_ratio_low: 0.9,
                noise_ratio_high: 0.9,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_parameters_deserialize_with_defaults() {
        let params: StabilityParameters =
            serde_json::from_str(r#"{"windowSize": 30, "adaptive": {"kMax": 3.0}}"#).unwrap();
        assert_eq!(params.window_size, 30);
        assert_eq!(params.min_segment_length, 20);
        assert_eq!(params.adaptive.k_max, 3.0);
        assert_eq!(params.adaptive.k_min, 2.0);
    }

    #[test]
    fn test_control_limits() {
        let limits = ControlLimits::from_pool(&[1.0, 3.0], 2.0);
        assert_relative_eq!(limits.mean, 2.0);
        assert_relative_eq!(limits.ucl, 4.0);
        assert_relative_eq!(limits.lcl, 0.0);

        assert!(!limits.is_out_of_control(4.0));
        assert!(limits.is_out_of_control(4.0001));
        assert!(limits.is_out_of_control(-0.1));
        assert!(limits.is_out_of_control(f64::NAN));
        assert_eq!(limits.flag(&[2.0, 5.0]), vec![false, true]);
    }

    #[test]
    fn test_residual_summary() {
        let summary = ResidualSummary::from_residuals(&[1.0, f64::NAN, -1.0, 3.0]);
        assert_eq!(summary.count, 3);
        assert_relative_eq!(summary.mean, 1.0);
        assert_eq!(summary.min, Some(-1.0));
        assert_eq!(summary.max, Some(3.0));

        let empty = ResidualSummary::from_residuals(&[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.min, None);
    }

    #[test]
    fn test_insufficient_analysis() {
        let analysis = VariableStability::insufficient(&StabilityParameters::default());
        assert!(analysis.phase2_segments.is_empty());
        assert_eq!(analysis.adaptive_k, 2.5);
        assert_eq!(analysis.stable_points(), 0);
    }
}

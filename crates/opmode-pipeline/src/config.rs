//! Configuration for a mode-detection run

use opmode_core::Result;
use opmode_modes::{ModeMerger, DEFAULT_TOLERANCE};
use opmode_stability::StabilityParameters;
use serde::{Deserialize, Serialize};

/// Tuning for the whole pipeline
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use opmode_pipeline::ModeDetectionConfig;
///
/// let config = ModeDetectionConfig::from_json_str(
///     r#"{"tolerance": 0.05, "timestampColumn": "ts", "stability": {"windowSize": 30}}"#,
/// ).unwrap();
/// assert_eq!(config.tolerance, 0.05);
/// assert_eq!(config.stability.window_size, 30);
/// assert_eq!(config.stability.min_segment_length, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModeDetectionConfig {
    /// Relative tolerance under which two segments are the same mode
    pub tolerance: f64,

    /// Column holding sample timestamps; without one, durations are only
    /// reported in samples
    pub timestamp_column: Option<String>,

    pub stability: StabilityParameters,
}

impl Default for ModeDetectionConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            timestamp_column: None,
            stability: StabilityParameters::default(),
        }
    }
}

impl ModeDetectionConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter is usable
    pub fn validate(&self) -> Result<()> {
        ModeMerger::new(self.tolerance)?;
        self.stability.validate()
    }
}

/// One setpoint/process-value pair selected for analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSelection {
    /// Name the pair is reported under
    pub base_name: String,
    pub sp_column: String,
    pub pv_column: String,
}

impl PairSelection {
    pub fn new(
        base_name: impl Into<String>,
        sp_column: impl Into<String>,
        pv_column: impl Into<String>,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            sp_column: sp_column.into(),
            pv_column: pv_column.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opmode_core::Error;

    #[test]
    fn test_defaults() {
        let config = ModeDetectionConfig::default();
        assert_eq!(config.tolerance, 0.02);
        assert_eq!(config.timestamp_column, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(
            ModeDetectionConfig::from_json_str("{}").unwrap(),
            ModeDetectionConfig::default()
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ModeDetectionConfig::from_json_str(r#"{"tolerance": -1}"#),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            ModeDetectionConfig::from_json_str(r#"{"stability": {"windowSize": 1}}"#),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            ModeDetectionConfig::from_json_str(r#"{"tolerance": "wide"}"#),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_pair_selection_serde() {
        let pair: PairSelection = serde_json::from_str(
            r#"{"baseName": "FIC101", "spColumn": "FIC101.SP", "pvColumn": "FIC101.PV"}"#,
        )
        .unwrap();
        assert_eq!(pair, PairSelection::new("FIC101", "FIC101.SP", "FIC101.PV"));
    }
}

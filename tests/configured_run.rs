//! Driving the detector from a JSON configuration and JSON rows

use anyhow::Result;
use approx::assert_relative_eq;
use opmode::prelude::*;
use serde_json::json;
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Two reactors; the second changes its setpoint halfway through
fn plant_rows() -> Vec<serde_json::Value> {
    (0..120)
        .map(|i| {
            let dither = if i % 2 == 0 { 0.05 } else { -0.05 };
            let r2_sp = if i < 60 { 80.0 } else { 95.0 };
            let conversion = if i < 60 { 0.82 } else { 0.91 };
            json!({
                "stamp": format!("2024-03-10 {:02}:{:02}:00", i / 60, i % 60),
                "R1.SP": 120.0,
                "R1.PV": 120.0 + dither,
                "R2.SP": r2_sp,
                "R2.PV": r2_sp + dither,
                "conversion": conversion,
            })
        })
        .collect()
}

#[test]
fn json_config_drives_the_detector() -> Result<()> {
    init_tracing();

    let config = ModeDetectionConfig::from_json_str(
        r#"{"tolerance": 0.05, "timestampColumn": "stamp", "stability": {"minSegmentLength": 25}}"#,
    )?;
    assert_eq!(config.stability.window_size, 20);

    let detector = ModeDetector::new(config)?;
    let data = Dataset::from_json_rows(&plant_rows())?;
    let pairs = [
        PairSelection::new("R1", "R1.SP", "R1.PV"),
        PairSelection::new("R2", "R2.SP", "R2.PV"),
    ];

    let report = detector.detect(&data, &pairs, &["conversion"])?;
    info!(%report, "plant report");

    // The step in R2 at 60 costs ten samples on either side
    let spans: Vec<(usize, usize)> = report
        .mode_segments
        .iter()
        .map(|s| (s.start_idx, s.end_idx))
        .collect();
    assert_eq!(spans, vec![(0, 49), (70, 119)]);
    assert_eq!(report.summary.total_modes, 2);

    // Naive timestamps are read as UTC, one minute apart
    assert_eq!(report.mode_segments[0].duration_ms, Some(49 * 60_000));

    let conversion = report.insights.per_output["conversion"];
    assert_eq!(conversion.max_mode, 2);
    assert_relative_eq!(conversion.max_value, 0.91, epsilon = 1e-12);

    let throughput = report.insights.throughput.expect("setpoints were named");
    assert_eq!(throughput.max_mode, 2);
    assert_relative_eq!(throughput.max_value, 215.0);
    Ok(())
}

#[test]
fn invalid_config_is_rejected() {
    assert!(matches!(
        ModeDetectionConfig::from_json_str(r#"{"tolerance": -1.0}"#),
        Err(Error::InvalidParameter(_))
    ));
    assert!(matches!(
        ModeDetectionConfig::from_json_str(r#"{"stability": {"windowSize": 1}}"#),
        Err(Error::InvalidParameter(_))
    ));
    assert!(ModeDetectionConfig::from_json_str("[1, 2]").is_err());
}

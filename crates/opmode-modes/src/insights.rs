//! Optimization insights over merged modes

use crate::types::{Insights, Mode, OutputInsight, ThroughputInsight};

/// Best and worst mode per output variable, and the highest-throughput mode
///
/// Throughput is the sum of a mode's representative setpoints over the
/// given pairs, reported only when at least one pair is named. Ties go to
/// the lower mode id. No modes yields empty insights.
pub fn calculate_insights<A, B>(modes: &[Mode], outputs: &[A], setpoints: &[B]) -> Insights
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut insights = Insights::default();
    let Some(first) = modes.first() else {
        return insights;
    };

    for name in outputs {
        let name = name.as_ref();
        let mut max = (first.id, first.output_mean(name));
        let mut min = max;

        for mode in &modes[1..] {
            let value = mode.output_mean(name);
            if value > max.1 {
                max = (mode.id, value);
            }
            if value < min.1 {
                min = (mode.id, value);
            }
        }

        insights.per_output.insert(
            name.to_string(),
            OutputInsight {
                max_mode: max.0,
                max_value: max.1,
                min_mode: min.0,
                min_value: min.1,
            },
        );
    }

    if !setpoints.is_empty() {
        let throughput = |mode: &Mode| -> f64 {
            setpoints.iter().map(|name| mode.sp_value(name.as_ref())).sum()
        };

        let mut best = (first.id, throughput(first));
        for mode in &modes[1..] {
            let value = throughput(mode);
            if value > best.1 {
                best = (mode.id, value);
            }
        }

        insights.throughput = Some(ThroughputInsight {
            max_mode: best.0,
            max_value: best.1,
        });
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OutputStats;
    use std::collections::BTreeMap;

    fn mode(id: usize, feed: f64, steam: f64, yield_mean: Option<f64>) -> Mode {
        let mut output_stats = BTreeMap::new();
        if let Some(mean) = yield_mean {
            output_stats.insert(
                "yield".to_string(),
                OutputStats {
                    mean,
                    ..Default::default()
                },
            );
        }
        Mode {
            id,
            merged_from: vec![id],
            total_length: 20,
            segments: Vec::new(),
            sp_values: BTreeMap::from([("feed".to_string(), feed), ("steam".to_string(), steam)]),
            output_stats,
        }
    }

    #[test]
    fn test_no_modes() {
        let insights = calculate_insights(&[], &["yield"], &["feed"]);
        assert!(insights.is_empty());
    }

    #[test]
    fn test_max_and_min_per_output() {
        let modes = vec![
            mode(1, 10.0, 1.0, Some(5.0)),
            mode(2, 20.0, 1.0, Some(9.0)),
            mode(3, 15.0, 1.0, Some(2.0)),
        ];
        let insights = calculate_insights(&modes, &["yield"], &["feed", "steam"]);

        let y = insights.per_output["yield"];
        assert_eq!((y.max_mode, y.max_value), (2, 9.0));
        assert_eq!((y.min_mode, y.min_value), (3, 2.0));

        let throughput = insights.throughput.unwrap();
        assert_eq!(throughput.max_mode, 2);
        assert_eq!(throughput.max_value, 21.0);
    }

    #[test]
    fn test_missing_output_mean_counts_as_zero() {
        let modes = vec![mode(1, 10.0, 0.0, Some(3.0)), mode(2, 10.0, 0.0, None)];
        let insights = calculate_insights(&modes, &["yield"], &["feed"]);
        let y = insights.per_output["yield"];
        assert_eq!((y.min_mode, y.min_value), (2, 0.0));
    }

    #[test]
    fn test_ties_keep_the_first_mode() {
        let modes = vec![mode(1, 10.0, 0.0, Some(3.0)), mode(2, 10.0, 0.0, Some(3.0))];
        let insights = calculate_insights(&modes, &["yield"], &["feed"]);
        assert_eq!(insights.per_output["yield"].max_mode, 1);
        assert_eq!(insights.per_output["yield"].min_mode, 1);
        assert_eq!(insights.throughput.unwrap().max_mode, 1);
    }

    #[test]
    fn test_no_pairs_means_no_throughput() {
        let modes = vec![mode(1, 10.0, 0.0, Some(3.0))];
        let none: &[&str] = &[];
        let insights = calculate_insights(&modes, &["yield"], none);
        assert!(insights.throughput.is_none());
        assert_eq!(insights.per_output.len(), 1);
    }
}

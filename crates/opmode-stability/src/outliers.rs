//! Neighbor-mean replacement of out-of-control residuals

use opmode_core::stats;

/// Mean of the in-control neighbors within `reach` of `idx`
fn in_control_neighbor_mean(residuals: &[f64], ooc: &[bool], idx: usize, reach: usize) -> Option<f64> {
    let lo = idx.saturating_sub(reach);
    let hi = (idx + reach).min(residuals.len() - 1);

    let neighbors: Vec<f64> = (lo..=hi)
        .filter(|&j| j != idx && !ooc[j])
        .map(|j| residuals[j])
        .collect();

    if neighbors.is_empty() {
        None
    } else {
        Some(stats::mean(&neighbors))
    }
}

/// Replace every out-of-control residual with the mean of its in-control neighbors
///
/// Neighbors are read from the unmodified input. A flagged sample without
/// any in-control neighbor keeps its value.
pub fn replace_short_outliers(residuals: &[f64], ooc: &[bool], reach: usize) -> Vec<f64> {
    debug_assert_eq!(residuals.len(), ooc.len());
    let mut cleaned = residuals.to_vec();

    for (idx, value) in cleaned.iter_mut().enumerate() {
        if !ooc[idx] {
            continue;
        }
        if let Some(replacement) = in_control_neighbor_mean(residuals, ooc, idx, reach) {
            *value = replacement;
        }
    }

    cleaned
}

/// Replace only isolated single-point outliers
///
/// A flagged sample qualifies when both adjacent samples are in control
/// (a missing neighbor at the series edge counts as in control).
pub fn replace_isolated_outliers(residuals: &[f64], ooc: &[bool], reach: usize) -> Vec<f64> {
    debug_assert_eq!(residuals.len(), ooc.len());
    let n = residuals.len();
    let mut cleaned = residuals.to_vec();

    for idx in 0..n {
        if !ooc[idx] {
            continue;
        }

        let prev_ooc = idx > 0 && ooc[idx - 1];
        let next_ooc = idx + 1 < n && ooc[idx + 1];
        if prev_ooc || next_ooc {
            continue;
        }

        if let Some(replacement) = in_control_neighbor_mean(residuals, ooc, idx, reach) {
            cleaned[idx] = replacement;
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_short_outlier_uses_four_neighbors() {
        let residuals = [1.0, 2.0, 100.0, 4.0, 5.0];
        let ooc = [false, false, true, false, false];
        let cleaned = replace_short_outliers(&residuals, &ooc, 2);
        assert_relative_eq!(cleaned[2], 3.0);
        assert_eq!(&cleaned[..2], &[1.0, 2.0]);
    }

    #[test]
    fn test_short_outlier_skips_flagged_neighbors() {
        let residuals = [1.0, 50.0, 60.0, 3.0, 9.0];
        let ooc = [false, true, true, false, false];
        let cleaned = replace_short_outliers(&residuals, &ooc, 2);
        // idx 1: neighbors 0 and 3 (2 is flagged)
        assert_relative_eq!(cleaned[1], 2.0);
        // idx 2: neighbors 0, 3, 4; reads unmodified input
        assert_relative_eq!(cleaned[2], (1.0 + 3.0 + 9.0) / 3.0);
    }

    #[test]
    fn test_short_outlier_respects_series_bounds() {
        let residuals = [10.0, 1.0, 3.0];
        let ooc = [true, false, false];
        let cleaned = replace_short_outliers(&residuals, &ooc, 2);
        assert_relative_eq!(cleaned[0], 2.0);
    }

    #[test]
    fn test_short_outlier_without_neighbors_is_kept() {
        let residuals = [7.0, 8.0, 9.0];
        let ooc = [true, true, true];
        assert_eq!(replace_short_outliers(&residuals, &ooc, 2), residuals.to_vec());
    }

    #[test]
    fn test_isolated_outlier_replaced() {
        let residuals = [0.0, 2.0, 40.0, 4.0, 6.0];
        let ooc = [false, false, true, false, false];
        let cleaned = replace_isolated_outliers(&residuals, &ooc, 2);
        assert_relative_eq!(cleaned[2], 3.0);
    }

    #[test]
    fn test_adjacent_outliers_are_not_replaced() {
        let residuals = [0.0, 0.0, 40.0, 41.0, 0.0, 0.0];
        let ooc = [false, false, true, true, false, false];
        let cleaned = replace_isolated_outliers(&residuals, &ooc, 2);
        assert_eq!(cleaned, residuals.to_vec());
    }

    #[test]
    fn test_isolated_outlier_at_edge() {
        let residuals = [40.0, 1.0, 2.0];
        let ooc = [true, false, false];
        let cleaned = replace_isolated_outliers(&residuals, &ooc, 2);
        assert_relative_eq!(cleaned[0], 1.5);
    }

    #[test]
    fn test_isolated_outlier_neighbors_two_away_may_be_flagged() {
        let residuals = [90.0, 1.0, 50.0, 3.0, 80.0];
        let ooc = [true, false, true, false, true];
        let cleaned = replace_isolated_outliers(&residuals, &ooc, 2);
        assert_relative_eq!(cleaned[2], 2.0);
        // idx 0 and 4 are isolated too
        assert_relative_eq!(cleaned[0], 1.0);
        assert_relative_eq!(cleaned[4], 3.0);
    }
}

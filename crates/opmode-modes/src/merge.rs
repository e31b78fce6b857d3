//! Tolerance-based merging of segments into operating modes
//!
//! Segments are clustered greedily against a seed: walking in segment
//! order, each unassigned segment opens a group and absorbs every later
//! unassigned segment whose setpoint means and output means are all within
//! the relative tolerance of the *seed's* values. Accepted members are never
//! compared with each other, so the grouping is order dependent.

use crate::types::{Mode, ModeSegment, SegmentRecord};
use opmode_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default relative merge tolerance (2%)
pub const DEFAULT_TOLERANCE: f64 = 0.02;

/// Relative difference of `other` to `seed`
///
/// Falls back to the absolute difference when `seed` is zero.
///
/// # Examples
///
/// ```rust
/// use opmode_modes::relative_difference;
///
/// assert_eq!(relative_difference(100.0, 102.0), 0.02);
/// assert_eq!(relative_difference(0.0, 0.5), 0.5);
/// ```
pub fn relative_difference(seed: f64, other: f64) -> f64 {
    let diff = (seed - other).abs();
    if seed != 0.0 {
        diff / seed.abs()
    } else {
        diff
    }
}

/// Groups and modes produced by a merge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// Positions into the merged record list, one group per mode
    pub groups: Vec<Vec<usize>>,
    pub modes: Vec<Mode>,
}

/// Seed-based segment merger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeMerger {
    tolerance: f64,
}

impl Default for ModeMerger {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ModeMerger {
    /// Create a merger; the tolerance must be finite and non-negative
    pub fn new(tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "merge tolerance must be finite and non-negative, got {tolerance}"
            )));
        }
        Ok(Self { tolerance })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Whether `candidate` may join the group seeded by `seed`
    ///
    /// Every named setpoint and output mean must be within tolerance.
    /// Missing output means compare as 0.
    pub fn is_similar<A, B>(
        &self,
        seed: &SegmentRecord,
        candidate: &SegmentRecord,
        setpoints: &[A],
        outputs: &[B],
    ) -> bool
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let sp_close = setpoints.iter().all(|name| {
            let name = name.as_ref();
            match (seed.sp_values.get(name), candidate.sp_values.get(name)) {
                (Some(&a), Some(&b)) => relative_difference(a, b) <= self.tolerance,
                _ => false,
            }
        });

        sp_close
            && outputs.iter().all(|name| {
                let name = name.as_ref();
                relative_difference(seed.output_mean(name), candidate.output_mean(name))
                    <= self.tolerance
            })
    }

    /// Cluster segment records into modes
    ///
    /// Mode ids are 1-based in order of each group's seed. A mode reports
    /// the setpoints and output statistics of its first segment.
    pub fn merge<A, B>(&self, records: &[SegmentRecord], setpoints: &[A], outputs: &[B]) -> MergeOutcome
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut used = vec![false; records.len()];
        let mut groups = Vec::new();

        for i in 0..records.len() {
            if used[i] {
                continue;
            }
            used[i] = true;

            let mut group = vec![i];
            for j in (i + 1)..records.len() {
                if !used[j] && self.is_similar(&records[i], &records[j], setpoints, outputs) {
                    used[j] = true;
                    group.push(j);
                }
            }
            groups.push(group);
        }

        let modes: Vec<Mode> = groups
            .iter()
            .enumerate()
            .map(|(mode_idx, group)| {
                let first = &records[group[0]];
                Mode {
                    id: mode_idx + 1,
                    merged_from: group.iter().map(|&g| records[g].index).collect(),
                    total_length: group.iter().map(|&g| records[g].length).sum(),
                    segments: group.iter().map(|&g| ModeSegment::from(&records[g])).collect(),
                    sp_values: first.sp_values.clone(),
                    output_stats: first.output_stats.clone(),
                }
            })
            .collect();

        debug!(
            segments = records.len(),
            modes = modes.len(),
            tolerance = self.tolerance,
            "merged segments into modes"
        );

        MergeOutcome { groups, modes }
    }
}

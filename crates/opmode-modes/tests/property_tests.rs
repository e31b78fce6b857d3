//! Property-based tests for intersection and merging

use opmode_core::{extract_contiguous_regions, mask_from_segments, total_length, Segment};
use opmode_modes::{build_segment_records, find_common_segments, ModeMerger, NamedSeries};
use proptest::prelude::*;

/// Random sorted, disjoint segment list over `0..n`
fn segment_list(n: usize) -> impl Strategy<Value = Vec<Segment>> {
    prop::collection::vec(any::<bool>(), n).prop_map(|mask| extract_contiguous_regions(&mask, 1))
}

fn variable_sets() -> impl Strategy<Value = (usize, Vec<Vec<Segment>>)> {
    (20usize..200).prop_flat_map(|n| (Just(n), prop::collection::vec(segment_list(n), 1..5)))
}

proptest! {
    // Property: every index of a common segment is covered by every variable
    #[test]
    fn prop_common_segments_are_covered_by_all((n, variables) in variable_sets(), min_length in 1usize..30) {
        let common = find_common_segments(&variables, n, min_length);
        let masks: Vec<Vec<bool>> = variables.iter().map(|v| mask_from_segments(v, n)).collect();

        for seg in &common {
            prop_assert!(seg.len() >= min_length);
            for i in seg.indices() {
                prop_assert!(masks.iter().all(|m| m[i]));
            }
        }
    }

    // Property: a single variable comes back re-filtered by minimum length
    #[test]
    fn prop_single_variable_round_trip(segments in segment_list(150), min_length in 1usize..30) {
        let expected: Vec<Segment> = segments.iter().copied().filter(|s| s.len() >= min_length).collect();
        prop_assert_eq!(find_common_segments([&segments], 150, min_length), expected);
    }

    // Property: merging neither gains nor loses samples
    #[test]
    fn prop_merge_conserves_duration(
        levels in prop::collection::vec(prop::sample::select(vec![10.0, 10.1, 10.3, 12.0, 20.0]), 1..12),
        tolerance in 0.0f64..0.5
    ) {
        // One 25-sample segment per level, separated by 5-sample gaps
        let n = levels.len() * 30;
        let mut sp = vec![f64::NAN; n];
        let mut segments = Vec::new();
        for (k, &level) in levels.iter().enumerate() {
            let seg = Segment::new(k * 30, k * 30 + 24);
            for i in seg.indices() {
                sp[i] = level;
            }
            segments.push(seg);
        }

        let records = build_segment_records(&segments, &[NamedSeries::new("feed", &sp)], &[]).unwrap();
        let none: &[&str] = &[];
        let outcome = ModeMerger::new(tolerance).unwrap().merge(&records, &["feed"], none);

        let mut seen: Vec<usize> = Vec::new();
        for mode in &outcome.modes {
            let summed: usize = mode.segments.iter().map(|s| s.end - s.start + 1).sum();
            prop_assert_eq!(mode.total_length, summed);
            seen.extend(&mode.merged_from);
        }
        let all: usize = outcome.modes.iter().map(|m| m.total_length).sum();
        prop_assert_eq!(all, total_length(&segments));

        seen.sort_unstable();
        prop_assert_eq!(seen, (1..=levels.len()).collect::<Vec<_>>());
    }

    // Property: identical segments always merge for any non-negative tolerance
    #[test]
    fn prop_identical_segments_merge(value in -1.0e3f64..1.0e3, tolerance in 0.0f64..0.2) {
        let sp = vec![value; 60];
        let segments = [Segment::new(0, 19), Segment::new(40, 59)];
        let records = build_segment_records(&segments, &[NamedSeries::new("feed", &sp)], &[]).unwrap();
        let none: &[&str] = &[];
        let outcome = ModeMerger::new(tolerance).unwrap().merge(&records, &["feed"], none);
        prop_assert_eq!(outcome.modes.len(), 1);
    }
}

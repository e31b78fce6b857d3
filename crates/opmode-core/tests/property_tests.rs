//! Property-based tests for region extraction and the statistics primitives

use opmode_core::{extract_contiguous_regions, mask_from_segments, stats, Segment};
use proptest::prelude::*;

proptest! {
    // Property: every region is a maximal run of `true` at least `min_length` long
    #[test]
    fn prop_regions_are_maximal_runs(
        mask in prop::collection::vec(any::<bool>(), 0..300),
        min_length in 0usize..30
    ) {
        let regions = extract_contiguous_regions(&mask, min_length);

        for seg in &regions {
            prop_assert!(seg.end < mask.len());
            prop_assert!(seg.len() >= min_length);
            prop_assert!(seg.indices().all(|i| mask[i]));
            prop_assert!(seg.start == 0 || !mask[seg.start - 1]);
            prop_assert!(seg.end + 1 == mask.len() || !mask[seg.end + 1]);
        }
    }

    // Property: regions are sorted, disjoint and never cover more than the mask does
    #[test]
    fn prop_regions_sorted_and_disjoint(
        mask in prop::collection::vec(any::<bool>(), 0..300),
        min_length in 1usize..30
    ) {
        let regions = extract_contiguous_regions(&mask, min_length);

        for pair in regions.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }

        let covered: usize = regions.iter().map(Segment::len).sum();
        let true_count = mask.iter().filter(|&&m| m).count();
        prop_assert!(covered <= true_count);
    }

    // Property: mask -> regions -> mask is lossless when nothing is filtered
    #[test]
    fn prop_min_length_one_round_trips(mask in prop::collection::vec(any::<bool>(), 1..200)) {
        let regions = extract_contiguous_regions(&mask, 1);
        prop_assert_eq!(mask_from_segments(&regions, mask.len()), mask);
    }

    // Property: population std is shift invariant and never negative
    #[test]
    fn prop_population_std_shift_invariant(
        data in prop::collection::vec(-1.0e3f64..1.0e3, 2..100),
        shift in -1.0e3f64..1.0e3
    ) {
        let shifted: Vec<f64> = data.iter().map(|x| x + shift).collect();
        let a = stats::population_std(&data);
        let b = stats::population_std(&shifted);
        prop_assert!(a >= 0.0);
        prop_assert!((a - b).abs() <= 1e-6 * (1.0 + a));
    }

    // Property: adding a line with slope m adds exactly m to the fitted slope
    #[test]
    fn prop_linear_slope_additive(
        data in prop::collection::vec(-10.0f64..10.0, 3..60),
        m in -5.0f64..5.0
    ) {
        let tilted: Vec<f64> = data.iter().enumerate().map(|(i, y)| y + m * i as f64).collect();
        let delta = stats::linear_slope(&tilted) - stats::linear_slope(&data);
        prop_assert!((delta - m).abs() < 1e-6);
    }
}

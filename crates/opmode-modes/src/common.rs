//! Intersection of per-variable stable segments

use opmode_core::{extract_contiguous_regions, intersect_mask, mask_from_segments, Segment};
use tracing::debug;

/// Stretches where every variable is stable at the same time
///
/// Each item is one variable's segment list. The per-sample coverage of
/// every list is ANDed together and the surviving runs of at least
/// `min_length` samples are returned. A variable with no segments excludes
/// all time. No variables at all yields no segments.
///
/// # Examples
///
/// ```rust
/// use opmode_core::Segment;
/// use opmode_modes::find_common_segments;
///
/// let feed = vec![Segment::new(0, 49)];
/// let temp = vec![Segment::new(10, 39), Segment::new(45, 60)];
/// let common = find_common_segments([feed, temp], 100, 20);
/// assert_eq!(common, vec![Segment::new(10, 39)]);
/// ```
pub fn find_common_segments<I, S>(variables: I, n_samples: usize, min_length: usize) -> Vec<Segment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[Segment]>,
{
    let mut combined: Option<Vec<bool>> = None;

    for segments in variables {
        let mask = mask_from_segments(segments.as_ref(), n_samples);
        match combined.as_mut() {
            Some(acc) => intersect_mask(acc, &mask),
            None => combined = Some(mask),
        }
    }

    let Some(combined) = combined else {
        return Vec::new();
    };

    let common = extract_contiguous_regions(&combined, min_length);
    debug!(segments = common.len(), "common stable segments");
    common
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_no_variables() {
        let none: Vec<Vec<Segment>> = Vec::new();
        assert!(find_common_segments(none, 100, 20).is_empty());
    }

    #[test]
    fn test_single_variable_is_refiltered() {
        let segs = vec![Segment::new(0, 29), Segment::new(40, 49), Segment::new(60, 99)];
        assert_eq!(
            find_common_segments([segs], 100, 20),
            vec![Segment::new(0, 29), Segment::new(60, 99)]
        );
    }

    #[test]
    fn test_variable_without_segments_excludes_everything() {
        let map = BTreeMap::from([
            ("a".to_string(), vec![Segment::new(0, 99)]),
            ("b".to_string(), Vec::new()),
        ]);
        assert!(find_common_segments(map.values(), 100, 20).is_empty());
    }

    #[test]
    fn test_overlap_shorter_than_minimum_is_dropped() {
        let a = vec![Segment::new(0, 30)];
        let b = vec![Segment::new(15, 60)];
        assert!(find_common_segments([a.clone(), b.clone()], 61, 20).is_empty());
        assert_eq!(find_common_segments([a, b], 61, 16), vec![Segment::new(15, 30)]);
    }

    #[test]
    fn test_adjacent_segments_join() {
        // Two touching segments of one variable cover one continuous run
        let a = vec![Segment::new(0, 9), Segment::new(10, 29)];
        let b = vec![Segment::new(0, 29)];
        assert_eq!(find_common_segments([a, b], 30, 20), vec![Segment::new(0, 29)]);
    }
}

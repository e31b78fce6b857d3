//! Contiguous region extraction from boolean masks

use crate::segment::Segment;

/// Extract maximal runs of `true` from a mask
///
/// Single left-to-right pass. Runs shorter than `min_length` are dropped.
/// The returned segments never overlap and are sorted by `start`.
///
/// # Examples
///
/// ```rust
/// use opmode_core::{extract_contiguous_regions, Segment};
///
/// let mask = [true, true, false, true, true, true, false];
/// assert_eq!(extract_contiguous_regions(&mask, 3), vec![Segment::new(3, 5)]);
/// ```
pub fn extract_contiguous_regions(mask: &[bool], min_length: usize) -> Vec<Segment> {
    let mut regions = Vec::new();
    let n = mask.len();
    let mut i = 0;

    while i < n {
        if !mask[i] {
            i += 1;
            continue;
        }

        let start = i;
        while i < n && mask[i] {
            i += 1;
        }
        let region = Segment::new(start, i - 1);
        if region.len() >= min_length {
            regions.push(region);
        }
    }

    regions
}

/// Split a region at every flagged sample and keep in-control runs
///
/// `out_of_control` is relative to `region`; the returned segments are in
/// global indices.
pub fn split_at_flags(region: Segment, out_of_control: &[bool], min_length: usize) -> Vec<Segment> {
    let in_control: Vec<bool> = out_of_control.iter().map(|&ooc| !ooc).collect();
    extract_contiguous_regions(&in_control, min_length)
        .into_iter()
        .map(|seg| seg.offset_by(region.start))
        .collect()
}

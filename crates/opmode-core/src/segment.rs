//! Inclusive index intervals and boolean sample masks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive `[start, end]` interval into a shared sample index space
///
/// Invariant: `start <= end`. Segments are small `Copy` values; every stage
/// creates fresh ones rather than editing its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    /// Create a new segment
    ///
    /// `start` and `end` are swapped if given in reverse order.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Number of samples covered, `end - start + 1`
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// A segment always covers at least one sample
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if a sample index falls inside this segment
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    /// Check the segment fits a series of `len` samples
    pub fn fits(&self, len: usize) -> bool {
        self.end < len
    }

    /// Iterate over the covered sample indices
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Shift a segment expressed relative to `offset` back into global indices
    pub fn offset_by(&self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Borrow the covered part of a series
    ///
    /// The caller guarantees `self.fits(data.len())`.
    pub fn slice<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        &data[self.start..=self.end]
    }
}

impl From<(usize, usize)> for Segment {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Total number of samples covered by a list of segments
pub fn total_length(segments: &[Segment]) -> usize {
    segments.iter().map(Segment::len).sum()
}

/// Boolean mask of length `n` that is true wherever any segment covers a sample
///
/// Parts of segments beyond `n` are ignored.
pub fn mask_from_segments(segments: &[Segment], n: usize) -> Vec<bool> {
    let mut mask = vec![false; n];
    for seg in segments {
        if seg.start >= n {
            continue;
        }
        let end = seg.end.min(n - 1);
        mask[seg.start..=end].iter_mut().for_each(|m| *m = true);
    }
    mask
}

/// In-place logical AND of `other` into `combined`
///
/// Samples past the end of `other` are treated as false.
pub fn intersect_mask(combined: &mut [bool], other: &[bool]) {
    for (i, c) in combined.iter_mut().enumerate() {
        *c = *c && other.get(i).copied().unwrap_or(false);
    }
}

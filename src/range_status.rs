//! A boolean status over `u64`, assigned a range at a time.

use std::{
    cmp::Ordering,
    fmt,
    ops::{Bound, Range},
};

use thiserror::Error;

use crate::tree::WeightBalancedTree;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Errors raised by a [`RangeStatusStorer`].
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum RangeStatusError {
    /// The range covers no points.
    #[error("range must not be empty.")]
    EmptyRange,
}

/// A half-open stretch of points whose status is `true`.
///
/// Spans are ordered (and compared) by their start alone: the stored spans
/// never overlap, so the start identifies a span, and a bare start makes a
/// probe for searching.
#[derive(Clone, Copy, Debug)]
struct Span {
    start: u64,
    end: u64,
}

impl Span {
    const fn probe(start: u64) -> Self {
        Span { start, end: start }
    }

    const fn range(self) -> Range<u64> {
        self.start..self.end
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
    }
}

impl Eq for Span {}

impl PartialOrd for Span {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Span {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start.cmp(&other.start)
    }
}

/// Tracks which points of `u64` are switched on.
///
/// Every point starts out `false`. Only the `true` stretches are stored, as
/// maximal spans: setting a range merges it with any span it overlaps or
/// touches, and clearing a range trims or splits the spans it cuts through.
///
/// Ranges are half-open, so the points covered are `0..u64::MAX`: the point
/// `u64::MAX` itself can never be set and always reads `false`.
///
/// # Examples
///
/// ```
/// use wbtree::{RangeStatusError, RangeStatusStorer};
///
/// let mut status = RangeStatusStorer::new();
/// status.set(10..20, true)?;
/// status.set(20..30, true)?;
/// status.set(14..16, false)?;
/// assert!(status.get(13));
/// assert!(!status.get(15));
/// assert_eq!(status.true_ranges().collect::<Vec<_>>(), [10..14, 16..30]);
/// # Ok::<(), RangeStatusError>(())
/// ```
#[derive(Clone, Default)]
pub struct RangeStatusStorer {
    spans: WeightBalancedTree<Span>,
}

impl RangeStatusStorer {
    /// Creates a storer with every point `false`.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        RangeStatusStorer {
            spans: WeightBalancedTree::new(),
        }
    }

    /// Assigns `status` to every point of `range`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeStatusError::EmptyRange`] if `range` covers no points.
    pub fn set(&mut self, range: Range<u64>, status: bool) -> Result<(), RangeStatusError> {
        if range.is_empty() {
            return Err(RangeStatusError::EmptyRange);
        }

        // Every span overlapping or touching the range: possibly one starting
        // at or before it, then all those starting inside it or right at its
        // end.
        let low = Span::probe(range.start);
        let high = Span::probe(range.end);
        let mut affected: Vec<Span> = self
            .spans
            .range(Bound::Unbounded, Bound::Included(&low))
            .next_back()
            .filter(|span| span.end >= range.start)
            .copied()
            .into_iter()
            .collect();
        affected.extend(
            self.spans
                .range(Bound::Excluded(&low), Bound::Included(&high))
                .copied(),
        );

        for span in &affected {
            match self.spans.remove(span) {
                Ok(_) => {}
                Err(_) => unreachable!("`set()` - affected span vanished"),
            }
        }

        let mut replacements = Vec::with_capacity(2);
        if status {
            let start = affected.first().map_or(range.start, |span| span.start.min(range.start));
            let end = affected.last().map_or(range.end, |span| span.end.max(range.end));
            replacements.push(Span { start, end });
        } else {
            for span in &affected {
                if span.start < range.start {
                    replacements.push(Span {
                        start: span.start,
                        end: range.start,
                    });
                }
                if span.end > range.end {
                    replacements.push(Span {
                        start: range.end,
                        end: span.end,
                    });
                }
            }
        }

        log::trace!(
            "set {range:?} to {status}: replaced {} spans with {}",
            affected.len(),
            replacements.len()
        );
        for span in replacements {
            match self.spans.insert(span) {
                Ok(()) => {}
                Err(_) => unreachable!("`set()` - replacement span overlaps a kept span"),
            }
        }
        Ok(())
    }

    /// The status of a single point.
    #[must_use]
    pub fn get(&self, point: u64) -> bool {
        self.spans
            .range(Bound::Unbounded, Bound::Included(&Span::probe(point)))
            .next_back()
            .is_some_and(|span| point < span.end)
    }

    /// The maximal `true` ranges, in ascending order.
    pub fn true_ranges(&self) -> impl DoubleEndedIterator<Item = Range<u64>> + ExactSizeIterator + '_ {
        self.spans.iter().map(|span| span.range())
    }

    /// Number of maximal `true` ranges.
    #[inline]
    #[must_use]
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Resets every point to `false`.
    #[inline]
    pub fn clear(&mut self) {
        self.spans.clear();
    }
}

impl PartialEq for RangeStatusStorer {
    fn eq(&self, other: &Self) -> bool {
        self.true_ranges().eq(other.true_ranges())
    }
}

impl Eq for RangeStatusStorer {}

impl fmt::Debug for RangeStatusStorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.true_ranges()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Range;

    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    use super::{RangeStatusError, RangeStatusStorer};

    fn ranges(status: &RangeStatusStorer) -> Vec<Range<u64>> {
        status.true_ranges().collect()
    }

    #[test]
    fn empty_range_rejected() {
        let mut status = RangeStatusStorer::new();
        assert_eq!(status.set(5..5, true), Err(RangeStatusError::EmptyRange));
        assert_eq!(status.set(5..5, false), Err(RangeStatusError::EmptyRange));
    }

    #[test]
    fn default_is_false() {
        let status = RangeStatusStorer::default();
        assert!(!status.get(0));
        assert!(!status.get(u64::MAX));
        assert_eq!(status.span_count(), 0);
    }

    #[rstest]
    #[case::disjoint(&[(0..5, true), (10..15, true)], &[0..5, 10..15])]
    #[case::touching(&[(0..5, true), (5..10, true)], &[0..10])]
    #[case::overlapping(&[(0..6, true), (4..10, true)], &[0..10])]
    #[case::bridging(&[(0..2, true), (4..6, true), (8..10, true), (1..9, true)], &[0..10])]
    #[case::contained(&[(0..10, true), (3..4, true)], &[0..10])]
    #[case::split(&[(0..10, true), (3..4, false)], &[0..3, 4..10])]
    #[case::trim_both_ends(&[(0..4, true), (6..10, true), (2..8, false)], &[0..2, 8..10])]
    #[case::erase(&[(2..4, true), (6..8, true), (0..10, false)], &[])]
    #[case::clear_nothing(&[(0..4, true), (4..8, false)], &[0..4])]
    fn set_sequences(#[case] operations: &[(Range<u64>, bool)], #[case] expected: &[Range<u64>]) -> Result<()> {
        let mut status = RangeStatusStorer::new();
        for (range, value) in operations {
            status.set(range.clone(), *value)?;
        }
        assert_eq!(ranges(&status), expected);
        Ok(())
    }

    #[test]
    fn point_queries() -> Result<()> {
        let mut status = RangeStatusStorer::new();
        status.set(10..20, true)?;
        assert!(!status.get(9));
        assert!(status.get(10));
        assert!(status.get(19));
        assert!(!status.get(20));
        status.set(u64::MAX - 1..u64::MAX, true)?;
        assert!(status.get(u64::MAX - 1));
        assert_eq!(format!("{status:?}"), format!("[10..20, {}..{}]", u64::MAX - 1, u64::MAX));

        let mut other = RangeStatusStorer::new();
        other.set(10..21, true)?;
        assert_ne!(status, other);
        other.set(20..21, false)?;
        other.set(u64::MAX - 1..u64::MAX, true)?;
        assert_eq!(status, other);

        status.clear();
        assert!(!status.get(15));
        Ok(())
    }

    #[test]
    fn top_point_is_never_set() -> Result<()> {
        let mut status = RangeStatusStorer::new();
        status.set(0..u64::MAX, true)?;
        assert!(status.get(u64::MAX - 1));
        assert!(!status.get(u64::MAX));
        assert_eq!(ranges(&status), [0..u64::MAX]);
        Ok(())
    }

    proptest! {
        #[test]
        fn matches_bitmap(operations in prop::collection::vec((0_u64..64, 1_u64..16, any::<bool>()), 0..64)) {
            let mut status = RangeStatusStorer::new();
            let mut model = [false; 80];
            for (start, len, value) in operations {
                status.set(start..start + len, value).unwrap();
                for point in start..start + len {
                    model[usize::try_from(point).unwrap()] = value;
                }
            }
            for (point, expected) in model.iter().enumerate() {
                prop_assert_eq!(status.get(u64::try_from(point).unwrap()), *expected);
            }

            // Stored spans are maximal: neither overlapping nor touching.
            let spans = ranges(&status);
            for pair in spans.windows(2) {
                prop_assert!(pair[0].end < pair[1].start);
            }
            prop_assert_eq!(spans.len(), status.span_count());
        }
    }
}

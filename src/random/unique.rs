//! Drawing integers from a range without repetition.

use std::ops::RangeInclusive;

use rand::prelude::*;
use thiserror::Error;

use crate::tree::WeightBalancedTree;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Errors raised by a [`UniqueRandomGenerator`].
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum UniqueRandomError {
    /// The range's start lies beyond its end.
    #[error("range must not be empty.")]
    EmptyRange,
    /// Every value of the range has been drawn.
    #[error("every value in the range has been drawn.")]
    Exhausted,
}

/// Draws the values of an inclusive range in random order, each at most
/// once.
///
/// Only the values drawn so far are stored, so even the full `u64` range can
/// be sampled without allocating for it up front. Every draw picks uniformly
/// among the values still available.
///
/// # Examples
///
/// ```
/// use wbtree::{UniqueRandomError, UniqueRandomGenerator};
///
/// let mut generator = UniqueRandomGenerator::seeded(1..=3, 42)?;
/// let mut drawn: Vec<u64> = generator.by_ref().collect();
/// drawn.sort_unstable();
/// assert_eq!(drawn, [1, 2, 3]);
/// assert_eq!(generator.draw(), Err(UniqueRandomError::Exhausted));
/// # Ok::<(), UniqueRandomError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UniqueRandomGenerator {
    /// Smallest value of the range.
    min: u64,
    /// Largest value of the range.
    max: u64,
    /// Values handed out so far.
    drawn: WeightBalancedTree<u64>,
    /// The random number generator.
    rng: SmallRng,
}

impl UniqueRandomGenerator {
    /// Creates a generator over `range`, seeded from the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns [`UniqueRandomError::EmptyRange`] if the range is empty.
    #[inline]
    pub fn new(range: RangeInclusive<u64>) -> Result<Self, UniqueRandomError> {
        Self::with_rng(range, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Creates a generator over `range` whose sequence is fixed by `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`UniqueRandomError::EmptyRange`] if the range is empty.
    #[inline]
    pub fn seeded(range: RangeInclusive<u64>, seed: u64) -> Result<Self, UniqueRandomError> {
        Self::with_rng(range, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(range: RangeInclusive<u64>, rng: SmallRng) -> Result<Self, UniqueRandomError> {
        let (min, max) = range.into_inner();
        if min > max {
            return Err(UniqueRandomError::EmptyRange);
        }
        Ok(UniqueRandomGenerator {
            min,
            max,
            drawn: WeightBalancedTree::new(),
            rng,
        })
    }

    /// Number of values in the range, drawn or not.
    #[inline]
    #[must_use]
    pub fn span(&self) -> u128 {
        u128::from(self.max - self.min) + 1
    }

    /// Number of values handed out so far.
    #[inline]
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.drawn.len()
    }

    /// Number of values still available.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> u128 {
        self.span() - widen(self.drawn.len())
    }

    /// Returns `true` if `value` has already been handed out.
    #[inline]
    #[must_use]
    pub fn is_drawn(&self, value: u64) -> bool {
        self.drawn.contains(&value)
    }

    /// Makes every value of the range available again.
    #[inline]
    pub fn reset(&mut self) {
        log::debug!(
            "resetting unique generator over {}..={} after {} draws",
            self.min,
            self.max,
            self.drawn.len()
        );
        self.drawn.clear();
    }

    /// Number of values in `min..=value` not yet drawn.
    fn available_up_to(&self, value: u64) -> u128 {
        let taken = self.drawn.count_less_than(&value) + usize::from(self.drawn.contains(&value));
        u128::from(value - self.min) + 1 - widen(taken)
    }

    /// Draws a value not returned before.
    ///
    /// A rank `r` is picked uniformly among the remaining values, then the
    /// smallest value with more than `r` available values at or below it is
    /// found by bisection.
    ///
    /// # Errors
    ///
    /// Returns [`UniqueRandomError::Exhausted`] once every value is drawn.
    pub fn draw(&mut self) -> Result<u64, UniqueRandomError> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Err(UniqueRandomError::Exhausted);
        }
        let rank = self.rng.random_range(0..remaining);

        let (mut low, mut high) = (self.min, self.max);
        while low < high {
            let mid = low + (high - low) / 2;
            if self.available_up_to(mid) > rank {
                high = mid;
            } else {
                low = mid + 1;
            }
        }

        match self.drawn.insert(low) {
            Ok(()) => Ok(low),
            Err(_) => unreachable!("`draw()` - bisection landed on a drawn value"),
        }
    }
}

impl Iterator for UniqueRandomGenerator {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        self.draw().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

#[inline]
#[expect(clippy::as_conversions, reason = "usize is at most 64 bits wide")]
const fn widen(count: usize) -> u128 {
    count as u128
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, ops::RangeInclusive};

    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{UniqueRandomError, UniqueRandomGenerator};

    #[test]
    fn empty_range() {
        assert_eq!(
            UniqueRandomGenerator::new(RangeInclusive::new(5, 4)).err(),
            Some(UniqueRandomError::EmptyRange)
        );
    }

    #[rstest]
    #[case(0, 0)]
    #[case(10, 19)]
    #[case(1000, 1255)]
    #[case(u64::MAX - 7, u64::MAX)]
    fn draws_each_value_once(#[case] min: u64, #[case] max: u64) -> Result<()> {
        let mut generator = UniqueRandomGenerator::seeded(min..=max, 0x1234_abcd)?;
        let mut drawn: Vec<u64> = generator.by_ref().collect();
        assert_eq!(generator.draw(), Err(UniqueRandomError::Exhausted));
        assert_eq!(generator.remaining(), 0);

        drawn.sort_unstable();
        assert_eq!(drawn, (min..=max).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn bookkeeping() -> Result<()> {
        let mut generator = UniqueRandomGenerator::seeded(1..=100, 9)?;
        assert_eq!(generator.span(), 100);
        let first = generator.draw()?;
        let second = generator.draw()?;
        assert_ne!(first, second);
        assert!(generator.is_drawn(first));
        assert_eq!(generator.drawn(), 2);
        assert_eq!(generator.remaining(), 98);
        assert_eq!(generator.size_hint(), (98, Some(98)));

        generator.reset();
        assert_eq!(generator.drawn(), 0);
        assert!(!generator.is_drawn(first));
        Ok(())
    }

    #[test]
    fn seed_fixes_sequence() -> Result<()> {
        let first: Vec<u64> = UniqueRandomGenerator::seeded(0..=1000, 3)?.take(20).collect();
        let second: Vec<u64> = UniqueRandomGenerator::seeded(0..=1000, 3)?.take(20).collect();
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn full_range_is_usable() -> Result<()> {
        let mut generator = UniqueRandomGenerator::seeded(0..=u64::MAX, 1)?;
        assert_eq!(generator.span(), 1 << 64);
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generator.draw()?));
        }
        Ok(())
    }

    #[test]
    fn first_draw_is_uniform() -> Result<()> {
        let mut counts = [0_u32; 4];
        for seed in 0..4000 {
            let value = UniqueRandomGenerator::seeded(0..=3, seed)?.draw()?;
            counts[usize::try_from(value)?] += 1;
        }
        for count in counts {
            assert!((800..1200).contains(&count), "{counts:?}");
        }
        Ok(())
    }
}

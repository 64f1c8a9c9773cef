//! Sampling items in proportion to integer weights.

use rand::prelude::*;
use thiserror::Error;

use crate::tree::WeightBalancedTree;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Errors raised by a [`WeightedRandomGenerator`].
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum WeightedRandomError {
    /// Items must carry a positive weight.
    #[error("weight must be non-zero.")]
    ZeroWeight,
    /// The total weight would no longer fit in a `u64`.
    #[error("total weight must fit in a u64.")]
    WeightOverflow,
    /// There is nothing to sample from.
    #[error("no items to sample from.")]
    Empty,
}

/// Samples its items with probability proportional to their weights.
///
/// The items are laid end to end on the interval `[0, total_weight)`, each
/// covering a stretch as long as its weight, and the start of every stretch
/// is stored in a tree. A uniform point on the interval then identifies an
/// item by counting the stretches that start at or before it.
///
/// # Examples
///
/// ```
/// use wbtree::{WeightedRandomError, WeightedRandomGenerator};
///
/// let mut generator = WeightedRandomGenerator::seeded(7);
/// generator.push("rare", 1)?;
/// generator.push("common", 99)?;
/// assert_eq!(generator.total_weight(), 100);
/// let item = generator.sample()?;
/// assert!(["rare", "common"].contains(item));
/// # Ok::<(), WeightedRandomError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WeightedRandomGenerator<T> {
    /// The items, in the order they were pushed.
    items: Vec<T>,
    /// Where each item's stretch begins; the `i`-th smallest belongs to
    /// `items[i]`.
    offsets: WeightBalancedTree<u64>,
    /// Sum of all weights.
    total: u64,
    /// The random number generator.
    rng: SmallRng,
}

impl<T> WeightedRandomGenerator<T> {
    /// Creates an empty generator seeded from the thread RNG.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_rng(&mut rand::rng()))
    }

    /// Creates an empty generator whose sequence is fixed by `seed`.
    #[inline]
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        WeightedRandomGenerator {
            items: Vec::new(),
            offsets: WeightBalancedTree::new(),
            total: 0,
            rng,
        }
    }

    /// Adds `item` with the given relative `weight`.
    ///
    /// # Errors
    ///
    /// Returns [`WeightedRandomError::ZeroWeight`] for a zero weight and
    /// [`WeightedRandomError::WeightOverflow`] if the total weight would
    /// exceed `u64::MAX`. The generator is unchanged in either case.
    pub fn push(&mut self, item: T, weight: u64) -> Result<(), WeightedRandomError> {
        if weight == 0 {
            return Err(WeightedRandomError::ZeroWeight);
        }
        let total = self
            .total
            .checked_add(weight)
            .ok_or(WeightedRandomError::WeightOverflow)?;
        match self.offsets.insert(self.total) {
            Ok(()) => {}
            Err(_) => unreachable!("`push()` - offsets are strictly increasing"),
        }
        self.items.push(item);
        self.total = total;
        Ok(())
    }

    /// Picks the index of an item, weighted by the items' weights.
    ///
    /// # Errors
    ///
    /// Returns [`WeightedRandomError::Empty`] if no items were pushed.
    pub fn sample_index(&mut self) -> Result<usize, WeightedRandomError> {
        if self.items.is_empty() {
            return Err(WeightedRandomError::Empty);
        }
        let point = self.rng.random_range(0..self.total);
        // The offset of `items[0]` is 0, so at least one offset is <= point.
        let covering = self.offsets.count_less_than(&point) + usize::from(self.offsets.contains(&point));
        Ok(covering - 1)
    }

    /// Picks an item, weighted by the items' weights.
    ///
    /// # Errors
    ///
    /// Returns [`WeightedRandomError::Empty`] if no items were pushed.
    #[inline]
    pub fn sample(&mut self) -> Result<&T, WeightedRandomError> {
        let index = self.sample_index()?;
        self.items.get(index).ok_or(WeightedRandomError::Empty)
    }

    /// Sum of all weights.
    #[inline]
    #[must_use]
    pub const fn total_weight(&self) -> u64 {
        self.total
    }

    /// Number of items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no items were pushed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The `index`-th pushed item.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }
}

impl<T> Default for WeightedRandomGenerator<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

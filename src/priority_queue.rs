//! A priority queue without duplicates, served from either end.

use std::fmt;

use crate::{
    error::TreeError,
    tree::{Iter, WeightBalancedTree},
};

/// A set of items served smallest-first (or, on request, largest-first).
///
/// Backed by a [`WeightBalancedTree`], so items can also be withdrawn from
/// the middle of the queue in `O(log n)`.
///
/// # Examples
///
/// ```
/// use wbtree::{PriorityQueue, TreeError};
///
/// let mut queue = PriorityQueue::new();
/// queue.enqueue(3)?;
/// queue.enqueue(1)?;
/// queue.enqueue(2)?;
/// assert_eq!(queue.dequeue()?, 1);
/// assert_eq!(queue.dequeue_last()?, 3);
/// assert_eq!(queue.len(), 1);
/// # Ok::<(), TreeError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PriorityQueue<T> {
    items: WeightBalancedTree<T>,
}

impl<T> PriorityQueue<T> {
    /// Creates an empty queue.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        PriorityQueue {
            items: WeightBalancedTree::new(),
        }
    }

    /// Removes and returns the smallest item.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyCollection`] if the queue is empty.
    #[inline]
    pub fn dequeue(&mut self) -> Result<T, TreeError> {
        self.items.pop_min()
    }

    /// Removes and returns the largest item.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyCollection`] if the queue is empty.
    #[inline]
    pub fn dequeue_last(&mut self) -> Result<T, TreeError> {
        self.items.pop_max()
    }

    /// Returns the item [`dequeue`][Self::dequeue] would return next.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyCollection`] if the queue is empty.
    #[inline]
    pub fn peek(&self) -> Result<&T, TreeError> {
        self.items.min()
    }

    /// Returns the item [`dequeue_last`][Self::dequeue_last] would return
    /// next.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyCollection`] if the queue is empty.
    #[inline]
    pub fn peek_last(&self) -> Result<&T, TreeError> {
        self.items.max()
    }

    /// Number of queued items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is queued.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every queued item.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates over the queued items in the order they would be dequeued.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> PriorityQueue<T>
where
    T: Ord,
{
    /// Adds an item.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] if an equal item is queued already.
    #[inline]
    pub fn enqueue(&mut self, item: T) -> Result<(), TreeError> {
        self.items.insert(item)
    }

    /// Withdraws a specific item, wherever it sits in the queue.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if the item is not queued.
    #[inline]
    pub fn remove(&mut self, item: &T) -> Result<T, TreeError> {
        self.items.remove(item)
    }

    /// Returns `true` if an equal item is queued.
    #[inline]
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

impl<T> Default for PriorityQueue<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for PriorityQueue<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for PriorityQueue<T>
where
    T: Ord,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iterable: I) -> Self {
        PriorityQueue {
            items: iterable.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a PriorityQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

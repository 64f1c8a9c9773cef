//! Iterators over the keys of a [`WeightBalancedTree`].

use std::iter::FusedIterator;

use crate::tree::{WeightBalancedTree, arena::Handle, node::Side};

// ////////////////////////////////////////////////////////////////////////////
// Iter
// ////////////////////////////////////////////////////////////////////////////

/// A lazy iterator over a contiguous run of keys, in ascending order from the
/// front and descending order from the back.
///
/// The number of remaining keys is known up front from the order statistics,
/// so the iterator is exact-size. Each step walks to the in-order neighbour:
/// `O(1)` amortised over a full traversal, `O(depth)` for a single step.
pub struct Iter<'a, K> {
    pub(crate) tree: &'a WeightBalancedTree<K>,
    pub(crate) front: Option<Handle>,
    pub(crate) back: Option<Handle>,
    pub(crate) remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = if self.remaining == 0 {
            None
        } else {
            self.tree.successor(handle)
        };
        Some(&self.tree.node(handle).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = if self.remaining == 0 {
            None
        } else {
            self.tree.predecessor(handle)
        };
        Some(&self.tree.node(handle).key)
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// IntoIter
// ////////////////////////////////////////////////////////////////////////////

/// Consuming iterator over the keys of a tree, in ascending order.
pub struct IntoIter<K> {
    pub(crate) keys: std::vec::IntoIter<K>,
}

impl<K> IntoIter<K> {
    pub(crate) fn new(mut tree: WeightBalancedTree<K>) -> Self {
        let mut handles = Vec::with_capacity(tree.len());
        let mut current = tree.root.map(|root| tree.extreme(root, Side::Left));
        while let Some(handle) = current {
            handles.push(handle);
            current = tree.successor(handle);
        }
        let keys = handles
            .into_iter()
            .map(|handle| tree.nodes.take(handle).key)
            .collect::<Vec<_>>();
        IntoIter {
            keys: keys.into_iter(),
        }
    }
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K> DoubleEndedIterator for IntoIter<K> {
    fn next_back(&mut self) -> Option<K> {
        self.keys.next_back()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}

impl<K> FusedIterator for IntoIter<K> {}

//! A binary search tree kept in shape by subtree weights.

mod arena;
mod balance;
mod iter;
mod mutate;
pub(crate) mod node;
mod traverse;

use std::{
    fmt,
    hash::{self, Hash},
    iter::Rev,
    ops::Bound,
};

use rand::Rng;

use crate::{
    error::TreeError,
    tree::{
        arena::{Arena, Handle},
        node::{Node, Side},
    },
};

pub use crate::tree::{
    iter::{IntoIter, Iter},
    node::NodeRef,
};

// ////////////////////////////////////////////////////////////////////////////
// WeightBalancedTree
// ////////////////////////////////////////////////////////////////////////////

/// An ordered set of unique keys stored in a weight-balanced binary search
/// tree.
///
/// Every node records how many nodes sit in each of its subtrees. Those
/// counters give the order statistics ([`count_less_than`], uniform
/// [`random_item`], exact-size range iterators) and also drive balancing: a
/// rotation is applied only when it strictly reduces the difference between
/// the two sides of a node.
///
/// Balancing can be switched off at construction, in which case the tree is a
/// plain binary search tree whose shape depends on insertion order.
///
/// [`count_less_than`]: WeightBalancedTree::count_less_than
/// [`random_item`]: WeightBalancedTree::random_item
#[derive(Clone)]
pub struct WeightBalancedTree<K> {
    nodes: Arena<Node<K>>,
    root: Option<Handle>,
    maintain_balance: bool,
    /// Deepest level reached, valid only while nothing has been removed (and
    /// only tracked for unbalanced trees, whose shape rotations never alter).
    depth: Option<usize>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K> WeightBalancedTree<K> {
    /// Creates an empty tree that rebalances itself after every mutation.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::WeightBalancedTree;
    ///
    /// let tree: WeightBalancedTree<i64> = WeightBalancedTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_balance(true)
    }

    /// Creates an empty tree that never restructures itself.
    #[inline]
    #[must_use]
    pub const fn unbalanced() -> Self {
        Self::with_balance(false)
    }

    /// Creates an empty tree, choosing whether mutations trigger rebalancing.
    #[inline]
    #[must_use]
    pub const fn with_balance(maintain_balance: bool) -> Self {
        WeightBalancedTree {
            nodes: Arena::new(),
            root: None,
            maintain_balance,
            depth: if maintain_balance { None } else { Some(0) },
        }
    }

    /// Builds a tree by inserting `keys` one at a time.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] as soon as a key repeats. Use
    /// [`collect`][Iterator::collect] instead to skip duplicates silently.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::{TreeError, WeightBalancedTree};
    ///
    /// let tree = WeightBalancedTree::from_keys([3, 1, 2], false)?;
    /// assert_eq!(tree.len(), 3);
    /// assert!(WeightBalancedTree::from_keys([1, 1], true).is_err());
    /// # Ok::<(), TreeError>(())
    /// ```
    pub fn from_keys(keys: impl IntoIterator<Item = K>, maintain_balance: bool) -> Result<Self, TreeError>
    where
        K: Ord,
    {
        let mut tree = Self::with_balance(maintain_balance);
        for key in keys {
            tree.insert(key)?;
        }
        Ok(tree)
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    /// Returns `true` if every mutation is followed by a rebalancing walk.
    #[inline]
    #[must_use]
    pub const fn maintains_balance(&self) -> bool {
        self.maintain_balance
    }

    /// Removes every key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::WeightBalancedTree;
    ///
    /// let mut tree: WeightBalancedTree<_> = (0..10).collect();
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.depth = if self.maintain_balance { None } else { Some(0) };
    }

    /// Returns the number of keys, read off the root's counters in `O(1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::WeightBalancedTree;
    ///
    /// let tree: WeightBalancedTree<_> = (0..10).collect();
    /// assert_eq!(tree.len(), 10);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.map_or(0, |root| self.node(root).weight())
    }

    /// Returns `true` if the tree holds no keys.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of levels in the tree (zero when empty).
    ///
    /// An unbalanced tree that has only ever grown answers from a cache in
    /// `O(1)`; otherwise the whole tree is walked.
    #[must_use]
    pub fn depth(&self) -> usize {
        if let Some(depth) = self.depth {
            return depth;
        }
        let depth = self.measure_depth();
        log::debug!("measured tree depth {depth} over {} nodes", self.len());
        depth
    }

    /// Returns an iterator over all keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::WeightBalancedTree;
    ///
    /// let tree: WeightBalancedTree<_> = [3, 1, 2].into_iter().collect();
    /// assert!(tree.iter().eq(&[1, 2, 3]));
    /// ```
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            tree: self,
            front: self.root.map(|root| self.extreme(root, Side::Left)),
            back: self.root.map(|root| self.extreme(root, Side::Right)),
            remaining: self.len(),
        }
    }

    /// Picks a key uniformly at random by a single weighted descent.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyCollection`] if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::{TreeError, WeightBalancedTree};
    ///
    /// let tree: WeightBalancedTree<_> = (0..10).collect();
    /// let key = tree.random_item(&mut rand::rng())?;
    /// assert!((0..10).contains(key));
    /// # Ok::<(), TreeError>(())
    /// ```
    pub fn random_item<R>(&self, rng: &mut R) -> Result<&K, TreeError>
    where
        R: Rng + ?Sized,
    {
        self.random_handle(rng)
            .map(|handle| &self.node(handle).key)
            .ok_or(TreeError::EmptyCollection)
    }

    /// The key at the far end of `side`.
    fn extreme_key(&self, side: Side) -> Result<&K, TreeError> {
        self.root
            .map(|root| &self.node(self.extreme(root, side)).key)
            .ok_or(TreeError::EmptyCollection)
    }

    /// Returns the smallest key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyCollection`] if the tree is empty.
    #[inline]
    pub fn min(&self) -> Result<&K, TreeError> {
        self.extreme_key(Side::Left)
    }

    /// Returns the largest key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyCollection`] if the tree is empty.
    #[inline]
    pub fn max(&self) -> Result<&K, TreeError> {
        self.extreme_key(Side::Right)
    }
}

impl<K> WeightBalancedTree<K>
where
    K: Ord,
{
    /// Returns `true` if `key` is stored in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::WeightBalancedTree;
    ///
    /// let tree: WeightBalancedTree<_> = [5, 3, 8].into_iter().collect();
    /// assert!(tree.contains(&3));
    /// assert!(!tree.contains(&4));
    /// ```
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the stored key equal to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if no such key is stored.
    #[inline]
    pub fn get(&self, key: &K) -> Result<&K, TreeError> {
        self.find(key)
            .map(|handle| &self.node(handle).key)
            .ok_or(TreeError::KeyNotFound)
    }

    /// Returns the largest key strictly less than `key`, whether or not `key`
    /// itself is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::WeightBalancedTree;
    ///
    /// let tree: WeightBalancedTree<_> = [10, 20, 30].into_iter().collect();
    /// assert_eq!(tree.next_less_than(&20), Some(&10));
    /// assert_eq!(tree.next_less_than(&25), Some(&20));
    /// assert_eq!(tree.next_less_than(&10), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn next_less_than(&self, key: &K) -> Option<&K> {
        self.neighbour_of_key(key, Side::Left)
            .map(|handle| &self.node(handle).key)
    }

    /// Returns the smallest key strictly greater than `key`, whether or not
    /// `key` itself is stored.
    #[inline]
    #[must_use]
    pub fn next_greater_than(&self, key: &K) -> Option<&K> {
        self.neighbour_of_key(key, Side::Right)
            .map(|handle| &self.node(handle).key)
    }

    /// Returns how many stored keys are strictly less than `key`, in
    /// `O(depth)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::WeightBalancedTree;
    ///
    /// let tree: WeightBalancedTree<_> = (0..100).map(|i| i * 2).collect();
    /// assert_eq!(tree.count_less_than(&10), 5);
    /// assert_eq!(tree.count_less_than(&11), 6);
    /// assert_eq!(tree.count_greater_than(&190), 4);
    /// ```
    #[inline]
    #[must_use]
    pub fn count_less_than(&self, key: &K) -> usize {
        self.count_beyond(key, Side::Left)
    }

    /// Returns how many stored keys are strictly greater than `key`.
    #[inline]
    #[must_use]
    pub fn count_greater_than(&self, key: &K) -> usize {
        self.count_beyond(key, Side::Right)
    }

    /// Returns an iterator over the keys strictly less than `key`, ascending.
    #[inline]
    #[must_use]
    pub fn less_than(&self, key: &K) -> Iter<'_, K> {
        self.range(Bound::Unbounded, Bound::Excluded(key))
    }

    /// Returns an iterator over the keys strictly greater than `key`,
    /// ascending.
    #[inline]
    #[must_use]
    pub fn greater_than(&self, key: &K) -> Iter<'_, K> {
        self.range(Bound::Excluded(key), Bound::Unbounded)
    }

    /// Returns an iterator over the keys in `[low, high]`, ascending.
    ///
    /// An inverted interval yields nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::WeightBalancedTree;
    ///
    /// let tree: WeightBalancedTree<_> = (0..10).collect();
    /// assert!(tree.between_ascending(&3, &6).eq(&[3, 4, 5, 6]));
    /// assert!(tree.between_descending(&3, &6).eq(&[6, 5, 4, 3]));
    /// assert_eq!(tree.between_ascending(&6, &3).next(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn between_ascending(&self, low: &K, high: &K) -> Iter<'_, K> {
        self.range(Bound::Included(low), Bound::Included(high))
    }

    /// Returns an iterator over the keys in `[low, high]`, from `high` down to
    /// `low`.
    #[inline]
    #[must_use]
    pub fn between_descending(&self, low: &K, high: &K) -> Rev<Iter<'_, K>> {
        self.between_ascending(low, high).rev()
    }

    /// Returns an iterator over the keys within the given bounds.
    ///
    /// Both ends are located by a single descent each, and the length is
    /// known immediately from the order statistics.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound::{Excluded, Included, Unbounded};
    ///
    /// use wbtree::WeightBalancedTree;
    ///
    /// let tree: WeightBalancedTree<_> = (0..10).collect();
    /// assert!(tree.range(Included(&3), Excluded(&6)).eq(&[3, 4, 5]));
    /// assert_eq!(tree.range(Excluded(&7), Unbounded).len(), 2);
    /// ```
    #[must_use]
    pub fn range(&self, min: Bound<&K>, max: Bound<&K>) -> Iter<'_, K> {
        let below = match min {
            Bound::Included(key) => self.count_less_than(key),
            Bound::Excluded(key) => self.count_less_than(key) + usize::from(self.contains(key)),
            Bound::Unbounded => 0,
        };
        let above = match max {
            Bound::Included(key) => self.count_greater_than(key),
            Bound::Excluded(key) => self.count_greater_than(key) + usize::from(self.contains(key)),
            Bound::Unbounded => 0,
        };
        let remaining = self.len().saturating_sub(below + above);
        if remaining == 0 {
            return Iter {
                tree: self,
                front: None,
                back: None,
                remaining,
            };
        }

        let front = match min {
            Bound::Included(key) => self.key_or_neighbour(key, Side::Right),
            Bound::Excluded(key) => self.neighbour_of_key(key, Side::Right),
            Bound::Unbounded => self.root.map(|root| self.extreme(root, Side::Left)),
        };
        let back = match max {
            Bound::Included(key) => self.key_or_neighbour(key, Side::Left),
            Bound::Excluded(key) => self.neighbour_of_key(key, Side::Left),
            Bound::Unbounded => self.root.map(|root| self.extreme(root, Side::Right)),
        };
        Iter {
            tree: self,
            front,
            back,
            remaining,
        }
    }

    /// Checks every structural invariant, panicking on the first violation.
    ///
    /// Parent links must mirror child links, every size counter must equal
    /// the node count of its subtree, and an in-order walk must be strictly
    /// increasing.
    #[doc(hidden)]
    pub fn check(&self) {
        let Some(root) = self.root else {
            assert_eq!(self.nodes.len(), 0, "empty tree still owns nodes");
            return;
        };
        assert!(self.node(root).parent.is_none(), "root has a parent");

        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let node = self.node(handle);
            for side in [Side::Left, Side::Right] {
                match node.child(side) {
                    Some(child) => {
                        let child_node = self.node(child);
                        assert_eq!(child_node.parent, Some(handle), "broken parent link");
                        assert_eq!(node.size(side), child_node.weight(), "stale {side:?} size");
                        stack.push(child);
                    }
                    None => assert_eq!(node.size(side), 0, "size counted for a missing child"),
                }
            }
        }

        assert_eq!(self.nodes.len(), self.len(), "arena holds unreachable nodes");
        for (lower, upper) in self.iter().zip(self.iter().skip(1)) {
            assert!(lower < upper, "keys out of order");
        }
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K> Default for WeightBalancedTree<K> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Two trees are equal when they hold the same keys; their shapes and
/// balancing modes are not compared.
impl<K> PartialEq for WeightBalancedTree<K>
where
    K: PartialEq,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K> Eq for WeightBalancedTree<K> where K: Eq {}

impl<K> Hash for WeightBalancedTree<K>
where
    K: Hash,
{
    #[inline]
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for key in self {
            key.hash(state);
        }
    }
}

impl<K> fmt::Debug for WeightBalancedTree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Keys already present are skipped.
impl<K> Extend<K> for WeightBalancedTree<K>
where
    K: Ord,
{
    #[inline]
    fn extend<I: IntoIterator<Item = K>>(&mut self, iterable: I) {
        for key in iterable {
            if self.insert(key).is_err() {
                log::trace!("skipping duplicate key");
            }
        }
    }
}

impl<K> FromIterator<K> for WeightBalancedTree<K>
where
    K: Ord,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = K>>(iterable: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iterable);
        tree
    }
}

impl<K> IntoIterator for WeightBalancedTree<K> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    #[inline]
    fn into_iter(self) -> IntoIter<K> {
        IntoIter::new(self)
    }
}

impl<'a, K> IntoIterator for &'a WeightBalancedTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    #[inline]
    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::{
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher},
    };

    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use super::WeightBalancedTree;
    use crate::TreeError;

    fn in_order(tree: &WeightBalancedTree<i32>) -> Vec<i32> {
        let mut keys = Vec::new();
        tree.in_order(|node| keys.push(*node.key()));
        keys
    }

    fn sample() -> WeightBalancedTree<i32> {
        WeightBalancedTree::from_keys([5, 3, 8, 1, 4, 7, 9], true).unwrap()
    }

    #[test]
    fn basic() -> Result<()> {
        let mut tree = WeightBalancedTree::new();
        tree.insert(5)?;
        tree.insert(3)?;
        tree.insert(8)?;
        assert_eq!(in_order(&tree), [3, 5, 8]);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.min()?, &3);
        assert_eq!(tree.max()?, &8);
        tree.check();
        Ok(())
    }

    #[test]
    fn duplicate_rejected() -> Result<()> {
        let mut tree = WeightBalancedTree::new();
        tree.insert(5)?;
        assert_eq!(tree.insert(5), Err(TreeError::DuplicateKey));
        assert_eq!(tree.len(), 1);
        Ok(())
    }

    #[test]
    fn empty_tree_errors() {
        let tree = WeightBalancedTree::<i32>::new();
        assert_eq!(tree.min(), Err(TreeError::EmptyCollection));
        assert_eq!(tree.max(), Err(TreeError::EmptyCollection));
        assert_eq!(tree.get(&1), Err(TreeError::KeyNotFound));
        assert_eq!(
            tree.random_item(&mut SmallRng::seed_from_u64(0)),
            Err(TreeError::EmptyCollection)
        );
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.next_less_than(&1), None);
        assert_eq!(tree.count_less_than(&1), 0);
        tree.check();
    }

    #[test]
    fn from_keys_stops_at_duplicate() {
        assert_eq!(
            WeightBalancedTree::from_keys([1, 2, 1], true).err(),
            Some(TreeError::DuplicateKey)
        );
    }

    #[test]
    fn collect_skips_duplicates() {
        let tree: WeightBalancedTree<_> = [3, 1, 3, 2, 1].into_iter().collect();
        assert_eq!(in_order(&tree), [1, 2, 3]);
        tree.check();
    }

    #[rstest]
    #[case(0, None, Some(1))]
    #[case(1, None, Some(3))]
    #[case(2, Some(1), Some(3))]
    #[case(5, Some(4), Some(7))]
    #[case(6, Some(5), Some(7))]
    #[case(9, Some(8), None)]
    #[case(10, Some(9), None)]
    fn neighbours(#[case] key: i32, #[case] less: Option<i32>, #[case] greater: Option<i32>) {
        let tree = sample();
        assert_eq!(tree.next_less_than(&key).copied(), less);
        assert_eq!(tree.next_greater_than(&key).copied(), greater);
    }

    #[rstest]
    #[case(0, 0, 7)]
    #[case(1, 0, 6)]
    #[case(5, 3, 3)]
    #[case(6, 4, 3)]
    #[case(10, 7, 0)]
    fn order_statistics(#[case] key: i32, #[case] less: usize, #[case] greater: usize) {
        let tree = sample();
        assert_eq!(tree.count_less_than(&key), less);
        assert_eq!(tree.count_greater_than(&key), greater);
        assert_eq!(
            less + greater + usize::from(tree.contains(&key)),
            tree.len()
        );
    }

    #[test]
    fn filtered_iterators() {
        let tree = sample();
        assert!(tree.less_than(&5).eq(&[1, 3, 4]));
        assert!(tree.greater_than(&5).eq(&[7, 8, 9]));
        assert!(tree.greater_than(&6).eq(&[7, 8, 9]));
        assert!(tree.between_ascending(&2, &8).eq(&[3, 4, 5, 7, 8]));
        assert!(tree.between_descending(&2, &8).eq(&[8, 7, 5, 4, 3]));
        assert_eq!(tree.between_ascending(&8, &2).len(), 0);
        assert_eq!(tree.less_than(&1).next(), None);
    }

    #[test]
    fn queries_do_not_mutate() {
        let tree = sample();
        let before = tree.clone();
        let _ = tree.count_less_than(&6);
        let _ = tree.next_greater_than(&6);
        let _ = tree.range(std::ops::Bound::Unbounded, std::ops::Bound::Unbounded).count();
        let mut walk = Vec::new();
        tree.pre_order(|node| walk.push((*node.key(), node.left_size(), node.right_size())));
        let mut walk_before = Vec::new();
        before.pre_order(|node| walk_before.push((*node.key(), node.left_size(), node.right_size())));
        assert_eq!(walk, walk_before);
    }

    #[test]
    fn random_item_is_a_member() -> Result<()> {
        let tree = sample();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let key = tree.random_item(&mut rng)?;
            assert!(tree.contains(key));
        }
        Ok(())
    }

    #[test]
    fn equality_ignores_shape() {
        let balanced: WeightBalancedTree<_> = (0..20).collect();
        let chain = WeightBalancedTree::from_keys(0..20, false).unwrap();
        assert_eq!(balanced, chain);
        assert_ne!(balanced.depth(), chain.depth());

        let hash = |tree: &WeightBalancedTree<i32>| {
            let mut hasher = DefaultHasher::new();
            tree.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&balanced), hash(&chain));
    }

    #[test]
    fn clone_is_independent() -> Result<()> {
        let mut original = sample();
        let copy = original.clone();
        original.remove(&5)?;
        assert!(copy.contains(&5));
        assert_eq!(copy.len(), 7);
        copy.check();
        Ok(())
    }

    #[test]
    fn debug_uses_set_notation() {
        let tree: WeightBalancedTree<_> = [5, 1, 3].into_iter().collect();
        insta::assert_snapshot!(format!("{tree:?}"), @"{1, 3, 5}");
    }

    #[test]
    fn unbalanced_chain_depth() {
        let tree = WeightBalancedTree::from_keys(1..=100, false).unwrap();
        assert!(!tree.maintains_balance());
        assert_eq!(tree.depth(), 100);
        tree.check();

        let tree = WeightBalancedTree::from_keys(1..=100, true).unwrap();
        assert!(tree.maintains_balance());
        assert!(tree.depth() <= 9, "depth {}", tree.depth());
    }
}

//! Insertion, removal and splicing.
//!
//! Both mutations adjust the subtree-size counters speculatively on the way
//! down, so that a successful call needs only one descent. When the search
//! fails the adjustments are undone on the way back up before the error is
//! returned, leaving the tree exactly as it was.

use std::{cmp::Ordering, mem};

use crate::{
    error::TreeError,
    tree::{
        WeightBalancedTree,
        arena::Handle,
        node::{Node, Side},
        traverse::Descent,
    },
};

impl<K> WeightBalancedTree<K>
where
    K: Ord,
{
    /// Inserts `key` into the tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] if the key is already present; the
    /// tree is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::{TreeError, WeightBalancedTree};
    ///
    /// let mut tree = WeightBalancedTree::new();
    /// tree.insert(5)?;
    /// tree.insert(3)?;
    /// assert_eq!(tree.insert(5), Err(TreeError::DuplicateKey));
    /// assert_eq!(tree.len(), 2);
    /// # Ok::<(), TreeError>(())
    /// ```
    pub fn insert(&mut self, key: K) -> Result<(), TreeError> {
        let mut passed = 0;
        let descent = self.traverse_down_to_key_or_parent_mut(&key, |node, ordering| {
            passed += 1;
            match ordering {
                Ordering::Less => node.left_size += 1,
                Ordering::Greater => node.right_size += 1,
                Ordering::Equal => {}
            }
        });

        let (parent, side) = match descent {
            Descent::Empty => {
                self.root = Some(self.nodes.alloc(Node::leaf(key)));
                self.record_leaf_depth(1);
                return Ok(());
            }
            Descent::Found(existing) => {
                self.undo_descent(existing, |size| *size -= 1);
                return Err(TreeError::DuplicateKey);
            }
            Descent::Vacant { parent, side } => (parent, side),
        };

        let mut leaf = Node::leaf(key);
        leaf.parent = Some(parent);
        let leaf = self.nodes.alloc(leaf);
        *self.node_mut(parent).child_mut(side) = Some(leaf);
        self.record_leaf_depth(passed + 1);

        if self.maintain_balance {
            self.balance_up_from(parent);
        }
        Ok(())
    }

    /// Removes `key` from the tree and returns the stored key.
    ///
    /// A node with two children is not unlinked itself: it takes over the key
    /// of its in-order predecessor when its left subtree is strictly larger,
    /// and of its successor otherwise, and that neighbour (which has at most
    /// one child) is spliced out instead.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if the key is absent; the tree is
    /// left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use wbtree::{TreeError, WeightBalancedTree};
    ///
    /// let mut tree: WeightBalancedTree<_> = [5, 3, 8].into_iter().collect();
    /// assert_eq!(tree.remove(&5), Ok(5));
    /// assert_eq!(tree.remove(&5), Err(TreeError::KeyNotFound));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn remove(&mut self, key: &K) -> Result<K, TreeError> {
        let descent = self.traverse_down_to_key_or_parent_mut(key, |node, ordering| {
            // Only sides that actually hold nodes are touched, so a miss at
            // the bottom never underflows an empty side.
            match ordering {
                Ordering::Less if node.left.is_some() => node.left_size -= 1,
                Ordering::Greater if node.right.is_some() => node.right_size -= 1,
                Ordering::Less | Ordering::Greater | Ordering::Equal => {}
            }
        });

        let target = match descent {
            Descent::Found(target) => target,
            Descent::Empty => return Err(TreeError::KeyNotFound),
            Descent::Vacant { parent, .. } => {
                self.undo_descent(parent, |size| *size += 1);
                return Err(TreeError::KeyNotFound);
            }
        };

        let node = self.node(target);
        let victim = if node.left.is_some() && node.right.is_some() {
            let side = if node.left_size > node.right_size {
                Side::Left
            } else {
                Side::Right
            };
            self.detach_extreme_below(target, side)
        } else {
            target
        };

        let removed = self.release(victim);
        if victim == target {
            Ok(removed)
        } else {
            Ok(mem::replace(&mut self.node_mut(target).key, removed))
        }
    }

    /// Finds the node nearest to `target` within its `side` subtree (one step
    /// into it, then as far towards `target` as possible), decrementing the
    /// size counters along the way for its imminent removal.
    fn detach_extreme_below(&mut self, target: Handle, side: Side) -> Handle {
        let toward = side.opposite();
        let Some(mut extreme) = self.node(target).child(side) else {
            unreachable!("`detach_extreme_below()` - target has no child on that side")
        };
        *self.node_mut(target).size_mut(side) -= 1;
        while let Some(next) = self.node(extreme).child(toward) {
            *self.node_mut(extreme).size_mut(toward) -= 1;
            extreme = next;
        }
        extreme
    }

    /// Reverts the counter adjustment made on every ancestor of `stop` during
    /// a descent that ended there.
    fn undo_descent(&mut self, stop: Handle, mut undo: impl FnMut(&mut usize)) {
        self.traverse_up_from_node(stop, |node, came_from_left| match came_from_left {
            Some(true) => undo(&mut node.left_size),
            Some(false) => undo(&mut node.right_size),
            None => {}
        });
    }
}

impl<K> WeightBalancedTree<K> {
    /// Removes and returns the smallest key.
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
    /// let mut tree: WeightBalancedTree<_> = [2, 1, 3].into_iter().collect();
    /// assert_eq!(tree.pop_min(), Ok(1));
    /// assert_eq!(tree.pop_max(), Ok(3));
    /// assert_eq!(tree.pop_min(), Ok(2));
    /// assert_eq!(tree.pop_min(), Err(TreeError::EmptyCollection));
    /// ```
    #[inline]
    pub fn pop_min(&mut self) -> Result<K, TreeError> {
        self.pop_extreme(Side::Left)
    }

    /// Removes and returns the largest key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyCollection`] if the tree is empty.
    #[inline]
    pub fn pop_max(&mut self) -> Result<K, TreeError> {
        self.pop_extreme(Side::Right)
    }

    /// The extreme node never has a child facing outwards, so it can be
    /// spliced directly after one descent.
    fn pop_extreme(&mut self, side: Side) -> Result<K, TreeError> {
        let mut handle = self.root.ok_or(TreeError::EmptyCollection)?;
        while let Some(next) = self.node(handle).child(side) {
            *self.node_mut(handle).size_mut(side) -= 1;
            handle = next;
        }
        Ok(self.release(handle))
    }

    /// Splices out a node whose ancestors' counters are already decremented,
    /// frees it and rebalances from its former parent.
    fn release(&mut self, victim: Handle) -> K {
        let parent = self.node(victim).parent;
        self.splice(victim);
        let removed = self.nodes.take(victim);

        self.depth = None;
        if self.maintain_balance {
            if let Some(parent) = parent {
                self.balance_up_from(parent);
            }
        }
        removed.key
    }

    /// Unlinks a node with at most one child, attaching that child (if any)
    /// to the node's parent. Ancestor size counters are left to the caller.
    ///
    /// # Panics
    ///
    /// If the node has two children.
    pub(crate) fn splice(&mut self, handle: Handle) {
        let node = self.node(handle);
        let (parent, child) = match (node.left, node.right) {
            (Some(_), Some(_)) => panic!("`splice()` - node has two children!"),
            (child, None) | (None, child) => (node.parent, child),
        };
        if let Some(child) = child {
            self.node_mut(child).parent = parent;
        }
        self.replace_child(parent, handle, child);

        let node = self.node_mut(handle);
        node.parent = None;
        node.left = None;
        node.right = None;
    }

    /// Extends the cached depth after attaching a leaf at `depth`, as long as
    /// the cache is still meaningful.
    fn record_leaf_depth(&mut self, depth: usize) {
        if let Some(cached) = self.depth.as_mut() {
            *cached = (*cached).max(depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{TreeError, WeightBalancedTree};

    fn pre_order(tree: &WeightBalancedTree<i32>) -> Vec<i32> {
        let mut keys = Vec::new();
        tree.pre_order(|node| keys.push(*node.key()));
        keys
    }

    fn sizes(tree: &WeightBalancedTree<i32>) -> Vec<(i32, usize, usize)> {
        let mut sizes = Vec::new();
        tree.pre_order(|node| sizes.push((*node.key(), node.left_size(), node.right_size())));
        sizes
    }

    #[test]
    fn failed_insert_restores_sizes() {
        let mut tree = WeightBalancedTree::from_keys([5, 3, 8, 1, 4, 7, 9], true).unwrap();
        let before = sizes(&tree);
        assert_eq!(tree.insert(4), Err(TreeError::DuplicateKey));
        assert_eq!(tree.insert(9), Err(TreeError::DuplicateKey));
        assert_eq!(tree.insert(5), Err(TreeError::DuplicateKey));
        assert_eq!(sizes(&tree), before);
        tree.check();
    }

    #[test]
    fn failed_remove_restores_sizes() {
        let mut tree = WeightBalancedTree::from_keys([5, 3, 8, 1, 4, 7, 9], true).unwrap();
        let before = sizes(&tree);
        for missing in [0, 2, 6, 10] {
            assert_eq!(tree.remove(&missing), Err(TreeError::KeyNotFound));
        }
        assert_eq!(sizes(&tree), before);
        tree.check();
    }

    #[test]
    fn remove_leaf_and_single_child() {
        let mut tree = WeightBalancedTree::from_keys([5, 3, 8, 1], false).unwrap();
        assert_eq!(tree.remove(&1), Ok(1));
        assert_eq!(pre_order(&tree), [5, 3, 8]);
        tree.insert(1).unwrap();
        assert_eq!(tree.remove(&3), Ok(3));
        assert_eq!(pre_order(&tree), [5, 1, 8]);
        tree.check();
    }

    #[test]
    fn remove_root_until_empty() {
        let mut tree = WeightBalancedTree::from_keys([2, 1], false).unwrap();
        assert_eq!(tree.remove(&2), Ok(2));
        assert_eq!(pre_order(&tree), [1]);
        assert_eq!(tree.remove(&1), Ok(1));
        assert!(tree.is_empty());
        assert_eq!(tree.remove(&1), Err(TreeError::KeyNotFound));
    }

    #[test]
    fn equal_subtrees_promote_successor() {
        let mut tree = WeightBalancedTree::from_keys([5, 3, 8, 1, 4, 7, 9], true).unwrap();
        assert_eq!(tree.remove(&5), Ok(5));
        assert_eq!(pre_order(&tree), [7, 3, 1, 4, 8, 9]);
        tree.check();

        let mut tree = WeightBalancedTree::from_keys([5, 3, 8, 1, 4, 7, 9], true).unwrap();
        assert_eq!(tree.remove(&3), Ok(3));
        assert_eq!(pre_order(&tree), [5, 4, 1, 8, 7, 9]);
        tree.check();
    }

    #[test]
    fn larger_left_subtree_promotes_predecessor() {
        let mut tree = WeightBalancedTree::from_keys([5, 3, 8, 1, 4, 7, 9, 2], true).unwrap();
        assert_eq!(pre_order(&tree), [5, 3, 1, 2, 4, 8, 7, 9]);
        assert_eq!(tree.remove(&5), Ok(5));
        // 4 moves up; 1-2-3 is then straightened by a zig-zag.
        assert_eq!(pre_order(&tree), [4, 2, 1, 3, 8, 7, 9]);
        tree.check();
    }

    #[test]
    fn pop_from_both_ends() {
        let mut tree: WeightBalancedTree<_> = (0..50).collect();
        for i in 0..25 {
            assert_eq!(tree.pop_min(), Ok(i));
            assert_eq!(tree.pop_max(), Ok(49 - i));
            tree.check();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.pop_max(), Err(TreeError::EmptyCollection));
    }

    #[test]
    #[should_panic(expected = "`splice()` - node has two children!")]
    fn splice_rejects_two_children() {
        let mut tree = WeightBalancedTree::from_keys([2, 1, 3], false).unwrap();
        let root = tree.root.unwrap();
        tree.splice(root);
    }

    #[test]
    fn depth_cache_tracks_unbalanced_inserts() {
        let mut tree = WeightBalancedTree::unbalanced();
        assert_eq!(tree.depth, Some(0));
        tree.extend([1, 2, 3, 4]);
        assert_eq!(tree.depth, Some(4));
        tree.remove(&4).unwrap();
        assert_eq!(tree.depth, None);
        assert_eq!(tree.depth(), 3);
        tree.clear();
        assert_eq!(tree.depth, Some(0));

        let balanced = WeightBalancedTree::from_keys([1, 2, 3, 4], true).unwrap();
        assert_eq!(balanced.depth, None);
        assert_eq!(balanced.depth(), 3);
    }
}

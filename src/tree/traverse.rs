//! Navigation primitives shared by the queries, the mutation core and the
//! balancing engine.
//!
//! Everything here is iterative: arbitrarily deep trees (an unbalanced tree
//! fed sorted keys degenerates into a list) never exhaust the call stack.

use std::{cmp::Ordering, collections::VecDeque};

use rand::Rng;

use crate::tree::{
    WeightBalancedTree,
    arena::Handle,
    node::{Node, NodeRef, Side},
};

/// Where a downward search by key ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Descent {
    /// The tree has no nodes.
    Empty,
    /// The node holding the key.
    Found(Handle),
    /// The key is absent; it would be attached below `parent` on `side`.
    Vacant { parent: Handle, side: Side },
}

/// One pending node of the iterative post-order walk.
struct PostOrderFrame {
    handle: Handle,
    left_done: bool,
    right_done: bool,
}

impl<K> WeightBalancedTree<K> {
    // /////////////////////////////
    // Orientation
    // /////////////////////////////

    /// Returns `true` if `child` hangs off the left of `parent`, `false` if it
    /// hangs off the right.
    ///
    /// # Panics
    ///
    /// If `child` is not a child of `parent` at all.
    pub(crate) fn is_left_child_of(&self, child: Handle, parent: Handle) -> bool {
        let node = self.node(parent);
        if node.left == Some(child) {
            true
        } else if node.right == Some(child) {
            false
        } else {
            panic!("`is_left_child_of()` - node is not a child of the given parent!")
        }
    }

    /// The side of `parent` that `child` occupies.
    pub(crate) fn side_of(&self, child: Handle, parent: Handle) -> Side {
        if self.is_left_child_of(child, parent) {
            Side::Left
        } else {
            Side::Right
        }
    }

    // /////////////////////////////
    // Upward walks
    // /////////////////////////////

    /// Visits `start` and every ancestor up to the root.
    ///
    /// `visit` receives whether the previous step arrived from a left child
    /// (`Some(true)`), a right child (`Some(false)`), or nowhere (`None`, for
    /// `start` itself).
    pub(crate) fn traverse_up_from_node(
        &mut self,
        start: Handle,
        mut visit: impl FnMut(&mut Node<K>, Option<bool>),
    ) {
        let mut previous: Option<Handle> = None;
        let mut current = Some(start);
        while let Some(handle) = current {
            let came_from_left = previous.map(|child| self.is_left_child_of(child, handle));
            let node = self.node_mut(handle);
            visit(node, came_from_left);
            previous = Some(handle);
            current = node.parent;
        }
    }

    /// Walks upward from `start` while `predicate` holds and returns the node
    /// where it stopped, or `None` if it would have stepped past the root.
    pub(crate) fn traverse_up_to_node(
        &self,
        start: Handle,
        mut predicate: impl FnMut(&Node<K>, Option<bool>) -> bool,
    ) -> Option<Handle> {
        let mut previous: Option<Handle> = None;
        let mut current = Some(start);
        while let Some(handle) = current {
            let came_from_left = previous.map(|child| self.is_left_child_of(child, handle));
            let node = self.node(handle);
            if !predicate(node, came_from_left) {
                return Some(handle);
            }
            previous = Some(handle);
            current = node.parent;
        }
        None
    }

    // /////////////////////////////
    // Downward walks
    // /////////////////////////////

    /// Follows `side` from `start` until there is no further child.
    pub(crate) fn extreme(&self, start: Handle, side: Side) -> Handle {
        let mut handle = start;
        while let Some(next) = self.node(handle).child(side) {
            handle = next;
        }
        handle
    }

    /// In-order successor of a node.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.neighbour(handle, Side::Right)
    }

    /// In-order predecessor of a node.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.neighbour(handle, Side::Left)
    }

    /// The adjacent node in the direction of `side`: one step into that
    /// subtree and then to its far end, or else up until the last move came
    /// out of the opposite side.
    fn neighbour(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.node(handle).child(side) {
            return Some(self.extreme(child, side.opposite()));
        }
        let arrived_from = side.opposite() == Side::Left;
        self.traverse_up_to_node(handle, |_, came_from_left| {
            came_from_left != Some(arrived_from)
        })
    }

    /// Descends from the root by comparison, calling `visit` on every node
    /// examined with `key.cmp(node.key)`.
    pub(crate) fn traverse_down_to_key_or_parent(
        &self,
        key: &K,
        mut visit: impl FnMut(&Node<K>, Ordering),
    ) -> Descent
    where
        K: Ord,
    {
        let Some(mut handle) = self.root else {
            return Descent::Empty;
        };
        loop {
            let node = self.node(handle);
            let ordering = key.cmp(&node.key);
            visit(node, ordering);
            let side = match ordering {
                Ordering::Equal => return Descent::Found(handle),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            match node.child(side) {
                Some(child) => handle = child,
                None => return Descent::Vacant { parent: handle, side },
            }
        }
    }

    /// As [`traverse_down_to_key_or_parent`][Self::traverse_down_to_key_or_parent],
    /// but `visit` may adjust the size counters of the nodes it passes.
    pub(crate) fn traverse_down_to_key_or_parent_mut(
        &mut self,
        key: &K,
        mut visit: impl FnMut(&mut Node<K>, Ordering),
    ) -> Descent
    where
        K: Ord,
    {
        let Some(mut handle) = self.root else {
            return Descent::Empty;
        };
        loop {
            let node = self.node_mut(handle);
            let ordering = key.cmp(&node.key);
            visit(node, ordering);
            let side = match ordering {
                Ordering::Equal => return Descent::Found(handle),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            match node.child(side) {
                Some(child) => handle = child,
                None => return Descent::Vacant { parent: handle, side },
            }
        }
    }

    /// The node holding `key`, if any.
    pub(crate) fn find(&self, key: &K) -> Option<Handle>
    where
        K: Ord,
    {
        match self.traverse_down_to_key_or_parent(key, |_, _| {}) {
            Descent::Found(handle) => Some(handle),
            Descent::Empty | Descent::Vacant { .. } => None,
        }
    }

    /// The node with the smallest key strictly greater than `key` (for
    /// `Side::Right`) or the largest key strictly less than it (for
    /// `Side::Left`).
    pub(crate) fn neighbour_of_key(&self, key: &K, side: Side) -> Option<Handle>
    where
        K: Ord,
    {
        match self.traverse_down_to_key_or_parent(key, |_, _| {}) {
            Descent::Empty => None,
            Descent::Found(handle) => self.neighbour(handle, side),
            // The would-be parent is itself the neighbour when the key would
            // hang off the facing side; otherwise keep looking past it.
            Descent::Vacant { parent, side: slot } if slot == side.opposite() => Some(parent),
            Descent::Vacant { parent, .. } => self.neighbour(parent, side),
        }
    }

    /// The node holding `key`, or failing that its neighbour on `side`.
    pub(crate) fn key_or_neighbour(&self, key: &K, side: Side) -> Option<Handle>
    where
        K: Ord,
    {
        self.find(key).or_else(|| self.neighbour_of_key(key, side))
    }

    // /////////////////////////////
    // Order statistics
    // /////////////////////////////

    /// Number of keys strictly on `side` of `key` (less than it for
    /// `Side::Left`, greater for `Side::Right`).
    pub(crate) fn count_beyond(&self, key: &K, side: Side) -> usize
    where
        K: Ord,
    {
        let toward = match side {
            Side::Left => Ordering::Greater,
            Side::Right => Ordering::Less,
        };
        let mut count = 0;
        self.traverse_down_to_key_or_parent(key, |node, ordering| {
            if ordering == Ordering::Equal {
                count += node.size(side);
            } else if ordering == toward {
                count += node.size(side) + 1;
            }
        });
        count
    }

    // /////////////////////////////
    // Random descent
    // /////////////////////////////

    /// Picks a node uniformly at random by descending from the root, stopping
    /// at each node with probability `1 / weight` and otherwise choosing a
    /// side in proportion to its size.
    pub(crate) fn random_handle<R>(&self, rng: &mut R) -> Option<Handle>
    where
        R: Rng + ?Sized,
    {
        let mut handle = self.root?;
        loop {
            let node = self.node(handle);
            if rng.random_range(0..node.weight()) == 0 {
                return Some(handle);
            }
            let below = rng.random_range(0..node.left_size + node.right_size);
            let side = if below < node.left_size {
                Side::Left
            } else {
                Side::Right
            };
            match node.child(side) {
                Some(child) => handle = child,
                None => unreachable!("`random_handle()` - size counter points at a missing child"),
            }
        }
    }

    // /////////////////////////////
    // Whole-tree walks
    // /////////////////////////////

    /// Visits every node parent-first, left subtree before right.
    pub fn pre_order(&self, mut visit: impl FnMut(NodeRef<'_, K>)) {
        let mut stack: Vec<Handle> = self.root.into_iter().collect();
        while let Some(handle) = stack.pop() {
            visit(NodeRef::new(&self.nodes, handle));
            let node = self.node(handle);
            stack.extend(node.right);
            stack.extend(node.left);
        }
    }

    /// Visits every node in ascending key order.
    pub fn in_order(&self, mut visit: impl FnMut(NodeRef<'_, K>)) {
        let mut stack: Vec<Handle> = Vec::new();
        let mut current = self.root;
        loop {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.node(handle).left;
            }
            let Some(handle) = stack.pop() else {
                break;
            };
            visit(NodeRef::new(&self.nodes, handle));
            current = self.node(handle).right;
        }
    }

    /// Visits every node children-first, left subtree before right.
    pub fn post_order(&self, mut visit: impl FnMut(NodeRef<'_, K>)) {
        let mut stack: Vec<PostOrderFrame> = self
            .root
            .map(|handle| PostOrderFrame {
                handle,
                left_done: false,
                right_done: false,
            })
            .into_iter()
            .collect();

        while let Some(frame) = stack.last_mut() {
            let node = self.node(frame.handle);
            let next = if !frame.left_done {
                frame.left_done = true;
                node.left
            } else if !frame.right_done {
                frame.right_done = true;
                node.right
            } else {
                let handle = frame.handle;
                stack.pop();
                visit(NodeRef::new(&self.nodes, handle));
                continue;
            };
            if let Some(handle) = next {
                stack.push(PostOrderFrame {
                    handle,
                    left_done: false,
                    right_done: false,
                });
            }
        }
    }

    /// Visits every node level by level, left to right within a level.
    pub fn breadth_first(&self, mut visit: impl FnMut(NodeRef<'_, K>)) {
        let mut queue: VecDeque<Handle> = self.root.into_iter().collect();
        while let Some(handle) = queue.pop_front() {
            visit(NodeRef::new(&self.nodes, handle));
            let node = self.node(handle);
            queue.extend(node.left);
            queue.extend(node.right);
        }
    }

    /// Number of levels, found by walking the whole tree.
    pub(crate) fn measure_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(Handle, usize)> = self.root.map(|h| (h, 1)).into_iter().collect();
        while let Some((handle, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = self.node(handle);
            stack.extend(node.left.map(|h| (h, depth + 1)));
            stack.extend(node.right.map(|h| (h, depth + 1)));
        }
        deepest
    }
}

//! Tree nodes and the read-only view handed to traversal callbacks.

use std::fmt;

use crate::tree::arena::{Arena, Handle};

// ////////////////////////////////////////////////////////////////////////////
// Side
// ////////////////////////////////////////////////////////////////////////////

/// Which child slot of a node is meant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Node
// ////////////////////////////////////////////////////////////////////////////

/// A single tree node.
///
/// The node owns nothing but its key: children and parent are handles into
/// the tree's arena. `left_size` and `right_size` are the authoritative node
/// counts of the two subtrees and are maintained incrementally by every
/// mutation.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) left_size: usize,
    pub(crate) right_size: usize,
}

impl<K> Node<K> {
    /// A parentless leaf.
    pub(crate) const fn leaf(key: K) -> Self {
        Node {
            key,
            parent: None,
            left: None,
            right: None,
            left_size: 0,
            right_size: 0,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn child_mut(&mut self, side: Side) -> &mut Option<Handle> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[inline]
    pub(crate) const fn size(&self, side: Side) -> usize {
        match side {
            Side::Left => self.left_size,
            Side::Right => self.right_size,
        }
    }

    #[inline]
    pub(crate) const fn size_mut(&mut self, side: Side) -> &mut usize {
        match side {
            Side::Left => &mut self.left_size,
            Side::Right => &mut self.right_size,
        }
    }

    /// Number of nodes in the subtree rooted here, this node included.
    #[inline]
    pub(crate) const fn weight(&self) -> usize {
        1 + self.left_size + self.right_size
    }

    /// `|left_size - right_size|`.
    #[inline]
    pub(crate) const fn imbalance(&self) -> usize {
        self.left_size.abs_diff(self.right_size)
    }

    /// The side holding more nodes, if the node is not perfectly balanced.
    #[inline]
    pub(crate) const fn heavier_side(&self) -> Option<Side> {
        if self.left_size > self.right_size {
            Some(Side::Left)
        } else if self.right_size > self.left_size {
            Some(Side::Right)
        } else {
            None
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// NodeRef
// ////////////////////////////////////////////////////////////////////////////

/// A read-only view of a node, handed to the depth-first and breadth-first
/// traversal callbacks.
///
/// The view borrows the tree, so it cannot outlive the next structural
/// mutation.
pub struct NodeRef<'a, K> {
    pub(crate) nodes: &'a Arena<Node<K>>,
    pub(crate) handle: Handle,
}

impl<'a, K> NodeRef<'a, K> {
    pub(crate) const fn new(nodes: &'a Arena<Node<K>>, handle: Handle) -> Self {
        NodeRef { nodes, handle }
    }

    #[inline]
    fn node(&self) -> &'a Node<K> {
        self.nodes.get(self.handle)
    }

    /// The key stored in this node.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &'a K {
        &self.node().key
    }

    /// Number of nodes in the left subtree.
    #[inline]
    #[must_use]
    pub fn left_size(&self) -> usize {
        self.node().left_size
    }

    /// Number of nodes in the right subtree.
    #[inline]
    #[must_use]
    pub fn right_size(&self) -> usize {
        self.node().right_size
    }

    /// Returns `true` if this node is the root of the tree.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// The parent node, or `None` for the root.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.node().parent.map(|h| NodeRef::new(self.nodes, h))
    }

    /// The left child, if any.
    #[inline]
    #[must_use]
    pub fn left(&self) -> Option<Self> {
        self.node().left.map(|h| NodeRef::new(self.nodes, h))
    }

    /// The right child, if any.
    #[inline]
    #[must_use]
    pub fn right(&self) -> Option<Self> {
        self.node().right.map(|h| NodeRef::new(self.nodes, h))
    }
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<K> fmt::Debug for NodeRef<'_, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("left_size", &self.left_size())
            .field("right_size", &self.right_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Node, Side};

    #[test]
    fn sizes_by_side() {
        let mut node = Node::leaf(7);
        *node.size_mut(Side::Left) = 3;
        *node.size_mut(Side::Right) = 1;

        assert_eq!(node.size(Side::Left), 3);
        assert_eq!(node.size(Side::Right), 1);
        assert_eq!(node.weight(), 5);
        assert_eq!(node.imbalance(), 2);
        assert_eq!(node.heavier_side(), Some(Side::Left));
        assert_eq!(Side::Left.opposite(), Side::Right);

        *node.size_mut(Side::Right) = 3;
        assert_eq!(node.heavier_side(), None);
    }
}

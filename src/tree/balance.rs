//! The balancing engine.
//!
//! Balance is judged purely from the subtree-size counters that the order
//! statistics already need: a restructuring is applied only when it strictly
//! reduces the measured imbalance. Nothing else (no height, no colour, no
//! balance factor) is stored in the nodes.
//!
//! Rotations are named after the direction the node moves. A right rotation
//! promotes the left child:
//!
//! ```text
//!         node                 pivot
//!        /    \               /     \
//!     pivot    c    ==>      a      node
//!     /   \                         /   \
//!    a    inner                 inner    c
//! ```
//!
//! A zig-zag handles the case where the heavy child leans the other way, by
//! promoting the inner grandchild above both:
//!
//! ```text
//!         node                    grand
//!        /    \                 /       \
//!     child    d    ==>      child      node
//!     /   \                  /   \      /   \
//!    a    grand             a     b    c     d
//!         /   \
//!        b     c
//! ```

use crate::tree::{
    WeightBalancedTree,
    arena::Handle,
    node::{Node, Side},
};

impl<K> WeightBalancedTree<K> {
    /// Puts `new` into whichever slot `old` occupied below `parent`, or at the
    /// root if there is no parent. Only the downward link is changed.
    pub(crate) fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(old, parent);
                *self.node_mut(parent).child_mut(side) = new;
            }
        }
    }

    // /////////////////////////////
    // Single rotation
    // /////////////////////////////

    /// Would rotating `handle` towards `direction` shrink its imbalance?
    ///
    /// The rotation is simulated from the size counters alone: the pivot keeps
    /// its outer subtree, and the demoted node gathers the pivot's inner
    /// subtree plus its own opposite subtree.
    pub(crate) fn would_rotation_improve(&self, handle: Handle, direction: Side) -> bool {
        let node = self.node(handle);
        let heavy = direction.opposite();
        let Some(pivot) = node.child(heavy) else {
            return false;
        };
        let pivot = self.node(pivot);
        let outer = pivot.size(heavy);
        let demoted = pivot.size(direction) + 1 + node.size(direction);
        outer.abs_diff(demoted) < node.imbalance()
    }

    /// Rotates `handle` towards `direction`, returning the promoted child.
    ///
    /// # Panics
    ///
    /// If `handle` has no child on the side opposite to `direction`.
    pub(crate) fn rotate(&mut self, handle: Handle, direction: Side) -> Handle {
        let heavy = direction.opposite();
        let Some(pivot) = self.node(handle).child(heavy) else {
            panic!("`rotate()` - node has no child to promote!")
        };
        log::trace!("rotating {direction:?} around {handle:?}, promoting {pivot:?}");

        let parent = self.node(handle).parent;
        let inner = self.node(pivot).child(direction);
        let inner_size = self.node(pivot).size(direction);

        // The inner subtree changes hands.
        {
            let node = self.node_mut(handle);
            *node.child_mut(heavy) = inner;
            *node.size_mut(heavy) = inner_size;
        }
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(handle);
        }

        // The pivot takes the node's place.
        self.replace_child(parent, handle, Some(pivot));
        self.node_mut(pivot).parent = parent;

        // And the node hangs below the pivot.
        let weight = self.node(handle).weight();
        {
            let promoted = self.node_mut(pivot);
            *promoted.child_mut(direction) = Some(handle);
            *promoted.size_mut(direction) = weight;
        }
        self.node_mut(handle).parent = Some(pivot);

        pivot
    }

    // /////////////////////////////
    // Zig-zag
    // /////////////////////////////

    /// The heavy child and its inner grandchild, when both exist.
    fn zig_zag_shape(&self, handle: Handle, direction: Side) -> Option<(Handle, Handle)> {
        let child = self.node(handle).child(direction.opposite())?;
        let grand = self.node(child).child(direction)?;
        Some((child, grand))
    }

    /// Would a zig-zag towards `direction` reduce the summed imbalance of the
    /// node, its heavy child and the child's inner grandchild?
    pub(crate) fn would_zig_zag_improve(&self, handle: Handle, direction: Side) -> bool {
        let Some((child, grand)) = self.zig_zag_shape(handle, direction) else {
            return false;
        };
        let heavy = direction.opposite();
        let (node, child, grand): (&Node<K>, &Node<K>, &Node<K>) =
            (self.node(handle), self.node(child), self.node(grand));

        let before = node.imbalance() + child.imbalance() + grand.imbalance();

        // Child keeps its outer subtree and gains the grandchild's heavy-side
        // subtree; the node gains the grandchild's other subtree.
        let child_after = child.size(heavy).abs_diff(grand.size(heavy));
        let node_after = grand.size(direction).abs_diff(node.size(direction));
        let grand_after = (1 + child.size(heavy) + grand.size(heavy))
            .abs_diff(1 + grand.size(direction) + node.size(direction));

        child_after + node_after + grand_after < before
    }

    /// Promotes the inner grandchild on the heavy side above `handle`,
    /// returning the grandchild.
    ///
    /// # Panics
    ///
    /// If the heavy child or its inner grandchild is missing.
    pub(crate) fn zig_zag(&mut self, handle: Handle, direction: Side) -> Handle {
        let Some((child, grand)) = self.zig_zag_shape(handle, direction) else {
            panic!("`zig_zag()` - node is not in a zig-zag configuration!")
        };
        log::trace!("zig-zag {direction:?} around {handle:?}, promoting {grand:?}");
        self.rotate(child, direction.opposite());
        let promoted = self.rotate(handle, direction);
        debug_assert_eq!(promoted, grand);
        promoted
    }

    // /////////////////////////////
    // Repair walk
    // /////////////////////////////

    /// Walks from `start` to the root, rotating wherever it helps.
    ///
    /// When a node is restructured it moves one level down; the walk carries
    /// on from its new parent, which now occupies the position just repaired.
    pub(crate) fn balance_up_from(&mut self, start: Handle) {
        let mut current = Some(start);
        while let Some(handle) = current {
            let promoted = self.node(handle).heavier_side().and_then(|heavy| {
                let direction = heavy.opposite();
                if self.would_rotation_improve(handle, direction) {
                    Some(self.rotate(handle, direction))
                } else if self.would_zig_zag_improve(handle, direction) {
                    Some(self.zig_zag(handle, direction))
                } else {
                    None
                }
            });
            current = promoted.or(self.node(handle).parent);
        }
    }
}

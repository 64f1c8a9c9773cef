//! A weight-balanced binary search tree is a way of storing unique, ordered
//! keys such that insertion, removal, lookup and rank queries all take
//! `O(log(n))`.
//!
//! Conceptually, every node records the number of nodes in each of its
//! subtrees:
//!
//! ```text
//!                  [5] (3|3)
//!                /           \
//!        [3] (1|1)           [8] (1|1)
//!        /       \           /       \
//!   [1] (0|0) [4] (0|0) [7] (0|0) [9] (0|0)
//! ```
//!
//! Those counters answer order-statistics questions directly ("how many keys
//! are below 6?", "pick a key uniformly at random", "how long is this
//! range?"), and they are also all the balancing engine looks at: after each
//! insertion or removal the path back to the root is walked, and a rotation
//! (or a double "zig-zag" rotation) is applied wherever it strictly reduces
//! the difference between the two sides of a node.
//!
//! The keys must have a well-behaved [`Ord`] implementation. An ordering that
//! is not total and consistent will not cause undefined behaviour, but lookups
//! may miss keys that are present.
//!
//! On top of the tree the crate provides:
//!
//! - [`PriorityQueue`], a duplicate-free queue served from either end;
//! - [`UniqueRandomGenerator`], drawing integers from a range without
//!   repetition;
//! - [`WeightedRandomGenerator`], sampling items in proportion to integer
//!   weights;
//! - [`RangeStatusStorer`], a boolean status over `u64` assigned a range at a
//!   time.
//!
//! The crate logs through the [`log`] facade (rotations at `trace`, depth
//! recomputation and generator resets at `debug`) and installs no logger of
//! its own.

pub mod error;
pub mod priority_queue;
pub mod random;
pub mod range_status;
pub mod tree;

pub use crate::{
    error::TreeError,
    priority_queue::PriorityQueue,
    random::{UniqueRandomError, UniqueRandomGenerator, WeightedRandomError, WeightedRandomGenerator},
    range_status::{RangeStatusError, RangeStatusStorer},
    tree::{IntoIter, Iter, NodeRef, WeightBalancedTree},
};

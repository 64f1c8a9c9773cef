//! Random generators whose bookkeeping lives in a [`WeightBalancedTree`].
//!
//! Both generators lean on the tree's order statistics: counting the keys
//! below a value is `O(log n)`, which turns "the k-th value not yet drawn"
//! and "the item whose cumulative weight covers this point" into short
//! searches instead of linear scans.
//!
//! Each generator owns a [`SmallRng`]. It is seeded from the thread RNG by
//! `new`, or from an explicit seed by `seeded` for reproducible sequences.
//!
//! [`WeightBalancedTree`]: crate::WeightBalancedTree
//! [`SmallRng`]: rand::rngs::SmallRng

pub mod unique;
pub mod weighted;

pub use crate::random::{
    unique::{UniqueRandomError, UniqueRandomGenerator},
    weighted::{WeightedRandomError, WeightedRandomGenerator},
};

//! Errors reported by the tree and the collections built on it.

use thiserror::Error;

/// Recoverable failures of [`WeightBalancedTree`][crate::WeightBalancedTree]
/// operations.
///
/// A failed operation leaves the tree exactly as it was before the call: any
/// subtree-size bookkeeping done while searching is rolled back before the
/// error is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TreeError {
    /// The key being inserted is already stored.
    #[error("key is already present.")]
    DuplicateKey,
    /// The key being looked up or removed is not stored.
    #[error("key not found.")]
    KeyNotFound,
    /// The operation needs at least one element.
    #[error("collection is empty.")]
    EmptyCollection,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::TreeError;

    #[rstest]
    #[case(TreeError::DuplicateKey, "key is already present.")]
    #[case(TreeError::KeyNotFound, "key not found.")]
    #[case(TreeError::EmptyCollection, "collection is empty.")]
    fn display(#[case] error: TreeError, #[case] message: &str) {
        assert_eq!(error.to_string(), message);
    }
}

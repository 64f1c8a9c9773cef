//! Slot storage for tree nodes.
//!
//! Nodes refer to one another through [`Handle`]s rather than pointers, so the
//! parent back-links never participate in ownership: the [`Arena`] owns every
//! node and a handle is only an index into it.

use std::num::NonZero;

// ////////////////////////////////////////////////////////////////////////////
// Handle
// ////////////////////////////////////////////////////////////////////////////

/// Index of a node within an [`Arena`].
///
/// The index is stored off by one inside a [`NonZero`] so that
/// `Option<Handle>` is the same size as `Handle`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<u32>);

impl Handle {
    /// The largest index a handle can represent.
    pub(crate) const MAX: usize = (u32::MAX - 1) as usize;

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        assert!(
            index <= Self::MAX,
            "`Handle::from_index()` - `index` > `Handle::MAX`!"
        );
        #[expect(
            clippy::cast_possible_truncation,
            clippy::as_conversions,
            reason = "index is checked against Handle::MAX above"
        )]
        let raw = (index + 1) as u32;
        match NonZero::new(raw) {
            Some(raw) => Self(raw),
            None => unreachable!("`index + 1` cannot be zero"),
        }
    }

    #[inline]
    pub(crate) fn to_index(self) -> usize {
        #[expect(clippy::as_conversions, reason = "u32 always fits in usize here")]
        let index = (self.0.get() - 1) as usize;
        index
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Arena
// ////////////////////////////////////////////////////////////////////////////

/// A vector of optional slots with a free list of vacated handles.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.to_index()] = Some(element);
            handle
        } else {
            assert!(
                self.slots.len() <= Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match self.slots.get(handle.to_index()) {
            Some(Some(element)) => element,
            _ => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match self.slots.get_mut(handle.to_index()) {
            Some(Some(element)) => element,
            _ => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Removes the element behind `handle` and recycles the slot.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = match self.slots.get_mut(handle.to_index()) {
            Some(slot) => slot.take(),
            None => None,
        };
        match element {
            Some(element) => {
                self.free.push(handle);
                element
            }
            None => panic!("`Arena::take()` - `handle` is invalid!"),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

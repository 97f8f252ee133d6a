//! Node ID.

use core::fmt;
use core::num::NonZeroUsize;

/// Node ID of an arena tree.
///
/// An ID is only meaningful for the tree that created it. An ID carries the
/// generation of its slot, so once the node is erased the ID stays stale even
/// after a [`FreeList`][`super::FreeList`] tree reuses the slot.
///
/// The ordering (`PartialOrd` and `Ord`) for node IDs are only provided for
/// use with containers that want ordered key types (such as `BTreeSet`).
/// It has no relation to the position of the node in the tree.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    /// Slot index plus one.
    slot: NonZeroUsize,
    /// Generation of the slot.
    generation: u64,
}

impl NodeId {
    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self.slot.get() - 1
    }

    /// Returns the generation of the slot.
    #[inline]
    #[must_use]
    pub(crate) const fn generation(self) -> u64 {
        self.generation
    }

    /// Creates a node ID from the slot index and generation.
    ///
    /// Returns `None` if the given index is too large.
    #[inline]
    #[must_use]
    pub(crate) fn new(index: usize, generation: u64) -> Option<Self> {
        let slot = index.checked_add(1).and_then(NonZeroUsize::new)?;
        Some(Self { slot, generation })
    }

    /// Creates a node ID for a slot that is never reused.
    #[inline]
    #[must_use]
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        Self::new(index, 0)
    }
}

// Prevent `{:#?}` from printing the value in redundant lines.
impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index(), self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::mem;

    use alloc::format;

    #[test]
    fn niche_optimized() {
        assert_eq!(
            mem::size_of::<NodeId>(),
            mem::size_of::<Option<NodeId>>(),
            "`Option<NodeId>` type must have the same size as \
             `NodeId` type due to niche optimization"
        );
    }

    #[test]
    fn index_round_trip() {
        let id = NodeId::from_index(41).expect("small index");
        assert_eq!(id.index(), 41);
        assert_eq!(id.generation(), 0);
        assert_eq!(format!("{:#?}", id), "NodeId(41v0)");
        assert!(NodeId::from_index(usize::MAX).is_none());

        let reused = NodeId::new(41, 3).expect("small index");
        assert_ne!(reused, id);
        assert_eq!(format!("{:?}", reused), "NodeId(41v3)");
    }
}

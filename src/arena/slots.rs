//! Slot storage strategies of the arena.

use alloc::vec::Vec;

use bitvec::vec::BitVec;
use generational_arena::{Arena, Index};

use crate::arena::NodeId;

/// Node record stored in a slot.
#[derive(Debug, Clone)]
pub struct Record<T> {
    /// Payload.
    pub(crate) payload: T,
    /// Parent node, or `None` for the top-level nodes.
    pub(crate) parent: Option<NodeId>,
    /// Index in the children of the parent.
    pub(crate) position: usize,
    /// Children in order.
    pub(crate) children: Vec<NodeId>,
}

impl<T> Record<T> {
    /// Creates a new leaf record.
    #[inline]
    #[must_use]
    pub(crate) fn new(payload: T, parent: Option<NodeId>, position: usize) -> Self {
        Self {
            payload,
            parent,
            position,
            children: Vec::new(),
        }
    }
}

mod private {
    pub trait Sealed {}
}

/// Slot storage of an arena tree.
///
/// This trait is sealed; the crate provides [`FreeList`] and [`AppendOnly`].
pub trait Slots<T>: Default + private::Sealed {
    /// The same storage strategy for another payload type.
    type Rebind<U>: Slots<U>;

    /// Stores the record and returns its ID.
    ///
    /// # Panics
    ///
    /// Panics if the node ID overflows.
    fn allocate(&mut self, record: Record<T>) -> NodeId;

    /// Returns the record if the node is alive.
    fn get(&self, id: NodeId) -> Option<&Record<T>>;

    /// Returns the record if the node is alive.
    fn get_mut(&mut self, id: NodeId) -> Option<&mut Record<T>>;

    /// Releases the slot of a single node.
    ///
    /// Children are not touched.
    fn release(&mut self, id: NodeId);

    /// Returns the number of slots, alive or not.
    fn slot_count(&self) -> usize;
}

/// Slots whose released slots are reused before the storage grows.
///
/// The most recently released slot is reused first. Every reuse bumps the
/// generation of the slot, so IDs of erased nodes never resolve again.
#[derive(Debug, Clone)]
pub struct FreeList<T> {
    /// Records.
    arena: Arena<Record<T>>,
}

impl<T> Default for FreeList<T> {
    #[inline]
    fn default() -> Self {
        Self {
            arena: Arena::new(),
        }
    }
}

impl<T> private::Sealed for FreeList<T> {}

impl<T> Slots<T> for FreeList<T> {
    type Rebind<U> = FreeList<U>;

    fn allocate(&mut self, record: Record<T>) -> NodeId {
        let (index, generation) = self.arena.insert(record).into_raw_parts();
        NodeId::new(index, generation)
            .expect("[precondition] node ID overflowed presumably due to too many node creations")
    }

    #[inline]
    fn get(&self, id: NodeId) -> Option<&Record<T>> {
        self.arena.get(arena_index(id))
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> Option<&mut Record<T>> {
        self.arena.get_mut(arena_index(id))
    }

    fn release(&mut self, id: NodeId) {
        self.arena.remove(arena_index(id));
    }

    /// Counts the released slots and the slots reserved for growth too.
    #[inline]
    fn slot_count(&self) -> usize {
        self.arena.capacity()
    }
}

/// Returns the arena index of the node.
#[inline]
fn arena_index(id: NodeId) -> Index {
    Index::from_raw_parts(id.index(), id.generation())
}

/// Slots that are only ever appended.
///
/// Released slots stay in place as tombstones, and their IDs are never
/// reused. Payloads of tombstones are dropped when the storage is dropped or
/// the tree is rebuilt by [`compacted`][`super::Tree::compacted`].
#[derive(Debug, Clone)]
pub struct AppendOnly<T> {
    /// Records.
    records: Vec<Record<T>>,
    /// Liveness of each record.
    alive: BitVec,
}

impl<T> Default for AppendOnly<T> {
    #[inline]
    fn default() -> Self {
        Self {
            records: Vec::new(),
            alive: BitVec::new(),
        }
    }
}

impl<T> private::Sealed for AppendOnly<T> {}

impl<T> AppendOnly<T> {
    /// Returns true if the slot of the ID is live.
    ///
    /// Slots are never reused, so every ID handed out has generation zero.
    #[inline]
    fn is_alive(&self, id: NodeId) -> bool {
        id.generation() == 0 && self.alive.get(id.index()).map_or(false, |bit| *bit)
    }

    /// Returns the number of tombstones.
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.alive.count_zeros()
    }
}

impl<T> Slots<T> for AppendOnly<T> {
    type Rebind<U> = AppendOnly<U>;

    fn allocate(&mut self, record: Record<T>) -> NodeId {
        let id = NodeId::from_index(self.records.len())
            .expect("[precondition] node ID overflowed presumably due to too many node creations");
        self.records.push(record);
        self.alive.push(true);
        id
    }

    #[inline]
    fn get(&self, id: NodeId) -> Option<&Record<T>> {
        if self.is_alive(id) {
            self.records.get(id.index())
        } else {
            None
        }
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> Option<&mut Record<T>> {
        if self.is_alive(id) {
            self.records.get_mut(id.index())
        } else {
            None
        }
    }

    fn release(&mut self, id: NodeId) {
        if self.is_alive(id) {
            self.alive.set(id.index(), false);
            self.records[id.index()].children = Vec::new();
        }
    }

    #[inline]
    fn slot_count(&self) -> usize {
        self.records.len()
    }
}

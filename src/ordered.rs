//! Contract shared by every tree storage.

use core::ops::Deref;

use alloc::vec::Vec;

use crate::{Anchor, TreeError};

/// Ordered forest under an implicit super-root.
///
/// This is the seam generic code (the [`algorithm`][`crate::algorithm`]
/// functions, [`TreeBuilder`][`crate::TreeBuilder`],
/// [`DebugPrint`][`crate::debug_print::DebugPrint`], the flat encoding) is
/// written against. Methods taking a stale handle behave as if the node had
/// no data and no neighbors.
pub trait OrderedTree {
    /// Payload type.
    type Item;
    /// Node handle.
    type Handle: Clone + PartialEq;
    /// Borrowed payload.
    type ItemRef<'a>: Deref<Target = Self::Item>
    where
        Self: 'a;
    /// Pre-order iterator over node handles.
    type Descendants<'a>: Iterator<Item = Self::Handle>
    where
        Self: 'a;

    /// Returns a pre-order iterator over the node and its descendants.
    ///
    /// `Anchor::Root` iterates the whole forest. A stale node iterates
    /// nothing.
    fn descendants(&self, anchor: Anchor<Self::Handle>) -> Self::Descendants<'_>;

    /// Returns the payload of the node.
    fn item<'a>(&'a self, handle: &'a Self::Handle) -> Option<Self::ItemRef<'a>>;

    /// Returns the children in order.
    fn child_handles(&self, anchor: Anchor<Self::Handle>) -> Vec<Self::Handle>;

    /// Returns the number of children, or `None` for a stale node.
    fn child_count(&self, anchor: Anchor<Self::Handle>) -> Option<usize>;

    /// Returns the parent of the node, or `None` for a stale node.
    fn parent_of(&self, handle: &Self::Handle) -> Option<Anchor<Self::Handle>>;

    /// Returns the index of the node among its siblings.
    fn position_of(&self, handle: &Self::Handle) -> Option<usize>;

    /// Inserts a new node under `anchor` at `position` (appends on `None`).
    ///
    /// # Errors
    ///
    /// * [`TreeError::StaleNode`] if the anchor is a removed node.
    /// * [`TreeError::DestinationOutOfRange`] if the position is past the end
    ///   of the children.
    fn insert_child(
        &mut self,
        anchor: Anchor<Self::Handle>,
        position: Option<usize>,
        item: Self::Item,
    ) -> Result<Self::Handle, TreeError>;

    /// Removes the node and its descendants.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the node has already been removed.
    fn remove(&mut self, handle: &Self::Handle) -> Result<(), TreeError>;
}

/// Returns true if both forests have the same shape and payloads.
///
/// The trees are compared by their pre-order payloads and the number of
/// children of every visited node, so any two storages can be compared.
pub fn shape_eq<L, R>(lhs: &L, rhs: &R) -> bool
where
    L: OrderedTree,
    R: OrderedTree,
    L::Item: PartialEq<R::Item>,
{
    let mut lhs_nodes = lhs.descendants(Anchor::Root);
    let mut rhs_nodes = rhs.descendants(Anchor::Root);
    loop {
        match (lhs_nodes.next(), rhs_nodes.next()) {
            (None, None) => return true,
            (Some(l), Some(r)) => {
                let same_item = match (lhs.item(&l), rhs.item(&r)) {
                    (Some(l_item), Some(r_item)) => *l_item == *r_item,
                    _ => false,
                };
                if !same_item
                    || lhs.child_count(Anchor::Node(l)) != rhs.child_count(Anchor::Node(r))
                {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

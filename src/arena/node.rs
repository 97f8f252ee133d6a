//! Node.

use crate::arena::{Children, FreeList, NodeId, Nodes, Slots, Tree};
use crate::Anchor;

/// Immutable reference to a node.
///
/// This type guarantees that the node ID must be present in the internal
/// storage of the tree and must not be removed yet.
#[derive(Debug)]
pub struct Node<'a, T, S = FreeList<T>> {
    /// Tree.
    tree: &'a Tree<T, S>,
    /// Node ID.
    id: NodeId,
}

impl<T, S> Clone for Node<'_, T, S> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S> Copy for Node<'_, T, S> {}

impl<'a, T, S: Slots<T>> Node<'a, T, S> {
    /// Creates a new `Node` object.
    #[must_use]
    pub(super) fn new(tree: &'a Tree<T, S>, id: NodeId) -> Option<Self> {
        if !tree.is_alive(id) {
            return None;
        }
        Some(Self { tree, id })
    }

    /// Returns the node ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns a reference to the data associated to the node.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &'a T {
        self.tree
            .data(self.id)
            .expect("[validity] the node has been checked to be alive")
    }

    /// Returns the parent, `Anchor::Root` for a top-level node.
    #[must_use]
    pub fn parent_anchor(&self) -> Anchor<NodeId> {
        self.tree
            .parent(self.id)
            .expect("[validity] the node has been checked to be alive")
    }

    /// Returns the parent node, or `None` for a top-level node.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.parent_anchor().node().map(|id| {
            Self::new(self.tree, id).expect("[consistency] the parent must be alive")
        })
    }

    /// Returns the index of the node among its siblings.
    #[must_use]
    pub fn position(&self) -> usize {
        self.tree
            .position(self.id)
            .expect("[validity] the node has been checked to be alive")
    }

    /// Returns the number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.tree
            .child_count(self.id)
            .expect("[validity] the node has been checked to be alive")
    }

    /// Returns true if the node has no children.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.child_count() == 0
    }

    /// Returns an iterator of the children.
    #[must_use]
    pub fn children(&self) -> Children<'a, T, S> {
        self.tree
            .children(self.id)
            .expect("[validity] the node has been checked to be alive")
    }

    /// Returns a pre-order iterator of the node and its descendants.
    #[inline]
    #[must_use]
    pub fn descendants(&self) -> Nodes<'a, T, S> {
        self.tree.subtree_nodes(self.id)
    }

    /// Returns the next sibling node.
    #[must_use]
    pub fn next_sibling(&self) -> Option<Self> {
        self.sibling_at(self.position().checked_add(1)?)
    }

    /// Returns the previous sibling node.
    #[must_use]
    pub fn prev_sibling(&self) -> Option<Self> {
        self.sibling_at(self.position().checked_sub(1)?)
    }

    /// Returns the sibling at the position.
    fn sibling_at(&self, position: usize) -> Option<Self> {
        let id = *self
            .tree
            .child_ids(self.parent_anchor())
            .expect("[consistency] the parent must be alive")
            .get(position)?;
        Some(Self::new(self.tree, id).expect("[consistency] the sibling must be alive"))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::arena::Tree;
    use crate::Anchor;

    #[test]
    fn neighbors() {
        let mut tree = Tree::new();
        let root = tree.insert(Anchor::Root, "root", None).expect("root");
        let ids = tree.insert_range(root, None, ["a", "b", "c"]).expect("alive");

        let b = tree.node(ids[1]).expect("alive");
        assert_eq!(*b.data(), "b");
        assert_eq!(b.position(), 1);
        assert_eq!(b.prev_sibling().map(|n| *n.data()), Some("a"));
        assert_eq!(b.next_sibling().map(|n| *n.data()), Some("c"));
        assert_eq!(b.parent().map(|n| n.id()), Some(root));
        assert!(b.is_leaf());

        let top = tree.node(root).expect("alive");
        assert_eq!(top.parent_anchor(), Anchor::Root);
        assert!(top.parent().is_none());
        assert!(top.next_sibling().is_none());
        assert_eq!(top.child_count(), 3);
        assert_eq!(
            top.descendants().map(|n| *n.data()).collect::<Vec<_>>(),
            ["root", "a", "b", "c"]
        );
    }
}

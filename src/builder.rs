//! Tree builder.

use crate::{Anchor, OrderedTree};

/// Tree builder.
///
/// `TreeBuilder` creates a new top-level node and remembers "the current
/// node".
///
/// * [`TreeBuilder::child()`][`TreeBuilder::child`] appends a new last child
///   to the current node.
/// * [`TreeBuilder::sibling()`][`TreeBuilder::sibling`] inserts a new node
///   right after the current node.
/// * [`TreeBuilder::parent()`][`TreeBuilder::parent`] makes the parent the
///   new current node.
///
/// Each of the first two moves the current node to the new one.
///
/// # Examples
///
/// ```
/// use sylva::arena::Tree;
/// use sylva::TreeBuilder;
///
/// let mut tree = Tree::new();
/// TreeBuilder::new(&mut tree, "root")
///     .child("0")
///     .child("0-0")
///     .sibling("0-1")
///     .parent()
///     .sibling("1")
///     .child("1-0");
///
/// // Tree:
/// //  root
/// //  |-- 0
/// //  |   |-- 0-0
/// //  |   `-- 0-1
/// //  `-- 1
/// //      `-- 1-0
/// assert_eq!(
///     tree.iter().copied().collect::<Vec<_>>(),
///     ["root", "0", "0-0", "0-1", "1", "1-0"]
/// );
/// ```
///
/// The builder works on every tree variant, and returns the root at once.
///
/// ```
/// use sylva::{owned, TreeBuilder};
///
/// let mut tree = owned::Tree::new();
/// let root = TreeBuilder::new(&mut tree, 'a')
///     .child('b')
///     .sibling('c')
///     .root();
/// assert_eq!(root.child_count(), 2);
/// assert_eq!(*root.children()[1].borrow_data(), 'c');
/// ```
pub struct TreeBuilder<'a, Tr: OrderedTree> {
    /// Target tree.
    tree: &'a mut Tr,
    /// Root of the tree being built.
    root: Tr::Handle,
    /// Current node.
    current: Tr::Handle,
}

impl<'a, Tr: OrderedTree> TreeBuilder<'a, Tr> {
    /// Appends a new top-level node and creates the builder for it.
    pub fn new(tree: &'a mut Tr, root_item: Tr::Item) -> Self {
        let root = tree
            .insert_child(Anchor::Root, None, root_item)
            .expect("[consistency] appending under the super-root never fails");
        Self {
            tree,
            current: root.clone(),
            root,
        }
    }

    /// Returns a reference to the tree.
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &Tr {
        self.tree
    }

    /// Returns a mutable reference to the tree.
    ///
    /// Removing the current node through this reference makes later builder
    /// calls panic.
    #[inline]
    #[must_use]
    pub fn tree_mut(&mut self) -> &mut Tr {
        self.tree
    }

    /// Returns the root of the tree being built.
    #[inline]
    #[must_use]
    pub fn root(&self) -> Tr::Handle {
        self.root.clone()
    }

    /// Returns the current node.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Tr::Handle {
        self.current.clone()
    }

    /// Appends a child node to the current node, and changes the current node to it.
    pub fn child(&mut self, item: Tr::Item) -> &mut Self {
        self.current = self
            .tree
            .insert_child(Anchor::Node(self.current.clone()), None, item)
            .expect("[precondition] the current node must be alive");
        self
    }

    /// Adds a next sibling node to the current node, and changes the current node to it.
    ///
    /// A sibling of the root becomes a new top-level node.
    pub fn sibling(&mut self, item: Tr::Item) -> &mut Self {
        let parent = self
            .tree
            .parent_of(&self.current)
            .expect("[precondition] the current node must be alive");
        let position = self
            .tree
            .position_of(&self.current)
            .expect("[precondition] the current node must be alive");
        self.current = self
            .tree
            .insert_child(parent, Some(position + 1), item)
            .expect("[consistency] the slot right after a live node is always valid");
        self
    }

    /// Tries to change the current node to the parent of the current node.
    ///
    /// Returns `None` if the current node is a top-level node.
    pub fn try_parent(&mut self) -> Option<&mut Self> {
        let parent = self
            .tree
            .parent_of(&self.current)
            .expect("[precondition] the current node must be alive")
            .node()?;
        self.current = parent;
        Some(self)
    }

    /// Changes the current node to the parent of the current node.
    ///
    /// # Panics
    ///
    /// Panics if the current node is a top-level node.
    pub fn parent(&mut self) -> &mut Self {
        self.try_parent()
            .expect("[precondition] the current node should not be a top-level node")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::vec::Vec;

    use crate::arena::{AppendTree, Tree};

    #[test]
    fn builds_nested_tree() {
        let mut tree = Tree::new();
        let root = TreeBuilder::new(&mut tree, "root")
            .child("0")
            .child("0-0")
            .child("0-0-0")
            .parent()
            .sibling("0-1")
            .parent()
            .sibling("1")
            .sibling("2")
            .child("2-0")
            .parent()
            .sibling("3")
            .root();

        assert_eq!(
            tree.iter().copied().collect::<Vec<_>>(),
            ["root", "0", "0-0", "0-0-0", "0-1", "1", "2", "2-0", "3"]
        );
        assert_eq!(tree.child_count(root), Some(4));
    }

    #[test]
    fn try_parent_stops_at_top_level() {
        let mut tree = AppendTree::default();
        let mut builder = TreeBuilder::new(&mut tree, 0);
        builder.child(1);
        assert!(builder.try_parent().is_some());
        assert_eq!(builder.current(), builder.root());
        assert!(builder.try_parent().is_none());
        assert_eq!(builder.current(), builder.root());
    }

    #[test]
    fn root_sibling_is_top_level() {
        let mut tree = Tree::new();
        let mut builder = TreeBuilder::new(&mut tree, 'a');
        builder.sibling('b');
        let b = builder.current();
        assert_eq!(builder.tree().parent(b), Some(Anchor::Root));
        assert_eq!(builder.tree().position(b), Some(1));
    }

    #[test]
    #[should_panic(expected = "[precondition]")]
    fn parent_of_top_level_panics() {
        let mut tree = Tree::new();
        TreeBuilder::new(&mut tree, 0).parent();
    }
}

//! Index-addressed arena trees.
//!
//! Nodes live in a slot storage ([`Slots`]) and are addressed by [`NodeId`].
//! Each record keeps its payload, its parent, its position among its
//! siblings, and the ordered list of its children. The top-level nodes are the
//! children of [`Anchor::Root`].

mod edit;
mod id;
mod node;
mod slots;
pub mod traverse;

use core::fmt;
use core::marker::PhantomData;

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::debug_print::DebugPrint;
use crate::{flat, ordered, Anchor, DecodeError, OrderedTree, TreeError};

pub use self::id::NodeId;
pub use self::node::Node;
pub use self::slots::{AppendOnly, FreeList, Record, Slots};
pub use self::traverse::{Children, Descendants, Iter, Nodes};

/// Tree whose erased slots are tombstones until the tree is compacted.
pub type AppendTree<T> = Tree<T, AppendOnly<T>>;

/// Arena tree.
///
/// `S` is the slot storage: [`FreeList`] (the default) recycles the slots of
/// erased nodes, [`AppendOnly`] never does.
///
/// # Examples
///
/// ```
/// use sylva::arena::Tree;
/// use sylva::Anchor;
///
/// let mut tree = Tree::new();
/// let a = tree.insert(Anchor::Root, "a", None)?;
/// let b = tree.insert(a, "b", None)?;
/// tree.insert(a, "c", Some(0))?;
///
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), ["a", "c", "b"]);
/// assert_eq!(tree.parent(b), Some(Anchor::Node(a)));
/// assert_eq!(tree.position(b), Some(1));
/// # Ok::<_, sylva::TreeError>(())
/// ```
pub struct Tree<T, S = FreeList<T>> {
    /// Slot storage.
    slots: S,
    /// Top-level nodes.
    roots: Vec<NodeId>,
    /// Payload type.
    _payload: PhantomData<T>,
}

impl<T, S: Slots<T>> Default for Tree<T, S> {
    #[inline]
    fn default() -> Self {
        Self {
            slots: S::default(),
            roots: Vec::new(),
            _payload: PhantomData,
        }
    }
}

impl<T, S: Clone> Clone for Tree<T, S> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            roots: self.roots.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T, S: fmt::Debug> fmt::Debug for Tree<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("slots", &self.slots)
            .field("roots", &self.roots)
            .finish()
    }
}

impl<T> Tree<T> {
    /// Creates a new empty tree.
    ///
    /// Use [`Default`] for other slot storages, e.g. `AppendTree::default()`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, S: Slots<T>> Tree<T, S> {
    /// Returns the record of the node if the node is alive.
    #[inline]
    #[must_use]
    pub(crate) fn record(&self, id: NodeId) -> Option<&Record<T>> {
        self.slots.get(id)
    }

    /// Returns true if the node exists and is not yet removed.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slots.get(id).is_some()
    }

    /// Returns a reference to the data associated to the node.
    #[inline]
    #[must_use]
    pub fn data(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id).map(|record| &record.payload)
    }

    /// Returns a mutable reference to the data associated to the node.
    #[inline]
    #[must_use]
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id).map(|record| &mut record.payload)
    }

    /// Returns a [proxy object][`Node`] to the node.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<Node<'_, T, S>> {
        Node::new(self, id)
    }

    /// Returns the IDs of the children in order.
    ///
    /// Returns `None` if the anchor is a removed node.
    #[must_use]
    pub fn child_ids(&self, anchor: impl Into<Anchor<NodeId>>) -> Option<&[NodeId]> {
        match anchor.into() {
            Anchor::Root => Some(&self.roots),
            Anchor::Node(id) => self.slots.get(id).map(|record| &record.children[..]),
        }
    }

    /// Returns the number of children.
    ///
    /// Returns `None` if the anchor is a removed node.
    #[inline]
    #[must_use]
    pub fn child_count(&self, anchor: impl Into<Anchor<NodeId>>) -> Option<usize> {
        self.child_ids(anchor).map(<[NodeId]>::len)
    }

    /// Returns an iterator of the children.
    ///
    /// Returns `None` if the anchor is a removed node.
    #[must_use]
    pub fn children(&self, anchor: impl Into<Anchor<NodeId>>) -> Option<Children<'_, T, S>> {
        self.child_ids(anchor).map(|ids| Children::new(self, ids))
    }

    /// Returns the parent of the node, `Anchor::Root` for a top-level node.
    ///
    /// Returns `None` if the node has been removed.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<Anchor<NodeId>> {
        self.slots.get(id).map(|record| parent_anchor(record.parent))
    }

    /// Returns the index of the node among its siblings.
    ///
    /// Returns `None` if the node has been removed.
    #[inline]
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.slots.get(id).map(|record| record.position)
    }

    /// Returns the number of nodes.
    ///
    /// This walks the whole tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descendants(Anchor::Root).count()
    }

    /// Returns true if the tree has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Returns the number of slots in the storage, including released ones.
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.slot_count()
    }

    /// Returns the slot storage.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Returns a pre-order iterator of the payloads.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T, S> {
        Iter::new(self.descendants(Anchor::Root))
    }

    /// Returns a pre-order iterator of all nodes.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> Nodes<'_, T, S> {
        self.subtree_nodes(Anchor::Root)
    }

    /// Returns a pre-order iterator of the node and its descendants.
    ///
    /// `Anchor::Root` iterates the whole tree. A removed node iterates
    /// nothing.
    #[inline]
    #[must_use]
    pub fn subtree_nodes(&self, anchor: impl Into<Anchor<NodeId>>) -> Nodes<'_, T, S> {
        Nodes::new(self.descendants(anchor))
    }

    /// Returns a pre-order iterator of the IDs of the node and its descendants.
    ///
    /// `Anchor::Root` iterates the whole tree. A removed node iterates
    /// nothing.
    #[inline]
    #[must_use]
    pub fn descendants(&self, anchor: impl Into<Anchor<NodeId>>) -> Descendants<'_, T, S> {
        Descendants::new(self, anchor.into())
    }

    /// Creates a tree with the same shape whose payloads are `f(payload)`.
    ///
    /// `Anchor::Root` transforms the whole tree; a node transforms its
    /// subtree, which becomes the only top-level node of the new tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the anchor is a removed node.
    ///
    /// # Examples
    ///
    /// ```
    /// use sylva::arena::Tree;
    /// use sylva::Anchor;
    ///
    /// let mut tree = Tree::new();
    /// let a = tree.insert(Anchor::Root, 1, None)?;
    /// tree.insert(a, 2, None)?;
    ///
    /// let strings = tree.transform(Anchor::Root, |v| v.to_string())?;
    /// assert_eq!(strings.iter().cloned().collect::<Vec<_>>(), ["1", "2"]);
    /// # Ok::<_, sylva::TreeError>(())
    /// ```
    pub fn transform<U, F>(
        &self,
        anchor: impl Into<Anchor<NodeId>>,
        f: F,
    ) -> Result<Tree<U, S::Rebind<U>>, TreeError>
    where
        F: FnMut(&T) -> U,
    {
        self.transform_into(anchor.into(), f)
    }

    /// Creates a tree with the same shape whose payloads are `f(proj(payload))`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the anchor is a removed node.
    pub fn transform_with<P, U, Proj, F>(
        &self,
        anchor: impl Into<Anchor<NodeId>>,
        mut proj: Proj,
        mut f: F,
    ) -> Result<Tree<U, S::Rebind<U>>, TreeError>
    where
        Proj: FnMut(&T) -> P,
        F: FnMut(P) -> U,
    {
        self.transform_into(anchor.into(), |payload| f(proj(payload)))
    }

    /// Copies the subtree (or the whole tree) into a new tree, breadth-first.
    fn transform_into<U, D, F>(&self, anchor: Anchor<NodeId>, mut f: F) -> Result<Tree<U, D>, TreeError>
    where
        D: Slots<U>,
        F: FnMut(&T) -> U,
    {
        let mut out = Tree::<U, D>::default();
        let mut queue = VecDeque::new();
        match anchor {
            Anchor::Root => queue.push_back((Anchor::Root, Anchor::Root)),
            Anchor::Node(id) => {
                let record = self.record(id).ok_or(TreeError::StaleNode)?;
                let top = out.append_child(Anchor::Root, f(&record.payload));
                queue.push_back((anchor, Anchor::Node(top)));
            }
        }
        while let Some((src, dest)) = queue.pop_front() {
            let children = self
                .child_ids(src)
                .expect("[consistency] queued nodes must be alive");
            for &child in children {
                let record = self
                    .record(child)
                    .expect("[consistency] children of a live node must be alive");
                let new = out.append_child(dest, f(&record.payload));
                queue.push_back((Anchor::Node(child), Anchor::Node(new)));
            }
        }

        Ok(out)
    }

    /// Applies `f` to the payload of the node and its descendants in pre-order.
    ///
    /// `Anchor::Root` applies it to every node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the anchor is a removed node.
    pub fn map_in_place<F>(&mut self, anchor: impl Into<Anchor<NodeId>>, mut f: F) -> Result<(), TreeError>
    where
        F: FnMut(&mut T),
    {
        let mut stack: Vec<NodeId> = match anchor.into() {
            Anchor::Root => self.roots.iter().rev().copied().collect(),
            Anchor::Node(id) if self.is_alive(id) => alloc::vec![id],
            Anchor::Node(_) => return Err(TreeError::StaleNode),
        };
        while let Some(id) = stack.pop() {
            let record = self
                .slots
                .get_mut(id)
                .expect("[consistency] descendants of a live node must be alive");
            f(&mut record.payload);
            stack.extend(record.children.iter().rev().copied());
        }

        Ok(())
    }

    /// Encodes the tree into its flat form.
    ///
    /// # Examples
    ///
    /// ```
    /// use sylva::arena::Tree;
    /// use sylva::Anchor;
    ///
    /// let mut tree = Tree::new();
    /// let a = tree.insert(Anchor::Root, 'a', None)?;
    /// tree.insert(a, 'b', None)?;
    ///
    /// let flat = tree.flatten();
    /// assert_eq!(flat, [None, None, Some('a'), None, Some('b'), None, None]);
    /// assert_eq!(Tree::<char>::from_flattened(flat), Ok(tree));
    /// # Ok::<_, sylva::TreeError>(())
    /// ```
    #[must_use]
    pub fn flatten(&self) -> Vec<Option<T>>
    where
        T: Clone,
    {
        flat::encode(self)
    }

    /// Decodes a tree from its flat form.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the sequence is not a valid encoding.
    pub fn from_flattened<I>(slots: I) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = Option<T>>,
    {
        flat::decode(slots)
    }

    /// Copies the subtree into a new tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the node has been removed.
    pub fn subtree(&self, id: NodeId) -> Result<Self, TreeError>
    where
        T: Clone,
    {
        self.transform_into(Anchor::Node(id), T::clone)
    }

    /// Rebuilds the tree into fresh, densely packed slots.
    ///
    /// IDs of the new tree are unrelated to the IDs of `self`. For an
    /// [`AppendTree`] this is the way to drop tombstones.
    #[must_use]
    pub fn compacted(&self) -> Self
    where
        T: Clone,
    {
        self.transform_into(Anchor::Root, T::clone)
            .expect("[consistency] the super-root is always alive")
    }

    /// Returns a printable view of the tree.
    ///
    /// See [`DebugPrint`] for the format.
    #[inline]
    #[must_use]
    pub fn debug_print(&self) -> DebugPrint<'_, Self> {
        DebugPrint::new(self, Anchor::Root)
    }
}

/// Converts the stored parent into an anchor.
#[inline]
#[must_use]
fn parent_anchor(parent: Option<NodeId>) -> Anchor<NodeId> {
    parent.map_or(Anchor::Root, Anchor::Node)
}

impl<T, S, U, S2> PartialEq<Tree<U, S2>> for Tree<T, S>
where
    T: PartialEq<U>,
    S: Slots<T>,
    S2: Slots<U>,
{
    fn eq(&self, other: &Tree<U, S2>) -> bool {
        ordered::shape_eq(self, other)
    }
}

impl<T: Eq, S: Slots<T>> Eq for Tree<T, S> {}

impl<'a, T, S: Slots<T>> IntoIterator for &'a Tree<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S: Slots<T>> OrderedTree for Tree<T, S> {
    type Item = T;
    type Handle = NodeId;
    type ItemRef<'a> = &'a T where Self: 'a;
    type Descendants<'a> = Descendants<'a, T, S> where Self: 'a;

    #[inline]
    fn descendants(&self, anchor: Anchor<NodeId>) -> Self::Descendants<'_> {
        Tree::descendants(self, anchor)
    }

    #[inline]
    fn item<'a>(&'a self, handle: &'a NodeId) -> Option<&'a T> {
        self.data(*handle)
    }

    fn child_handles(&self, anchor: Anchor<NodeId>) -> Vec<NodeId> {
        self.child_ids(anchor).map(<[NodeId]>::to_vec).unwrap_or_default()
    }

    #[inline]
    fn child_count(&self, anchor: Anchor<NodeId>) -> Option<usize> {
        Tree::child_count(self, anchor)
    }

    #[inline]
    fn parent_of(&self, handle: &NodeId) -> Option<Anchor<NodeId>> {
        self.parent(*handle)
    }

    #[inline]
    fn position_of(&self, handle: &NodeId) -> Option<usize> {
        self.position(*handle)
    }

    #[inline]
    fn insert_child(
        &mut self,
        anchor: Anchor<NodeId>,
        position: Option<usize>,
        item: T,
    ) -> Result<NodeId, TreeError> {
        self.insert(anchor, item, position)
    }

    #[inline]
    fn remove(&mut self, handle: &NodeId) -> Result<(), TreeError> {
        self.erase(*handle)
    }
}

//! Trees of reference-counted nodes.
//!
//! Every node is an `Rc` allocation that owns its children; parents are weak
//! back-links. Handles ([`NodeRef`]) are shared pointers, so subtrees can be
//! detached into a new tree without copying, and handles into a taken subtree
//! stay valid in the new tree.

mod node;
mod traverse;

use core::cell::Ref;
use core::fmt;
use core::mem;

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::debug_print::DebugPrint;
use crate::slide::slide;
use crate::{arena, flat, ordered, Anchor, DecodeError, OrderedTree, TreeError};

use self::node::{adopt, renumber, teardown, Link, NodeCell, Place, TopLevel, Up};

pub use self::node::NodeRef;
pub use self::traverse::Descendants;

/// Tree of reference-counted nodes.
///
/// # Examples
///
/// ```
/// use sylva::owned::Tree;
/// use sylva::Anchor;
///
/// let mut tree = Tree::new();
/// let a = tree.insert(Anchor::Root, 1, None)?;
/// let b = tree.insert(&a, 2, None)?;
///
/// let taken = tree.take_subtree(&b)?;
/// assert!(tree.iter().map(|n| *n.borrow_data()).eq([1]));
///
/// // The handle follows its node into the new tree.
/// assert_eq!(taken.parent(&b), Some(Anchor::Root));
/// *b.borrow_data_mut() = 20;
/// assert!(taken.iter().map(|n| *n.borrow_data()).eq([20]));
/// # Ok::<_, sylva::TreeError>(())
/// ```
pub struct Tree<T> {
    /// The super-root.
    top: Rc<TopLevel<T>>,
}

impl<T> Default for Tree<T> {
    #[inline]
    fn default() -> Self {
        Self {
            top: TopLevel::new(),
        }
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        teardown(mem::take(&mut *self.top.children.borrow_mut()));
    }
}

impl<T: Clone> Clone for Tree<T> {
    fn clone(&self) -> Self {
        self.transform(Anchor::Root, T::clone)
            .expect("[consistency] the super-root is always alive")
    }
}

impl<T: fmt::Debug> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tree").field(&self.debug_print()).finish()
    }
}

impl<T> Tree<T> {
    /// Creates a new empty tree.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the place of the anchor, or `None` for a node not in this tree.
    fn place(&self, anchor: &Anchor<NodeRef<T>>) -> Option<Place<T>> {
        match anchor {
            Anchor::Root => Some(Place::Top(Rc::clone(&self.top))),
            Anchor::Node(node) if self.contains(node) => Some(Place::Node(Rc::clone(&node.0))),
            Anchor::Node(_) => None,
        }
    }

    /// Returns the place of the anchor.
    fn live_place(&self, anchor: &Anchor<NodeRef<T>>) -> Result<Place<T>, TreeError> {
        self.place(anchor).ok_or(TreeError::StaleNode)
    }

    /// Returns true if the node belongs to this tree.
    ///
    /// Every method taking a handle treats the nodes of other trees like
    /// detached ones.
    #[inline]
    #[must_use]
    pub fn contains(&self, node: &NodeRef<T>) -> bool {
        node.0.is_owned_by(&self.top)
    }

    /// Returns the children in order.
    ///
    /// Returns `None` if the anchor is a detached node.
    #[must_use]
    pub fn children(&self, anchor: impl Into<Anchor<NodeRef<T>>>) -> Option<Vec<NodeRef<T>>> {
        let place = self.place(&anchor.into())?;
        let children = place.children().borrow();
        Some(children.iter().cloned().map(NodeRef).collect())
    }

    /// Returns the number of children.
    ///
    /// Returns `None` if the anchor is a detached node.
    #[must_use]
    pub fn child_count(&self, anchor: impl Into<Anchor<NodeRef<T>>>) -> Option<usize> {
        let place = self.place(&anchor.into())?;
        let count = place.children().borrow().len();
        Some(count)
    }

    /// Returns the parent of the node, `Anchor::Root` for a top-level node.
    ///
    /// Returns `None` if the node is not in this tree.
    #[must_use]
    pub fn parent(&self, node: &NodeRef<T>) -> Option<Anchor<NodeRef<T>>> {
        if !self.contains(node) {
            return None;
        }
        node.0.place_above().map(Place::into_anchor)
    }

    /// Returns the index of the node among its siblings.
    ///
    /// Returns `None` if the node is not in this tree.
    #[must_use]
    pub fn position(&self, node: &NodeRef<T>) -> Option<usize> {
        self.contains(node).then(|| node.position())
    }

    /// Returns the number of nodes.
    ///
    /// This walks the whole tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if the tree has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.children.borrow().is_empty()
    }

    /// Returns a pre-order iterator of all nodes.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Descendants<T> {
        Descendants::whole(Place::Top(Rc::clone(&self.top)))
    }

    /// Returns a pre-order iterator of the node and its descendants.
    ///
    /// `Anchor::Root` iterates the whole tree. A detached node iterates
    /// nothing.
    #[must_use]
    pub fn descendants(&self, anchor: impl Into<Anchor<NodeRef<T>>>) -> Descendants<T> {
        match anchor.into() {
            Anchor::Root => self.iter(),
            Anchor::Node(node) if self.contains(&node) => Descendants::subtree(node.0),
            Anchor::Node(_) => Descendants::empty(),
        }
    }

    /// Returns the position `position` resolves to under `place`.
    fn destination(place: &Place<T>, position: Option<usize>) -> Result<usize, TreeError> {
        let len = place.children().borrow().len();
        match position {
            None => Ok(len),
            Some(position) if position <= len => Ok(position),
            Some(position) => Err(TreeError::DestinationOutOfRange { position, len }),
        }
    }

    /// Inserts a new node as a child of `parent`.
    ///
    /// The node is placed at `position` among the children, shifting the later
    /// siblings; `None` appends it.
    ///
    /// # Errors
    ///
    /// * [`TreeError::StaleNode`] if the parent is not a node of this tree.
    /// * [`TreeError::DestinationOutOfRange`] if `position` is greater than the
    ///   number of children.
    pub fn insert(
        &mut self,
        parent: impl Into<Anchor<NodeRef<T>>>,
        item: T,
        position: Option<usize>,
    ) -> Result<NodeRef<T>, TreeError> {
        let place = self.live_place(&parent.into())?;
        let at = Self::destination(&place, position)?;
        let node = NodeCell::new(item, &place, at);
        let mut children = place.children().borrow_mut();
        children.insert(at, Rc::clone(&node));
        renumber(&children[..], at + 1);
        tracing::trace!(position = at, "inserted node");

        Ok(NodeRef(node))
    }

    /// Inserts new nodes as consecutive children of `parent`.
    ///
    /// The new nodes keep the order of `items`.
    ///
    /// # Errors
    ///
    /// * [`TreeError::StaleNode`] if the parent is not a node of this tree.
    /// * [`TreeError::DestinationOutOfRange`] if `position` is greater than the
    ///   number of children.
    pub fn insert_range<I>(
        &mut self,
        parent: impl Into<Anchor<NodeRef<T>>>,
        position: Option<usize>,
        items: I,
    ) -> Result<Vec<NodeRef<T>>, TreeError>
    where
        I: IntoIterator<Item = T>,
    {
        let place = self.live_place(&parent.into())?;
        let at = Self::destination(&place, position)?;
        let nodes = items
            .into_iter()
            .enumerate()
            .map(|(offset, item)| NodeCell::new(item, &place, at + offset))
            .collect::<Vec<_>>();
        if !nodes.is_empty() {
            let mut children = place.children().borrow_mut();
            children.splice(at..at, nodes.iter().cloned());
            renumber(&children[..], at + nodes.len());
        }
        tracing::trace!(position = at, count = nodes.len(), "inserted nodes");

        Ok(nodes.into_iter().map(NodeRef).collect())
    }

    /// Removes the node and all of its descendants.
    ///
    /// Handles of the removed nodes become detached. Erasing `Anchor::Root`
    /// does nothing; use [`clear`][`Self::clear`] to remove everything.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the node is not in this tree.
    pub fn erase(&mut self, anchor: impl Into<Anchor<NodeRef<T>>>) -> Result<(), TreeError> {
        let node = match anchor.into() {
            Anchor::Root => return Ok(()),
            Anchor::Node(node) => node,
        };
        let position = self.position(&node).ok_or(TreeError::StaleNode)?;
        let link = Self::unlink(&node)?;
        teardown(alloc::vec![link]);
        tracing::trace!(position, "erased subtree");

        Ok(())
    }

    /// Removes the node from the children of its parent.
    fn unlink(node: &NodeRef<T>) -> Result<Link<T>, TreeError> {
        let place = node.0.place_above().ok_or(TreeError::StaleNode)?;
        let position = node.position();
        let mut children = place.children().borrow_mut();
        if !children
            .get(position)
            .map_or(false, |child| Rc::ptr_eq(child, &node.0))
        {
            return Err(TreeError::StaleNode);
        }
        let link = children.remove(position);
        renumber(&children[..], position);

        Ok(link)
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        teardown(mem::take(&mut *self.top.children.borrow_mut()));
    }

    /// Moves `count` consecutive children of `source_parent`, starting at
    /// `source_position`, to `dest_position` among the children of
    /// `dest_parent`.
    ///
    /// Positions follow [`arena::Tree::move_nodes`]: with the same parent
    /// `dest_position` is a gap index into the children before the move.
    ///
    /// # Errors
    ///
    /// * [`TreeError::StaleNode`] if either parent is not a node of this tree.
    /// * [`TreeError::SourceOutOfRange`] if the run passes the end of the
    ///   source children.
    /// * [`TreeError::DestinationOutOfRange`] if `dest_position` is greater
    ///   than the number of destination children.
    /// * [`TreeError::AncestorDescendantLoop`] if `dest_parent` is one of the
    ///   moved nodes or their descendants.
    ///
    /// The tree is not modified on error.
    pub fn move_nodes(
        &mut self,
        source_parent: impl Into<Anchor<NodeRef<T>>>,
        source_position: usize,
        count: usize,
        dest_parent: impl Into<Anchor<NodeRef<T>>>,
        dest_position: usize,
    ) -> Result<(), TreeError> {
        let source = self.live_place(&source_parent.into())?;
        let dest = self.live_place(&dest_parent.into())?;

        let source_len = source.children().borrow().len();
        let source_end = source_position
            .checked_add(count)
            .filter(|&end| end <= source_len)
            .ok_or(TreeError::SourceOutOfRange {
                start: source_position,
                count,
                len: source_len,
            })?;
        let dest_len = dest.children().borrow().len();
        if dest_position > dest_len {
            return Err(TreeError::DestinationOutOfRange {
                position: dest_position,
                len: dest_len,
            });
        }
        let run = source_position..source_end;

        if source.ptr_eq(&dest) {
            let mut children = source.children().borrow_mut();
            let window = slide(&mut children[..], run.clone(), dest_position);
            renumber(&children[..window.end], window.start);
            tracing::trace!(?run, dest_position, "moved nodes among siblings");
            return Ok(());
        }

        if let Place::Node(dest_node) = &dest {
            let mut current = Rc::clone(dest_node);
            loop {
                let Some(above) = current.place_above() else {
                    break;
                };
                if above.ptr_eq(&source) && run.contains(&current.position.get()) {
                    return Err(TreeError::AncestorDescendantLoop);
                }
                match above {
                    Place::Top(_) => break,
                    Place::Node(parent) => current = parent,
                }
            }
        }
        if run.is_empty() {
            return Ok(());
        }

        let moved = {
            let mut children = source.children().borrow_mut();
            let moved = children.drain(run.clone()).collect::<Vec<_>>();
            renumber(&children[..], run.start);
            moved
        };
        for node in &moved {
            *node.parent.borrow_mut() = dest.downgrade();
        }
        let mut children = dest.children().borrow_mut();
        children.splice(dest_position..dest_position, moved);
        renumber(&children[..], dest_position);
        tracing::trace!(?run, dest_position, "moved nodes to another parent");

        Ok(())
    }

    /// Detaches the node and its descendants, and returns them as a new tree.
    ///
    /// No payload is copied: the handles of the taken nodes stay valid and
    /// now point into the returned tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the node is not in this tree.
    pub fn take_subtree(&mut self, node: &NodeRef<T>) -> Result<Self, TreeError> {
        if !self.contains(node) {
            return Err(TreeError::StaleNode);
        }
        let link = Self::unlink(node)?;
        let tree = Self::new();
        *link.parent.borrow_mut() = Up::Top(Rc::downgrade(&tree.top));
        link.position.set(0);
        adopt(core::slice::from_ref(&link), &tree.top);
        tree.top.children.borrow_mut().push(link);
        tracing::trace!("took subtree");

        Ok(tree)
    }

    /// Moves every tree of `other` under `parent` without copying.
    ///
    /// The top-level nodes of `other` become consecutive children of `parent`
    /// starting at `position` (`None` appends). Handles into `other` stay
    /// valid and now point into `self`.
    ///
    /// # Errors
    ///
    /// * [`TreeError::StaleNode`] if the parent is not a node of this tree.
    /// * [`TreeError::DestinationOutOfRange`] if `position` is greater than the
    ///   number of children.
    ///
    /// `other` is left unchanged on error.
    pub fn graft(
        &mut self,
        parent: impl Into<Anchor<NodeRef<T>>>,
        other: &mut Self,
        position: Option<usize>,
    ) -> Result<Vec<NodeRef<T>>, TreeError> {
        let place = self.live_place(&parent.into())?;
        let at = Self::destination(&place, position)?;
        let moved = mem::take(&mut *other.top.children.borrow_mut());
        for node in &moved {
            *node.parent.borrow_mut() = place.downgrade();
        }
        adopt(&moved, &self.top);
        let handles = moved.iter().cloned().map(NodeRef).collect::<Vec<_>>();
        let mut children = place.children().borrow_mut();
        children.splice(at..at, moved);
        renumber(&children[..], at);
        tracing::trace!(position = at, count = handles.len(), "grafted trees");

        Ok(handles)
    }

    /// Inserts a copy of every tree of `other` under `parent`.
    ///
    /// The top-level nodes of `other` become consecutive children of `parent`
    /// starting at `position` (`None` appends). Returns their new handles.
    ///
    /// # Errors
    ///
    /// * [`TreeError::StaleNode`] if the parent is not a node of this tree.
    /// * [`TreeError::DestinationOutOfRange`] if `position` is greater than the
    ///   number of children.
    pub fn insert_subtree<Tr>(
        &mut self,
        parent: impl Into<Anchor<NodeRef<T>>>,
        other: &Tr,
        position: Option<usize>,
    ) -> Result<Vec<NodeRef<T>>, TreeError>
    where
        Tr: OrderedTree<Item = T>,
        T: Clone,
    {
        let tops = other.child_handles(Anchor::Root);
        let items = tops
            .iter()
            .map(|handle| {
                other
                    .item(handle)
                    .map(|item| (*item).clone())
                    .expect("[consistency] children of the super-root must be alive")
            })
            .collect::<Vec<_>>();
        let handles = self.insert_range(parent, position, items)?;

        let mut queue = tops.into_iter().zip(handles.iter().cloned()).collect::<VecDeque<_>>();
        while let Some((src, dest)) = queue.pop_front() {
            let children = other.child_handles(Anchor::Node(src));
            let items = children
                .iter()
                .map(|handle| {
                    other
                        .item(handle)
                        .map(|item| (*item).clone())
                        .expect("[consistency] children of a live node must be alive")
                })
                .collect::<Vec<_>>();
            let new = self
                .insert_range(&dest, None, items)
                .expect("[consistency] the node has just been inserted");
            queue.extend(children.into_iter().zip(new));
        }

        Ok(handles)
    }

    /// Creates a tree with the same shape whose payloads are `f(payload)`.
    ///
    /// `Anchor::Root` transforms the whole tree; a node transforms its
    /// subtree, which becomes the only top-level node of the new tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the anchor is a detached node.
    pub fn transform<U, F>(&self, anchor: impl Into<Anchor<NodeRef<T>>>, mut f: F) -> Result<Tree<U>, TreeError>
    where
        F: FnMut(&T) -> U,
    {
        let anchor = anchor.into();
        let place = self.live_place(&anchor)?;
        let out = Tree::new();
        let out_place = match &place {
            Place::Top(_) => Place::Top(Rc::clone(&out.top)),
            Place::Node(node) => {
                let new = NodeCell::new(f(&*node.data.borrow()), &Place::Top(Rc::clone(&out.top)), 0);
                out.top.children.borrow_mut().push(Rc::clone(&new));
                Place::Node(new)
            }
        };
        let mut queue = VecDeque::new();
        queue.push_back((place, out_place));
        while let Some((src, dest)) = queue.pop_front() {
            let src_children = src.children().borrow();
            let mut dest_children = dest.children().borrow_mut();
            for (position, child) in src_children.iter().enumerate() {
                let new = NodeCell::new(f(&*child.data.borrow()), &dest, position);
                dest_children.push(Rc::clone(&new));
                queue.push_back((Place::Node(Rc::clone(child)), Place::Node(new)));
            }
        }

        Ok(out)
    }

    /// Creates a tree with the same shape whose payloads are `f(proj(payload))`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the anchor is a detached node.
    pub fn transform_with<P, U, Proj, F>(
        &self,
        anchor: impl Into<Anchor<NodeRef<T>>>,
        mut proj: Proj,
        mut f: F,
    ) -> Result<Tree<U>, TreeError>
    where
        Proj: FnMut(&T) -> P,
        F: FnMut(P) -> U,
    {
        self.transform(anchor, |payload| f(proj(payload)))
    }

    /// Copies the subtree into a new tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the node is not in this tree.
    pub fn subtree(&self, node: &NodeRef<T>) -> Result<Self, TreeError>
    where
        T: Clone,
    {
        self.transform(node, T::clone)
    }

    /// Applies `f` to the payload of the node and its descendants in pre-order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the anchor is a detached node.
    ///
    /// # Panics
    ///
    /// Panics if a payload is currently borrowed through a handle.
    pub fn map_in_place<F>(&mut self, anchor: impl Into<Anchor<NodeRef<T>>>, mut f: F) -> Result<(), TreeError>
    where
        F: FnMut(&mut T),
    {
        let anchor = anchor.into();
        self.live_place(&anchor)?;
        for node in self.descendants(anchor) {
            f(&mut *node.borrow_data_mut());
        }

        Ok(())
    }

    /// Encodes the tree into its flat form.
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

    /// Returns a printable view of the tree.
    #[inline]
    #[must_use]
    pub fn debug_print(&self) -> DebugPrint<'_, Self> {
        DebugPrint::new(self, Anchor::Root)
    }
}

impl<T, U> PartialEq<Tree<U>> for Tree<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Tree<U>) -> bool {
        ordered::shape_eq(self, other)
    }
}

impl<T: Eq> Eq for Tree<T> {}

impl<T, U, S> PartialEq<arena::Tree<U, S>> for Tree<T>
where
    T: PartialEq<U>,
    S: arena::Slots<U>,
{
    fn eq(&self, other: &arena::Tree<U, S>) -> bool {
        ordered::shape_eq(self, other)
    }
}

impl<T, S, U> PartialEq<Tree<U>> for arena::Tree<T, S>
where
    T: PartialEq<U>,
    S: arena::Slots<T>,
{
    fn eq(&self, other: &Tree<U>) -> bool {
        ordered::shape_eq(self, other)
    }
}

impl<T> OrderedTree for Tree<T> {
    type Item = T;
    type Handle = NodeRef<T>;
    type ItemRef<'a> = Ref<'a, T> where Self: 'a;
    type Descendants<'a> = Descendants<T> where Self: 'a;

    #[inline]
    fn descendants(&self, anchor: Anchor<NodeRef<T>>) -> Self::Descendants<'_> {
        Tree::descendants(self, anchor)
    }

    fn item<'a>(&'a self, handle: &'a NodeRef<T>) -> Option<Ref<'a, T>> {
        self.contains(handle).then(|| handle.borrow_data())
    }

    fn child_handles(&self, anchor: Anchor<NodeRef<T>>) -> Vec<NodeRef<T>> {
        self.children(anchor).unwrap_or_default()
    }

    #[inline]
    fn child_count(&self, anchor: Anchor<NodeRef<T>>) -> Option<usize> {
        Tree::child_count(self, anchor)
    }

    #[inline]
    fn parent_of(&self, handle: &NodeRef<T>) -> Option<Anchor<NodeRef<T>>> {
        self.parent(handle)
    }

    #[inline]
    fn position_of(&self, handle: &NodeRef<T>) -> Option<usize> {
        self.position(handle)
    }

    #[inline]
    fn insert_child(
        &mut self,
        anchor: Anchor<NodeRef<T>>,
        position: Option<usize>,
        item: T,
    ) -> Result<NodeRef<T>, TreeError> {
        self.insert(anchor, item, position)
    }

    #[inline]
    fn remove(&mut self, handle: &NodeRef<T>) -> Result<(), TreeError> {
        self.erase(handle)
    }
}

//! Structural edits.

use core::mem;
use core::ops::Range;

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::arena::{parent_anchor, NodeId, Record, Slots, Tree};
use crate::slide::slide;
use crate::{Anchor, OrderedTree, TreeError};

/// Refreshes the stored positions of `children[range]`.
fn renumber<T, S: Slots<T>>(children: &[NodeId], slots: &mut S, range: Range<usize>) {
    for index in range {
        slots
            .get_mut(children[index])
            .expect("[consistency] children of a live node must be alive")
            .position = index;
    }
}

impl<T, S: Slots<T>> Tree<T, S> {
    /// Runs `f` on the children list of the anchor.
    ///
    /// The list is taken out of the storage while `f` runs, so `f` can
    /// allocate and update other records. Returns `None` if the anchor is a
    /// removed node.
    fn with_children<R, F>(&mut self, anchor: Anchor<NodeId>, f: F) -> Option<R>
    where
        F: FnOnce(&mut Vec<NodeId>, &mut S) -> R,
    {
        let mut children = match anchor {
            Anchor::Root => mem::take(&mut self.roots),
            Anchor::Node(id) => mem::take(&mut self.slots.get_mut(id)?.children),
        };
        let result = f(&mut children, &mut self.slots);
        match anchor {
            Anchor::Root => self.roots = children,
            Anchor::Node(id) => {
                self.slots
                    .get_mut(id)
                    .expect("[consistency] the anchor must stay alive while editing its children")
                    .children = children;
            }
        }

        Some(result)
    }

    /// Resolves the insertion position under the anchor.
    fn destination(&self, anchor: Anchor<NodeId>, position: Option<usize>) -> Result<usize, TreeError> {
        let len = self.child_count(anchor).ok_or(TreeError::StaleNode)?;
        match position {
            None => Ok(len),
            Some(position) if position <= len => Ok(position),
            Some(position) => Err(TreeError::DestinationOutOfRange { position, len }),
        }
    }

    /// Appends a child to a live anchor.
    pub(super) fn append_child(&mut self, anchor: Anchor<NodeId>, item: T) -> NodeId {
        let parent = anchor.node();
        self.with_children(anchor, |children, slots| {
            let id = slots.allocate(Record::new(item, parent, children.len()));
            children.push(id);
            id
        })
        .expect("[precondition] the anchor must be alive")
    }

    /// Inserts a new node as a child of `parent`.
    ///
    /// The node is placed at `position` among the children, shifting the later
    /// siblings; `None` appends it.
    ///
    /// # Errors
    ///
    /// * [`TreeError::StaleNode`] if the parent has been removed.
    /// * [`TreeError::DestinationOutOfRange`] if `position` is greater than the
    ///   number of children.
    pub fn insert(
        &mut self,
        parent: impl Into<Anchor<NodeId>>,
        item: T,
        position: Option<usize>,
    ) -> Result<NodeId, TreeError> {
        let parent = parent.into();
        let at = self.destination(parent, position)?;
        let parent_node = parent.node();
        let id = self
            .with_children(parent, |children, slots| {
                let id = slots.allocate(Record::new(item, parent_node, at));
                children.insert(at, id);
                renumber(children, slots, (at + 1)..children.len());
                id
            })
            .expect("[consistency] the parent has been checked to be alive");
        tracing::trace!(?parent, position = at, node = ?id, "inserted node");

        Ok(id)
    }

    /// Inserts new nodes as consecutive children of `parent`.
    ///
    /// The new nodes keep the order of `items`. Returns their IDs; an empty
    /// `items` inserts nothing.
    ///
    /// # Errors
    ///
    /// * [`TreeError::StaleNode`] if the parent has been removed.
    /// * [`TreeError::DestinationOutOfRange`] if `position` is greater than the
    ///   number of children.
    ///
    /// # Examples
    ///
    /// ```
    /// use sylva::arena::Tree;
    /// use sylva::Anchor;
    ///
    /// let mut tree = Tree::new();
    /// let root = tree.insert(Anchor::Root, 0, None)?;
    /// tree.insert_range(root, None, [1, 4])?;
    /// tree.insert_range(root, Some(1), [2, 3])?;
    ///
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 4]);
    /// # Ok::<_, sylva::TreeError>(())
    /// ```
    pub fn insert_range<I>(
        &mut self,
        parent: impl Into<Anchor<NodeId>>,
        position: Option<usize>,
        items: I,
    ) -> Result<Vec<NodeId>, TreeError>
    where
        I: IntoIterator<Item = T>,
    {
        let parent = parent.into();
        let at = self.destination(parent, position)?;
        let parent_node = parent.node();
        let ids = self
            .with_children(parent, |children, slots| {
                let ids = items
                    .into_iter()
                    .enumerate()
                    .map(|(offset, item)| slots.allocate(Record::new(item, parent_node, at + offset)))
                    .collect::<Vec<_>>();
                if !ids.is_empty() {
                    children.splice(at..at, ids.iter().copied());
                    renumber(children, slots, (at + ids.len())..children.len());
                }
                ids
            })
            .expect("[consistency] the parent has been checked to be alive");
        tracing::trace!(?parent, position = at, count = ids.len(), "inserted nodes");

        Ok(ids)
    }

    /// Removes the node and all of its descendants.
    ///
    /// IDs of the removed nodes become stale. Erasing `Anchor::Root` does
    /// nothing; use [`clear`][`Self::clear`] to remove everything.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the node has already been removed.
    pub fn erase(&mut self, anchor: impl Into<Anchor<NodeId>>) -> Result<(), TreeError> {
        let id = match anchor.into() {
            Anchor::Root => return Ok(()),
            Anchor::Node(id) => id,
        };
        let record = self.slots.get(id).ok_or(TreeError::StaleNode)?;
        let parent = parent_anchor(record.parent);
        let position = record.position;
        self.with_children(parent, |children, slots| {
            let removed = children.remove(position);
            debug_assert_eq!(removed, id, "[consistency] stored position must be correct");
            renumber(children, slots, position..children.len());
        })
        .expect("[consistency] the parent of a live node must be alive");
        self.release_subtree(id);
        tracing::trace!(node = ?id, ?parent, position, "erased subtree");

        Ok(())
    }

    /// Releases the slots of the node and its descendants.
    ///
    /// The node must already be detached from its parent.
    fn release_subtree(&mut self, id: NodeId) {
        let mut stack = alloc::vec![id];
        while let Some(id) = stack.pop() {
            if let Some(record) = self.slots.get_mut(id) {
                stack.append(&mut record.children);
            }
            self.slots.release(id);
        }
    }

    /// Removes every node.
    ///
    /// The slots are released like [`erase`][`Self::erase`] does, so IDs of
    /// the removed nodes stay stale. Use [`compacted`][`Self::compacted`] to
    /// drop the tombstones of an append-only tree.
    pub fn clear(&mut self) {
        for id in mem::take(&mut self.roots) {
            self.release_subtree(id);
        }
        tracing::trace!("cleared tree");
    }

    /// Moves `count` consecutive children of `source_parent`, starting at
    /// `source_position`, to `dest_position` among the children of
    /// `dest_parent`.
    ///
    /// The moved nodes keep their descendants and their relative order.
    ///
    /// When both parents are the same, `dest_position` is a gap index into the
    /// children before the move (`0..=len`), so moving `[a]` of `[a, b, c]` to
    /// `2` results in `[b, a, c]`. A destination inside the moved run leaves
    /// the tree unchanged. When the parents differ, `dest_position` is an
    /// index into the current children of `dest_parent`.
    ///
    /// # Errors
    ///
    /// * [`TreeError::StaleNode`] if either parent has been removed.
    /// * [`TreeError::SourceOutOfRange`] if the run passes the end of the
    ///   source children.
    /// * [`TreeError::DestinationOutOfRange`] if `dest_position` is greater
    ///   than the number of destination children.
    /// * [`TreeError::AncestorDescendantLoop`] if `dest_parent` is one of the
    ///   moved nodes or their descendants.
    ///
    /// The tree is not modified on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use sylva::arena::Tree;
    /// use sylva::Anchor;
    ///
    /// let mut tree = Tree::new();
    /// let ids = tree.insert_range(Anchor::Root, None, [1, 2, 3, 4])?;
    ///
    /// // Reparent `1` under `2`, then `3` under `4`.
    /// tree.move_nodes(Anchor::Root, 0, 1, ids[1], 0)?;
    /// tree.move_nodes(Anchor::Root, 1, 1, ids[3], 0)?;
    ///
    /// assert_eq!(tree.child_ids(Anchor::Root), Some(&[ids[1], ids[3]][..]));
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [2, 1, 4, 3]);
    /// # Ok::<_, sylva::TreeError>(())
    /// ```
    pub fn move_nodes(
        &mut self,
        source_parent: impl Into<Anchor<NodeId>>,
        source_position: usize,
        count: usize,
        dest_parent: impl Into<Anchor<NodeId>>,
        dest_position: usize,
    ) -> Result<(), TreeError> {
        let source = source_parent.into();
        let dest = dest_parent.into();

        let source_len = self.child_count(source).ok_or(TreeError::StaleNode)?;
        let source_end = source_position
            .checked_add(count)
            .filter(|&end| end <= source_len)
            .ok_or(TreeError::SourceOutOfRange {
                start: source_position,
                count,
                len: source_len,
            })?;
        let dest_len = self.child_count(dest).ok_or(TreeError::StaleNode)?;
        if dest_position > dest_len {
            return Err(TreeError::DestinationOutOfRange {
                position: dest_position,
                len: dest_len,
            });
        }
        let run = source_position..source_end;

        if source == dest {
            if !run.is_empty() {
                self.with_children(source, |children, slots| {
                    let window = slide(children, run.clone(), dest_position);
                    renumber(children, slots, window);
                })
                .expect("[consistency] the parent has been checked to be alive");
            }
            tracing::trace!(parent = ?source, ?run, dest_position, "moved nodes among siblings");
            return Ok(());
        }

        if let Anchor::Node(dest_node) = dest {
            if self.is_in_run_or_below(source, &run, dest_node) {
                return Err(TreeError::AncestorDescendantLoop);
            }
        }
        if run.is_empty() {
            return Ok(());
        }

        let moved = self
            .with_children(source, |children, slots| {
                let moved = children.drain(run.clone()).collect::<Vec<_>>();
                renumber(children, slots, run.start..children.len());
                moved
            })
            .expect("[consistency] the source parent has been checked to be alive");
        let new_parent = dest.node();
        self.with_children(dest, |children, slots| {
            for &id in &moved {
                slots
                    .get_mut(id)
                    .expect("[consistency] moved nodes must be alive")
                    .parent = new_parent;
            }
            children.splice(dest_position..dest_position, moved.iter().copied());
            renumber(children, slots, dest_position..children.len());
        })
        .expect("[consistency] the destination parent has been checked to be alive");
        tracing::trace!(?source, ?run, ?dest, dest_position, "moved nodes to another parent");

        Ok(())
    }

    /// Returns true if `node` or one of its ancestors is in `children(source)[run]`.
    fn is_in_run_or_below(&self, source: Anchor<NodeId>, run: &Range<usize>, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            let record = self
                .slots
                .get(id)
                .expect("[consistency] ancestors of a live node must be alive");
            if parent_anchor(record.parent) == source && run.contains(&record.position) {
                return true;
            }
            current = record.parent;
        }
        false
    }

    /// Removes the node and its descendants, and returns them as a new tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if the node has already been removed.
    pub fn take_subtree(&mut self, id: NodeId) -> Result<Self, TreeError>
    where
        T: Clone,
    {
        let subtree = self.subtree(id)?;
        self.erase(id)?;

        Ok(subtree)
    }

    /// Inserts a copy of every tree of `other` under `parent`.
    ///
    /// The top-level nodes of `other` become consecutive children of `parent`
    /// starting at `position` (`None` appends). Returns their new IDs.
    ///
    /// `other` can be any [`OrderedTree`], e.g. an arena with another slot
    /// storage or an [`owned::Tree`][`crate::owned::Tree`].
    ///
    /// # Errors
    ///
    /// * [`TreeError::StaleNode`] if the parent has been removed.
    /// * [`TreeError::DestinationOutOfRange`] if `position` is greater than the
    ///   number of children.
    pub fn insert_subtree<Tr>(
        &mut self,
        parent: impl Into<Anchor<NodeId>>,
        other: &Tr,
        position: Option<usize>,
    ) -> Result<Vec<NodeId>, TreeError>
    where
        Tr: OrderedTree<Item = T>,
        T: Clone,
    {
        let parent = parent.into();
        self.destination(parent, position)?;

        let tops = other.child_handles(Anchor::Root);
        let items = tops.iter().map(|handle| {
            other
                .item(handle)
                .map(|item| (*item).clone())
                .expect("[consistency] children of the super-root must be alive")
        });
        let ids = self.insert_range(parent, position, items.collect::<Vec<_>>())?;

        let mut queue = tops.into_iter().zip(ids.iter().copied()).collect::<VecDeque<_>>();
        while let Some((src, dest)) = queue.pop_front() {
            for child in other.child_handles(Anchor::Node(src)) {
                let item = other
                    .item(&child)
                    .map(|item| (*item).clone())
                    .expect("[consistency] children of a live node must be alive");
                let new = self.append_child(Anchor::Node(dest), item);
                queue.push_back((child, new));
            }
        }

        Ok(ids)
    }
}

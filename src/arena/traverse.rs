//! Tree traversal.
//!
//! All pre-order iterators are driven by a [`Traverser`], whose state has a
//! constant size: the node it stands on and the child it came back from. No
//! stack is allocated.

use core::iter;
use core::slice;

use crate::arena::{Node, NodeId, Slots, Tree};
use crate::Anchor;

/// Traversal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// The top node of a subtree walk, not yet visited.
    Start(NodeId),
    /// Standing on `at`, having come back from the child `from`.
    ///
    /// `from` is `None` right after `at` has been entered from above.
    At {
        /// Current place.
        at: Anchor<NodeId>,
        /// Child the walk came back from.
        from: Option<NodeId>,
    },
    /// Finished.
    Done,
}

/// Pre-order traverser which does not hold a reference to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Traverser {
    /// Current state.
    state: State,
    /// Top node of a subtree walk, `None` for the whole tree.
    top: Option<NodeId>,
}

impl Traverser {
    /// Creates a traverser for the anchor and its descendants.
    #[must_use]
    pub(crate) fn new(anchor: Anchor<NodeId>) -> Self {
        match anchor {
            Anchor::Root => Self {
                state: State::At {
                    at: Anchor::Root,
                    from: None,
                },
                top: None,
            },
            Anchor::Node(id) => Self {
                state: State::Start(id),
                top: Some(id),
            },
        }
    }

    /// Advances to the next node in pre-order.
    pub(crate) fn next<T, S: Slots<T>>(&mut self, tree: &Tree<T, S>) -> Option<NodeId> {
        loop {
            match self.state {
                State::Done => return None,
                State::Start(id) => {
                    if !tree.is_alive(id) {
                        self.state = State::Done;
                        return None;
                    }
                    self.state = State::At {
                        at: Anchor::Node(id),
                        from: None,
                    };
                    return Some(id);
                }
                State::At { at, from } => {
                    let next_index = match from {
                        None => 0,
                        Some(child) => {
                            tree.position(child)
                                .expect("[consistency] the visited child must be alive")
                                + 1
                        }
                    };
                    let children = tree
                        .child_ids(at)
                        .expect("[consistency] the current node must be alive");
                    if let Some(&child) = children.get(next_index) {
                        self.state = State::At {
                            at: Anchor::Node(child),
                            from: None,
                        };
                        return Some(child);
                    }
                    // Going up. Arriving at the parent from a child is a
                    // back-edge, so keep stepping without yielding.
                    self.state = match at {
                        Anchor::Root => State::Done,
                        Anchor::Node(id) if Some(id) == self.top => State::Done,
                        Anchor::Node(id) => State::At {
                            at: tree
                                .parent(id)
                                .expect("[consistency] the current node must be alive"),
                            from: Some(id),
                        },
                    };
                }
            }
        }
    }
}

/// Pre-order iterator of node IDs.
#[derive(Debug)]
pub struct Descendants<'a, T, S> {
    /// Tree.
    tree: &'a Tree<T, S>,
    /// Traverser.
    traverser: Traverser,
}

impl<'a, T, S: Slots<T>> Descendants<'a, T, S> {
    /// Creates a new iterator.
    #[inline]
    #[must_use]
    pub(super) fn new(tree: &'a Tree<T, S>, anchor: Anchor<NodeId>) -> Self {
        Self {
            tree,
            traverser: Traverser::new(anchor),
        }
    }
}

impl<T, S> Clone for Descendants<'_, T, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            traverser: self.traverser,
        }
    }
}

impl<T, S: Slots<T>> Iterator for Descendants<'_, T, S> {
    type Item = NodeId;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.traverser.next(self.tree)
    }
}

impl<T, S: Slots<T>> iter::FusedIterator for Descendants<'_, T, S> {}

/// Pre-order iterator of payloads.
#[derive(Debug)]
pub struct Iter<'a, T, S> {
    /// Node IDs.
    inner: Descendants<'a, T, S>,
}

impl<'a, T, S: Slots<T>> Iter<'a, T, S> {
    /// Creates a new iterator.
    #[inline]
    #[must_use]
    pub(super) fn new(inner: Descendants<'a, T, S>) -> Self {
        Self { inner }
    }
}

impl<T, S> Clone for Iter<'_, T, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T, S: Slots<T>> Iterator for Iter<'a, T, S> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.inner.next()?;
        Some(
            self.inner
                .tree
                .data(id)
                .expect("[consistency] the node must be the part of the tree"),
        )
    }
}

impl<T, S: Slots<T>> iter::FusedIterator for Iter<'_, T, S> {}

/// Pre-order iterator of nodes.
#[derive(Debug)]
pub struct Nodes<'a, T, S> {
    /// Node IDs.
    inner: Descendants<'a, T, S>,
}

impl<'a, T, S: Slots<T>> Nodes<'a, T, S> {
    /// Creates a new iterator.
    #[inline]
    #[must_use]
    pub(super) fn new(inner: Descendants<'a, T, S>) -> Self {
        Self { inner }
    }
}

impl<T, S> Clone for Nodes<'_, T, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T, S: Slots<T>> Iterator for Nodes<'a, T, S> {
    type Item = Node<'a, T, S>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.inner.next()?;
        Some(
            self.inner
                .tree
                .node(id)
                .expect("[consistency] the node must be the part of the tree"),
        )
    }
}

impl<T, S: Slots<T>> iter::FusedIterator for Nodes<'_, T, S> {}

/// Double-ended iterator of children.
#[derive(Debug)]
pub struct Children<'a, T, S> {
    /// Tree.
    tree: &'a Tree<T, S>,
    /// Child IDs.
    ids: slice::Iter<'a, NodeId>,
}

impl<'a, T, S: Slots<T>> Children<'a, T, S> {
    /// Creates a new iterator.
    #[inline]
    #[must_use]
    pub(super) fn new(tree: &'a Tree<T, S>, ids: &'a [NodeId]) -> Self {
        Self {
            tree,
            ids: ids.iter(),
        }
    }

    /// Returns a node for the ID.
    fn node(&self, id: NodeId) -> Node<'a, T, S> {
        self.tree
            .node(id)
            .expect("[consistency] children of a live node must be alive")
    }
}

impl<T, S> Clone for Children<'_, T, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            ids: self.ids.clone(),
        }
    }
}

impl<'a, T, S: Slots<T>> Iterator for Children<'a, T, S> {
    type Item = Node<'a, T, S>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next()?;
        Some(self.node(id))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<T, S: Slots<T>> DoubleEndedIterator for Children<'_, T, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next_back()?;
        Some(self.node(id))
    }
}

impl<T, S: Slots<T>> ExactSizeIterator for Children<'_, T, S> {}

impl<T, S: Slots<T>> iter::FusedIterator for Children<'_, T, S> {}

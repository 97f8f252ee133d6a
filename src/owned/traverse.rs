//! Tree traversal.

use core::iter;

use alloc::rc::Rc;

use crate::owned::node::{Link, NodeRef, Place};

/// Traversal state.
enum State<T> {
    /// The top node of a subtree walk, not yet visited.
    Start(Link<T>),
    /// Standing on `at`, having come back from the child `from`.
    At {
        /// Current place.
        at: Place<T>,
        /// Child the walk came back from, `None` right after entering `at`.
        from: Option<Link<T>>,
    },
    /// Finished.
    Done,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Start(node) => Self::Start(Rc::clone(node)),
            Self::At { at, from } => Self::At {
                at: at.clone(),
                from: from.clone(),
            },
            Self::Done => Self::Done,
        }
    }
}

/// Pre-order iterator of node handles.
///
/// The iterator holds the node it stands on and the child it came back from,
/// and nothing else. It does not borrow the tree: if the tree is edited
/// during the iteration, the iterator keeps walking from where it stands, and
/// stops once it leaves the nodes that are still attached.
pub struct Descendants<T> {
    /// Current state.
    state: State<T>,
    /// Top node of a subtree walk, `None` for the whole tree.
    top: Option<Link<T>>,
}

impl<T> Clone for Descendants<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            top: self.top.clone(),
        }
    }
}

impl<T> Descendants<T> {
    /// Creates an iterator over the whole forest.
    #[must_use]
    pub(super) fn whole(place: Place<T>) -> Self {
        Self {
            state: State::At {
                at: place,
                from: None,
            },
            top: None,
        }
    }

    /// Creates an iterator over the node and its descendants.
    #[must_use]
    pub(super) fn subtree(node: Link<T>) -> Self {
        Self {
            top: Some(Rc::clone(&node)),
            state: State::Start(node),
        }
    }

    /// Creates an iterator which yields nothing.
    #[must_use]
    pub(super) fn empty() -> Self {
        Self {
            state: State::Done,
            top: None,
        }
    }

    /// Returns true if `node` is the top of a subtree walk.
    fn is_top(&self, node: &Link<T>) -> bool {
        self.top.as_ref().map_or(false, |top| Rc::ptr_eq(top, node))
    }
}

impl<T> Iterator for Descendants<T> {
    type Item = NodeRef<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match core::mem::replace(&mut self.state, State::Done) {
                State::Done => return None,
                State::Start(node) => {
                    if !node.is_attached() {
                        return None;
                    }
                    self.state = State::At {
                        at: Place::Node(Rc::clone(&node)),
                        from: None,
                    };
                    return Some(NodeRef(node));
                }
                State::At { at, from } => {
                    let next_index = from.map_or(0, |child| child.position.get() + 1);
                    let next = at.children().borrow().get(next_index).cloned();
                    if let Some(child) = next {
                        self.state = State::At {
                            at: Place::Node(Rc::clone(&child)),
                            from: None,
                        };
                        return Some(NodeRef(child));
                    }
                    // Going up. Arriving at the parent from a child is a
                    // back-edge, so keep stepping without yielding.
                    if let Place::Node(node) = at {
                        if !self.is_top(&node) {
                            if let Some(above) = node.place_above() {
                                self.state = State::At {
                                    at: above,
                                    from: Some(node),
                                };
                            }
                        }
                    }
                }
            }
        }
    }
}

impl<T> iter::FusedIterator for Descendants<T> {}

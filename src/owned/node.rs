//! Reference-counted nodes.

use core::cell::{BorrowError, BorrowMutError, Cell, Ref, RefCell, RefMut};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ptr;

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;

use crate::Anchor;

/// Strong link to a node.
pub(super) type Link<T> = Rc<NodeCell<T>>;

/// Children of the super-root.
pub(super) struct TopLevel<T> {
    /// Top-level nodes.
    pub(super) children: RefCell<Vec<Link<T>>>,
}

impl<T> TopLevel<T> {
    /// Creates an empty top level.
    #[must_use]
    pub(super) fn new() -> Rc<Self> {
        Rc::new(Self {
            children: RefCell::new(Vec::new()),
        })
    }
}

/// Back-link to the parent.
pub(super) enum Up<T> {
    /// The node is not in any tree.
    Detached,
    /// The node is a top-level node.
    Top(Weak<TopLevel<T>>),
    /// The node is a child of another node.
    Node(Weak<NodeCell<T>>),
}

/// Node storage.
pub(super) struct NodeCell<T> {
    /// Payload.
    pub(super) data: RefCell<T>,
    /// Parent.
    pub(super) parent: RefCell<Up<T>>,
    /// Super-root of the tree the node was last placed in.
    ///
    /// Only meaningful while the node is attached.
    pub(super) owner: RefCell<Weak<TopLevel<T>>>,
    /// Index in the children of the parent.
    pub(super) position: Cell<usize>,
    /// Children in order.
    pub(super) children: RefCell<Vec<Link<T>>>,
}

impl<T> NodeCell<T> {
    /// Creates a new leaf to be stored at `position` under `above`.
    #[must_use]
    pub(super) fn new(data: T, above: &Place<T>, position: usize) -> Link<T> {
        Rc::new(Self {
            data: RefCell::new(data),
            parent: RefCell::new(above.downgrade()),
            owner: RefCell::new(above.owner()),
            position: Cell::new(position),
            children: RefCell::new(Vec::new()),
        })
    }

    /// Returns the place holding this node, or `None` if it is detached.
    #[must_use]
    pub(super) fn place_above(&self) -> Option<Place<T>> {
        match &*self.parent.borrow() {
            Up::Detached => None,
            Up::Top(top) => top.upgrade().map(Place::Top),
            Up::Node(node) => node.upgrade().map(Place::Node),
        }
    }

    /// Returns true if the node is in a tree.
    #[inline]
    #[must_use]
    pub(super) fn is_attached(&self) -> bool {
        self.place_above().is_some()
    }

    /// Returns true if the node is attached to the tree rooted at `top`.
    #[must_use]
    pub(super) fn is_owned_by(&self, top: &Rc<TopLevel<T>>) -> bool {
        self.is_attached() && ptr::eq(self.owner.borrow().as_ptr(), Rc::as_ptr(top))
    }
}

/// A place that can hold children: the super-root or a node.
pub(super) enum Place<T> {
    /// The super-root of a tree.
    Top(Rc<TopLevel<T>>),
    /// A node.
    Node(Link<T>),
}

impl<T> Clone for Place<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Top(top) => Self::Top(Rc::clone(top)),
            Self::Node(node) => Self::Node(Rc::clone(node)),
        }
    }
}

impl<T> Place<T> {
    /// Returns the children.
    #[inline]
    #[must_use]
    pub(super) fn children(&self) -> &RefCell<Vec<Link<T>>> {
        match self {
            Self::Top(top) => &top.children,
            Self::Node(node) => &node.children,
        }
    }

    /// Returns the back-link children of this place should hold.
    #[must_use]
    pub(super) fn downgrade(&self) -> Up<T> {
        match self {
            Self::Top(top) => Up::Top(Rc::downgrade(top)),
            Self::Node(node) => Up::Node(Rc::downgrade(node)),
        }
    }

    /// Returns the super-root of the tree this place belongs to.
    #[must_use]
    pub(super) fn owner(&self) -> Weak<TopLevel<T>> {
        match self {
            Self::Top(top) => Rc::downgrade(top),
            Self::Node(node) => node.owner.borrow().clone(),
        }
    }

    /// Returns true if both places are the same allocation.
    #[must_use]
    pub(super) fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Top(lhs), Self::Top(rhs)) => Rc::ptr_eq(lhs, rhs),
            (Self::Node(lhs), Self::Node(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }

    /// Converts the place into a public anchor.
    #[must_use]
    pub(super) fn into_anchor(self) -> Anchor<NodeRef<T>> {
        match self {
            Self::Top(_) => Anchor::Root,
            Self::Node(node) => Anchor::Node(NodeRef(node)),
        }
    }
}

/// Refreshes the stored positions of `children[from..]`.
pub(super) fn renumber<T>(children: &[Link<T>], from: usize) {
    for (index, child) in children.iter().enumerate().skip(from) {
        child.position.set(index);
    }
}

/// Records `top` as the owner of every node of the subtrees.
pub(super) fn adopt<T>(roots: &[Link<T>], top: &Rc<TopLevel<T>>) {
    let mut stack = roots.to_vec();
    while let Some(node) = stack.pop() {
        *node.owner.borrow_mut() = Rc::downgrade(top);
        stack.extend(node.children.borrow().iter().cloned());
    }
}

/// Detaches every node of the subtree from its neighbors.
///
/// Nodes are freed one at a time with their children already taken away,
/// so dropping a deep subtree does not recurse.
pub(super) fn teardown<T>(mut stack: Vec<Link<T>>) {
    while let Some(node) = stack.pop() {
        *node.parent.borrow_mut() = Up::Detached;
        stack.append(&mut node.children.borrow_mut());
    }
}

/// Shared handle to a node of an [`owned::Tree`][`super::Tree`].
///
/// Handles compare equal when they point to the same node. A handle stays
/// usable after its node is erased: the data can still be borrowed, but tree
/// operations report [`TreeError::StaleNode`][`crate::TreeError::StaleNode`].
pub struct NodeRef<T>(pub(super) Link<T>);

impl<T> Clone for NodeRef<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for NodeRef<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for NodeRef<T> {}

impl<T> Hash for NodeRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_borrow_data() {
            Ok(data) => f.debug_tuple("NodeRef").field(&*data).finish(),
            Err(_) => f.write_str("NodeRef(<borrowed>)"),
        }
    }
}

impl<T> From<&NodeRef<T>> for Anchor<NodeRef<T>> {
    #[inline]
    fn from(node: &NodeRef<T>) -> Self {
        Self::Node(node.clone())
    }
}

impl<T> NodeRef<T> {
    /// Returns a reference to the data associated to the node.
    ///
    /// # Failures
    ///
    /// Fails if the data is currently mutably (i.e. exclusively) borrowed.
    #[inline]
    pub fn try_borrow_data(&self) -> Result<Ref<'_, T>, BorrowError> {
        self.0.data.try_borrow()
    }

    /// Returns a reference to the data associated to the node.
    ///
    /// # Panics
    ///
    /// Panics if the data is already mutably borrowed.
    #[inline]
    #[must_use]
    pub fn borrow_data(&self) -> Ref<'_, T> {
        self.0.data.borrow()
    }

    /// Returns a mutable reference to the data associated to the node.
    ///
    /// # Failures
    ///
    /// Fails if the data is currently borrowed.
    #[inline]
    pub fn try_borrow_data_mut(&self) -> Result<RefMut<'_, T>, BorrowMutError> {
        self.0.data.try_borrow_mut()
    }

    /// Returns a mutable reference to the data associated to the node.
    ///
    /// # Panics
    ///
    /// Panics if the data is already borrowed.
    #[inline]
    #[must_use]
    pub fn borrow_data_mut(&self) -> RefMut<'_, T> {
        self.0.data.borrow_mut()
    }

    /// Returns `true` if the two handles point to the same node.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns true if the node is still part of a tree.
    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.0.is_attached()
    }

    /// Returns the parent node, or `None` for a top-level or detached node.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.0.place_above()? {
            Place::Top(_) => None,
            Place::Node(node) => Some(Self(node)),
        }
    }

    /// Returns the index of the node among its siblings.
    ///
    /// The value is meaningless for a detached node.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.0.position.get()
    }

    /// Returns the number of children.
    #[inline]
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    /// Returns the children in order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.0.children.borrow().iter().cloned().map(Self).collect()
    }
}

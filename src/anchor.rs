//! Anchors.

/// Place in a tree that can have children: the super-root or a node.
///
/// Every tree holds its top-level nodes as the children of an implicit
/// super-root. The super-root has no data and is never visited by iteration;
/// `Anchor::Root` is the only way to address it.
///
/// Node handles convert into anchors, so methods taking
/// `impl Into<Anchor<_>>` accept both a handle and `Anchor::Root`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor<Id> {
    /// The super-root, i.e. the top level of the forest.
    Root,
    /// A node.
    Node(Id),
}

impl<Id> Anchor<Id> {
    /// Returns the node, or `None` for the super-root.
    #[inline]
    #[must_use]
    pub fn node(self) -> Option<Id> {
        match self {
            Self::Root => None,
            Self::Node(id) => Some(id),
        }
    }

    /// Returns true if the anchor is the super-root.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// Converts from `&Anchor<Id>` to `Anchor<&Id>`.
    #[inline]
    #[must_use]
    pub fn as_ref(&self) -> Anchor<&Id> {
        match self {
            Self::Root => Anchor::Root,
            Self::Node(id) => Anchor::Node(id),
        }
    }

    /// Converts the node inside the anchor.
    #[inline]
    pub fn map<U, F>(self, f: F) -> Anchor<U>
    where
        F: FnOnce(Id) -> U,
    {
        match self {
            Self::Root => Anchor::Root,
            Self::Node(id) => Anchor::Node(f(id)),
        }
    }
}

impl<Id: Clone> Anchor<&Id> {
    /// Maps an `Anchor<&Id>` to an `Anchor<Id>` by cloning the node handle.
    #[inline]
    #[must_use]
    pub fn cloned(self) -> Anchor<Id> {
        self.map(Clone::clone)
    }
}

impl<Id> From<Id> for Anchor<Id> {
    #[inline]
    fn from(id: Id) -> Self {
        Self::Node(id)
    }
}

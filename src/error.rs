//! Errors.

use thiserror::Error;

/// Structural edit error.
///
/// Operations returning this error validate their arguments before touching
/// the tree, so the tree is left unmodified on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum TreeError {
    /// Insertion or move destination is past the end of the children.
    #[error("destination position {position} is out of range for {len} children")]
    DestinationOutOfRange {
        /// Requested position.
        position: usize,
        /// Number of children of the destination parent.
        len: usize,
    },
    /// Move source range is past the end of the children.
    #[error("source range {start}+{count} is out of range for {len} children")]
    SourceOutOfRange {
        /// First position of the range.
        start: usize,
        /// Number of nodes in the range.
        count: usize,
        /// Number of children of the source parent.
        len: usize,
    },
    /// Attempt to make a node the ancestor of itself.
    #[error("attempt to make a node the ancestor of itself")]
    AncestorDescendantLoop,
    /// The node has already been removed from the tree.
    #[error("the node has already been removed from the tree")]
    StaleNode,
}

/// Error decoding a flattened tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DecodeError {
    /// The two leading absent slots are missing.
    #[error("flattened tree must start with two absent slots")]
    MissingHeader,
    /// The input ended in the middle of a sibling group.
    #[error("flattened tree ends without closing the last sibling group")]
    UnterminatedGroup,
    /// A value was found after every node received its children.
    #[error("unexpected value at slot {index} after all sibling groups were read")]
    TrailingSlots {
        /// Index of the offending slot.
        index: usize,
    },
}

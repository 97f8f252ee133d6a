//! Ordered trees and forests.
//!
//! Every tree in this crate is a forest under an implicit super-root: the
//! top-level nodes are the children of [`Anchor::Root`], which is never
//! visited and has no data. Children are kept in order, and every node knows
//! its position among its siblings.
//!
//! Three storages share the same contract ([`OrderedTree`]):
//!
//! * [`arena::Tree`]: nodes in an index-addressed arena whose freed slots are
//!   recycled.
//! * [`arena::AppendTree`]: nodes in an append-only arena, rebuilt by
//!   [`compacted`][`arena::Tree::compacted`].
//! * [`owned::Tree`]: reference-counted nodes that own their children, with
//!   cheap detachment of subtrees.
//!
//! # Examples
//!
//! ```
//! use sylva::arena::Tree;
//! use sylva::Anchor;
//!
//! let mut tree = Tree::new();
//! let one = tree.insert(Anchor::Root, 1, None)?;
//! tree.insert(one, 2, None)?;
//! tree.insert(Anchor::Root, 3, None)?;
//!
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
//! assert_eq!(tree.flatten(), [None, None, Some(1), Some(3), None, Some(2), None, None, None]);
//! # Ok::<_, sylva::TreeError>(())
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::must_use_candidate)]
#![warn(missing_docs)]

extern crate alloc;

mod anchor;
pub mod algorithm;
pub mod arena;
pub mod builder;
pub mod debug_print;
pub mod error;
mod flat;
pub mod owned;
mod ordered;
#[cfg(feature = "serde")]
mod serde_impl;
mod slide;

pub use self::anchor::Anchor;
pub use self::builder::TreeBuilder;
pub use self::error::{DecodeError, TreeError};
pub use self::ordered::OrderedTree;

//! Flat encoding.
//!
//! A forest is encoded as a sequence of optional payloads:
//!
//! ```text
//! [None, None, <children of the super-root>, None, <children of the next node>, None, ...]
//! ```
//!
//! Nodes are served breadth-first, starting from the super-root. Each node
//! contributes the payloads of its children followed by one `None`.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::{Anchor, DecodeError, OrderedTree};

/// Number of absent slots at the beginning of the encoding.
const HEADER_LEN: usize = 2;

/// Encodes the whole forest.
pub(crate) fn encode<Tr>(tree: &Tr) -> Vec<Option<Tr::Item>>
where
    Tr: OrderedTree,
    Tr::Item: Clone,
{
    let mut out = Vec::new();
    let emitted: Result<(), core::convert::Infallible> = encode_with(tree, |slot| {
        out.push(slot.cloned());
        Ok(())
    });
    match emitted {
        Ok(()) => out,
        Err(never) => match never {},
    }
}

/// Feeds the encoding of the whole forest to `emit`, slot by slot.
///
/// Stops at the first error returned by `emit`.
pub(crate) fn encode_with<Tr, E, F>(tree: &Tr, mut emit: F) -> Result<(), E>
where
    Tr: OrderedTree,
    F: FnMut(Option<&Tr::Item>) -> Result<(), E>,
{
    for _ in 0..HEADER_LEN {
        emit(None)?;
    }

    let mut queue = VecDeque::new();
    queue.push_back(Anchor::Root);
    while let Some(anchor) = queue.pop_front() {
        for child in tree.child_handles(anchor) {
            {
                let item = tree
                    .item(&child)
                    .expect("[consistency] children of a live node must be alive");
                emit(Some(&*item))?;
            }
            queue.push_back(Anchor::Node(child));
        }
        emit(None)?;
    }

    Ok(())
}

/// Decodes a forest.
///
/// Input that stops right after a closed sibling group is accepted: the
/// parents still waiting for their group become leaves.
pub(crate) fn decode<Tr, I>(slots: I) -> Result<Tr, DecodeError>
where
    Tr: OrderedTree + Default,
    I: IntoIterator<Item = Option<Tr::Item>>,
{
    let mut slots = slots.into_iter();
    for _ in 0..HEADER_LEN {
        match slots.next() {
            Some(None) => {}
            _ => {
                tracing::debug!("rejected flattened tree without header");
                return Err(DecodeError::MissingHeader);
            }
        }
    }

    let mut tree = Tr::default();
    let mut parents = VecDeque::new();
    parents.push_back(Anchor::Root);
    let mut group_open = false;
    for (index, slot) in slots.enumerate() {
        let index = index + HEADER_LEN;
        let Some(parent) = parents.front().cloned() else {
            if slot.is_some() {
                tracing::debug!(index, "rejected flattened tree with trailing values");
                return Err(DecodeError::TrailingSlots { index });
            }
            continue;
        };
        match slot {
            Some(item) => {
                group_open = true;
                let child = tree
                    .insert_child(parent, None, item)
                    .expect("[consistency] queued parents must be alive");
                parents.push_back(Anchor::Node(child));
            }
            None => {
                group_open = false;
                parents.pop_front();
            }
        }
    }
    if group_open {
        tracing::debug!("rejected flattened tree with an unterminated sibling group");
        return Err(DecodeError::UnterminatedGroup);
    }

    Ok(tree)
}

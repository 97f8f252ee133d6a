//! Generic algorithms over any [`OrderedTree`].
//!
//! Searches walk the anchor and its descendants in pre-order; the anchor
//! itself is the first candidate. Functions building a new tree return any
//! `OrderedTree + Default`, so the result may use another storage than the
//! source.

use alloc::collections::VecDeque;

use crate::{Anchor, OrderedTree};

pub use crate::ordered::shape_eq;

/// Calls `f` on every payload under the anchor, in pre-order.
///
/// # Examples
///
/// ```
/// use sylva::arena::Tree;
/// use sylva::{algorithm, Anchor};
///
/// let tree: Tree<_> = Tree::from_flattened([None, None, Some(1), Some(2), None, Some(3), None])?;
/// let mut sum = 0;
/// algorithm::for_each(&tree, Anchor::Root, |v| sum += v);
/// assert_eq!(sum, 6);
/// # Ok::<_, sylva::DecodeError>(())
/// ```
pub fn for_each<Tr, F>(tree: &Tr, anchor: impl Into<Anchor<Tr::Handle>>, mut f: F)
where
    Tr: OrderedTree,
    F: FnMut(&Tr::Item),
{
    for handle in tree.descendants(anchor.into()) {
        if let Some(item) = tree.item(&handle) {
            f(&*item);
        }
    }
}

/// Returns the first node in pre-order whose payload satisfies `pred`.
pub fn find_if<Tr, F>(tree: &Tr, anchor: impl Into<Anchor<Tr::Handle>>, mut pred: F) -> Option<Tr::Handle>
where
    Tr: OrderedTree,
    F: FnMut(&Tr::Item) -> bool,
{
    tree.descendants(anchor.into())
        .find(|handle| tree.item(handle).map_or(false, |item| pred(&*item)))
}

/// Returns the first node in pre-order whose payload equals `value`.
pub fn find<Tr>(tree: &Tr, anchor: impl Into<Anchor<Tr::Handle>>, value: &Tr::Item) -> Option<Tr::Handle>
where
    Tr: OrderedTree,
    Tr::Item: PartialEq,
{
    find_if(tree, anchor, |item| item == value)
}

/// Returns the first node in pre-order whose projected payload equals `key`.
///
/// # Examples
///
/// ```
/// use sylva::arena::Tree;
/// use sylva::{algorithm, Anchor};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(Anchor::Root, ("root", 0), None)?;
/// tree.insert_range(root, None, [("a", 1), ("b", 2)])?;
///
/// let b = algorithm::find_by(&tree, Anchor::Root, &2, |(_, weight)| *weight);
/// assert_eq!(b.and_then(|id| tree.data(id)), Some(&("b", 2)));
/// # Ok::<_, sylva::TreeError>(())
/// ```
pub fn find_by<Tr, K, P>(
    tree: &Tr,
    anchor: impl Into<Anchor<Tr::Handle>>,
    key: &K,
    mut proj: P,
) -> Option<Tr::Handle>
where
    Tr: OrderedTree,
    K: PartialEq,
    P: FnMut(&Tr::Item) -> K,
{
    find_if(tree, anchor, |item| proj(item) == *key)
}

/// Returns a copy of the forest keeping only the nodes that satisfy `pred`.
///
/// A node failing the predicate is pruned together with its whole subtree,
/// even if some of its descendants would pass.
///
/// # Examples
///
/// ```
/// use sylva::arena::Tree;
/// use sylva::algorithm;
///
/// // 1{2{3}, 4}, 5
/// let tree = Tree::<i32>::from_flattened([
///     None, None, Some(1), Some(5), None, Some(2), Some(4), None, None, Some(3), None,
/// ])?;
/// let odd: Tree<i32> = algorithm::filter(&tree, |v| v % 2 == 1);
/// assert_eq!(odd.iter().copied().collect::<Vec<_>>(), [1, 5]);
/// # Ok::<_, sylva::DecodeError>(())
/// ```
#[must_use]
pub fn filter<Src, Dst, F>(tree: &Src, mut pred: F) -> Dst
where
    Src: OrderedTree,
    Src::Item: Clone,
    Dst: OrderedTree<Item = Src::Item> + Default,
    F: FnMut(&Src::Item) -> bool,
{
    filter_nodes(tree, |handle| {
        tree.item(handle).map_or(false, |item| pred(&*item))
    })
}

/// Returns a copy of the forest keeping only the nodes whose handle satisfies
/// `pred`.
///
/// This is [`filter`] with the predicate looking at the node itself, so it can
/// inspect the position, parent or children in the source tree.
#[must_use]
pub fn filter_nodes<Src, Dst, F>(tree: &Src, mut pred: F) -> Dst
where
    Src: OrderedTree,
    Src::Item: Clone,
    Dst: OrderedTree<Item = Src::Item> + Default,
    F: FnMut(&Src::Handle) -> bool,
{
    let mut out = Dst::default();
    let tops = tree.child_handles(Anchor::Root);
    copy_pruned(tree, tops, &mut out, Anchor::Root, &mut pred);
    out
}

/// Collects a copy of the subtree of every node satisfying `pred`, each as a
/// new top-level tree, in pre-order of the matches.
///
/// Nested matches are copied again on their own, so their payloads appear
/// more than once in the result.
#[must_use]
pub fn arrange_by<Src, Dst, F>(tree: &Src, mut pred: F) -> Dst
where
    Src: OrderedTree,
    Src::Item: Clone,
    Dst: OrderedTree<Item = Src::Item> + Default,
    F: FnMut(&Src::Item) -> bool,
{
    let mut out = Dst::default();
    for handle in tree.descendants(Anchor::Root) {
        let matched = tree.item(&handle).map_or(false, |item| pred(&*item));
        if matched {
            copy_pruned(tree, [handle], &mut out, Anchor::Root, &mut |_| true);
        }
    }
    out
}

/// Copies the subtrees of `seeds` as the last children of `parent` in `out`,
/// breadth-first, skipping nodes (and their descendants) failing `keep`.
fn copy_pruned<Src, Dst, I, F>(
    tree: &Src,
    seeds: I,
    out: &mut Dst,
    parent: Anchor<Dst::Handle>,
    keep: &mut F,
) where
    Src: OrderedTree,
    Src::Item: Clone,
    Dst: OrderedTree<Item = Src::Item>,
    I: IntoIterator<Item = Src::Handle>,
    F: FnMut(&Src::Handle) -> bool,
{
    let mut frontier: VecDeque<_> = seeds
        .into_iter()
        .map(|handle| (handle, parent.clone()))
        .collect();
    while let Some((handle, parent)) = frontier.pop_front() {
        if !keep(&handle) {
            continue;
        }
        let item = tree
            .item(&handle)
            .map(|item| (*item).clone())
            .expect("[consistency] handles found by walking the tree must be alive");
        let copied = out
            .insert_child(parent, None, item)
            .expect("[consistency] appending under a node just created never fails");
        frontier.extend(
            tree.child_handles(Anchor::Node(handle))
                .into_iter()
                .map(|child| (child, Anchor::Node(copied.clone()))),
        );
    }
}

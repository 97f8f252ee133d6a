//! Property tests over random trees and random edit scripts.

use proptest::prelude::*;
use sylva::arena::{self, AppendTree, Slots};
use sylva::{owned, Anchor, OrderedTree, TreeError};

/// Structural edit addressed by pre-order index.
///
/// Node indices are taken modulo `len + 1`, where `0` is the super-root and
/// `k` is the `k - 1`th node in pre-order. Positions and counts are taken
/// modulo the valid range at the moment the edit is applied.
#[derive(Debug, Clone)]
enum Edit {
    Insert {
        parent: usize,
        position: usize,
        value: i32,
    },
    Erase {
        node: usize,
    },
    Move {
        source: usize,
        start: usize,
        count: usize,
        dest: usize,
        position: usize,
    },
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (0usize..64, 0usize..64, -100i32..100)
            .prop_map(|(parent, position, value)| Edit::Insert { parent, position, value }),
        1 => (0usize..64).prop_map(|node| Edit::Erase { node }),
        2 => (0usize..64, 0usize..64, 0usize..64, 0usize..64, 0usize..64).prop_map(
            |(source, start, count, dest, position)| Edit::Move {
                source,
                start,
                count,
                dest,
                position,
            }
        ),
    ]
}

fn script() -> impl Strategy<Value = Vec<Edit>> {
    prop::collection::vec(edit(), 0..48)
}

/// Resolves a pre-order index into an anchor.
fn resolve<Tr: OrderedTree>(tree: &Tr, index: usize) -> Anchor<Tr::Handle> {
    let len = tree.descendants(Anchor::Root).count();
    match index % (len + 1) {
        0 => Anchor::Root,
        k => Anchor::Node(
            tree.descendants(Anchor::Root)
                .nth(k - 1)
                .expect("index is in range"),
        ),
    }
}

fn child_count<Tr: OrderedTree>(tree: &Tr, anchor: &Anchor<Tr::Handle>) -> usize {
    tree.child_count(anchor.clone()).expect("resolved anchors are alive")
}

/// Edit with every index resolved against the current shape of a tree.
#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Insert {
        parent: usize,
        position: usize,
        value: i32,
    },
    Erase {
        node: usize,
    },
    Move {
        source: usize,
        start: usize,
        count: usize,
        dest: usize,
        position: usize,
    },
}

/// Returns the pre-order index of the anchor (`0` for the super-root).
fn index_of<Tr: OrderedTree>(tree: &Tr, anchor: &Anchor<Tr::Handle>) -> usize {
    match anchor {
        Anchor::Root => 0,
        Anchor::Node(handle) => {
            1 + tree
                .descendants(Anchor::Root)
                .position(|h| h == *handle)
                .expect("resolved nodes are in the tree")
        }
    }
}

fn resolve_edit<Tr: OrderedTree>(tree: &Tr, edit: &Edit) -> Resolved {
    match *edit {
        Edit::Insert {
            parent,
            position,
            value,
        } => {
            let anchor = resolve(tree, parent);
            Resolved::Insert {
                parent: index_of(tree, &anchor),
                position: position % (child_count(tree, &anchor) + 1),
                value,
            }
        }
        Edit::Erase { node } => {
            let anchor = resolve(tree, node);
            Resolved::Erase {
                node: index_of(tree, &anchor),
            }
        }
        Edit::Move {
            source,
            start,
            count,
            dest,
            position,
        } => {
            let source = resolve(tree, source);
            let source_len = child_count(tree, &source);
            let start = start % (source_len + 1);
            let count = count % (source_len - start + 1);
            let dest = resolve(tree, dest);
            let position = position % (child_count(tree, &dest) + 1);
            Resolved::Move {
                source: index_of(tree, &source),
                start,
                count,
                dest: index_of(tree, &dest),
                position,
            }
        }
    }
}

fn apply_arena<S: Slots<i32>>(tree: &mut arena::Tree<i32, S>, edit: &Resolved) -> Result<(), TreeError> {
    match *edit {
        Resolved::Insert {
            parent,
            position,
            value,
        } => {
            let parent = resolve(&*tree, parent);
            tree.insert(parent, value, Some(position)).map(drop)
        }
        Resolved::Erase { node } => {
            let node = resolve(&*tree, node);
            tree.erase(node)
        }
        Resolved::Move {
            source,
            start,
            count,
            dest,
            position,
        } => {
            let source = resolve(&*tree, source);
            let dest = resolve(&*tree, dest);
            tree.move_nodes(source, start, count, dest, position)
        }
    }
}

fn apply_owned(tree: &mut owned::Tree<i32>, edit: &Resolved) -> Result<(), TreeError> {
    match *edit {
        Resolved::Insert {
            parent,
            position,
            value,
        } => {
            let parent = resolve(&*tree, parent);
            tree.insert(parent, value, Some(position)).map(drop)
        }
        Resolved::Erase { node } => {
            let node = resolve(&*tree, node);
            tree.erase(node)
        }
        Resolved::Move {
            source,
            start,
            count,
            dest,
            position,
        } => {
            let source = resolve(&*tree, source);
            let dest = resolve(&*tree, dest);
            tree.move_nodes(source, start, count, dest, position)
        }
    }
}

/// Checks that every node sits at its stored position under its parent.
fn positions_hold<Tr: OrderedTree>(tree: &Tr) -> bool {
    tree.descendants(Anchor::Root).all(|handle| {
        let (Some(parent), Some(position)) = (tree.parent_of(&handle), tree.position_of(&handle))
        else {
            return false;
        };
        tree.child_handles(parent).get(position) == Some(&handle)
    })
}

/// Builds a tree from a script of inserts only.
fn build(edits: &[Edit]) -> arena::Tree<i32> {
    let mut tree = arena::Tree::new();
    for edit in edits {
        if let Edit::Insert { .. } = edit {
            let resolved = resolve_edit(&tree, edit);
            apply_arena(&mut tree, &resolved).expect("resolved inserts are valid");
        }
    }
    tree
}

proptest! {
    /// Every variant agrees with the others after the same edits, and the
    /// stored positions stay consistent.
    #[test]
    fn variants_agree_under_edits(edits in script()) {
        let mut free_list = arena::Tree::<i32>::new();
        let mut append_only = AppendTree::<i32>::default();
        let mut rc = owned::Tree::<i32>::new();

        for edit in &edits {
            let resolved = resolve_edit(&free_list, edit);
            let before = free_list.clone();
            let outcome = apply_arena(&mut free_list, &resolved);
            prop_assert_eq!(apply_arena(&mut append_only, &resolved), outcome);
            prop_assert_eq!(apply_owned(&mut rc, &resolved), outcome);
            if outcome.is_err() {
                prop_assert_eq!(&free_list, &before);
            }

            prop_assert!(positions_hold(&free_list));
            prop_assert!(positions_hold(&append_only));
            prop_assert!(positions_hold(&rc));
            prop_assert_eq!(&free_list, &append_only);
            prop_assert_eq!(&rc, &free_list);
            prop_assert_eq!(free_list.len(), rc.len());
        }
    }

    #[test]
    fn flatten_round_trips(edits in script()) {
        let tree = build(&edits);
        let flat = tree.flatten();
        prop_assert_eq!(&arena::Tree::<i32>::from_flattened(flat.clone()).expect("valid"), &tree);
        prop_assert_eq!(&AppendTree::<i32>::from_flattened(flat.clone()).expect("valid"), &tree);
        let rc = owned::Tree::<i32>::from_flattened(flat.clone()).expect("valid");
        prop_assert_eq!(rc.flatten(), flat);
    }

    #[test]
    fn top_level_appends_iterate_in_order(values in prop::collection::vec(any::<i32>(), 0..32)) {
        let mut tree = arena::Tree::new();
        for &value in &values {
            tree.insert(Anchor::Root, value, None).expect("root");
        }
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), values);
    }

    #[test]
    fn single_node_move_onto_itself_is_noop(edits in script(), pick in 0usize..64) {
        let mut tree = build(&edits);
        prop_assume!(!tree.is_empty());
        let before = tree.clone();
        let Anchor::Node(node) = resolve(&tree, 1 + pick % tree.len()) else {
            unreachable!("non-zero indices resolve to nodes");
        };
        let parent = tree.parent(node).expect("alive");
        let position = tree.position(node).expect("alive");

        tree.move_nodes(parent, position, 1, parent, position).expect("valid move");
        prop_assert_eq!(&tree, &before);
        tree.move_nodes(parent, position, 1, parent, position + 1).expect("valid move");
        prop_assert_eq!(&tree, &before);
    }

    #[test]
    fn take_then_insert_restores(edits in script(), pick in 0usize..64) {
        let mut tree = build(&edits);
        prop_assume!(!tree.is_empty());
        let before = tree.clone();
        let Anchor::Node(node) = resolve(&tree, 1 + pick % tree.len()) else {
            unreachable!("non-zero indices resolve to nodes");
        };
        let parent = tree.parent(node).expect("alive");
        let position = tree.position(node).expect("alive");

        let taken = tree.take_subtree(node).expect("alive");
        prop_assert_eq!(taken.child_count(Anchor::Root), Some(1));
        tree.insert_subtree(parent, &taken, Some(position)).expect("valid position");
        prop_assert_eq!(&tree, &before);
        prop_assert!(positions_hold(&tree));
    }

    #[test]
    fn owned_take_then_graft_restores(edits in script(), pick in 0usize..64) {
        let source = build(&edits);
        prop_assume!(!source.is_empty());
        let mut tree = owned::Tree::<i32>::from_flattened(source.flatten()).expect("valid");
        let Anchor::Node(node) = resolve(&tree, 1 + pick % tree.len()) else {
            unreachable!("non-zero indices resolve to nodes");
        };
        let parent = tree.parent(&node).expect("attached");
        let position = node.position();

        let mut taken = tree.take_subtree(&node).expect("attached");
        prop_assert_eq!(tree.len() + taken.len(), source.len());
        tree.graft(parent, &mut taken, Some(position)).expect("valid position");
        prop_assert_eq!(&tree, &source);
        prop_assert!(taken.is_empty());
    }

    #[test]
    fn transform_identity_preserves_shape(edits in script()) {
        let tree = build(&edits);
        let copy = tree.transform(Anchor::Root, |v| *v).expect("root");
        prop_assert_eq!(&copy, &tree);
        for (lhs, rhs) in tree.nodes().zip(copy.nodes()) {
            prop_assert_eq!(lhs.child_count(), rhs.child_count());
        }

        let widened = tree.transform(Anchor::Root, |v| i64::from(*v)).expect("root");
        let rc = owned::Tree::<i32>::from_flattened(tree.flatten()).expect("valid");
        let rc_widened = rc.transform(Anchor::Root, |v| i64::from(*v)).expect("root");
        prop_assert_eq!(&rc_widened, &widened);
    }
}

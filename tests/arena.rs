//! Scenarios for the arena trees.

use sylva::arena::{AppendTree, NodeId, Tree};
use sylva::{algorithm, Anchor, TreeError};
use test_case::test_case;

/// Flattened form of the sample forest.
///
/// ```text
/// 1
/// |-- 2
/// |   `-- 10
/// `-- 3
/// 4
/// `-- 5
///     |-- 6
///     `-- 7
///         `-- 8
/// 9
/// ```
const SAMPLE: &[i32] = &[
    0, 0, 1, 4, 9, 0, 2, 3, 0, 5, 0, 0, 10, 0, 0, 6, 7, 0, 0, 0, 8, 0, 0,
];

fn sample_slots() -> Vec<Option<i32>> {
    SAMPLE.iter().map(|&v| (v != 0).then_some(v)).collect()
}

fn sample() -> Tree<i32> {
    Tree::from_flattened(sample_slots()).expect("the sample must be a valid encoding")
}

fn values<S: sylva::arena::Slots<i32>>(tree: &Tree<i32, S>) -> Vec<i32> {
    tree.iter().copied().collect()
}

fn id_of<S: sylva::arena::Slots<i32>>(tree: &Tree<i32, S>, value: i32) -> NodeId {
    algorithm::find(tree, Anchor::Root, &value).expect("the value must be in the tree")
}

/// Asserts that every node is found at its stored position under its parent.
fn assert_positions<S: sylva::arena::Slots<i32>>(tree: &Tree<i32, S>) {
    for id in tree.descendants(Anchor::Root) {
        let parent = tree.parent(id).expect("alive");
        let position = tree.position(id).expect("alive");
        assert_eq!(tree.child_ids(parent).expect("alive")[position], id);
    }
}

#[test]
fn sample_iteration_and_queries() {
    let tree = sample();
    assert_eq!(values(&tree), [1, 2, 10, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(tree.len(), 10);

    let tops: Vec<i32> = tree
        .children(Anchor::Root)
        .expect("root")
        .map(|node| *node.data())
        .collect();
    assert_eq!(tops, [1, 4, 9]);

    let five = id_of(&tree, 5);
    let kids: Vec<i32> = tree
        .children(five)
        .expect("alive")
        .map(|node| *node.data())
        .collect();
    assert_eq!(kids, [6, 7]);
    assert_eq!(tree.position(id_of(&tree, 7)), Some(1));
    assert_positions(&tree);
}

#[test]
fn sample_move_first_child_under_last_top() {
    let mut tree = sample();
    let one = id_of(&tree, 1);
    let nine = id_of(&tree, 9);
    tree.move_nodes(one, 0, 1, nine, 0).expect("valid move");

    assert_eq!(values(&tree), [1, 3, 4, 5, 6, 7, 8, 9, 2, 10]);
    assert_eq!(tree.parent(id_of(&tree, 2)), Some(Anchor::Node(nine)));
    assert_positions(&tree);
}

/// Builds `1{2, 3{10{11}}, 4, 5}, 6{7, 8, 9, 12}`.
fn move_sample() -> (Tree<i32>, NodeId, NodeId) {
    let mut tree = Tree::new();
    let one = tree.insert(Anchor::Root, 1, None).expect("root");
    let ids = tree.insert_range(one, None, [2, 3, 4, 5]).expect("alive");
    let ten = tree.insert(ids[1], 10, None).expect("alive");
    tree.insert(ten, 11, None).expect("alive");
    let six = tree.insert(Anchor::Root, 6, None).expect("root");
    tree.insert_range(six, None, [7, 8, 9, 12]).expect("alive");
    (tree, one, six)
}

#[test_case(0, 2, 2, &[1, 4, 5, 6, 7, 8, 2, 3, 10, 11, 9, 12] ; "leading run to the middle")]
#[test_case(2, 2, 0, &[1, 2, 3, 10, 11, 6, 4, 5, 7, 8, 9, 12] ; "trailing run to the front")]
#[test_case(1, 2, 4, &[1, 2, 5, 6, 7, 8, 9, 12, 3, 10, 11, 4] ; "inner run to the end")]
fn move_between_parents(source: usize, count: usize, dest: usize, expected: &[i32]) {
    let (mut tree, one, six) = move_sample();
    tree.move_nodes(one, source, count, six, dest).expect("valid move");
    assert_eq!(values(&tree), expected);
    assert_eq!(tree.len(), 12);
    assert_positions(&tree);
}

#[test_case(0, 1, 3, &[2, 3, 1, 4] ; "forward by two")]
#[test_case(1, 2, 4, &[1, 4, 2, 3] ; "run to the end")]
#[test_case(2, 2, 0, &[3, 4, 1, 2] ; "run to the front")]
#[test_case(1, 2, 2, &[1, 2, 3, 4] ; "destination inside the run")]
#[test_case(1, 1, 1, &[1, 2, 3, 4] ; "single node onto itself")]
fn move_within_parent(source: usize, count: usize, dest: usize, expected: &[i32]) {
    let mut tree = Tree::new();
    tree.insert_range(Anchor::Root, None, [1, 2, 3, 4]).expect("root");
    tree.move_nodes(Anchor::Root, source, count, Anchor::Root, dest)
        .expect("valid move");
    assert_eq!(values(&tree), expected);
    assert_positions(&tree);
}

#[test]
fn move_reparents_top_level_nodes() {
    let mut tree = Tree::new();
    let ids = tree
        .insert_range(Anchor::Root, None, [1, 2, 3, 4])
        .expect("root");
    tree.move_nodes(Anchor::Root, 0, 1, ids[1], 0).expect("valid move");
    tree.move_nodes(Anchor::Root, 1, 1, ids[3], 0).expect("valid move");

    assert_eq!(tree.child_ids(Anchor::Root).expect("root"), [ids[1], ids[3]]);
    assert_eq!(tree.child_ids(ids[1]).expect("alive"), [ids[0]]);
    assert_eq!(tree.child_ids(ids[3]).expect("alive"), [ids[2]]);
    assert_eq!(values(&tree), [2, 1, 4, 3]);
}

#[test]
fn rejected_moves() {
    let (mut tree, one, six) = move_sample();
    let before = tree.clone();
    let three = id_of(&tree, 3);
    let eleven = id_of(&tree, 11);

    assert_eq!(
        tree.move_nodes(one, 1, 1, eleven, 0),
        Err(TreeError::AncestorDescendantLoop)
    );
    assert_eq!(
        tree.move_nodes(Anchor::Root, 0, 1, three, 0),
        Err(TreeError::AncestorDescendantLoop)
    );
    assert_eq!(
        tree.move_nodes(one, 3, 2, six, 0),
        Err(TreeError::SourceOutOfRange {
            start: 3,
            count: 2,
            len: 4
        })
    );
    assert_eq!(
        tree.move_nodes(one, 0, 1, six, 5),
        Err(TreeError::DestinationOutOfRange { position: 5, len: 4 })
    );
    assert_eq!(tree, before);
}

#[test]
fn batch_insert_keeps_order_and_positions() {
    let mut tree = sample();
    let five = id_of(&tree, 5);
    let ids = tree
        .insert_range(five, Some(1), 20..=25)
        .expect("valid position");

    assert_eq!(ids.len(), 6);
    assert_eq!(
        values(&tree),
        [1, 2, 10, 3, 4, 5, 6, 20, 21, 22, 23, 24, 25, 7, 8, 9]
    );
    assert_eq!(tree.position(id_of(&tree, 7)), Some(7));
    assert_positions(&tree);

    assert_eq!(
        tree.insert_range(five, Some(9), [0]),
        Err(TreeError::DestinationOutOfRange { position: 9, len: 8 })
    );
}

#[test]
fn erase_subtree() {
    let mut tree = sample();
    let four = id_of(&tree, 4);
    let seven = id_of(&tree, 7);
    tree.erase(four).expect("alive");

    assert_eq!(values(&tree), [1, 2, 10, 3, 9]);
    assert!(!tree.is_alive(seven));
    assert_eq!(tree.erase(seven), Err(TreeError::StaleNode));
    assert_eq!(tree.position(id_of(&tree, 9)), Some(1));
    assert_positions(&tree);
}

#[test]
fn free_list_reuses_released_slots() {
    let mut tree = sample();
    let ten = id_of(&tree, 10);
    let nine = id_of(&tree, 9);
    tree.erase(ten).expect("alive");
    tree.erase(nine).expect("alive");
    let slots = tree.slot_count();

    tree.insert(Anchor::Root, 30, None).expect("root");
    tree.insert(Anchor::Root, 31, None).expect("root");
    assert_eq!(tree.slot_count(), slots);
    assert_eq!(values(&tree), [1, 2, 3, 4, 5, 6, 7, 8, 30, 31]);
    assert_positions(&tree);
}

#[test]
fn erased_ids_stay_stale_after_reuse() {
    let mut tree = Tree::new();
    let a = tree.insert(Anchor::Root, "a", None).expect("root");
    tree.erase(a).expect("alive");
    let b = tree.insert(Anchor::Root, "b", None).expect("root");

    assert_ne!(a, b);
    assert!(!tree.is_alive(a));
    assert_eq!(tree.data(a), None);
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.erase(a), Err(TreeError::StaleNode));
    assert_eq!(tree.insert(a, "c", None), Err(TreeError::StaleNode));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.data(b), Some(&"b"));
}

#[test]
fn append_only_never_reuses_slots() {
    let mut tree: AppendTree<i32> =
        AppendTree::from_flattened(sample_slots()).expect("the sample must be a valid encoding");
    let ten = id_of(&tree, 10);
    tree.erase(ten).expect("alive");

    let new = tree.insert(Anchor::Root, 30, None).expect("root");
    assert_ne!(new, ten);
    assert_eq!(tree.slot_count(), 11);
    assert_eq!(tree.slots().tombstones(), 1);
    assert_eq!(tree.data(ten), None);

    let compacted = tree.compacted();
    assert_eq!(compacted.slot_count(), 10);
    assert_eq!(compacted.slots().tombstones(), 0);
    assert_eq!(compacted, tree);
}

#[test]
fn take_and_insert_subtree_restores() {
    let mut tree = sample();
    let before = tree.clone();
    let four = id_of(&tree, 4);
    let parent = tree.parent(four).expect("alive");
    let position = tree.position(four).expect("alive");

    let taken = tree.take_subtree(four).expect("alive");
    assert_eq!(values(&taken), [4, 5, 6, 7, 8]);
    assert_eq!(values(&tree), [1, 2, 10, 3, 9]);

    tree.insert_subtree(parent, &taken, Some(position))
        .expect("valid position");
    assert_eq!(tree, before);
    assert_positions(&tree);
}

#[test]
fn whole_forest_round_trips() {
    let tree = sample();
    let flat = tree.flatten();
    assert_eq!(flat, sample_slots());
    assert_eq!(Tree::<i32>::from_flattened(flat), Ok(tree));
}

//! Serde transport of the flattened form.
#![cfg(feature = "serde")]

use sylva::arena::{AppendTree, Tree};
use sylva::{owned, Anchor};

fn sample() -> Tree<String> {
    let mut tree = Tree::new();
    let a = tree.insert(Anchor::Root, "a".to_owned(), None).expect("root");
    tree.insert_range(a, None, ["b".to_owned(), "c".to_owned()])
        .expect("alive");
    tree.insert(Anchor::Root, "d".to_owned(), None).expect("root");
    tree
}

#[test]
fn serializes_as_flattened_sequence() {
    let json = serde_json::to_string(&sample()).expect("serializable");
    assert_eq!(json, r#"[null,null,"a","d",null,"b","c",null,null,null,null]"#);

    let rc = owned::Tree::from_flattened(sample().flatten()).expect("valid");
    assert_eq!(serde_json::to_string(&rc).expect("serializable"), json);
}

#[test]
fn deserializes_into_every_variant() {
    let json = serde_json::to_string(&sample()).expect("serializable");

    let free_list: Tree<String> = serde_json::from_str(&json).expect("valid");
    let append_only: AppendTree<String> = serde_json::from_str(&json).expect("valid");
    let rc: owned::Tree<String> = serde_json::from_str(&json).expect("valid");
    assert_eq!(free_list, sample());
    assert_eq!(append_only, sample());
    assert_eq!(rc, sample());
}

#[test]
fn invalid_encodings_are_rejected() {
    let err = serde_json::from_str::<Tree<i32>>("[1, null]").expect_err("no header");
    assert!(err.to_string().contains("two absent slots"), "{err}");

    let err = serde_json::from_str::<owned::Tree<i32>>("[null, null, 1]")
        .expect_err("unterminated");
    assert!(err.is_data());
}

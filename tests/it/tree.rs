// Copyright 2024 nodearc Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use nodearc::NodeId;
use nodearc::NodeTree;
use nodearc::NodeValue;

#[test]
fn test_intern_round_trip() {
    let mut tree = NodeTree::new();
    let a = tree.intern("alpha").unwrap();
    let b = tree.intern("beta").unwrap();
    assert_eq!(tree.str_of(a), "alpha");
    assert_eq!(tree.str_of(b), "beta");
}

#[test]
fn test_fresh_tree_top_is_null() {
    let tree = NodeTree::new();
    assert_eq!(*tree.node(NodeId::Top), NodeValue::Null);
}

#[test]
fn test_insert_respects_capacity() {
    let mut tree = NodeTree::new();
    tree.make_array(NodeId::Top, 2).unwrap();
    assert!(tree.insert(NodeId::Top, None, NodeValue::Int(1)).unwrap());
    assert!(tree.insert(NodeId::Top, None, NodeValue::Int(2)).unwrap());
    // Full: insert reports false instead of growing on its own.
    assert!(!tree.insert(NodeId::Top, None, NodeValue::Int(3)).unwrap());

    tree.reserve_container(NodeId::Top, 4).unwrap();
    assert!(tree.insert(NodeId::Top, None, NodeValue::Int(3)).unwrap());
    assert_eq!(tree.child_count(NodeId::Top), 3);
}

#[test]
fn test_reserve_preserves_children_across_relocation() {
    let mut tree = NodeTree::new();
    tree.make_table(NodeId::Top, 2).unwrap();
    tree.insert(NodeId::Top, Some("a"), NodeValue::Null).unwrap();
    tree.insert(NodeId::Top, Some("b"), NodeValue::Null).unwrap();

    let a = tree.find(NodeId::Top, "a").unwrap();
    tree.make_array(a, 1).unwrap();
    tree.insert(a, None, NodeValue::Int(7)).unwrap();

    // Allocating b's run on top of a's buries it, so growing a's run
    // must relocate its slots.
    let b = tree.find(NodeId::Top, "b").unwrap();
    tree.make_array(b, 1).unwrap();

    tree.reserve_container(a, 8).unwrap();
    assert!(tree.insert(a, None, NodeValue::Int(8)).unwrap());
    let first = tree.child(a, 0).unwrap();
    let second = tree.child(a, 1).unwrap();
    assert_eq!(*tree.node(first), NodeValue::Int(7));
    assert_eq!(*tree.node(second), NodeValue::Int(8));
}

#[test]
fn test_table_keys_and_order() {
    let mut tree = NodeTree::new();
    tree.make_table(NodeId::Top, 4).unwrap();
    tree.insert(NodeId::Top, Some("one"), NodeValue::Int(1))
        .unwrap();
    tree.insert(NodeId::Top, Some("two"), NodeValue::Int(2))
        .unwrap();
    tree.insert(NodeId::Top, Some("three"), NodeValue::Int(3))
        .unwrap();

    let keys: Vec<&str> = (0..tree.child_count(NodeId::Top))
        .map(|i| {
            let child = tree.child(NodeId::Top, i).unwrap();
            tree.key_of(child).unwrap()
        })
        .collect();
    assert_eq!(keys, vec!["one", "two", "three"]);
}

#[test]
fn test_duplicate_key_replaces_in_place() {
    let mut tree = NodeTree::new();
    tree.make_table(NodeId::Top, 2).unwrap();
    tree.insert(NodeId::Top, Some("k"), NodeValue::Int(1))
        .unwrap();
    tree.insert(NodeId::Top, Some("k"), NodeValue::Int(2))
        .unwrap();
    assert_eq!(tree.child_count(NodeId::Top), 1);
    let child = tree.find(NodeId::Top, "k").unwrap();
    assert_eq!(*tree.node(child), NodeValue::Int(2));
}

#[test]
fn test_find_missing_key() {
    let mut tree = NodeTree::new();
    tree.make_table(NodeId::Top, 1).unwrap();
    tree.insert(NodeId::Top, Some("present"), NodeValue::Null)
        .unwrap();
    assert!(tree.find(NodeId::Top, "absent").is_none());
}

#[test]
fn test_keyed_insert_into_array_fails() {
    let mut tree = NodeTree::new();
    tree.make_array(NodeId::Top, 1).unwrap();
    assert!(tree
        .insert(NodeId::Top, Some("k"), NodeValue::Null)
        .is_err());
    let mut table_tree = NodeTree::new();
    table_tree.make_table(NodeId::Top, 1).unwrap();
    assert!(table_tree.insert(NodeId::Top, None, NodeValue::Null).is_err());
}

#[test]
fn test_nested_containers() {
    let mut tree = NodeTree::new();
    tree.make_table(NodeId::Top, 2).unwrap();
    tree.insert(NodeId::Top, Some("items"), NodeValue::Null)
        .unwrap();
    let items = tree.find(NodeId::Top, "items").unwrap();
    tree.make_array(items, 2).unwrap();
    tree.insert(items, None, NodeValue::UInt(10)).unwrap();
    tree.insert(items, None, NodeValue::UInt(20)).unwrap();

    let items = tree.find(NodeId::Top, "items").unwrap();
    assert_eq!(tree.child_count(items), 2);
    let second = tree.child(items, 1).unwrap();
    assert_eq!(*tree.node(second), NodeValue::UInt(20));
}

#[test]
fn test_reset_releases_everything() {
    let mut tree = NodeTree::new();
    tree.make_table(NodeId::Top, 8).unwrap();
    for i in 0..8 {
        let key = format!("key{i}");
        tree.insert(NodeId::Top, Some(&key), NodeValue::Int(i))
            .unwrap();
    }
    assert!(tree.string_pool_bytes() > 0);
    assert!(tree.node_pool_slots() > 0);

    tree.reset();
    assert_eq!(*tree.node(NodeId::Top), NodeValue::Null);
    assert_eq!(tree.string_pool_bytes(), 0);
    assert_eq!(tree.node_pool_slots(), 0);
}

#[test]
fn test_swap() {
    let mut a = NodeTree::new();
    a.make_array(NodeId::Top, 1).unwrap();
    a.insert(NodeId::Top, None, NodeValue::Bool(true)).unwrap();
    let mut b = NodeTree::new();

    a.swap(&mut b);
    assert_eq!(*a.node(NodeId::Top), NodeValue::Null);
    assert_eq!(b.child_count(NodeId::Top), 1);
}

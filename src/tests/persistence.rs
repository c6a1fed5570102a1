use std::sync::Arc;

use crate::node::Node;
use crate::{Map, Value};

use super::check_invariants;

fn sample(n: usize) -> Map {
    (0..n).map(|i| (format!("key{i}"), format!("v{i}"))).collect()
}

fn root_children(map: &Map) -> &[Arc<Node>] {
    match map.root() {
        Node::Branch(branch) => &branch.children,
        Node::Collision(_) => panic!("root must be a branch"),
    }
}

/// `set` leaves the receiver untouched.
#[test]
fn set_does_not_mutate() {
    let before = sample(50);
    let snapshot = before.to_json().unwrap();

    let after = before.set("key7", "changed").set("fresh", 1);

    assert_eq!(before.to_json().unwrap(), snapshot);
    assert_eq!(before.get_string("key7"), Ok("v7"));
    assert!(!before.contains("fresh"));
    assert_eq!(after.get_string("key7"), Ok("changed"));
    assert_eq!(after.len(), 51);
    assert_eq!(before.len(), 50);
}

/// `delete` leaves the receiver untouched.
#[test]
fn delete_does_not_mutate() {
    let before = sample(50);
    let (after, deleted) = before.delete("key3");

    assert!(deleted);
    assert_eq!(before.get_string("key3"), Ok("v3"));
    assert_eq!(before.len(), 50);
    assert!(!after.contains("key3"));
    assert_eq!(after.len(), 49);
}

/// Every version in a chain of updates stays readable.
#[test]
fn version_chain() {
    let mut versions = vec![Map::new()];
    for i in 0..100_i64 {
        let next = versions[versions.len() - 1].set("counter", i);
        versions.push(next);
    }
    assert!(versions[0].get("counter").is_none());
    for (i, version) in versions.iter().enumerate().skip(1) {
        assert_eq!(version.get_int("counter"), Ok(i64::try_from(i).unwrap() - 1));
    }
}

/// Siblings off the modified path are shared by reference.
#[test]
fn untouched_subtrees_are_shared() {
    let before = sample(2_000);
    let after = before.set("key1234", Value::Null);

    let old = root_children(&before);
    let new = root_children(&after);
    assert_eq!(old.len(), new.len());

    let shared = old
        .iter()
        .zip(new)
        .filter(|(a, b)| Arc::ptr_eq(a, b))
        .count();
    // Exactly one root slot lies on the modified path.
    assert_eq!(shared, old.len() - 1);
    check_invariants(&after);
}

/// Deleting shares siblings too.
#[test]
fn delete_shares_siblings() {
    let before = sample(2_000);
    let (after, _) = before.delete("key42");

    let old = root_children(&before);
    let new = root_children(&after);
    let shared = old
        .iter()
        .filter(|a| new.iter().any(|b| Arc::ptr_eq(a, b)))
        .count();
    assert!(shared >= old.len() - 1);
    check_invariants(&after);
}

/// A nested map stored in two versions is the same allocation.
#[test]
fn nested_values_are_shared() {
    let payload = sample(10);
    let v1 = Map::new().set("payload", payload.clone());
    let v2 = v1.set("pk", "order:1");

    assert!(v1.get_map("payload").unwrap().ptr_eq(&payload));
    assert!(v2.get_map("payload").unwrap().ptr_eq(&payload));
}

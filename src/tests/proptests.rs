use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::{Map, MapOptions, Value};

use super::{NarrowHasher, check_invariants};

#[derive(Debug, Clone)]
enum Op {
    Set(String, Value),
    Delete(String),
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,3}"
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|i| Value::Int(i64::from(i))),
        (-1.0e6..1.0e6_f64).prop_map(Value::Number),
        "[a-z0-9 ]{0,8}".prop_map(Value::String),
        prop::collection::vec("[a-z]{0,4}", 0..4).prop_map(Value::StringArray),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => (key_strategy(), value_strategy()).prop_map(|(k, v)| Op::Set(k, v)),
            1 => key_strategy().prop_map(Op::Delete),
        ],
        0..200,
    )
}

fn doc_strategy() -> impl Strategy<Value = Map> {
    let value = value_strategy().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec((key_strategy(), inner.clone()), 0..4)
                .prop_map(|pairs| Value::Map(pairs.into_iter().collect())),
            prop::collection::vec(prop::collection::vec((key_strategy(), inner), 0..3), 1..3)
                .prop_map(|rows| {
                    Value::MapArray(rows.into_iter().map(|r| r.into_iter().collect()).collect())
                }),
        ]
    });
    prop::collection::vec((key_strategy(), value), 0..12)
        .prop_map(|pairs| pairs.into_iter().collect())
}

/// Replays `ops` against both the trie and a `BTreeMap` model.
fn check_against_model(options: &MapOptions, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut map = options.build();
    let mut model: BTreeMap<String, Value> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Set(key, value) => {
                let before = map.clone();
                let prior = before.get(&key).cloned();
                map = map.set(key.clone(), value.clone());

                prop_assert_eq!(before.get(&key).cloned(), prior, "set mutated its receiver");
                prop_assert_eq!(map.get(&key), Some(&value));
                model.insert(key, value);
            }
            Op::Delete(key) => {
                let (next, deleted) = map.delete(&key);
                prop_assert_eq!(deleted, model.remove(&key).is_some());
                if !deleted {
                    prop_assert!(next.ptr_eq(&map), "absent delete must return the same trie");
                }
                map = next;
            }
        }
        prop_assert_eq!(map.len(), model.len());
    }

    check_invariants(&map);
    for (key, value) in &model {
        prop_assert_eq!(map.get(key), Some(value));
    }

    let rebuilt = model
        .iter()
        .rev()
        .fold(options.build(), |m, (k, v)| m.set(k.as_str(), v.clone()));
    prop_assert_eq!(
        map.keys().collect::<Vec<_>>(),
        rebuilt.keys().collect::<Vec<_>>()
    );
    prop_assert!(map.diff(&rebuilt).is_empty());

    let bytes = map.to_json().unwrap();
    let decoded = Map::from_json_with(&bytes, options).unwrap();
    prop_assert!(map.diff(&decoded).is_empty());
    prop_assert_eq!(decoded.to_json().unwrap(), bytes);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_model_default_hasher(ops in ops_strategy()) {
        check_against_model(&MapOptions::default(), ops)?;
    }

    #[test]
    fn prop_model_colliding_hasher(ops in ops_strategy()) {
        check_against_model(&MapOptions::new().with_hasher(NarrowHasher(4)), ops)?;
    }

    #[test]
    fn prop_round_trip(doc in doc_strategy()) {
        let bytes = doc.to_json().unwrap();
        let decoded = Map::from_json(&bytes).unwrap();
        prop_assert!(doc.diff(&decoded).is_empty());
        prop_assert!(decoded.diff(&doc).is_empty());
        prop_assert_eq!(decoded.to_json().unwrap(), bytes);
    }

    #[test]
    fn prop_insert_order_independent(
        (pairs, shuffled) in prop::collection::btree_map(key_strategy(), value_strategy(), 0..64)
            .prop_map(|m| m.into_iter().collect::<Vec<_>>())
            .prop_flat_map(|pairs| (Just(pairs.clone()), Just(pairs).prop_shuffle()))
    ) {
        let a: Map = pairs.into_iter().collect();
        let b: Map = shuffled.into_iter().collect();
        prop_assert_eq!(a.keys().collect::<Vec<_>>(), b.keys().collect::<Vec<_>>());
        prop_assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    }

    #[test]
    fn prop_diff_detects_change(doc in doc_strategy(), key in key_strategy(), value in value_strategy()) {
        prop_assert!(doc.diff(&doc).is_empty());
        let changed = doc.set(key.clone(), value.clone());
        let differs = doc.get(&key) != Some(&value);
        prop_assert_eq!(!doc.diff(&changed).is_empty(), differs);
        prop_assert_eq!(doc.get(&key).is_some(), doc.contains(&key));
    }
}

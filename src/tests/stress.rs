use crate::{Map, MapOptions};

use super::{NarrowHasher, check_invariants};

/// 2000 entries: set all, verify all, delete all.
#[test]
fn thousands_of_entries() {
    let mut map = Map::new();
    for i in 0_u32..2000 {
        map = map.set(format!("entry-{i}"), i * 3);
    }
    assert_eq!(map.len(), 2000);
    check_invariants(&map);

    for i in 0_u32..2000 {
        assert_eq!(map.get_int(&format!("entry-{i}")), Ok(i64::from(i * 3)), "missing key {i}");
    }

    for i in 0_u32..2000 {
        let (next, deleted) = map.delete(&format!("entry-{i}"));
        assert!(deleted, "failed to delete key {i}");
        map = next;
    }
    assert!(map.is_empty());
    check_invariants(&map);
}

/// A narrow hasher forces deep paths and many buckets.
#[test]
fn deep_collisions() {
    let options = MapOptions::new().with_hasher(NarrowHasher(3));
    let mut map = options.build();
    for i in 0_u32..500 {
        map = map.set(format!("k{i}"), i);
    }
    assert_eq!(map.len(), 500);
    assert_eq!(check_invariants(&map), 500);
    for i in 0_u32..500 {
        assert_eq!(map.get_int(&format!("k{i}")), Ok(i64::from(i)));
    }
}

/// Set + overwrite + delete interleaved.
#[test]
fn interleaved_operations() {
    let mut map = Map::new();
    for i in 0_u32..200 {
        map = map.set(format!("n{i}"), i);
    }
    // Overwrite even keys.
    for i in (0_u32..200).step_by(2) {
        map = map.set(format!("n{i}"), i + 1000);
    }
    // Delete odd keys.
    for i in (1_u32..200).step_by(2) {
        let (next, deleted) = map.delete(&format!("n{i}"));
        assert!(deleted);
        map = next;
    }
    assert_eq!(map.len(), 100);
    for i in (0_u32..200).step_by(2) {
        assert_eq!(map.get_int(&format!("n{i}")), Ok(i64::from(i + 1000)));
    }
    check_invariants(&map);
}

mod persistence;
mod proptests;
mod stress;

use crate::hasher::{Crc32, KeyHasher};
use crate::node::{self, Node};
use crate::Map;

/// Hashes every key to the same value, forcing full-hash collisions.
pub struct ConstantHasher(pub u32);

impl KeyHasher for ConstantHasher {
    fn hash(&self, _key: &str) -> u32 {
        self.0
    }
}

/// Reads the hash from the decimal suffix after the last `#` in the key,
/// e.g. `"a#33"` hashes to 33. Keys without a suffix fall back to CRC-32.
pub struct SuffixHasher;

impl KeyHasher for SuffixHasher {
    fn hash(&self, key: &str) -> u32 {
        key.rsplit_once('#')
            .and_then(|(_, n)| n.parse().ok())
            .unwrap_or_else(|| Crc32.hash(key))
    }
}

/// Keeps only the low `bits` of CRC-32, so distinct keys collide often.
pub struct NarrowHasher(pub u32);

impl KeyHasher for NarrowHasher {
    fn hash(&self, key: &str) -> u32 {
        Crc32.hash(key) & ((1 << self.0) - 1)
    }
}

/// Walks the whole trie and panics on any broken structural invariant.
///
/// Returns the number of leaves found.
pub fn check_invariants(map: &Map) -> usize {
    let leaves = check_node(map.root(), 0, 0, true, &**map.hasher());
    assert_eq!(leaves, map.len(), "len must match reachable leaves");
    leaves
}

fn check_node(node: &Node, level: u32, prefix: u32, is_root: bool, hasher: &dyn KeyHasher) -> usize {
    let prefix_mask = if level == 0 { 0 } else { u32::MAX >> (32 - (level * node::BITS_PER_LEVEL).min(32)) };
    match node {
        Node::Branch(branch) => {
            assert_eq!(branch.level, level, "level must grow by one per step");
            assert_eq!(branch.data_map & branch.node_map, 0, "bitmaps must be disjoint");
            assert_eq!(branch.leaves.len(), branch.data_map.count_ones() as usize);
            assert_eq!(branch.children.len(), branch.node_map.count_ones() as usize);
            if !is_root {
                assert!(
                    branch.leaves.len() + branch.children.len() > 0,
                    "only the root may be empty"
                );
                assert!(node.sole_leaf().is_none(), "single-leaf subtrees must be inlined");
            }

            let mut count = 0;
            let mut data_bits = branch.data_map;
            for leaf in &branch.leaves {
                let frag = data_bits.trailing_zeros();
                data_bits &= data_bits - 1;
                assert_eq!(leaf.hash, hasher.hash(&leaf.key), "stale hash for {}", leaf.key);
                assert_eq!(node::fragment(leaf.hash, level), frag, "leaf in wrong slot");
                assert_eq!(leaf.hash & prefix_mask, prefix, "leaf under wrong prefix");
                count += 1;
            }
            let mut node_bits = branch.node_map;
            for child in &branch.children {
                let frag = node_bits.trailing_zeros();
                node_bits &= node_bits - 1;
                let child_prefix = prefix | (frag << (level * node::BITS_PER_LEVEL));
                count += check_node(child, level + 1, child_prefix, false, hasher);
            }
            count
        }
        Node::Collision(bucket) => {
            assert!(level > node::MAX_LEVEL, "buckets only appear below the last level");
            assert!(bucket.leaves.len() >= 2, "buckets hold at least two leaves");
            assert_eq!(bucket.hash, prefix, "bucket hash must match its path");
            assert!(
                bucket.leaves.windows(2).all(|w| w[0].key < w[1].key),
                "bucket leaves must be sorted by key"
            );
            for leaf in &bucket.leaves {
                assert_eq!(leaf.hash, bucket.hash);
            }
            bucket.leaves.len()
        }
    }
}

/// Returns the depth of the deepest node (root = 0).
pub fn depth(node: &Node) -> u32 {
    match node {
        Node::Branch(branch) => branch
            .children
            .iter()
            .map(|child| 1 + depth(child))
            .max()
            .unwrap_or(0),
        Node::Collision(_) => 0,
    }
}

//! Lookup: walks hash fragments down to the key.

use crate::node::{self, Node};
use crate::value::Value;

/// Searches for `key` in the subtree rooted at `node`.
///
/// Returns a reference to the value if found.
pub fn get_recursive<'a>(node: &'a Node, hash: u32, key: &str) -> Option<&'a Value> {
    match node {
        Node::Branch(branch) => {
            let bit = node::mask(node::fragment(hash, branch.level));

            if branch.data_map & bit != 0 {
                // Only one leaf can occupy a fragment, so a mismatch ends the search.
                let leaf = &branch.leaves[node::index(branch.data_map, bit)];
                (leaf.hash == hash && leaf.key == key).then_some(&leaf.value)
            } else if branch.node_map & bit != 0 {
                let child = &branch.children[node::index(branch.node_map, bit)];
                get_recursive(child, hash, key)
            } else {
                None
            }
        }
        Node::Collision(bucket) => {
            if hash != bucket.hash {
                return None;
            }
            bucket
                .leaves
                .iter()
                .find(|leaf| leaf.key == key)
                .map(|leaf| &leaf.value)
        }
    }
}

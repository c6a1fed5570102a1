//! Path-copy insertion.
//!
//! Only the nodes on the path from the root to the modified slot are
//! rebuilt; every sibling subtree and leaf is shared with the old trie.

use std::sync::Arc;

use tracing::trace;

use crate::node::{self, Branch, Bucket, Leaf, Node};

/// Outcome of a recursive insert.
pub struct InsertOutcome {
    /// The rebuilt root of the modified subtree.
    pub node: Node,
    /// `true` if a new key was inserted, `false` if an existing value was replaced.
    pub inserted: bool,
}

/// Inserts `leaf` into the subtree rooted at `node`.
pub fn insert_recursive(node: &Node, leaf: Arc<Leaf>) -> InsertOutcome {
    match node {
        Node::Branch(branch) => insert_into_branch(branch, leaf),
        Node::Collision(bucket) => insert_into_collision(bucket, leaf),
    }
}

// ---------------------------------------------------------------------------
// Branch insert
// ---------------------------------------------------------------------------

fn insert_into_branch(branch: &Branch, leaf: Arc<Leaf>) -> InsertOutcome {
    let bit = node::mask(node::fragment(leaf.hash, branch.level));
    let (data_map, node_map) = (branch.data_map, branch.node_map);

    if data_map & bit != 0 {
        let pos = node::index(data_map, bit);
        let existing = &branch.leaves[pos];

        if existing.hash == leaf.hash && existing.key == leaf.key {
            // Same key → replace the leaf.
            let leaves = node::replacing(&branch.leaves, pos, leaf);
            return InsertOutcome {
                node: branch.rebuilt(data_map, node_map, leaves, branch.children.clone()),
                inserted: false,
            };
        }

        // Different key at the same fragment → push both one level down.
        let subtree = create_subtree(Arc::clone(existing), leaf, branch.level + 1);
        let new_data_map = data_map & !bit;
        let new_node_map = node_map | bit;
        let child_pos = node::index(new_node_map, bit);

        let leaves = node::removing(&branch.leaves, pos);
        let children = node::inserting(&branch.children, child_pos, Arc::new(subtree));
        InsertOutcome {
            node: branch.rebuilt(new_data_map, new_node_map, leaves, children),
            inserted: true,
        }
    } else if node_map & bit != 0 {
        let child_pos = node::index(node_map, bit);
        let outcome = insert_recursive(&branch.children[child_pos], leaf);
        let children = node::replacing(&branch.children, child_pos, Arc::new(outcome.node));
        InsertOutcome {
            node: branch.rebuilt(data_map, node_map, branch.leaves.clone(), children),
            inserted: outcome.inserted,
        }
    } else {
        // Empty fragment → add an inline leaf.
        let new_data_map = data_map | bit;
        let at = node::index(new_data_map, bit);
        let leaves = node::inserting(&branch.leaves, at, leaf);
        InsertOutcome {
            node: branch.rebuilt(new_data_map, node_map, leaves, branch.children.clone()),
            inserted: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Collision insert
// ---------------------------------------------------------------------------

fn insert_into_collision(bucket: &Bucket, leaf: Arc<Leaf>) -> InsertOutcome {
    debug_assert_eq!(bucket.hash, leaf.hash, "bucket reached with a foreign hash");

    // Leaves stay sorted by key so that traversal order does not depend on
    // insertion history.
    match bucket
        .leaves
        .binary_search_by(|probe| probe.key.as_str().cmp(&leaf.key))
    {
        Ok(pos) => InsertOutcome {
            node: Node::Collision(Bucket {
                hash: bucket.hash,
                leaves: node::replacing(&bucket.leaves, pos, leaf),
            }),
            inserted: false,
        },
        Err(pos) => InsertOutcome {
            node: Node::Collision(Bucket {
                hash: bucket.hash,
                leaves: node::inserting(&bucket.leaves, pos, leaf),
            }),
            inserted: true,
        },
    }
}

// ---------------------------------------------------------------------------
// Subtree creation
// ---------------------------------------------------------------------------

/// Creates a subtree at `level` holding two leaves whose fragments agreed on
/// every level above it.
///
/// Descends until the fragments differ, or builds a collision bucket once
/// the hash is exhausted.
fn create_subtree(l1: Arc<Leaf>, l2: Arc<Leaf>, level: u32) -> Node {
    if level > node::MAX_LEVEL {
        trace!(hash = format_args!("{:#010x}", l1.hash), "hash exhausted, building collision bucket");
        let hash = l1.hash;
        let leaves = if l1.key < l2.key { vec![l1, l2] } else { vec![l2, l1] };
        return Node::Collision(Bucket { hash, leaves });
    }

    let f1 = node::fragment(l1.hash, level);
    let f2 = node::fragment(l2.hash, level);

    if f1 == f2 {
        let child = create_subtree(l1, l2, level + 1);
        Node::Branch(Branch {
            level,
            data_map: 0,
            node_map: node::mask(f1),
            leaves: Vec::new(),
            children: vec![Arc::new(child)],
        })
    } else {
        let leaves = if f1 < f2 { vec![l1, l2] } else { vec![l2, l1] };
        Node::Branch(Branch {
            level,
            data_map: node::mask(f1) | node::mask(f2),
            node_map: 0,
            leaves,
            children: Vec::new(),
        })
    }
}

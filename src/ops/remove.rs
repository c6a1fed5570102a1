//! Removal: path-copy delete with canonical inlining.

use std::sync::Arc;

use crate::node::{self, Branch, Bucket, Node};

/// Outcome of a recursive remove.
pub enum RemoveOutcome {
    /// Key was not found; tree unchanged.
    NotFound,
    /// Key was removed.
    Removed {
        /// New root of the modified subtree, or `None` if the subtree is now empty.
        node: Option<Node>,
    },
}

/// Removes `key` from the subtree rooted at `node`.
pub fn remove_recursive(node: &Node, hash: u32, key: &str) -> RemoveOutcome {
    match node {
        Node::Branch(branch) => remove_from_branch(branch, hash, key),
        Node::Collision(bucket) => remove_from_collision(bucket, hash, key),
    }
}

// ---------------------------------------------------------------------------
// Branch remove
// ---------------------------------------------------------------------------

fn remove_from_branch(branch: &Branch, hash: u32, key: &str) -> RemoveOutcome {
    let bit = node::mask(node::fragment(hash, branch.level));
    let (data_map, node_map) = (branch.data_map, branch.node_map);

    if data_map & bit != 0 {
        let pos = node::index(data_map, bit);
        let leaf = &branch.leaves[pos];
        if leaf.hash != hash || leaf.key != key {
            return RemoveOutcome::NotFound;
        }

        let new_data_map = data_map & !bit;
        if new_data_map == 0 && node_map == 0 {
            return RemoveOutcome::Removed { node: None };
        }

        let leaves = node::removing(&branch.leaves, pos);
        RemoveOutcome::Removed {
            node: Some(branch.rebuilt(new_data_map, node_map, leaves, branch.children.clone())),
        }
    } else if node_map & bit != 0 {
        let child_pos = node::index(node_map, bit);
        match remove_recursive(&branch.children[child_pos], hash, key) {
            RemoveOutcome::NotFound => RemoveOutcome::NotFound,
            RemoveOutcome::Removed { node: Some(child) } => {
                if let Some(sole) = child.sole_leaf() {
                    // Canonical form: a single-entry child is hoisted back into this node.
                    let new_data_map = data_map | bit;
                    let new_node_map = node_map & !bit;
                    let at = node::index(new_data_map, bit);
                    let leaves = node::inserting(&branch.leaves, at, Arc::clone(sole));
                    let children = node::removing(&branch.children, child_pos);
                    RemoveOutcome::Removed {
                        node: Some(branch.rebuilt(new_data_map, new_node_map, leaves, children)),
                    }
                } else {
                    let children = node::replacing(&branch.children, child_pos, Arc::new(child));
                    RemoveOutcome::Removed {
                        node: Some(branch.rebuilt(
                            data_map,
                            node_map,
                            branch.leaves.clone(),
                            children,
                        )),
                    }
                }
            }
            RemoveOutcome::Removed { node: None } => {
                // Child became empty; drop its slot.
                let new_node_map = node_map & !bit;
                if data_map == 0 && new_node_map == 0 {
                    return RemoveOutcome::Removed { node: None };
                }
                let children = node::removing(&branch.children, child_pos);
                RemoveOutcome::Removed {
                    node: Some(branch.rebuilt(
                        data_map,
                        new_node_map,
                        branch.leaves.clone(),
                        children,
                    )),
                }
            }
        }
    } else {
        RemoveOutcome::NotFound
    }
}

// ---------------------------------------------------------------------------
// Collision remove
// ---------------------------------------------------------------------------

fn remove_from_collision(bucket: &Bucket, hash: u32, key: &str) -> RemoveOutcome {
    if hash != bucket.hash {
        return RemoveOutcome::NotFound;
    }

    let Ok(pos) = bucket
        .leaves
        .binary_search_by(|probe| probe.key.as_str().cmp(key))
    else {
        return RemoveOutcome::NotFound;
    };

    let leaves = node::removing(&bucket.leaves, pos);
    if leaves.is_empty() {
        return RemoveOutcome::Removed { node: None };
    }
    // A bucket left with one leaf is inlined by the parent (see `Node::sole_leaf`).
    RemoveOutcome::Removed {
        node: Some(Node::Collision(Bucket {
            hash: bucket.hash,
            leaves,
        })),
    }
}

//! CHAMP trie node types and bitmap helpers.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Bits per trie level (5 → 32-way branching).
pub const BITS_PER_LEVEL: u32 = 5;

/// Deepest level that still reads hash bits (level 6 reads bits 30..32).
///
/// Keys whose hashes agree on every level up to this one end up in a
/// collision bucket below it.
pub const MAX_LEVEL: u32 = 6;

/// A stored key-value pair with its precomputed hash.
pub struct Leaf {
    /// Hash of `key` under the owning map's hasher.
    pub hash: u32,
    /// The key.
    pub key: String,
    /// The value.
    pub value: Value,
}

/// Bitmap-compressed internal node.
///
/// Invariants: `data_map & node_map == 0`, `leaves.len() == data_map.count_ones()`,
/// `children.len() == node_map.count_ones()`. Leaves precede children in
/// traversal order.
pub struct Branch {
    /// Depth of this node; the root is level 0.
    pub level: u32,
    /// Fragments occupied by inline leaves.
    pub data_map: u32,
    /// Fragments occupied by child subtrees.
    pub node_map: u32,
    /// Inline leaves, compacted in fragment order.
    pub leaves: Vec<Arc<Leaf>>,
    /// Child subtrees, compacted in fragment order.
    pub children: Vec<Arc<Node>>,
}

/// Terminal node for keys whose full 32-bit hashes are equal.
///
/// Invariant: `leaves.len() >= 2` once built by insertion, sorted by key.
pub struct Bucket {
    /// The hash shared by every leaf.
    pub hash: u32,
    /// Colliding leaves in key order.
    pub leaves: Vec<Arc<Leaf>>,
}

/// CHAMP trie node.
pub enum Node {
    /// Bitmap-compressed internal node.
    Branch(Branch),
    /// Linear node for full-hash collisions.
    Collision(Bucket),
}

// ---------------------------------------------------------------------------
// Bitmap helpers
// ---------------------------------------------------------------------------

/// Extracts the 5-bit hash fragment consumed at `level`.
#[inline]
#[must_use]
pub const fn fragment(hash: u32, level: u32) -> u32 {
    (hash >> (level * BITS_PER_LEVEL)) & 0x1F
}

/// Returns the single-bit mask for the given fragment (0..31).
#[inline]
#[must_use]
pub const fn mask(frag: u32) -> u32 {
    1 << frag
}

/// Returns the compact index of `bit` within `bitmap`.
///
/// Counts the number of set bits below `bit`.
#[inline]
#[must_use]
pub const fn index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

// ---------------------------------------------------------------------------
// Node accessors
// ---------------------------------------------------------------------------

impl Node {
    /// The empty root every map starts from.
    #[must_use]
    pub const fn empty_root() -> Self {
        Self::Branch(Branch {
            level: 0,
            data_map: 0,
            node_map: 0,
            leaves: Vec::new(),
            children: Vec::new(),
        })
    }

    /// Returns the sole leaf of a subtree that holds exactly one entry and
    /// no children. The parent inlines such subtrees after a removal.
    #[must_use]
    pub fn sole_leaf(&self) -> Option<&Arc<Leaf>> {
        match self {
            Self::Branch(branch) if branch.node_map == 0 && branch.leaves.len() == 1 => {
                branch.leaves.first()
            }
            Self::Collision(bucket) if bucket.leaves.len() == 1 => bucket.leaves.first(),
            Self::Branch(_) | Self::Collision(_) => None,
        }
    }

    /// Returns the number of inline leaves.
    #[cfg(test)]
    #[must_use]
    pub fn data_len(&self) -> usize {
        match self {
            Self::Branch(branch) => branch.leaves.len(),
            Self::Collision(bucket) => bucket.leaves.len(),
        }
    }

    /// Returns the number of child subtrees (always 0 for buckets).
    #[cfg(test)]
    #[must_use]
    pub fn children_len(&self) -> usize {
        match self {
            Self::Branch(branch) => branch.children.len(),
            Self::Collision(_) => 0,
        }
    }
}

impl Branch {
    /// Copies this node's header and slots with new bitmaps and slot vectors.
    #[must_use]
    pub const fn rebuilt(
        &self,
        data_map: u32,
        node_map: u32,
        leaves: Vec<Arc<Leaf>>,
        children: Vec<Arc<Node>>,
    ) -> Node {
        Node::Branch(Self {
            level: self.level,
            data_map,
            node_map,
            leaves,
            children,
        })
    }
}

// ---------------------------------------------------------------------------
// Slot vector builders
// ---------------------------------------------------------------------------

/// Returns a copy of `slots` with `item` inserted at `at`.
pub fn inserting<T: Clone>(slots: &[T], at: usize, item: T) -> Vec<T> {
    let mut out = Vec::with_capacity(slots.len() + 1);
    out.extend_from_slice(&slots[..at]);
    out.push(item);
    out.extend_from_slice(&slots[at..]);
    out
}

/// Returns a copy of `slots` with the element at `at` replaced by `item`.
pub fn replacing<T: Clone>(slots: &[T], at: usize, item: T) -> Vec<T> {
    let mut out = slots.to_vec();
    out[at] = item;
    out
}

/// Returns a copy of `slots` without the element at `at`.
pub fn removing<T: Clone>(slots: &[T], at: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(slots.len().saturating_sub(1));
    out.extend_from_slice(&slots[..at]);
    out.extend_from_slice(&slots[at + 1..]);
    out
}

// ---------------------------------------------------------------------------
// Debug
// ---------------------------------------------------------------------------

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(branch) => f
                .debug_struct("Branch")
                .field("level", &branch.level)
                .field("data_map", &format_args!("{:#034b}", branch.data_map))
                .field("node_map", &format_args!("{:#034b}", branch.node_map))
                .field("children", &branch.children)
                .finish_non_exhaustive(),
            Self::Collision(bucket) => f
                .debug_struct("Collision")
                .field("hash", &format_args!("{:#010x}", bucket.hash))
                .field("entries_len", &bucket.leaves.len())
                .finish(),
        }
    }
}

//! Key hashing strategies.
//!
//! The trie routes every key through a [`KeyHasher`]. A map keeps the same
//! hasher for its whole lifetime, and every map derived from it (by `set`,
//! `delete`, `copy` or decoding) inherits it.

/// Maps a string key to the 32-bit hash the trie consumes five bits at a time.
///
/// Implementations must be pure: the same key must always produce the same
/// hash for as long as any map built with the hasher is alive.
pub trait KeyHasher: Send + Sync {
    /// Hashes `key`.
    fn hash(&self, key: &str) -> u32;
}

/// CRC-32 (IEEE) hasher. The default strategy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Crc32;

impl KeyHasher for Crc32 {
    fn hash(&self, key: &str) -> u32 {
        crc32fast::hash(key.as_bytes())
    }
}

/// 32-bit FNV-1a hasher.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Fnv1a;

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

impl KeyHasher for Fnv1a {
    fn hash(&self, key: &str) -> u32 {
        key.bytes().fold(FNV_OFFSET_BASIS, |h, b| {
            (h ^ u32::from(b)).wrapping_mul(FNV_PRIME)
        })
    }
}

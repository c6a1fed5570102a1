//! Persistent JSON document map based on CHAMP.
//!
//! CHAMP (Compressed Hash-Array Mapped Prefix-tree) is a refined HAMT that
//! guarantees **canonical form**: the same set of key-value pairs always
//! produces the same trie structure, regardless of insertion order. This
//! crate uses that property to give string-keyed documents a deterministic
//! key order and a byte-stable JSON encoding.
//!
//! # Key properties
//!
//! - **Persistence**: `set`/`delete` return a new [`Map`]; the receiver and
//!   every handle derived earlier are untouched
//! - **Structural sharing**: versions share every subtree off the modified
//!   path; [`Map::copy`] is O(1)
//! - **Canonical order**: [`Map::keys`] depends only on the key set and the
//!   hasher, so equal maps encode to identical JSON
//! - **Deep diff**: [`Map::diff`] reports exactly the keys that differ
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! ```
//! use jsonchamp::Map;
//!
//! let order = Map::from_json(br#"{"pk":"order:123","payload":{"id":"123"}}"#)?;
//! assert_eq!(order.get_string("pk")?, "order:123");
//! assert_eq!(order.get_map("payload")?.get_string("id")?, "123");
//! # Ok::<(), jsonchamp::Error>(())
//! ```
//!
//! # References
//!
//! - Steindorfer & Vinju, 2015: "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015
//! - Bagwell, 2001: "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod hasher;
pub mod iter;
pub mod options;
pub mod value;

mod diff;
mod json;
mod map;
mod node;
mod ops;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use hasher::{Crc32, Fnv1a, KeyHasher};
pub use map::Map;
pub use options::MapOptions;
pub use value::{Value, ValueKind};

//! Trie descents: lookup, path-copying insert and path-copying remove.

pub mod get;
pub mod insert;
pub mod remove;

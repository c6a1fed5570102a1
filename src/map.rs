//! Persistent map handle.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::hasher::KeyHasher;
use crate::iter::{Iter, Keys, Values};
use crate::node::{Leaf, Node};
use crate::ops::get::get_recursive;
use crate::ops::insert::insert_recursive;
use crate::ops::remove::{RemoveOutcome, remove_recursive};
use crate::options::{MapOptions, default_hasher};
use crate::value::{Value, ValueKind, exact_int};

/// Immutable string-keyed map backed by a CHAMP trie.
///
/// Every "mutation" returns a new handle; the receiver is never changed.
/// Old and new handles share every subtree off the modified path, so
/// cloning is O(1) and a `set` or `delete` copies at most one node per
/// trie level.
///
/// ```
/// use jsonchamp::Map;
///
/// let v1 = Map::new().set("id", "123");
/// let v2 = v1.set("qty", 3);
/// assert!(!v1.contains("qty"));
/// assert_eq!(v2.get_int("qty"), Ok(3));
/// ```
#[derive(Clone)]
pub struct Map {
    root: Arc<Node>,
    hasher: Arc<dyn KeyHasher>,
    len: usize,
}

// ---------------------------------------------------------------------------
// Construction & accessors
// ---------------------------------------------------------------------------

impl Map {
    /// Creates an empty map using the default hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(default_hasher())
    }

    /// Creates an empty map from `options`.
    #[must_use]
    pub fn with_options(options: &MapOptions) -> Self {
        Self::with_hasher(Arc::clone(options.hasher()))
    }

    pub(crate) fn with_hasher(hasher: Arc<dyn KeyHasher>) -> Self {
        Self {
            root: Arc::new(Node::empty_root()),
            hasher,
            len: 0,
        }
    }

    /// Creates an empty map sharing this map's hasher.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self::with_hasher(Arc::clone(&self.hasher))
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a handle to the same contents. O(1): the trie is shared.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns `true` if both maps route keys through the same hasher instance.
    #[must_use]
    pub fn same_hasher(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.hasher, &other.hasher)
    }

    /// Returns `true` if both handles point at the same trie.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    pub(crate) fn root(&self) -> &Node {
        &self.root
    }

    pub(crate) fn hasher(&self) -> &Arc<dyn KeyHasher> {
        &self.hasher
    }
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

impl Map {
    /// Returns a reference to the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        get_recursive(&self.root, self.hasher.hash(key), key)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn lookup(&self, key: &str) -> Result<&Value> {
        self.get(key).ok_or_else(|| Error::KeyNotFound {
            key: key.to_owned(),
        })
    }

    /// Returns the string stored under `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if absent, [`Error::TypeMismatch`] if the value
    /// is not a string.
    pub fn get_string(&self, key: &str) -> Result<&str> {
        match self.lookup(key)? {
            Value::String(s) => Ok(s),
            other => Err(mismatch(key, ValueKind::String, other)),
        }
    }

    /// Returns the integer stored under `key`.
    ///
    /// Accepts [`Value::Int`] and any [`Value::Number`] that holds an exact
    /// integer, since decoded JSON numbers are always floats.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if absent, [`Error::NotIntegral`] for a
    /// fractional, non-finite or out-of-range number, [`Error::TypeMismatch`]
    /// for any other kind.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        match self.lookup(key)? {
            Value::Int(i) => Ok(*i),
            Value::Number(n) => exact_int(*n).ok_or_else(|| Error::NotIntegral {
                key: key.to_owned(),
                value: *n,
            }),
            other => Err(mismatch(key, ValueKind::Int, other)),
        }
    }

    /// Returns the float stored under `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if absent, [`Error::TypeMismatch`] if the value
    /// is not a [`Value::Number`].
    pub fn get_float(&self, key: &str) -> Result<f64> {
        match self.lookup(key)? {
            Value::Number(n) => Ok(*n),
            other => Err(mismatch(key, ValueKind::Number, other)),
        }
    }

    /// Returns the boolean stored under `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if absent, [`Error::TypeMismatch`] if the value
    /// is not a boolean.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.lookup(key)? {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(key, ValueKind::Bool, other)),
        }
    }

    /// Returns the nested map stored under `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if absent, [`Error::TypeMismatch`] if the value
    /// is not a map.
    pub fn get_map(&self, key: &str) -> Result<&Self> {
        match self.lookup(key)? {
            Value::Map(m) => Ok(m),
            other => Err(mismatch(key, ValueKind::Map, other)),
        }
    }

    /// Returns the string array stored under `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if absent, [`Error::TypeMismatch`] if the value
    /// is not a string array.
    pub fn get_string_array(&self, key: &str) -> Result<&[String]> {
        match self.lookup(key)? {
            Value::StringArray(items) => Ok(items),
            other => Err(mismatch(key, ValueKind::StringArray, other)),
        }
    }

    /// Returns the array of maps stored under `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if absent, [`Error::TypeMismatch`] if the value
    /// is not a map array.
    pub fn get_map_array(&self, key: &str) -> Result<&[Self]> {
        match self.lookup(key)? {
            Value::MapArray(maps) => Ok(maps),
            other => Err(mismatch(key, ValueKind::MapArray, other)),
        }
    }
}

fn mismatch(key: &str, expected: ValueKind, actual: &Value) -> Error {
    Error::TypeMismatch {
        key: key.to_owned(),
        expected,
        actual: actual.kind(),
    }
}


// ---------------------------------------------------------------------------
// Write operations
// ---------------------------------------------------------------------------

impl Map {
    /// Returns a new map with `key` bound to `value`.
    ///
    /// An existing binding for `key` is replaced in the new map only.
    #[must_use]
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let leaf = Arc::new(Leaf {
            hash: self.hasher.hash(&key),
            key,
            value: value.into(),
        });
        let outcome = insert_recursive(&self.root, leaf);
        Self {
            root: Arc::new(outcome.node),
            hasher: Arc::clone(&self.hasher),
            len: self.len + usize::from(outcome.inserted),
        }
    }

    /// Returns a new map without `key`, and whether `key` was present.
    ///
    /// When `key` is absent the returned map shares this map's root.
    #[must_use]
    pub fn delete(&self, key: &str) -> (Self, bool) {
        match remove_recursive(&self.root, self.hasher.hash(key), key) {
            RemoveOutcome::NotFound => (self.clone(), false),
            RemoveOutcome::Removed { node } => {
                let root = node.unwrap_or_else(Node::empty_root);
                let map = Self {
                    root: Arc::new(root),
                    hasher: Arc::clone(&self.hasher),
                    len: self.len - 1,
                };
                (map, true)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Iteration
// ---------------------------------------------------------------------------

impl Map {
    /// Returns an iterator over `(key, value)` pairs in canonical order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.root, self.len)
    }

    /// Returns the keys in canonical order.
    ///
    /// Two maps holding the same keys under the same hasher yield the same
    /// sequence, whatever order the keys were inserted in.
    #[must_use]
    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self.iter())
    }

    /// Returns the values in canonical key order.
    #[must_use]
    pub fn values(&self) -> Values<'_> {
        Values::new(self.iter())
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Map {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            *self = self.set(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

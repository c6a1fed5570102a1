//! Deep comparison of maps.

use crate::map::Map;
use crate::value::Value;

impl Map {
    /// Returns the keys on which `self` and `other` disagree.
    ///
    /// A key lands in the result when it is missing from one side or bound
    /// to unequal values (see [`Value`]'s `PartialEq`). The bound value is:
    ///
    /// - the recursive diff, when both sides hold maps;
    /// - otherwise `other`'s value, when `other` has the key;
    /// - otherwise `self`'s value.
    ///
    /// An empty result means the maps are deeply equal.
    ///
    /// ```
    /// use jsonchamp::Map;
    ///
    /// let a = Map::new().set("id", "1").set("qty", 2);
    /// let b = a.set("qty", 3);
    /// assert!(a.diff(&a).is_empty());
    /// assert_eq!(a.diff(&b).keys().collect::<Vec<_>>(), ["qty"]);
    /// ```
    #[must_use]
    pub fn diff(&self, other: &Self) -> Self {
        let mut out = self.empty_like();
        if self.same_hasher(other) && self.ptr_eq(other) {
            return out;
        }

        for (key, ours) in self {
            match other.get(key) {
                None => out = out.set(key, ours.clone()),
                Some(theirs) => {
                    if let Some(changed) = value_diff(ours, theirs) {
                        out = out.set(key, changed);
                    }
                }
            }
        }
        for (key, theirs) in other {
            if !self.contains(key) {
                out = out.set(key, theirs.clone());
            }
        }
        out
    }
}

/// Returns what differs between two values bound to the same key, or `None`
/// if they are equal.
fn value_diff(ours: &Value, theirs: &Value) -> Option<Value> {
    match (ours, theirs) {
        (Value::Map(a), Value::Map(b)) => {
            let nested = a.diff(b);
            (!nested.is_empty()).then_some(Value::Map(nested))
        }
        _ if ours == theirs => None,
        _ => Some(theirs.clone()),
    }
}

/// Deep equality: same length and every entry bound to an equal value.
impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if self.same_hasher(other) && self.ptr_eq(other) {
            return true;
        }
        self.iter()
            .all(|(key, ours)| other.get(key).is_some_and(|theirs| ours == theirs))
    }
}

//! Values stored in a [`Map`].

use std::fmt;

use crate::map::Map;

/// A value stored under a map key.
///
/// The variant set is closed: it covers everything the JSON codec can
/// write and read back.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// JSON `null`.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer. Set by callers; the decoder never produces it.
    Int(i64),
    /// A 64-bit float. Every decoded JSON number lands here.
    Number(f64),
    /// A string.
    String(String),
    /// An array of strings.
    StringArray(Vec<String>),
    /// A nested map (JSON object).
    Map(Map),
    /// An array of nested maps (JSON array of objects).
    MapArray(Vec<Map>),
}

/// The kind of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`].
    Null,
    /// [`Value::Bool`].
    Bool,
    /// [`Value::Int`].
    Int,
    /// [`Value::Number`].
    Number,
    /// [`Value::String`].
    String,
    /// [`Value::StringArray`].
    StringArray,
    /// [`Value::Map`].
    Map,
    /// [`Value::MapArray`].
    MapArray,
}

impl ValueKind {
    /// Returns the lowercase name used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Number => "number",
            Self::String => "string",
            Self::StringArray => "string array",
            Self::Map => "map",
            Self::MapArray => "map array",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::StringArray(_) => ValueKind::StringArray,
            Self::Map(_) => ValueKind::Map,
            Self::MapArray(_) => ValueKind::MapArray,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the nested map, if any.
    #[must_use]
    pub const fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Equality
// ---------------------------------------------------------------------------

/// Equality as observed through JSON: an `Int` equals a `Number` holding the
/// same quantity, two NaNs are equal, and empty arrays are equal whatever
/// their element kind. Maps compare deeply.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Int(i), Self::Number(n)) | (Self::Number(n), Self::Int(i)) => {
                int_equals_number(*i, *n)
            }
            (Self::String(a), Self::String(b)) => a == b,
            (Self::StringArray(a), Self::StringArray(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::MapArray(a), Self::MapArray(b)) => a == b,
            (Self::StringArray(s), Self::MapArray(m)) | (Self::MapArray(m), Self::StringArray(s)) => {
                s.is_empty() && m.is_empty()
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Integral numbers
// ---------------------------------------------------------------------------

/// Integral floats below this magnitude (2^53) are written without a fraction.
pub(crate) const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// 2^63; `i64::MAX as f64` rounds up to this value.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Converts `n` to `i64` if it is an exact integer within range.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub(crate) fn exact_int(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0 && (-I64_LIMIT..I64_LIMIT).contains(&n)).then_some(n as i64)
}

/// Returns `true` if `n` is exactly the integer `i`.
fn int_equals_number(i: i64, n: f64) -> bool {
    exact_int(n) == Some(i)
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::StringArray(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Self::StringArray(items.into_iter().map(str::to_owned).collect())
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Self::Map(m)
    }
}

impl From<Vec<Map>> for Value {
    fn from(maps: Vec<Map>) -> Self {
        Self::MapArray(maps)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

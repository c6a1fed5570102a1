//! JSON codec.
//!
//! Maps serialize as JSON objects with keys in canonical order, so equal
//! maps always encode to identical bytes. Decoding streams tokens straight
//! into the trie through serde visitors; no intermediate document tree is
//! built.
//!
//! Decoded shapes:
//!
//! | JSON                  | [`Value`]                    |
//! |-----------------------|------------------------------|
//! | string                | `String`                     |
//! | number                | `Number`                     |
//! | `true` / `false`      | `Bool`                       |
//! | `null`                | `Null`                       |
//! | object                | `Map`                        |
//! | `[]`                  | `StringArray` (empty)        |
//! | array of strings      | `StringArray`                |
//! | array of objects      | `MapArray`                   |
//!
//! Arrays holding numbers, booleans, nulls, nested arrays, or a mix of
//! strings and objects are rejected with [`Error::UnexpectedToken`].

use std::fmt;
use std::sync::Arc;

use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::error::Category;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::hasher::KeyHasher;
use crate::map::Map;
use crate::options::{MapOptions, default_hasher};
use crate::value::{MAX_EXACT_INT, Value};

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

impl Map {
    /// Encodes the map as a JSON object.
    ///
    /// ```
    /// use jsonchamp::Map;
    ///
    /// let doc = Map::new().set("a", 1.0).set("b", Map::new().set("c", true));
    /// assert_eq!(doc.to_json().unwrap(), br#"{"a":1,"b":{"c":true}}"#);
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] if a value has no JSON representation
    /// (NaN or infinite numbers).
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::UnsupportedType(e.to_string()))
    }

    /// Encodes the map as a JSON string.
    ///
    /// # Errors
    ///
    /// Same as [`to_json`](Self::to_json).
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::UnsupportedType(e.to_string()))
    }

    /// Decodes a JSON object using the default hasher.
    ///
    /// # Errors
    ///
    /// See [`from_json_with`](Self::from_json_with).
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Self::from_json_with(bytes, &MapOptions::default())
    }

    /// Decodes a JSON object; the map and every nested map use the hasher
    /// from `options`.
    ///
    /// No partial map is returned on failure.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDocument`] if the top level is not an object or the
    /// input is malformed; [`Error::UnexpectedToken`] for well-formed JSON
    /// the value model cannot hold.
    pub fn from_json_with(bytes: &[u8], options: &MapOptions) -> Result<Self> {
        trace!(len = bytes.len(), "decoding map");
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => {}
            Some(&other) => {
                return Err(rejected(Error::InvalidDocument(format!(
                    "expected object, found {:?}",
                    char::from(other)
                ))));
            }
            None => {
                return Err(rejected(Error::InvalidDocument("empty input".to_owned())));
            }
        }

        let mut de = serde_json::Deserializer::from_slice(bytes);
        let map = MapSeed::new(Arc::clone(options.hasher()))
            .deserialize(&mut de)
            .map_err(decode_error)?;
        de.end().map_err(decode_error)?;
        Ok(map)
    }
}

fn decode_error(err: serde_json::Error) -> Error {
    let error = match err.classify() {
        Category::Data => Error::UnexpectedToken(err.to_string()),
        _ => Error::InvalidDocument(err.to_string()),
    };
    rejected(error)
}

fn rejected(error: Error) -> Error {
    debug!(%error, "rejected JSON document");
    error
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

impl Serialize for Map {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut object = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            object.serialize_entry(key, value)?;
        }
        object.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Number(n) => serialize_number(*n, serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::StringArray(items) => items.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
            Self::MapArray(maps) => maps.serialize(serializer),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn serialize_number<S: Serializer>(n: f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if !n.is_finite() {
        return Err(ser::Error::custom(format_args!("non-finite number {n}")));
    }
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

impl<'de> Deserialize<'de> for Map {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        MapSeed::new(default_hasher()).deserialize(deserializer)
    }
}

/// Decodes a JSON object into a map built with a fixed hasher.
struct MapSeed {
    hasher: Arc<dyn KeyHasher>,
}

impl MapSeed {
    const fn new(hasher: Arc<dyn KeyHasher>) -> Self {
        Self { hasher }
    }
}

impl<'de> DeserializeSeed<'de> for MapSeed {
    type Value = Map;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Map, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for MapSeed {
    type Value = Map;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Map, A::Error> {
        let mut map = Map::with_hasher(Arc::clone(&self.hasher));
        while let Some(key) = access.next_key::<String>()? {
            let value = access.next_value_seed(ValueSeed {
                hasher: &self.hasher,
            })?;
            map = map.set(key, value);
        }
        Ok(map)
    }
}

/// Decodes any supported JSON value.
struct ValueSeed<'h> {
    hasher: &'h Arc<dyn KeyHasher>,
}

impl<'de> DeserializeSeed<'de> for ValueSeed<'_> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ValueSeed<'_> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean, null, object or array")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> std::result::Result<Value, A::Error> {
        MapSeed::new(Arc::clone(self.hasher))
            .visit_map(access)
            .map(Value::Map)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let element = || ElementSeed {
            hasher: self.hasher,
        };
        let Some(first) = seq.next_element_seed(element())? else {
            return Ok(Value::StringArray(Vec::new()));
        };

        match first {
            Element::String(s) => {
                let mut items = vec![s];
                while let Some(next) = seq.next_element_seed(element())? {
                    match next {
                        Element::String(s) => items.push(s),
                        Element::Map(_) => {
                            return Err(de::Error::custom("object in an array of strings"));
                        }
                    }
                }
                Ok(Value::StringArray(items))
            }
            Element::Map(m) => {
                let mut maps = vec![m];
                while let Some(next) = seq.next_element_seed(element())? {
                    match next {
                        Element::Map(m) => maps.push(m),
                        Element::String(_) => {
                            return Err(de::Error::custom("string in an array of objects"));
                        }
                    }
                }
                Ok(Value::MapArray(maps))
            }
        }
    }
}

/// An array element: arrays hold either strings or objects.
enum Element {
    String(String),
    Map(Map),
}

/// Decodes one array element; any kind other than string or object is an
/// `invalid type` error from serde's default visitor methods.
struct ElementSeed<'h> {
    hasher: &'h Arc<dyn KeyHasher>,
}

impl<'de> DeserializeSeed<'de> for ElementSeed<'_> {
    type Value = Element;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Element, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ElementSeed<'_> {
    type Value = Element;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or an object")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Element, E> {
        Ok(Element::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Element, E> {
        Ok(Element::String(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> std::result::Result<Element, A::Error> {
        MapSeed::new(Arc::clone(self.hasher))
            .visit_map(access)
            .map(Element::Map)
    }
}

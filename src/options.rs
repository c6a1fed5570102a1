//! Map construction options.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::hasher::{Crc32, KeyHasher};
use crate::map::Map;

/// Process-wide default hasher, installed on first use.
static DEFAULT_HASHER: LazyLock<Arc<dyn KeyHasher>> = LazyLock::new(|| Arc::new(Crc32));

/// Returns the shared default hasher.
pub(crate) fn default_hasher() -> Arc<dyn KeyHasher> {
    Arc::clone(&DEFAULT_HASHER)
}

/// Configuration for new maps.
///
/// ```
/// use jsonchamp::{Fnv1a, MapOptions};
///
/// let map = MapOptions::new().with_hasher(Fnv1a).build().set("id", "123");
/// assert_eq!(map.get_string("id"), Ok("123"));
/// ```
#[derive(Clone)]
pub struct MapOptions {
    hasher: Arc<dyn KeyHasher>,
}

impl MapOptions {
    /// Options using the default hasher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hasher: default_hasher(),
        }
    }

    /// Replaces the hasher.
    #[must_use]
    pub fn with_hasher<H: KeyHasher + 'static>(mut self, hasher: H) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    /// Returns the configured hasher.
    #[must_use]
    pub const fn hasher(&self) -> &Arc<dyn KeyHasher> {
        &self.hasher
    }

    /// Creates an empty map with these options.
    #[must_use]
    pub fn build(&self) -> Map {
        Map::with_options(self)
    }
}

impl Default for MapOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapOptions")
            .field(
                "default_hasher",
                &Arc::ptr_eq(&self.hasher, &*DEFAULT_HASHER),
            )
            .finish_non_exhaustive()
    }
}

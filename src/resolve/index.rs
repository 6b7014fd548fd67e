use std::sync::Arc;

use ahash::AHashMap;

use super::normalize::{normalize, squash};

/// Lookup table from loosened spellings of score keys back to the canonical key.
///
/// Each key is registered under four spellings: lowercase, lowercase without
/// spaces, normalized lowercase, and normalized lowercase without spaces.
/// When two keys reduce to the same spelling the later key wins.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: AHashMap<String, Arc<str>>,
}

impl NameIndex {
    #[inline] pub fn get(&self, spelling: &str) -> Option<&str> { self.entries.get(spelling).map(|k| &**k) }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Build a [`NameIndex`] over `keys`, in iteration order.
pub fn build_index<'a, I>(keys: I) -> NameIndex
where
    I: IntoIterator<Item = &'a str>,
{
    let mut entries = AHashMap::new();
    for key in keys {
        let canonical: Arc<str> = Arc::from(key);
        let normalized = normalize(key).to_lowercase();
        for spelling in [key.to_lowercase(), squash(key), squash(&normalized), normalized] {
            entries.insert(spelling, canonical.clone());
        }
    }
    NameIndex { entries }
}

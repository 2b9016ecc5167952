// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint tag dictionary

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Immutable string-to-string metadata attached to one footprint.
///
/// Keys are never guaranteed to be present; every lookup returns an
/// `Option`. An empty value is treated the same as an absent key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagMap(FxHashMap<String, String>);

impl TagMap {
    pub fn new() -> Self {
        Self(FxHashMap::default())
    }

    /// Build a tag map from key/value pairs
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Value for `key`, or `None` when the key is absent or its value is empty
    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries sorted by key, for stable display
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_empty_are_none() {
        let tags = TagMap::from_pairs([("building", "yes"), ("height", "")]);
        assert_eq!(tags.get("building"), Some("yes"));
        assert_eq!(tags.get("height"), None);
        assert_eq!(tags.get("colour"), None);
        assert!(!tags.contains("height"));
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let tags: TagMap =
            serde_json::from_str(r#"{"building":"apartments","building:levels":"9"}"#).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("building:levels"), Some("9"));
    }

    #[test]
    fn test_sorted_entries() {
        let tags: TagMap = [("height", "9"), ("building", "yes"), ("colour", "red")]
            .into_iter()
            .collect();
        let keys: Vec<_> = tags.sorted().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["building", "colour", "height"]);
    }
}

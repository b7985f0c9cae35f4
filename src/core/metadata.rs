//! Material metadata and the pipeline target list encoding.
//!
//! Published materials carry free-form string attributes. One of them (by
//! default [`PIPELINE_ATTRIBUTE`]) holds the names of the objects the
//! material was applied to at publish time, joined with [`TARGET_SEPARATOR`].

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// Default attribute name holding the recorded object list.
pub const PIPELINE_ATTRIBUTE: &str = "LOOK_ASSIGNER_NODE_LIST";

/// Separator between recorded object names in the raw attribute value.
pub const TARGET_SEPARATOR: &str = ", ";

/// Metadata storage - ordered key-value pairs of strings.
///
/// Uses SmallVec optimization for common case of few entries.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MetaData {
    entries: SmallVec<[(String, String); 4]>,
}

impl MetaData {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a metadata value, replacing any existing value for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        for (k, v) in &mut self.entries {
            if k == &key {
                *v = value;
                return;
            }
        }
        self.entries.push((key, value));
    }

    /// Get a metadata value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decoded pipeline targets stored under `attribute`.
    ///
    /// `None` when the attribute is absent. An attribute set to the empty
    /// string is still present and yields an empty list.
    pub fn pipeline_targets(&self, attribute: &str) -> Option<Vec<String>> {
        self.get(attribute).map(decode_targets)
    }

    /// Store `targets` under `attribute` in the raw joined form.
    pub fn set_pipeline_targets<S: AsRef<str>>(&mut self, attribute: &str, targets: &[S]) {
        self.set(attribute, encode_targets(targets));
    }
}

impl fmt::Debug for MetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

// Documents store metadata as a JSON object; entry order is preserved.
impl Serialize for MetaData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MetaData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetaDataVisitor;

        impl<'de> Visitor<'de> for MetaDataVisitor {
            type Value = MetaData;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of string attributes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<MetaData, A::Error> {
                let mut meta = MetaData::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    meta.set(k, v);
                }
                Ok(meta)
            }
        }

        deserializer.deserialize_map(MetaDataVisitor)
    }
}

/// Join recorded object names into the raw attribute form.
pub fn encode_targets<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(TARGET_SEPARATOR)
}

/// Split a raw attribute value into recorded object names.
///
/// Empty segments are dropped, so `""` decodes to no targets. A name that
/// itself contained the separator when encoded comes back as several names;
/// see [`find_ambiguous_targets`].
pub fn decode_targets(raw: &str) -> Vec<String> {
    raw.split(TARGET_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names that cannot be encoded unambiguously.
pub fn find_ambiguous_targets<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| s.contains(TARGET_SEPARATOR))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_basic() {
        let mut meta = MetaData::new();
        meta.set("key1", "value1");
        meta.set("key2", "value2");

        assert_eq!(meta.get("key1"), Some("value1"));
        assert_eq!(meta.get("key2"), Some("value2"));
        assert_eq!(meta.get("key3"), None);
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn test_metadata_update() {
        let mut meta = MetaData::new();
        meta.set("key", "value1");
        meta.set("key", "value2");

        assert_eq!(meta.get("key"), Some("value2"));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn test_decode_targets() {
        assert_eq!(decode_targets("Torso, Head, L_Arm"), vec!["Torso", "Head", "L_Arm"]);
        assert_eq!(decode_targets("Torso"), vec!["Torso"]);
        assert!(decode_targets("").is_empty());
        // No trimming: only the exact separator splits.
        assert_eq!(decode_targets("A,B"), vec!["A,B"]);
    }

    #[test]
    fn test_empty_attribute_is_still_pipelined() {
        let mut meta = MetaData::new();
        assert_eq!(meta.pipeline_targets(PIPELINE_ATTRIBUTE), None);

        meta.set(PIPELINE_ATTRIBUTE, "");
        assert_eq!(meta.pipeline_targets(PIPELINE_ATTRIBUTE), Some(Vec::new()));
    }

    #[test]
    fn test_separator_in_name_is_ambiguous() {
        let names = ["Body", "Hat, Left"];
        assert_eq!(find_ambiguous_targets(&names), vec!["Hat, Left"]);

        // Known limitation: the name splits apart on the way back.
        let raw = encode_targets(&names);
        assert_eq!(decode_targets(&raw), vec!["Body", "Hat", "Left"]);
    }

    #[test]
    fn test_metadata_json_preserves_order() {
        let mut meta = MetaData::new();
        meta.set("zeta", "1");
        meta.set("alpha", "2");

        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"2"}"#);

        let parsed: MetaData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, meta);
    }
}

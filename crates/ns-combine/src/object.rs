//! Metadata shared by every row of a combined model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bookkeeping fields identifying where an object sits in the combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Category (datacard bin) name.
    pub bin: String,
    /// Numeric category id.
    pub bin_id: i32,
    /// Process name.
    pub process: String,
    /// Analysis tag.
    pub analysis: String,
    /// Data-taking era.
    pub era: String,
    /// Decay channel.
    pub channel: String,
    /// Mass hypothesis, kept as text (`"125"`, `"*"`).
    pub mass: String,
    /// Free-form extra attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Metadata for `process` in category `bin`.
    pub fn new(bin: impl Into<String>, process: impl Into<String>) -> Self {
        Self { bin: bin.into(), process: process.into(), ..Self::default() }
    }

    /// Look up an extra attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Set (or overwrite) an extra attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove an extra attribute, returning its old value.
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }
}

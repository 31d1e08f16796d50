//! Record types exchanged between the pipeline stages.

use serde::{Deserialize, Serialize};

/// A single key/value record.
///
/// On disk each record is one JSON object with the fields `Key` and `Value`,
/// e.g. `{"Key":"1","Value":"a"}`. A missing field decodes as the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyValue {
    #[serde(rename = "Key", default)]
    pub key: String,
    #[serde(rename = "Value", default)]
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// All values of one run of adjacent equal-key records.
///
/// Borrowed from the sorted collection and dropped once the reducer has
/// produced its output for the run.
#[derive(Debug, PartialEq, Eq)]
pub struct Group<'a> {
    pub key: &'a str,
    pub values: Vec<&'a str>,
}

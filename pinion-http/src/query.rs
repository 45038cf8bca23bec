//! Query string flags.

use std::collections::HashMap;

use serde::Deserialize;

/// A query value: scalar or bracket-syntax array.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Value {
    /// Single `key=value` occurrence.
    Scalar(String),
    /// `key[]=a&key[]=b` occurrences.
    Array(Vec<String>),
}

impl Value {
    /// All occurrences as a list.
    pub fn inner(&self) -> Vec<String> {
        match self {
            Value::Scalar(value) => vec![value.to_owned()],
            Value::Array(values) => values.to_owned(),
        }
    }
}

/// Parses a query string into a map. Malformed input yields an empty
/// map.
pub fn parse(value: &str) -> HashMap<String, Value> {
    serde_qs::Config::new(5, false)
        .deserialize_str(value)
        .unwrap_or_default()
}

/// Whether the query string requests the raw, unbundled asset body.
///
/// The flag is spelled `body=1` or `body=true`; any value starting with
/// `1` or `t` counts. Anything else, including a malformed query string,
/// leaves bundling on.
pub fn raw_requested(query: &str) -> bool {
    parse(query)
        .get("body")
        .map(|value| {
            value
                .inner()
                .iter()
                .any(|flag| flag.starts_with('1') || flag.starts_with('t'))
        })
        .unwrap_or(false)
}

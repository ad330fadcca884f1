//! Transport envelope attributes.

use crate::message::{now_rfc3339, PUBLISHER_NAME};
use std::collections::HashMap;

/// String metadata sent alongside a message body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(HashMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add `published_at` and `publisher` unless the caller already set them.
    pub fn with_defaults(mut self) -> Self {
        self.0
            .entry("published_at".to_string())
            .or_insert_with(now_rfc3339);
        self.0
            .entry("publisher".to_string())
            .or_insert_with(|| PUBLISHER_NAME.to_string());
        self
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl From<HashMap<String, String>> for Attributes {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

//! Event parameter bundles.

use serde::{Serialize, Serializer};

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BundleValue {
    String(String),
    Double(f64),
    Long(i64),
    Int(i32),
    BundleList(Vec<Bundle>),
}

/// Ordered parameter bundle handed to [`AnalyticsClient::log_event`].
///
/// Keys are unique: putting an existing key replaces its value in place.
/// The `put_*` helpers skip absent values entirely, so a key is present
/// if and only if its source carried a value.
///
/// [`AnalyticsClient::log_event`]: crate::AnalyticsClient::log_event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    entries: Vec<(String, BundleValue)>,
}

impl Bundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: BundleValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Put a string if present.
    pub fn put_string(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.insert(key, BundleValue::String(value.to_string()));
        }
        self
    }

    /// Put a double if present.
    pub fn put_double(mut self, key: &str, value: Option<f64>) -> Self {
        if let Some(value) = value {
            self.insert(key, BundleValue::Double(value));
        }
        self
    }

    /// Put a long if present.
    pub fn put_long(mut self, key: &str, value: Option<i64>) -> Self {
        if let Some(value) = value {
            self.insert(key, BundleValue::Long(value));
        }
        self
    }

    /// Put an int if present.
    pub fn put_int(mut self, key: &str, value: Option<i32>) -> Self {
        if let Some(value) = value {
            self.insert(key, BundleValue::Int(value));
        }
        self
    }

    /// Put a list of nested bundles unless it is empty.
    pub fn put_bundle_list(mut self, key: &str, value: Vec<Bundle>) -> Self {
        if !value.is_empty() {
            self.insert(key, BundleValue::BundleList(value));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&BundleValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(BundleValue::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(BundleValue::Double(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(BundleValue::Long(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.get(key) {
            Some(BundleValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_bundle_list(&self, key: &str) -> Option<&[Bundle]> {
        match self.get(key) {
            Some(BundleValue::BundleList(value)) => Some(value.as_slice()),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BundleValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Bundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(key, value)| (key, value)))
    }
}

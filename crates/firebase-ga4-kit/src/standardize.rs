//! Name and value standardization.
//!
//! Firebase rejects event names, parameter keys and user property names
//! that fall outside its naming rules. Everything the kit forwards goes
//! through [`standardize_name`] and [`standardize_value`] first, so no
//! outbound call is ever rejected for its shape.

use crate::constants::{
    EVENT_MAX_PARAMETERS, EVENT_NAME_MAX_LENGTH, EVENT_VALUE_MAX_LENGTH, FORBIDDEN_PREFIXES,
    USER_ATTRIBUTE_NAME_MAX_LENGTH, USER_ATTRIBUTE_VALUE_MAX_LENGTH,
};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Standardize an event name (`event == true`) or a user attribute name.
///
/// Steps, in order:
/// 1. drop every character that is not an ASCII letter, digit, `_` or whitespace
/// 2. collapse each whitespace run into a single `_`
/// 3. strip the first matching forbidden prefix (`google_`, `firebase_`, `ga_`), once
/// 4. strip leading characters until the name starts with a letter
/// 5. truncate to 40 (event) or 24 (attribute) characters
///
/// The result may be empty. `None` passes through unchanged.
///
/// ```
/// use firebase_ga4_kit::standardize_name;
///
/// assert_eq!(standardize_name("firebase_event_name", true).as_deref(), Some("event_name"));
/// assert_eq!(standardize_name("event  name ", false).as_deref(), Some("event_name_"));
/// assert_eq!(standardize_name(None, true), None);
/// ```
pub fn standardize_name<'a>(name: impl Into<Option<&'a str>>, event: bool) -> Option<String> {
    name.into().map(|name| clean_name(name, event))
}

/// Truncate a value to 100 (event) or 36 (attribute) characters.
///
/// No other transformation is applied. `None` passes through unchanged.
pub fn standardize_value<'a>(value: impl Into<Option<&'a str>>, event: bool) -> Option<String> {
    let max_len = if event {
        EVENT_VALUE_MAX_LENGTH
    } else {
        USER_ATTRIBUTE_VALUE_MAX_LENGTH
    };
    value.into().map(|value| truncate_chars(value, max_len))
}

fn clean_name(name: &str, event: bool) -> String {
    let mut cleaned = String::with_capacity(name.len());
    let mut pending_whitespace = false;

    for c in name.chars() {
        if is_name_whitespace(c) {
            pending_whitespace = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_whitespace {
                cleaned.push('_');
                pending_whitespace = false;
            }
            cleaned.push(c);
        }
        // Anything else is dropped without breaking a whitespace run.
    }
    if pending_whitespace {
        cleaned.push('_');
    }

    if let Some(prefix) = FORBIDDEN_PREFIXES
        .iter()
        .find(|prefix| cleaned.starts_with(**prefix))
    {
        cleaned.replace_range(..prefix.len(), "");
    }

    let first_letter = cleaned
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(cleaned.len());
    cleaned.replace_range(..first_letter, "");

    // Only ASCII survives the filter above, so byte truncation is safe.
    cleaned.truncate(if event {
        EVENT_NAME_MAX_LENGTH
    } else {
        USER_ATTRIBUTE_NAME_MAX_LENGTH
    });
    cleaned
}

fn is_name_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

fn truncate_chars(value: &str, max_len: usize) -> String {
    match value.char_indices().nth(max_len) {
        Some((end, _)) => value[..end].to_string(),
        None => value.to_string(),
    }
}

/// Caller-supplied rewrite applied to every raw name before the built-in rules.
pub trait NameStandardizer: Send + Sync {
    fn standardize(&self, name: &str) -> String;
}

impl<F> NameStandardizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn standardize(&self, name: &str) -> String {
        self(name)
    }
}

/// Name and value standardization with an optional caller hook.
#[derive(Clone, Default)]
pub struct Standardizer {
    hook: Option<Arc<dyn NameStandardizer>>,
}

impl fmt::Debug for Standardizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Standardizer")
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl Standardizer {
    /// Create a standardizer with only the built-in rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a standardizer that runs `hook` before the built-in rules.
    pub fn with_hook(hook: Arc<dyn NameStandardizer>) -> Self {
        Self { hook: Some(hook) }
    }

    /// Standardize a name, applying the hook first when one is set.
    pub fn name(&self, name: &str, event: bool) -> String {
        match &self.hook {
            Some(hook) => clean_name(&hook.standardize(name), event),
            None => clean_name(name, event),
        }
    }

    /// Standardize a value.
    pub fn value(&self, value: &str, event: bool) -> String {
        standardize_value(value, event).unwrap_or_default()
    }

    /// Standardize every entry of an attribute map.
    ///
    /// Entries whose name standardizes to the empty string are dropped.
    /// When two names collide, the one whose raw key sorts last wins.
    /// In event mode at most 100 entries are kept: keys are ordered
    /// case-insensitively and everything past the limit is dropped.
    pub fn attributes(
        &self,
        attributes: &HashMap<String, String>,
        event: bool,
    ) -> BTreeMap<String, String> {
        let mut raw: Vec<(&String, &String)> = attributes.iter().collect();
        raw.sort();

        let mut standardized = BTreeMap::new();
        for (key, value) in raw {
            let key = self.name(key, event);
            if key.is_empty() {
                continue;
            }
            standardized.insert(key, self.value(value, event));
        }

        if event {
            limit_attributes(&mut standardized, EVENT_MAX_PARAMETERS);
        }
        standardized
    }
}

fn limit_attributes(attributes: &mut BTreeMap<String, String>, max_count: usize) {
    if attributes.len() <= max_count {
        return;
    }
    let mut keys: Vec<String> = attributes.keys().cloned().collect();
    keys.sort_by_key(|key| key.to_lowercase());
    for key in &keys[max_count..] {
        attributes.remove(key);
    }
}

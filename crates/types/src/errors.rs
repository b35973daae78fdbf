//! Validation results and their partition into bound and unbound errors.
//!
//! A dialog state produces one [`ErrorMap`] per reconciliation pass. Keys are
//! opaque identifiers (usually field identifiers); values are the messages
//! shown to the user. Elements claim keys at build time; the union of those
//! claims is the [`BoundKeySet`]. Everything else is "unbound" and ends up in
//! overflow displays.

use std::borrow::Borrow;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Identifier of a validation error, and of the element that displays it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorKey(String);

impl ErrorKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ErrorKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ErrorKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ErrorKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for ErrorKey {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keys claimed by the elements of one built dialog.
pub type BoundKeySet = IndexSet<ErrorKey>;

/// Mapping from error key to human readable message.
///
/// Keys are unique. Iteration follows insertion order so that anything
/// rendered from the map is stable between identical passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(IndexMap<ErrorKey, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the message for `key`, returning the previous one.
    pub fn insert(&mut self, key: impl Into<ErrorKey>, message: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), message.into())
    }

    /// Builder-style variant of [`ErrorMap::insert`].
    pub fn with(mut self, key: impl Into<ErrorKey>, message: impl Into<String>) -> Self {
        self.insert(key, message);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ErrorKey> {
        self.0.keys()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ErrorKey, &str)> {
        self.0.iter().map(|(key, message)| (key, message.as_str()))
    }

    /// Returns the entries whose key is not part of `bound`.
    pub fn without_keys(&self, bound: &BoundKeySet) -> ErrorMap {
        self.0
            .iter()
            .filter(|(key, _)| !bound.contains(*key))
            .map(|(key, message)| (key.clone(), message.clone()))
            .collect()
    }

    /// All messages joined by `separator`, in insertion order.
    pub fn joined(&self, separator: &str) -> String {
        self.messages().collect::<Vec<_>>().join(separator)
    }
}

impl<K: Into<ErrorKey>, V: Into<String>> FromIterator<(K, V)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, message)| (key.into(), message.into())).collect())
    }
}

/// Outcome of a single reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
    /// Everything the validation source returned.
    pub all: ErrorMap,
    /// The subset of `all` that no built element claims.
    pub unbound: ErrorMap,
}

impl ErrorReport {
    /// Splits `all` against the keys claimed by a dialog's elements.
    pub fn partition(all: ErrorMap, bound: &BoundKeySet) -> Self {
        let unbound = all.without_keys(bound);
        Self { all, unbound }
    }

    pub fn is_valid(&self) -> bool {
        self.all.is_empty()
    }
}

//! Metadata attached to dialog members.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorKey, ErrorMap};

/// Describes an editable field ("option") of a dialog state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    name: String,
    #[serde(default)]
    secret: bool,
    #[serde(default = "default_show_errors")]
    show_errors: bool,
}

fn default_show_errors() -> bool {
    true
}

impl OptionDescriptor {
    /// Creates a visible, non-secret option that shows its own errors inline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: false,
            show_errors: true,
        }
    }

    /// Marks the option as secret: outside a private surface it is edited
    /// through a pop-up, inside one its editor is masked.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Disables the inline error slot; errors for this field become unbound.
    pub fn hide_errors(mut self) -> Self {
        self.show_errors = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }

    pub fn shows_errors(&self) -> bool {
        self.show_errors
    }
}

/// Describes a zero-argument method ("action") of a dialog state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    name: String,
    #[serde(default = "default_validated")]
    is_validated: bool,
    #[serde(default)]
    validation_scope: Option<IndexSet<ErrorKey>>,
}

fn default_validated() -> bool {
    true
}

impl ActionDescriptor {
    /// Creates an action gated by every validation error.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_validated: true,
            validation_scope: None,
        }
    }

    /// The action is always enabled, regardless of validation.
    pub fn unvalidated(mut self) -> Self {
        self.is_validated = false;
        self
    }

    /// Restricts the keys that gate this action.
    pub fn scoped<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ErrorKey>,
    {
        self.is_validated = true;
        self.validation_scope = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_validated(&self) -> bool {
        self.is_validated
    }

    /// `None` means every error key gates the action.
    pub fn validation_scope(&self) -> Option<&IndexSet<ErrorKey>> {
        self.validation_scope.as_ref()
    }

    /// Applies the gating rule to one pass worth of errors.
    ///
    /// - not validated: always enabled
    /// - no scope: enabled iff `errors` is empty
    /// - scope: enabled iff none of the scoped keys is present
    pub fn is_enabled(&self, errors: &ErrorMap) -> bool {
        if !self.is_validated {
            return true;
        }
        match &self.validation_scope {
            None => errors.is_empty(),
            Some(scope) => !scope.iter().any(|key| errors.contains_key(key.as_str())),
        }
    }
}

//! Editor selection and the value contract between fields and editors.
//!
//! Editors exchange values as JSON so a toolkit can implement a handful of
//! widgets without knowing the concrete field types. Which widget is used is
//! decided by [`FieldValue::editor_kind`], a closed set of value-like and
//! reference-like editors.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value as JsonValue};

/// The kinds of value-like editors a toolkit must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Text,
    Integer,
    Number,
    Boolean,
}

/// Which editor family a field is edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorKind {
    /// Edits a plain value in place.
    Value(ValueKind),
    /// Picks a target element owned by the host.
    Reference,
}

/// Identifier of a host-owned element that a reference editor points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    pub fn target(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A field type that can be edited directly by one of the stock editors.
pub trait FieldValue: Clone + 'static {
    fn editor_kind() -> EditorKind;

    fn to_json(&self) -> JsonValue;

    /// Converts an editor value back; `None` when the value does not fit.
    fn from_json(value: &JsonValue) -> Option<Self>;
}

impl FieldValue for String {
    fn editor_kind() -> EditorKind {
        EditorKind::Value(ValueKind::Text)
    }

    fn to_json(&self) -> JsonValue {
        JsonValue::String(self.clone())
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FieldValue for bool {
    fn editor_kind() -> EditorKind {
        EditorKind::Value(ValueKind::Boolean)
    }

    fn to_json(&self) -> JsonValue {
        JsonValue::Bool(*self)
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        value.as_bool()
    }
}

macro_rules! signed_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn editor_kind() -> EditorKind {
                    EditorKind::Value(ValueKind::Integer)
                }

                fn to_json(&self) -> JsonValue {
                    JsonValue::from(*self)
                }

                fn from_json(value: &JsonValue) -> Option<Self> {
                    value.as_i64().and_then(|number| <$ty>::try_from(number).ok())
                }
            }
        )*
    };
}

macro_rules! unsigned_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn editor_kind() -> EditorKind {
                    EditorKind::Value(ValueKind::Integer)
                }

                fn to_json(&self) -> JsonValue {
                    JsonValue::from(*self)
                }

                fn from_json(value: &JsonValue) -> Option<Self> {
                    value.as_u64().and_then(|number| <$ty>::try_from(number).ok())
                }
            }
        )*
    };
}

signed_field_value!(i32, i64);
unsigned_field_value!(u32, u64);

impl FieldValue for f64 {
    fn editor_kind() -> EditorKind {
        EditorKind::Value(ValueKind::Number)
    }

    fn to_json(&self) -> JsonValue {
        Number::from_f64(*self).map(JsonValue::Number).unwrap_or(JsonValue::Null)
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FieldValue for f32 {
    fn editor_kind() -> EditorKind {
        EditorKind::Value(ValueKind::Number)
    }

    fn to_json(&self) -> JsonValue {
        Number::from_f64(f64::from(*self)).map(JsonValue::Number).unwrap_or(JsonValue::Null)
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        value.as_f64().map(|number| number as f32).filter(|number| number.is_finite())
    }
}

impl FieldValue for Option<Reference> {
    fn editor_kind() -> EditorKind {
        EditorKind::Reference
    }

    fn to_json(&self) -> JsonValue {
        match self {
            Some(reference) => JsonValue::String(reference.0.clone()),
            None => JsonValue::Null,
        }
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => Some(None),
            JsonValue::String(target) if target.is_empty() => Some(None),
            JsonValue::String(target) => Some(Some(Reference::new(target.clone()))),
            _ => None,
        }
    }
}

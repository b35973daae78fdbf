//! Type-erased access to one field of a dialog state.
//!
//! Editors speak JSON; fields have concrete Rust types. A [`FieldBinding`]
//! bridges the two, either directly through [`FieldValue`] or through a
//! [`ReversibleMapper`] whose mapped type is a [`FieldValue`].

use std::rc::Rc;

use dialogkit_types::{EditorKind, FieldValue, ReversibleMapper};
use serde_json::Value as JsonValue;

/// Projects a state onto one of its fields.
pub type FieldLens<S, V> = Rc<dyn Fn(&mut S) -> &mut V>;

/// Wraps a projection closure into a [`FieldLens`].
pub fn lens<S, V>(project: impl Fn(&mut S) -> &mut V + 'static) -> FieldLens<S, V> {
    Rc::new(project)
}

/// Result of writing an editor value back into a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    /// The value could not be converted; the field is unchanged.
    Rejected,
}

pub trait FieldBinding<S> {
    fn editor_kind(&self) -> EditorKind;

    /// Current field value as an editor value.
    fn read(&self, state: &mut S) -> JsonValue;

    fn write(&self, state: &mut S, value: &JsonValue) -> WriteOutcome;
}

pub struct DirectField<S, V> {
    lens: FieldLens<S, V>,
}

impl<S, V> DirectField<S, V> {
    pub fn new(lens: FieldLens<S, V>) -> Self {
        Self { lens }
    }
}

impl<S, V: FieldValue> FieldBinding<S> for DirectField<S, V> {
    fn editor_kind(&self) -> EditorKind {
        V::editor_kind()
    }

    fn read(&self, state: &mut S) -> JsonValue {
        (self.lens)(state).to_json()
    }

    fn write(&self, state: &mut S, value: &JsonValue) -> WriteOutcome {
        match V::from_json(value) {
            Some(value) => {
                *(self.lens)(state) = value;
                WriteOutcome::Applied
            }
            None => WriteOutcome::Rejected,
        }
    }
}

/// A field edited through a mapper. The editor is built for `M::Mapped`.
pub struct MappedField<S, M: ReversibleMapper> {
    lens: FieldLens<S, M::Original>,
    mapper: M,
}

impl<S, M: ReversibleMapper> MappedField<S, M> {
    pub fn new(mapper: M, lens: FieldLens<S, M::Original>) -> Self {
        Self { lens, mapper }
    }
}

impl<S, M> FieldBinding<S> for MappedField<S, M>
where
    M: ReversibleMapper,
    M::Mapped: FieldValue + Default,
{
    fn editor_kind(&self) -> EditorKind {
        M::Mapped::editor_kind()
    }

    fn read(&self, state: &mut S) -> JsonValue {
        self.mapper.try_map((self.lens)(state)).unwrap_or_default().to_json()
    }

    fn write(&self, state: &mut S, value: &JsonValue) -> WriteOutcome {
        let original = M::Mapped::from_json(value).and_then(|mapped| self.mapper.try_unmap(&mapped));
        match original {
            Some(original) => {
                *(self.lens)(state) = original;
                WriteOutcome::Applied
            }
            None => WriteOutcome::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use dialogkit_types::{DelimitedList, ParsedText, ValueKind};
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Fields {
        count: i64,
        tags: Vec<String>,
        ratio: f64,
    }

    #[test]
    fn direct_field_rejects_mismatched_values() {
        let binding = DirectField::new(lens(|fields: &mut Fields| &mut fields.count));
        let mut fields = Fields::default();

        assert_eq!(binding.write(&mut fields, &json!(7)), WriteOutcome::Applied);
        assert_eq!(binding.write(&mut fields, &json!("seven")), WriteOutcome::Rejected);
        assert_eq!(fields.count, 7);
        assert_eq!(binding.editor_kind(), EditorKind::Value(ValueKind::Integer));
    }

    #[test]
    fn mapped_field_edits_through_the_proxy_type() {
        let binding = MappedField::new(DelimitedList::default(), lens(|fields: &mut Fields| &mut fields.tags));
        let mut fields = Fields::default();

        assert_eq!(binding.editor_kind(), EditorKind::Value(ValueKind::Text));
        assert_eq!(binding.write(&mut fields, &json!("red, green")), WriteOutcome::Applied);
        assert_eq!(fields.tags, vec!["red".to_string(), "green".to_string()]);
        assert_eq!(binding.read(&mut fields), json!("red, green"));
    }

    #[test]
    fn failed_unmap_keeps_the_previous_value() {
        let binding = MappedField::new(ParsedText::<f64>::new(), lens(|fields: &mut Fields| &mut fields.ratio));
        let mut fields = Fields { ratio: 0.5, ..Fields::default() };

        assert_eq!(binding.write(&mut fields, &json!("not a number")), WriteOutcome::Rejected);
        assert_eq!(fields.ratio, 0.5);
    }

    #[test]
    fn unmappable_value_reads_as_editor_default() {
        let binding = MappedField::new(DelimitedList::default(), lens(|fields: &mut Fields| &mut fields.tags));
        let mut fields = Fields {
            tags: vec!["a,b".to_string()],
            ..Fields::default()
        };
        assert_eq!(binding.read(&mut fields), json!(""));
    }
}

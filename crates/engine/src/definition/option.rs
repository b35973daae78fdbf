use std::rc::Rc;

use dialogkit_types::{BoundKeySet, ErrorKey, ErrorMap, FieldValue, OptionDescriptor, ReversibleMapper, SchemaError};
use serde_json::Value as JsonValue;
use tracing::warn;

use super::EntryDefinition;
use crate::element::{Element, ElementCore};
use crate::field::{DirectField, FieldBinding, FieldLens, MappedField, WriteOutcome};
use crate::popup::SecretPopup;
use crate::state::{DialogState, OnChange, SharedState};
use crate::toolkit::{Alignment, CommitHandler, EditorSpec, Surface, Tone, WidgetId};
use crate::ui_builder::UiBuilder;

struct OptionInner<S> {
    ident: ErrorKey,
    descriptor: OptionDescriptor,
    binding: Rc<dyn FieldBinding<S>>,
}

/// An editable field of the dialog state.
///
/// Builds a labelled editor, or for secret fields outside a private surface
/// a label with an "Edit" button that opens a [`SecretPopup`]. The field
/// identifier is the element key and, when inline errors are shown, the error
/// key the element claims.
pub struct OptionDefinition<S: DialogState> {
    inner: Rc<OptionInner<S>>,
}

impl<S: DialogState> OptionDefinition<S> {
    pub fn new<V: FieldValue>(ident: impl Into<ErrorKey>, descriptor: OptionDescriptor, lens: FieldLens<S, V>) -> Self {
        Self::with_binding(ident, descriptor, Rc::new(DirectField::new(lens)))
    }

    /// An option whose editor edits `M::Mapped` instead of the field type.
    pub fn mapped<M>(ident: impl Into<ErrorKey>, descriptor: OptionDescriptor, mapper: M, lens: FieldLens<S, M::Original>) -> Self
    where
        M: ReversibleMapper + 'static,
        M::Original: 'static,
        M::Mapped: FieldValue + Default,
    {
        Self::with_binding(ident, descriptor, Rc::new(MappedField::new(mapper, lens)))
    }

    pub fn with_binding(ident: impl Into<ErrorKey>, descriptor: OptionDescriptor, binding: Rc<dyn FieldBinding<S>>) -> Self {
        Self {
            inner: Rc::new(OptionInner {
                ident: ident.into(),
                descriptor,
                binding,
            }),
        }
    }

    pub fn ident(&self) -> &ErrorKey {
        &self.inner.ident
    }

    pub fn descriptor(&self) -> &OptionDescriptor {
        &self.inner.descriptor
    }

    fn commit_handler(&self, state: &SharedState<S>, on_change: &OnChange) -> CommitHandler {
        let inner = Rc::clone(&self.inner);
        let state = Rc::clone(state);
        let on_change = Rc::clone(on_change);
        Rc::new(move |value: JsonValue| {
            let outcome = inner.binding.write(&mut state.borrow_mut(), &value);
            match outcome {
                WriteOutcome::Applied => {
                    on_change();
                }
                WriteOutcome::Rejected => {
                    warn!(field = %inner.ident, value = %value, "dropped edit that does not convert to the field type");
                }
            }
        })
    }
}

impl<S: DialogState> Clone for OptionDefinition<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: DialogState> EntryDefinition<S> for OptionDefinition<S> {
    fn label(&self) -> String {
        format!("option `{}`", self.inner.ident)
    }

    fn create(&self, ui: &mut UiBuilder, dialog: &SharedState<S>, on_change: &OnChange, in_private: bool) -> Result<Rc<dyn Element>, SchemaError> {
        let config = Rc::clone(ui.config());
        let descriptor = &self.inner.descriptor;
        let slot = ui.vertical(config.spacing / 2.0);

        let mut editor = None;
        let mut popup = None;
        if descriptor.is_secret() && !in_private {
            let secret_popup = SecretPopup::new(self.clone(), Rc::clone(dialog), Rc::clone(on_change), Rc::clone(ui.host()), Rc::clone(&config));
            ui.panel();
            ui.push_style_with(|style| style.tone = Tone::Label);
            ui.text(&format!("{}:", descriptor.name()));
            ui.pop_style();
            let trigger = Rc::downgrade(&secret_popup);
            ui.button(
                &config.labels.secret_edit,
                Rc::new(move || {
                    if let Some(secret_popup) = trigger.upgrade() {
                        secret_popup.open();
                    }
                }),
            );
            ui.nest_out();
            secret_popup.close_with(ui.surface().as_ref());
            popup = Some(secret_popup);
        } else {
            let value = self.inner.binding.read(&mut dialog.borrow_mut());
            let spec = EditorSpec {
                label: descriptor.name().to_string(),
                kind: self.inner.binding.editor_kind(),
                value,
                mask: descriptor.is_secret().then_some(config.secret_mask),
            };
            editor = Some(ui.editor(spec, self.commit_handler(dialog, on_change)));
        }

        let error_text = if descriptor.shows_errors() {
            ui.push_style_with(|style| {
                style.tone = Tone::Error;
                style.alignment = Alignment::Right;
                style.preferred_height = Some(config.error_height);
            });
            let text = ui.text("");
            ui.pop_style();
            Some(text)
        } else {
            None
        };

        ui.nest_out();
        Ok(Rc::new(OptionElement {
            core: ElementCore::new(Some(self.inner.ident.clone()), Rc::clone(ui.surface()), slot),
            inner: Rc::clone(&self.inner),
            state: Rc::clone(dialog),
            editor,
            error_text,
            popup,
        }))
    }
}

/// A built option: an editor (or pop-up trigger) plus its inline error text.
pub struct OptionElement<S: DialogState> {
    core: ElementCore,
    inner: Rc<OptionInner<S>>,
    state: SharedState<S>,
    editor: Option<WidgetId>,
    error_text: Option<WidgetId>,
    popup: Option<Rc<SecretPopup<S>>>,
}

impl<S: DialogState> OptionElement<S> {
    pub fn editor(&self) -> Option<WidgetId> {
        self.editor
    }

    pub fn error_text(&self) -> Option<WidgetId> {
        self.error_text
    }

    pub fn popup(&self) -> Option<&Rc<SecretPopup<S>>> {
        self.popup.as_ref()
    }

    fn surface(&self) -> &Rc<dyn Surface> {
        self.core.surface()
    }
}

impl<S: DialogState> Element for OptionElement<S> {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn bound_error_keys(&self) -> BoundKeySet {
        let mut keys = BoundKeySet::new();
        if self.error_text.is_some() {
            keys.insert(self.inner.ident.clone());
        }
        keys
    }

    fn display_errors(&self, all: &ErrorMap, _unbound: &ErrorMap) {
        if let Some(text) = self.error_text {
            self.surface().set_text(text, all.get(self.inner.ident.as_str()).unwrap_or_default());
        }
    }

    fn reset(&self) {
        if let Some(editor) = self.editor {
            let value = self.inner.binding.read(&mut self.state.borrow_mut());
            self.surface().set_value(editor, value);
        }
        if let Some(popup) = &self.popup {
            popup.reset();
        }
    }
}

use std::cell::Cell;
use std::rc::Rc;

use dialogkit_types::{ActionDescriptor, BoundKeySet, ErrorKey, ErrorMap, SchemaError};
use tracing::debug;

use super::EntryDefinition;
use crate::element::{Element, ElementCore};
use crate::state::{DialogState, OnChange, SharedState};
use crate::toolkit::{PressHandler, Surface, WidgetId};
use crate::ui_builder::UiBuilder;

type Invoke<S> = Rc<dyn Fn(&mut S)>;

/// A button invoking a zero-argument operation on the dialog state.
pub struct ActionDefinition<S: DialogState> {
    ident: ErrorKey,
    descriptor: Rc<ActionDescriptor>,
    invoke: Invoke<S>,
}

impl<S: DialogState> ActionDefinition<S> {
    pub fn new(ident: impl Into<ErrorKey>, descriptor: ActionDescriptor, invoke: impl Fn(&mut S) + 'static) -> Self {
        Self {
            ident: ident.into(),
            descriptor: Rc::new(descriptor),
            invoke: Rc::new(invoke),
        }
    }

    pub fn ident(&self) -> &ErrorKey {
        &self.ident
    }

    pub fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }
}

impl<S: DialogState> Clone for ActionDefinition<S> {
    fn clone(&self) -> Self {
        Self {
            ident: self.ident.clone(),
            descriptor: Rc::clone(&self.descriptor),
            invoke: Rc::clone(&self.invoke),
        }
    }
}

impl<S: DialogState> EntryDefinition<S> for ActionDefinition<S> {
    fn label(&self) -> String {
        format!("action `{}`", self.ident)
    }

    fn create(&self, ui: &mut UiBuilder, dialog: &SharedState<S>, on_change: &OnChange, _in_private: bool) -> Result<Rc<dyn Element>, SchemaError> {
        let on_press: PressHandler = {
            let descriptor = Rc::clone(&self.descriptor);
            let invoke = Rc::clone(&self.invoke);
            let state = Rc::clone(dialog);
            let on_change = Rc::clone(on_change);
            Rc::new(move || {
                if descriptor.is_validated() && !descriptor.is_enabled(&on_change().all) {
                    debug!(action = descriptor.name(), "action press ignored by validation");
                    return;
                }
                invoke(&mut state.borrow_mut());
            })
        };

        let button_height = ui.config().button_height;
        ui.push_style_with(|style| style.preferred_height = Some(button_height));
        let button = ui.button(self.descriptor.name(), on_press);
        ui.pop_style();

        Ok(Rc::new(ActionElement::new(
            self.ident.clone(),
            Rc::clone(&self.descriptor),
            Rc::clone(ui.surface()),
            button,
        )))
    }
}

/// A built action button. Its widget is enabled when the element is
/// effectively enabled and the last pass satisfied the action's rule.
pub struct ActionElement {
    core: ElementCore,
    descriptor: Rc<ActionDescriptor>,
    validation_ok: Cell<bool>,
}

impl ActionElement {
    fn new(ident: ErrorKey, descriptor: Rc<ActionDescriptor>, surface: Rc<dyn Surface>, button: WidgetId) -> Self {
        let element = Self {
            core: ElementCore::new(Some(ident), surface, button),
            validation_ok: Cell::new(!descriptor.is_validated()),
            descriptor,
        };
        element.apply_enabled();
        element
    }
}

impl Element for ActionElement {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn bound_error_keys(&self) -> BoundKeySet {
        BoundKeySet::new()
    }

    fn display_errors(&self, all: &ErrorMap, _unbound: &ErrorMap) {
        self.validation_ok.set(self.descriptor.is_enabled(all));
        self.apply_enabled();
    }

    fn apply_enabled(&self) {
        let enabled = self.core.is_effectively_enabled() && self.validation_ok.get();
        self.core.surface().set_enabled(self.core.root(), enabled);
    }
}

//! The contract between caller code and the dialog engine.

use std::cell::RefCell;
use std::rc::Rc;

use dialogkit_types::{ErrorMap, ErrorReport};

use crate::container::DialogHandle;

/// User type owning editable fields and validation logic.
///
/// All calls happen on the owning context of the dialog. The engine never
/// holds a borrow of the state while calling into it, and never calls into it
/// while the state is borrowed by one of these methods, with one exception:
/// [`DialogHandle`] operations invoked from `update_and_validate` only touch
/// elements, never the state.
pub trait DialogState: 'static {
    /// Validates the current field values. May update derived state.
    fn update_and_validate(&mut self) -> ErrorMap;

    /// Called exactly once when the owning window begins tear-down.
    fn on_destroy(&mut self);

    /// Receives a handle to the built dialog so validation can toggle
    /// conditional sections by key.
    fn bind(&mut self, _dialog: DialogHandle) {}
}

/// A dialog state shared between the dialog and its widget handlers.
pub type SharedState<S> = Rc<RefCell<S>>;

/// Runs one reconciliation pass of the dialog an element belongs to.
pub type OnChange = Rc<dyn Fn() -> ErrorReport>;

/// Produces the error map of one pass. Defaults to
/// [`DialogState::update_and_validate`].
pub type ValidationSource<S> = Rc<dyn Fn(&SharedState<S>) -> ErrorMap>;

pub fn shared<S>(state: S) -> SharedState<S> {
    Rc::new(RefCell::new(state))
}

//! The validate, partition and distribute pass.
//!
//! Elements are built before the dialog that owns them exists, yet their
//! handlers must trigger that dialog's pass. [`LateBinding`] hands out an
//! [`OnChange`] up front and is attached to the dialog once it is assembled.
//! Until then, and after the dialog is dropped, a pass reports no errors.

use std::rc::{Rc, Weak};

use dialogkit_types::{BoundKeySet, ErrorReport};
use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::dialog::DialogCore;
use crate::element::Element;
use crate::state::{DialogState, OnChange, SharedState, ValidationSource};

/// Default validation source: the state's own validation.
pub fn state_validation<S: DialogState>() -> ValidationSource<S> {
    Rc::new(|state: &SharedState<S>| state.borrow_mut().update_and_validate())
}

/// Runs one pass: validate, split against `bound`, fan out to `root`.
///
/// Distribution depends only on the error map, so identical input always
/// yields identical displayed state.
pub fn reconcile<S: DialogState>(state: &SharedState<S>, validation: &ValidationSource<S>, bound: &BoundKeySet, root: &dyn Element) -> ErrorReport {
    let all = validation(state);
    let report = ErrorReport::partition(all, bound);
    root.display_errors(&report.all, &report.unbound);
    debug!(errors = report.all.len(), unbound = report.unbound.len(), "reconciled dialog");
    report
}

pub(crate) struct LateBinding<S: DialogState> {
    cell: Rc<OnceCell<Weak<DialogCore<S>>>>,
}

impl<S: DialogState> LateBinding<S> {
    pub(crate) fn new() -> Self {
        Self {
            cell: Rc::new(OnceCell::new()),
        }
    }

    pub(crate) fn on_change(&self) -> OnChange {
        let cell = Rc::clone(&self.cell);
        Rc::new(move || {
            cell.get()
                .and_then(Weak::upgrade)
                .map(|core| core.reconcile())
                .unwrap_or_default()
        })
    }

    pub(crate) fn attach(&self, core: &Rc<DialogCore<S>>) {
        if self.cell.set(Rc::downgrade(core)).is_err() {
            debug!("dialog pass already attached");
        }
    }
}

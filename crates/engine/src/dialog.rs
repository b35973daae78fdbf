//! A built dialog: root container, state and reconciliation.

use std::rc::Rc;

use dialogkit_types::{BoundKeySet, ErrorReport};

use crate::container::{DialogHandle, ElementContainer};
use crate::reconcile::reconcile;
use crate::state::{DialogState, SharedState, ValidationSource};
use crate::toolkit::{Host, Surface};

pub(crate) struct DialogCore<S: DialogState> {
    pub(crate) state: SharedState<S>,
    pub(crate) root: Rc<ElementContainer>,
    pub(crate) bound: BoundKeySet,
    pub(crate) validation: ValidationSource<S>,
    pub(crate) surface: Rc<dyn Surface>,
    pub(crate) host: Rc<dyn Host>,
}

impl<S: DialogState> DialogCore<S> {
    pub(crate) fn reconcile(&self) -> ErrorReport {
        reconcile(&self.state, &self.validation, &self.bound, self.root.as_ref())
    }
}

/// Handle to a built dialog. Element handlers keep only weak references to
/// it; once every `Dialog` clone is dropped, passes become no-ops.
pub struct Dialog<S: DialogState> {
    core: Rc<DialogCore<S>>,
}

impl<S: DialogState> Clone for Dialog<S> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<S: DialogState> Dialog<S> {
    pub(crate) fn new(core: Rc<DialogCore<S>>) -> Self {
        Self { core }
    }

    /// Runs one reconciliation pass and returns its outcome.
    pub fn revalidate(&self) -> ErrorReport {
        self.core.reconcile()
    }

    /// Keys claimed by the built elements. Fixed for the dialog's lifetime.
    pub fn bound_keys(&self) -> &BoundKeySet {
        &self.core.bound
    }

    pub fn handle(&self) -> DialogHandle {
        DialogHandle::new(&self.core.root)
    }

    pub fn root(&self) -> &Rc<ElementContainer> {
        &self.core.root
    }

    pub fn state(&self) -> &SharedState<S> {
        &self.core.state
    }

    pub fn surface(&self) -> &Rc<dyn Surface> {
        &self.core.surface
    }

    /// Destroys the surface the dialog was built into, on the owning context.
    pub fn close(&self) {
        let surface = Rc::clone(&self.core.surface);
        self.core.host.run_synchronously(Box::new(move || surface.destroy()));
    }
}

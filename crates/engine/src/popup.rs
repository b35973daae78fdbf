//! Pop-up sub-dialogs editing one secret option in a private surface.
//!
//! A pop-up is a fresh dialog without defaults that holds the secret option
//! and a close button. Its validation source delegates to the outer dialog's
//! pass, so errors stay single-sourced: an edit inside the pop-up updates the
//! outer dialog exactly as an inline edit would. At most one pop-up surface
//! per option is alive at a time.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use dialogkit_types::{ActionDescriptor, SchemaError};
use tracing::{info, warn};

use crate::builder::{DialogBuilder, Window};
use crate::config::DialogConfig;
use crate::definition::{ActionDefinition, OptionDefinition};
use crate::state::{DialogState, OnChange, SharedState};
use crate::toolkit::{Host, Surface, SurfaceKind};

pub struct SecretPopup<S: DialogState> {
    option: OptionDefinition<S>,
    state: SharedState<S>,
    outer_on_change: OnChange,
    host: Rc<dyn Host>,
    config: Rc<DialogConfig>,
    window: RefCell<Option<Window<S>>>,
    this: Weak<Self>,
}

impl<S: DialogState> SecretPopup<S> {
    pub fn new(option: OptionDefinition<S>, state: SharedState<S>, outer_on_change: OnChange, host: Rc<dyn Host>, config: Rc<DialogConfig>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            option,
            state,
            outer_on_change,
            host,
            config,
            window: RefCell::new(None),
            this: this.clone(),
        })
    }

    /// Opens the pop-up on the owning context, replacing any open one.
    pub fn open(&self) {
        let this = self.this.clone();
        self.host.run_synchronously(Box::new(move || {
            if let Some(popup) = this.upgrade() {
                if let Err(error) = popup.open_now() {
                    warn!(option = %popup.option.ident(), error = %error, "failed to open secret pop-up");
                }
            }
        }));
    }

    /// Closes the pop-up surface on the owning context. The outer dialog is
    /// left untouched.
    pub fn close(&self) {
        let this = self.this.clone();
        self.host.run_synchronously(Box::new(move || {
            if let Some(popup) = this.upgrade() {
                popup.close_now();
            }
        }));
    }

    pub fn is_open(&self) -> bool {
        self.window.borrow().as_ref().is_some_and(Window::is_open)
    }

    /// Surface of the open pop-up, if any.
    pub fn surface(&self) -> Option<Rc<dyn Surface>> {
        self.window.borrow().as_ref().filter(|window| window.is_open()).map(|window| Rc::clone(window.surface()))
    }

    /// Re-reads the field into the open pop-up's editor.
    pub fn reset(&self) {
        if let Some(window) = self.window.borrow().as_ref() {
            window.dialog().root().reset_all();
        }
    }

    /// Closes the pop-up as soon as `owner` begins tear-down.
    pub(crate) fn close_with(&self, owner: &dyn Surface) {
        let this = self.this.clone();
        owner.on_teardown(Box::new(move || {
            if let Some(popup) = this.upgrade() {
                popup.close_now();
            }
        }));
    }

    fn open_now(&self) -> Result<(), SchemaError> {
        self.close_now();
        let title = self.option.descriptor().name().to_string();
        let window = self.builder().open_window(&title, Rc::clone(&self.host), Rc::clone(&self.config), Rc::clone(&self.state), SurfaceKind::Private)?;
        window.focus_first_editor();
        info!(option = %self.option.ident(), "opened secret pop-up");
        *self.window.borrow_mut() = Some(window);
        Ok(())
    }

    fn close_now(&self) {
        let previous = self.window.borrow_mut().take();
        if let Some(window) = previous {
            window.destroy();
        }
    }

    fn builder(&self) -> DialogBuilder<S> {
        let outer_on_change = Rc::clone(&self.outer_on_change);
        let this = self.this.clone();
        let close = ActionDescriptor::new(self.config.labels.popup_close.clone()).unvalidated();
        DialogBuilder::empty()
            .with_validation_source(move |_state| outer_on_change().all)
            .add_entry(self.option.clone())
            .add_entry(ActionDefinition::new("close", close, move |_state: &mut S| {
                if let Some(popup) = this.upgrade() {
                    popup.close();
                }
            }))
    }
}
